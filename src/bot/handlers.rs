use std::sync::Arc;

use anyhow::Context as _;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::InputFile;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::bot::client::{ClientError, ProcessingClient};
use crate::bot::session::{ChatState, PendingVideo, SessionStore};
use crate::common::media;

pub type HandlerResult = anyhow::Result<()>;

const PROMPT_VIDEO_FIRST: &str = "Send me a video first, then pick an emoji.";
const PROMPT_EMOJI: &str = "Now send the emoji you want stamped on the video.";
const PROMPT_EMOJI_AGAIN: &str = "That was empty. Send the emoji you want stamped on the video.";
const REPLY_NOT_A_VIDEO: &str = "That doesn't look like a video. Please send a video file.";
const REPLY_DOWNLOAD_FAILED: &str = "Couldn't download that video, please try again.";
const REPLY_PROCESSING: &str = "Processing your video, hang on…";
const REPLY_FAILED: &str = "Processing failed 😕 Please try again.";

struct AttachedFile {
    file_id: String,
    file_name: Option<String>,
    mime_type: Option<String>,
}

/// What to do with an inbound attachment, decided from the declared mime
/// type alone.
#[derive(Debug, PartialEq, Eq)]
enum MediaAction {
    Accept,
    Reject,
}

fn media_action(mime_type: Option<&str>) -> MediaAction {
    let is_video = mime_type
        .map(|m| m.starts_with("video/"))
        .unwrap_or(false);
    if is_video {
        MediaAction::Accept
    } else {
        MediaAction::Reject
    }
}

/// What to do with an inbound text, decided from the trimmed text and the
/// chat's current state. Only `Process` leads to a service call.
#[derive(Debug, PartialEq, Eq)]
enum TextAction {
    PromptVideoFirst,
    PromptEmojiAgain,
    Process { emoji: String },
}

fn text_action(text: &str, state: ChatState) -> TextAction {
    let emoji = text.trim();
    match (state, emoji.is_empty()) {
        (ChatState::Idle, _) => TextAction::PromptVideoFirst,
        (ChatState::AwaitingEmoji, true) => TextAction::PromptEmojiAgain,
        (ChatState::AwaitingEmoji, false) => TextAction::Process {
            emoji: emoji.to_string(),
        },
    }
}

fn attached_file(msg: &Message) -> Option<AttachedFile> {
    if let Some(video) = msg.video() {
        return Some(AttachedFile {
            file_id: video.file.id.clone(),
            file_name: video.file_name.clone(),
            mime_type: video.mime_type.as_ref().map(|m| m.to_string()),
        });
    }
    if let Some(doc) = msg.document() {
        return Some(AttachedFile {
            file_id: doc.file.id.clone(),
            file_name: doc.file_name.clone(),
            mime_type: doc.mime_type.as_ref().map(|m| m.to_string()),
        });
    }
    None
}

/// Idle -> AwaitingEmoji: a video arrived, download it and ask for the
/// emoji. Non-video attachments are rejected without creating an entry.
pub async fn handle_media(bot: Bot, msg: Message, store: Arc<dyn SessionStore>) -> HandlerResult {
    let chat = msg.chat.id;
    let Some(file) = attached_file(&msg) else {
        return Ok(());
    };

    if media_action(file.mime_type.as_deref()) == MediaAction::Reject {
        bot.send_message(chat, REPLY_NOT_A_VIDEO).await?;
        return Ok(());
    }

    let pending = match download_video(&bot, &file).await {
        Ok(pending) => pending,
        Err(e) => {
            warn!("download failed for chat {chat}: {e:#}");
            bot.send_message(chat, REPLY_DOWNLOAD_FAILED).await?;
            return Ok(());
        }
    };

    info!(
        "chat {chat}: downloaded {} ({})",
        pending.path.display(),
        pending.media_type
    );
    store.put(chat, pending).await;
    bot.send_message(chat, PROMPT_EMOJI).await?;
    Ok(())
}

async fn download_video(bot: &Bot, file: &AttachedFile) -> anyhow::Result<PendingVideo> {
    let extension = media::detect_extension(file.file_name.as_deref(), file.mime_type.as_deref());
    let media_type = file
        .mime_type
        .clone()
        .unwrap_or_else(|| media::DEFAULT_MEDIA_TYPE.to_string());

    let tg_file = bot
        .get_file(file.file_id.clone())
        .await
        .context("get_file")?;

    // TempPath ownership means a failed download still removes the
    // partial file on the error return.
    let path = tempfile::Builder::new()
        .prefix("videomoji-")
        .suffix(&extension)
        .tempfile()
        .context("create temp file")?
        .into_temp_path();

    let mut dst = tokio::fs::File::create(&path).await?;
    bot.download_file(&tg_file.path, &mut dst)
        .await
        .context("download_file")?;
    dst.flush().await?;

    Ok(PendingVideo {
        path,
        media_type,
        extension,
    })
}

/// AwaitingEmoji -> Idle: any non-empty text counts as the emoji. The
/// entry and its temp file are released on every path out of here, no
/// matter how the processing call went.
pub async fn handle_text(
    bot: Bot,
    msg: Message,
    text: String,
    store: Arc<dyn SessionStore>,
    client: ProcessingClient,
) -> HandlerResult {
    let chat = msg.chat.id;

    let emoji = match text_action(&text, store.state(chat).await) {
        TextAction::PromptVideoFirst => {
            bot.send_message(chat, PROMPT_VIDEO_FIRST).await?;
            return Ok(());
        }
        TextAction::PromptEmojiAgain => {
            bot.send_message(chat, PROMPT_EMOJI_AGAIN).await?;
            return Ok(());
        }
        TextAction::Process { emoji } => emoji,
    };

    let Some(pending) = store.take(chat).await else {
        // The entry vanished between the state peek and the take.
        bot.send_message(chat, PROMPT_VIDEO_FIRST).await?;
        return Ok(());
    };

    bot.send_message(chat, REPLY_PROCESSING).await?;

    match client.add_emoji(&pending, &emoji).await {
        Ok(bytes) => {
            let video =
                InputFile::memory(bytes).file_name(format!("output{}", pending.extension));
            bot.send_video(chat, video).await?;
        }
        Err(ClientError::Backend { status, body }) => {
            bot.send_message(chat, format!("Processing failed 😕\n{status}: {body}"))
                .await?;
        }
        Err(e) => {
            warn!("processing request failed for chat {chat}: {e}");
            bot.send_message(chat, REPLY_FAILED).await?;
        }
    }

    // `pending` drops here, deleting the downloaded temp file.
    Ok(())
}
