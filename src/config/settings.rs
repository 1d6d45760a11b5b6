use crate::config::env::{self, EnvKey};
use serde::Deserialize;

const DEFAULT_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";
const DEFAULT_BACKEND_URL: &str = "http://backend:8000";

/// Processing server configuration. Everything has a default, so startup
/// never fails on the server side.
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub ffmpeg_bin: String,
    pub drawtext_font: String,
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 8000),
            ffmpeg_bin: env::get_or(EnvKey::FfmpegBin, "ffmpeg"),
            drawtext_font: env::get_or(EnvKey::DrawtextFont, DEFAULT_FONT),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Bot configuration. The token is required; the bot refuses to start
/// without it.
#[derive(Clone, Debug)]
pub struct BotConfig {
    pub bot_token: String,
    pub backend_url: String,
}

impl BotConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        Ok(Self {
            bot_token: env::get(EnvKey::BotToken)?,
            backend_url: env::get_or(EnvKey::BackendUrl, DEFAULT_BACKEND_URL),
        })
    }
}
