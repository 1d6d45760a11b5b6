use crate::common::media;
use crate::common::response::ApiError;
use crate::modules::processing::dto::{AddEmojiForm, HealthResponse};
use crate::modules::processing::service::{OverlayError, OverlayService};
use crate::state::AppState;
use axum::{
    Json,
    body::Body,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::warn;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "Processing"
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::ok())
}

struct Upload {
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

#[utoipa::path(
    post,
    path = "/api/add-emoji",
    request_body(content = AddEmojiForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Processed video, same media type as the input"),
        (status = 400, description = "Missing file field or not a video"),
        (status = 500, description = "ffmpeg failed or produced no output")
    ),
    tag = "Processing"
)]
pub async fn add_emoji(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut upload: Option<Upload> = None;
    let mut emoji: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError(
            format!("Malformed multipart body: {e}"),
            StatusCode::BAD_REQUEST,
        )
    })? {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| {
                    ApiError(
                        format!("Failed to read upload: {e}"),
                        StatusCode::BAD_REQUEST,
                    )
                })?;
                upload = Some(Upload {
                    filename,
                    content_type,
                    data,
                });
            }
            Some("emoji") => {
                emoji = field.text().await.ok().filter(|s| !s.is_empty());
            }
            _ => {}
        }
    }

    let Some(upload) = upload else {
        return Err(ApiError(
            "Missing 'file' field".to_string(),
            StatusCode::BAD_REQUEST,
        ));
    };

    if !media::is_video(upload.filename.as_deref(), upload.content_type.as_deref()) {
        return Err(ApiError(
            "Only video files are allowed".to_string(),
            StatusCode::BAD_REQUEST,
        ));
    }

    if let Some(emoji) = &emoji {
        // The overlay glyph is fixed for now; make requests that expect
        // otherwise visible in the logs.
        warn!(%emoji, "emoji parameter received but the overlay glyph is fixed");
    }

    let ext = media::detect_extension(upload.filename.as_deref(), upload.content_type.as_deref());
    let media_type = upload
        .content_type
        .unwrap_or_else(|| media::DEFAULT_MEDIA_TYPE.to_string());

    let service = OverlayService::new(&state.config);
    let processed = service
        .add_emoji(&upload.data, &ext)
        .await
        .map_err(|e| match e {
            OverlayError::Ffmpeg { .. } | OverlayError::MissingOutput => ApiError(
                "ffmpeg processing error".to_string(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            OverlayError::Io(err) => ApiError(
                format!("I/O error: {err}"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        })?;

    let stream = processed.into_stream().await.map_err(|e| {
        ApiError(
            format!("Failed to open output: {e}"),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, media_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"output{ext}\""),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError(e.to_string(), StatusCode::INTERNAL_SERVER_ERROR))
}

#[cfg(test)]
mod tests {
    use crate::app;
    use crate::config::settings::AppConfig;
    use crate::state::AppState;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    const BOUNDARY: &str = "XTESTBOUNDARYX";

    fn test_config(ffmpeg_bin: &str) -> AppConfig {
        AppConfig {
            server_port: 0,
            ffmpeg_bin: ffmpeg_bin.to_string(),
            drawtext_font: "/tmp/test-font.ttf".to_string(),
        }
    }

    async fn test_app(ffmpeg_bin: &str) -> axum::Router {
        app::create_app(AppState::new(test_config(ffmpeg_bin))).await
    }

    fn file_part(filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut part = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        part.extend_from_slice(data);
        part.extend_from_slice(b"\r\n");
        part
    }

    fn upload_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/add-emoji")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn closing(mut body: Vec<u8>) -> Vec<u8> {
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = test_app("false")
            .await
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn rejects_non_video_uploads() {
        let body = closing(file_part("notes.txt", "text/plain", b"hello"));
        let response = test_app("false")
            .await
            .oneshot(upload_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_missing_file_field() {
        let body = closing(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"emoji\"\r\n\r\n🔥\r\n")
                .into_bytes(),
        );
        let response = test_app("false")
            .await
            .oneshot(upload_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn tool_failure_maps_to_server_error() {
        // `false` exits non-zero, standing in for a broken ffmpeg.
        let body = closing(file_part("clip.mp4", "video/mp4", b"bytes"));
        let response = test_app("false")
            .await
            .oneshot(upload_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn accepts_video_by_extension_alone() {
        // Declared type is opaque, but the .mp4 suffix is enough to get
        // past validation and reach the tool.
        let body = closing(file_part("clip.mp4", "application/octet-stream", b"bytes"));
        let response = test_app("false")
            .await
            .oneshot(upload_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
