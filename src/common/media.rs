use std::path::Path;

pub const DEFAULT_EXTENSION: &str = ".mp4";
pub const DEFAULT_MEDIA_TYPE: &str = "video/mp4";

/// Extension for the uploaded file, dot included. Filename suffix wins,
/// then a guess from the declared content type, then `.mp4`.
pub fn detect_extension(filename: Option<&str>, content_type: Option<&str>) -> String {
    if let Some(name) = filename {
        // `extension()` yields Some("") for names like "clip."; treat
        // that the same as no suffix at all.
        if let Some(ext) = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
        {
            return format!(".{}", ext.to_ascii_lowercase());
        }
    }

    if let Some(ct) = content_type {
        if let Some(ext) = mime_guess::get_mime_extensions_str(ct).and_then(|exts| exts.first()) {
            return format!(".{ext}");
        }
    }

    DEFAULT_EXTENSION.to_string()
}

/// A payload counts as video if the declared content type says so, or if
/// the filename extension maps to a `video/*` type.
pub fn is_video(filename: Option<&str>, content_type: Option<&str>) -> bool {
    if let Some(ct) = content_type {
        if let Ok(parsed) = ct.parse::<mime::Mime>() {
            if parsed.type_() == mime::VIDEO {
                return true;
            }
        }
    }

    if let Some(name) = filename {
        if let Some(guessed) = mime_guess::from_path(name).first() {
            return guessed.type_() == mime::VIDEO;
        }
    }

    false
}
