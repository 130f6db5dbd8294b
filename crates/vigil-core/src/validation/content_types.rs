//! Extension to MIME type lookup

/// Canonical MIME type for a lowercase file extension (without the dot).
pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    let content_type = match extension.to_lowercase().as_str() {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        // Videos
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "ogg" => "audio/ogg",
        // Documents
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "eml" => "message/rfc822",
        "zip" => "application/zip",
        _ => return None,
    };
    Some(content_type)
}

/// Content type for a file name, falling back to `application/octet-stream`.
pub fn content_type_for_name(name: &str) -> &'static str {
    std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(content_type_for_extension)
        .unwrap_or("application/octet-stream")
}
