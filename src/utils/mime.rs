//! MIME type detection for served files.

use std::path::Path;

/// Common MIME type constants.
pub mod types {
    // Text
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const JSON: &str = "application/json";
    pub const XML: &str = "application/xml";

    // Web feeds
    pub const RSS: &str = "application/rss+xml";
    pub const ATOM: &str = "application/atom+xml";

    pub const PDF: &str = "application/pdf";
    pub const OCTET_STREAM: &str = "application/octet-stream";
    pub const WASM: &str = "application/wasm";

    // Images
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const AVIF: &str = "image/avif";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";

    // Media
    pub const MP3: &str = "audio/mpeg";
    pub const MP4: &str = "video/mp4";
    pub const WEBM: &str = "video/webm";

    // Fonts
    pub const WOFF: &str = "font/woff";
    pub const WOFF2: &str = "font/woff2";
    pub const TTF: &str = "font/ttf";
    pub const OTF: &str = "font/otf";
}

/// Guess MIME type from file extension (case-insensitive).
pub fn from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("html" | "htm") => types::HTML,
        Some("txt") => types::PLAIN,
        Some("css") => types::CSS,
        Some("js" | "mjs") => types::JAVASCRIPT,
        Some("json" | "jsonld") => types::JSON,
        Some("xml" | "xsl") => types::XML,
        Some("rss") => types::RSS,
        Some("atom") => types::ATOM,
        Some("pdf") => types::PDF,
        Some("wasm") => types::WASM,
        Some("png") => types::PNG,
        Some("jpg" | "jpeg") => types::JPEG,
        Some("gif") => types::GIF,
        Some("webp") => types::WEBP,
        Some("avif") => types::AVIF,
        Some("svg") => types::SVG,
        Some("ico") => types::ICO,
        Some("mp3") => types::MP3,
        Some("mp4" | "m4v") => types::MP4,
        Some("webm") => types::WEBM,
        Some("woff") => types::WOFF,
        Some("woff2") => types::WOFF2,
        Some("ttf") => types::TTF,
        Some("otf") => types::OTF,
        _ => types::OCTET_STREAM,
    }
}
