//! HTTP response handlers.

use crate::integration::RenderedPipeline;
use crate::utils::mime::types::{HTML, PLAIN};
use anyhow::{Context, Result};
use std::{fs, io, path::Path};
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Respond with a page run through `pipeline`.
///
/// The whole file is captured before anything is sent, so the client never
/// sees a partially filtered body.
pub fn respond_page(request: Request, path: &Path, pipeline: &RenderedPipeline) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 200, HTML);
    }

    let body = render_file(path, pipeline)?;
    send_body(request, 200, HTML, body)
}

/// Respond with a static file, streamed unchanged.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = crate::utils::mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    let file =
        fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let response = Response::from_file(file).with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

/// Respond with 404 page (custom `404.html` under the serve root, or plain text).
pub fn respond_not_found(
    request: Request,
    custom_404: &Path,
    pipeline: &RenderedPipeline,
) -> Result<()> {
    let has_custom = custom_404.is_file();

    if is_head_request(&request) {
        let mime = if has_custom { HTML } else { PLAIN };
        return send_head(request, 404, mime);
    }

    if has_custom
        && let Ok(body) = render_file(custom_404, pipeline)
    {
        return send_body(request, 404, HTML, body);
    }

    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

/// Read `path` into the pipeline's response buffer and filter it.
fn render_file(path: &Path, pipeline: &RenderedPipeline) -> Result<Vec<u8>> {
    let mut file =
        fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut buffer = pipeline.buffer();
    io::copy(&mut file, &mut buffer)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(buffer.finish())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response = Response::empty(StatusCode(status))
        .with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type))
        // Modes can change between requests
        .with_header(make_header("Cache-Control", "no-store"));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).expect("static header names and values are ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::{Integration, RenderContext};
    use crate::strip::StripConfig;
    use tempfile::TempDir;

    #[test]
    fn test_render_file_strips_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.html");
        fs::write(
            &path,
            "<p>x</p><script type=\"application/ld+json\">{}</script>",
        )
        .unwrap();

        let mut pipeline = RenderedPipeline::new();
        let config = StripConfig {
            jsonld: true,
            ..StripConfig::default()
        };
        Integration::new(config).install(RenderContext::Page, &mut pipeline);

        assert_eq!(render_file(&path, &pipeline).unwrap(), b"<p>x</p>");
    }

    #[test]
    fn test_render_file_missing() {
        let dir = TempDir::new().unwrap();
        let pipeline = RenderedPipeline::new();
        assert!(render_file(&dir.path().join("missing.html"), &pipeline).is_err());
    }

    #[test]
    fn test_make_header() {
        let header = make_header("Content-Type", HTML);
        assert!(header.field.equiv("content-type"));
        assert_eq!(header.value.as_str(), HTML);
    }
}
