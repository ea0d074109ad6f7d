//! Scoped whole-body interception.
//!
//! ```text
//! buffer() ──► write()* ──► finish()
//!                            └─ pipeline.render() runs exactly once
//! ```
//!
//! `finish` consumes the buffer, so a body can never be filtered twice, and
//! nothing is emitted before the complete body has been captured.

use super::RenderedPipeline;
use std::borrow::Cow;
use std::io;

/// Captures a complete response body before filtering it.
pub struct ResponseBuffer<'p> {
    pipeline: &'p RenderedPipeline,
    body: Vec<u8>,
}

impl<'p> ResponseBuffer<'p> {
    pub fn new(pipeline: &'p RenderedPipeline) -> Self {
        Self {
            pipeline,
            body: Vec::new(),
        }
    }

    /// Bytes captured so far.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Filter the captured body and release it.
    ///
    /// Bodies that are not valid UTF-8 are released unchanged.
    pub fn finish(self) -> Vec<u8> {
        if self.pipeline.is_passthrough() {
            return self.body;
        }
        match String::from_utf8(self.body) {
            Ok(html) => {
                let rendered = match self.pipeline.render(&html) {
                    Cow::Borrowed(_) => None,
                    Cow::Owned(rendered) => Some(rendered),
                };
                rendered.unwrap_or(html).into_bytes()
            }
            Err(err) => err.into_bytes(),
        }
    }
}

impl io::Write for ResponseBuffer<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
