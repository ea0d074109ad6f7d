//! Pipeline for pages that are already rendered to HTML.

use super::{BodyFilter, Provider, RenderPipeline, ResponseBuffer};
use crate::{debug, strip::remove_all};
use std::borrow::Cow;

/// Host for finished HTML (files on disk, served responses).
///
/// Providers cannot be stopped at their source here, so suppression removes
/// the provider's footprint from the output instead.
#[derive(Debug, Clone, Default)]
pub struct RenderedPipeline {
    suppressed: Vec<Provider>,
    filter: Option<BodyFilter>,
}

impl RenderedPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suppressed(&self) -> &[Provider] {
        &self.suppressed
    }

    /// Whether rendering would return every body unchanged.
    pub fn is_passthrough(&self) -> bool {
        self.filter.is_none() && self.suppressed.iter().all(|p| p.footprint().is_none())
    }

    /// Apply footprint removal, then the body filter.
    pub fn render<'a>(&self, html: &'a str) -> Cow<'a, str> {
        let out = self
            .suppressed
            .iter()
            .filter_map(|p| p.footprint())
            .fold(Cow::Borrowed(html), remove_all);

        match &self.filter {
            Some(filter) => filter.apply_cow(out),
            None => out,
        }
    }

    /// Start capturing a response body for this pipeline.
    pub fn buffer(&self) -> ResponseBuffer<'_> {
        ResponseBuffer::new(self)
    }
}

impl RenderPipeline for RenderedPipeline {
    fn suppress_structured_data_provider(&mut self, provider: Provider) {
        if provider.footprint().is_none() {
            debug!("integration"; "{provider} leaves no footprint in rendered html");
        }
        if !self.suppressed.contains(&provider) {
            self.suppressed.push(provider);
        }
    }

    fn wrap_response_body(&mut self, filter: BodyFilter) {
        self.filter = Some(filter);
    }
}
