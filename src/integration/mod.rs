//! Host integration layer.
//!
//! Connects a resolved [`StripConfig`] to whatever renders the page:
//!
//! ```text
//! StripConfig ──► Integration::install(ctx, pipeline)
//!                   ├─ provider flags ──► suppress_structured_data_provider()
//!                   └─ text flags     ──► wrap_response_body()  (Page context only)
//! ```
//!
//! # Hosts
//!
//! | Host               | Purpose                                           |
//! |--------------------|---------------------------------------------------|
//! | `HookRegistry`     | In-process action/filter registry (callback host) |
//! | `RenderedPipeline` | Already rendered HTML (`strip`, `serve`)          |
//!
//! Whole-body interception goes through [`ResponseBuffer`].

mod buffer;
mod hooks;
mod provider;
mod rendered;

pub use buffer::ResponseBuffer;
pub use provider::{IntegrationPoint, Provider};
pub use rendered::RenderedPipeline;

use crate::{
    debug,
    strip::{StripConfig, rewrite, strip},
};
use std::borrow::Cow;

// ============================================================================
// Render context
// ============================================================================

/// What kind of output is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderContext {
    /// Front-end page.
    Page,
    /// Dashboard / admin screen.
    Admin,
    /// RSS/Atom feed.
    Feed,
    /// Transactional email body.
    Email,
}

impl RenderContext {
    /// Classify a request URL (path plus optional query).
    ///
    /// `admin_prefixes` are URL path prefixes such as `/wp-admin`.
    pub fn from_request(url: &str, admin_prefixes: &[String]) -> Self {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));

        if admin_prefixes.iter().any(|prefix| is_under(path, prefix)) {
            return Self::Admin;
        }
        if is_feed_path(path) || has_feed_param(query) {
            return Self::Feed;
        }
        Self::Page
    }

    /// Only front-end pages have their body rewritten.
    pub const fn is_filterable(self) -> bool {
        matches!(self, Self::Page)
    }
}

/// `path` equals `prefix` or lies below it.
fn is_under(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn is_feed_path(path: &str) -> bool {
    // `/feed/index.html` is the file behind `/feed/`
    let path = match path.rsplit_once('/') {
        Some((dir, "index.html" | "index.htm")) => dir,
        _ => path,
    };
    let trimmed = path.trim_end_matches('/');
    if trimmed == "/feed" || trimmed.ends_with("/feed") || trimmed == "feed" {
        return true;
    }
    let ext = trimmed.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    matches!(ext.as_deref(), Some("xml" | "rss" | "atom"))
}

fn has_feed_param(query: &str) -> bool {
    query
        .split('&')
        .any(|pair| pair.split('=').next() == Some("feed"))
}

// ============================================================================
// Pipeline capability
// ============================================================================

/// Whole-body transform handed to a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyFilter {
    config: StripConfig,
}

impl BodyFilter {
    pub const fn new(config: StripConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &StripConfig {
        &self.config
    }

    pub fn apply<'a>(&self, html: &'a str) -> Cow<'a, str> {
        strip(html, &self.config)
    }

    /// Apply to a possibly owned body, keeping the borrow when untouched.
    pub fn apply_cow<'a>(&self, html: Cow<'a, str>) -> Cow<'a, str> {
        rewrite(html, |s| self.apply(s))
    }
}

/// Capabilities a rendering host exposes to the integration layer.
pub trait RenderPipeline {
    /// Stop `provider` from emitting structured data at its source.
    fn suppress_structured_data_provider(&mut self, provider: Provider);

    /// Run `filter` over the complete response body before it is emitted.
    fn wrap_response_body(&mut self, filter: BodyFilter);
}

// ============================================================================
// Integration
// ============================================================================

/// What [`Integration::install`] did to a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Installation {
    pub suppressed: Vec<Provider>,
    pub wrapped: bool,
}

/// Applies a [`StripConfig`] to a rendering host.
#[derive(Debug, Clone, Copy)]
pub struct Integration {
    config: StripConfig,
}

impl Integration {
    pub const fn new(config: StripConfig) -> Self {
        Self { config }
    }

    /// Wire the configured behavior into `pipeline` for one render.
    ///
    /// Provider suppression applies in every context. The body filter is only
    /// installed for filterable contexts with at least one text pass enabled.
    pub fn install<P>(&self, ctx: RenderContext, pipeline: &mut P) -> Installation
    where
        P: RenderPipeline + ?Sized,
    {
        let mut installation = Installation::default();

        for provider in Provider::selected(&self.config) {
            pipeline.suppress_structured_data_provider(provider);
            installation.suppressed.push(provider);
        }

        if ctx.is_filterable() && self.config.has_text_passes() {
            pipeline.wrap_response_body(BodyFilter::new(self.config));
            installation.wrapped = true;
        } else {
            debug!("integration"; "body left untouched ({:?})", ctx);
        }

        installation
    }
}
