//! Structured-data stripping.
//!
//! The transform is a pure function over a fully rendered page:
//!
//! ```text
//! html ──► microdata pass ──► rdfa pass ──► jsonld pass ──► html
//!            (if enabled)      (if enabled)   (if enabled)
//! ```
//!
//! Each pass is a raw regex substitution (see [`pattern`]). No pass ever fails,
//! and malformed markup only yields a best-effort result.
//!
//! The provider flags on [`StripConfig`] (`yoast_jsonld`, `woocommerce_*`)
//! are not text passes. They are consumed by [`crate::integration`].

pub mod pattern;
mod scan;

pub use scan::{Findings, scan};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Enabled stripping modes.
///
/// Resolved once per render from `[strip]` in `deschema.toml` plus CLI
/// overrides. Missing keys deserialize as `false` (mode disabled).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    /// Strip `itemscope`, `itemtype`, `itemprop` declarations.
    pub microdata: bool,

    /// Strip `property` and `typeof` declarations.
    pub rdfa: bool,

    /// Strip `<script type="application/ld+json">` blocks.
    #[serde(alias = "rm_jsonld")]
    pub jsonld: bool,

    /// Suppress the Yoast SEO JSON-LD provider.
    #[serde(alias = "yoastJsonld")]
    pub yoast_jsonld: bool,

    /// Deregister the WooCommerce page-footer structured data.
    #[serde(alias = "woocommerceJsonld")]
    pub woocommerce_jsonld: bool,

    /// Deregister the WooCommerce order-email structured data.
    #[serde(alias = "woocommerceMailJsonld")]
    pub woocommerce_mail_jsonld: bool,
}

impl StripConfig {
    /// Config with every text pass enabled and no provider suppressed.
    pub const fn all_text() -> Self {
        Self {
            microdata: true,
            rdfa: true,
            jsonld: true,
            yoast_jsonld: false,
            woocommerce_jsonld: false,
            woocommerce_mail_jsonld: false,
        }
    }

    /// Whether any text pass would run.
    pub const fn has_text_passes(&self) -> bool {
        self.microdata || self.rdfa || self.jsonld
    }

    /// Whether any provider suppression is requested.
    pub const fn has_provider_flags(&self) -> bool {
        self.yoast_jsonld || self.woocommerce_jsonld || self.woocommerce_mail_jsonld
    }

    /// Enabled patterns, one per attribute or block, in application order.
    fn passes(&self) -> impl Iterator<Item = &'static Regex> {
        [
            (self.microdata, pattern::MICRODATA.as_slice()),
            (self.rdfa, pattern::RDFA.as_slice()),
            (self.jsonld, std::slice::from_ref(&*pattern::JSONLD)),
        ]
        .into_iter()
        .filter(|&(enabled, _)| enabled)
        .flat_map(|(_, group)| group.iter())
    }
}

/// Remove the structured data selected by `config` from `html`.
///
/// Returns the input borrowed when nothing matched.
///
/// # Example
///
/// ```ignore
/// let config = StripConfig { rdfa: true, ..Default::default() };
/// let out = strip(r#"<span property="og:title">X</span>"#, &config);
/// assert_eq!(out, "<span >X</span>");
/// ```
pub fn strip<'a>(html: &'a str, config: &StripConfig) -> Cow<'a, str> {
    config.passes().fold(Cow::Borrowed(html), |acc, re| remove_all(acc, re))
}

/// Delete every match of `re`, keeping the borrow when there is none.
pub(crate) fn remove_all<'a>(input: Cow<'a, str>, re: &Regex) -> Cow<'a, str> {
    rewrite(input, |s| re.replace_all(s, ""))
}

/// Run a `Cow`-returning transform over a possibly owned string.
///
/// A borrowed input stays borrowed when `f` changes nothing. An owned input
/// is handed back as is instead of being copied.
pub(crate) fn rewrite<'a, F>(input: Cow<'a, str>, f: F) -> Cow<'a, str>
where
    F: for<'b> FnOnce(&'b str) -> Cow<'b, str>,
{
    match input {
        Cow::Borrowed(s) => f(s),
        Cow::Owned(s) => {
            let changed = match f(&s) {
                Cow::Borrowed(_) => None,
                Cow::Owned(changed) => Some(changed),
            };
            Cow::Owned(changed.unwrap_or(s))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT_PAGE: &str = r#"<!doctype html>
<html>
<head>
<meta property="og:title" content="Widget">
<script type="application/ld+json">{"@context":"https://schema.org","@type":"Product"}</script>
</head>
<body>
<div itemscope itemtype="http://schema.org/Product">
  <h1 itemprop="name">Widget</h1>
  <p vocab="https://schema.org/" typeof="Offer"><span property="price">9.99</span></p>
</div>
<script type="application/ld+json">
{"@type": "BreadcrumbList"}
</script>
</body>
</html>"#;

    fn config_with(f: impl FnOnce(&mut StripConfig)) -> StripConfig {
        let mut config = StripConfig::default();
        f(&mut config);
        config
    }

    // ------------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------------

    #[test]
    fn test_empty_input() {
        assert_eq!(strip("", &StripConfig::all_text()), "");
    }

    #[test]
    fn test_all_disabled_is_identity() {
        let out = strip(PRODUCT_PAGE, &StripConfig::default());
        assert_eq!(out, PRODUCT_PAGE);
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn test_provider_flags_do_not_touch_text() {
        let config = StripConfig {
            yoast_jsonld: true,
            woocommerce_jsonld: true,
            woocommerce_mail_jsonld: true,
            ..Default::default()
        };
        assert_eq!(strip(PRODUCT_PAGE, &config), PRODUCT_PAGE);
    }

    #[test]
    fn test_no_constructs_unchanged() {
        let html = "<html><body><p class=\"lead\">Hello</p><script>var a = 1;</script></body></html>";
        let out = strip(html, &StripConfig::all_text());
        assert_eq!(out, html);
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    // ------------------------------------------------------------------------
    // Microdata
    // ------------------------------------------------------------------------

    #[test]
    fn test_microdata_all_three_attributes() {
        let html = r#"<div itemscope itemtype="http://schema.org/Product" itemprop="name">Widget</div>"#;
        let out = strip(html, &config_with(|c| c.microdata = true));
        assert_eq!(out, "<div   >Widget</div>");
        assert!(!out.contains("itemtype"));
        assert!(!out.contains("itemprop"));
        assert!(!out.contains("itemscope"));
    }

    #[test]
    fn test_microdata_valued_itemscope() {
        let html = r#"<div itemscope="" itemprop="offers">x</div>"#;
        let out = strip(html, &config_with(|c| c.microdata = true));
        assert_eq!(out, "<div  >x</div>");
    }

    #[test]
    fn test_microdata_mixed_case() {
        let html = r#"<div itemType="http://schema.org/Thing" ItemProp="name">x</div>"#;
        let out = strip(html, &config_with(|c| c.microdata = true));
        assert_eq!(out, "<div  >x</div>");
    }

    #[test]
    fn test_microdata_disabled_rdfa_enabled() {
        let html = r#"<div itemscope itemtype="http://schema.org/Product">x</div>"#;
        let out = strip(html, &config_with(|c| c.rdfa = true));
        assert_eq!(out, html);
    }

    #[test]
    fn test_microdata_keeps_other_attributes() {
        let html = r#"<a class="btn" itemprop="url" href="/p">p</a>"#;
        let out = strip(html, &config_with(|c| c.microdata = true));
        assert_eq!(out, r#"<a class="btn"  href="/p">p</a>"#);
    }

    #[test]
    fn test_microdata_prefixed_attributes() {
        let html = r#"<div myitemscope="x" data-itemprop="y" xitemtype="z">a</div>"#;
        let out = strip(html, &config_with(|c| c.microdata = true));
        assert_eq!(out, "<div my data- x>a</div>");
    }

    #[test]
    fn test_microdata_prefixed_bare_itemscope_kept() {
        let html = "<div data-myitemscope>a</div>";
        let out = strip(html, &config_with(|c| c.microdata = true));
        assert_eq!(out, html);
    }

    #[test]
    fn test_microdata_joined_by_earlier_removal() {
        // Dropping `itemscope="a"` splices `item` and `type="b"` together
        let html = r#"<div itemitemscope="a"type="b">x</div>"#;
        let out = strip(html, &config_with(|c| c.microdata = true));
        assert_eq!(out, "<div >x</div>");
    }

    // ------------------------------------------------------------------------
    // RDFa
    // ------------------------------------------------------------------------

    #[test]
    fn test_rdfa_both_attributes() {
        let html = r#"<span property="og:title" typeof="Article">X</span>"#;
        let out = strip(html, &config_with(|c| c.rdfa = true));
        assert_eq!(out, "<span  >X</span>");
    }

    #[test]
    fn test_rdfa_strips_meta_property() {
        let html = r#"<meta property="og:type" content="website">"#;
        let out = strip(html, &config_with(|c| c.rdfa = true));
        assert_eq!(out, r#"<meta  content="website">"#);
    }

    #[test]
    fn test_rdfa_prefixed_attributes() {
        let html = r#"<meta og:property="og:title" data-typeof="A">"#;
        let out = strip(html, &config_with(|c| c.rdfa = true));
        assert_eq!(out, "<meta og: data->");
    }

    #[test]
    fn test_rdfa_property_removal_exposes_typeof() {
        let config = config_with(|c| c.rdfa = true);
        let html = r#"<p typproperty="a"eof="b">x</p>"#;
        let once = strip(html, &config);
        assert_eq!(once, "<p >x</p>");
        assert_eq!(strip(&once, &config), once);
    }

    #[test]
    fn test_rdfa_leaves_microdata() {
        let html = r#"<span itemprop="name" property="name">X</span>"#;
        let out = strip(html, &config_with(|c| c.rdfa = true));
        assert_eq!(out, r#"<span itemprop="name" >X</span>"#);
    }

    // ------------------------------------------------------------------------
    // JSON-LD
    // ------------------------------------------------------------------------

    #[test]
    fn test_jsonld_block_removed_trailing_kept() {
        let html = r#"<script type="application/ld+json">{"@type":"Product"}</script><p>after</p>"#;
        let out = strip(html, &config_with(|c| c.jsonld = true));
        assert_eq!(out, "<p>after</p>");
    }

    #[test]
    fn test_jsonld_disabled_preserved() {
        let html = r#"<script type="application/ld+json">{"@type":"Product"}</script><p>after</p>"#;
        let out = strip(html, &config_with(|c| c.microdata = true));
        assert_eq!(out, html);
    }

    #[test]
    fn test_jsonld_two_blocks_independent() {
        let html = concat!(
            r#"<script type="application/ld+json">{"a":1}</script>"#,
            "<p>between</p>",
            r#"<script type="application/ld+json">{"b":2}</script>"#,
        );
        let out = strip(html, &config_with(|c| c.jsonld = true));
        assert_eq!(out, "<p>between</p>");
    }

    #[test]
    fn test_jsonld_multiline_uppercase() {
        let html = "<div><SCRIPT type=\"application/ld+json\">\n{\n  \"@type\": \"Event\"\n}\n</SCRIPT></div>";
        let out = strip(html, &config_with(|c| c.jsonld = true));
        assert_eq!(out, "<div></div>");
    }

    #[test]
    fn test_jsonld_keeps_regular_scripts() {
        let html = r#"<script src="/app.js"></script><script type="application/ld+json">{}</script>"#;
        let out = strip(html, &config_with(|c| c.jsonld = true));
        assert_eq!(out, r#"<script src="/app.js"></script>"#);
    }

    #[test]
    fn test_jsonld_unclosed_block_left_alone() {
        let html = r#"<script type="application/ld+json">{"@type":"Product"}"#;
        let out = strip(html, &config_with(|c| c.jsonld = true));
        assert_eq!(out, html);
    }

    // ------------------------------------------------------------------------
    // Combined
    // ------------------------------------------------------------------------

    #[test]
    fn test_all_passes_on_full_page() {
        let out = strip(PRODUCT_PAGE, &StripConfig::all_text());
        assert!(scan(&out).is_empty());
        assert!(out.contains("<h1 >Widget</h1>"));
        assert!(out.contains(r#"<meta  content="Widget">"#));
        assert!(out.contains("</html>"));
    }

    #[test]
    fn test_idempotent() {
        let config = StripConfig::all_text();
        let once = strip(PRODUCT_PAGE, &config).into_owned();
        let twice = strip(&once, &config);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_false_positive_in_text_node() {
        let html = r#"<pre>use itemprop="name" on the title</pre>"#;
        let out = strip(html, &config_with(|c| c.microdata = true));
        assert_eq!(out, "<pre>use  on the title</pre>");
    }

    #[test]
    fn test_remove_all_keeps_owned_when_unmatched() {
        let owned: Cow<'_, str> = Cow::Owned("plain".to_string());
        let out = remove_all(owned, &pattern::RDFA[0]);
        assert!(matches!(out, Cow::Owned(ref s) if s == "plain"));
    }

    #[test]
    fn test_rewrite_keeps_borrow_when_unchanged() {
        let out = rewrite(Cow::Borrowed("plain"), |s| Cow::Borrowed(s));
        assert!(matches!(out, Cow::Borrowed("plain")));

        let out = rewrite(Cow::Borrowed("plain"), |s| Cow::Owned(s.to_uppercase()));
        assert_eq!(out, "PLAIN");
    }

    // ------------------------------------------------------------------------
    // Config
    // ------------------------------------------------------------------------

    #[test]
    fn test_config_aliases() {
        let config: StripConfig =
            toml::from_str("rm_jsonld = true\nyoastJsonld = true\nwoocommerceMailJsonld = true")
                .unwrap();
        assert!(config.jsonld);
        assert!(config.yoast_jsonld);
        assert!(config.woocommerce_mail_jsonld);
        assert!(!config.woocommerce_jsonld);
    }

    #[test]
    fn test_config_flags_summary() {
        assert!(!StripConfig::default().has_text_passes());
        assert!(StripConfig::all_text().has_text_passes());
        assert!(!StripConfig::all_text().has_provider_flags());
        assert!(config_with(|c| c.woocommerce_jsonld = true).has_provider_flags());
    }
}
