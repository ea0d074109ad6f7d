//! Compiled structured-data patterns.
//!
//! All patterns are raw text matchers. They do not parse the DOM, so an
//! `itemprop="..."` inside a text node or an inline script is matched too.
//!
//! | Pattern    | Matches                                                      |
//! |------------|--------------------------------------------------------------|
//! | `MICRODATA`| `itemscope` (valued or bare), then `itemtype="…"`, `itemprop="…"` |
//! | `RDFA`     | `property="…"`, then `typeof="…"`                             |
//! | `JSONLD`   | `<script type="application/ld+json">…</script>`               |
//! | `YOAST`    | JSON-LD blocks tagged `class="yoast-schema-graph"`            |
//!
//! Attribute patterns are not anchored to a word start, so `data-itemprop="x"`
//! loses its `itemprop="x"` part. Each group is applied one pattern at a time,
//! in order, so a removal that joins the pieces of a later pattern is still
//! caught.

use regex::Regex;
use std::sync::LazyLock;

/// Microdata attribute declarations, in application order.
///
/// `itemscope` is a boolean attribute and usually appears without a value.
/// Only the bare form needs word boundaries.
pub static MICRODATA: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r#"(?i)itemscope="[^"]*"|\bitemscope\b"#).unwrap(),
        Regex::new(r#"(?i)itemtype="[^"]*""#).unwrap(),
        Regex::new(r#"(?i)itemprop="[^"]*""#).unwrap(),
    ]
});

/// RDFa attribute declarations, in application order.
pub static RDFA: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r#"(?i)property="[^"]*""#).unwrap(),
        Regex::new(r#"(?i)typeof="[^"]*""#).unwrap(),
    ]
});

/// JSON-LD script elements, content included.
///
/// Non-greedy up to the nearest closing tag so adjacent blocks never merge.
pub static JSONLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<script\b[^>]*\btype\s*=\s*["']?application/ld\+json["']?[^>]*>.*?</script\s*>"#,
    )
    .unwrap()
});

/// JSON-LD blocks emitted by Yoast SEO (`class="yoast-schema-graph ..."`).
pub static YOAST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<script\b[^>]*\bclass\s*=\s*["'][^"']*\byoast-schema-graph\b[^"']*["'][^>]*>.*?</script\s*>"#,
    )
    .unwrap()
});

#[cfg(test)]
mod tests {
    use super::*;

    fn any_match(group: &[Regex], html: &str) -> bool {
        group.iter().any(|re| re.is_match(html))
    }

    #[test]
    fn test_microdata_bare_itemscope() {
        assert!(any_match(&*MICRODATA, "<div itemscope>"));
        assert!(any_match(&*MICRODATA, r#"<div itemscope="">"#));
        assert!(!any_match(&*MICRODATA, "<div itemscopes>"));
        assert!(!any_match(&*MICRODATA, "<div myitemscope>"));
    }

    #[test]
    fn test_microdata_valued_itemscope_unanchored() {
        let m = MICRODATA[0].find(r#"<div myitemscope="x">"#).unwrap();
        assert_eq!(m.as_str(), r#"itemscope="x""#);
    }

    #[test]
    fn test_microdata_case_insensitive() {
        assert!(any_match(&*MICRODATA, r#"<a itemProp="url">"#));
        assert!(any_match(&*MICRODATA, r#"<a ITEMTYPE="x">"#));
    }

    #[test]
    fn test_microdata_requires_double_quotes() {
        assert!(!any_match(&*MICRODATA, "<a itemprop='url'>"));
        assert!(!any_match(&*MICRODATA, "<a itemprop=url>"));
    }

    #[test]
    fn test_rdfa_one_pattern_per_attribute() {
        let html = r#"<p property="a" typeof="b">"#;
        assert_eq!(RDFA[0].find_iter(html).count(), 1);
        assert_eq!(RDFA[1].find_iter(html).count(), 1);
    }

    #[test]
    fn test_jsonld_spans_newlines() {
        let html = "<SCRIPT TYPE=\"Application/LD+JSON\">\n{\n}\n</SCRIPT>";
        assert!(JSONLD.is_match(html));
    }

    #[test]
    fn test_jsonld_ignores_other_scripts() {
        assert!(!JSONLD.is_match(r#"<script type="text/javascript">x</script>"#));
        assert!(!JSONLD.is_match("<script>var t = 'application/ld+json';</script>"));
    }

    #[test]
    fn test_jsonld_extra_attributes() {
        assert!(JSONLD.is_match(r#"<script id="s" type='application/ld+json' nonce="n">{}</script>"#));
    }

    #[test]
    fn test_yoast_class_marker() {
        let html = r#"<script type="application/ld+json" class="yoast-schema-graph yoast-schema-graph--main">{}</script>"#;
        assert!(YOAST.is_match(html));
        assert!(!YOAST.is_match(r#"<script type="application/ld+json">{}</script>"#));
    }
}
