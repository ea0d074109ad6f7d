//! Structured-data inventory for a page.

use super::pattern;
use regex::Regex;
use serde::Serialize;
use std::ops::AddAssign;

/// Counts of structured-data constructs found in HTML.
///
/// Counted with the same patterns the stripper uses, regardless of which
/// modes are enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Findings {
    /// Microdata attribute declarations.
    pub microdata: usize,
    /// RDFa attribute declarations.
    pub rdfa: usize,
    /// JSON-LD script blocks (Yoast blocks included).
    pub jsonld: usize,
    /// JSON-LD blocks emitted by Yoast SEO.
    pub yoast: usize,
}

impl Findings {
    /// Total constructs. Yoast blocks are already part of `jsonld`.
    pub const fn total(&self) -> usize {
        self.microdata + self.rdfa + self.jsonld
    }

    pub const fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl AddAssign for Findings {
    fn add_assign(&mut self, rhs: Self) {
        self.microdata += rhs.microdata;
        self.rdfa += rhs.rdfa;
        self.jsonld += rhs.jsonld;
        self.yoast += rhs.yoast;
    }
}

/// Count every structured-data construct in `html`.
pub fn scan(html: &str) -> Findings {
    Findings {
        microdata: count(&*pattern::MICRODATA, html),
        rdfa: count(&*pattern::RDFA, html),
        jsonld: pattern::JSONLD.find_iter(html).count(),
        yoast: pattern::YOAST.find_iter(html).count(),
    }
}

fn count(group: &[Regex], html: &str) -> usize {
    group.iter().map(|re| re.find_iter(html).count()).sum()
}
