//! Third-party structured-data providers known to the integration layer.

use crate::strip::{StripConfig, pattern};
use regex::Regex;
use std::fmt;

/// Where a provider hooks into its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationPoint {
    /// A filter whose payload can be replaced.
    Filter { hook: &'static str },
    /// An action callback that can be deregistered.
    Action {
        hook: &'static str,
        callback: &'static str,
        priority: i32,
    },
}

impl IntegrationPoint {
    pub const fn hook(&self) -> &'static str {
        match self {
            Self::Filter { hook } | Self::Action { hook, .. } => *hook,
        }
    }
}

/// A structured-data emitter that can be suppressed at its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Yoast SEO schema graph (`wpseo_json_ld_output` filter).
    YoastSchema,
    /// WooCommerce structured data printed in every page footer.
    WooCommerceFooter,
    /// WooCommerce structured data embedded in order emails.
    WooCommerceEmail,
}

impl Provider {
    pub const ALL: [Self; 3] = [Self::YoastSchema, Self::WooCommerceFooter, Self::WooCommerceEmail];

    /// Host integration point of this provider.
    pub const fn point(self) -> IntegrationPoint {
        match self {
            Self::YoastSchema => IntegrationPoint::Filter {
                hook: "wpseo_json_ld_output",
            },
            Self::WooCommerceFooter => IntegrationPoint::Action {
                hook: "wp_footer",
                callback: "output_structured_data",
                priority: 10,
            },
            Self::WooCommerceEmail => IntegrationPoint::Action {
                hook: "woocommerce_email_order_details",
                callback: "output_email_structured_data",
                priority: 30,
            },
        }
    }

    /// Whether `config` asks for this provider to be suppressed.
    pub const fn enabled_in(self, config: &StripConfig) -> bool {
        match self {
            Self::YoastSchema => config.yoast_jsonld,
            Self::WooCommerceFooter => config.woocommerce_jsonld,
            Self::WooCommerceEmail => config.woocommerce_mail_jsonld,
        }
    }

    /// Pattern identifying this provider's output in an already rendered page.
    ///
    /// WooCommerce prints bare JSON-LD blocks that are indistinguishable from
    /// any other, so only Yoast leaves a footprint.
    pub fn footprint(self) -> Option<&'static Regex> {
        match self {
            Self::YoastSchema => Some(&*pattern::YOAST),
            Self::WooCommerceFooter | Self::WooCommerceEmail => None,
        }
    }

    /// Providers that `config` asks to suppress.
    pub fn selected(config: &StripConfig) -> impl Iterator<Item = Self> + '_ {
        Self::ALL.into_iter().filter(move |p| p.enabled_in(config))
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::YoastSchema => "yoast-schema",
            Self::WooCommerceFooter => "woocommerce-footer",
            Self::WooCommerceEmail => "woocommerce-email",
        };
        f.write_str(name)
    }
}
