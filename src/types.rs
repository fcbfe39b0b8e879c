//! Shared records that cross the core boundary.
//!
//! Everything here is plain data: serializable, no behavior beyond small
//! accessors. Inputs (`BusinessProfile`) come from the caller; `FeatureFlags`
//! and `ListingKind` come from the registry dataset and end up inside every
//! page specification.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// The business a site is generated for.
///
/// Every field is optional in the JSON sense: missing fields deserialize to
/// empty strings so downstream resolution never sees `null`. A profile with
/// nothing but an empty name is still a valid input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessProfile {
    pub name: String,
    pub tagline: String,
    /// Free text ("Coffee Shop", "cafe", "SaaS"), normalized by the registry.
    pub industry: String,
    pub description: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    /// Founding year. Accepts a JSON number or string.
    #[serde(deserialize_with = "string_or_number")]
    pub founded: String,
    pub hours: String,
    /// Explicit hero headline, wins over AI copy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_headline: Option<String>,
    /// Explicit primary call-to-action label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_cta: Option<String>,
    /// Hand-written about paragraphs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub about: Vec<String>,
}

impl BusinessProfile {
    pub fn new(name: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            industry: industry.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tagline(mut self, tagline: impl Into<String>) -> Self {
        self.tagline = tagline.into();
        self
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
        Null(()),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Null(()) => String::new(),
    })
}

/// One page of a generated site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    Home,
    Menu,
    Services,
    About,
    Contact,
    Gallery,
}

impl PageKind {
    pub const ALL: [PageKind; 6] = [
        PageKind::Home,
        PageKind::Menu,
        PageKind::Services,
        PageKind::About,
        PageKind::Contact,
        PageKind::Gallery,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PageKind::Home => "home",
            PageKind::Menu => "menu",
            PageKind::Services => "services",
            PageKind::About => "about",
            PageKind::Contact => "contact",
            PageKind::Gallery => "gallery",
        }
    }

    /// Output filename stem for this page (`home` is the site index).
    pub fn file_stem(self) -> &'static str {
        match self {
            PageKind::Home => "index",
            other => other.as_str(),
        }
    }

    /// HTML filename, used for navigation links.
    pub fn file_name(self) -> String {
        format!("{}.html", self.file_stem())
    }

    /// Human label used in navigation.
    pub fn label(self) -> &'static str {
        match self {
            PageKind::Home => "Home",
            PageKind::Menu => "Menu",
            PageKind::Services => "Services",
            PageKind::About => "About",
            PageKind::Contact => "Contact",
            PageKind::Gallery => "Gallery",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PageKind::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| s.to_string())
    }
}

/// Photographic treatment requested by AI imagery guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ImageryStyle {
    MoodyDark,
    BrightAiry,
    SoftMuted,
    HighContrast,
    #[default]
    NaturalLight,
}

impl ImageryStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageryStyle::MoodyDark => "moody-dark",
            ImageryStyle::BrightAiry => "bright-airy",
            ImageryStyle::SoftMuted => "soft-muted",
            ImageryStyle::HighContrast => "high-contrast",
            ImageryStyle::NaturalLight => "natural-light",
        }
    }

    /// Parse a style name, tolerating case, spaces and underscores.
    /// Unknown names return `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = crate::naming::normalize_key(raw);
        [
            ImageryStyle::MoodyDark,
            ImageryStyle::BrightAiry,
            ImageryStyle::SoftMuted,
            ImageryStyle::HighContrast,
            ImageryStyle::NaturalLight,
        ]
        .into_iter()
        .find(|s| s.as_str() == key)
    }

    /// Overlay opacity laid over hero imagery.
    pub fn overlay_opacity(self) -> f32 {
        match self {
            ImageryStyle::MoodyDark => 0.55,
            ImageryStyle::BrightAiry => 0.15,
            ImageryStyle::SoftMuted => 0.3,
            ImageryStyle::HighContrast => 0.4,
            ImageryStyle::NaturalLight => 0.2,
        }
    }

    /// CSS `filter` applied to imagery.
    pub fn css_filter(self) -> &'static str {
        match self {
            ImageryStyle::MoodyDark => "brightness(0.85) contrast(1.1)",
            ImageryStyle::BrightAiry => "brightness(1.05) saturate(0.95)",
            ImageryStyle::SoftMuted => "saturate(0.8)",
            ImageryStyle::HighContrast => "contrast(1.2)",
            ImageryStyle::NaturalLight => "none",
        }
    }
}

/// How a business presents what it sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ListingKind {
    Menu,
    #[default]
    Services,
    Classes,
    Listings,
}

/// Feature toggles attached to every page of a site.
///
/// Loyalty applies to every industry; ordering, booking and the listing type
/// depend on the industry family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureFlags {
    pub order_button: bool,
    pub booking_button: bool,
    pub loyalty_banner: bool,
    pub listing: ListingKind,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            order_button: false,
            booking_button: false,
            loyalty_banner: true,
            listing: ListingKind::Services,
        }
    }
}

/// A named feature a section can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    OrderButton,
    BookingButton,
    LoyaltyBanner,
}

impl FeatureFlags {
    pub fn enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::OrderButton => self.order_button,
            Feature::BookingButton => self.booking_button,
            Feature::LoyaltyBanner => self.loyalty_banner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_missing_fields_default_to_empty() {
        let p: BusinessProfile = serde_json::from_str(r#"{"name": "Bean There"}"#).unwrap();
        assert_eq!(p.name, "Bean There");
        assert_eq!(p.industry, "");
        assert_eq!(p.founded, "");
        assert!(p.hero_headline.is_none());
    }

    #[test]
    fn profile_founded_accepts_number_and_string() {
        let a: BusinessProfile = serde_json::from_str(r#"{"founded": 2012}"#).unwrap();
        let b: BusinessProfile = serde_json::from_str(r#"{"founded": "2012"}"#).unwrap();
        let c: BusinessProfile = serde_json::from_str(r#"{"founded": null}"#).unwrap();
        assert_eq!(a.founded, "2012");
        assert_eq!(b.founded, "2012");
        assert_eq!(c.founded, "");
    }

    #[test]
    fn profile_reads_camel_case_overrides() {
        let p: BusinessProfile =
            serde_json::from_str(r#"{"heroHeadline": "Hi", "secondaryCta": "Call"}"#).unwrap();
        assert_eq!(p.hero_headline.as_deref(), Some("Hi"));
        assert_eq!(p.secondary_cta.as_deref(), Some("Call"));
    }

    #[test]
    fn page_kind_parses_case_insensitively() {
        assert_eq!("Menu".parse::<PageKind>(), Ok(PageKind::Menu));
        assert_eq!(" gallery ".parse::<PageKind>(), Ok(PageKind::Gallery));
        assert!("blog".parse::<PageKind>().is_err());
    }

    #[test]
    fn home_page_is_index() {
        assert_eq!(PageKind::Home.file_name(), "index.html");
        assert_eq!(PageKind::Contact.file_name(), "contact.html");
    }

    #[test]
    fn imagery_style_parse_tolerates_formatting() {
        assert_eq!(ImageryStyle::parse("Moody Dark"), Some(ImageryStyle::MoodyDark));
        assert_eq!(ImageryStyle::parse("bright_airy"), Some(ImageryStyle::BrightAiry));
        assert_eq!(ImageryStyle::parse("sepia"), None);
    }

    #[test]
    fn feature_lookup_matches_flags() {
        let flags = FeatureFlags {
            order_button: true,
            ..Default::default()
        };
        assert!(flags.enabled(Feature::OrderButton));
        assert!(!flags.enabled(Feature::BookingButton));
        assert!(flags.enabled(Feature::LoyaltyBanner));
    }
}
