//! Industry registry: the read-only reference dataset.
//!
//! The dataset lives in `data/registry.toml` and is compiled into the binary.
//! It is parsed and validated once, then passed by shared reference to the
//! classifier and resolvers. Nothing in here mutates after construction.
//!
//! ## Industry lookup
//!
//! Free-text industry names resolve to a canonical key in four tiers:
//!
//! 1. **Exact**: the normalized input is a canonical key (`"Yoga"` → `yoga`)
//! 2. **Alias**: the normalized input is a registered alias (`"Cafe"` → `coffee-cafe`)
//! 3. **Substring**: a known key or alias is contained in the input
//!    (`"specialty coffee roasters"` → `coffee-cafe`), or the input is contained
//!    in one (`"dent"` → `dental`)
//! 4. **Default**: nothing matched, resolve to `default`
//!
//! Lookup never fails. Every key it returns exists in the registry.
//!
//! ## Image sets
//!
//! [`Registry::get_image_set`] falls back from the requested category to the
//! industry's `primary` set, then to the `default` industry's `primary` set.
//! Validation guarantees the last step is never empty.

use crate::naming::normalize_key;
use crate::theme::{COLOR_FIELDS, SPACING_FIELDS, TYPOGRAPHY_FIELDS};
use crate::types::{Feature, FeatureFlags, ImageryStyle, ListingKind, PageKind};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

/// Canonical key every unmatched industry resolves to.
pub const DEFAULT_INDUSTRY: &str = "default";

/// Inputs shorter than this never substring-match.
const MIN_SUBSTRING_LEN: usize = 3;

/// Known keys at least this long may match mid-word; shorter ones need dash boundaries.
const LOOSE_CONTAINMENT_LEN: usize = 5;

const BUILTIN_DATASET: &str = include_str!("../data/registry.toml");

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("registry TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("registry validation error: {0}")]
    Validation(String),
}

// =============================================================================
// Dataset records
// =============================================================================

/// How the hero section of an archetype is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeroKind {
    FullBleed,
    Split,
    Centered,
    OverlayCard,
    Minimal,
}

impl HeroKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HeroKind::FullBleed => "full-bleed",
            HeroKind::Split => "split",
            HeroKind::Centered => "centered",
            HeroKind::OverlayCard => "overlay-card",
            HeroKind::Minimal => "minimal",
        }
    }
}

/// Section types a page can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    Hero,
    FeaturedItems,
    MenuList,
    AboutStory,
    Testimonials,
    Stats,
    GalleryGrid,
    ContactDetails,
    MapPlaceholder,
    LoyaltyBanner,
    CtaBand,
}

impl SectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::FeaturedItems => "featured-items",
            SectionKind::MenuList => "menu-list",
            SectionKind::AboutStory => "about-story",
            SectionKind::Testimonials => "testimonials",
            SectionKind::Stats => "stats",
            SectionKind::GalleryGrid => "gallery-grid",
            SectionKind::ContactDetails => "contact-details",
            SectionKind::MapPlaceholder => "map-placeholder",
            SectionKind::LoyaltyBanner => "loyalty-banner",
            SectionKind::CtaBand => "cta-band",
        }
    }
}

/// One entry in a page's ordered section list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionDescriptor {
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub layout: String,
    /// Number of slots a list-shaped section renders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<usize>,
    /// Section is dropped unless this feature is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<Feature>,
}

/// A full substitution palette for dark or medium mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModePalette {
    pub background: String,
    pub surface: String,
    pub text: String,
    pub text_muted: String,
    pub border: String,
}

impl ModePalette {
    /// Field name / value pairs, keyed like the theme's color fields.
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("background", self.background.as_str()),
            ("surface", self.surface.as_str()),
            ("text", self.text.as_str()),
            ("text_muted", self.text_muted.as_str()),
            ("border", self.border.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Modes {
    pub dark: ModePalette,
    pub medium: ModePalette,
}

/// Archetype style block. Partial by design: missing fields fall through to
/// the theme resolver's final fallback.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchetypeStyle {
    pub vibe: String,
    #[serde(default)]
    pub imagery: ImageryStyle,
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub typography: BTreeMap<String, String>,
    #[serde(default)]
    pub spacing: BTreeMap<String, String>,
    pub dark: Option<ModePalette>,
    pub medium: Option<ModePalette>,
}

/// Default hero copy for one page kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyBlock {
    pub headline: Option<String>,
    pub subheadline: Option<String>,
    pub cta: Option<String>,
    pub secondary_cta: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

/// Archetype-specific default copy. Page tables (`[copy.home]`) sit beside
/// the list defaults; anything missing falls back to the stock copy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchetypeCopy {
    #[serde(default)]
    pub about: Vec<String>,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(flatten)]
    pub pages: BTreeMap<String, CopyBlock>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Archetype {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub best_for: Vec<String>,
    pub hero: HeroKind,
    pub style: ArchetypeStyle,
    #[serde(default)]
    pub copy: ArchetypeCopy,
    #[serde(default)]
    pages: BTreeMap<String, Vec<SectionDescriptor>>,
}

impl Archetype {
    /// Copy declared by this archetype for one page, if any.
    pub fn page_copy(&self, page: PageKind) -> Option<&CopyBlock> {
        self.copy.pages.get(page.as_str())
    }

    /// Section order this archetype declares for `page`, if it declares one.
    pub fn declared_sections(&self, page: PageKind) -> Option<&[SectionDescriptor]> {
        self.pages.get(page.as_str()).map(Vec::as_slice)
    }
}

/// One first-match classifier rule.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
    pub archetype: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyFeatures {
    pub order_button: bool,
    pub booking_button: bool,
    pub listing: ListingKind,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureOverrides {
    pub order_button: Option<bool>,
    pub booking_button: Option<bool>,
    pub listing: Option<ListingKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuItem {
    pub name: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuCategory {
    pub name: String,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Family {
    pub default_archetype: String,
    #[serde(default)]
    pub rules: Vec<KeywordRule>,
    pub pages: Vec<PageKind>,
    pub features: FamilyFeatures,
    pub menu: Vec<MenuCategory>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Industry {
    pub display_name: String,
    pub family: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub images: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub menu: Vec<MenuCategory>,
    #[serde(default)]
    pub features: FeatureOverrides,
}

/// Stock list content used when neither the archetype nor the caller has any.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StockContent {
    pub hours: String,
    pub about: Vec<String>,
    pub testimonials: Vec<Testimonial>,
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
struct GlobalFeatures {
    loyalty_banner: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Dataset {
    features: GlobalFeatures,
    modes: Modes,
    families: BTreeMap<String, Family>,
    industries: BTreeMap<String, Industry>,
    archetypes: BTreeMap<String, Archetype>,
    page_layouts: BTreeMap<String, Vec<SectionDescriptor>>,
    page_copy: BTreeMap<String, CopyBlock>,
    stock: StockContent,
}

// =============================================================================
// Lookup results
// =============================================================================

/// Which lookup tier produced a canonical industry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchTier {
    Exact,
    Alias,
    Substring,
    Default,
}

impl MatchTier {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::Alias => "alias",
            MatchTier::Substring => "substring",
            MatchTier::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndustryMatch {
    pub key: String,
    pub tier: MatchTier,
}

// =============================================================================
// Registry
// =============================================================================

/// The validated reference dataset.
#[derive(Debug, Clone)]
pub struct Registry {
    loyalty_banner: bool,
    modes: Modes,
    families: BTreeMap<String, Family>,
    industries: BTreeMap<String, Industry>,
    archetypes: BTreeMap<String, Archetype>,
    page_layouts: BTreeMap<String, Vec<SectionDescriptor>>,
    page_copy: BTreeMap<String, CopyBlock>,
    stock: StockContent,
    /// Normalized alias → canonical key.
    aliases: BTreeMap<String, String>,
    /// Copies of the default industry and its family, returned for keys the
    /// maps do not hold.
    fallback_industry: Industry,
    fallback_family: Family,
}

impl Registry {
    /// The dataset compiled into the binary.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_toml_str(BUILTIN_DATASET)
    }

    /// Parse and validate a dataset from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self, RegistryError> {
        let dataset: Dataset = toml::from_str(raw)?;

        let mut archetypes = dataset.archetypes;
        for (id, archetype) in archetypes.iter_mut() {
            archetype.id = id.clone();
        }

        let mut aliases = BTreeMap::new();
        for (key, industry) in &dataset.industries {
            for alias in &industry.aliases {
                let alias = normalize_key(alias);
                if let Some(previous) = aliases.insert(alias.clone(), key.clone()) {
                    return Err(RegistryError::Validation(format!(
                        "alias '{alias}' is claimed by both '{previous}' and '{key}'"
                    )));
                }
            }
        }

        let Some(fallback_industry) = dataset.industries.get(DEFAULT_INDUSTRY).cloned() else {
            return Err(RegistryError::Validation(format!(
                "industry '{DEFAULT_INDUSTRY}' is missing"
            )));
        };
        let Some(fallback_family) = dataset.families.get(&fallback_industry.family).cloned()
        else {
            return Err(RegistryError::Validation(format!(
                "industry '{DEFAULT_INDUSTRY}' names unknown family '{}'",
                fallback_industry.family
            )));
        };

        let registry = Self {
            loyalty_banner: dataset.features.loyalty_banner,
            modes: dataset.modes,
            families: dataset.families,
            industries: dataset.industries,
            archetypes,
            page_layouts: dataset.page_layouts,
            page_copy: dataset.page_copy,
            stock: dataset.stock,
            aliases,
            fallback_industry,
            fallback_family,
        };
        registry.validate()?;
        Ok(registry)
    }

    /// Check cross-references inside the dataset.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let fail = |msg: String| Err(RegistryError::Validation(msg));

        let Some(default) = self.industries.get(DEFAULT_INDUSTRY) else {
            return fail(format!("industry '{DEFAULT_INDUSTRY}' is missing"));
        };
        if default.images.get("primary").is_none_or(Vec::is_empty) {
            return fail(format!(
                "industry '{DEFAULT_INDUSTRY}' needs a non-empty primary image set"
            ));
        }

        for (key, industry) in &self.industries {
            if normalize_key(key) != *key {
                return fail(format!("industry key '{key}' is not normalized"));
            }
            if !self.families.contains_key(&industry.family) {
                return fail(format!(
                    "industry '{key}' names unknown family '{}'",
                    industry.family
                ));
            }
        }
        for (alias, key) in &self.aliases {
            if self.industries.contains_key(alias) {
                return fail(format!("alias '{alias}' of '{key}' shadows an industry key"));
            }
        }

        for (name, family) in &self.families {
            if !self.archetypes.contains_key(&family.default_archetype) {
                return fail(format!(
                    "family '{name}' defaults to unknown archetype '{}'",
                    family.default_archetype
                ));
            }
            for (i, rule) in family.rules.iter().enumerate() {
                if !self.archetypes.contains_key(&rule.archetype) {
                    return fail(format!(
                        "family '{name}' rule {i} targets unknown archetype '{}'",
                        rule.archetype
                    ));
                }
                if rule.keywords.iter().all(|k| k.trim().is_empty()) {
                    return fail(format!("family '{name}' rule {i} has no keywords"));
                }
            }
            if family.pages.is_empty() || family.pages[0] != PageKind::Home {
                return fail(format!("family '{name}' page set must start with home"));
            }
            if family.menu.iter().all(|c| c.items.is_empty()) {
                return fail(format!("family '{name}' needs a default menu"));
            }
        }

        for page in PageKind::ALL {
            if !self.page_layouts.contains_key(page.as_str()) {
                return fail(format!("no stock layout for page '{page}'"));
            }
            if !self.page_copy.contains_key(page.as_str()) {
                return fail(format!("no stock copy for page '{page}'"));
            }
        }
        check_page_keys("page_layouts", self.page_layouts.keys())?;
        check_page_keys("page_copy", self.page_copy.keys())?;

        if self.stock.about.is_empty()
            || self.stock.testimonials.is_empty()
            || self.stock.stats.is_empty()
        {
            return fail("stock about, testimonials and stats must be non-empty".into());
        }

        for (id, archetype) in &self.archetypes {
            check_page_keys(&format!("archetype '{id}' pages"), archetype.pages.keys())?;
            check_page_keys(&format!("archetype '{id}' copy"), archetype.copy.pages.keys())?;
            check_fields(id, "colors", &archetype.style.colors, COLOR_FIELDS)?;
            check_fields(id, "typography", &archetype.style.typography, TYPOGRAPHY_FIELDS)?;
            check_fields(id, "spacing", &archetype.style.spacing, SPACING_FIELDS)?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Industry lookup
    // -------------------------------------------------------------------------

    /// Resolve free text to a canonical industry key. Never fails.
    pub fn lookup_industry(&self, raw: &str) -> String {
        self.match_industry(raw).key
    }

    /// Resolve free text to a canonical key and report which tier matched.
    pub fn match_industry(&self, raw: &str) -> IndustryMatch {
        let key = normalize_key(raw);
        let found = |key: &str, tier| IndustryMatch {
            key: key.to_string(),
            tier,
        };

        if self.industries.contains_key(&key) {
            return found(&key, MatchTier::Exact);
        }
        if let Some(canonical) = self.aliases.get(&key) {
            debug!(input = raw, industry = %canonical, "industry resolved by alias");
            return found(canonical.as_str(), MatchTier::Alias);
        }
        if let Some(canonical) = self.substring_match(&key) {
            debug!(input = raw, industry = canonical, "industry resolved by substring");
            return found(canonical, MatchTier::Substring);
        }
        if !key.is_empty() {
            debug!(input = raw, "unknown industry; using default");
        }
        found(DEFAULT_INDUSTRY, MatchTier::Default)
    }

    /// Every canonical key and alias paired with the key it resolves to.
    fn match_candidates(&self) -> impl Iterator<Item = (&str, &str)> {
        self.industries
            .keys()
            .filter(|k| k.as_str() != DEFAULT_INDUSTRY)
            .map(|k| (k.as_str(), k.as_str()))
            .chain(self.aliases.iter().map(|(a, k)| (a.as_str(), k.as_str())))
    }

    fn substring_match(&self, key: &str) -> Option<&str> {
        if key.len() < MIN_SUBSTRING_LEN {
            return None;
        }
        let bounded = format!("-{key}-");

        // Known candidate inside the input: whole words first, then longest.
        let inside_input = self
            .match_candidates()
            .filter(|(cand, _)| cand.len() >= MIN_SUBSTRING_LEN)
            .filter_map(|(cand, canonical)| {
                let whole_word = bounded.contains(&format!("-{cand}-"));
                let loose = cand.len() >= LOOSE_CONTAINMENT_LEN && key.contains(cand);
                (whole_word || loose)
                    .then_some((!whole_word, Reverse(cand.len()), cand, canonical))
            })
            .min();
        if let Some((_, _, _, canonical)) = inside_input {
            return Some(canonical);
        }

        // Input inside a known candidate: closest (shortest) wins.
        self.match_candidates()
            .filter(|(cand, _)| cand.contains(key))
            .min_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(b.0)))
            .map(|(_, canonical)| canonical)
    }

    /// The industry record for a canonical key, or the default industry.
    pub fn industry(&self, key: &str) -> &Industry {
        self.industries.get(key).unwrap_or(&self.fallback_industry)
    }

    /// Display name for a canonical key ("Coffee Shop").
    pub fn display_name(&self, key: &str) -> &str {
        &self.industry(key).display_name
    }

    pub fn industries(&self) -> impl Iterator<Item = (&str, &Industry)> {
        self.industries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Family name and record for a canonical industry key.
    pub fn family_of(&self, key: &str) -> (&str, &Family) {
        let name = self.industry(key).family.as_str();
        match self.families.get(name) {
            Some(family) => (name, family),
            None => (&self.fallback_industry.family, &self.fallback_family),
        }
    }

    // -------------------------------------------------------------------------
    // Per-industry reference data
    // -------------------------------------------------------------------------

    /// Ordered image references for `category`, with fallback to `primary`
    /// and then to the default industry's `primary` set.
    pub fn get_image_set(&self, industry_key: &str, category: &str) -> &[String] {
        let industry = self.industry(industry_key);
        non_empty(industry.images.get(category))
            .or_else(|| non_empty(industry.images.get("primary")))
            .or_else(|| non_empty(self.fallback_industry.images.get("primary")))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Feature flags for an industry: family flags, industry overrides, and
    /// the global loyalty flag.
    pub fn features_for(&self, industry_key: &str) -> FeatureFlags {
        let (_, family) = self.family_of(industry_key);
        let overrides = self.industry(industry_key).features;
        FeatureFlags {
            order_button: overrides
                .order_button
                .unwrap_or(family.features.order_button),
            booking_button: overrides
                .booking_button
                .unwrap_or(family.features.booking_button),
            loyalty_banner: self.loyalty_banner,
            listing: overrides.listing.unwrap_or(family.features.listing),
        }
    }

    /// Default offerings: the industry's own menu, else its family's.
    pub fn default_menu(&self, industry_key: &str) -> &[MenuCategory] {
        let industry = self.industry(industry_key);
        if industry.menu.iter().any(|c| !c.items.is_empty()) {
            return &industry.menu;
        }
        &self.family_of(industry_key).1.menu
    }

    /// Default page set for a site in this industry.
    pub fn pages_for(&self, industry_key: &str) -> &[PageKind] {
        &self.family_of(industry_key).1.pages
    }

    // -------------------------------------------------------------------------
    // Archetypes and page structure
    // -------------------------------------------------------------------------

    pub fn archetype(&self, id: &str) -> Option<&Archetype> {
        self.archetypes.get(id)
    }

    pub fn archetypes(&self) -> impl Iterator<Item = &Archetype> {
        self.archetypes.values()
    }

    /// Section order for a page: the archetype's own, else the stock layout.
    pub fn page_sections<'a>(
        &'a self,
        archetype: &'a Archetype,
        page: PageKind,
    ) -> &'a [SectionDescriptor] {
        archetype
            .declared_sections(page)
            .or_else(|| self.page_layouts.get(page.as_str()).map(Vec::as_slice))
            .unwrap_or_default()
    }

    /// Stock copy for a page kind.
    pub fn stock_copy(&self, page: PageKind) -> Option<&CopyBlock> {
        self.page_copy.get(page.as_str())
    }

    pub fn stock(&self) -> &StockContent {
        &self.stock
    }

    pub fn modes(&self) -> &Modes {
        &self.modes
    }
}

fn non_empty(set: Option<&Vec<String>>) -> Option<&Vec<String>> {
    set.filter(|s| !s.is_empty())
}

fn check_page_keys<'a>(
    context: &str,
    keys: impl Iterator<Item = &'a String>,
) -> Result<(), RegistryError> {
    for key in keys {
        if key.parse::<PageKind>().is_err() {
            return Err(RegistryError::Validation(format!(
                "{context}: unknown page kind '{key}'"
            )));
        }
    }
    Ok(())
}

fn check_fields(
    archetype: &str,
    group: &str,
    values: &BTreeMap<String, String>,
    known: &[&str],
) -> Result<(), RegistryError> {
    let known: BTreeSet<&str> = known.iter().copied().collect();
    match values.keys().find(|k| !known.contains(k.as_str())) {
        Some(unknown) => Err(RegistryError::Validation(format!(
            "archetype '{archetype}' style.{group} has unknown field '{unknown}'"
        ))),
        None => Ok(()),
    }
}
