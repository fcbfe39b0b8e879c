//! Content resolution.
//!
//! Produces the text and lists for one page from three sources, resolved
//! field by field with [`crate::precedence`]:
//!
//! | Field              | Profile          | AI                  | Default                        |
//! |--------------------|------------------|---------------------|--------------------------------|
//! | headline (home)    | `hero_headline`  | `hero.headline`     | archetype copy → stock copy    |
//! | subheadline (home) | `tagline`        | `hero.subheadline`  | archetype copy → stock copy    |
//! | primary CTA (home) | `cta`            | `hero.cta`          | archetype copy → stock copy    |
//! | secondary CTA      | `secondary_cta`  | `hero.secondaryCta` | archetype copy → stock copy    |
//! | about paragraphs   | `about`          | `about`             | archetype copy → stock copy    |
//! | featured items     |                  | menu items          | industry menu, same position   |
//! | testimonials       |                  | `testimonials`      | archetype → stock, same position |
//!
//! Hero copy on pages other than home comes from the page-kind defaults only;
//! the profile and AI hero describe the landing page.
//!
//! Default copy may contain `{name}` and `{year}`. An empty business name is
//! replaced by the industry's display name, so a nameless yoga studio reads
//! "Find your calm at Yoga Studio" rather than "Find your calm at ".

use crate::ai::{AiContent, AiMenuItem, RawPrice};
use crate::naming::fill_template;
use crate::precedence::{Resolved, Tier, fill_slots, resolve_list, resolve_or};
use crate::registry::{
    Archetype, CopyBlock, MenuCategory, MenuItem, Registry, SectionDescriptor, SectionKind, Stat,
    Testimonial,
};
use crate::types::{BusinessProfile, ListingKind, PageKind};
use serde::Serialize;

const DEFAULT_FEATURED: usize = 4;
const DEFAULT_TESTIMONIALS: usize = 3;
const DEFAULT_STATS: usize = 3;
const DEFAULT_GALLERY: usize = 6;

/// One thing the business sells, with its price already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Offering {
    pub name: String,
    /// `"$4.50"`, free text such as `"Market price"`, or empty.
    pub price: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferingGroup {
    pub name: String,
    pub items: Vec<Offering>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallToAction {
    pub label: Resolved<String>,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactDetails {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub hours: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageImages {
    pub hero: String,
    pub gallery: Vec<String>,
}

/// Fully resolved content for one page. No optional members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedContent {
    pub business_name: String,
    pub industry: String,
    pub headline: Resolved<String>,
    pub subheadline: Resolved<String>,
    pub primary_cta: CallToAction,
    pub secondary_cta: CallToAction,
    pub about: Resolved<Vec<String>>,
    pub featured: Vec<Resolved<Offering>>,
    pub menu: Resolved<Vec<OfferingGroup>>,
    pub testimonials: Vec<Resolved<Testimonial>>,
    pub stats: Vec<Stat>,
    pub contact: ContactDetails,
    pub images: PageImages,
}

/// Registry-derived defaults for one (industry, archetype, page).
#[derive(Debug, Clone)]
pub struct ContentDefaults<'a> {
    pub industry_name: &'a str,
    pub copy: Option<&'a CopyBlock>,
    pub stock_copy: Option<&'a CopyBlock>,
    pub about: &'a [String],
    pub testimonials: &'a [Testimonial],
    pub stats: &'a [Stat],
    pub hours: &'a str,
    pub menu: &'a [MenuCategory],
    pub sections: &'a [SectionDescriptor],
    pub hero_images: &'a [String],
    pub gallery_images: &'a [String],
    pub listing: ListingKind,
    /// The menu or services page of the site, if it has one.
    pub listing_page: Option<PageKind>,
}

impl<'a> ContentDefaults<'a> {
    pub fn from_registry(
        registry: &'a Registry,
        industry_key: &str,
        archetype: &'a Archetype,
        page: PageKind,
        site_pages: &[PageKind],
    ) -> Self {
        let stock = registry.stock();
        Self {
            industry_name: registry.display_name(industry_key),
            copy: archetype.page_copy(page),
            stock_copy: registry.stock_copy(page),
            about: if archetype.copy.about.is_empty() {
                &stock.about
            } else {
                &archetype.copy.about
            },
            testimonials: if archetype.copy.testimonials.is_empty() {
                &stock.testimonials
            } else {
                &archetype.copy.testimonials
            },
            stats: if archetype.copy.stats.is_empty() {
                &stock.stats
            } else {
                &archetype.copy.stats
            },
            hours: &stock.hours,
            menu: registry.default_menu(industry_key),
            sections: registry.page_sections(archetype, page),
            hero_images: registry.get_image_set(industry_key, image_category(page)),
            gallery_images: registry.get_image_set(industry_key, "gallery"),
            listing: registry.features_for(industry_key).listing,
            listing_page: site_pages
                .iter()
                .copied()
                .find(|p| matches!(p, PageKind::Menu | PageKind::Services)),
        }
    }

    /// Slot count of the first section of `kind` on this page, if present.
    fn slots(&self, kind: SectionKind, fallback: usize) -> usize {
        self.sections
            .iter()
            .find(|s| s.kind == kind)
            .map_or(0, |s| s.items.unwrap_or(fallback))
    }

    fn has_section(&self, kind: SectionKind) -> bool {
        self.sections.iter().any(|s| s.kind == kind)
    }

    /// Default copy field: archetype's page copy, then stock page copy.
    fn copy_field(&self, pick: impl Fn(&CopyBlock) -> Option<&String>) -> Option<&'a str> {
        self.copy
            .and_then(|c| pick(c))
            .or_else(|| self.stock_copy.and_then(|c| pick(c)))
            .map(String::as_str)
    }
}

/// Image category a page's hero draws from.
fn image_category(page: PageKind) -> &'static str {
    match page {
        PageKind::Gallery => "gallery",
        PageKind::About => "interior",
        _ => "primary",
    }
}

fn listing_label(listing: ListingKind) -> &'static str {
    match listing {
        ListingKind::Menu => "Menu",
        ListingKind::Services => "Services",
        ListingKind::Classes => "Classes",
        ListingKind::Listings => "Listings",
    }
}

// =============================================================================
// Price formatting
// =============================================================================

/// Format a raw price as two-decimal currency text.
///
/// Numbers are formatted directly as dollars. Text keeps its own currency
/// symbol: `"4.5"` and `"$4.50"` become `"$4.50"`, `"€4.5"` and `"4,50 €"`
/// become `"€4.50"`. Commas are thousands separators unless the text ends in
/// a one- or two-digit decimal comma. Text that still does not parse is kept
/// as written (`"Market price"`, `"$29/mo"`, `"-5"`). Blank text is `None`.
pub fn format_price(raw: &RawPrice) -> Option<String> {
    match raw {
        RawPrice::Number(n) => format_amount("$", *n),
        RawPrice::Text(text) => format_price_text(text),
    }
}

const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

/// Text branch of [`format_price`].
pub fn format_price_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let as_written = || Some(trimmed.to_string());

    let mut symbols: Vec<char> = trimmed
        .chars()
        .filter(|c| CURRENCY_SYMBOLS.contains(c))
        .collect();
    symbols.dedup();
    let symbol = match symbols.as_slice() {
        [] => '$',
        [one] => *one,
        _ => return as_written(),
    };

    let number: String = trimmed
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && !c.is_whitespace())
        .collect();
    let numeric = |c: char| c.is_ascii_digit() || c == '.' || c == ',';
    if number.is_empty() || !number.chars().all(numeric) {
        return as_written();
    }
    let decimal_comma = |whole: &str, cents: &str| {
        !number.contains('.') && !whole.contains(',') && (1..=2).contains(&cents.len())
    };
    let number = match number.rsplit_once(',') {
        Some((whole, cents)) if decimal_comma(whole, cents) => format!("{whole}.{cents}"),
        _ => number.replace(',', ""),
    };
    match number.parse::<f64>() {
        Ok(n) => format_amount(&symbol.to_string(), n).or_else(as_written),
        Err(_) => as_written(),
    }
}

fn format_amount(symbol: &str, n: f64) -> Option<String> {
    (n.is_finite() && n >= 0.0).then(|| format!("{symbol}{n:.2}"))
}

fn offering_from_ai(item: &AiMenuItem) -> Offering {
    Offering {
        name: item.name.trim().to_string(),
        price: item.price.as_ref().and_then(format_price).unwrap_or_default(),
        description: item.description.clone().unwrap_or_default(),
    }
}

fn offering_from_default(item: &MenuItem) -> Offering {
    Offering {
        name: item.name.clone(),
        price: item
            .price
            .as_deref()
            .and_then(format_price_text)
            .unwrap_or_default(),
        description: item.description.clone(),
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolve all content for `page`.
pub fn resolve_content(
    page: PageKind,
    profile: &BusinessProfile,
    ai: Option<&AiContent>,
    defaults: &ContentDefaults<'_>,
) -> ResolvedContent {
    let empty = AiContent::default();
    let ai = ai.unwrap_or(&empty);

    let name = match profile.name.trim() {
        "" => defaults.industry_name.to_string(),
        name => name.to_string(),
    };
    let fill = |template: Option<&str>| template.map(|t| fill_template(t, &name, &profile.founded));

    let is_home = page == PageKind::Home;

    let default_headline = fill(defaults.copy_field(|c| c.headline.as_ref()));
    let (p, a) = home_only(is_home, profile.hero_headline.as_deref(), ai.hero.headline.as_deref());
    let headline = resolve_or(
        &[
            (Tier::Profile, p),
            (Tier::Ai, a),
            (Tier::Default, default_headline.as_deref()),
        ],
        &name,
    );

    let default_sub = fill(defaults.copy_field(|c| c.subheadline.as_ref()));
    let (p, a) = home_only(is_home, Some(profile.tagline.as_str()), ai.hero.subheadline.as_deref());
    let subheadline = resolve_or(
        &[
            (Tier::Profile, p),
            (Tier::Ai, a),
            (Tier::Default, default_sub.as_deref()),
        ],
        defaults.industry_name,
    );

    let default_cta = fill(defaults.copy_field(|c| c.cta.as_ref()));
    let (p, a) = home_only(is_home, profile.cta.as_deref(), ai.hero.cta.as_deref());
    let primary_label = resolve_or(
        &[
            (Tier::Profile, p),
            (Tier::Ai, a),
            (Tier::Default, default_cta.as_deref()),
        ],
        "Learn More",
    );

    let default_secondary = fill(defaults.copy_field(|c| c.secondary_cta.as_ref()));
    let (p, a) = home_only(
        is_home,
        profile.secondary_cta.as_deref(),
        ai.hero.secondary_cta.as_deref(),
    );
    let secondary_label = resolve_or(
        &[
            (Tier::Profile, p),
            (Tier::Ai, a),
            (Tier::Default, default_secondary.as_deref()),
        ],
        "Contact Us",
    );

    let default_about: Vec<String> = defaults
        .about
        .iter()
        .map(|t| fill_template(t, &name, &profile.founded))
        .collect();
    let about = resolve_list(&[
        (Tier::Profile, &non_blank(&profile.about)[..]),
        (Tier::Ai, &non_blank(&ai.about)[..]),
        (Tier::Default, &default_about[..]),
    ])
    .unwrap_or_else(|| Resolved::new(Vec::new(), Tier::Default));

    let default_offerings: Vec<Offering> = defaults
        .menu
        .iter()
        .flat_map(|c| c.items.iter())
        .map(offering_from_default)
        .collect();
    let ai_offerings: Vec<Offering> = ai.menu_items().map(offering_from_ai).collect();
    let featured = fill_slots(
        &ai_offerings,
        Tier::Ai,
        &default_offerings,
        defaults.slots(SectionKind::FeaturedItems, DEFAULT_FEATURED),
    );

    let menu = if defaults.has_section(SectionKind::MenuList) {
        resolve_menu(ai, defaults)
    } else {
        Resolved::new(Vec::new(), Tier::Default)
    };

    let ai_testimonials: Vec<Testimonial> = ai
        .testimonials
        .iter()
        .map(|t| Testimonial {
            quote: t.quote.clone(),
            author: t.author.clone().unwrap_or_else(|| "A happy customer".to_string()),
        })
        .collect();
    let testimonials = fill_slots(
        &ai_testimonials,
        Tier::Ai,
        defaults.testimonials,
        defaults.slots(SectionKind::Testimonials, DEFAULT_TESTIMONIALS),
    );

    let stats = fill_slots(
        &[],
        Tier::Default,
        defaults.stats,
        defaults.slots(SectionKind::Stats, DEFAULT_STATS),
    )
    .into_iter()
    .map(|s| s.value)
    .collect();

    let gallery_count = defaults.slots(SectionKind::GalleryGrid, DEFAULT_GALLERY);
    let images = PageImages {
        hero: defaults.hero_images.first().cloned().unwrap_or_default(),
        gallery: fill_slots(&[], Tier::Default, defaults.gallery_images, gallery_count)
            .into_iter()
            .map(|s| s.value)
            .collect(),
    };

    let contact = ContactDetails {
        address: profile.address.trim().to_string(),
        phone: profile.phone.trim().to_string(),
        email: profile.email.trim().to_string(),
        hours: resolve_or(&[(Tier::Profile, Some(profile.hours.as_str()))], defaults.hours).value,
    };

    let primary_href = match (page, defaults.listing_page) {
        (PageKind::Contact, _) if !contact.phone.is_empty() => {
            format!("tel:{}", contact.phone.replace(' ', ""))
        }
        (current, Some(listing)) if current != listing => listing.file_name(),
        _ => PageKind::Contact.file_name(),
    };
    let secondary_href = match page {
        PageKind::Contact if !contact.email.is_empty() => format!("mailto:{}", contact.email),
        PageKind::Contact => PageKind::Home.file_name(),
        _ => PageKind::Contact.file_name(),
    };

    ResolvedContent {
        business_name: name,
        industry: defaults.industry_name.to_string(),
        headline,
        subheadline,
        primary_cta: CallToAction {
            label: primary_label,
            href: primary_href,
        },
        secondary_cta: CallToAction {
            label: secondary_label,
            href: secondary_href,
        },
        about,
        featured,
        menu,
        testimonials,
        stats,
        contact,
        images,
    }
}

/// Profile and AI hero copy only describe the landing page.
fn home_only<'a>(
    is_home: bool,
    profile: Option<&'a str>,
    ai: Option<&'a str>,
) -> (Option<&'a str>, Option<&'a str>) {
    if is_home { (profile, ai) } else { (None, None) }
}

/// Full menu: AI categories when the AI supplied any items, else the
/// industry's default menu. The menu is replaced whole, not merged.
fn resolve_menu(ai: &AiContent, defaults: &ContentDefaults<'_>) -> Resolved<Vec<OfferingGroup>> {
    let label = listing_label(defaults.listing);
    let ai_groups: Vec<OfferingGroup> = ai
        .menu
        .iter()
        .filter(|c| !c.items.is_empty())
        .map(|c| OfferingGroup {
            name: match c.name.trim() {
                "" => label.to_string(),
                name => name.to_string(),
            },
            items: c.items.iter().map(offering_from_ai).collect(),
        })
        .collect();
    let default_groups: Vec<OfferingGroup> = defaults
        .menu
        .iter()
        .map(|c| OfferingGroup {
            name: c.name.clone(),
            items: c.items.iter().map(offering_from_default).collect(),
        })
        .collect();
    resolve_list(&[(Tier::Ai, &ai_groups[..]), (Tier::Default, &default_groups[..])])
        .unwrap_or_else(|| Resolved::new(Vec::new(), Tier::Default))
}

fn non_blank(paragraphs: &[String]) -> Vec<String> {
    paragraphs
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
