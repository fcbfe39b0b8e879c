//! End-to-end scenarios through the public API: profile in, page
//! specifications and HTML out.

use sitewright::ai::AiContent;
use sitewright::classify::classify;
use sitewright::compose::PageSpecification;
use sitewright::emit::{EmitError, Emitter, HtmlEmitter};
use sitewright::precedence::Tier;
use sitewright::registry::{MatchTier, Registry};
use sitewright::site::{ConfigurationError, GenerateOptions, emit_site, plan_site};
use sitewright::theme::{ColorMode, ThemeOverrides};
use sitewright::types::{BusinessProfile, PageKind};
use tempfile::TempDir;

fn registry() -> Registry {
    Registry::builtin().unwrap()
}

fn home(
    registry: &Registry,
    profile: &BusinessProfile,
    options: GenerateOptions,
) -> PageSpecification {
    let options = GenerateOptions {
        pages: vec![PageKind::Home],
        ..options
    };
    let mut plan = plan_site(registry, profile, &options).unwrap();
    plan.pages.remove(0)
}

// =========================================================================
// Industry lookup and classification
// =========================================================================

#[test]
fn cafe_resolves_to_coffee_cafe() {
    let r = registry();
    assert_eq!(r.lookup_industry("Cafe"), "coffee-cafe");
    assert_eq!(r.lookup_industry("  COFFEE shop!! "), "coffee-cafe");
    assert_eq!(r.match_industry("cafe").tier, MatchTier::Alias);
}

#[test]
fn unknown_industry_falls_back_to_default_with_images() {
    let r = registry();
    let m = r.match_industry("interplanetary logistics");
    assert_eq!(m.key, "default");
    assert_eq!(m.tier, MatchTier::Default);
    assert!(!r.get_image_set("", "gallery").is_empty());
    assert_eq!(r.get_image_set("", "primary"), r.get_image_set("default", "primary"));
}

#[test]
fn b2b_saas_is_enterprise_corporate() {
    let r = registry();
    let p = BusinessProfile::new("Modern Analytics B2B Solutions", "saas");
    assert_eq!(classify(&r, &p), "enterprise-corporate");
}

#[test]
fn empty_yoga_profile_gets_wellness_default_and_a_full_site() {
    let r = registry();
    let p = BusinessProfile::new("", "yoga");
    assert_eq!(classify(&r, &p), "calm-sanctuary");

    let plan = plan_site(&r, &p, &GenerateOptions::default()).unwrap();
    assert!(!plan.pages.is_empty());
    let home = &plan.pages[0];
    assert_eq!(home.page, PageKind::Home);
    assert!(!home.content.headline.value.is_empty());
    assert!(!home.content.business_name.is_empty());
}

// =========================================================================
// Content resolution
// =========================================================================

#[test]
fn one_ai_menu_item_pads_four_featured_slots() {
    let r = registry();
    let ai = AiContent::from_json_str(
        r#"{"menu": [{"name": "Coffee", "items": [{"name": "Honey Latte", "price": "5.5"}]}]}"#,
    );
    let spec = home(
        &r,
        &BusinessProfile::new("Bean There", "cafe"),
        GenerateOptions {
            ai_content: Some(ai),
            ..Default::default()
        },
    );
    let featured = &spec.content.featured;
    assert_eq!(featured.len(), 4);
    assert_eq!(featured[0].value.name, "Honey Latte");
    assert_eq!(featured[0].value.price, "$5.50");
    assert_eq!(featured[0].source, Tier::Ai);
    for slot in &featured[1..] {
        assert_eq!(slot.source, Tier::Default);
        assert!(!slot.value.name.is_empty());
    }
}

#[test]
fn profile_and_ai_fields_resolve_independently() {
    let r = registry();
    let profile = BusinessProfile {
        hero_headline: Some("Roasted Right Here".into()),
        ..BusinessProfile::new("Bean There", "cafe")
    };
    let ai = AiContent::from_json_str(
        r#"{"hero": {"headline": "AI Headline", "subheadline": "Small batch, big flavor"}}"#,
    );
    let spec = home(
        &r,
        &profile,
        GenerateOptions {
            ai_content: Some(ai),
            ..Default::default()
        },
    );
    assert_eq!(spec.content.headline.value, "Roasted Right Here");
    assert_eq!(spec.content.headline.source, Tier::Profile);
    assert_eq!(spec.content.subheadline.value, "Small batch, big flavor");
    assert_eq!(spec.content.subheadline.source, Tier::Ai);
}

#[test]
fn malformed_ai_content_is_treated_as_absent() {
    let r = registry();
    let ai = AiContent::from_json_str(
        r#"{"hero": ["not", "an", "object"], "menu": "not a list", "testimonials": 5, "about": {"x": 1}}"#,
    );
    let profile = BusinessProfile::new("Bean There", "cafe");
    let with_garbage = home(
        &r,
        &profile,
        GenerateOptions {
            ai_content: Some(ai),
            ..Default::default()
        },
    );
    let without = home(&r, &profile, GenerateOptions::default());
    assert_eq!(with_garbage.content, without.content);
    assert_eq!(with_garbage.content.headline.source, Tier::Default);
}

#[test]
fn unparseable_ai_json_is_treated_as_absent() {
    let ai = AiContent::from_json_str("{ this is not json");
    assert!(ai.is_empty());
}

// =========================================================================
// Theme
// =========================================================================

#[test]
fn dark_and_medium_together_match_dark_palette_exactly() {
    let r = registry();
    let profile = BusinessProfile::new("Bean There", "cafe");
    let both = home(
        &r,
        &profile,
        GenerateOptions {
            theme_overrides: ThemeOverrides {
                dark: true,
                medium: true,
                ..Default::default()
            },
            ..Default::default()
        },
    );
    let dark_only = home(
        &r,
        &profile,
        GenerateOptions {
            theme_overrides: ThemeOverrides {
                dark: true,
                ..Default::default()
            },
            ..Default::default()
        },
    );
    assert_eq!(both.theme, dark_only.theme);
    assert_eq!(both.theme.mode, ColorMode::Dark);

    let dark = &r.modes().dark;
    let colors = &both.theme.colors;
    assert_eq!(colors.background, dark.background);
    assert_eq!(colors.surface, dark.surface);
    assert_eq!(colors.text, dark.text);
    assert_eq!(colors.text_muted, dark.text_muted);
    assert_eq!(colors.border, dark.border);
}

#[test]
fn override_colors_beat_dark_mode() {
    let r = registry();
    let mut overrides = ThemeOverrides {
        dark: true,
        ..Default::default()
    };
    overrides.colors.insert("background".into(), "#000000".into());
    let spec = home(
        &r,
        &BusinessProfile::new("Bean There", "cafe"),
        GenerateOptions {
            theme_overrides: overrides,
            ..Default::default()
        },
    );
    assert_eq!(spec.theme.colors.background, "#000000");
    assert_eq!(spec.theme.colors.text, r.modes().dark.text);
}

// =========================================================================
// Composition and emission
// =========================================================================

#[test]
fn unknown_archetype_override_surfaces() {
    let r = registry();
    let options = GenerateOptions {
        archetype_override: Some("warm-locals".into()),
        ..Default::default()
    };
    let err = plan_site(&r, &BusinessProfile::new("Bean There", "cafe"), &options).unwrap_err();
    assert_eq!(err, ConfigurationError::UnknownArchetype("warm-locals".into()));
}

#[test]
fn specifications_are_self_contained_json() {
    let r = registry();
    let spec = home(&r, &BusinessProfile::new("Pipe Pros", "plumber"), GenerateOptions::default());
    let json = serde_json::to_value(&spec).unwrap();
    for key in ["archetype_id", "page", "theme", "content", "sections", "features", "navigation"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
}

struct RefuseGallery;

impl Emitter for RefuseGallery {
    fn emit(&self, spec: &PageSpecification) -> Result<String, EmitError> {
        match spec.page {
            PageKind::Gallery => Err(EmitError::Render("no images today".into())),
            _ => HtmlEmitter.emit(spec),
        }
    }
}

#[test]
fn one_failing_page_leaves_the_rest_emitted() {
    let r = registry();
    let profile = BusinessProfile::new("Smile Co", "dentist");
    let plan = plan_site(&r, &profile, &GenerateOptions::default()).unwrap();
    let output = emit_site(&plan, &RefuseGallery);
    assert_eq!(output.failed.len(), 1);
    assert_eq!(output.failed[0].0, PageKind::Gallery);
    assert_eq!(output.emitted.len(), plan.pages.len() - 1);
    assert!(output.emitted.iter().all(|p| p.source.starts_with("<!DOCTYPE html>")));
}

#[test]
fn built_site_can_be_written_to_disk() {
    let r = registry();
    let profile = BusinessProfile::new("Bean There", "cafe");
    let plan = plan_site(&r, &profile, &GenerateOptions::default()).unwrap();
    let output = emit_site(&plan, &HtmlEmitter);
    let tmp = TempDir::new().unwrap();
    for page in &output.emitted {
        std::fs::write(tmp.path().join(&page.file_name), &page.source).unwrap();
    }
    let index = std::fs::read_to_string(tmp.path().join("index.html")).unwrap();
    assert!(index.contains("Welcome to Bean There"));
    assert!(tmp.path().join("menu.html").exists());
}
