//! One generation request, end to end.
//!
//! ```text
//! profile + options ──► classify ──► archetype
//!                                      │
//!                         ┌────────────┴────────────┐
//!                   resolve theme (once)    resolve content (per page)
//!                         └────────────┬────────────┘
//!                                   compose (per page, parallel)
//!                                      │
//!                                   emit (per page, parallel, isolated)
//! ```
//!
//! Planning is pure: the registry is shared by reference and nothing is
//! written anywhere. A bad archetype override or page name is a
//! [`ConfigurationError`] returned to the caller. Emission collects a result
//! per page, so one page failing never stops its siblings.

use crate::ai::AiContent;
use crate::classify::{Classification, classify_explained};
use crate::compose::{PageSpecification, SiteContext, compose};
use crate::content::{ContentDefaults, resolve_content};
use crate::emit::{EmitError, Emitter};
use crate::naming::normalize_key;
use crate::registry::Registry;
use crate::theme::{ThemeOverrides, resolve_theme};
use crate::types::{BusinessProfile, PageKind};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

/// A caller asked for something that does not exist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unknown archetype '{0}'")]
    UnknownArchetype(String),
    #[error("unknown page kind '{0}'")]
    UnknownPage(String),
}

/// Optional inputs to a generation request.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Use this archetype instead of classifying.
    pub archetype_override: Option<String>,
    pub theme_overrides: ThemeOverrides,
    pub ai_content: Option<AiContent>,
    /// Pages to build. Empty means the industry family's page set.
    pub pages: Vec<PageKind>,
}

/// Every page specification of one site.
#[derive(Debug, Clone)]
pub struct SitePlan {
    pub classification: Classification,
    /// The archetype actually used (override or classified).
    pub archetype_id: String,
    pub pages: Vec<PageSpecification>,
}

/// Parse page names, rejecting unknown ones.
pub fn parse_pages<S: AsRef<str>>(names: &[S]) -> Result<Vec<PageKind>, ConfigurationError> {
    names
        .iter()
        .map(|name| {
            name.as_ref()
                .parse::<PageKind>()
                .map_err(ConfigurationError::UnknownPage)
        })
        .collect()
}

/// Plan every page of a site.
pub fn plan_site(
    registry: &Registry,
    profile: &BusinessProfile,
    options: &GenerateOptions,
) -> Result<SitePlan, ConfigurationError> {
    let classification = classify_explained(registry, profile);
    let archetype = match &options.archetype_override {
        Some(id) => registry
            .archetype(&normalize_key(id))
            .ok_or_else(|| ConfigurationError::UnknownArchetype(id.clone()))?,
        None => registry
            .archetype(&classification.archetype)
            .ok_or_else(|| ConfigurationError::UnknownArchetype(classification.archetype.clone()))?,
    };
    let industry_key = classification.industry.key.as_str();

    let mut pages: Vec<PageKind> = if options.pages.is_empty() {
        registry.pages_for(industry_key).to_vec()
    } else {
        options.pages.clone()
    };
    let mut seen = Vec::with_capacity(pages.len());
    pages.retain(|p| {
        let fresh = !seen.contains(p);
        seen.push(*p);
        fresh
    });

    debug!(
        archetype = archetype.id.as_str(),
        industry = industry_key,
        pages = pages.len(),
        "planning site"
    );

    let ctx = SiteContext {
        registry,
        archetype,
        industry_key,
        features: registry.features_for(industry_key),
        pages: &pages,
    };
    let ai = options.ai_content.as_ref();
    let theme = resolve_theme(archetype, registry.modes(), &options.theme_overrides, ai);

    let specs = pages
        .par_iter()
        .map(|&page| {
            let defaults =
                ContentDefaults::from_registry(registry, industry_key, archetype, page, &pages);
            let content = resolve_content(page, profile, ai, &defaults);
            compose(&ctx, &theme, content, page)
        })
        .collect();

    Ok(SitePlan {
        archetype_id: archetype.id.clone(),
        classification,
        pages: specs,
    })
}

/// Source text for one emitted page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedPage {
    pub page: PageKind,
    pub file_name: String,
    pub fingerprint: String,
    pub source: String,
}

/// Per-page results of emitting a site.
#[derive(Debug)]
pub struct SiteOutput {
    pub emitted: Vec<EmittedPage>,
    pub failed: Vec<(PageKind, EmitError)>,
}

/// Emit every page of a plan in parallel. Failures are collected per page.
pub fn emit_site<E: Emitter + Sync>(plan: &SitePlan, emitter: &E) -> SiteOutput {
    let results: Vec<(PageKind, Result<EmittedPage, EmitError>)> = plan
        .pages
        .par_iter()
        .map(|spec| {
            let result = emitter.emit(spec).map(|source| EmittedPage {
                page: spec.page,
                file_name: format!("{}.{}", spec.page.file_stem(), emitter.extension()),
                fingerprint: spec.fingerprint(),
                source,
            });
            (spec.page, result)
        })
        .collect();

    let mut output = SiteOutput {
        emitted: Vec::new(),
        failed: Vec::new(),
    };
    for (page, result) in results {
        match result {
            Ok(emitted) => {
                info!(page = %page, file = emitted.file_name.as_str(), "emitted page");
                output.emitted.push(emitted);
            }
            Err(err) => {
                warn!(page = %page, %err, "page failed to emit");
                output.failed.push((page, err));
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::{HtmlEmitter, JsonEmitter};

    fn setup() -> Registry {
        Registry::builtin().unwrap()
    }

    /// Fails on one page kind, succeeds elsewhere.
    struct FlakyEmitter(PageKind);

    impl Emitter for FlakyEmitter {
        fn emit(&self, spec: &PageSpecification) -> Result<String, EmitError> {
            if spec.page == self.0 {
                Err(EmitError::Render(format!("cannot render {}", spec.page)))
            } else {
                Ok(format!("<p>{}</p>", spec.page))
            }
        }
    }

    // =========================================================================
    // plan_site() tests
    // =========================================================================

    #[test]
    fn default_pages_come_from_family() {
        let r = setup();
        let profile = BusinessProfile::new("Bean There", "cafe");
        let plan = plan_site(&r, &profile, &GenerateOptions::default()).unwrap();
        let pages: Vec<PageKind> = plan.pages.iter().map(|p| p.page).collect();
        assert_eq!(
            pages,
            vec![
                PageKind::Home,
                PageKind::Menu,
                PageKind::About,
                PageKind::Contact,
                PageKind::Gallery
            ]
        );
        assert_eq!(plan.archetype_id, "warm-local");
    }

    #[test]
    fn archetype_without_declared_pages_uses_stock_layouts() {
        use crate::registry::SectionKind::*;
        use crate::test_helpers::*;

        let plan = plan_for(&profile("Bean There", "cafe", ""));
        assert_sections(
            find_page(&plan, PageKind::Home),
            &[Hero, FeaturedItems, AboutStory, Testimonials, LoyaltyBanner, CtaBand],
        );
        assert_sections(
            find_page(&plan, PageKind::Contact),
            &[Hero, ContactDetails, MapPlaceholder],
        );
    }

    #[test]
    fn requested_pages_are_deduplicated_in_order() {
        let r = setup();
        let options = GenerateOptions {
            pages: vec![PageKind::Contact, PageKind::Home, PageKind::Contact],
            ..Default::default()
        };
        let plan = plan_site(&r, &BusinessProfile::new("Pipe Pros", "plumber"), &options).unwrap();
        let pages: Vec<PageKind> = plan.pages.iter().map(|p| p.page).collect();
        assert_eq!(pages, vec![PageKind::Contact, PageKind::Home]);
    }

    #[test]
    fn archetype_override_wins_over_classification() {
        let r = setup();
        let options = GenerateOptions {
            archetype_override: Some("Premium-Craft".into()),
            ..Default::default()
        };
        let plan = plan_site(&r, &BusinessProfile::new("Bean There", "cafe"), &options).unwrap();
        assert_eq!(plan.archetype_id, "premium-craft");
        assert_eq!(plan.classification.archetype, "warm-local");
        assert!(plan.pages.iter().all(|p| p.archetype_id == "premium-craft"));
    }

    #[test]
    fn unknown_archetype_override_is_a_configuration_error() {
        let r = setup();
        let options = GenerateOptions {
            archetype_override: Some("warm-locale".into()),
            ..Default::default()
        };
        let err = plan_site(&r, &BusinessProfile::default(), &options).unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownArchetype("warm-locale".into()));
    }

    #[test]
    fn parse_pages_rejects_unknown_names() {
        assert_eq!(
            parse_pages(&["home", "Menu"]).unwrap(),
            vec![PageKind::Home, PageKind::Menu]
        );
        assert_eq!(
            parse_pages(&["home", "blog"]).unwrap_err(),
            ConfigurationError::UnknownPage("blog".into())
        );
    }

    #[test]
    fn every_page_shares_one_theme() {
        let r = setup();
        let options = GenerateOptions {
            theme_overrides: ThemeOverrides {
                dark: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let plan = plan_site(&r, &BusinessProfile::new("Calm", "yoga"), &options).unwrap();
        let first = &plan.pages[0].theme;
        assert!(plan.pages.iter().all(|p| &p.theme == first));
    }

    #[test]
    fn planning_is_repeatable() {
        let r = setup();
        let profile =
            BusinessProfile::new("Smile Co", "dentist").with_description("family dentistry");
        let a = plan_site(&r, &profile, &GenerateOptions::default()).unwrap();
        let b = plan_site(&r, &profile, &GenerateOptions::default()).unwrap();
        assert_eq!(a.pages, b.pages);
        assert_eq!(a.archetype_id, "family-care");
    }

    // =========================================================================
    // emit_site() tests
    // =========================================================================

    #[test]
    fn one_failed_page_does_not_stop_the_rest() {
        let r = setup();
        let profile = BusinessProfile::new("Bean There", "cafe");
        let plan = plan_site(&r, &profile, &GenerateOptions::default()).unwrap();
        let output = emit_site(&plan, &FlakyEmitter(PageKind::About));
        assert_eq!(output.emitted.len(), 4);
        assert_eq!(output.failed.len(), 1);
        assert_eq!(output.failed[0].0, PageKind::About);
    }

    #[test]
    fn html_emitter_builds_every_page() {
        let r = setup();
        let profile = BusinessProfile::new("Bean There", "cafe");
        let plan = plan_site(&r, &profile, &GenerateOptions::default()).unwrap();
        let output = emit_site(&plan, &HtmlEmitter::default());
        assert!(output.failed.is_empty());
        let files: Vec<&str> = output.emitted.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(
            files,
            vec!["index.html", "menu.html", "about.html", "contact.html", "gallery.html"]
        );
        assert!(output.emitted.iter().all(|e| e.fingerprint.len() == 64));
    }

    #[test]
    fn json_emitter_writes_json_files() {
        let r = setup();
        let options = GenerateOptions {
            pages: vec![PageKind::Home, PageKind::Contact],
            ..Default::default()
        };
        let profile = BusinessProfile::new("Pipe Pros", "plumber");
        let plan = plan_site(&r, &profile, &options).unwrap();
        let output = emit_site(&plan, &JsonEmitter);
        let files: Vec<&str> = output.emitted.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(files, vec!["index.json", "contact.json"]);
        let parsed: serde_json::Value = serde_json::from_str(&output.emitted[1].source).unwrap();
        assert_eq!(parsed["page"], "contact");
    }
}
