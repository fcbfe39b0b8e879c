//! Shared test utilities for the sitewright test suite.
//!
//! Provides the built-in registry (parsed once per test binary), profile
//! builders, and lookup helpers for composed pages.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let plan = plan_for(&profile("Bean There", "cafe", ""));
//! let home = find_page(&plan, PageKind::Home);
//! assert_sections(home, &[SectionKind::Hero, SectionKind::FeaturedItems]);
//! ```

use std::sync::OnceLock;

use crate::compose::PageSpecification;
use crate::registry::{Registry, SectionKind};
use crate::site::{GenerateOptions, SitePlan, plan_site};
use crate::types::{BusinessProfile, PageKind};

// =========================================================================
// Fixtures
// =========================================================================

/// The built-in registry, parsed on first use.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| Registry::builtin().unwrap())
}

pub fn profile(name: &str, industry: &str, description: &str) -> BusinessProfile {
    BusinessProfile::new(name, industry).with_description(description)
}

/// Plan a site with default options.
pub fn plan_for(profile: &BusinessProfile) -> SitePlan {
    plan_with(profile, &GenerateOptions::default())
}

pub fn plan_with(profile: &BusinessProfile, options: &GenerateOptions) -> SitePlan {
    plan_site(registry(), profile, options).unwrap()
}

// =========================================================================
// Lookup helpers
// =========================================================================

/// Find a page in a plan. Panics if the plan lacks it.
pub fn find_page(plan: &SitePlan, page: PageKind) -> &PageSpecification {
    plan.pages
        .iter()
        .find(|p| p.page == page)
        .unwrap_or_else(|| panic!("page '{page}' not in plan"))
}

pub fn section_kinds(spec: &PageSpecification) -> Vec<SectionKind> {
    spec.sections.iter().map(|s| s.kind).collect()
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert a page's section order exactly.
pub fn assert_sections(spec: &PageSpecification, expected: &[SectionKind]) {
    let actual = section_kinds(spec);
    assert_eq!(
        actual, expected,
        "sections of '{}' page ({})",
        spec.page, spec.archetype_id
    );
}
