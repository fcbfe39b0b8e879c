//! Page specification composition.
//!
//! A [`PageSpecification`] is the single record handed to an emitter. It
//! carries everything a page needs: the archetype's section order for the
//! page (filtered by feature flags), the resolved theme, the resolved
//! content, the feature flags themselves and the site navigation. Emitters
//! never look anything up in the registry and never see raw AI content.
//!
//! Specifications are plain data. Composing twice from the same inputs
//! yields equal values and equal [`PageSpecification::fingerprint`]s, which
//! callers can use to skip re-emitting unchanged pages.

use crate::content::ResolvedContent;
use crate::registry::{Archetype, HeroKind, Registry, SectionDescriptor};
use crate::theme::ResolvedTheme;
use crate::types::{FeatureFlags, PageKind};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Per-site inputs shared by every page of one generation request.
#[derive(Debug, Clone, Copy)]
pub struct SiteContext<'a> {
    pub registry: &'a Registry,
    pub archetype: &'a Archetype,
    pub industry_key: &'a str,
    pub features: FeatureFlags,
    /// Pages the site will contain, in navigation order.
    pub pages: &'a [PageKind],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub current: bool,
}

/// Everything needed to emit one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSpecification {
    pub archetype_id: String,
    pub archetype_name: String,
    pub industry: String,
    pub page: PageKind,
    pub hero: HeroKind,
    pub sections: Vec<SectionDescriptor>,
    pub features: FeatureFlags,
    pub navigation: Vec<NavLink>,
    pub theme: ResolvedTheme,
    pub content: ResolvedContent,
}

impl PageSpecification {
    /// SHA-256 hex digest of the specification's JSON form.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        format!("{:x}", Sha256::digest(&json))
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn file_name(&self) -> String {
        self.page.file_name()
    }
}

/// Sections of `page` in declared order, minus those whose required
/// feature is off.
pub fn page_sections(ctx: &SiteContext<'_>, page: PageKind) -> Vec<SectionDescriptor> {
    ctx.registry
        .page_sections(ctx.archetype, page)
        .iter()
        .filter(|section| match section.requires {
            Some(feature) if !ctx.features.enabled(feature) => {
                debug!(
                    page = %page,
                    section = section.kind.as_str(),
                    "section disabled by feature flag"
                );
                false
            }
            _ => true,
        })
        .cloned()
        .collect()
}

fn navigation(pages: &[PageKind], current: PageKind) -> Vec<NavLink> {
    pages
        .iter()
        .map(|&p| NavLink {
            label: p.label().to_string(),
            href: p.file_name(),
            current: p == current,
        })
        .collect()
}

/// Compose the specification for one page.
pub fn compose(
    ctx: &SiteContext<'_>,
    theme: &ResolvedTheme,
    content: ResolvedContent,
    page: PageKind,
) -> PageSpecification {
    PageSpecification {
        archetype_id: ctx.archetype.id.clone(),
        archetype_name: ctx.archetype.name.clone(),
        industry: ctx.industry_key.to_string(),
        page,
        hero: ctx.archetype.hero,
        sections: page_sections(ctx, page),
        features: ctx.features,
        navigation: navigation(ctx.pages, page),
        theme: theme.clone(),
        content,
    }
}
