//! CLI output formatting.
//!
//! Output is **decision-centric**: every line answers "what was chosen and
//! why", with file paths as secondary context. Provenance is shown in square
//! brackets after a value (`[profile]`, `[ai]`, `[default]`).
//!
//! # Output Format
//!
//! ## Classify
//!
//! ```text
//! Industry
//!     coffee-cafe (Coffee Shop) [alias]
//! Family
//!     food-service
//! Archetype
//!     warm-local (Warm & Local)
//!     Rule: family default
//! ```
//!
//! ## Build
//!
//! ```text
//! Archetype warm-local (Warm & Local)
//! 001 Home → site/index.html
//! 002 Menu → site/menu.html
//! 003 About FAILED: page 'about' has no sections
//!
//! Built 2 pages, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::classify::Classification;
use crate::emit::EmitError;
use crate::registry::Registry;
use crate::site::SitePlan;
use crate::types::PageKind;
use std::path::PathBuf;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Classify
// ============================================================================

pub fn format_classification(registry: &Registry, c: &Classification) -> Vec<String> {
    let archetype_name = registry
        .archetype(&c.archetype)
        .map_or("", |a| a.name.as_str());
    let rule = match &c.rule {
        Some(rule) => format!(
            "{}Rule: {} matched \"{}\"",
            indent(1),
            format_index(rule.index + 1),
            rule.keyword
        ),
        None => format!("{}Rule: family default", indent(1)),
    };
    vec![
        "Industry".to_string(),
        format!(
            "{}{} ({}) [{}]",
            indent(1),
            c.industry.key,
            registry.display_name(&c.industry.key),
            c.industry.tier.as_str()
        ),
        "Family".to_string(),
        format!("{}{}", indent(1), c.family),
        "Archetype".to_string(),
        format!("{}{} ({})", indent(1), c.archetype, archetype_name),
        rule,
    ]
}

pub fn print_classification(registry: &Registry, c: &Classification) {
    for line in format_classification(registry, c) {
        println!("{}", line);
    }
}

// ============================================================================
// Plan
// ============================================================================

/// Summary of a site plan: one entry per page with its sections and copy.
pub fn format_plan(registry: &Registry, plan: &SitePlan) -> Vec<String> {
    let name = registry
        .archetype(&plan.archetype_id)
        .map_or("", |a| a.name.as_str());
    let mut lines = vec![format!("Archetype {} ({})", plan.archetype_id, name)];
    if plan.archetype_id != plan.classification.archetype {
        lines.push(format!(
            "{}Overrides classified {}",
            indent(1),
            plan.classification.archetype
        ));
    }
    if let Some(first) = plan.pages.first() {
        lines.push(format!("Theme {} · {}", first.theme.mode.as_str(), first.theme.vibe));
    }
    for (i, spec) in plan.pages.iter().enumerate() {
        let content = &spec.content;
        let sections: Vec<&str> = spec.sections.iter().map(|s| s.kind.as_str()).collect();
        lines.push(format!(
            "{} {} → {}",
            format_index(i + 1),
            spec.page.label(),
            spec.file_name()
        ));
        lines.push(format!("{}Sections: {}", indent(1), sections.join(", ")));
        lines.push(format!(
            "{}Headline: {} [{}]",
            indent(1),
            content.headline.value,
            content.headline.source.as_str()
        ));
        lines.push(format!(
            "{}Call to action: {} → {} [{}]",
            indent(1),
            content.primary_cta.label.value,
            content.primary_cta.href,
            content.primary_cta.label.source.as_str()
        ));
    }
    lines
}

pub fn print_plan(registry: &Registry, plan: &SitePlan) {
    for line in format_plan(registry, plan) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// What happened to one page during a build.
#[derive(Debug)]
pub enum PageOutcome {
    Written(PathBuf),
    EmitFailed(EmitError),
    WriteFailed(std::io::Error),
}

pub fn format_build_output(results: &[(PageKind, PageOutcome)]) -> Vec<String> {
    let mut lines = Vec::with_capacity(results.len() + 2);
    let mut failed = 0;
    for (i, (page, outcome)) in results.iter().enumerate() {
        let head = format!("{} {}", format_index(i + 1), page.label());
        lines.push(match outcome {
            PageOutcome::Written(path) => format!("{} → {}", head, path.display()),
            PageOutcome::EmitFailed(err) => {
                failed += 1;
                format!("{} FAILED: {}", head, err)
            }
            PageOutcome::WriteFailed(err) => {
                failed += 1;
                format!("{} FAILED: {}", head, err)
            }
        });
    }
    lines.push(String::new());
    let built = results.len() - failed;
    if failed == 0 {
        lines.push(format!("Built {}", plural(built, "page")));
    } else {
        lines.push(format!("Built {}, {} failed", plural(built, "page"), failed));
    }
    lines
}

pub fn print_build_output(results: &[(PageKind, PageOutcome)]) {
    for line in format_build_output(results) {
        println!("{}", line);
    }
}

// ============================================================================
// Catalogs
// ============================================================================

pub fn format_archetypes(registry: &Registry) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, a) in registry.archetypes().enumerate() {
        lines.push(format!("{} {} ({})", format_index(i + 1), a.id, a.name));
        lines.push(format!(
            "{}Hero: {} · Vibe: {}",
            indent(1),
            a.hero.as_str(),
            a.style.vibe
        ));
        if !a.best_for.is_empty() {
            lines.push(format!("{}Best for: {}", indent(1), a.best_for.join(", ")));
        }
    }
    lines
}

pub fn print_archetypes(registry: &Registry) {
    for line in format_archetypes(registry) {
        println!("{}", line);
    }
}

pub fn format_industries(registry: &Registry) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, (key, industry)) in registry.industries().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            key,
            industry.display_name
        ));
        lines.push(format!("{}Family: {}", indent(1), industry.family));
        if !industry.aliases.is_empty() {
            lines.push(format!(
                "{}Aliases: {}",
                indent(1),
                industry.aliases.join(", ")
            ));
        }
    }
    lines
}

pub fn print_industries(registry: &Registry) {
    for line in format_industries(registry) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_explained;
    use crate::site::{GenerateOptions, plan_site};
    use crate::types::BusinessProfile;

    fn setup() -> Registry {
        Registry::builtin().unwrap()
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "page"), "1 page");
        assert_eq!(plural(0, "page"), "0 pages");
    }

    // =========================================================================
    // Classification formatting tests
    // =========================================================================

    #[test]
    fn classification_shows_default_rule() {
        let r = setup();
        let c = classify_explained(&r, &BusinessProfile::new("Bean There", "cafe"));
        let lines = format_classification(&r, &c);
        assert_eq!(lines[0], "Industry");
        assert!(lines[1].starts_with("    coffee-cafe ("));
        assert!(lines[1].ends_with("[alias]"));
        assert_eq!(lines[3], "    food-service");
        assert!(lines[5].starts_with("    warm-local ("));
        assert_eq!(lines[6], "    Rule: family default");
    }

    #[test]
    fn classification_shows_matched_rule() {
        let r = setup();
        let c = classify_explained(
            &r,
            &BusinessProfile::new("Rocketship", "saas").with_description("We disrupt invoicing"),
        );
        let lines = format_classification(&r, &c);
        assert_eq!(lines[6], "    Rule: 002 matched \"disrupt\"");
    }

    // =========================================================================
    // Plan formatting tests
    // =========================================================================

    #[test]
    fn plan_lists_pages_in_order() {
        let r = setup();
        let profile = BusinessProfile::new("Bean There", "cafe");
        let plan = plan_site(&r, &profile, &GenerateOptions::default()).unwrap();
        let lines = format_plan(&r, &plan);
        assert!(lines[0].starts_with("Archetype warm-local"));
        assert_eq!(lines[1], "Theme light · cozy");
        assert_eq!(lines[2], "001 Home → index.html");
        assert!(lines[3].starts_with("    Sections: hero, "));
        assert_eq!(lines[4], "    Headline: Welcome to Bean There [default]");
        assert!(lines.contains(&"002 Menu → menu.html".to_string()));
    }

    #[test]
    fn plan_notes_archetype_override() {
        let r = setup();
        let options = GenerateOptions {
            archetype_override: Some("premium-craft".into()),
            pages: vec![PageKind::Home],
            ..Default::default()
        };
        let plan = plan_site(&r, &BusinessProfile::new("Bean There", "cafe"), &options).unwrap();
        let lines = format_plan(&r, &plan);
        assert_eq!(lines[1], "    Overrides classified warm-local");
    }

    // =========================================================================
    // Build formatting tests
    // =========================================================================

    #[test]
    fn build_output_reports_each_page() {
        let results = vec![
            (PageKind::Home, PageOutcome::Written(PathBuf::from("site/index.html"))),
            (PageKind::About, PageOutcome::EmitFailed(EmitError::NoSections(PageKind::About))),
        ];
        let lines = format_build_output(&results);
        assert_eq!(lines[0], "001 Home → site/index.html");
        assert_eq!(lines[1], "002 About FAILED: page 'about' has no sections");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Built 1 page, 1 failed");
    }

    #[test]
    fn build_output_all_written() {
        let results = vec![
            (PageKind::Home, PageOutcome::Written(PathBuf::from("out/index.html"))),
            (PageKind::Contact, PageOutcome::Written(PathBuf::from("out/contact.html"))),
        ];
        let lines = format_build_output(&results);
        assert_eq!(lines.last().unwrap(), "Built 2 pages");
    }

    // =========================================================================
    // Catalog formatting tests
    // =========================================================================

    #[test]
    fn archetypes_catalog_lists_every_archetype() {
        let r = setup();
        let lines = format_archetypes(&r);
        let headers = lines.iter().filter(|l| !l.starts_with(' ')).count();
        assert_eq!(headers, r.archetypes().count());
        assert!(lines.iter().any(|l| l.contains("warm-local")));
    }

    #[test]
    fn industries_catalog_shows_aliases() {
        let r = setup();
        let lines = format_industries(&r);
        assert!(lines.iter().any(|l| l.contains("coffee-cafe")));
        assert!(lines.iter().any(|l| l.starts_with("    Aliases: ") && l.contains("cafe")));
    }
}
