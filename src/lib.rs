//! # Sitewright
//!
//! Structural resolution and composition for generated small-business
//! marketing sites. Given a business profile (and, optionally, AI-written
//! copy), sitewright decides what the site should look like and produces one
//! self-contained page specification per page. An emitter then turns each
//! specification into HTML.
//!
//! # Architecture: Resolve, Then Compose
//!
//! ```text
//! 1. Classify   profile        →  industry key, family, archetype id
//! 2. Resolve    archetype      →  ResolvedTheme        (once per site)
//!               profile + AI   →  ResolvedContent      (once per page)
//! 3. Compose    theme + content + section order + feature flags
//!                              →  PageSpecification    (once per page)
//! 4. Emit       specification  →  page source text
//! ```
//!
//! Stages 1 to 3 are pure functions over a read-only [`registry::Registry`]:
//! no I/O, no shared mutable state, no locks. Pages are composed in parallel
//! and a failure emitting one page never affects its siblings.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Input and shared records: `BusinessProfile`, `PageKind`, `FeatureFlags` |
//! | [`naming`] | Key normalization and `{name}` / `{year}` template filling |
//! | [`ai`] | Lenient parsing of untrusted AI content |
//! | [`registry`] | Industry, family and archetype reference data with lookup and validation |
//! | [`classify`] | Ordered keyword rules per family, first match wins |
//! | [`theme`] | Layered theme resolution and CSS custom properties |
//! | [`precedence`] | Profile > AI > default resolution with provenance |
//! | [`content`] | Per-page copy, list padding and price formatting |
//! | [`compose`] | Page specifications and their fingerprints |
//! | [`site`] | One generation request: plan every page, emit with isolation |
//! | [`emit`] | `Emitter` trait, Maud HTML emitter, JSON emitter |
//! | [`config`] | `sitewright.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Data-Driven Rules
//!
//! Industries, aliases, classifier rules, archetypes, section orders and stock
//! copy all live in one TOML dataset embedded at compile time
//! (`data/registry.toml`). Adding an industry or reordering a rule is a data
//! change. The dataset is validated when loaded, so a dangling alias or an
//! unknown archetype is a startup error rather than a runtime surprise.
//!
//! ## Total Resolution
//!
//! Every lookup has a final fallback: unknown industries resolve to
//! `default`, unknown archetype styles fall back to a complete built-in
//! theme, and every copy field has stock text. A specification never
//! contains a missing value, so emitters need no defensive checks.
//!
//! ## Provenance Over Guesswork
//!
//! Resolved copy records which tier supplied it (`profile`, `ai`,
//! `default`). `sitewright spec --summary` shows it, which makes "why does my
//! headline say that?" answerable without a debugger.

pub mod ai;
pub mod classify;
pub mod compose;
pub mod config;
pub mod content;
pub mod emit;
pub mod naming;
pub mod output;
pub mod precedence;
pub mod registry;
pub mod site;
pub mod theme;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
