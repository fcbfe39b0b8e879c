//! Per-field precedence resolution.
//!
//! Content fields come from up to three sources, in strict priority order:
//!
//! - **Profile**: something the business wrote down on purpose
//! - **Ai**: copy produced upstream by a model
//! - **Default**: archetype or stock copy from the registry
//!
//! Each field is resolved on its own. The first candidate with a non-blank
//! value wins, and the tier it came from travels with the value so callers
//! can see why a headline reads the way it does.
//!
//! ```text
//! headline:    resolve(&[(Profile, hero_headline), (Ai, ai.hero.headline), (Default, copy.headline)])
//! subheadline: resolve(&[(Profile, tagline),       (Ai, ai.hero.subheadline), (Default, copy.subheadline)])
//! ```
//!
//! List slots (featured items, testimonials) are filled positionally with
//! [`fill_slots`]: supplied entries first, defaults at the same index after.

use serde::Serialize;

/// Which source a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Profile,
    Ai,
    Default,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Profile => "profile",
            Tier::Ai => "ai",
            Tier::Default => "default",
        }
    }
}

/// A value plus the tier that supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved<T> {
    pub value: T,
    pub source: Tier,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: Tier) -> Self {
        Self { value, source }
    }
}

/// Return the first non-blank candidate, trimmed, with its tier.
pub fn resolve(candidates: &[(Tier, Option<&str>)]) -> Option<Resolved<String>> {
    candidates.iter().find_map(|(tier, value)| {
        value
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Resolved::new(s.to_string(), *tier))
    })
}

/// Like [`resolve`], but never empty: `fallback` is used at the default tier.
pub fn resolve_or(candidates: &[(Tier, Option<&str>)], fallback: &str) -> Resolved<String> {
    resolve(candidates).unwrap_or_else(|| Resolved::new(fallback.to_string(), Tier::Default))
}

/// Return the first non-empty list, whole, with its tier.
pub fn resolve_list<T: Clone>(candidates: &[(Tier, &[T])]) -> Option<Resolved<Vec<T>>> {
    candidates
        .iter()
        .find(|(_, list)| !list.is_empty())
        .map(|(tier, list)| Resolved::new(list.to_vec(), *tier))
}

/// Fill `count` slots from `supplied`, padding positionally from `defaults`.
///
/// Slot `i` takes `supplied[i]` if present, else `defaults[i]`. When the
/// defaults run short they repeat from the start. With no defaults at all the
/// result stops at `supplied.len()`.
pub fn fill_slots<T: Clone>(
    supplied: &[T],
    source: Tier,
    defaults: &[T],
    count: usize,
) -> Vec<Resolved<T>> {
    (0..count)
        .map_while(|i| match supplied.get(i) {
            Some(item) => Some(Resolved::new(item.clone(), source)),
            None if defaults.is_empty() => None,
            None => Some(Resolved::new(
                defaults[i % defaults.len()].clone(),
                Tier::Default,
            )),
        })
        .collect()
}
