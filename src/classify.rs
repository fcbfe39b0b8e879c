//! Archetype classification.
//!
//! The profile's industry picks a family; the family's ordered rule list
//! picks an archetype. Rules are data (`[[families.<name>.rules]]` in the
//! registry) and are tried top to bottom. The first rule with any keyword in
//! the profile text wins, even if later rules would also match. No rule
//! matching means the family default.
//!
//! The text searched is name + description + industry, lowercased, with
//! punctuation folded to spaces. A keyword matches at the start of a word, so
//! `disrupt` matches "disruptive" but `art` does not match "smart".

use crate::naming::normalize_key;
use crate::registry::{IndustryMatch, Registry};
use crate::types::BusinessProfile;
use serde::Serialize;
use tracing::debug;

/// The rule that decided a classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedRule {
    /// Position in the family's rule list.
    pub index: usize,
    pub keyword: String,
}

/// Why a profile got the archetype it got.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub industry: IndustryMatch,
    pub family: String,
    pub archetype: String,
    /// `None` when the family default applied.
    pub rule: Option<MatchedRule>,
}

/// Pick an archetype id for a profile. Never fails.
pub fn classify(registry: &Registry, profile: &BusinessProfile) -> String {
    classify_explained(registry, profile).archetype
}

/// Like [`classify`], but reports the industry match and the deciding rule.
pub fn classify_explained(registry: &Registry, profile: &BusinessProfile) -> Classification {
    let industry = registry.match_industry(&profile.industry);
    let (family_name, family) = registry.family_of(&industry.key);
    let haystack = haystack(profile);

    let matched = family.rules.iter().enumerate().find_map(|(index, rule)| {
        rule.keywords
            .iter()
            .find(|keyword| contains_word_prefix(&haystack, keyword))
            .map(|keyword| (index, rule, keyword))
    });

    match matched {
        Some((index, rule, keyword)) => {
            debug!(
                family = family_name,
                rule = index,
                keyword = keyword.as_str(),
                archetype = rule.archetype.as_str(),
                "classifier rule matched"
            );
            Classification {
                industry,
                family: family_name.to_string(),
                archetype: rule.archetype.clone(),
                rule: Some(MatchedRule {
                    index,
                    keyword: keyword.clone(),
                }),
            }
        }
        None => {
            debug!(
                family = family_name,
                archetype = family.default_archetype.as_str(),
                "no classifier rule matched; using family default"
            );
            Classification {
                industry,
                family: family_name.to_string(),
                archetype: family.default_archetype.clone(),
                rule: None,
            }
        }
    }
}

/// Profile text as space-separated lowercase words, padded with a leading space.
fn haystack(profile: &BusinessProfile) -> String {
    let mut text = String::from(" ");
    for part in [&profile.name, &profile.description, &profile.industry] {
        let words = words(part);
        if !words.is_empty() {
            text.push_str(&words);
            text.push(' ');
        }
    }
    text
}

fn words(raw: &str) -> String {
    normalize_key(raw).replace('-', " ")
}

fn contains_word_prefix(haystack: &str, keyword: &str) -> bool {
    let keyword = words(keyword);
    !keyword.is_empty() && haystack.contains(&format!(" {keyword}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MatchTier;

    fn setup() -> Registry {
        Registry::builtin().unwrap()
    }

    fn profile(name: &str, industry: &str, description: &str) -> BusinessProfile {
        BusinessProfile::new(name, industry).with_description(description)
    }

    // =========================================================================
    // Rule evaluation
    // =========================================================================

    #[test]
    fn b2b_saas_is_enterprise() {
        let r = setup();
        let p = profile("Modern Analytics B2B Solutions", "saas", "");
        assert_eq!(classify(&r, &p), "enterprise-corporate");
    }

    #[test]
    fn first_matching_rule_wins() {
        let r = setup();
        // Matches both the enterprise rule (consulting) and the startup rule.
        let p = profile("Northwind", "software", "An innovative consulting startup");
        let c = classify_explained(&r, &p);
        assert_eq!(c.archetype, "enterprise-corporate");
        assert_eq!(c.rule.as_ref().map(|m| m.index), Some(0));
        assert_eq!(c.rule.unwrap().keyword, "consulting");
    }

    #[test]
    fn later_rule_fires_when_earlier_do_not() {
        let r = setup();
        let p = profile("Rocketship", "saas", "We disrupt invoicing");
        let c = classify_explained(&r, &p);
        assert_eq!(c.archetype, "dynamic-startup");
        assert_eq!(c.rule.unwrap().index, 1);
    }

    #[test]
    fn no_rule_means_family_default() {
        let r = setup();
        let p = profile("Bean There", "cafe", "Coffee and pastries");
        let c = classify_explained(&r, &p);
        assert_eq!(c.family, "food-service");
        assert_eq!(c.archetype, "warm-local");
        assert!(c.rule.is_none());
    }

    #[test]
    fn keywords_match_word_starts_only() {
        let r = setup();
        // "fun" must not fire inside "refund"; "disrupt" fires inside "disruptive".
        let p = profile("Refund Kitchen", "restaurant", "");
        assert_eq!(classify(&r, &p), "warm-local");
        let p = profile("Ledger", "saas", "A disruptive ledger");
        assert_eq!(classify(&r, &p), "dynamic-startup");
    }

    #[test]
    fn multi_word_keywords_match_across_punctuation() {
        let r = setup();
        let p = profile("Pipe Pros", "plumber", "24/7 service");
        assert_eq!(classify(&r, &p), "emergency-response");
        let p = profile("Maison", "restaurant", "Fine-dining tasting menu");
        assert_eq!(classify(&r, &p), "upscale-dining");
    }

    #[test]
    fn families_keep_separate_rule_lists() {
        let r = setup();
        // "luxury" sends food to upscale-dining but wellness to luxury-retreat.
        assert_eq!(classify(&r, &profile("Gold", "restaurant", "luxury")), "upscale-dining");
        assert_eq!(classify(&r, &profile("Gold", "spa", "luxury")), "luxury-retreat");
    }

    // =========================================================================
    // Edge cases
    // =========================================================================

    #[test]
    fn empty_profile_with_yoga_gets_wellness_default() {
        let r = setup();
        let c = classify_explained(&r, &BusinessProfile::new("", "yoga"));
        assert_eq!(c.family, "wellness");
        assert_eq!(c.archetype, "calm-sanctuary");
    }

    #[test]
    fn completely_empty_profile_is_general() {
        let r = setup();
        let c = classify_explained(&r, &BusinessProfile::default());
        assert_eq!(c.industry.tier, MatchTier::Default);
        assert_eq!(c.family, "general");
        assert_eq!(c.archetype, "local-classic");
    }

    #[test]
    fn classification_is_deterministic() {
        let r = setup();
        let p = profile("Studio Nine", "web design", "creative startup studio");
        let first = classify_explained(&r, &p);
        for _ in 0..10 {
            assert_eq!(classify_explained(&r, &p), first);
        }
    }

    #[test]
    fn every_rule_can_fire() {
        let r = setup();
        for (key, industry) in r.industries() {
            let (_, family) = r.family_of(key);
            for (i, rule) in family.rules.iter().enumerate() {
                for keyword in &rule.keywords {
                    let p = profile("", key, keyword);
                    let c = classify_explained(&r, &p);
                    let fired = c.rule.as_ref().unwrap_or_else(|| {
                        panic!("{} keyword {keyword:?} fired no rule", industry.family)
                    });
                    assert!(fired.index <= i, "{} rule {i} {keyword:?}", industry.family);
                }
            }
        }
    }

    #[test]
    fn haystack_folds_punctuation() {
        let p = profile("Bean & Leaf, LLC", "Coffee-Shop", "");
        assert_eq!(haystack(&p), " bean leaf llc coffee shop ");
    }
}
