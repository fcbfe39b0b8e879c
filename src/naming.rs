//! Key normalization and display-text helpers.
//!
//! Industry names arrive as free text ("Coffee Shop", " CAFÉ ", "coffee_shop").
//! All registry lookups go through [`normalize_key`] first so that casing,
//! whitespace and punctuation never decide a match:
//!
//! - `"Coffee Shop"` → `coffee-shop`
//! - `"  B2B   SaaS!! "` → `b2b-saas`
//! - `"hair_salon"` → `hair-salon`
//!
//! The same slug shape is used for archetype ids and page kinds.

/// Normalize free text into a lowercase dash-separated key.
///
/// - Lowercases ASCII letters
/// - Replaces every run of non-alphanumeric characters with a single dash
/// - Strips leading and trailing dashes
///
/// Non-ASCII letters are treated as separators, so accented input degrades
/// to its ASCII parts instead of producing keys nothing else can match.
pub fn normalize_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    let mut prev_dash = true;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            key.push('-');
            prev_dash = true;
        }
    }
    while key.ends_with('-') {
        key.pop();
    }
    key
}

/// Convert `camelCase`, `kebab-case` or spaced keys to `snake_case`.
///
/// Used for field names coming from JSON producers that do not agree on a
/// convention: `textMuted`, `text-muted` and `Text Muted` all become
/// `text_muted`.
pub fn snake_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for c in raw.trim().chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else if c.is_ascii_alphanumeric() {
            out.push(c);
            prev_lower = true;
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
            prev_lower = false;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Turn a key back into a title: `coffee-cafe` → "Coffee Cafe".
pub fn display_title(key: &str) -> String {
    key.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fill `{name}` and `{year}` placeholders in default copy.
///
/// A placeholder whose value is empty is removed together with a directly
/// preceding "since " or "est. " marker, so "Serving you since {year}" with
/// no year becomes "Serving you".
pub fn fill_template(template: &str, name: &str, year: &str) -> String {
    let mut out = template.replace("{name}", name);
    if year.trim().is_empty() {
        for marker in [" since {year}", " Since {year}", " est. {year}", " Est. {year}"] {
            out = out.replace(marker, "");
        }
        out = out.replace("{year}", "");
    } else {
        out = out.replace("{year}", year.trim());
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
