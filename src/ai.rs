//! Lenient reading of AI-authored content.
//!
//! AI content is produced upstream by a model and is untrusted: any part of
//! it may be missing, the wrong shape, or empty. This module turns whatever
//! JSON arrived into an [`AiContent`] where every field is either a usable
//! value or absent. Nothing in here returns an error.
//!
//! ## Shape
//!
//! ```json
//! {
//!   "hero": { "headline": "...", "subheadline": "...", "cta": "...", "secondaryCta": "..." },
//!   "about": ["paragraph", "paragraph"],
//!   "menu": [ { "name": "Coffee", "items": [ { "name": "Latte", "price": 4.5, "description": "..." } ] } ],
//!   "testimonials": [ { "quote": "...", "author": "..." } ],
//!   "imagery": { "style": "moody-dark" },
//!   "typography": { "headingFont": "...", "bodyFont": "..." },
//!   "colors": { "primary": "#123456" }
//! }
//! ```
//!
//! A field of the wrong type (a string where a list is expected, a number
//! where text is expected) is dropped on its own; siblings still survive.
//! `services` is accepted as a synonym for `menu`, snake_case keys for their
//! camelCase forms, and a menu given as a flat list of items is gathered into
//! one unnamed category.

use crate::types::ImageryStyle;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Hero copy suggested by the AI.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AiHero {
    pub headline: Option<String>,
    pub subheadline: Option<String>,
    pub cta: Option<String>,
    pub secondary_cta: Option<String>,
}

/// A price as the AI wrote it. Formatting happens during content resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiMenuItem {
    pub name: String,
    pub price: Option<RawPrice>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiMenuCategory {
    /// Empty when the AI supplied a flat item list.
    pub name: String,
    pub items: Vec<AiMenuItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiTestimonial {
    pub quote: String,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AiTypography {
    pub heading_font: Option<String>,
    pub body_font: Option<String>,
}

/// Sanitized AI content. Every member is optional or possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AiContent {
    pub hero: AiHero,
    pub about: Vec<String>,
    pub menu: Vec<AiMenuCategory>,
    pub testimonials: Vec<AiTestimonial>,
    pub imagery: Option<ImageryStyle>,
    pub typography: AiTypography,
    pub colors: BTreeMap<String, String>,
}

impl AiContent {
    /// Parse AI content from raw JSON text. Invalid JSON yields empty content.
    pub fn from_json_str(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(&value),
            Err(err) => {
                debug!(%err, "AI content is not valid JSON; treating as absent");
                Self::default()
            }
        }
    }

    /// Extract whatever is usable from an arbitrary JSON value.
    pub fn from_value(value: &Value) -> Self {
        let Some(root) = value.as_object() else {
            debug!("AI content root is not an object; treating as absent");
            return Self::default();
        };
        Self {
            hero: field(root, &["hero"])
                .and_then(Value::as_object)
                .map(parse_hero)
                .unwrap_or_default(),
            about: field(root, &["about", "aboutParagraphs", "about_paragraphs"])
                .map(parse_paragraphs)
                .unwrap_or_default(),
            menu: field(root, &["menu", "services", "categories"])
                .map(parse_menu)
                .unwrap_or_default(),
            testimonials: field(root, &["testimonials"])
                .map(parse_testimonials)
                .unwrap_or_default(),
            imagery: field(root, &["imagery"])
                .and_then(Value::as_object)
                .and_then(|o| text(o, &["style"]))
                .and_then(|s| ImageryStyle::parse(&s)),
            typography: field(root, &["typography"])
                .and_then(Value::as_object)
                .map(|o| AiTypography {
                    heading_font: text(o, &["headingFont", "heading_font", "heading"]),
                    body_font: text(o, &["bodyFont", "body_font", "body"]),
                })
                .unwrap_or_default(),
            colors: field(root, &["colors"])
                .and_then(Value::as_object)
                .map(parse_colors)
                .unwrap_or_default(),
        }
    }

    /// All menu items across categories, in order.
    pub fn menu_items(&self) -> impl Iterator<Item = &AiMenuItem> {
        self.menu.iter().flat_map(|c| c.items.iter())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k)).filter(|v| !v.is_null())
}

/// Non-empty trimmed string under any of `keys`. Non-string values are absent.
fn text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    field(obj, keys)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn parse_hero(obj: &Map<String, Value>) -> AiHero {
    AiHero {
        headline: text(obj, &["headline", "title"]),
        subheadline: text(obj, &["subheadline", "subheading", "subtitle"]),
        cta: text(obj, &["cta", "ctaText", "cta_text"]),
        secondary_cta: text(obj, &["secondaryCta", "secondary_cta"]),
    }
}

fn parse_paragraphs(value: &Value) -> Vec<String> {
    // `{ "paragraphs": [...] }` is accepted alongside a bare list.
    let list = match value {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("paragraphs") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    list.iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_menu(value: &Value) -> Vec<AiMenuCategory> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };
    let mut categories = Vec::new();
    let mut loose = Vec::new();
    for entry in entries.iter().filter_map(Value::as_object) {
        match entry.get("items") {
            Some(Value::Array(items)) => {
                let items: Vec<_> = items
                    .iter()
                    .filter_map(Value::as_object)
                    .filter_map(parse_item)
                    .collect();
                if !items.is_empty() {
                    categories.push(AiMenuCategory {
                        name: text(entry, &["name", "category", "title"]).unwrap_or_default(),
                        items,
                    });
                }
            }
            Some(_) => {}
            None => loose.extend(parse_item(entry)),
        }
    }
    if !loose.is_empty() {
        categories.push(AiMenuCategory {
            name: String::new(),
            items: loose,
        });
    }
    categories
}

fn parse_item(obj: &Map<String, Value>) -> Option<AiMenuItem> {
    let name = text(obj, &["name", "title"])?;
    let price = match field(obj, &["price"]) {
        Some(Value::Number(n)) => n.as_f64().map(RawPrice::Number),
        Some(Value::String(s)) if !s.trim().is_empty() => {
            Some(RawPrice::Text(s.trim().to_string()))
        }
        _ => None,
    };
    Some(AiMenuItem {
        name,
        price,
        description: text(obj, &["description", "desc"]),
    })
}

fn parse_testimonials(value: &Value) -> Vec<AiTestimonial> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|o| {
            Some(AiTestimonial {
                quote: text(o, &["quote", "text"])?,
                author: text(o, &["author", "name"]),
            })
        })
        .collect()
}

fn parse_colors(obj: &Map<String, Value>) -> BTreeMap<String, String> {
    obj.iter()
        .filter_map(|(k, v)| {
            let value = v.as_str()?.trim();
            (!value.is_empty()).then(|| (crate::naming::snake_case(k), value.to_string()))
        })
        .collect()
}
