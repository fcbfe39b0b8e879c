//! Theme resolution.
//!
//! A theme is built from an ordered list of partial layers. Each layer is a
//! flat map from a dotted field name (`colors.primary`,
//! `typography.heading_font`, `spacing.gap`, `imagery.style`) to a value.
//! Layers are reduced left to right and later layers win field by field:
//!
//! ```text
//! fallback → archetype style → dark | medium palette → AI colors → AI typography/imagery → caller overrides
//! ```
//!
//! The fallback layer sits at the bottom and defines every field, so the
//! reduced map is always total and [`ResolvedTheme`] has no optional members.
//!
//! Dark and medium palettes replace all five surface fields at once
//! (background, surface, text, text_muted, border). If both flags are set,
//! dark wins and medium is not applied at all. While a mode is active, AI
//! colors may only set the brand fields (primary, secondary, accent,
//! on_primary); the mode owns the surface palette. Caller overrides may set
//! anything.

use crate::ai::AiContent;
use crate::naming::snake_case;
use crate::registry::{Archetype, ModePalette, Modes};
use crate::types::ImageryStyle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

pub const COLOR_FIELDS: &[&str] = &[
    "primary",
    "secondary",
    "accent",
    "background",
    "surface",
    "text",
    "text_muted",
    "border",
    "on_primary",
];

/// Color fields AI guidance may set while a dark or medium mode is active.
pub const BRAND_COLOR_FIELDS: &[&str] = &["primary", "secondary", "accent", "on_primary"];

pub const TYPOGRAPHY_FIELDS: &[&str] = &[
    "heading_font",
    "body_font",
    "base_size",
    "heading_weight",
    "line_height",
];

pub const SPACING_FIELDS: &[&str] = &[
    "border_radius",
    "section_padding",
    "card_padding",
    "gap",
    "button_padding",
];

/// Values every theme starts from.
const FALLBACK: &[(&str, &str)] = &[
    ("colors.primary", "#333333"),
    ("colors.secondary", "#777777"),
    ("colors.accent", "#0066cc"),
    ("colors.background", "#f5f5f5"),
    ("colors.surface", "#ffffff"),
    ("colors.text", "#1a1a1a"),
    ("colors.text_muted", "#666666"),
    ("colors.border", "#e0e0e0"),
    ("colors.on_primary", "#ffffff"),
    ("typography.heading_font", "Georgia, 'Times New Roman', serif"),
    ("typography.body_font", "system-ui, -apple-system, 'Segoe UI', sans-serif"),
    ("typography.base_size", "16px"),
    ("typography.heading_weight", "700"),
    ("typography.line_height", "1.6"),
    ("spacing.border_radius", "8px"),
    ("spacing.section_padding", "5rem 1.5rem"),
    ("spacing.card_padding", "1.5rem"),
    ("spacing.gap", "1.5rem"),
    ("spacing.button_padding", "0.75rem 1.5rem"),
    ("imagery.style", "natural-light"),
];

// =============================================================================
// Overrides
// =============================================================================

/// Caller-supplied partial theme. Every member is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeOverrides {
    pub dark: bool,
    pub medium: bool,
    /// Color field → CSS value. Keys may be snake_case, kebab-case or camelCase.
    pub colors: BTreeMap<String, String>,
    pub fonts: FontOverrides,
    pub spacing: SpacingOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_size: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpacingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_padding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_padding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_padding: Option<String>,
}

// =============================================================================
// Layers
// =============================================================================

/// Where a theme layer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerSource {
    Fallback,
    Archetype,
    DarkMode,
    MediumMode,
    AiColors,
    AiTypography,
    Overrides,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeLayer {
    pub source: LayerSource,
    pub values: BTreeMap<String, String>,
}

impl ThemeLayer {
    fn new(source: LayerSource) -> Self {
        Self {
            source,
            values: BTreeMap::new(),
        }
    }

    /// Set a field, ignoring blank values.
    fn set(&mut self, group: &str, field: &str, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.values.insert(format!("{group}.{field}"), value.to_string());
        }
    }

    fn set_palette(&mut self, palette: &ModePalette) {
        for (field, value) in palette.entries() {
            self.set("colors", field, value);
        }
    }

    fn set_colors<'a>(&mut self, colors: impl IntoIterator<Item = (&'a String, &'a String)>) {
        self.set_colors_within(colors, COLOR_FIELDS);
    }

    fn set_colors_within<'a>(
        &mut self,
        colors: impl IntoIterator<Item = (&'a String, &'a String)>,
        allowed: &[&str],
    ) {
        for (key, value) in colors {
            let field = snake_case(key);
            if allowed.contains(&field.as_str()) {
                self.set("colors", &field, value);
            } else {
                debug!(source = ?self.source, field = %key, "ignoring unknown color field");
            }
        }
    }
}

/// Build the ordered layer list for one theme.
pub fn theme_layers(
    archetype: &Archetype,
    modes: &Modes,
    overrides: &ThemeOverrides,
    ai: Option<&AiContent>,
) -> Vec<ThemeLayer> {
    let mut layers = Vec::with_capacity(7);

    let mut fallback = ThemeLayer::new(LayerSource::Fallback);
    for (key, value) in FALLBACK {
        fallback.values.insert(key.to_string(), value.to_string());
    }
    layers.push(fallback);

    let style = &archetype.style;
    let mut base = ThemeLayer::new(LayerSource::Archetype);
    base.set_colors(&style.colors);
    for (field, value) in &style.typography {
        base.set("typography", field, value);
    }
    for (field, value) in &style.spacing {
        base.set("spacing", field, value);
    }
    base.set("imagery", "style", style.imagery.as_str());
    layers.push(base);

    if overrides.dark {
        if overrides.medium {
            debug!("dark and medium both requested; dark wins");
        }
        let mut dark = ThemeLayer::new(LayerSource::DarkMode);
        dark.set_palette(style.dark.as_ref().unwrap_or(&modes.dark));
        layers.push(dark);
    } else if overrides.medium {
        let mut medium = ThemeLayer::new(LayerSource::MediumMode);
        medium.set_palette(style.medium.as_ref().unwrap_or(&modes.medium));
        layers.push(medium);
    }

    if let Some(ai) = ai {
        let mut colors = ThemeLayer::new(LayerSource::AiColors);
        if overrides.dark || overrides.medium {
            colors.set_colors_within(&ai.colors, BRAND_COLOR_FIELDS);
        } else {
            colors.set_colors(&ai.colors);
        }
        layers.push(colors);

        let mut typography = ThemeLayer::new(LayerSource::AiTypography);
        if let Some(font) = &ai.typography.heading_font {
            typography.set("typography", "heading_font", font);
        }
        if let Some(font) = &ai.typography.body_font {
            typography.set("typography", "body_font", font);
        }
        if let Some(style) = ai.imagery {
            typography.set("imagery", "style", style.as_str());
        }
        layers.push(typography);
    }

    let mut caller = ThemeLayer::new(LayerSource::Overrides);
    caller.set_colors(&overrides.colors);
    let fonts = &overrides.fonts;
    for (field, value) in [
        ("heading_font", &fonts.heading),
        ("body_font", &fonts.body),
        ("base_size", &fonts.base_size),
    ] {
        if let Some(value) = value {
            caller.set("typography", field, value);
        }
    }
    let spacing = &overrides.spacing;
    for (field, value) in [
        ("border_radius", &spacing.border_radius),
        ("section_padding", &spacing.section_padding),
        ("card_padding", &spacing.card_padding),
        ("gap", &spacing.gap),
        ("button_padding", &spacing.button_padding),
    ] {
        if let Some(value) = value {
            caller.set("spacing", field, value);
        }
    }
    layers.push(caller);

    layers.retain(|layer| !layer.values.is_empty());
    layers
}

/// Reduce layers left to right; later layers win per field.
pub fn reduce_layers(layers: &[ThemeLayer]) -> BTreeMap<String, String> {
    let mut merged = BTreeMap::new();
    for layer in layers {
        merged.extend(layer.values.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}

// =============================================================================
// Resolved theme
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    Light,
    Medium,
    Dark,
}

impl ColorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Medium => "medium",
            ColorMode::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    pub text_muted: String,
    pub border: String,
    pub on_primary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeTypography {
    pub heading_font: String,
    pub body_font: String,
    pub base_size: String,
    pub heading_weight: String,
    pub line_height: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeSpacing {
    pub border_radius: String,
    pub section_padding: String,
    pub card_padding: String,
    pub gap: String,
    pub button_padding: String,
}

/// Photographic treatment applied to hero and gallery imagery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageryTreatment {
    pub style: ImageryStyle,
    pub overlay_opacity: f32,
    pub filter: String,
}

impl From<ImageryStyle> for ImageryTreatment {
    fn from(style: ImageryStyle) -> Self {
        Self {
            style,
            overlay_opacity: style.overlay_opacity(),
            filter: style.css_filter().to_string(),
        }
    }
}

/// A fully merged theme. Every field is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTheme {
    pub mode: ColorMode,
    pub vibe: String,
    pub colors: ThemeColors,
    pub typography: ThemeTypography,
    pub spacing: ThemeSpacing,
    pub imagery: ImageryTreatment,
}

/// Resolve the theme for an archetype under the given overrides.
pub fn resolve_theme(
    archetype: &Archetype,
    modes: &Modes,
    overrides: &ThemeOverrides,
    ai: Option<&AiContent>,
) -> ResolvedTheme {
    let layers = theme_layers(archetype, modes, overrides, ai);
    let merged = reduce_layers(&layers);
    let mode = if overrides.dark {
        ColorMode::Dark
    } else if overrides.medium {
        ColorMode::Medium
    } else {
        ColorMode::Light
    };
    ResolvedTheme::from_merged(&merged, mode, &archetype.style.vibe)
}

impl ResolvedTheme {
    fn from_merged(merged: &BTreeMap<String, String>, mode: ColorMode, vibe: &str) -> Self {
        let get = |key: &str| {
            merged
                .get(key)
                .cloned()
                .or_else(|| {
                    FALLBACK
                        .iter()
                        .find(|(k, _)| *k == key)
                        .map(|(_, v)| v.to_string())
                })
                .unwrap_or_default()
        };
        let imagery = ImageryStyle::parse(&get("imagery.style")).unwrap_or_default();
        Self {
            mode,
            vibe: vibe.to_string(),
            colors: ThemeColors {
                primary: get("colors.primary"),
                secondary: get("colors.secondary"),
                accent: get("colors.accent"),
                background: get("colors.background"),
                surface: get("colors.surface"),
                text: get("colors.text"),
                text_muted: get("colors.text_muted"),
                border: get("colors.border"),
                on_primary: get("colors.on_primary"),
            },
            typography: ThemeTypography {
                heading_font: get("typography.heading_font"),
                body_font: get("typography.body_font"),
                base_size: get("typography.base_size"),
                heading_weight: get("typography.heading_weight"),
                line_height: get("typography.line_height"),
            },
            spacing: ThemeSpacing {
                border_radius: get("spacing.border_radius"),
                section_padding: get("spacing.section_padding"),
                card_padding: get("spacing.card_padding"),
                gap: get("spacing.gap"),
                button_padding: get("spacing.button_padding"),
            },
            imagery: imagery.into(),
        }
    }

    /// Every string field, for totality checks.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let c = &self.colors;
        let t = &self.typography;
        let s = &self.spacing;
        vec![
            ("colors.primary", c.primary.as_str()),
            ("colors.secondary", c.secondary.as_str()),
            ("colors.accent", c.accent.as_str()),
            ("colors.background", c.background.as_str()),
            ("colors.surface", c.surface.as_str()),
            ("colors.text", c.text.as_str()),
            ("colors.text_muted", c.text_muted.as_str()),
            ("colors.border", c.border.as_str()),
            ("colors.on_primary", c.on_primary.as_str()),
            ("typography.heading_font", t.heading_font.as_str()),
            ("typography.body_font", t.body_font.as_str()),
            ("typography.base_size", t.base_size.as_str()),
            ("typography.heading_weight", t.heading_weight.as_str()),
            ("typography.line_height", t.line_height.as_str()),
            ("spacing.border_radius", s.border_radius.as_str()),
            ("spacing.section_padding", s.section_padding.as_str()),
            ("spacing.card_padding", s.card_padding.as_str()),
            ("spacing.gap", s.gap.as_str()),
            ("spacing.button_padding", s.button_padding.as_str()),
        ]
    }
}

/// Generate CSS custom properties for a resolved theme.
pub fn theme_css(theme: &ResolvedTheme) -> String {
    let c = &theme.colors;
    let t = &theme.typography;
    let s = &theme.spacing;
    format!(
        r#":root {{
    --color-primary: {primary};
    --color-secondary: {secondary};
    --color-accent: {accent};
    --color-bg: {background};
    --color-surface: {surface};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-border: {border};
    --color-on-primary: {on_primary};
    --font-heading: {heading_font};
    --font-body: {body_font};
    --font-size-base: {base_size};
    --font-weight-heading: {heading_weight};
    --line-height: {line_height};
    --radius: {border_radius};
    --section-padding: {section_padding};
    --card-padding: {card_padding};
    --gap: {gap};
    --button-padding: {button_padding};
    --image-overlay: {overlay};
    --image-filter: {filter};
}}"#,
        primary = c.primary,
        secondary = c.secondary,
        accent = c.accent,
        background = c.background,
        surface = c.surface,
        text = c.text,
        text_muted = c.text_muted,
        border = c.border,
        on_primary = c.on_primary,
        heading_font = t.heading_font,
        body_font = t.body_font,
        base_size = t.base_size,
        heading_weight = t.heading_weight,
        line_height = t.line_height,
        border_radius = s.border_radius,
        section_padding = s.section_padding,
        card_padding = s.card_padding,
        gap = s.gap,
        button_padding = s.button_padding,
        overlay = theme.imagery.overlay_opacity,
        filter = theme.imagery.filter,
    )
}
