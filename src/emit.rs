//! Page emission.
//!
//! An [`Emitter`] turns one [`PageSpecification`] into source text. It reads
//! nothing but the specification: no registry lookups, no classification, no
//! raw AI content.
//!
//! [`HtmlEmitter`] renders a standalone HTML document with
//! [maud](https://maud.lambda.xyz/). The base stylesheet (`static/site.css`)
//! is embedded at compile time and the resolved theme is prepended as CSS
//! custom properties, so one stylesheet serves every archetype. Every text
//! field is escaped by maud except about paragraphs, which are rendered as
//! Markdown with raw HTML neutralized.
//!
//! [`JsonEmitter`] writes the specification itself as pretty JSON.

use crate::compose::{NavLink, PageSpecification};
use crate::content::{CallToAction, Offering};
use crate::registry::{HeroKind, SectionDescriptor, SectionKind};
use crate::theme::theme_css;
use crate::types::PageKind;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Event, Parser, html as md_html};
use thiserror::Error;

const CSS_STATIC: &str = include_str!("../static/site.css");

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("page '{0}' has no sections")]
    NoSections(PageKind),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("render error: {0}")]
    Render(String),
}

/// Turns a page specification into page source text.
pub trait Emitter {
    fn emit(&self, spec: &PageSpecification) -> Result<String, EmitError>;

    /// Extension of the files this emitter produces.
    fn extension(&self) -> &'static str {
        "html"
    }
}

/// Standalone HTML documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEmitter;

impl Emitter for HtmlEmitter {
    fn emit(&self, spec: &PageSpecification) -> Result<String, EmitError> {
        if spec.sections.is_empty() {
            return Err(EmitError::NoSections(spec.page));
        }
        Ok(render_page(spec).into_string())
    }
}

/// The specification as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter;

impl Emitter for JsonEmitter {
    fn emit(&self, spec: &PageSpecification) -> Result<String, EmitError> {
        Ok(spec.to_json_pretty()?)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

// ============================================================================
// HTML Components
// ============================================================================

fn page_title(spec: &PageSpecification) -> String {
    let content = &spec.content;
    match spec.page {
        PageKind::Home => format!("{} | {}", content.business_name, content.subheadline.value),
        page => format!("{} | {}", page.label(), content.business_name),
    }
}

/// Theme variables followed by the base stylesheet.
fn stylesheet(spec: &PageSpecification) -> String {
    // Theme values are caller-controlled; keep them from closing the element.
    let vars = theme_css(&spec.theme).replace("</", "<\\/");
    format!("{vars}\n{CSS_STATIC}")
}

fn base_document(spec: &PageSpecification, content: Markup) -> Markup {
    let body_class = format!(
        "page-{} mode-{} vibe-{}",
        spec.page,
        spec.theme.mode.as_str(),
        spec.theme.vibe
    );
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="generator" content={ "sitewright " (spec.archetype_id) };
                title { (page_title(spec)) }
                style { (PreEscaped(stylesheet(spec))) }
            }
            body class=(body_class) {
                (content)
            }
        }
    }
}

fn site_header(business_name: &str, navigation: &[NavLink]) -> Markup {
    html! {
        header.site-header {
            a.brand href=(PageKind::Home.file_name()) { (business_name) }
            nav.site-nav {
                ul {
                    @for link in navigation {
                        li class=[link.current.then_some("current")] {
                            a href=(link.href) { (link.label) }
                        }
                    }
                }
            }
        }
    }
}

fn site_footer(spec: &PageSpecification) -> Markup {
    let contact = &spec.content.contact;
    html! {
        footer.site-footer {
            p { (spec.content.business_name) }
            @if !contact.address.is_empty() {
                p { (contact.address) }
            }
            @if !contact.phone.is_empty() {
                p { a href={ "tel:" (contact.phone.replace(' ', "")) } { (contact.phone) } }
            }
        }
    }
}

fn button(cta: &CallToAction, secondary: bool) -> Markup {
    html! {
        a.button.secondary[secondary] href=(cta.href) { (cta.label.value) }
    }
}

/// About paragraph as Markdown. Raw HTML is shown as text.
fn markdown_paragraph(text: &str) -> Markup {
    let events = Parser::new(text).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::new();
    md_html::push_html(&mut out, events);
    PreEscaped(out)
}

fn offering_card(item: &Offering) -> Markup {
    html! {
        li.card {
            h3 { (item.name) }
            @if !item.price.is_empty() {
                p.price { (item.price) }
            }
            @if !item.description.is_empty() {
                p.muted { (item.description) }
            }
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

fn section_shell(section: &SectionDescriptor, body: Markup) -> Markup {
    let class = format!("section {} layout-{}", section.kind.as_str(), section.layout);
    html! {
        section class=(class) data-section=(section.kind.as_str()) {
            div.inner { (body) }
        }
    }
}

fn render_hero(spec: &PageSpecification, section: &SectionDescriptor) -> Markup {
    let content = &spec.content;
    let image = &content.images.hero;
    let style = (!image.is_empty() && spec.hero != HeroKind::Split)
        .then(|| format!("background-image: url('{image}')"));
    let class = format!(
        "section hero hero--{} layout-{}",
        spec.hero.as_str(),
        section.layout
    );
    html! {
        section class=(class) data-section="hero" style=[style] {
            div.inner {
                div.hero-copy {
                    h1 { (content.headline.value) }
                    p.lead { (content.subheadline.value) }
                    div.actions {
                        (button(&content.primary_cta, false))
                        (button(&content.secondary_cta, true))
                    }
                }
                @if spec.hero == HeroKind::Split && !image.is_empty() {
                    div.hero-media {
                        img src=(image) alt=(content.business_name);
                    }
                }
            }
        }
    }
}

/// Render one section, or `None` when it has nothing to show.
fn render_section(spec: &PageSpecification, section: &SectionDescriptor) -> Option<Markup> {
    let content = &spec.content;
    let body = match section.kind {
        SectionKind::Hero => return Some(render_hero(spec, section)),
        SectionKind::FeaturedItems => {
            if content.featured.is_empty() {
                return None;
            }
            html! {
                h2 { "Featured" }
                ul.cards {
                    @for item in &content.featured {
                        (offering_card(&item.value))
                    }
                }
                @if spec.page == PageKind::Home {
                    div.actions { (button(&content.primary_cta, false)) }
                }
            }
        }
        SectionKind::MenuList => {
            if content.menu.value.is_empty() {
                return None;
            }
            html! {
                h2 { (spec.page.label()) }
                @for group in &content.menu.value {
                    div.menu-group {
                        h3 { (group.name) }
                        ul {
                            @for item in &group.items {
                                li.menu-item {
                                    div {
                                        strong { (item.name) }
                                        @if !item.description.is_empty() {
                                            p.muted { (item.description) }
                                        }
                                    }
                                    @if !item.price.is_empty() {
                                        span.price { (item.price) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        SectionKind::AboutStory => {
            if content.about.value.is_empty() {
                return None;
            }
            html! {
                h2 { "Our Story" }
                @for paragraph in &content.about.value {
                    (markdown_paragraph(paragraph))
                }
            }
        }
        SectionKind::Testimonials => {
            if content.testimonials.is_empty() {
                return None;
            }
            html! {
                h2 { "What People Say" }
                ul.cards {
                    @for testimonial in &content.testimonials {
                        li.card {
                            blockquote {
                                p { (testimonial.value.quote) }
                                footer { cite { (testimonial.value.author) } }
                            }
                        }
                    }
                }
            }
        }
        SectionKind::Stats => {
            if content.stats.is_empty() {
                return None;
            }
            html! {
                dl {
                    @for stat in &content.stats {
                        div {
                            dt { (stat.value) }
                            dd { (stat.label) }
                        }
                    }
                }
            }
        }
        SectionKind::GalleryGrid => {
            if content.images.gallery.is_empty() {
                return None;
            }
            html! {
                h2 { "Gallery" }
                div.grid {
                    @for (i, src) in content.images.gallery.iter().enumerate() {
                        img
                            src=(src)
                            alt={ (content.business_name) " photo " (i + 1) }
                            loading="lazy";
                    }
                }
            }
        }
        SectionKind::ContactDetails => {
            let contact = &content.contact;
            html! {
                h2 { "Visit Us" }
                dl {
                    @if !contact.address.is_empty() {
                        dt { "Address" }
                        dd { (contact.address) }
                    }
                    @if !contact.phone.is_empty() {
                        dt { "Phone" }
                        dd {
                            a href={ "tel:" (contact.phone.replace(' ', "")) } { (contact.phone) }
                        }
                    }
                    @if !contact.email.is_empty() {
                        dt { "Email" }
                        dd { a href={ "mailto:" (contact.email) } { (contact.email) } }
                    }
                    dt { "Hours" }
                    dd { (contact.hours) }
                }
            }
        }
        SectionKind::MapPlaceholder => {
            let label = match content.contact.address.as_str() {
                "" => content.business_name.as_str(),
                address => address,
            };
            html! {
                div.map role="img" aria-label={ "Map to " (label) } {
                    p.muted { (label) }
                }
            }
        }
        SectionKind::LoyaltyBanner => html! {
            h2 { "Join our rewards program" }
            p { "Earn points every visit at " (content.business_name) "." }
            div.actions {
                a.button href=(PageKind::Contact.file_name()) { "Sign Up" }
            }
        },
        SectionKind::CtaBand => html! {
            h2 { (content.headline.value) }
            div.actions {
                (button(&content.primary_cta, false))
                (button(&content.secondary_cta, true))
            }
        },
    };
    Some(section_shell(section, body))
}

fn render_page(spec: &PageSpecification) -> Markup {
    let content = html! {
        (site_header(&spec.content.business_name, &spec.navigation))
        main {
            @for section in &spec.sections {
                @if let Some(markup) = render_section(spec, section) {
                    (markup)
                }
            }
        }
        (site_footer(spec))
    };
    base_document(spec, content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiContent;
    use crate::site::GenerateOptions;
    use crate::test_helpers::*;
    use crate::types::BusinessProfile;

    fn spec_with(
        profile: &BusinessProfile,
        options: &GenerateOptions,
        page: PageKind,
    ) -> PageSpecification {
        let options = GenerateOptions {
            pages: vec![PageKind::Home, page],
            ..options.clone()
        };
        find_page(&plan_with(profile, &options), page).clone()
    }

    fn spec_for(profile: &BusinessProfile, page: PageKind) -> PageSpecification {
        spec_with(profile, &GenerateOptions::default(), page)
    }

    fn emit_html(spec: &PageSpecification) -> String {
        HtmlEmitter.emit(spec).unwrap()
    }

    // =========================================================================
    // Document structure
    // =========================================================================

    #[test]
    fn document_includes_doctype_and_title() {
        let spec = spec_for(&BusinessProfile::new("Bean There", "cafe"), PageKind::Menu);
        let html = emit_html(&spec);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Menu | Bean There</title>"));
    }

    #[test]
    fn theme_is_injected_as_custom_properties() {
        let spec = spec_for(&BusinessProfile::new("Bean There", "cafe"), PageKind::Home);
        let html = emit_html(&spec);
        assert!(html.contains("--color-primary: #7b4b2a;"));
        assert!(html.contains("var(--color-primary)"));
        assert!(html.contains("mode-light"));
    }

    #[test]
    fn sections_render_in_specification_order() {
        let profile = BusinessProfile::new("Maison", "restaurant").with_description("fine dining");
        let spec = spec_for(&profile, PageKind::Home);
        let html = emit_html(&spec);
        let positions: Vec<usize> = spec
            .sections
            .iter()
            .map(|s| {
                html.find(&format!("data-section=\"{}\"", s.kind.as_str()))
                    .unwrap_or_else(|| panic!("missing {}", s.kind.as_str()))
            })
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
        assert!(html.contains("hero--full-bleed"));
    }

    #[test]
    fn navigation_marks_current_page() {
        let spec = spec_for(&BusinessProfile::new("Bean There", "cafe"), PageKind::Menu);
        let html = emit_html(&spec);
        assert!(html.contains(r#"<li class="current"><a href="menu.html">Menu</a></li>"#));
        assert!(html.contains(r#"<li><a href="index.html">Home</a></li>"#));
    }

    #[test]
    fn html_escape_in_maud() {
        let spec = spec_for(&BusinessProfile::new("<b>Bob & Co</b>", "cafe"), PageKind::Home);
        let html = emit_html(&spec);
        assert!(html.contains("&lt;b&gt;Bob &amp; Co&lt;/b&gt;"));
        assert!(!html.contains("<b>Bob"));
    }

    // =========================================================================
    // Section content
    // =========================================================================

    #[test]
    fn about_paragraphs_render_markdown() {
        let profile = BusinessProfile {
            about: vec!["We roast **daily**.".into(), "<script>alert(1)</script>".into()],
            ..BusinessProfile::new("Bean There", "cafe")
        };
        let html = emit_html(&spec_for(&profile, PageKind::About));
        assert!(html.contains("<strong>daily</strong>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn menu_page_lists_prices() {
        let ai = AiContent::from_json_str(
            r#"{"menu": [{"name": "Drinks", "items": [{"name": "Chai", "price": 4}]}]}"#,
        );
        let options = GenerateOptions {
            ai_content: Some(ai),
            ..Default::default()
        };
        let spec = spec_with(&BusinessProfile::new("Bean There", "cafe"), &options, PageKind::Menu);
        let html = emit_html(&spec);
        assert!(html.contains("<h3>Drinks</h3>"));
        assert!(html.contains("<span class=\"price\">$4.00</span>"));
    }

    #[test]
    fn contact_hides_missing_fields() {
        let profile = BusinessProfile {
            phone: "555 0100".into(),
            ..BusinessProfile::new("Pipe Pros", "plumber")
        };
        let html = emit_html(&spec_for(&profile, PageKind::Contact));
        assert!(html.contains("href=\"tel:5550100\""));
        assert!(!html.contains("mailto:"));
        assert!(!html.contains("<dt>Address</dt>"));
        assert!(html.contains("Call for current hours"));
    }

    #[test]
    fn gallery_images_are_lazy() {
        let spec = spec_for(&BusinessProfile::new("Bean There", "cafe"), PageKind::Gallery);
        let html = emit_html(&spec);
        assert_eq!(html.matches("loading=\"lazy\"").count(), 9);
    }

    #[test]
    fn theme_values_cannot_close_style_element() {
        let mut spec = spec_for(&BusinessProfile::new("Bean There", "cafe"), PageKind::Home);
        spec.theme.colors.primary = "red</style><script>x</script>".into();
        let html = emit_html(&spec);
        assert!(!html.contains("</style><script>"));
    }

    // =========================================================================
    // Errors and other emitters
    // =========================================================================

    #[test]
    fn page_without_sections_fails() {
        let mut spec = spec_for(&BusinessProfile::new("Bean There", "cafe"), PageKind::Home);
        spec.sections.clear();
        let err = HtmlEmitter.emit(&spec).unwrap_err();
        assert!(matches!(err, EmitError::NoSections(PageKind::Home)));
    }

    #[test]
    fn json_emitter_writes_the_specification() {
        let spec = spec_for(&BusinessProfile::new("Calm", "yoga"), PageKind::Home);
        let json = JsonEmitter.emit(&spec).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["archetype_id"], "calm-sanctuary");
        assert_eq!(value["page"], "home");
    }
}
