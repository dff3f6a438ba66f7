//! Style templates for image synthesis prompts

use std::fmt;

/// Visual style requested by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Realistic,
    Artistic,
    Cartoon,
    Abstract,
}

impl Style {
    pub const ALL: [Style; 4] = [
        Style::Realistic,
        Style::Artistic,
        Style::Cartoon,
        Style::Abstract,
    ];

    /// Look up a style key; unknown or missing keys fall back to `Realistic`
    pub fn from_key(key: Option<&str>) -> Self {
        match key.map(|k| k.trim().to_lowercase()).as_deref() {
            Some("artistic") => Style::Artistic,
            Some("cartoon") => Style::Cartoon,
            Some("abstract") => Style::Abstract,
            _ => Style::Realistic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Realistic => "realistic",
            Style::Artistic => "artistic",
            Style::Cartoon => "cartoon",
            Style::Abstract => "abstract",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Template wording differs between generating from text and restyling a photo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSet {
    Generate,
    Transform,
}

impl TemplateSet {
    fn apply(&self, style: Style, text: &str) -> String {
        match (self, style) {
            (TemplateSet::Generate, Style::Realistic) => format!(
                "photorealistic, highly detailed, {}, 8k resolution, professional photography",
                text
            ),
            (TemplateSet::Generate, Style::Artistic) => format!(
                "artistic painting, {}, oil painting style, masterpiece, detailed brushstrokes",
                text
            ),
            (TemplateSet::Generate, Style::Cartoon) => format!(
                "cartoon style, {}, animated, colorful, fun, pixar style",
                text
            ),
            (TemplateSet::Generate, Style::Abstract) => format!(
                "abstract art, {}, modern art, geometric shapes, vibrant colors",
                text
            ),
            (TemplateSet::Transform, Style::Realistic) => format!(
                "photorealistic version of {}, highly detailed, natural lighting, professional photography",
                text
            ),
            (TemplateSet::Transform, Style::Artistic) => format!(
                "artistic painting of {}, oil on canvas, expressive brushstrokes, gallery masterpiece",
                text
            ),
            (TemplateSet::Transform, Style::Cartoon) => format!(
                "cartoon illustration of {}, bold outlines, bright colors, animated style",
                text
            ),
            (TemplateSet::Transform, Style::Abstract) => format!(
                "abstract interpretation of {}, geometric forms, bold color fields, modern art",
                text
            ),
        }
    }
}

/// Compose a synthesis prompt from free text and a style key
pub fn compose(text: &str, style: Option<&str>, set: TemplateSet) -> String {
    set.apply(Style::from_key(style), text)
}
