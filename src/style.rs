use serde::{Deserialize, Serialize};

use crate::color;
use crate::lenient;
use crate::theme::Theme;

pub const DEFAULT_BUTTON_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_BORDER_COLOR: &str = "#dddddd";
pub const DEFAULT_BORDER_WIDTH: &str = "1px";

/// Per-block style overrides as stored by the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleSpec {
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub background_gradient: Option<String>,
    #[serde(deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub background_opacity: Option<f64>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub button_color: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub button_text_color: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub border_width: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
    Justify,
}

impl Align {
    /// Lenient parse of an editor alignment value; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Align> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Align::Left),
            "center" | "centre" => Some(Align::Center),
            "right" => Some(Align::Right),
            "justify" => Some(Align::Justify),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
            Align::Justify => "justify",
        }
    }

    /// Value for the legacy `align` attribute on table cells.
    pub fn cell_attr(self) -> &'static str {
        match self {
            Align::Justify => "left",
            other => other.as_str(),
        }
    }
}

/// Built-in defaults a block type contributes before user overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDefaults {
    pub padding: Option<&'static str>,
    pub align: Align,
    /// Whether `borderColor`/`borderWidth` style the outer container. Blocks
    /// that draw their own line (dividers) consume the border fields instead.
    pub container_border: bool,
}

impl BlockDefaults {
    pub const fn new(padding: &'static str, align: Align) -> Self {
        Self {
            padding: Some(padding),
            align,
            container_border: true,
        }
    }

    pub const fn unpadded(align: Align) -> Self {
        Self {
            padding: None,
            align,
            container_border: true,
        }
    }

    pub const fn without_container_border(self) -> Self {
        Self {
            container_border: false,
            ..self
        }
    }
}

/// Fully defaulted style for one block.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub align: Align,
    /// Declarations for the block's outer cell, custom properties included.
    pub container: String,
    pub text_color: String,
    pub link_color: String,
    pub button_background: String,
    pub button_text_color: String,
    pub border_color: String,
    pub border_width: String,
}

impl ResolvedStyle {
    /// Inline declarations for an anchor rendered as a button.
    pub fn button_css(&self) -> String {
        let mut css = Declarations::default();
        css.push("display", "inline-block");
        css.push("padding", "12px 24px");
        css.push("background-color", &self.button_background);
        css.push("color", &self.button_text_color);
        css.push("text-decoration", "none");
        css.push("border-radius", "4px");
        css.push("font-weight", "bold");
        css.finish()
    }

    pub fn link_css(&self) -> String {
        format!("color: {}; text-decoration: underline;", self.link_color)
    }
}

/// Resolve a block's optional style against the theme and the block's defaults.
///
/// `align` is the block's `content.align`, if any.
pub fn resolve(
    style: Option<&StyleSpec>,
    align: Option<&str>,
    theme: &Theme,
    defaults: BlockDefaults,
) -> ResolvedStyle {
    let empty = StyleSpec::default();
    let style = style.unwrap_or(&empty);
    let align = align.and_then(Align::parse).unwrap_or(defaults.align);

    let mut css = Declarations::default();
    push_background(&mut css, style);

    if let Some(c) = set(&style.text_color) {
        css.push("color", c);
    }
    if defaults.container_border {
        if let Some(c) = set(&style.border_color) {
            css.push("border-color", c);
        }
        if let Some(w) = set(&style.border_width).filter(|w| *w != "0") {
            css.push("border-width", w);
            css.push("border-style", "solid");
        }
    }
    if let Some(r) = set(&style.border_radius) {
        css.push("border-radius", r);
    }
    if let Some(p) = set(&style.padding).or(defaults.padding) {
        css.push("padding", p);
    }
    css.push("text-align", align.as_str());

    if let Some(c) = set(&style.button_color) {
        css.push("--nl-button-bg", c);
    }
    if let Some(c) = set(&style.button_text_color) {
        css.push("--nl-button-text", c);
    }
    if let Some(c) = set(&style.border_color) {
        css.push("--nl-border-color", c);
    }

    ResolvedStyle {
        align,
        container: css.finish(),
        text_color: set(&style.text_color)
            .unwrap_or(theme.container_text_color.as_str())
            .to_string(),
        link_color: theme.global_link_color.clone(),
        button_background: set(&style.button_color)
            .unwrap_or(theme.global_link_color.as_str())
            .to_string(),
        button_text_color: set(&style.button_text_color)
            .unwrap_or(DEFAULT_BUTTON_TEXT_COLOR)
            .to_string(),
        border_color: set(&style.border_color)
            .unwrap_or(DEFAULT_BORDER_COLOR)
            .to_string(),
        border_width: set(&style.border_width)
            .unwrap_or(DEFAULT_BORDER_WIDTH)
            .to_string(),
    }
}

/// Image, then gradient, then color; only the first one present is emitted.
fn push_background(css: &mut Declarations, style: &StyleSpec) {
    if let Some(image) = set(&style.background_image) {
        css.push("background-image", &format!("url({})", image));
        css.push("background-size", "cover");
        css.push("background-position", "center");
    } else if let Some(gradient) = set(&style.background_gradient) {
        css.push("background-image", gradient);
    } else if let Some(color) = set(&style.background_color) {
        match style.background_opacity {
            Some(opacity) if opacity < 1.0 => {
                css.push("background-color", &color::with_opacity(color, opacity))
            }
            _ => css.push("background-color", color),
        }
    }
}

/// A field counts as set when it holds non-blank text.
fn set(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Accumulates `name: value;` pairs separated by single spaces.
#[derive(Default)]
pub(crate) struct Declarations(String);

impl Declarations {
    pub(crate) fn push(&mut self, name: &str, value: &str) {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        self.0.push_str(name);
        self.0.push_str(": ");
        self.0.push_str(value);
        self.0.push(';');
    }

    pub(crate) fn finish(self) -> String {
        self.0
    }
}
