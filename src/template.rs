use serde::Deserialize;
use serde_json::Value;

use crate::blocks::Block;
use crate::config::RenderOptions;
use crate::error::{NewsletterError, NewsletterResult};
use crate::theme::Theme;

/// A saved newsletter: ordered blocks plus the theme they render against.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    pub theme: Theme,
    pub blocks: Vec<Block>,
}

impl Template {
    pub fn render(&self, options: &RenderOptions) -> String {
        crate::render_newsletter_with(&self.blocks, &self.theme, options)
    }
}

#[derive(Deserialize)]
struct BlockList(#[serde(deserialize_with = "crate::lenient::list")] Vec<Block>);

/// Parse a template from JSON.
///
/// Accepts either `{ "blocks": [...], "theme": {...} }` or a bare array of
/// blocks, which renders against the default theme. Individual blocks that
/// cannot be decoded are skipped.
pub fn parse_template(json: &str) -> NewsletterResult<Template> {
    let value: Value = serde_json::from_str(json)?;
    match value {
        Value::Array(_) => Ok(Template {
            theme: Theme::default(),
            blocks: decode_blocks(value)?,
        }),
        Value::Object(mut map) => {
            let blocks = map.remove("blocks").ok_or_else(|| {
                NewsletterError::InvalidTemplate("missing \"blocks\" field".to_string())
            })?;
            if !blocks.is_array() {
                return Err(NewsletterError::InvalidTemplate(
                    "\"blocks\" must be an array".to_string(),
                ));
            }
            let theme = match map.remove("theme") {
                Some(theme @ Value::Object(_)) => serde_json::from_value(theme)?,
                _ => Theme::default(),
            };
            Ok(Template {
                theme,
                blocks: decode_blocks(blocks)?,
            })
        }
        _ => Err(NewsletterError::InvalidTemplate(
            "expected an object or an array of blocks".to_string(),
        )),
    }
}

fn decode_blocks(value: Value) -> NewsletterResult<Vec<Block>> {
    let BlockList(blocks) = serde_json::from_value(value)?;
    Ok(blocks)
}
