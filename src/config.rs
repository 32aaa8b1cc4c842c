//! Render options: document title, preheader, container width and the few
//! knobs that make output reproducible. Loaded from YAML by the CLI and
//! overridden by its flags.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::NewsletterResult;

pub const DEFAULT_TITLE: &str = "Newsletter";
pub const DEFAULT_CONTAINER_WIDTH: u32 = 600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Text of the document `<title>`.
    pub title: String,
    /// Hidden preview text shown by inboxes next to the subject line.
    pub preheader: Option<String>,
    /// Width of the inner container in pixels. `0` means the default.
    pub container_width: u32,
    /// Emit the quiz scoring `<script>`. Most mail clients strip it.
    pub include_scripts: bool,
    /// Pin the footer copyright year; the local clock is used when unset.
    pub copyright_year: Option<i32>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            preheader: None,
            container_width: DEFAULT_CONTAINER_WIDTH,
            include_scripts: true,
            copyright_year: None,
        }
    }
}

impl RenderOptions {
    pub fn from_yaml_str(yaml: &str) -> NewsletterResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn year(&self) -> i32 {
        self.copyright_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    pub fn width(&self) -> u32 {
        if self.container_width == 0 {
            DEFAULT_CONTAINER_WIDTH
        } else {
            self.container_width
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_yaml_options() {
        let yaml = "title: Weekly Digest\npreheader: Top stories this week\ncontainerWidth: 640\nincludeScripts: false\ncopyrightYear: 2030\n";
        let options = RenderOptions::from_yaml_str(yaml).unwrap();
        assert_eq!(
            options,
            RenderOptions {
                title: "Weekly Digest".to_string(),
                preheader: Some("Top stories this week".to_string()),
                container_width: 640,
                include_scripts: false,
                copyright_year: Some(2030),
            }
        );
        assert_eq!(options.year(), 2030);
        assert_eq!(options.width(), 640);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let options = RenderOptions::from_yaml_str("title: Hi\n").unwrap();
        assert_eq!(options.title, "Hi");
        assert_eq!(options.container_width, DEFAULT_CONTAINER_WIDTH);
        assert!(options.include_scripts);

        assert_eq!(RenderOptions::from_yaml_str("").unwrap(), RenderOptions::default());
    }

    #[test]
    fn test_zero_width_means_default() {
        let options = RenderOptions {
            container_width: 0,
            ..Default::default()
        };
        assert_eq!(options.width(), DEFAULT_CONTAINER_WIDTH);
    }

    #[test]
    fn test_bad_yaml_is_an_error() {
        let result = RenderOptions::from_yaml_str("containerWidth: [wide]");
        assert!(result.is_err());
    }
}
