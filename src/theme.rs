use serde::{Deserialize, Serialize};

use crate::lenient;

pub const DEFAULT_CONTAINER_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_CONTAINER_TEXT_COLOR: &str = "#333333";
pub const DEFAULT_LINK_COLOR: &str = "#007bff";

/// Global colors applied to the whole newsletter for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawTheme")]
pub struct Theme {
    pub container_background: String,
    pub container_text_color: String,
    /// Link color, also the default button background.
    pub global_link_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            container_background: DEFAULT_CONTAINER_BACKGROUND.to_string(),
            container_text_color: DEFAULT_CONTAINER_TEXT_COLOR.to_string(),
            global_link_color: DEFAULT_LINK_COLOR.to_string(),
        }
    }
}

impl Theme {
    pub fn new(
        container_background: impl Into<String>,
        container_text_color: impl Into<String>,
        global_link_color: impl Into<String>,
    ) -> Self {
        Self {
            container_background: container_background.into(),
            container_text_color: container_text_color.into(),
            global_link_color: global_link_color.into(),
        }
    }
}

/// Wire shape of a theme; blank or missing colors fall back to the defaults.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawTheme {
    #[serde(deserialize_with = "lenient::text")]
    container_background: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    container_text_color: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    global_link_color: Option<String>,
}

impl From<RawTheme> for Theme {
    fn from(raw: RawTheme) -> Self {
        fn or_default(value: Option<String>, default: &str) -> String {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        }

        Self {
            container_background: or_default(raw.container_background, DEFAULT_CONTAINER_BACKGROUND),
            container_text_color: or_default(raw.container_text_color, DEFAULT_CONTAINER_TEXT_COLOR),
            global_link_color: or_default(raw.global_link_color, DEFAULT_LINK_COLOR),
        }
    }
}
