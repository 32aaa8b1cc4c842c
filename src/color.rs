//! Color conversions for translucent backgrounds.

use regex::Regex;
use std::sync::OnceLock;

fn hex_regex() -> &'static Regex {
    static HEX_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
    HEX_COLOR_REGEX.get_or_init(|| {
        Regex::new(r"^#([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$").unwrap()
    })
}

fn rgb_regex() -> &'static Regex {
    static RGB_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
    RGB_COLOR_REGEX.get_or_init(|| {
        Regex::new(r"^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$").unwrap()
    })
}

/// Red, green and blue channels of a color the converter understands.
///
/// Channels from `rgb()` are kept as written, so `rgb(300,0,0)` converts to
/// `rgba(300,0,0,..)` and the client does the clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl Rgb {
    /// Parse `#rrggbb` or `rgb(r,g,b)` with up to three digits per channel.
    /// Shorthand hex, named colors and `hsl()` are not recognized.
    pub fn parse(color: &str) -> Option<Rgb> {
        let color = color.trim();
        if let Some(caps) = hex_regex().captures(color) {
            let channel = |i: usize| u16::from_str_radix(&caps[i], 16).ok();
            return Some(Rgb {
                r: channel(1)?,
                g: channel(2)?,
                b: channel(3)?,
            });
        }
        if let Some(caps) = rgb_regex().captures(color) {
            let channel = |i: usize| caps[i].parse::<u16>().ok();
            return Some(Rgb {
                r: channel(1)?,
                g: channel(2)?,
                b: channel(3)?,
            });
        }
        None
    }

    pub fn to_rgba(self, opacity: f64) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, opacity)
    }
}

/// Apply `opacity` to `color` when the format is recognized; otherwise the
/// color comes back untouched and the opacity is dropped.
pub fn with_opacity(color: &str, opacity: f64) -> String {
    match Rgb::parse(color) {
        Some(rgb) => rgb.to_rgba(opacity),
        None => color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse("#336699"), Some(Rgb { r: 51, g: 102, b: 153 }));
        assert_eq!(Rgb::parse("#FFfF00"), Some(Rgb { r: 255, g: 255, b: 0 }));
    }

    #[test]
    fn test_parse_rgb() {
        assert_eq!(Rgb::parse("rgb(10,20,30)"), Some(Rgb { r: 10, g: 20, b: 30 }));
        assert_eq!(Rgb::parse("rgb( 1 , 2 , 3 )"), Some(Rgb { r: 1, g: 2, b: 3 }));
    }

    #[test]
    fn test_unrecognized_formats() {
        assert_eq!(Rgb::parse("#abc"), None);
        assert_eq!(Rgb::parse("red"), None);
        assert_eq!(Rgb::parse("hsl(0, 100%, 50%)"), None);
        assert_eq!(Rgb::parse("rgba(1,2,3,0.5)"), None);
    }

    #[test]
    fn test_with_opacity() {
        assert_eq!(with_opacity("#336699", 0.5), "rgba(51,102,153,0.5)");
        assert_eq!(with_opacity("rgb(0, 128, 255)", 0.25), "rgba(0,128,255,0.25)");
        assert_eq!(with_opacity("tomato", 0.5), "tomato");
    }

    #[test]
    fn test_out_of_range_channels_pass_through() {
        assert_eq!(Rgb::parse("rgb(300,0,999)"), Some(Rgb { r: 300, g: 0, b: 999 }));
        assert_eq!(with_opacity("rgb(300,0,0)", 0.5), "rgba(300,0,0,0.5)");
        assert_eq!(with_opacity("rgb(1000,0,0)", 0.5), "rgb(1000,0,0)");
    }
}
