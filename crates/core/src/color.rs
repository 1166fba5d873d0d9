//! Display colours and labels for frameworks, and the selector style table

use crate::data::Benchmark;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Parse `#rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// `h` in degrees, `s` and `l` in `0.0..=1.0`
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = (h.rem_euclid(360.0)) / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r1, g1, b1) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self {
            r: to_u8(r1),
            g: to_u8(g1),
            b: to_u8(b1),
        }
    }

    /// WCAG relative luminance
    pub fn luminance(&self) -> f64 {
        let linear = |c: u8| {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    /// WCAG contrast ratio, `1.0..=21.0`
    pub fn contrast(&self, other: &Rgb) -> f64 {
        let (a, b) = (self.luminance(), other.luminance());
        let (hi, lo) = if a > b { (a, b) } else { (b, a) };
        (hi + 0.05) / (lo + 0.05)
    }

    /// `rgba(r,g,b,alpha)`
    pub fn alpha(&self, alpha: f64) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, alpha)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// How one framework is drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    /// Dark line/label colour
    pub color: String,
    /// Brighter fill colour for bars
    pub background_color: String,
    /// "gin (1.9)"
    pub label: String,
}

/// FNV-1a, stable across platforms and releases
fn fnv1a(input: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in input.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

/// Dark colour derived from a framework label, and a brighter variant
pub fn label_colors(label: &str) -> (Rgb, Rgb) {
    let hash = fnv1a(label);
    let hue = (hash % 360) as f64;
    let saturation = 0.55 + ((hash >> 16) % 30) as f64 / 100.0;
    let lightness = 0.25 + ((hash >> 32) % 15) as f64 / 100.0;

    (
        Rgb::from_hsl(hue, saturation, lightness),
        Rgb::from_hsl(hue, saturation, (lightness + 0.2).min(0.9)),
    )
}

/// Colour and composite label for a benchmark. Keyed on the framework label,
/// so a framework keeps its colour across revisions.
pub fn appearance(benchmark: &Benchmark) -> Appearance {
    let (color, background) = label_colors(&benchmark.framework.label);
    Appearance {
        color: color.to_string(),
        background_color: background.to_string(),
        label: benchmark.framework.display_name(),
    }
}

/// Interaction state of one option in a framework selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionState {
    Selected,
    Focused,
    Default,
    Disabled,
}

impl OptionState {
    /// Disabled wins over selected, selected over focused
    pub fn resolve(disabled: bool, selected: bool, focused: bool) -> Self {
        if disabled {
            OptionState::Disabled
        } else if selected {
            OptionState::Selected
        } else if focused {
            OptionState::Focused
        } else {
            OptionState::Default
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Fill {
    None,
    Solid,
    Tint(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Ink {
    Muted,
    Contrast,
    Own,
}

#[derive(Debug, Clone, Copy)]
struct StyleRule {
    state: OptionState,
    background: Fill,
    foreground: Ink,
    active: Fill,
    cursor: &'static str,
}

const STYLE_TABLE: [StyleRule; 4] = [
    StyleRule {
        state: OptionState::Selected,
        background: Fill::Solid,
        foreground: Ink::Contrast,
        active: Fill::Solid,
        cursor: "default",
    },
    StyleRule {
        state: OptionState::Focused,
        background: Fill::Tint(0.1),
        foreground: Ink::Own,
        active: Fill::Tint(0.3),
        cursor: "default",
    },
    StyleRule {
        state: OptionState::Default,
        background: Fill::None,
        foreground: Ink::Own,
        active: Fill::Tint(0.3),
        cursor: "default",
    },
    StyleRule {
        state: OptionState::Disabled,
        background: Fill::None,
        foreground: Ink::Muted,
        active: Fill::None,
        cursor: "not-allowed",
    },
];

const MUTED_INK: &str = "#ccc";

/// Resolved style of a selector option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionStyle {
    pub background: Option<String>,
    pub foreground: String,
    /// Background while pressed
    pub active_background: Option<String>,
    pub cursor: &'static str,
}

impl OptionStyle {
    /// Inline CSS declarations
    pub fn to_css(&self) -> String {
        let mut css = format!("color: {}; cursor: {};", self.foreground, self.cursor);
        if let Some(bg) = &self.background {
            css.push_str(&format!(" background-color: {};", bg));
        }
        css
    }
}

fn paint(fill: Fill, color: &Rgb) -> Option<String> {
    match fill {
        Fill::None => None,
        Fill::Solid => Some(color.to_string()),
        Fill::Tint(alpha) => Some(color.alpha(alpha)),
    }
}

/// Style for an option drawn in `color` (`#rrggbb`; anything else reads as black)
pub fn option_style(color: &str, state: OptionState) -> OptionStyle {
    let rgb = Rgb::from_hex(color).unwrap_or(Rgb::BLACK);
    let rule = STYLE_TABLE
        .iter()
        .find(|r| r.state == state)
        .copied()
        .unwrap_or(STYLE_TABLE[2]);

    let foreground = match rule.foreground {
        Ink::Muted => MUTED_INK.to_string(),
        Ink::Own => rgb.to_string(),
        Ink::Contrast if rgb.contrast(&Rgb::WHITE) > 2.0 => "white".to_string(),
        Ink::Contrast => "black".to_string(),
    };

    OptionStyle {
        background: paint(rule.background, &rgb),
        foreground,
        active_background: paint(rule.active, &rgb),
        cursor: rule.cursor,
    }
}

/// Style of a selected-value chip: tinted background, label in the option colour
pub fn chip_style(color: &str) -> OptionStyle {
    let rgb = Rgb::from_hex(color).unwrap_or(Rgb::BLACK);
    OptionStyle {
        background: Some(rgb.alpha(0.1)),
        foreground: rgb.to_string(),
        active_background: Some(rgb.to_string()),
        cursor: "default",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let rgb = Rgb::from_hex("#1a2b3c").unwrap();
        assert_eq!(rgb, Rgb { r: 0x1a, g: 0x2b, b: 0x3c });
        assert_eq!(rgb.to_string(), "#1a2b3c");
        assert!(Rgb::from_hex("1a2b3c").is_none());
        assert!(Rgb::from_hex("#12345").is_none());
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(Rgb::from_hsl(0.0, 1.0, 0.5), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(Rgb::from_hsl(120.0, 1.0, 0.5), Rgb { r: 0, g: 255, b: 0 });
        assert_eq!(Rgb::from_hsl(240.0, 1.0, 0.5), Rgb { r: 0, g: 0, b: 255 });
    }

    #[test]
    fn test_contrast() {
        assert!((Rgb::BLACK.contrast(&Rgb::WHITE) - 21.0).abs() < 1e-9);
        assert!((Rgb::WHITE.contrast(&Rgb::WHITE) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_label_colors_are_stable_and_dark() {
        let (a, bg) = label_colors("actix");
        let (b, _) = label_colors("actix");
        assert_eq!(a, b);
        assert!(a.luminance() < bg.luminance());
        assert_ne!(label_colors("actix").0, label_colors("axum").0);
    }

    #[test]
    fn test_option_style_table() {
        let selected = option_style("#000080", OptionState::Selected);
        assert_eq!(selected.background.as_deref(), Some("#000080"));
        assert_eq!(selected.foreground, "white");

        let light = option_style("#ffff00", OptionState::Selected);
        assert_eq!(light.foreground, "black");

        let focused = option_style("#000080", OptionState::Focused);
        assert_eq!(focused.background.as_deref(), Some("rgba(0,0,128,0.1)"));
        assert_eq!(focused.foreground, "#000080");

        let disabled = option_style("#000080", OptionState::Disabled);
        assert_eq!(disabled.background, None);
        assert_eq!(disabled.foreground, "#ccc");
        assert_eq!(disabled.cursor, "not-allowed");
        assert_eq!(disabled.active_background, None);

        let default = option_style("not a colour", OptionState::Default);
        assert_eq!(default.foreground, "#000000");
    }

    #[test]
    fn test_option_state_resolution() {
        assert_eq!(OptionState::resolve(true, true, true), OptionState::Disabled);
        assert_eq!(OptionState::resolve(false, true, true), OptionState::Selected);
        assert_eq!(OptionState::resolve(false, false, true), OptionState::Focused);
        assert_eq!(OptionState::resolve(false, false, false), OptionState::Default);
    }
}
