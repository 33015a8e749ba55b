//! Invoice color theme.

use log::warn;

pub const DEFAULT_PRIMARY: &str = "#f7a80a";
pub const DEFAULT_SECONDARY: &str = "#2d2d2d";

/// An sRGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }
}

/// Parses `#RRGGBB`, `RRGGBB`, `0xRRGGBB` or the short `#RGB` form.
pub fn parse_hex_color(value: &str) -> Option<Rgb> {
    let value = value.trim();
    let hex = value
        .strip_prefix('#')
        .or_else(|| value.strip_prefix("0x"))
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Rgb::from_u8(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let doubled: String = hex.chars().flat_map(|c| [c, c]).collect();
            parse_hex_color(&doubled)
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub section_background: Rgb,
    pub text: Rgb,
    pub border: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_form(None, None)
    }
}

impl Theme {
    /// Missing, blank or unparsable colors fall back to the house colors.
    pub fn from_form(primary: Option<&str>, secondary: Option<&str>) -> Self {
        Self {
            primary: resolve("primary_color", primary, DEFAULT_PRIMARY),
            secondary: resolve("secondary_color", secondary, DEFAULT_SECONDARY),
            section_background: Rgb::from_u8(0xee, 0xee, 0xee),
            text: Rgb::BLACK,
            border: Rgb::from_u8(0xd1, 0xd1, 0xd1),
        }
    }
}

fn resolve(field: &str, value: Option<&str>, default: &str) -> Rgb {
    let fallback = || parse_hex_color(default).unwrap_or(Rgb::BLACK);
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => fallback(),
        Some(v) => parse_hex_color(v).unwrap_or_else(|| {
            warn!("Ignoring invalid {} {:?}, using {}", field, v, default);
            fallback()
        }),
    }
}
