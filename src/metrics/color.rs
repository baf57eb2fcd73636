//! WCAG relative luminance and contrast ratio over computed CSS colors.
//!
//! Computed styles come back from the browser as `rgb(r, g, b)` or
//! `rgba(r, g, b, a)` strings; hex and `transparent` are accepted too so the
//! same parser works on inline style values.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Minimum text/background contrast for WCAG AA body text.
pub const MIN_CONTRAST: f64 = 4.5;

/// Background assumed when nothing opaque is painted behind an element.
pub const DEFAULT_BACKGROUND: &str = "rgb(255, 255, 255)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a CSS color, ignoring alpha.
    pub fn parse(value: &str) -> Option<Rgb> {
        parse_css_color(value).map(|c| c.rgb)
    }

    /// Parse a CSS color, falling back to opaque white.
    pub fn parse_or_white(value: &str) -> Rgb {
        Rgb::parse(value).unwrap_or(Rgb::WHITE)
    }
}

/// A parsed color with its alpha channel in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssColor {
    pub rgb: Rgb,
    pub alpha: f64,
}

fn rgb_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^rgba?\(\s*([\d.]+)[\s,]+([\d.]+)[\s,]+([\d.]+)(?:\s*[,/]\s*([\d.]+)(%)?)?\s*\)$",
        )
        .expect("valid regex")
    })
}

fn channel(raw: &str) -> Option<u8> {
    let value: f64 = raw.parse().ok()?;
    Some(value.round().clamp(0.0, 255.0) as u8)
}

fn parse_hex(hex: &str) -> Option<CssColor> {
    let digits = hex.trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match digits.len() {
        3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => digits.to_string(),
        _ => return None,
    };
    let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    let alpha = if expanded.len() == 8 {
        byte(6)? as f64 / 255.0
    } else {
        1.0
    };
    Some(CssColor {
        rgb: Rgb::new(byte(0)?, byte(2)?, byte(4)?),
        alpha,
    })
}

/// Parse `rgb()`, `rgba()`, `#hex` or `transparent`.
pub fn parse_css_color(value: &str) -> Option<CssColor> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("transparent") {
        return Some(CssColor {
            rgb: Rgb::BLACK,
            alpha: 0.0,
        });
    }
    if trimmed.starts_with('#') {
        return parse_hex(trimmed);
    }

    let caps = rgb_regex().captures(trimmed)?;
    let rgb = Rgb::new(channel(&caps[1])?, channel(&caps[2])?, channel(&caps[3])?);
    let alpha = match caps.get(4) {
        Some(a) => {
            let raw: f64 = a.as_str().parse().ok()?;
            if caps.get(5).is_some() { raw / 100.0 } else { raw }
        }
        None => 1.0,
    };
    Some(CssColor {
        rgb,
        alpha: alpha.clamp(0.0, 1.0),
    })
}

/// Fully transparent: `transparent` or any color whose alpha is zero.
pub fn is_transparent(value: &str) -> bool {
    parse_css_color(value).is_some_and(|c| c.alpha == 0.0)
}

fn linearize(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance in [0, 1].
pub fn relative_luminance(rgb: Rgb) -> f64 {
    0.2126 * linearize(rgb.r) + 0.7152 * linearize(rgb.g) + 0.0722 * linearize(rgb.b)
}

/// Contrast ratio in [1, 21]; symmetric in its arguments.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Contrast between two CSS color literals; unparseable values count as white.
pub fn css_contrast(foreground: &str, background: &str) -> f64 {
    contrast_ratio(Rgb::parse_or_white(foreground), Rgb::parse_or_white(background))
}
