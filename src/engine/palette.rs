//! Palette derivation: four theme sliders in, six surface colours plus two
//! fixed text colours and a window opacity out.
//!
//! Everything here is a pure function of the [`Theme`]; the UI layer converts
//! the resulting [`Rgb`] values into toolkit colours.

use crate::types::Theme;

/// Lightness shift between the accent and its light/dark variants.
const ACCENT_SHIFT: f64 = 0.18;
/// Background sits one accent shift below the accent, with damped saturation.
const BACKGROUND_SATURATION: f64 = 0.40;
const BACKGROUND_SHIFT: f64 = -0.18;
const SURFACE_SATURATION: f64 = 0.45;
const SURFACE_SHIFT: f64 = -0.05;
const SURFACE_LIGHT_SATURATION: f64 = 0.35;
const SURFACE_LIGHT_SHIFT: f64 = 0.07;

pub const TEXT_PRIMARY: Rgb = Rgb::new(245, 245, 245);
pub const TEXT_SECONDARY: Rgb = Rgb::new(215, 215, 215);

/// An opaque 8-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The derived colour set every window paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: Rgb,
    pub accent_light: Rgb,
    pub accent_dark: Rgb,
    pub background: Rgb,
    pub surface: Rgb,
    pub surface_light: Rgb,
    pub text_primary: Rgb,
    pub text_secondary: Rgb,
    /// Uniform window opacity, 0 (invisible) to 255 (opaque).
    pub window_alpha: u8,
}

/// Derive the palette for `theme`.
pub fn derive(theme: &Theme) -> Palette {
    let h = clamp_unit(f64::from(theme.hue) / 360.0);
    let s = clamp_unit(f64::from(theme.saturation) / 100.0);
    let l = clamp_unit(f64::from(theme.lightness) / 100.0);
    let a = clamp_unit(f64::from(theme.alpha) / 100.0);

    Palette {
        accent: hsl_to_rgb(h, s, l),
        accent_light: hsl_to_rgb(h, s, clamp_unit(l + ACCENT_SHIFT)),
        accent_dark: hsl_to_rgb(h, s, clamp_unit(l - ACCENT_SHIFT)),
        background: hsl_to_rgb(
            h,
            clamp_unit(s * BACKGROUND_SATURATION),
            clamp_unit(l + BACKGROUND_SHIFT),
        ),
        surface: hsl_to_rgb(
            h,
            clamp_unit(s * SURFACE_SATURATION),
            clamp_unit(l + SURFACE_SHIFT),
        ),
        surface_light: hsl_to_rgb(
            h,
            clamp_unit(s * SURFACE_LIGHT_SATURATION),
            clamp_unit(l + SURFACE_LIGHT_SHIFT),
        ),
        text_primary: TEXT_PRIMARY,
        text_secondary: TEXT_SECONDARY,
        window_alpha: (a * 255.0).round() as u8,
    }
}

/// Standard HSL → RGB with every component in `[0, 1]`.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };

    Rgb::new(to_byte(r), to_byte(g), to_byte(b))
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_byte(channel: f64) -> u8 {
    (clamp_unit(channel) * 255.0) as u8
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
