use palette::Srgb;

use crate::error::PaletteError;

/// An 8-bit sRGB color.
pub type Rgb = Srgb<u8>;

/// Dominant colors of one image, most frequent first.
pub type Palette = Vec<Rgb>;

/// Rounding granularity applied to every channel before bucketing.
pub const QUANTIZATION_STEP: u16 = 20;

/// Highest quantized level that still fits in a channel (12 * 20).
pub const MAX_LEVEL: u16 = 240;

const NEAR_BLACK_BELOW: u8 = 30;
const NEAR_WHITE_ABOVE: u8 = 230;

/// Round a channel to the nearest multiple of [`QUANTIZATION_STEP`].
///
/// Halfway values round up, and anything above [`MAX_LEVEL`] is clipped so
/// every result is one of the 13 levels `0, 20, ..., 240`.
#[inline(always)]
pub fn quantize_channel(value: u8) -> u8 {
    let level = (value as u16 + QUANTIZATION_STEP / 2) / QUANTIZATION_STEP * QUANTIZATION_STEP;
    level.min(MAX_LEVEL) as u8
}

pub fn quantize(color: Rgb) -> Rgb {
    Srgb::new(
        quantize_channel(color.red),
        quantize_channel(color.green),
        quantize_channel(color.blue),
    )
}

/// True when every channel is below 30.
pub fn is_near_black(color: Rgb) -> bool {
    color.red < NEAR_BLACK_BELOW && color.green < NEAR_BLACK_BELOW && color.blue < NEAR_BLACK_BELOW
}

/// True when every channel is above 230.
pub fn is_near_white(color: Rgb) -> bool {
    color.red > NEAR_WHITE_ABOVE && color.green > NEAR_WHITE_ABOVE && color.blue > NEAR_WHITE_ABOVE
}

#[inline(always)]
pub(crate) fn pack(color: Rgb) -> u32 {
    (color.red as u32) << 16 | (color.green as u32) << 8 | color.blue as u32
}

#[inline(always)]
pub(crate) fn unpack(key: u32) -> Rgb {
    Srgb::new((key >> 16) as u8, (key >> 8) as u8, key as u8)
}

/// Euclidean distance between two colors in RGB space.
pub fn color_distance(a: Rgb, b: Rgb) -> f64 {
    let dr = a.red as f64 - b.red as f64;
    let dg = a.green as f64 - b.green as f64;
    let db = a.blue as f64 - b.blue as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

pub fn to_hex(color: Rgb) -> String {
    format!("{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}

/// Parse `RRGGBB`, with or without a leading `#`.
pub fn parse_hex(input: &str) -> Result<Rgb, PaletteError> {
    let hex = input.trim().trim_start_matches('#');
    let invalid = || PaletteError::InvalidHex(input.to_string());
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| invalid())?;
    let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| invalid())?;
    let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| invalid())?;
    Ok(Srgb::new(r, g, b))
}

/// Parse a comma-separated list of hex colors. Empty entries are skipped.
pub fn parse_hex_list(input: &str) -> Result<Palette, PaletteError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_hex)
        .collect()
}
