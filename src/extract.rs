use image::{DynamicImage, GenericImageView, RgbaImage, imageops::FilterType};
use indexmap::IndexMap;
use palette::Srgb;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::{Palette, Rgb, is_near_black, is_near_white, pack, quantize, unpack};
use crate::error::PaletteError;

pub const DEFAULT_PALETTE_SIZE: usize = 4;
pub const DEFAULT_MAX_DIMENSION: u32 = 100;

/// Resampling filter used when shrinking the working image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "native-bin", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Resample {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Lanczos3,
}

impl From<Resample> for FilterType {
    fn from(value: Resample) -> Self {
        match value {
            Resample::Nearest => FilterType::Nearest,
            Resample::Triangle => FilterType::Triangle,
            Resample::CatmullRom => FilterType::CatmullRom,
            Resample::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Maximum number of colors returned.
    pub palette_size: usize,
    /// Cap for the longer side of the working image.
    pub max_dimension: u32,
    pub filter: Resample,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            palette_size: DEFAULT_PALETTE_SIZE,
            max_dimension: DEFAULT_MAX_DIMENSION,
            filter: Resample::default(),
        }
    }
}

impl ExtractOptions {
    pub fn with_palette_size(palette_size: usize) -> Self {
        Self {
            palette_size,
            ..Self::default()
        }
    }
}

/// A quantized color and how many working pixels fell into it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorBucket {
    pub color: Rgb,
    pub count: u32,
}

/// Size of the working image: the longer side is capped at `max_dimension`,
/// aspect ratio is kept and images are never enlarged.
pub fn working_size(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let max_dimension = max_dimension.max(1);
    let max_side = width.max(height);
    if max_side <= max_dimension {
        return (width, height);
    }
    let ratio = max_dimension as f32 / max_side as f32;
    let w = ((width as f32) * ratio).round().max(1.0) as u32;
    let h = ((height as f32) * ratio).round().max(1.0) as u32;
    (w.min(max_dimension), h.min(max_dimension))
}

fn working_image(img: &DynamicImage, options: &ExtractOptions) -> Result<RgbaImage, PaletteError> {
    let (orig_w, orig_h) = img.dimensions();
    if orig_w == 0 || orig_h == 0 {
        return Err(PaletteError::RenderingUnavailable(format!(
            "image has no pixels ({orig_w}x{orig_h})"
        )));
    }

    let (w, h) = working_size(orig_w, orig_h, options.max_dimension);
    debug!(orig_w, orig_h, w, h, "working image size");

    if (w, h) == (orig_w, orig_h) {
        Ok(img.to_rgba8())
    } else {
        Ok(image::imageops::resize(img, w, h, options.filter.into()))
    }
}

/// Count every pixel by its quantized color, most frequent first.
///
/// Alpha is ignored. Buckets with equal counts keep the order in which their
/// color was first seen (row-major).
pub fn bucket_counts(img: &RgbaImage) -> Vec<ColorBucket> {
    let mut counts: IndexMap<u32, u32> = IndexMap::new();
    for pixel in img.pixels() {
        let [r, g, b, _] = pixel.0;
        *counts.entry(pack(quantize(Srgb::new(r, g, b)))).or_insert(0) += 1;
    }

    let mut buckets: Vec<ColorBucket> = counts
        .into_iter()
        .map(|(key, count)| ColorBucket {
            color: unpack(key),
            count,
        })
        .collect();
    // Stable, so ties stay in insertion order.
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
}

/// Pick the palette from count-sorted buckets.
///
/// Near-black and near-white buckets are dropped unless doing so would leave
/// fewer than `size` colors, in which case the unfiltered list is used.
pub fn select_palette(buckets: &[ColorBucket], size: usize) -> Palette {
    let filtered: Vec<Rgb> = buckets
        .iter()
        .map(|b| b.color)
        .filter(|c| !is_near_black(*c) && !is_near_white(*c))
        .collect();

    if filtered.len() >= size {
        return filtered.into_iter().take(size).collect();
    }

    if filtered.len() < buckets.len() {
        warn!(
            non_extreme = filtered.len(),
            requested = size,
            "not enough non-extreme colors, keeping black/white buckets"
        );
    }
    buckets.iter().take(size).map(|b| b.color).collect()
}

/// Extract up to `n_colors` dominant colors from `img`.
pub fn extract_palette(img: &DynamicImage, n_colors: usize) -> Result<Palette, PaletteError> {
    extract_palette_with(img, &ExtractOptions::with_palette_size(n_colors))
}

pub fn extract_palette_with(
    img: &DynamicImage,
    options: &ExtractOptions,
) -> Result<Palette, PaletteError> {
    let working = working_image(img, options)?;
    let buckets = bucket_counts(&working);
    debug!(buckets = buckets.len(), "bucketed working image");
    Ok(select_palette(&buckets, options.palette_size))
}

/// Decode `input` and extract its palette.
pub fn extract_palette_bytes(input: &[u8], n_colors: usize) -> Result<Palette, PaletteError> {
    extract_palette_bytes_with(input, &ExtractOptions::with_palette_size(n_colors))
}

pub fn extract_palette_bytes_with(
    input: &[u8],
    options: &ExtractOptions,
) -> Result<Palette, PaletteError> {
    let img = image::load_from_memory(input)?;
    extract_palette_with(&img, options)
}
