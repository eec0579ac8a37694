use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{Rgb, color_distance, to_hex};
use crate::error::PaletteError;
use crate::extract::{ExtractOptions, extract_palette_with};

/// Largest possible RGB distance, white to black: `sqrt(255² * 3)`.
#[inline(always)]
fn max_distance() -> f64 {
    (3.0_f64 * 255.0 * 255.0).sqrt()
}

/// Score how well `candidate` covers the colors of `reference`, in `[0, 1]`.
///
/// Each reference color is matched to its nearest candidate color and the
/// linear similarity `1 - distance / max_distance` is averaged over the
/// reference palette. The score is asymmetric: swapping the arguments gives a
/// different result whenever the palettes differ. Returns 0 when either
/// palette is empty.
pub fn compare_colors(reference: &[Rgb], candidate: &[Rgb]) -> f64 {
    if reference.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let max = max_distance();
    let total: f64 = reference
        .iter()
        .map(|&a| {
            let nearest = candidate
                .iter()
                .map(|&b| color_distance(a, b))
                .fold(f64::INFINITY, f64::min);
            1.0 - nearest / max
        })
        .sum();

    (total / reference.len() as f64).clamp(0.0, 1.0)
}

/// Whole-number percentage shown to the user.
pub fn match_percentage(score: f64) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Result of matching a candidate image against a reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaletteMatch {
    /// Reference palette as `RRGGBB` strings.
    pub reference: Vec<String>,
    pub candidate: Vec<String>,
    pub score: f64,
    pub percentage: u8,
}

impl PaletteMatch {
    pub fn new(reference: &[Rgb], candidate: &[Rgb]) -> Self {
        let score = compare_colors(reference, candidate);
        Self {
            reference: reference.iter().copied().map(to_hex).collect(),
            candidate: candidate.iter().copied().map(to_hex).collect(),
            score,
            percentage: match_percentage(score),
        }
    }
}

/// Extract both palettes with the same options and score `candidate` against
/// `reference`.
pub fn match_images(
    reference: &DynamicImage,
    candidate: &DynamicImage,
    options: &ExtractOptions,
) -> Result<PaletteMatch, PaletteError> {
    let reference = extract_palette_with(reference, options)?;
    let candidate = extract_palette_with(candidate, options)?;
    let result = PaletteMatch::new(&reference, &candidate);
    debug!(score = result.score, "matched images");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Srgb;

    fn black() -> Rgb {
        Srgb::new(0, 0, 0)
    }

    fn white() -> Rgb {
        Srgb::new(255, 255, 255)
    }

    #[test]
    fn identical_single_colors_score_one() {
        let a = [Srgb::new(100, 100, 100)];
        assert_eq!(compare_colors(&a, &a), 1.0);
    }

    #[test]
    fn empty_palettes_score_zero() {
        assert_eq!(compare_colors(&[], &[black()]), 0.0);
        assert_eq!(compare_colors(&[black()], &[]), 0.0);
        assert_eq!(compare_colors(&[], &[]), 0.0);
    }

    #[test]
    fn opposite_corners_score_zero() {
        assert_eq!(compare_colors(&[white()], &[black()]), 0.0);
    }

    #[test]
    fn comparison_is_asymmetric() {
        let a = [black(), white()];
        let b = [black()];
        assert_eq!(compare_colors(&a, &b), 0.5);
        assert_eq!(compare_colors(&b, &a), 1.0);
        assert_ne!(compare_colors(&a, &b), compare_colors(&b, &a));
    }

    #[test]
    fn nearest_candidate_is_used() {
        let reference = [Srgb::new(200, 40, 40)];
        let candidate = [Srgb::new(0, 0, 255), Srgb::new(200, 40, 60), white()];
        let expected = 1.0 - 20.0 / max_distance();
        assert!((compare_colors(&reference, &candidate) - expected).abs() < 1e-12);
    }

    #[test]
    fn score_stays_in_unit_range() {
        let reference = [black(), white(), Srgb::new(120, 60, 200)];
        let candidate = [Srgb::new(240, 0, 0), Srgb::new(0, 240, 0)];
        let score = compare_colors(&reference, &candidate);
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn percentage_rounds() {
        assert_eq!(match_percentage(0.0), 0);
        assert_eq!(match_percentage(0.876), 88);
        assert_eq!(match_percentage(1.0), 100);
        assert_eq!(match_percentage(1.2), 100);
    }

    #[test]
    fn palette_match_carries_hex() {
        let m = PaletteMatch::new(&[black(), white()], &[black()]);
        assert_eq!(m.reference, vec!["000000", "FFFFFF"]);
        assert_eq!(m.candidate, vec!["000000"]);
        assert_eq!(m.score, 0.5);
        assert_eq!(m.percentage, 50);
    }
}
