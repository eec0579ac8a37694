use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;

pub mod color;
pub mod error;
pub mod extract;
pub mod similarity;

pub use color::{
    Palette, Rgb, color_distance, is_near_black, is_near_white, parse_hex, parse_hex_list,
    quantize, quantize_channel, to_hex,
};
pub use error::PaletteError;
pub use extract::{
    ColorBucket, ExtractOptions, Resample, bucket_counts, extract_palette, extract_palette_bytes,
    extract_palette_bytes_with, extract_palette_with, select_palette, working_size,
};
pub use similarity::{PaletteMatch, compare_colors, match_images, match_percentage};

// ------------------------------------------------------------
// JS boundary helpers
// ------------------------------------------------------------

fn js_err(err: PaletteError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn palette_from_js(values: &Array) -> Result<Palette, JsValue> {
    let mut out = Vec::with_capacity(values.length() as usize);
    for val in values.iter() {
        let s = val
            .as_string()
            .ok_or_else(|| JsValue::from_str("Palette values must be strings"))?;
        out.push(parse_hex(&s).map_err(js_err)?);
    }
    Ok(out)
}

fn palette_to_js(palette: &[Rgb]) -> Array {
    let out = Array::new();
    for c in palette {
        out.push(&JsValue::from_str(&to_hex(*c)));
    }
    out
}

fn hex_list_to_js(hex: &[String]) -> Array {
    hex.iter().map(|s| JsValue::from_str(s)).collect()
}

/// Extract the dominant colors of an encoded image.
///
/// Returns an array of `RRGGBB` strings, most frequent first, with at most
/// `n_colors` entries.
#[wasm_bindgen(js_name = extractPalette)]
pub fn extract_palette_js(input: Vec<u8>, n_colors: usize) -> Result<Array, JsValue> {
    let palette = extract_palette_bytes(&input, n_colors).map_err(js_err)?;
    Ok(palette_to_js(&palette))
}

/// Score a candidate palette against a reference, both given as hex strings.
#[wasm_bindgen(js_name = compareColors)]
pub fn compare_colors_js(reference: Array, candidate: Array) -> Result<f64, JsValue> {
    let reference = palette_from_js(&reference)?;
    let candidate = palette_from_js(&candidate)?;
    Ok(compare_colors(&reference, &candidate))
}

/// Decode two images, extract their palettes and score the candidate.
///
/// The returned object has `reference`, `candidate`, `score` and `percentage`.
#[wasm_bindgen(js_name = matchImages)]
pub fn match_images_js(
    reference: Vec<u8>,
    candidate: Vec<u8>,
    n_colors: usize,
) -> Result<Object, JsValue> {
    let reference = image::load_from_memory(&reference)
        .map_err(|e| js_err(PaletteError::from(e)))?;
    let candidate = image::load_from_memory(&candidate)
        .map_err(|e| js_err(PaletteError::from(e)))?;
    let matched = match_images(
        &reference,
        &candidate,
        &ExtractOptions::with_palette_size(n_colors),
    )
    .map_err(js_err)?;

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("reference"), &hex_list_to_js(&matched.reference))?;
    Reflect::set(&result, &JsValue::from_str("candidate"), &hex_list_to_js(&matched.candidate))?;
    Reflect::set(&result, &JsValue::from_str("score"), &JsValue::from_f64(matched.score))?;
    Reflect::set(
        &result,
        &JsValue::from_str("percentage"),
        &JsValue::from_f64(matched.percentage as f64),
    )?;

    Ok(result)
}
