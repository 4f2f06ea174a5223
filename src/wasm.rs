//! JavaScript bindings.
//!
//! ```javascript
//! import init, { extractPalette, tryExtractPalette } from './painter_palette.js';
//!
//! await init();
//! const bytes = new Uint8Array(await (await fetch(imageUrl)).arrayBuffer());
//! const palette = extractPalette(bytes, 10); // ["#a43b2c", ...] or []
//! ```

use crate::{ExtractorConfig, PaletteError, extract_palette, try_extract_palette};
use js_sys::Array;
use tracing::warn;
use wasm_bindgen::prelude::*;

/// Lenient extraction: any failure, including a negative `num_colors`, yields `[]`.
#[wasm_bindgen(js_name = extractPalette)]
pub fn extract_palette_js(input: Vec<u8>, num_colors: i32) -> Array {
    match config_for(num_colors) {
        Ok(config) => to_js_array(&extract_palette(&input, &config)),
        Err(e) => {
            warn!(error = %e, "palette extraction failed, returning empty palette");
            Array::new()
        }
    }
}

/// Strict extraction: failures are thrown as strings.
#[wasm_bindgen(js_name = tryExtractPalette)]
pub fn try_extract_palette_js(input: Vec<u8>, num_colors: i32) -> Result<Array, JsValue> {
    let config = config_for(num_colors).map_err(to_js_error)?;
    let palette = try_extract_palette(&input, &config).map_err(to_js_error)?;
    Ok(to_js_array(&palette))
}

/// Lenient extraction with a JSON-encoded configuration; missing fields take defaults.
#[wasm_bindgen(js_name = extractPaletteWithConfig)]
pub fn extract_palette_with_config_js(input: Vec<u8>, config_json: &str) -> Array {
    match ExtractorConfig::from_json_str(config_json) {
        Ok(config) => to_js_array(&extract_palette(&input, &config)),
        Err(e) => {
            warn!(error = %e, "palette extraction failed, returning empty palette");
            Array::new()
        }
    }
}

fn config_for(num_colors: i32) -> Result<ExtractorConfig, PaletteError> {
    let num_colors =
        usize::try_from(num_colors).map_err(|_| PaletteError::invalid("num_colors", num_colors))?;
    Ok(ExtractorConfig::default().with_num_colors(num_colors))
}

fn to_js_array(palette: &[String]) -> Array {
    let array = Array::new();
    for hex in palette {
        array.push(&JsValue::from_str(hex));
    }
    array
}

fn to_js_error(e: PaletteError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
