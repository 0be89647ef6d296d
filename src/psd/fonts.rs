//! Font-name extraction from parsed engine data.
//!
//! The engine data carries two tables that matter here: the resource
//! dictionary's `FontSet` (every font the layer references, by index) and
//! the style runs under `EngineDict/StyleRun`, each pointing at a font set
//! entry through its style sheet's `Font` index. Only fonts actually used
//! by a run are reported, matching what a designer would see.

use super::engine_data::Value;
use super::{Document, PsdError, TextLayer};

/// Extract the font names used by the style runs of a text layer.
///
/// Names are sanitized (surrounding `'` quotes trimmed) and deduplicated
/// in order of first appearance. A run whose style sheet omits the `Font`
/// key inherits the document default and is skipped.
///
/// # Errors
///
/// Returns [`PsdError::MalformedTextData`] when the font tables are
/// missing or a run points outside the font set.
pub fn fonts_in_layer(layer: &TextLayer) -> Result<Vec<String>, PsdError> {
    let data = &layer.engine_data;

    let font_set = data
        .get("ResourceDict")
        .and_then(|d| d.get("FontSet"))
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(layer, "no ResourceDict/FontSet"))?;

    let style_run = data
        .get("EngineDict")
        .and_then(|d| d.get("StyleRun"))
        .ok_or_else(|| malformed(layer, "no EngineDict/StyleRun"))?;

    let run_array = style_run
        .get("RunArray")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(layer, "no StyleRun/RunArray"))?;
    let run_lengths = style_run
        .get("RunLengthArray")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(layer, "no StyleRun/RunLengthArray"))?;

    let mut fonts = Vec::new();

    // Runs pair with lengths positionally; a short length array truncates
    // the pairing rather than failing.
    for run in run_array.iter().take(run_lengths.len()) {
        let style_data = run
            .get("StyleSheet")
            .and_then(|s| s.get("StyleSheetData"))
            .ok_or_else(|| malformed(layer, "run has no StyleSheet/StyleSheetData"))?;

        let index = match style_data.get("Font").and_then(Value::as_i64) {
            Some(index) => index,
            None => {
                log::debug!(
                    "Layer '{}': style run without Font key, skipping",
                    layer.name
                );
                continue;
            }
        };

        let entry = usize::try_from(index)
            .ok()
            .and_then(|i| font_set.get(i))
            .ok_or_else(|| {
                malformed(layer, &format!("font index {index} outside the font set"))
            })?;

        let name = entry
            .get("Name")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(layer, "font set entry has no Name"))?;

        let name = sanitize_font_name(name);
        if !fonts.contains(&name) {
            fonts.push(name);
        }
    }

    Ok(fonts)
}

/// Extract the font names used across all text layers of a document,
/// deduplicated in order of first appearance.
pub fn fonts_in_document(document: &Document) -> Result<Vec<String>, PsdError> {
    let mut fonts = Vec::new();
    for layer in &document.text_layers {
        for font in fonts_in_layer(layer)? {
            if !fonts.contains(&font) {
                fonts.push(font);
            }
        }
    }
    Ok(fonts)
}

/// Trim the surrounding quote characters some writers leave on font names.
#[must_use]
pub fn sanitize_font_name(name: &str) -> String {
    name.trim_matches('\'').to_string()
}

fn malformed(layer: &TextLayer, what: &str) -> PsdError {
    PsdError::MalformedTextData(format!("layer '{}': {}", layer.name, what))
}
