use std::fs;
use std::path::Path;

use crate::core::markup::render_markup;

/// Renders a text file through the same restricted markup pipeline the
/// public portfolio page uses.
pub fn render_file(path: &Path) -> anyhow::Result<String> {
    let text = fs::read_to_string(path)?;
    Ok(render_markup(&text))
}
