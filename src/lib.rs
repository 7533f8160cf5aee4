//! BOM to LaTeX parts-list converter
//!
//! Turns a CSV bill of materials into a `pcbdoc` element list: component names
//! are built from per-type naming rules, designators are sorted and grouped,
//! and each group becomes one escaped list entry under its section header.

mod config;
mod error;
mod refdes;
mod resolve;
mod types;
mod typography;
mod write;

pub use config::{load_descriptions, load_format_rules, parse_descriptions, parse_format_rules, split_template};
pub use error::{ConvertError, Result};
pub use refdes::{
    component_type, condense_designators, designator_number, group_designators,
    single_groups, sort_designators, DesignatorGroup, SortKey, ELLIPSIS,
};
pub use resolve::{compose_name, read_bom, read_bom_file, resolve_bom_file, resolve_rows, BomRow, BomTable};
pub use types::{
    Descriptions, DocumentInfo, FieldMapping, FormatRules, GroupMode, RenderOptions, ResolvedBom,
    ResolvedComponent, TemplateToken, DEFAULT_RULE_KEY,
};
pub use typography::{cleanup_line, Escaper};
pub use write::{render_document, write_document, write_dump, write_to_file, TexWriter, SPACER_ENTRY};

use std::path::{Path, PathBuf};

/// Output path for a BOM: same location, `tex` extension
pub fn tex_output_path(bom_path: impl AsRef<Path>) -> PathBuf {
    bom_path.as_ref().with_extension("tex")
}

/// Convert one BOM file into a LaTeX document.
///
/// Returns the resolved components so callers can report missing rules or
/// dump the table.
pub fn convert_bom_file(
    bom_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    rules: &FormatRules,
    descriptions: &Descriptions,
    options: &RenderOptions,
) -> Result<ResolvedBom> {
    let bom = resolve_bom_file(bom_path, rules)?;
    write_to_file(&bom, descriptions, options, output_path)?;
    Ok(bom)
}
