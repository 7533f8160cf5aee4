//! Render resolved components as a LaTeX parts list

use crate::error::Result;
use crate::refdes::{component_type, group_designators, single_groups, sort_designators, DesignatorGroup};
use crate::typography::{cleanup_line, Escaper};
use crate::types::{Descriptions, DocumentInfo, GroupMode, RenderOptions, ResolvedBom};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Blank list entry used as a spacer
pub const SPACER_ENTRY: &str = r"\Element{}{}{}";

const DOCUMENT_CLASS: &str = r"\documentclass[doctype=pe]{pcbdoc}";
const DOCUMENT_BEGIN: &[&str] = &[r"\begin{document}", r"\begin{ElementList}"];
const DOCUMENT_END: &[&str] = &[r"\end{ElementList}", r"\end{document}"];

/// Stateful renderer for one document.
///
/// The quote state of the escaper lives as long as the writer, so quotes
/// alternate across entries of the whole document.
pub struct TexWriter<'a> {
    descriptions: &'a Descriptions,
    options: &'a RenderOptions,
    escaper: Escaper,
    lines: Vec<String>,
}

impl<'a> TexWriter<'a> {
    pub fn new(descriptions: &'a Descriptions, options: &'a RenderOptions) -> Self {
        Self {
            descriptions,
            options,
            escaper: Escaper::new(),
            lines: Vec::new(),
        }
    }

    /// Render a full document and return its lines
    pub fn render(mut self, bom: &ResolvedBom) -> Vec<String> {
        let options = self.options;
        let sorted = sort_designators(bom.components.keys().cloned());
        let type_counts = count_types(&sorted);
        let groups = match options.group {
            GroupMode::Flat => group_designators(&sorted, &bom.components),
            GroupMode::None => single_groups(&sorted, &bom.components),
        };

        self.write_header(&options.info);

        let mut current_kind: Option<&str> = None;
        let mut in_section = 0;
        for group in &groups {
            if current_kind != Some(group.kind.as_str()) {
                let plural = type_counts.get(group.kind.as_str()).copied().unwrap_or(0) > 1;
                self.write_section(&group.kind, plural);
                current_kind = Some(group.kind.as_str());
                in_section = 0;
            }

            self.write_entry(group);
            in_section += 1;

            if options.strings > 0 && in_section == options.strings {
                self.emit(SPACER_ENTRY);
                in_section = 0;
            }
        }

        for line in DOCUMENT_END {
            self.emit(line);
        }

        self.lines
    }

    fn write_header(&mut self, info: &DocumentInfo) {
        self.emit(DOCUMENT_CLASS);
        let fields = [
            ("AuthorSet", &info.author),
            ("CheckerSet", &info.checker),
            ("NormControllerSet", &info.norm_controller),
            ("ApproverSet", &info.approver),
            ("NameSet", &info.title),
            ("NumberSet", &info.number),
        ];
        for (command, value) in fields {
            // title block values must not disturb the quote state of the list
            let value = Escaper::new().escape(value);
            self.emit(&format!("\\{}{{{}}}", command, value));
        }
        for line in DOCUMENT_BEGIN {
            self.emit(line);
        }
    }

    fn write_section(&mut self, kind: &str, plural: bool) {
        match self.descriptions.header(kind, plural) {
            Some(header) => self.emit(&format!("\\Part{{{}}}", header)),
            None => tracing::debug!(component_type = %kind, plural, "no section header"),
        }
    }

    fn write_entry(&mut self, group: &DesignatorGroup) {
        let name = self.escape_name(&group.name);
        let line = format!("\\Element{{{}}}{{\\refbox{{{}}}}}{{{}}}", name, group.condensed(), group.count());
        self.emit(&line);
    }

    fn escape_name(&mut self, fragments: &[String]) -> String {
        let mut out = String::new();
        for fragment in fragments {
            for c in fragment.chars() {
                self.escaper.push_char(c, &mut out);
            }
        }
        cleanup_line(&out)
    }

    fn emit(&mut self, line: &str) {
        self.lines.push(cleanup_line(line));
    }
}

/// Number of designators per component type
fn count_types(sorted: &[String]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for designator in sorted {
        *counts.entry(component_type(designator)).or_insert(0) += 1;
    }
    counts
}

/// Render a document to a string
pub fn render_document(bom: &ResolvedBom, descriptions: &Descriptions, options: &RenderOptions) -> String {
    let mut text = TexWriter::new(descriptions, options).render(bom).join("\n");
    text.push('\n');
    text
}

/// Write a rendered document to any Write destination
pub fn write_document<W: Write>(
    bom: &ResolvedBom,
    descriptions: &Descriptions,
    options: &RenderOptions,
    mut writer: W,
) -> Result<()> {
    writer.write_all(render_document(bom, descriptions, options).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Write a rendered document to a file
pub fn write_to_file(
    bom: &ResolvedBom,
    descriptions: &Descriptions,
    options: &RenderOptions,
    output_path: impl AsRef<Path>,
) -> Result<()> {
    let file = create_file(output_path.as_ref())?;
    write_document(bom, descriptions, options, BufWriter::new(file))
}

/// Write the resolved designator table as pretty JSON
pub fn write_dump(bom: &ResolvedBom, output_path: impl AsRef<Path>) -> Result<()> {
    let file = create_file(output_path.as_ref())?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, bom)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(File::create(path)?)
}
