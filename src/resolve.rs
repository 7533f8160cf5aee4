//! BOM reading and row-to-name resolution

use crate::config::map_file;
use crate::error::{ConvertError, Result};
use crate::refdes::component_type;
use crate::types::{FieldMapping, FormatRules, ResolvedBom, ResolvedComponent, TemplateToken};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// One BOM row keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BomRow {
    fields: HashMap<String, String>,
}

impl BomRow {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(|s| s.as_str())
    }
}

/// Parsed BOM: header mapping plus rows
#[derive(Debug, Clone, Default)]
pub struct BomTable {
    pub mapping: FieldMapping,
    pub rows: Vec<BomRow>,
}

/// Read a CSV BOM from a file
pub fn read_bom_file(path: impl AsRef<Path>) -> Result<BomTable> {
    let data = map_file(path.as_ref())?;
    read_bom(&data)
}

/// Read a CSV BOM from bytes; the first record is the header
pub fn read_bom(data: &[u8]) -> Result<BomTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);

    let headers: Vec<String> = reader.byte_headers()?.iter().map(bytes_to_field).collect();
    let mapping = FieldMapping::from_headers(headers.iter().cloned());

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.clone(), bytes_to_field(value)))
            .collect();
        rows.push(BomRow::new(fields));
    }

    Ok(BomTable { mapping, rows })
}

fn bytes_to_field(data: &[u8]) -> String {
    crate::config::bytes_to_string(data)
}

/// Resolve every row of a BOM file against the naming rules
pub fn resolve_bom_file(path: impl AsRef<Path>, rules: &FormatRules) -> Result<ResolvedBom> {
    let table = read_bom_file(path)?;
    resolve_rows(&table, rules)
}

/// Resolve every row of a parsed BOM against the naming rules.
///
/// Rows whose component type has no rule (and no `*` fallback) are skipped;
/// each such type is logged and recorded once in `ResolvedBom::missing`.
pub fn resolve_rows(table: &BomTable, rules: &FormatRules) -> Result<ResolvedBom> {
    let refdes_key = rules.refdes.as_deref().ok_or(ConvertError::MissingRefDesRule)?;
    let refdes_column = table
        .mapping
        .resolve(refdes_key)
        .ok_or_else(|| ConvertError::UnknownColumn { column: refdes_key.to_string() })?;
    if let Some(quantity_key) = rules.quantity.as_deref() {
        if table.mapping.resolve(quantity_key).is_none() {
            return Err(ConvertError::UnknownColumn { column: quantity_key.to_string() });
        }
    }

    let mut resolver = Resolver::new(&table.mapping, rules);
    for row in &table.rows {
        resolver.resolve_row(row, refdes_column);
    }
    Ok(resolver.finish())
}

/// Stateful row resolver; remembers which types were already reported missing
struct Resolver<'a> {
    mapping: &'a FieldMapping,
    rules: &'a FormatRules,
    missing_seen: HashSet<String>,
    result: ResolvedBom,
}

impl<'a> Resolver<'a> {
    fn new(mapping: &'a FieldMapping, rules: &'a FormatRules) -> Self {
        Self {
            mapping,
            rules,
            missing_seen: HashSet::new(),
            result: ResolvedBom::default(),
        }
    }

    fn resolve_row(&mut self, row: &BomRow, refdes_column: &str) {
        let refdes = row.get(refdes_column).unwrap_or("");
        let designators = split_designators(refdes);
        if designators.is_empty() {
            tracing::debug!(row = ?row, "skipping row without designators");
            return;
        }

        let kind = row_component_type(refdes);
        if self.missing_seen.contains(&kind) {
            return;
        }
        let Some(template) = self.rules.lookup(&kind) else {
            tracing::warn!(component_type = %kind, "no naming rule for component type");
            self.missing_seen.insert(kind.clone());
            self.result.missing.push(kind);
            return;
        };

        let name = compose_name(self.mapping, template, row);
        for designator in designators {
            self.result
                .components
                .insert(designator.to_string(), ResolvedComponent::new(name.clone()));
        }
    }

    fn finish(self) -> ResolvedBom {
        self.result
    }
}

/// Component type of a designator cell, taken from its first entry
pub fn row_component_type(refdes: &str) -> String {
    let first = refdes.split(',').next().unwrap_or("");
    component_type(first.trim())
}

/// Split a designator cell on commas, trimming and dropping empty pieces
pub fn split_designators(refdes: &str) -> Vec<&str> {
    refdes.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
}

/// Build a display name from a template.
///
/// Placeholders are first replaced by the column names they map to, then every
/// piece that names a column is replaced by the row value. Pieces that name no
/// column stay literal. Empty values, and columns a short row does not reach,
/// are dropped.
pub fn compose_name(mapping: &FieldMapping, template: &[TemplateToken], row: &BomRow) -> Vec<String> {
    let columns = substitute(template.iter().map(TemplateToken::as_str), |id| mapping.column(id));
    substitute(columns.iter().map(String::as_str), |column| {
        let is_column = mapping.columns().iter().any(|c| c == column);
        is_column.then(|| row.get(column).unwrap_or(""))
    })
}

fn substitute<'a, 'b, I, F>(pieces: I, lookup: F) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
    F: Fn(&str) -> Option<&'b str>,
{
    pieces
        .filter_map(|piece| match lookup(piece) {
            Some(value) if value.is_empty() => None,
            Some(value) => Some(value.to_string()),
            None => Some(piece.to_string()),
        })
        .collect()
}
