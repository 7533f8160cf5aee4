//! Loaders for the format rule and description files
//!
//! Both files are line-oriented `key:value` text. Lines starting with `#`
//! and lines without a colon are skipped.

use crate::error::{ConvertError, Result};
use crate::types::{Descriptions, FormatRules, TemplateToken};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

static FIELD_PATTERN: OnceLock<Regex> = OnceLock::new();

fn field_pattern() -> &'static Regex {
    FIELD_PATTERN.get_or_init(|| Regex::new(r"field\d{1,2}").expect("valid field pattern"))
}

/// Load naming rules from a file
pub fn load_format_rules(path: impl AsRef<Path>) -> Result<FormatRules> {
    let path = path.as_ref();
    let data = map_file(path)?;
    let rules = parse_format_rules(&data);
    if rules.is_empty() {
        return Err(ConvertError::EmptyConfig { path: path.display().to_string() });
    }
    Ok(rules)
}

/// Load section descriptions from a file
pub fn load_descriptions(path: impl AsRef<Path>) -> Result<Descriptions> {
    let path = path.as_ref();
    let data = map_file(path)?;
    let descriptions = parse_descriptions(&data);
    if descriptions.is_empty() {
        return Err(ConvertError::EmptyConfig { path: path.display().to_string() });
    }
    Ok(descriptions)
}

/// Parse naming rules from raw bytes
pub fn parse_format_rules(data: &[u8]) -> FormatRules {
    let mut rules = FormatRules::new();

    for (key, value) in key_value_lines(data) {
        let key = key.trim().to_lowercase();
        match key.as_str() {
            "refdes" => rules.refdes = Some(value.trim().to_lowercase()),
            "quantity" => rules.quantity = Some(value.trim().to_lowercase()),
            _ => rules.insert(key.to_uppercase(), split_template(value.trim())),
        }
    }

    rules
}

/// Parse section descriptions from raw bytes; the first entry for a type wins
pub fn parse_descriptions(data: &[u8]) -> Descriptions {
    let mut descriptions = Descriptions::new();

    for (key, value) in key_value_lines(data) {
        let headers = value.splitn(2, ',').map(|s| s.trim().to_string()).collect();
        descriptions.insert_first(key.trim().to_uppercase(), headers);
    }

    descriptions
}

/// Split a template into literals and `fieldN` placeholders, dropping empty pieces
pub fn split_template(template: &str) -> Vec<TemplateToken> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for m in field_pattern().find_iter(template) {
        if m.start() > last {
            tokens.push(TemplateToken::Literal(template[last..m.start()].to_string()));
        }
        tokens.push(TemplateToken::Field(m.as_str().to_string()));
        last = m.end();
    }
    if last < template.len() {
        tokens.push(TemplateToken::Literal(template[last..].to_string()));
    }

    tokens
}

/// Iterate the `key:value` pairs of a config file
fn key_value_lines(data: &[u8]) -> impl Iterator<Item = (String, String)> + '_ {
    data.split(|&b| b == b'\n').filter_map(|line| {
        let line = trim_end(line);
        if trim_start(line).starts_with(b"#") {
            return None;
        }
        let colon = memchr::memchr(b':', line)?;
        Some((bytes_to_string(&line[..colon]), bytes_to_string(&line[colon + 1..])))
    })
}

/// Memory-map a file; empty files map to an empty slice
pub(crate) fn map_file(path: &Path) -> Result<memmap2::Mmap> {
    let file = std::fs::File::open(path)?;
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    Ok(mmap)
}

/// Convert bytes to string, trying UTF-8 then Latin-1
pub(crate) fn bytes_to_string(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(s) => s.to_string(),
        Err(_) => data.iter().map(|&b| b as char).collect(),
    }
}

fn trim_start(data: &[u8]) -> &[u8] {
    let start = data.iter().position(|&b| !matches!(b, b' ' | b'\t')).unwrap_or(data.len());
    &data[start..]
}

fn trim_end(data: &[u8]) -> &[u8] {
    let end = data.iter().rposition(|&b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r')).map(|p| p + 1).unwrap_or(0);
    &data[..end]
}
