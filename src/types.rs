//! Type definitions for rule tables, resolved components and render options

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

/// Key of the naming rule used for component types without a dedicated rule
pub const DEFAULT_RULE_KEY: &str = "*";

/// One piece of a naming template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateToken {
    /// Text copied into the name as-is
    Literal(String),
    /// Positional field identifier such as `field3`
    Field(String),
}

impl TemplateToken {
    pub fn as_str(&self) -> &str {
        match self {
            TemplateToken::Literal(s) | TemplateToken::Field(s) => s,
        }
    }
}

/// Naming rules loaded from the format file
#[derive(Debug, Clone, Default)]
pub struct FormatRules {
    /// Column (or field id) holding the reference designators
    pub refdes: Option<String>,
    /// Column (or field id) holding the quantity
    pub quantity: Option<String>,
    rules: HashMap<String, Vec<TemplateToken>>,
}

impl FormatRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the template for a component type.
    pub fn insert(&mut self, component_type: impl Into<String>, template: Vec<TemplateToken>) {
        self.rules.insert(component_type.into(), template);
    }

    /// Template registered for exactly this component type.
    pub fn rule(&self, component_type: &str) -> Option<&[TemplateToken]> {
        self.rules.get(component_type).map(|v| v.as_slice())
    }

    /// Template for a component type, falling back to the `*` rule.
    pub fn lookup(&self, component_type: &str) -> Option<&[TemplateToken]> {
        self.rule(component_type).or_else(|| self.rule(DEFAULT_RULE_KEY))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.refdes.is_none() && self.quantity.is_none()
    }
}

/// Section headers per component type: index 0 singular, index 1 plural
#[derive(Debug, Clone, Default)]
pub struct Descriptions {
    entries: HashMap<String, Vec<String>>,
}

impl Descriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store headers for a type unless it is already present.
    ///
    /// Returns `false` when an earlier entry for the same type was kept.
    pub fn insert_first(&mut self, component_type: impl Into<String>, headers: Vec<String>) -> bool {
        let key = component_type.into();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, headers);
        true
    }

    /// Header for a type, or `None` if the type or the requested form is missing.
    pub fn header(&self, component_type: &str, plural: bool) -> Option<&str> {
        let index = usize::from(plural);
        self.entries
            .get(component_type)
            .and_then(|headers| headers.get(index))
            .map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Positional `fieldN` identifiers mapped onto BOM header columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    columns: Vec<String>,
}

impl FieldMapping {
    pub fn from_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: headers.into_iter().map(Into::into).collect(),
        }
    }

    /// Column name for a field identifier (`field1` is the first column).
    pub fn column(&self, field_id: &str) -> Option<&str> {
        let index: usize = field_id.strip_prefix("field")?.parse().ok()?;
        if index == 0 || format!("field{}", index) != field_id {
            return None;
        }
        self.columns.get(index - 1).map(|s| s.as_str())
    }

    /// Resolve either a field identifier or a header name (case-insensitive).
    pub fn resolve(&self, key: &str) -> Option<&str> {
        let key = key.trim();
        self.column(&key.to_ascii_lowercase()).or_else(|| {
            self.columns
                .iter()
                .find(|c| c.trim().eq_ignore_ascii_case(key))
                .map(|s| s.as_str())
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Display name and quantity resolved for one designator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedComponent {
    pub name: Vec<String>,
    pub quantity: String,
}

impl ResolvedComponent {
    pub fn new(name: Vec<String>) -> Self {
        Self {
            name,
            quantity: "1".to_string(),
        }
    }
}

/// Result of resolving every row of one BOM
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolvedBom {
    pub components: BTreeMap<String, ResolvedComponent>,
    /// Component types that had no naming rule, in first-seen order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

/// How designators are combined into list entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GroupMode {
    /// One entry per designator
    None,
    /// One entry per run of same-type, same-name designators
    #[default]
    Flat,
}

impl FromStr for GroupMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(GroupMode::None),
            "flat" => Ok(GroupMode::Flat),
            other => Err(format!("unknown group mode: {}", other)),
        }
    }
}

/// Title block values written into the document preamble
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub author: String,
    pub checker: String,
    pub norm_controller: String,
    pub approver: String,
    pub title: String,
    pub number: String,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            author: "Author".to_string(),
            checker: "Checker".to_string(),
            norm_controller: "Controller".to_string(),
            approver: "Approver".to_string(),
            title: "Title".to_string(),
            number: "XXXX.00000.001".to_string(),
        }
    }
}

/// Options for rendering
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub group: GroupMode,
    /// Insert a blank entry after this many entries of a section (0 = never)
    pub strings: usize,
    pub info: DocumentInfo,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: GroupMode) -> Self {
        self.group = group;
        self
    }

    pub fn with_strings(mut self, strings: usize) -> Self {
        self.strings = strings;
        self
    }

    pub fn with_info(mut self, info: DocumentInfo) -> Self {
        self.info = info;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_mapping() {
        let mapping = FieldMapping::from_headers(["Designator", "Value", "Qty"]);
        assert_eq!(mapping.column("field1"), Some("Designator"));
        assert_eq!(mapping.column("field3"), Some("Qty"));
        assert_eq!(mapping.column("field4"), None);
        assert_eq!(mapping.column("field0"), None);
        assert_eq!(mapping.column("field01"), None);
        assert_eq!(mapping.resolve("FIELD2"), Some("Value"));
        assert_eq!(mapping.resolve("qty"), Some("Qty"));
        assert_eq!(mapping.resolve("missing"), None);
    }

    #[test]
    fn test_rule_fallback() {
        let mut rules = FormatRules::new();
        rules.insert("R", vec![TemplateToken::Literal("resistor".into())]);
        assert!(rules.lookup("C").is_none());

        rules.insert("*", vec![TemplateToken::Field("field2".into())]);
        assert_eq!(rules.lookup("R").unwrap()[0].as_str(), "resistor");
        assert_eq!(rules.lookup("C").unwrap()[0].as_str(), "field2");
    }

    #[test]
    fn test_description_header() {
        let mut desc = Descriptions::new();
        assert!(desc.insert_first("R", vec!["Resistor".into(), "Resistors".into()]));
        assert!(desc.insert_first("C", vec!["Capacitor".into()]));
        assert!(!desc.insert_first("R", vec!["Other".into()]));

        assert_eq!(desc.header("R", false), Some("Resistor"));
        assert_eq!(desc.header("R", true), Some("Resistors"));
        assert_eq!(desc.header("C", true), None);
        assert_eq!(desc.header("L", false), None);
    }

    #[test]
    fn test_group_mode_from_str() {
        assert_eq!("none".parse::<GroupMode>().unwrap(), GroupMode::None);
        assert_eq!("FLAT".parse::<GroupMode>().unwrap(), GroupMode::Flat);
        assert!("tree".parse::<GroupMode>().is_err());
        assert_eq!(GroupMode::default(), GroupMode::Flat);
    }
}
