//! LaTeX escaping and line cleanup

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

pub const OPEN_QUOTE: &str = "<<";
pub const CLOSE_QUOTE: &str = ">>";
pub const PLUS_MINUS: &str = r"$\pm$";

static ESCAPES: OnceLock<HashMap<char, &'static str>> = OnceLock::new();

/// Characters with special meaning in LaTeX and their escaped forms
pub fn get_escape_table() -> &'static HashMap<char, &'static str> {
    ESCAPES.get_or_init(|| {
        let mut m = HashMap::with_capacity(16);

        m.insert('&', r"\&");
        m.insert('%', r"\%");
        m.insert('$', r"\$");
        m.insert('#', r"\#");
        m.insert('_', r"\_");
        m.insert('{', r"\{");
        m.insert('}', r"\}");
        m.insert('~', r"\lettertilde{}");
        m.insert('^', r"\letterhat{}");
        m.insert('\\', r"\letterbackslash{}");
        m.insert('\n', r"\\");

        m
    })
}

/// Character escaper carrying the open/close state of double quotes
#[derive(Debug, Clone)]
pub struct Escaper {
    next_quote_opens: bool,
}

impl Default for Escaper {
    fn default() -> Self {
        Self { next_quote_opens: true }
    }
}

impl Escaper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Escape one character, appending the result to `out`
    pub fn push_char(&mut self, c: char, out: &mut String) {
        if c == '"' {
            out.push_str(if self.next_quote_opens { OPEN_QUOTE } else { CLOSE_QUOTE });
            self.next_quote_opens = !self.next_quote_opens;
        } else if let Some(escaped) = get_escape_table().get(&c) {
            out.push_str(escaped);
        } else {
            out.push(c);
        }
    }

    pub fn escape(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            self.push_char(c, &mut out);
        }
        out
    }
}

struct CleanupPatterns {
    plus_minus: Regex,
    spaces: Regex,
    space_before_comma: Regex,
    repeated_commas: Regex,
}

static CLEANUP: OnceLock<CleanupPatterns> = OnceLock::new();

fn cleanup_patterns() -> &'static CleanupPatterns {
    CLEANUP.get_or_init(|| CleanupPatterns {
        plus_minus: Regex::new(r"\+(?:/-|\\-|-)").expect("valid plus-minus pattern"),
        spaces: Regex::new(r" {2,}").expect("valid spaces pattern"),
        space_before_comma: Regex::new(r" +,").expect("valid comma pattern"),
        repeated_commas: Regex::new(r",(?: *,)+").expect("valid comma pattern"),
    })
}

/// Tidy punctuation in an output line.
///
/// Rewrites `+-`, `+\-` and `+/-` to a plus-minus sign, collapses runs of spaces
/// and commas, drops spaces before commas and trims commas and spaces at both
/// ends. Applying it twice gives the same result as applying it once.
pub fn cleanup_line(line: &str) -> String {
    let p = cleanup_patterns();

    let line = p.plus_minus.replace_all(line, regex::NoExpand(PLUS_MINUS));
    let line = p.spaces.replace_all(&line, " ");
    let line = p.space_before_comma.replace_all(&line, ",");
    let line = p.repeated_commas.replace_all(&line, ",");

    line.trim_matches(|c| c == ',' || c == ' ').to_string()
}
