//! Guess rules: the small word lists behind the fallback guesser.
//!
//! The built-in lists are deliberately short. They can be extended (or
//! replaced) by a line-based rules file:
//!
//! ```text
//! # ~/.config/mdlink/guess.txt
//! generic_label: blog
//! content_keyword: wiki
//! low_info_segment: readme
//! strip_suffix: .php
//! ```
//!
//! `replace_defaults: yes` clears every list collected so far, so it
//! normally goes on the first line.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{MdlinkError, Result};

/// Leading host labels that carry no meaning (`www.example.com`).
pub const GENERIC_LABELS: &[&str] = &["www", "about", "me"];

/// Path segments that suggest the last segment names a piece of content.
pub const CONTENT_KEYWORDS: &[&str] = &[
    "posts", "article", "articles", "docs", "product", "products", "releases", "library", "blogs", "blog",
];

/// Last segments too generic to be worth appending.
pub const LOW_INFO_SEGMENTS: &[&str] = &["index", "introduction"];

/// Suffixes removed from the appended segment.
pub const STRIP_SUFFIXES: &[&str] = &[".html", ".htm"];

/// A single rules-file directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleDirective {
    GenericLabel(String),
    ContentKeyword(String),
    LowInfoSegment(String),
    StripSuffix(String),
    ReplaceDefaults(bool),
}

/// Word lists consulted by the [`Guesser`](crate::Guesser).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessRules {
    pub generic_labels: Vec<String>,
    pub content_keywords: Vec<String>,
    pub low_info_segments: Vec<String>,
    pub strip_suffixes: Vec<String>,
}

impl Default for GuessRules {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }

        Self {
            generic_labels: owned(GENERIC_LABELS),
            content_keywords: owned(CONTENT_KEYWORDS),
            low_info_segments: owned(LOW_INFO_SEGMENTS),
            strip_suffixes: owned(STRIP_SUFFIXES),
        }
    }
}

impl GuessRules {
    /// Rules with every list empty.
    pub fn empty() -> Self {
        Self {
            generic_labels: Vec::new(),
            content_keywords: Vec::new(),
            low_info_segments: Vec::new(),
            strip_suffixes: Vec::new(),
        }
    }

    pub fn add_directive(&mut self, directive: RuleDirective) {
        match directive {
            RuleDirective::GenericLabel(label) => push_unique(&mut self.generic_labels, label.to_lowercase()),
            RuleDirective::ContentKeyword(word) => push_unique(&mut self.content_keywords, word),
            RuleDirective::LowInfoSegment(word) => push_unique(&mut self.low_info_segments, word),
            RuleDirective::StripSuffix(suffix) => push_unique(&mut self.strip_suffixes, suffix),
            RuleDirective::ReplaceDefaults(true) => *self = Self::empty(),
            RuleDirective::ReplaceDefaults(false) => {}
        }
    }

    pub fn is_generic_label(&self, label: &str) -> bool {
        self.generic_labels.iter().any(|l| l.eq_ignore_ascii_case(label))
    }

    pub fn is_content_keyword(&self, segment: &str) -> bool {
        self.content_keywords.iter().any(|k| k == segment)
    }

    pub fn is_low_info(&self, segment: &str) -> bool {
        self.low_info_segments.iter().any(|s| s == segment)
    }

    /// Remove the first matching suffix from `segment`.
    pub fn strip_suffix<'a>(&self, segment: &'a str) -> &'a str {
        self.strip_suffixes
            .iter()
            .find_map(|suffix| segment.strip_suffix(suffix.as_str()))
            .unwrap_or(segment)
    }

    /// Parse rules text on top of the built-in defaults
    pub fn parse_str(content: &str) -> Result<Self> {
        Self::parse_reader(content.as_bytes())
    }

    /// Parse rules from a reader on top of the built-in defaults
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut rules = Self::default();

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line.map_err(|e| MdlinkError::RulesError(format!("Read error at line {}: {}", line_number, e)))?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let directive = parse_directive(line)
                .map_err(|e| MdlinkError::RulesError(format!("Parse error at line {}: {}", line_number, e)))?;
            rules.add_directive(directive);
        }

        Ok(rules)
    }

    /// Parse a rules file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(&path).map_err(|e| {
            MdlinkError::RulesError(format!("Cannot open file {}: {}", path.as_ref().display(), e))
        })?;

        Self::parse_reader(BufReader::new(file))
    }

    /// Load `~/.config/mdlink/guess.txt` if it exists, else the defaults.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// Default rules file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("mdlink").join("guess.txt"))
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

/// Parse a `key: value` directive line
pub fn parse_directive(line: &str) -> Result<RuleDirective> {
    let (key, value) = line
        .split_once(':')
        .ok_or_else(|| MdlinkError::RulesError(format!("Missing ':' in directive: {}", line)))?;

    let key = key.trim();
    let value = value.trim();
    if value.is_empty() {
        return Err(MdlinkError::RulesError(format!("Empty value for directive: {}", key)));
    }

    match key {
        "generic_label" => Ok(RuleDirective::GenericLabel(value.to_string())),
        "content_keyword" => Ok(RuleDirective::ContentKeyword(value.to_string())),
        "low_info_segment" => Ok(RuleDirective::LowInfoSegment(value.to_string())),
        "strip_suffix" => Ok(RuleDirective::StripSuffix(value.to_string())),
        "replace_defaults" => parse_bool(value).map(RuleDirective::ReplaceDefaults),
        _ => Err(MdlinkError::RulesError(format!("Unknown directive: {}", key))),
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" => Ok(false),
        _ => Err(MdlinkError::RulesError(format!("Invalid boolean: {}", value))),
    }
}
