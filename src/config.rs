//! Configuration
//!
//! TOML-facing schema (`IndentConfig`) and the validated engine options
//! (`IndentOptions`) derived from it. The schema is permissive; validation
//! happens in the conversion so a host can surface bad settings as ordinary
//! report items instead of failing.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::syntax::tree::NODE_KIND_NAMES;

/// Root configuration structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndentConfig {
    pub indent_unit: RawIndentUnit,
    pub align_attributes_vertically: bool,
    pub indent_script_and_style: bool,
    pub attribute_expression_indent: AttributeExpressionIndent,
    pub ignored_nodes: Vec<String>,
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self {
            indent_unit: RawIndentUnit::Count(2),
            align_attributes_vertically: true,
            indent_script_and_style: false,
            attribute_expression_indent: AttributeExpressionIndent::Expression,
            ignored_nodes: Vec::new(),
        }
    }
}

impl IndentConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Indent unit as written in configuration: a space count, a literal run of
/// spaces, or "tab"
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawIndentUnit {
    Count(u8),
    Literal(String),
}

/// Which rule wins on tokens shared between a wrapped attribute and the
/// templated expression inside its value
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttributeExpressionIndent {
    /// Expression continuations indent relative to their `{`
    #[default]
    Expression,
    /// Expression continuations indent relative to the attribute
    Attribute,
}

/// Validated unit of indentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentUnit {
    Spaces(u8),
    Tabs,
}

impl IndentUnit {
    /// Columns added per indentation level. A tab counts as one column.
    pub fn width(&self) -> usize {
        match self {
            IndentUnit::Spaces(n) => *n as usize,
            IndentUnit::Tabs => 1,
        }
    }

    /// The leading-whitespace text for an expected column.
    pub fn text_for(&self, columns: usize) -> String {
        match self {
            IndentUnit::Spaces(_) => " ".repeat(columns),
            IndentUnit::Tabs => "\t".repeat(columns),
        }
    }

    /// Human description of a column count, e.g. "2 spaces" or "1 tab".
    pub fn describe(&self, columns: usize) -> String {
        let noun = match self {
            IndentUnit::Spaces(_) => "space",
            IndentUnit::Tabs => "tab",
        };
        if columns == 1 {
            format!("1 {noun}")
        } else {
            format!("{columns} {noun}s")
        }
    }
}

/// Validated options consumed by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct IndentOptions {
    pub unit: IndentUnit,
    /// Align attributes after the first to the first attribute's column.
    /// Mainly useful with a space unit.
    pub align_attributes_vertically: bool,
    /// Re-anchor script/style content to the surrounding structure
    pub indent_script_and_style: bool,
    pub attribute_expression_indent: AttributeExpressionIndent,
    /// Node kinds whose subtrees keep their observed indentation
    pub ignored_nodes: Vec<String>,
}

impl Default for IndentOptions {
    fn default() -> Self {
        Self {
            unit: IndentUnit::Spaces(2),
            align_attributes_vertically: true,
            indent_script_and_style: false,
            attribute_expression_indent: AttributeExpressionIndent::Expression,
            ignored_nodes: Vec::new(),
        }
    }
}

impl IndentOptions {
    pub fn is_ignored(&self, kind_name: &str) -> bool {
        self.ignored_nodes.iter().any(|name| name == kind_name)
    }
}

impl TryFrom<&IndentConfig> for IndentOptions {
    type Error = ConfigError;

    fn try_from(config: &IndentConfig) -> Result<Self, ConfigError> {
        let unit = match &config.indent_unit {
            RawIndentUnit::Count(0) => return Err(ConfigError::InvalidUnit("0".to_string())),
            RawIndentUnit::Count(n) => IndentUnit::Spaces(*n),
            RawIndentUnit::Literal(text) => parse_unit_text(text)?,
        };

        for name in &config.ignored_nodes {
            if !NODE_KIND_NAMES.contains(&name.as_str()) {
                return Err(ConfigError::UnknownIgnoredNode(name.clone()));
            }
        }

        Ok(Self {
            unit,
            align_attributes_vertically: config.align_attributes_vertically,
            indent_script_and_style: config.indent_script_and_style,
            attribute_expression_indent: config.attribute_expression_indent,
            ignored_nodes: config.ignored_nodes.clone(),
        })
    }
}

fn parse_unit_text(text: &str) -> Result<IndentUnit, ConfigError> {
    if text == "tab" || text == "\t" {
        return Ok(IndentUnit::Tabs);
    }
    if !text.is_empty() && text.len() <= u8::MAX as usize && text.bytes().all(|b| b == b' ') {
        return Ok(IndentUnit::Spaces(text.len() as u8));
    }
    Err(ConfigError::InvalidUnit(text.to_string()))
}

/// A configuration that cannot be turned into engine options
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid indent unit '{0}': expected a positive space count, a run of spaces, or \"tab\"")]
    InvalidUnit(String),

    #[error("unknown node kind '{0}' in ignored_nodes")]
    UnknownIgnoredNode(String),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
