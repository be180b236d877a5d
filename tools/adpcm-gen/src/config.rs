//! Generator configuration
//!
//! Every field has a default, so an absent or partial `adpcm-gen.toml`
//! reproduces the stock output:
//!
//! ```toml
//! [input]
//! extension = "wav"
//!
//! [encoder]
//! program = "adpcm-xq"
//! args = ["-b8", "-e", "/dev/stdin", "/dev/stdout"]
//!
//! [output]
//! type_name = "adpcm_progm_t"
//! symbol_prefix = "ADPCM_"
//! array_prefix = "adpcm_"
//! table_name = "adpcm_table"
//! line_width = 81
//! align = 4
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};

/// Width used by the stock generator (16 literals per line)
pub const DEFAULT_LINE_WIDTH: usize = 81;

/// Narrowest width that still fits an indent plus one `0xNN,` literal
pub const MIN_LINE_WIDTH: usize = 6;

/// Array alignment matching the `uint32_t size` field of the record type
pub const DEFAULT_ALIGN: u32 = 4;

/// Suffix of the enum constant holding the sample count
pub const COUNT_SUFFIX: &str = "COUNT";

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input: InputConfig,
    pub encoder: EncoderConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Sample file extension, without the dot (matched case-insensitively)
    pub extension: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extension: "wav".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderConfig {
    /// Encoder executable (bare name or path)
    pub program: String,
    /// Arguments passed on every invocation
    pub args: Vec<String>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            program: "adpcm-xq".to_string(),
            // 256-byte blocks, encode only, stdin -> stdout
            args: ["-b8", "-e", "/dev/stdin", "/dev/stdout"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// C struct type describing one framed record
    pub type_name: String,
    /// Prefix for enum constants
    pub symbol_prefix: String,
    /// Prefix for byte array names
    pub array_prefix: String,
    /// Name of the pointer table
    pub table_name: String,
    /// Maximum length of a byte array body line
    pub line_width: usize,
    /// Byte alignment of every array (power of two; 1 disables the attribute)
    pub align: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            type_name: "adpcm_progm_t".to_string(),
            symbol_prefix: "ADPCM_".to_string(),
            array_prefix: "adpcm_".to_string(),
            table_name: "adpcm_table".to_string(),
            line_width: DEFAULT_LINE_WIDTH,
            align: DEFAULT_ALIGN,
        }
    }
}

impl OutputConfig {
    /// Enum constant for a sample
    pub fn enum_symbol(&self, name: &str) -> String {
        format!("{}{}", self.symbol_prefix, name)
    }

    /// Trailing enum constant holding the number of samples
    pub fn count_symbol(&self) -> String {
        self.enum_symbol(COUNT_SUFFIX)
    }

    /// Byte array for a sample
    pub fn array_symbol(&self, name: &str) -> String {
        format!("{}{}", self.array_prefix, name)
    }
}

impl Config {
    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml(&content).map_err(|e| match e {
            Error::Config { source, .. } => Error::Config {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse and validate config text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|source| Error::Config {
            path: Default::default(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field produces a usable header
    pub fn validate(&self) -> Result<()> {
        let extension = self.input.extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(Error::InvalidConfig("input.extension is empty".into()));
        }
        if self.encoder.program.trim().is_empty() {
            return Err(Error::InvalidConfig("encoder.program is empty".into()));
        }

        let out = &self.output;
        require_identifier("output.type_name", &out.type_name, false)?;
        require_identifier("output.table_name", &out.table_name, false)?;
        require_identifier("output.symbol_prefix", &out.symbol_prefix, true)?;
        require_identifier("output.array_prefix", &out.array_prefix, true)?;

        if out.symbol_prefix == out.array_prefix {
            return Err(Error::InvalidConfig(format!(
                "output.symbol_prefix and output.array_prefix are both '{}'",
                out.symbol_prefix
            )));
        }
        if out.type_name == out.table_name {
            return Err(Error::InvalidConfig(format!(
                "output.type_name and output.table_name are both '{}'",
                out.type_name
            )));
        }
        let count = out.count_symbol();
        if out.type_name == count || out.table_name == count {
            return Err(Error::InvalidConfig(format!(
                "'{}' is reserved for the sample count",
                count
            )));
        }

        if !out.align.is_power_of_two() {
            return Err(Error::InvalidConfig(format!(
                "output.align must be a power of two (got {})",
                out.align
            )));
        }

        if out.line_width < MIN_LINE_WIDTH {
            return Err(Error::InvalidConfig(format!(
                "output.line_width must be at least {} (got {})",
                MIN_LINE_WIDTH, out.line_width
            )));
        }

        Ok(())
    }

    /// Extension with any leading dot removed
    pub fn extension(&self) -> &str {
        self.input.extension.trim_start_matches('.')
    }
}

/// C identifier check. Prefixes may be empty; whole names may not.
fn require_identifier(field: &str, value: &str, prefix: bool) -> Result<()> {
    let mut chars = value.chars();
    let valid = match chars.next() {
        None => prefix,
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
    };

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{} is not a valid C identifier: '{}'",
            field, value
        )))
    }
}
