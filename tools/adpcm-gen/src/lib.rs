//! adpcm-gen - sample table generator
//!
//! Encodes every sample file in a directory with an external ADPCM encoder,
//! frames each payload with a 32-bit length prefix, and renders a C header
//! holding one byte array per sample plus an enum and pointer table.

pub mod config;
pub mod document;
pub mod encoder;
pub mod error;
pub mod framing;
pub mod hex;
pub mod select;
pub mod wave;

use std::path::Path;

pub use config::Config;
pub use document::{render_header, Document, EncodedRecord};
pub use encoder::{Encoder, ExternalEncoder};
pub use error::{Error, Result};
pub use select::{check_symbols, select_samples, SampleFile};

/// Select, encode, and render a whole sample directory
///
/// Nothing is returned unless every sample encodes; the caller decides
/// where the text goes.
pub fn generate_header<E: Encoder + ?Sized>(
    dir: &Path,
    config: &Config,
    encoder: &E,
    verify: bool,
) -> Result<String> {
    let samples = select_samples(dir, config.extension())?;
    check_symbols(&samples, &config.output)?;
    let document = Document::build(&samples, encoder, verify)?;
    Ok(render_header(&document, &config.output)?)
}
