//! Document assembly and C header rendering
//!
//! Records are accumulated in file order and rendered as:
//! preamble, symbol enum, one byte array per record, the pointer table,
//! and a size summary.

use std::fmt::Write as FmtWrite;

use crate::config::OutputConfig;
use crate::encoder::Encoder;
use crate::error::{Error, Result};
use crate::framing::{frame, RecordHeader};
use crate::hex::render_hex_body;
use crate::select::SampleFile;
use crate::wave::inspect_adpcm;

/// Fixed header text. `@TYPE@` is replaced by the configured record type.
pub const PREAMBLE: &str = "\
#include <stdint.h>
#include <stddef.h>

#ifndef PROGMEM
#define PROGMEM
#endif

#ifndef PROGMEM_ALIGNED
#if defined(__GNUC__)
#define PROGMEM_ALIGNED(n) __attribute__((aligned(n)))
#else
#define PROGMEM_ALIGNED(n)
#endif
#endif

typedef struct {
    uint32_t size;
    uint8_t content[];
} @TYPE@;
";

/// One encoded sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRecord {
    pub name: String,
    /// Length prefix followed by the encoder output
    pub framed: Vec<u8>,
}

impl EncodedRecord {
    /// Encoder output without the length prefix
    pub fn payload(&self) -> &[u8] {
        self.framed.get(RecordHeader::SIZE..).unwrap_or_default()
    }

    /// Size of the emitted array, prefix included
    pub fn byte_length(&self) -> usize {
        self.framed.len()
    }
}

/// Ordered records plus the running byte total
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    records: Vec<EncodedRecord>,
    total_bytes: usize,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode every sample in order. Stops at the first failure.
    ///
    /// With `verify` set, each payload must pass [`inspect_adpcm`].
    pub fn build<E: Encoder + ?Sized>(
        samples: &[SampleFile],
        encoder: &E,
        verify: bool,
    ) -> Result<Self> {
        let mut document = Self::new();

        for sample in samples {
            let path = &sample.path;
            let input = std::fs::read(path).map_err(|e| Error::io(path, e))?;

            let payload = encoder
                .encode(&input)
                .map_err(|source| Error::Encoding {
                    path: path.clone(),
                    source,
                })?;

            if verify {
                let info = inspect_adpcm(&payload).map_err(|source| Error::Payload {
                    path: path.clone(),
                    source,
                })?;
                tracing::debug!(
                    "{}: {} ch, {} Hz, {} samples ({:.2}s)",
                    sample.name,
                    info.channels,
                    info.sample_rate,
                    info.total_samples,
                    info.duration_secs()
                );
            }

            let framed = frame(&payload).map_err(|source| Error::Framing {
                path: path.clone(),
                source,
            })?;

            tracing::info!(
                "Encoded {}: {} -> {} bytes",
                path.display(),
                input.len(),
                framed.len()
            );

            document.push(EncodedRecord {
                name: sample.name.clone(),
                framed,
            });
        }

        tracing::info!(
            "Encoded {} sample(s), {} bytes total",
            document.records.len(),
            document.total_bytes
        );

        Ok(document)
    }

    pub fn push(&mut self, record: EncodedRecord) {
        self.total_bytes += record.byte_length();
        self.records.push(record);
    }

    pub fn records(&self) -> &[EncodedRecord] {
        &self.records
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }
}

/// Size in KB with two decimals, used for per-array comments
pub fn kib_two_decimals(bytes: usize) -> String {
    format!("{:.2}", bytes as f64 / 1024.0)
}

/// Size in whole KB (rounded down), used for the summary line
pub fn kib_floor(bytes: usize) -> usize {
    bytes / 1024
}

/// Render the full header text
pub fn render_header(
    document: &Document,
    output: &OutputConfig,
) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();
    let guard = format!("{}_H", output.table_name.to_uppercase());
    // Records are read through a struct with a uint32_t member
    let align = if output.align > 1 {
        format!(" PROGMEM_ALIGNED({})", output.align)
    } else {
        String::new()
    };

    writeln!(out, "// GENERATED FILE - DO NOT EDIT")?;
    writeln!(out, "// Generator: tools/adpcm-gen")?;
    writeln!(out)?;
    writeln!(out, "#ifndef {}", guard)?;
    writeln!(out, "#define {}", guard)?;
    writeln!(out)?;
    out.push_str(&PREAMBLE.replace("@TYPE@", &output.type_name));
    writeln!(out)?;

    // Symbol enum; the count keeps it non-empty
    writeln!(out, "enum {{")?;
    for record in &document.records {
        writeln!(out, "  {},", output.enum_symbol(&record.name))?;
    }
    writeln!(out, "  {}", output.count_symbol())?;
    writeln!(out, "}};")?;
    writeln!(out)?;

    // Byte arrays
    for record in &document.records {
        let array = output.array_symbol(&record.name);
        writeln!(out, "const uint8_t {}[]{} PROGMEM ={{", array, align)?;
        writeln!(out, "{}", render_hex_body(&record.framed, output.line_width))?;
        writeln!(out, "}};")?;
        writeln!(
            out,
            "// {}: {} bytes, {} KB",
            array,
            record.byte_length(),
            kib_two_decimals(record.byte_length())
        )?;
        writeln!(out)?;
    }

    // Pointer table, NULL terminated
    writeln!(
        out,
        "const {} *const {}[] PROGMEM = {{",
        output.type_name, output.table_name
    )?;
    for record in &document.records {
        writeln!(
            out,
            "  (const {} *){},",
            output.type_name,
            output.array_symbol(&record.name)
        )?;
    }
    writeln!(out, "  NULL,")?;
    writeln!(out, "}};")?;
    writeln!(out)?;

    writeln!(
        out,
        "// total: {} bytes, {} KB",
        document.total_bytes,
        kib_floor(document.total_bytes)
    )?;
    writeln!(out)?;
    writeln!(out, "#endif /* {} */", guard)?;

    Ok(out)
}
