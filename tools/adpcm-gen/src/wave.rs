//! Encoded payload inspection
//!
//! Applies the acceptance rules of the firmware-side IMA ADPCM decoder to an
//! encoder's output, so a payload the device would refuse at init time is
//! caught at build time instead.
//!
//! Accepted containers:
//! - RIFF/WAVE with a `fmt ` chunk of 16..=40 bytes
//! - IMA ADPCM (0x11), 4 bits per sample, 1 or 2 channels
//!   (WAVE_FORMAT_EXTENSIBLE is unwrapped when the chunk is 40 bytes)
//! - samples per block = (block_align - 4 * ch) * (ch ^ 3) + 1
//! - optional `fact` chunk, a non-empty `data` chunk
//!
//! Unknown chunks are skipped (word aligned).

pub const WAVE_FORMAT_PCM: u16 = 0x0001;
pub const WAVE_FORMAT_IMA_ADPCM: u16 = 0x0011;
pub const WAVE_FORMAT_EXTENSIBLE: u16 = 0xfffe;

const MIN_FMT_SIZE: u32 = 16;
const MAX_FMT_SIZE: u32 = 40;

/// Stream parameters of an accepted payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdpcmInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub block_align: u16,
    pub samples_per_block: u32,
    /// Sample frames (per channel)
    pub total_samples: u64,
}

impl AdpcmInfo {
    /// Playback length in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.total_samples as f64 / self.sample_rate as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("not a RIFF/WAVE container")]
    NotRiffWave,

    #[error("truncated {0}")]
    Truncated(&'static str),

    #[error("fmt chunk is {0} bytes (expected 16..=40)")]
    BadFormatSize(u32),

    #[error("fact chunk is {0} bytes (expected at least 4)")]
    BadFactSize(u32),

    #[error(
        "unsupported format: tag {format:#06x}, {channels} channel(s), {bits} bits per sample"
    )]
    Unsupported { format: u16, channels: u16, bits: u16 },

    #[error("block align {block_align} implies {expected} samples per block, header says {declared}")]
    BlockMismatch {
        block_align: u16,
        declared: u16,
        expected: i64,
    },

    #[error("data chunk appears before fmt chunk")]
    MissingFormat,

    #[error("no data chunk")]
    MissingData,

    #[error("trailing partial block of {0} bytes")]
    PartialBlock(u32),

    #[error("no audio samples")]
    NoSamples,
}

/// Fields of the `fmt ` chunk that the decoder looks at
#[derive(Debug, Clone, Copy)]
struct FormatChunk {
    channels: u16,
    sample_rate: u32,
    block_align: u16,
    samples_per_block: u16,
}

struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ChunkReader<'a> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], PayloadError> {
        if len > self.remaining() {
            return Err(PayloadError::Truncated(what));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
}

fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// `(block_align - 4 * ch) * (ch ^ 3) + 1`
fn samples_per_block(block_align: u16, channels: u16) -> i64 {
    (block_align as i64 - channels as i64 * 4) * (channels ^ 3) as i64 + 1
}

fn parse_format(body: &[u8]) -> Result<FormatChunk, PayloadError> {
    // Short chunks leave the extension fields zeroed
    let mut raw = [0u8; MAX_FMT_SIZE as usize];
    raw[..body.len()].copy_from_slice(body);

    let tag = u16_at(&raw, 0);
    let channels = u16_at(&raw, 2);
    let sample_rate = u32_at(&raw, 4);
    let block_align = u16_at(&raw, 12);
    let bits_per_sample = u16_at(&raw, 14);
    let samples_field = u16_at(&raw, 18);
    let sub_format = u16_at(&raw, 24);

    let extended = body.len() == MAX_FMT_SIZE as usize;
    let format = if tag == WAVE_FORMAT_EXTENSIBLE && extended {
        sub_format
    } else {
        tag
    };
    let bits = if extended && samples_field != 0 {
        samples_field
    } else {
        bits_per_sample
    };

    let unsupported = PayloadError::Unsupported {
        format,
        channels,
        bits,
    };
    if !(1..=2).contains(&channels) || format != WAVE_FORMAT_IMA_ADPCM || bits != 4 {
        return Err(unsupported);
    }

    let expected = samples_per_block(block_align, channels);
    if samples_field as i64 != expected {
        return Err(PayloadError::BlockMismatch {
            block_align,
            declared: samples_field,
            expected,
        });
    }

    Ok(FormatChunk {
        channels,
        sample_rate,
        block_align,
        samples_per_block: samples_field,
    })
}

/// Sample frames held by a `data` chunk of `size` bytes
fn count_samples(fmt: &FormatChunk, size: u32, fact: u32) -> Result<u64, PayloadError> {
    let block_align = fmt.block_align as u64;
    let channels = fmt.channels as u64;
    let size = size as u64;

    let complete_blocks = size / block_align;
    let leftover = size % block_align;
    let mut total = complete_blocks * fmt.samples_per_block as u64;

    let last_block = if leftover > 0 {
        if leftover % (channels * 4) != 0 {
            return Err(PayloadError::PartialBlock(leftover as u32));
        }
        let last = (leftover - channels * 4) * (channels ^ 3) + 1;
        total += last;
        last
    } else {
        fmt.samples_per_block as u64
    };

    // fact narrows the count only when it lands inside the last block;
    // some writers store it summed over both channels
    let mut fact = fact as u64;
    if fact > 0 {
        let floor = total - last_block;
        if fact < total && fact > floor {
            total = fact;
        } else if fmt.channels == 2 {
            fact >>= 1;
            if fact < total && fact > floor {
                total = fact;
            }
        }
    }

    Ok(total)
}

/// Validate an encoded payload and describe its stream
pub fn inspect_adpcm(payload: &[u8]) -> Result<AdpcmInfo, PayloadError> {
    let mut reader = ChunkReader {
        data: payload,
        pos: 0,
    };

    let riff = reader
        .take(12, "RIFF header")
        .map_err(|_| PayloadError::NotRiffWave)?;
    if &riff[0..4] != b"RIFF" || &riff[8..12] != b"WAVE" {
        return Err(PayloadError::NotRiffWave);
    }

    let mut format: Option<FormatChunk> = None;
    let mut fact_samples = 0u32;

    loop {
        if reader.remaining() == 0 {
            return Err(PayloadError::MissingData);
        }
        let header = reader.take(8, "chunk header")?;
        let id = &header[0..4];
        let size = u32_at(header, 4);

        match id {
            b"fmt " => {
                if !(MIN_FMT_SIZE..=MAX_FMT_SIZE).contains(&size) {
                    return Err(PayloadError::BadFormatSize(size));
                }
                let body = reader.take(size as usize, "fmt chunk")?;
                format = Some(parse_format(body)?);
            }
            b"fact" => {
                if size < 4 {
                    return Err(PayloadError::BadFactSize(size));
                }
                let body = reader.take(size as usize, "fact chunk")?;
                fact_samples = u32_at(body, 0);
            }
            b"data" => {
                let fmt = format.ok_or(PayloadError::MissingFormat)?;
                if size == 0 {
                    return Err(PayloadError::NoSamples);
                }
                reader.take(size as usize, "data chunk")?;

                let total_samples = count_samples(&fmt, size, fact_samples)?;
                if total_samples == 0 {
                    return Err(PayloadError::NoSamples);
                }

                return Ok(AdpcmInfo {
                    channels: fmt.channels,
                    sample_rate: fmt.sample_rate,
                    block_align: fmt.block_align,
                    samples_per_block: fmt.samples_per_block as u32,
                    total_samples,
                });
            }
            _ => {
                reader.take(size as usize, "chunk")?;
                // Pad byte after odd-sized chunks
                if size % 2 == 1 && reader.remaining() > 0 {
                    reader.pos += 1;
                }
            }
        }
    }
}
