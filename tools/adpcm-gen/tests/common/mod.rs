//! Fixture builders shared by the integration tests

#![allow(dead_code)]

use std::path::Path;

/// Write a short 16-bit mono PCM WAV
pub fn write_pcm_wav(path: &Path, frames: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("Failed to create WAV");
    for i in 0..frames {
        let sample = ((i * 37) % 2000) as i16 - 1000;
        writer.write_sample(sample).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV");
}

/// IMA ADPCM mono container with 256-byte blocks
pub fn adpcm_wav(blocks: usize) -> Vec<u8> {
    let mut fmt = Vec::new();
    fmt.extend_from_slice(&0x0011u16.to_le_bytes()); // IMA ADPCM
    fmt.extend_from_slice(&1u16.to_le_bytes()); // channels
    fmt.extend_from_slice(&8000u32.to_le_bytes()); // sample rate
    fmt.extend_from_slice(&4055u32.to_le_bytes()); // byte rate
    fmt.extend_from_slice(&256u16.to_le_bytes()); // block align
    fmt.extend_from_slice(&4u16.to_le_bytes()); // bits per sample
    fmt.extend_from_slice(&2u16.to_le_bytes()); // extra size
    fmt.extend_from_slice(&505u16.to_le_bytes()); // samples per block

    let data = vec![0x5a; blocks * 256];

    let mut body = Vec::new();
    body.extend_from_slice(b"WAVE");
    for (id, chunk) in [(b"fmt ", &fmt), (b"data", &data)] {
        body.extend_from_slice(id);
        body.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
        body.extend_from_slice(chunk);
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(&body);
    out
}

/// Config that swaps the real encoder for `cat`
pub const CAT_CONFIG: &str = r#"
[encoder]
program = "cat"
args = []
"#;
