//! Length-prefixed record framing
//!
//! # Layout
//! ```text
//! 0x00: size u32 LE (payload length, header excluded)
//! 0x04: payload bytes
//! ```
//!
//! Matches `struct { uint32_t size; uint8_t content[]; }` on the firmware side.

/// Record header (4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct RecordHeader {
    pub size: u32,
}

impl RecordHeader {
    pub const SIZE: usize = 4;

    pub fn new(size: u32) -> Self {
        Self { size }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        self.size.to_le_bytes()
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            size: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FramingError {
    #[error("payload of {0} bytes does not fit a 32-bit length prefix")]
    PayloadTooLarge(usize),
}

/// Prefix `payload` with its length
pub fn frame(payload: &[u8]) -> Result<Vec<u8>, FramingError> {
    let size =
        u32::try_from(payload.len()).map_err(|_| FramingError::PayloadTooLarge(payload.len()))?;

    let mut framed = Vec::with_capacity(RecordHeader::SIZE + payload.len());
    framed.extend_from_slice(&RecordHeader::new(size).to_bytes());
    framed.extend_from_slice(payload);
    Ok(framed)
}
