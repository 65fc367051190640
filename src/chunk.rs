//! Chunks, the atomic unit of every RIFF stream

use std::fmt;

use tracing::trace;

use crate::error::{Error, Result};
use crate::format::{FormatChunk, PcmFormatChunk};
use crate::parser::read_chunk;

/// A four character code identifying a chunk or form type
///
/// Any four bytes are accepted; the tag is not required to be printable ASCII.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const RIFF: FourCC = FourCC(*b"RIFF");
    pub const WAVE: FourCC = FourCC(*b"WAVE");
    pub const FMT: FourCC = FourCC(*b"fmt ");
    pub const DATA: FourCC = FourCC(*b"data");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<[u8; 4]> for FourCC {
    fn from(bytes: [u8; 4]) -> Self {
        FourCC(bytes)
    }
}

impl From<&[u8; 4]> for FourCC {
    fn from(bytes: &[u8; 4]) -> Self {
        FourCC(*bytes)
    }
}

impl PartialEq<[u8; 4]> for FourCC {
    fn eq(&self, other: &[u8; 4]) -> bool {
        &self.0 == other
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC(\"{self}\")")
    }
}

/// A chunk whose body has not been interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericChunk {
    pub id: FourCC,
    /// The size as it was declared in the stream
    pub size: u32,
    pub data: Vec<u8>,
}

impl GenericChunk {
    /// A chunk whose declared size matches its body
    ///
    /// Bodies of 4 GiB and more cannot be described by the size field and fail with
    /// [`Error::TooLarge`].
    pub fn new(id: FourCC, data: Vec<u8>) -> Result<Self> {
        let size = declared_size(data.len())?;
        Ok(Self { id, size, data })
    }

    /// Decode one chunk from the front of `input`, returning it with the remaining bytes
    ///
    /// Chunks are not padded to even boundaries, so the remainder starts right after the
    /// declared body.
    pub fn decode(input: &[u8]) -> Result<(Self, &[u8])> {
        let (i, (id, size, data)) = read_chunk(input)?;
        trace!(%id, size, "decoded chunk");
        Ok((
            Self {
                id,
                size,
                data: data.to_vec(),
            },
            i,
        ))
    }

    /// Appends the chunk to `out`
    ///
    /// The stored size is written as is, even when it disagrees with the body length.
    pub fn encode(&self, out: &mut Vec<u8>) {
        write_header(out, self.id, self.size);
        out.extend_from_slice(&self.data);
    }

    /// Number of bytes [`GenericChunk::encode`] writes
    pub fn encoded_len(&self) -> usize {
        8 + self.data.len()
    }
}

fn declared_size(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::TooLarge {
        len,
        limit: u32::MAX as usize,
    })
}

pub(crate) fn write_header(out: &mut Vec<u8>, id: FourCC, size: u32) {
    out.extend_from_slice(id.as_bytes());
    out.extend_from_slice(&size.to_le_bytes());
}

/// Every kind of sub-chunk this crate knows about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Generic(GenericChunk),
    Format(FormatChunk),
    PcmFormat(PcmFormatChunk),
}

impl Chunk {
    pub fn id(&self) -> FourCC {
        match self {
            Chunk::Generic(chunk) => chunk.id,
            Chunk::Format(_) | Chunk::PcmFormat(_) => FourCC::FMT,
        }
    }

    pub fn size(&self) -> u32 {
        match self {
            Chunk::Generic(chunk) => chunk.size,
            Chunk::Format(chunk) => chunk.size,
            Chunk::PcmFormat(chunk) => chunk.size,
        }
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Chunk::Generic(chunk) => chunk.encode(out),
            Chunk::Format(chunk) => chunk.encode(out),
            Chunk::PcmFormat(chunk) => chunk.encode(out),
        }
    }

    /// Number of bytes [`Chunk::encode`] writes, independent of the declared size
    pub fn encoded_len(&self) -> usize {
        match self {
            Chunk::Generic(chunk) => chunk.encoded_len(),
            Chunk::Format(chunk) => chunk.encoded_len(),
            Chunk::PcmFormat(chunk) => chunk.encoded_len(),
        }
    }

    pub fn as_generic(&self) -> Option<&GenericChunk> {
        match self {
            Chunk::Generic(chunk) => Some(chunk),
            _ => None,
        }
    }
}

impl From<GenericChunk> for Chunk {
    fn from(chunk: GenericChunk) -> Self {
        Chunk::Generic(chunk)
    }
}

impl From<FormatChunk> for Chunk {
    fn from(chunk: FormatChunk) -> Self {
        Chunk::Format(chunk)
    }
}

impl From<PcmFormatChunk> for Chunk {
    fn from(chunk: PcmFormatChunk) -> Self {
        Chunk::PcmFormat(chunk)
    }
}
