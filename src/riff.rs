//! The outer `RIFF` container

use tracing::debug;

use crate::chunk::{write_header, Chunk, FourCC, GenericChunk};
use crate::error::{Error, Result};
use crate::parser::read_fourcc;

/// A `RIFF` chunk: a form type followed by a list of sub-chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiffChunk {
    /// The size as declared in the stream, covering the form type and all sub-chunks
    pub size: u32,
    pub form_type: FourCC,
    pub subchunks: Vec<Chunk>,
}

impl RiffChunk {
    /// Decode a `RIFF` chunk from the start of `input`
    ///
    /// Sub-chunks are read until the next one no longer fits in the declared body; those
    /// trailing bytes are dropped. Anything after the declared body is ignored as well.
    pub fn decode(input: &[u8]) -> Result<Self> {
        let (riff, _) = GenericChunk::decode(input)?;
        if riff.id != FourCC::RIFF {
            return Err(Error::InvalidFormat {
                expected: FourCC::RIFF,
                found: riff.id,
            });
        }

        let (mut i, form_type) = read_fourcc(&riff.data)?;
        let mut subchunks = Vec::new();
        loop {
            match GenericChunk::decode(i) {
                Ok((chunk, rest)) => {
                    subchunks.push(Chunk::Generic(chunk));
                    i = rest;
                }
                Err(Error::Incomplete { .. }) => break,
                Err(e) => return Err(e),
            }
        }
        if !i.is_empty() {
            debug!(trailing = i.len(), "dropping bytes that do not form a complete chunk");
        }

        debug!(
            %form_type,
            size = riff.size,
            subchunks = subchunks.len(),
            "decoded riff container"
        );
        Ok(Self {
            size: riff.size,
            form_type,
            subchunks,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        encode_riff(self.size, self.form_type, &self.subchunks)
    }

    /// First sub-chunk with the given id, along with its position
    pub fn find(&self, id: FourCC) -> Option<(usize, &Chunk)> {
        self.subchunks
            .iter()
            .enumerate()
            .find(|(_, chunk)| chunk.id() == id)
    }
}

pub(crate) fn encode_riff(size: u32, form_type: FourCC, subchunks: &[Chunk]) -> Vec<u8> {
    let body_len: usize = subchunks.iter().map(Chunk::encoded_len).sum();
    let mut out = Vec::with_capacity(12 + body_len);
    write_header(&mut out, FourCC::RIFF, size);
    out.extend_from_slice(form_type.as_bytes());
    for chunk in subchunks {
        chunk.encode(&mut out);
    }
    out
}
