//! Typed views of the `fmt ` chunk

use tracing::debug;

use crate::chunk::{write_header, Chunk, FourCC, GenericChunk};
use crate::error::Result;
use crate::parser::{read_format, read_u16};

/// Linear PCM, the only format whose `fmt ` body is interpreted past the fixed fields
pub const PCM_FORMAT_TAG: u16 = 0x0001;
pub(crate) const PCM_FLOAT_FORMAT_TAG: u16 = 0x0003;

static WAV_CODEC_REGISTER: &[(u16, &str)] = &[
    (0x0000, "unknown"),
    (PCM_FORMAT_TAG, "pcm"),
    (0x0002, "ms-adpcm"),
    (PCM_FLOAT_FORMAT_TAG, "pcm"),
    (0x0006, "alaw"),
    (0x0007, "mulaw"),
    (0x0011, "ima-adpcm-ms"),
    (0x0055, "mp3"),
    (0x0061, "adpcm-dk4"),
    (0x0062, "adpcm-dk3"),
    (0x0401, "imc"),
    (0x0402, "iac"),
    (0x0500, "on2avc-500"),
    (0x0501, "on2avc-501"),
    (0xFFFE, "extensible"),
];

/// Name of the codec a WAVE format tag stands for, if it is a known one
pub fn codec_name(format_tag: u16) -> Option<&'static str> {
    WAV_CODEC_REGISTER
        .iter()
        .find(|(tag, _)| *tag == format_tag)
        .map(|(_, name)| *name)
}

/// A `fmt ` chunk of any format
///
/// Only the fields shared by every format are decoded; whatever follows them is kept
/// verbatim in `specific`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatChunk {
    pub size: u32,
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub specific: Vec<u8>,
}

impl FormatChunk {
    /// Interpret the body of a generic `fmt ` chunk
    ///
    /// Fails with [`Error::Incomplete`](crate::Error::Incomplete) when the body is too
    /// short to hold the fixed fields.
    pub fn decode(chunk: &GenericChunk) -> Result<Self> {
        let (_, (fields, specific)) = read_format(&chunk.data)?;
        Ok(Self {
            size: chunk.size,
            format_tag: fields.format_tag,
            channels: fields.channels,
            sample_rate: fields.sample_rate,
            byte_rate: fields.byte_rate,
            block_align: fields.block_align,
            specific: specific.to_vec(),
        })
    }

    pub fn is_pcm(&self) -> bool {
        self.format_tag == PCM_FORMAT_TAG
    }

    pub fn codec_name(&self) -> Option<&'static str> {
        codec_name(self.format_tag)
    }

    /// Narrow down to a [`PcmFormatChunk`] if the format tag says PCM
    pub fn specialize(self) -> Result<Chunk> {
        if !self.is_pcm() {
            debug!(
                format_tag = self.format_tag,
                codec = self.codec_name().unwrap_or("unknown"),
                "keeping non-pcm format chunk"
            );
            return Ok(Chunk::Format(self));
        }

        let (extension, bits_per_sample) = read_u16(&self.specific)?;
        Ok(Chunk::PcmFormat(PcmFormatChunk {
            size: self.size,
            channels: self.channels,
            sample_rate: self.sample_rate,
            byte_rate: self.byte_rate,
            block_align: self.block_align,
            bits_per_sample,
            extension: extension.to_vec(),
        }))
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        write_header(out, FourCC::FMT, self.size);
        write_fields(
            out,
            self.format_tag,
            self.channels,
            self.sample_rate,
            self.byte_rate,
            self.block_align,
        );
        out.extend_from_slice(&self.specific);
    }

    /// Number of bytes [`FormatChunk::encode`] writes
    pub fn encoded_len(&self) -> usize {
        8 + FIELDS_LEN + self.specific.len()
    }
}

/// A `fmt ` chunk describing linear PCM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmFormatChunk {
    pub size: u32,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    /// Bytes trailing `bits_per_sample` in the stream, only kept to re-encode them
    pub(crate) extension: Vec<u8>,
}

impl PcmFormatChunk {
    /// A plain 16 byte PCM `fmt ` chunk, with byte rate and block alignment derived
    /// from the other fields
    pub fn new(channels: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        let block_align = channels.saturating_mul(bits_per_sample.div_ceil(8));
        Self {
            size: (FIELDS_LEN + 2) as u32,
            channels,
            sample_rate,
            byte_rate: sample_rate.saturating_mul(u32::from(block_align)),
            block_align,
            bits_per_sample,
            extension: Vec::new(),
        }
    }

    pub fn format_tag(&self) -> u16 {
        PCM_FORMAT_TAG
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        write_header(out, FourCC::FMT, self.size);
        write_fields(
            out,
            PCM_FORMAT_TAG,
            self.channels,
            self.sample_rate,
            self.byte_rate,
            self.block_align,
        );
        out.extend_from_slice(&self.bits_per_sample.to_le_bytes());
        out.extend_from_slice(&self.extension);
    }

    /// Number of bytes [`PcmFormatChunk::encode`] writes
    pub fn encoded_len(&self) -> usize {
        8 + FIELDS_LEN + 2 + self.extension.len()
    }
}

/// Length of the fields every `fmt ` body starts with
const FIELDS_LEN: usize = 14;

fn write_fields(
    out: &mut Vec<u8>,
    format_tag: u16,
    channels: u16,
    sample_rate: u32,
    byte_rate: u32,
    block_align: u16,
) {
    out.extend_from_slice(&format_tag.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
}
