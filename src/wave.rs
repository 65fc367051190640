//! The `WAVE` form of a RIFF container

use tracing::debug;

use crate::chunk::{Chunk, FourCC, GenericChunk};
use crate::config::Limits;
use crate::error::{Error, Result};
use crate::format::{FormatChunk, PcmFormatChunk};
use crate::riff::{encode_riff, RiffChunk};
use crate::sample::Frames;

/// A RIFF container of form type `WAVE` with its `fmt ` chunk decoded
///
/// The sub-chunks keep their stream order. When a file holds more than one `fmt ` or
/// `data` chunk only the first of each is used; the others stay in the list untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wave {
    size: u32,
    subchunks: Vec<Chunk>,
    format_index: usize,
    data_index: usize,
}

/// The two shapes a specialized `fmt ` chunk can take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format<'a> {
    Pcm(&'a PcmFormatChunk),
    Other(&'a FormatChunk),
}

impl Format<'_> {
    pub fn format_tag(&self) -> u16 {
        match self {
            Format::Pcm(pcm) => pcm.format_tag(),
            Format::Other(format) => format.format_tag,
        }
    }

    pub fn channels(&self) -> u16 {
        match self {
            Format::Pcm(pcm) => pcm.channels,
            Format::Other(format) => format.channels,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        match self {
            Format::Pcm(pcm) => pcm.sample_rate,
            Format::Other(format) => format.sample_rate,
        }
    }

    pub fn byte_rate(&self) -> u32 {
        match self {
            Format::Pcm(pcm) => pcm.byte_rate,
            Format::Other(format) => format.byte_rate,
        }
    }

    pub fn block_align(&self) -> u16 {
        match self {
            Format::Pcm(pcm) => pcm.block_align,
            Format::Other(format) => format.block_align,
        }
    }

    /// Only PCM formats declare a bit depth this crate understands
    pub fn bits_per_sample(&self) -> Option<u16> {
        match self {
            Format::Pcm(pcm) => Some(pcm.bits_per_sample),
            Format::Other(_) => None,
        }
    }
}

/// The stream properties a consumer typically wants to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Metadata {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: Option<u16>,
}

impl Wave {
    /// Locate and decode the `fmt ` chunk and locate the `data` chunk
    ///
    /// Sub-chunks that were already specialized are accepted as they are, so a wave taken
    /// apart with [`Wave::into_riff`] can be put back together.
    pub fn specialize(riff: RiffChunk) -> Result<Self> {
        if riff.form_type != FourCC::WAVE {
            return Err(Error::InvalidFormat {
                expected: FourCC::WAVE,
                found: riff.form_type,
            });
        }

        let RiffChunk {
            size,
            mut subchunks,
            ..
        } = riff;

        let format_index = subchunks
            .iter()
            .position(|chunk| chunk.id() == FourCC::FMT)
            .ok_or(Error::MissingChunk(FourCC::FMT))?;
        let format = match &subchunks[format_index] {
            Chunk::Generic(chunk) => Some(FormatChunk::decode(chunk)?),
            Chunk::Format(format) => Some(format.clone()),
            Chunk::PcmFormat(_) => None,
        };
        if let Some(format) = format {
            subchunks[format_index] = format.specialize()?;
        }

        let data_index = subchunks
            .iter()
            .position(|chunk| chunk.id() == FourCC::DATA)
            .ok_or(Error::MissingChunk(FourCC::DATA))?;

        let wave = Self {
            size,
            subchunks,
            format_index,
            data_index,
        };
        debug!(
            format_tag = wave.format().format_tag(),
            channels = wave.channel_count(),
            sample_rate = wave.sample_rate(),
            data_len = wave.data().data.len(),
            "specialized wave"
        );
        Ok(wave)
    }

    /// The declared size of the outer `RIFF` chunk
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn subchunks(&self) -> &[Chunk] {
        &self.subchunks
    }

    pub fn format(&self) -> Format<'_> {
        match &self.subchunks[self.format_index] {
            Chunk::PcmFormat(pcm) => Format::Pcm(pcm),
            Chunk::Format(format) => Format::Other(format),
            Chunk::Generic(_) => unreachable!("the format chunk is specialized on construction"),
        }
    }

    pub fn format_index(&self) -> usize {
        self.format_index
    }

    pub fn data(&self) -> &GenericChunk {
        match &self.subchunks[self.data_index] {
            Chunk::Generic(chunk) => chunk,
            _ => unreachable!("only generic chunks can carry the data id"),
        }
    }

    pub fn data_index(&self) -> usize {
        self.data_index
    }

    pub fn sample_rate(&self) -> u32 {
        self.format().sample_rate()
    }

    pub fn channel_count(&self) -> u16 {
        self.format().channels()
    }

    pub fn bits_per_sample(&self) -> Option<u16> {
        self.format().bits_per_sample()
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            sample_rate: self.sample_rate(),
            channels: self.channel_count(),
            bits_per_sample: self.bits_per_sample(),
        }
    }

    /// Frames of the data chunk, for PCM formats only
    pub fn frames(&self) -> Result<Frames<'_>> {
        match self.format() {
            Format::Pcm(pcm) => Frames::new(&self.data().data, pcm.bits_per_sample, pcm.channels),
            Format::Other(format) => Err(Error::UnsupportedFormat(format.format_tag)),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        encode_riff(self.size, FourCC::WAVE, &self.subchunks)
    }

    pub fn into_riff(self) -> RiffChunk {
        RiffChunk {
            size: self.size,
            form_type: FourCC::WAVE,
            subchunks: self.subchunks,
        }
    }
}

impl TryFrom<RiffChunk> for Wave {
    type Error = Error;

    fn try_from(riff: RiffChunk) -> Result<Self> {
        Wave::specialize(riff)
    }
}

/// Decode a complete WAVE file held in memory
pub fn decode(input: &[u8]) -> Result<Wave> {
    decode_with_limits(input, &Limits::default())
}

pub fn decode_with_limits(input: &[u8], limits: &Limits) -> Result<Wave> {
    limits.check(input.len())?;
    Wave::specialize(RiffChunk::decode(input)?)
}

/// Encode a wave back to bytes, keeping every declared size as it is
pub fn encode(wave: &Wave) -> Vec<u8> {
    wave.encode()
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use crate::format::PCM_FORMAT_TAG;
    use crate::sample::Sample;

    use super::*;

    const STEREO: &[u8] = include_bytes!("../assets/stereo.wav");

    fn chunk(out: &mut Vec<u8>, id: &[u8; 4], size: u32, data: &[u8]) {
        out.extend_from_slice(id);
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(data);
    }

    fn pcm_fields(channels: u16, sample_rate: u32, bits: u16) -> Vec<u8> {
        let block_align = channels * bits / 8;
        let mut out = Vec::new();
        out.extend_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * u32::from(block_align)).to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&bits.to_le_bytes());
        out
    }

    /// 44.1kHz mono 16 bit with two samples
    fn mono() -> Vec<u8> {
        let mut out = Vec::new();
        chunk(&mut out, b"RIFF", 40, b"WAVE");
        chunk(&mut out, b"fmt ", 16, &pcm_fields(1, 44100, 16));
        chunk(&mut out, b"data", 4, &[0x45, 0x06, 0xCF, 0x73]);
        out
    }

    #[test]
    fn decode_mono() {
        let wave = decode(&mono()).unwrap();
        assert_eq!(wave.size(), 40);
        assert_eq!(wave.sample_rate(), 44100);
        assert_eq!(wave.channel_count(), 1);
        assert_eq!(wave.bits_per_sample(), Some(16));
        assert_eq!(wave.format().byte_rate(), 88200);
        assert_eq!(wave.format().block_align(), 2);
        assert_eq!(wave.format_index(), 0);
        assert_eq!(wave.data_index(), 1);
        assert_eq!(wave.data().data, [0x45, 0x06, 0xCF, 0x73]);
        assert!(matches!(wave.subchunks()[0], Chunk::PcmFormat(_)));

        let frames: Vec<_> = wave.frames().unwrap().collect();
        assert_eq!(
            frames,
            vec![vec![Sample::I16(0x0645)], vec![Sample::I16(0x73CF)]]
        );
    }

    #[test]
    fn metadata() {
        assert_eq!(
            decode(&mono()).unwrap().metadata(),
            Metadata {
                sample_rate: 44100,
                channels: 1,
                bits_per_sample: Some(16),
            }
        );
    }

    #[test]
    fn round_trip() {
        let input = mono();
        let wave = decode(&input).unwrap();
        let encoded = encode(&wave);
        assert_eq!(encoded, input);
        assert_eq!(decode(&encoded).unwrap(), wave);
    }

    #[test]
    fn edited_round_trip() {
        let wave = decode(&mono()).unwrap();
        let mut riff = wave.into_riff();
        if let Chunk::PcmFormat(pcm) = &mut riff.subchunks[0] {
            pcm.sample_rate = 22050;
        }
        let edited = Wave::try_from(riff).unwrap();
        assert_eq!(edited.sample_rate(), 22050);

        let decoded = decode(&edited.encode()).unwrap();
        assert_eq!(decoded, edited);
        assert_eq!(decoded.size(), 40);
    }

    #[test]
    fn corrupted_riff_tag() {
        let mut input = mono();
        input[3] = b'X';
        assert_eq!(
            decode(&input),
            Err(Error::InvalidFormat {
                expected: FourCC::RIFF,
                found: FourCC(*b"RIFX"),
            })
        );
    }

    #[test]
    fn not_wave() {
        let mut input = mono();
        input[8..12].copy_from_slice(b"AVI ");
        let riff = RiffChunk::decode(&input).unwrap();
        assert_eq!(
            Wave::specialize(riff),
            Err(Error::InvalidFormat {
                expected: FourCC::WAVE,
                found: FourCC(*b"AVI "),
            })
        );
    }

    #[test]
    fn data_longer_than_stream() {
        let mut out = Vec::new();
        chunk(&mut out, b"RIFF", 136, b"WAVE");
        chunk(&mut out, b"fmt ", 16, &pcm_fields(1, 44100, 16));
        chunk(&mut out, b"data", 100, &[0x45, 0x06, 0xCF, 0x73]);
        assert_eq!(
            decode(&out),
            Err(Error::Incomplete {
                needed: NonZeroUsize::new(96)
            })
        );
    }

    #[test]
    fn truncated_anywhere() {
        let input = mono();
        for len in 0..input.len() {
            assert!(
                decode(&input[..len]).unwrap_err().is_incomplete(),
                "length {len}"
            );
        }
    }

    #[test]
    fn missing_chunks() {
        let mut out = Vec::new();
        chunk(&mut out, b"RIFF", 28, b"WAVE");
        chunk(&mut out, b"fmt ", 16, &pcm_fields(1, 44100, 16));
        assert_eq!(decode(&out), Err(Error::MissingChunk(FourCC::DATA)));

        let mut out = Vec::new();
        chunk(&mut out, b"RIFF", 16, b"WAVE");
        chunk(&mut out, b"data", 4, &[0, 0, 0, 0]);
        assert_eq!(decode(&out), Err(Error::MissingChunk(FourCC::FMT)));
    }

    #[test]
    fn non_pcm() {
        let mut fields = Vec::new();
        fields.extend_from_slice(&0x0011u16.to_le_bytes());
        fields.extend_from_slice(&1u16.to_le_bytes());
        fields.extend_from_slice(&8000u32.to_le_bytes());
        fields.extend_from_slice(&4055u32.to_le_bytes());
        fields.extend_from_slice(&256u16.to_le_bytes());
        fields.extend_from_slice(&[4, 0, 2, 0, 0xF9, 0x01]);

        let mut out = Vec::new();
        chunk(&mut out, b"RIFF", 40, b"WAVE");
        chunk(&mut out, b"fmt ", 20, &fields);
        chunk(&mut out, b"data", 0, &[]);

        let wave = decode(&out).unwrap();
        let Format::Other(format) = wave.format() else {
            panic!("ima-adpcm must not be read as pcm");
        };
        assert_eq!(format.codec_name(), Some("ima-adpcm-ms"));
        assert_eq!(format.specific, [4, 0, 2, 0, 0xF9, 0x01]);
        assert_eq!(wave.bits_per_sample(), None);
        assert_eq!(wave.frames().unwrap_err(), Error::UnsupportedFormat(0x0011));
        assert_eq!(wave.encode(), out);
    }

    #[test]
    fn first_match_wins() {
        let mut out = Vec::new();
        chunk(&mut out, b"RIFF", 72, b"WAVE");
        chunk(&mut out, b"data", 2, &[1, 0]);
        chunk(&mut out, b"fmt ", 16, &pcm_fields(1, 8000, 16));
        chunk(&mut out, b"fmt ", 16, &pcm_fields(2, 48000, 16));
        chunk(&mut out, b"data", 2, &[2, 0]);

        let wave = decode(&out).unwrap();
        assert_eq!(wave.format_index(), 1);
        assert_eq!(wave.data_index(), 0);
        assert_eq!(wave.sample_rate(), 8000);
        assert_eq!(wave.data().data, [1, 0]);
        assert!(matches!(wave.subchunks()[2], Chunk::Generic(_)));
    }

    #[test]
    fn unsupported_width() {
        let mut out = Vec::new();
        chunk(&mut out, b"RIFF", 42, b"WAVE");
        chunk(&mut out, b"fmt ", 16, &pcm_fields(2, 48000, 24));
        chunk(&mut out, b"data", 6, &[0; 6]);
        let wave = decode(&out).unwrap();
        assert_eq!(wave.bits_per_sample(), Some(24));
        assert_eq!(wave.frames().unwrap_err(), Error::UnsupportedSampleWidth(24));
    }

    #[test]
    fn limits() {
        let input = mono();
        assert!(decode_with_limits(&input, &Limits::bounded(input.len())).is_ok());
        assert_eq!(
            decode_with_limits(&input, &Limits::bounded(16)),
            Err(Error::TooLarge {
                len: input.len(),
                limit: 16
            })
        );
    }

    #[test]
    fn stereo_fixture() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("riff_wave=trace")
            .with_test_writer()
            .try_init();

        let wave = decode(STEREO).unwrap();
        assert_eq!(wave.sample_rate(), 8000);
        assert_eq!(wave.channel_count(), 2);
        assert_eq!(wave.bits_per_sample(), Some(16));
        assert_eq!(wave.subchunks().len(), 3);
        assert_eq!(wave.subchunks()[1].id(), FourCC(*b"LIST"));
        assert_eq!(wave.data_index(), 2);

        let frames = wave.frames().unwrap();
        assert_eq!(frames.len(), 64);
        for frame in frames {
            // The right channel is the inverted left channel
            assert_eq!(frame.len(), 2);
            assert_eq!(frame[0].to_i64(), -frame[1].to_i64());
        }

        assert_eq!(wave.encode(), STEREO);
    }
}
