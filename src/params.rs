//! Stream parameters in `av-data` terms

use std::sync::Arc;

use av_data::{
    audiosample::{ChannelMap, Soniton},
    params::{AudioInfo, CodecParams, MediaKind},
};

use crate::format::PcmFormatChunk;
use crate::wave::{Format, Wave};

impl PcmFormatChunk {
    /// Sample layout: 8 bit PCM is unsigned, everything wider is signed
    ///
    /// Depths beyond what a [`Soniton`] can hold are clamped to 255 bits.
    pub fn soniton(&self) -> Soniton {
        let bits = u8::try_from(self.bits_per_sample).unwrap_or(u8::MAX);
        if self.bits_per_sample == 8 {
            Soniton::new(bits, false, false, false, false, false)
        } else {
            Soniton::new(bits, false, false, false, false, true)
        }
    }

    pub fn audio_info(&self) -> AudioInfo {
        AudioInfo {
            rate: self.sample_rate as usize,
            map: Some(ChannelMap::default_map(self.channels as usize)),
            format: Some(Arc::new(self.soniton())),
        }
    }
}

impl Wave {
    /// Codec parameters for handing the data chunk to an `av-data` based decoder
    ///
    /// Non-PCM formats pass their format specific bytes on as extradata and carry no
    /// sample format.
    pub fn codec_params(&self) -> CodecParams {
        let (codec_id, extradata, audio_info) = match self.format() {
            Format::Pcm(pcm) => ("pcm", None, pcm.audio_info()),
            Format::Other(format) => (
                format.codec_name().unwrap_or("unknown"),
                Some(format.specific.clone()),
                AudioInfo {
                    rate: format.sample_rate as usize,
                    map: Some(ChannelMap::default_map(format.channels as usize)),
                    format: None,
                },
            ),
        };
        CodecParams {
            extradata,
            bit_rate: (self.format().byte_rate() as usize).saturating_mul(8),
            delay: 0,
            convergence_window: 0,
            codec_id: Some(codec_id.to_owned()),
            kind: Some(MediaKind::Audio(audio_info)),
        }
    }
}
