//! RIFF/WAVE codec over in-memory byte buffers
//!
//! [`decode`] turns a complete WAVE file into a [`Wave`]: the outer `RIFF` chunk with
//! its sub-chunks, the `fmt ` chunk decoded into a typed view and the `data` chunk
//! located. [`encode`] writes a [`Wave`] back out, byte for byte, declared sizes included.
//!
//! To better understand the WAV format, read the
//! <a href="http://www-mmsp.ece.mcgill.ca/Documents/AudioFormats/WAVE/WAVE.html" target="_blank">WAV Specification</a>.

pub mod chunk;
pub mod config;
pub mod error;
pub mod format;
pub mod params;
pub(crate) mod parser;
pub mod riff;
pub mod sample;
pub mod wave;

pub use chunk::{Chunk, FourCC, GenericChunk};
pub use config::Limits;
pub use error::{Error, Result};
pub use format::{codec_name, FormatChunk, PcmFormatChunk, PCM_FORMAT_TAG};
pub use riff::RiffChunk;
pub use sample::{Frame, Frames, Sample, SampleWidth};
pub use wave::{decode, decode_with_limits, encode, Format, Metadata, Wave};
