//! Interleaved PCM sample data

use crate::error::{Error, Result};

/// The integer lane a sample is stored in, picked from its byte width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleWidth {
    U8,
    I16,
    I32,
    I64,
}

impl SampleWidth {
    pub fn from_bits(bits_per_sample: u16) -> Result<Self> {
        match bits_per_sample / 8 {
            _ if bits_per_sample % 8 != 0 => Err(Error::UnsupportedSampleWidth(bits_per_sample)),
            1 => Ok(SampleWidth::U8),
            2 => Ok(SampleWidth::I16),
            4 => Ok(SampleWidth::I32),
            8 => Ok(SampleWidth::I64),
            _ => Err(Error::UnsupportedSampleWidth(bits_per_sample)),
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            SampleWidth::U8 => 1,
            SampleWidth::I16 => 2,
            SampleWidth::I32 => 4,
            SampleWidth::I64 => 8,
        }
    }

    fn read(self, bytes: &[u8]) -> Sample {
        let mut buf = [0; 8];
        buf[..bytes.len()].copy_from_slice(bytes);
        match self {
            SampleWidth::U8 => Sample::U8(buf[0]),
            SampleWidth::I16 => Sample::I16(i16::from_le_bytes([buf[0], buf[1]])),
            SampleWidth::I32 => Sample::I32(i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])),
            SampleWidth::I64 => Sample::I64(i64::from_le_bytes(buf)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    U8(u8),
    I16(i16),
    I32(i32),
    I64(i64),
}

impl Sample {
    /// The sample as a signed value; 8 bit samples are recentred around zero
    pub fn to_i64(self) -> i64 {
        match self {
            Sample::U8(v) => i64::from(v) - 128,
            Sample::I16(v) => i64::from(v),
            Sample::I32(v) => i64::from(v),
            Sample::I64(v) => v,
        }
    }
}

/// One sample per channel
pub type Frame = Vec<Sample>;

/// Iterator over the frames of a data chunk body
///
/// Cloning gives an independent iterator, so the data can be walked more than once.
/// Bytes at the end that do not make up a whole frame are skipped.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    data: &'a [u8],
    width: SampleWidth,
    channels: usize,
}

impl<'a> Frames<'a> {
    pub fn new(data: &'a [u8], bits_per_sample: u16, channels: u16) -> Result<Self> {
        let width = SampleWidth::from_bits(bits_per_sample)?;
        Ok(Self {
            data,
            width,
            channels: channels as usize,
        })
    }

    pub fn width(&self) -> SampleWidth {
        self.width
    }

    fn stride(&self) -> usize {
        self.width.bytes() * self.channels
    }
}

impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let stride = self.stride();
        if stride == 0 || self.data.len() < stride {
            return None;
        }
        let (frame, rest) = self.data.split_at(stride);
        self.data = rest;
        Some(
            frame
                .chunks_exact(self.width.bytes())
                .map(|bytes| self.width.read(bytes))
                .collect(),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for Frames<'_> {
    fn len(&self) -> usize {
        match self.stride() {
            0 => 0,
            stride => self.data.len() / stride,
        }
    }
}
