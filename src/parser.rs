//! Streaming primitives for the RIFF layout
//!
//! Every parser here is built on nom's *streaming* combinators, so running out of
//! input is reported as `nom::Err::Incomplete` and never confused with malformed data.

use nom::{
    bytes::streaming::take,
    combinator::{map, rest},
    number::streaming::{le_u16, le_u32},
    sequence::{pair, tuple},
    IResult,
};

use crate::chunk::FourCC;

#[derive(Debug, PartialEq)]
pub struct Error<'a> {
    pub(crate) input: &'a [u8],
    pub(crate) kind: nom::error::ErrorKind,
}

impl<'a> nom::error::ParseError<&'a [u8]> for Error<'a> {
    fn from_error_kind(input: &'a [u8], kind: nom::error::ErrorKind) -> Self {
        Error { input, kind }
    }

    fn append(_input: &'a [u8], _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

pub(crate) type PResult<'a, O> = IResult<&'a [u8], O, Error<'a>>;

/// The fixed part of a `fmt ` body, in stream order
pub(crate) struct FormatFields {
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
}

pub(crate) fn read_u16(input: &[u8]) -> PResult<u16> {
    le_u16(input)
}

pub(crate) fn read_u32(input: &[u8]) -> PResult<u32> {
    le_u32(input)
}

pub(crate) fn read_exact(count: usize) -> impl Fn(&[u8]) -> PResult<&[u8]> {
    move |input| take(count)(input)
}

pub(crate) fn read_fourcc(input: &[u8]) -> PResult<FourCC> {
    map(take(4usize), |id: &[u8]| {
        let mut bytes = [0; 4];
        bytes.copy_from_slice(id);
        FourCC(bytes)
    })(input)
}

pub(crate) fn read_chunk_header(input: &[u8]) -> PResult<(FourCC, u32)> {
    pair(read_fourcc, read_u32)(input)
}

/// Tag, declared size and exactly `size` body bytes
pub(crate) fn read_chunk(input: &[u8]) -> PResult<(FourCC, u32, &[u8])> {
    let (i, (id, size)) = read_chunk_header(input)?;
    let (i, body) = read_exact(size as usize)(i)?;
    Ok((i, (id, size, body)))
}

/// Fixed `fmt ` fields followed by the format specific tail
pub(crate) fn read_format(input: &[u8]) -> PResult<(FormatFields, &[u8])> {
    let (i, fields) = map(
        tuple((read_u16, read_u16, read_u32, read_u32, read_u16)),
        |t| FormatFields {
            format_tag: t.0,
            channels: t.1,
            sample_rate: t.2,
            byte_rate: t.3,
            block_align: t.4,
        },
    )(input)?;
    let (i, specific) = rest::<_, Error>(i)?;
    Ok((i, (fields, specific)))
}
