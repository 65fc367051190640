use std::num::NonZeroUsize;

use thiserror::Error;

use crate::chunk::FourCC;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while decoding a RIFF/WAVE stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input ended before a structure it declares was complete
    ///
    /// `needed` is the number of extra bytes that would have let the failing read
    /// go through, when it is known.
    #[error("incomplete data{}", needed_suffix(.needed))]
    Incomplete { needed: Option<NonZeroUsize> },

    #[error("invalid format: expected {expected}, found {found}")]
    InvalidFormat { expected: FourCC, found: FourCC },

    #[error("missing '{0}' chunk")]
    MissingChunk(FourCC),

    /// Only 8, 16, 32 and 64 bit samples map to a lane type
    #[error("unsupported sample width of {0} bits")]
    UnsupportedSampleWidth(u16),

    /// Sample frames are only available for PCM data
    #[error("format tag {0:#06x} does not describe pcm samples")]
    UnsupportedFormat(u16),

    #[error("input of {len} bytes exceeds the limit of {limit} bytes")]
    TooLarge { len: usize, limit: usize },
}

fn needed_suffix(needed: &Option<NonZeroUsize>) -> String {
    needed
        .map(|n| format!(", {n} more bytes needed"))
        .unwrap_or_default()
}

impl Error {
    /// Did decoding fail because the input was cut short?
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Error::Incomplete { .. })
    }
}

impl<'a> From<nom::Err<crate::parser::Error<'a>>> for Error {
    fn from(err: nom::Err<crate::parser::Error<'a>>) -> Self {
        match err {
            nom::Err::Incomplete(nom::Needed::Size(size)) => Error::Incomplete { needed: Some(size) },
            nom::Err::Incomplete(nom::Needed::Unknown) => Error::Incomplete { needed: None },
            // Streaming primitives only ever fail by running out of input
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                tracing::trace!(kind = ?e.kind, remaining = e.input.len(), "parser error");
                Error::Incomplete { needed: None }
            }
        }
    }
}
