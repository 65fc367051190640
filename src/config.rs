/// Bounds applied to an input before it is decoded
///
/// Declared chunk sizes are trusted by the decoder, so services accepting files from
/// the outside should bound what they feed it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Limits {
    /// Largest accepted input in bytes, `None` for no limit
    pub max_input_len: Option<usize>,
}

impl Limits {
    pub fn bounded(max_input_len: usize) -> Self {
        Self {
            max_input_len: Some(max_input_len),
        }
    }

    pub fn with_max_input_len(mut self, max_input_len: Option<usize>) -> Self {
        self.max_input_len = max_input_len;
        self
    }

    pub(crate) fn check(&self, len: usize) -> crate::Result<()> {
        match self.max_input_len {
            Some(limit) if len > limit => Err(crate::Error::TooLarge { len, limit }),
            _ => Ok(()),
        }
    }
}
