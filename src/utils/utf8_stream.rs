//! Progressive UTF-8 decoding for response bodies that arrive in arbitrary
//! byte chunks.
//!
//! A multi-byte character may be split across two chunks; the decoder holds
//! the incomplete suffix back until the rest arrives.

use std::error::Error as StdError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Utf8StreamError {
    /// A byte sequence that can never be valid UTF-8.
    Invalid {
        /// Offset of the offending byte counted from the start of the stream.
        offset: usize,
    },
    /// The stream ended in the middle of a multi-byte character.
    Truncated { pending: usize },
}

impl fmt::Display for Utf8StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Utf8StreamError::Invalid { offset } => {
                write!(f, "invalid UTF-8 in response body at byte {offset}")
            }
            Utf8StreamError::Truncated { pending } => write!(
                f,
                "response body ended inside a multi-byte character ({pending} byte(s) pending)"
            ),
        }
    }
}

impl StdError for Utf8StreamError {}

#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
    consumed: usize,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes as much of `pending ++ chunk` as forms complete characters.
    /// The returned string may be empty when the chunk only extends a
    /// partial character.
    pub fn decode(&mut self, chunk: &[u8]) -> Result<String, Utf8StreamError> {
        self.pending.extend_from_slice(chunk);

        let valid_up_to = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(err) => match err.error_len() {
                Some(_) => {
                    return Err(Utf8StreamError::Invalid {
                        offset: self.consumed + err.valid_up_to(),
                    })
                }
                None => err.valid_up_to(),
            },
        };

        let rest = self.pending.split_off(valid_up_to);
        let complete = std::mem::replace(&mut self.pending, rest);
        self.consumed += complete.len();
        // The prefix was validated above.
        String::from_utf8(complete).map_err(|err| Utf8StreamError::Invalid {
            offset: self.consumed + err.utf8_error().valid_up_to(),
        })
    }

    #[cfg(test)]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Confirms the stream ended on a character boundary.
    pub fn finish(self) -> Result<(), Utf8StreamError> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(Utf8StreamError::Truncated {
                pending: self.pending.len(),
            })
        }
    }
}
