use std::fmt;
use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::error::CodecError;

pub mod constants {
    pub const COMPRESSION_NONE: u8 = 0x00;
    pub const COMPRESSION_ZLIB: u8 = 0x01;
}

use self::constants::*;

/// Payloads strictly larger than this are compressed when packing.
pub const DEFAULT_COMPRESSION_THRESHOLD: usize = 256;

#[derive(Clone, Copy, Eq, PartialEq)]
pub enum Compression {
    Stored,
    Zlib,
    Unknown(u8),
}

impl Default for Compression {
    fn default() -> Self {
        Self::Stored
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Compression::*;

        let s = match self {
            Stored => "stored",
            Zlib => "zlib",
            Unknown(id) => return write!(f, "Unknown(id: {:x})", id),
        };

        write!(f, "{}", s)
    }
}

impl fmt::Debug for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Compression {
    pub const fn id(self) -> u8 {
        use Compression::*;

        match self {
            Stored => COMPRESSION_NONE,
            Zlib => COMPRESSION_ZLIB,
            Unknown(id) => id,
        }
    }

    pub const fn from_id(id: u8) -> Compression {
        match id {
            COMPRESSION_NONE => Compression::Stored,
            COMPRESSION_ZLIB => Compression::Zlib,
            id => Compression::Unknown(id),
        }
    }

    /// Picks the compression for a payload of `len` bytes.
    ///
    /// Tiny payloads are stored verbatim so the zlib framing does not dominate them.
    pub fn for_size(len: usize, threshold: usize) -> Compression {
        if len > threshold {
            Compression::Zlib
        } else {
            Compression::Stored
        }
    }

    pub fn compress(self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        use Compression::*;

        match self {
            Stored => Ok(input.to_vec()),
            Zlib => {
                let mut encoder = ZlibEncoder::new(
                    Vec::with_capacity(input.len() / 2),
                    flate2::Compression::default(),
                );
                encoder.write_all(input).map_err(CodecError::Compress)?;
                encoder.finish().map_err(CodecError::Compress)
            }
            Unknown(id) => Err(CodecError::Unsupported(id)),
        }
    }

    /// Decompresses `input`, which must expand to exactly `expected` bytes.
    pub fn decompress(self, input: &[u8], expected: usize) -> Result<Vec<u8>, CodecError> {
        use Compression::*;

        match self {
            Stored => {
                if input.len() != expected {
                    return Err(CodecError::SizeMismatch {
                        expected,
                        actual: input.len(),
                    });
                }
                Ok(input.to_vec())
            }
            Zlib => {
                let mut decoder = ZlibDecoder::new(input);
                // The recorded size is untrusted; `take` bounds the growth.
                let mut output = Vec::with_capacity(expected.min(input.len().saturating_mul(8)));
                decoder
                    .by_ref()
                    .take(expected as u64)
                    .read_to_end(&mut output)
                    .map_err(CodecError::Decompress)?;

                // Anything left in the stream is also a size mismatch.
                let rest = std::io::copy(&mut decoder, &mut std::io::sink())
                    .map_err(CodecError::Decompress)?;

                let actual = output.len() + rest as usize;
                if actual != expected {
                    return Err(CodecError::SizeMismatch { expected, actual });
                }
                Ok(output)
            }
            Unknown(id) => Err(CodecError::Unsupported(id)),
        }
    }
}
