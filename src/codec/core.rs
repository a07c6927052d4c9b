//! Parameter block encoding and decoding.

use thiserror::Error;

use crate::derivation::argon2::{EngineConfig, TAG_LENGTH, VERSION};

/// Length of the fixed header: six little-endian `u32` words.
pub const HEADER_LEN: usize = 6 * 4;

/// Length of one field's length prefix.
const PREFIX_LEN: usize = 4;

/// The six configuration words at the start of every parameter block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub parallelism: u32,
    pub tag_length: u32,
    pub memory_kib: u32,
    pub iterations: u32,
    pub version: u32,
    pub variant: u32,
}

impl Header {
    /// Header describing a hash under `config`.
    pub fn for_config(config: &EngineConfig) -> Self {
        Self {
            parallelism: config.parallelism,
            tag_length: TAG_LENGTH,
            memory_kib: config.memory_kib,
            iterations: config.iterations,
            version: VERSION,
            variant: config.variant.as_word(),
        }
    }

    fn named_words(&self) -> [(&'static str, u32); 6] {
        [
            ("parallelism", self.parallelism),
            ("tag_length", self.tag_length),
            ("memory_kib", self.memory_kib),
            ("iterations", self.iterations),
            ("version", self.version),
            ("variant", self.variant),
        ]
    }

    /// First word that differs from `expected`, as `(name, expected, actual)`.
    pub fn mismatch(&self, expected: &Header) -> Option<(&'static str, u32, u32)> {
        self.named_words()
            .into_iter()
            .zip(expected.named_words())
            .find(|((_, actual), (_, wanted))| actual != wanted)
            .map(|((name, actual), (_, wanted))| (name, wanted, actual))
    }
}

/// Variable-length inputs of a parameter block, in wire order.
///
/// An absent key or associated data is encoded exactly like an empty one.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fields<'a> {
    pub password: &'a [u8],
    pub salt: &'a [u8],
    pub key: Option<&'a [u8]>,
    pub ad: Option<&'a [u8]>,
}

impl Fields<'_> {
    fn in_order(&self) -> [&[u8]; 4] {
        [
            self.password,
            self.salt,
            self.key.unwrap_or_default(),
            self.ad.unwrap_or_default(),
        ]
    }

    /// Number of bytes [`encode`] writes for these fields.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN
            + self
                .in_order()
                .iter()
                .map(|f| PREFIX_LEN + f.len())
                .sum::<usize>()
    }
}

/// A parameter block read back from memory.
///
/// Key and associated data are returned as (possibly empty) slices: the
/// encoding does not distinguish absent from empty.
#[derive(Debug, PartialEq, Eq)]
pub struct DecodedBlock<'a> {
    pub header: Header,
    pub password: &'a [u8],
    pub salt: &'a [u8],
    pub key: &'a [u8],
    pub ad: &'a [u8],
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The encoded block does not fit into the target region.
    #[error("parameter block needs {needed} bytes but the region holds {available}")]
    Overflow { needed: usize, available: usize },

    /// The encoded block length cannot be expressed as a `u32`.
    #[error("parameter block of {0} bytes exceeds the u32 length range")]
    TooLong(usize),

    #[error("parameter block truncated at offset {offset}")]
    Truncated { offset: usize },

    #[error("parameter block has {extra} trailing bytes")]
    TrailingBytes { extra: usize },
}

/// Encodes `header` and `fields` at the start of `region`.
///
/// `region` begins at the engine base offset `B`, so the returned value is
/// both the number of bytes written and the length argument the engine
/// expects. Nothing is written if the block would not fit.
pub fn encode(region: &mut [u8], header: &Header, fields: &Fields<'_>) -> Result<u32, CodecError> {
    let needed = fields.encoded_len();
    let total = u32::try_from(needed).map_err(|_| CodecError::TooLong(needed))?;

    if needed > region.len() {
        return Err(CodecError::Overflow {
            needed,
            available: region.len(),
        });
    }

    let mut pos = 0;
    let mut put = |bytes: &[u8]| {
        region[pos..pos + bytes.len()].copy_from_slice(bytes);
        pos += bytes.len();
    };

    for (_, word) in header.named_words() {
        put(&word.to_le_bytes());
    }

    for field in fields.in_order() {
        // Field lengths are bounded by `total`, which fits in a u32.
        put(&(field.len() as u32).to_le_bytes());
        put(field);
    }

    Ok(total)
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.buf.len())
            .ok_or(CodecError::Truncated { offset: self.pos })?;

        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn word(&mut self) -> Result<u32, CodecError> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(raw))
    }

    fn field(&mut self) -> Result<&'a [u8], CodecError> {
        let len = self.word()? as usize;
        self.take(len)
    }
}

/// Decodes a parameter block of exactly `block.len()` bytes.
pub fn decode(block: &[u8]) -> Result<DecodedBlock<'_>, CodecError> {
    let mut reader = Reader { buf: block, pos: 0 };

    let header = Header {
        parallelism: reader.word()?,
        tag_length: reader.word()?,
        memory_kib: reader.word()?,
        iterations: reader.word()?,
        version: reader.word()?,
        variant: reader.word()?,
    };

    let decoded = DecodedBlock {
        header,
        password: reader.field()?,
        salt: reader.field()?,
        key: reader.field()?,
        ad: reader.field()?,
    };

    if reader.pos != block.len() {
        return Err(CodecError::TrailingBytes {
            extra: block.len() - reader.pos,
        });
    }

    Ok(decoded)
}
