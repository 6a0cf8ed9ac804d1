//! Binary layout of a fingerprint collection. All integers are little-endian.
//!
//! ```text
//! offset 0   : 3 bytes  magic "TUR"
//! offset 3   : 1 byte   format version
//! offset 4   : 1 byte   size class (1, 2 or 4)
//! offset 5   : 4 bytes  reserved, zero
//! offset 9   : 4 bytes  record count (u32)
//! offset 13  : records of (size class + 16) bytes:
//!                ordinal     (size class bytes)
//!                vertical    (u64)
//!                horizontal  (u64)
//! ```

use std::io::{Read, Write};

use super::FingerprintCollection;
use crate::consts::{FILE_MAGIC, HEADER_LEN};
use crate::error::{Error, Result};
use crate::hash::Fingerprint;

/// Byte width used to store each ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum SizeClass {
    U8 = 1,
    U16 = 2,
    U32 = 4,
}

impl SizeClass {
    pub fn for_max_ordinal(max_ordinal: u32) -> Self {
        if max_ordinal <= u8::MAX as u32 {
            SizeClass::U8
        } else if max_ordinal <= u16::MAX as u32 {
            SizeClass::U16
        } else {
            SizeClass::U32
        }
    }

    pub fn width(self) -> usize {
        self as usize
    }

    pub fn record_len(self) -> usize {
        self.width() + 16
    }

    fn put_ordinal(self, buf: &mut Vec<u8>, ordinal: u32) {
        match self {
            SizeClass::U8 => buf.push(ordinal as u8),
            SizeClass::U16 => buf.extend_from_slice(&(ordinal as u16).to_le_bytes()),
            SizeClass::U32 => buf.extend_from_slice(&ordinal.to_le_bytes()),
        }
    }

    fn get_ordinal(self, record: &[u8]) -> u32 {
        match self {
            SizeClass::U8 => record[0] as u32,
            SizeClass::U16 => u16::from_le_bytes([record[0], record[1]]) as u32,
            SizeClass::U32 => u32::from_le_bytes([record[0], record[1], record[2], record[3]]),
        }
    }
}

impl TryFrom<u8> for SizeClass {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(SizeClass::U8),
            2 => Ok(SizeClass::U16),
            4 => Ok(SizeClass::U32),
            other => Err(Error::InvalidSizeClass(other)),
        }
    }
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut arr = [0u8; 8];
    arr.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(arr)
}

impl FingerprintCollection {
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.size_class().record_len() * self.len()
    }

    pub fn encode(&self) -> Vec<u8> {
        let size_class = self.size_class();
        let mut buf = Vec::with_capacity(self.encoded_len());

        buf.extend_from_slice(FILE_MAGIC);
        buf.push(self.version());
        buf.push(size_class as u8);
        buf.extend_from_slice(&[0u8; 4]);
        buf.extend_from_slice(&(self.len() as u32).to_le_bytes());

        for fingerprint in self.fingerprints() {
            size_class.put_ordinal(&mut buf, fingerprint.ordinal);
            buf.extend_from_slice(&fingerprint.vertical.to_le_bytes());
            buf.extend_from_slice(&fingerprint.horizontal.to_le_bytes());
        }

        buf
    }

    /// Trailing bytes past the declared records are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < FILE_MAGIC.len() || &bytes[..FILE_MAGIC.len()] != FILE_MAGIC {
            return Err(Error::InvalidHeader);
        }
        if bytes.len() < HEADER_LEN {
            return Err(Error::TruncatedData {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }

        let version = bytes[3];
        let size_class = SizeClass::try_from(bytes[4])?;
        let count = u32::from_le_bytes([bytes[9], bytes[10], bytes[11], bytes[12]]) as usize;

        let record_len = size_class.record_len();
        let expected = count
            .checked_mul(record_len)
            .and_then(|n| n.checked_add(HEADER_LEN))
            .unwrap_or(usize::MAX);
        if bytes.len() < expected {
            return Err(Error::TruncatedData {
                expected,
                actual: bytes.len(),
            });
        }

        let width = size_class.width();
        let fingerprints = bytes[HEADER_LEN..expected]
            .chunks_exact(record_len)
            .map(|record| {
                Fingerprint::new(
                    read_u64(&record[width..]),
                    read_u64(&record[width + 8..]),
                    size_class.get_ordinal(record),
                )
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Decoded {} fingerprints (version {}, size class {:?})",
            fingerprints.len(),
            version,
            size_class
        );
        Ok(Self::from_parts(version, fingerprints))
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.encode())?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::decode(&bytes)
    }
}
