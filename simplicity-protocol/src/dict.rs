//! Bounded key/value dictionary encoding.
//!
//! Dictionary format:
//! - COUNT (1 byte): number of tuples
//! - per tuple:
//!   - KEY (4 bytes, little endian)
//!   - TYPE (1 byte): 0x01 C string, 0x02 unsigned integer
//!   - LENGTH (2 bytes, little endian): value size in bytes
//!   - VALUE (LENGTH bytes)
//!
//! C string values carry their NUL terminator on the wire; the terminator is
//! counted in LENGTH and stripped on decode. Unsigned integers may be 1, 2 or
//! 4 bytes wide and always decode to `u32`.

use heapless::Vec;

/// Shared encode/decode ceiling for every dictionary, in bytes.
///
/// The watch-side mirror buffer, the inbound update payloads and the outbound
/// fetch request all share this bound.
pub const WIRE_BUFFER_SIZE: usize = 64;

/// Bytes per tuple before the value: key + type + length.
pub const TUPLE_HEADER_SIZE: usize = 7;

const TYPE_CSTRING: u8 = 0x01;
const TYPE_UINT: u8 = 0x02;

/// Errors that can occur while encoding or decoding a dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DictError {
    /// Encoded dictionary would exceed [`WIRE_BUFFER_SIZE`]
    BufferFull,
    /// Payload ends in the middle of a tuple
    Truncated,
    /// Tuple carries an unrecognized type tag
    BadValueType,
    /// C string value is missing its NUL terminator or is not valid UTF-8
    BadString,
    /// Integer value has an unsupported width
    BadIntWidth,
    /// Bytes remain after the last declared tuple
    TrailingBytes,
}

/// A decoded tuple value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupleValue<'a> {
    /// Short human-readable string (NUL terminator already stripped)
    CStr(&'a str),
    /// Unsigned integer, widened to 32 bits
    Uint(u32),
}

/// A single key/value entry of a dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuple<'a> {
    pub key: u32,
    pub value: TupleValue<'a>,
}

/// Capacity-checked dictionary builder
///
/// Appends are all-or-nothing: an entry that would not fit leaves the buffer
/// exactly as it was before the call.
#[derive(Debug, Clone)]
pub struct DictWriter {
    buf: Vec<u8, WIRE_BUFFER_SIZE>,
}

impl DictWriter {
    /// Create a writer holding an empty dictionary
    pub fn new() -> Self {
        let mut buf = Vec::new();
        // COUNT placeholder; WIRE_BUFFER_SIZE >= 1
        let _ = buf.push(0);
        Self { buf }
    }

    /// Append a C string tuple
    pub fn cstring(&mut self, key: u32, value: &str) -> Result<(), DictError> {
        if value.as_bytes().contains(&0) {
            return Err(DictError::BadString);
        }
        // +1 for the wire NUL terminator
        self.reserve(value.len() + 1)?;
        self.header(key, TYPE_CSTRING, value.len() as u16 + 1);
        let _ = self.buf.extend_from_slice(value.as_bytes());
        let _ = self.buf.push(0);
        Ok(())
    }

    /// Append an unsigned integer tuple (encoded 4 bytes wide)
    pub fn uint(&mut self, key: u32, value: u32) -> Result<(), DictError> {
        self.reserve(4)?;
        self.header(key, TYPE_UINT, 4);
        let _ = self.buf.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Encoded size of the dictionary so far, in bytes
    pub fn encoded_len(&self) -> usize {
        self.buf.len()
    }

    /// Finish the dictionary and return the encoded bytes
    pub fn finish(self) -> Vec<u8, WIRE_BUFFER_SIZE> {
        self.buf
    }

    fn reserve(&mut self, value_len: usize) -> Result<(), DictError> {
        if self.buf.len() + TUPLE_HEADER_SIZE + value_len > WIRE_BUFFER_SIZE {
            return Err(DictError::BufferFull);
        }
        Ok(())
    }

    // Infallible after reserve()
    fn header(&mut self, key: u32, ty: u8, len: u16) {
        let _ = self.buf.extend_from_slice(&key.to_le_bytes());
        let _ = self.buf.push(ty);
        let _ = self.buf.extend_from_slice(&len.to_le_bytes());
        self.buf[0] += 1;
    }
}

impl Default for DictWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Validating iterator over an encoded dictionary
///
/// Yields `Err` once on the first malformed tuple and then stops. Use
/// [`DictReader::validate`] to vet a whole payload before acting on any of
/// its entries.
#[derive(Debug, Clone)]
pub struct DictReader<'a> {
    rest: &'a [u8],
    remaining: u8,
}

impl<'a> DictReader<'a> {
    /// Start reading the given encoded dictionary
    pub fn new(payload: &'a [u8]) -> Result<Self, DictError> {
        let (&count, rest) = payload.split_first().ok_or(DictError::Truncated)?;
        Ok(Self {
            rest,
            remaining: count,
        })
    }

    /// Walk every tuple, returning the first decode error if any
    pub fn validate(payload: &'a [u8]) -> Result<(), DictError> {
        for tuple in Self::new(payload)? {
            tuple?;
        }
        Ok(())
    }

    fn next_tuple(&mut self) -> Result<Tuple<'a>, DictError> {
        if self.rest.len() < TUPLE_HEADER_SIZE {
            return Err(DictError::Truncated);
        }
        let (header, rest) = self.rest.split_at(TUPLE_HEADER_SIZE);
        let key = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let ty = header[4];
        let len = u16::from_le_bytes([header[5], header[6]]) as usize;

        if rest.len() < len {
            return Err(DictError::Truncated);
        }
        let (data, rest) = rest.split_at(len);
        self.rest = rest;

        let value = match ty {
            TYPE_CSTRING => {
                let (&last, chars) = data.split_last().ok_or(DictError::BadString)?;
                if last != 0 {
                    return Err(DictError::BadString);
                }
                let s = core::str::from_utf8(chars).map_err(|_| DictError::BadString)?;
                TupleValue::CStr(s)
            }
            TYPE_UINT => {
                let mut bytes = [0u8; 4];
                match len {
                    1 | 2 | 4 => bytes[..len].copy_from_slice(data),
                    _ => return Err(DictError::BadIntWidth),
                }
                TupleValue::Uint(u32::from_le_bytes(bytes))
            }
            _ => return Err(DictError::BadValueType),
        };

        Ok(Tuple { key, value })
    }
}

impl<'a> Iterator for DictReader<'a> {
    type Item = Result<Tuple<'a>, DictError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            if !self.rest.is_empty() {
                self.rest = &[];
                return Some(Err(DictError::TrailingBytes));
            }
            return None;
        }
        self.remaining -= 1;

        match self.next_tuple() {
            Ok(tuple) => Some(Ok(tuple)),
            Err(e) => {
                // Poison the reader; the payload is not trustworthy past here
                self.remaining = 0;
                self.rest = &[];
                Some(Err(e))
            }
        }
    }
}
