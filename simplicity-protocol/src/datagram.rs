//! Datagram framing for byte-stream transports.
//!
//! Dictionaries are datagrams; UARTs are streams. This layer cuts whole
//! dictionary payloads out of the stream:
//!
//! - START (1 byte): 0x7E synchronization byte
//! - LENGTH (1 byte): payload length (1..=64)
//! - PAYLOAD (LENGTH bytes): an encoded dictionary
//! - CHECKSUM (1 byte): XOR of LENGTH and all PAYLOAD bytes
//!
//! The parser resynchronizes on the next START byte after any error, so a
//! corrupt datagram costs at most itself.

use heapless::Vec;

use crate::dict::WIRE_BUFFER_SIZE;

/// Datagram synchronization byte
pub const DATAGRAM_START: u8 = 0x7E;

/// Maximum complete datagram size (START + LENGTH + payload + CHECKSUM)
pub const MAX_DATAGRAM_SIZE: usize = 1 + 1 + WIRE_BUFFER_SIZE + 1;

/// Errors that can occur while framing or deframing datagrams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DatagramError {
    /// Payload is empty or exceeds [`WIRE_BUFFER_SIZE`]
    BadLength,
    /// Checksum mismatch
    BadChecksum,
    /// Destination buffer too small for encoding
    BufferTooSmall,
}

fn checksum(payload: &[u8]) -> u8 {
    let mut sum = payload.len() as u8;
    for &byte in payload {
        sum ^= byte;
    }
    sum
}

/// Frame a payload into `out`, returning the number of bytes written
pub fn encode_datagram(payload: &[u8], out: &mut [u8]) -> Result<usize, DatagramError> {
    if payload.is_empty() || payload.len() > WIRE_BUFFER_SIZE {
        return Err(DatagramError::BadLength);
    }
    let total = payload.len() + 3;
    if out.len() < total {
        return Err(DatagramError::BufferTooSmall);
    }

    out[0] = DATAGRAM_START;
    out[1] = payload.len() as u8;
    out[2..2 + payload.len()].copy_from_slice(payload);
    out[2 + payload.len()] = checksum(payload);
    Ok(total)
}

/// Incremental datagram deframer
///
/// Feed it bytes as they arrive; it hands back each complete, checksummed
/// payload once. Garbage between datagrams is skipped silently while hunting
/// for START.
#[derive(Debug, Clone)]
pub struct DatagramParser {
    state: ParseState,
    payload: Vec<u8, WIRE_BUFFER_SIZE>,
    expected: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Hunting,
    Length,
    Payload,
    Checksum,
}

impl DatagramParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::Hunting,
            payload: Vec::new(),
            expected: 0,
        }
    }

    /// Drop any partial datagram and hunt for the next START byte
    pub fn reset(&mut self) {
        self.state = ParseState::Hunting;
        self.payload.clear();
        self.expected = 0;
    }

    /// Feed one byte
    ///
    /// Returns `Ok(Some(payload))` when a complete valid datagram ends on
    /// this byte, `Ok(None)` when more bytes are needed, `Err` on a framing
    /// error (the parser has already resynchronized).
    pub fn feed(&mut self, byte: u8) -> Result<Option<Vec<u8, WIRE_BUFFER_SIZE>>, DatagramError> {
        match self.state {
            ParseState::Hunting => {
                if byte == DATAGRAM_START {
                    self.state = ParseState::Length;
                }
                Ok(None)
            }
            ParseState::Length => {
                if byte == 0 || byte as usize > WIRE_BUFFER_SIZE {
                    self.reset();
                    return Err(DatagramError::BadLength);
                }
                self.expected = byte;
                self.payload.clear();
                self.state = ParseState::Payload;
                Ok(None)
            }
            ParseState::Payload => {
                // Cannot overflow: expected <= WIRE_BUFFER_SIZE
                let _ = self.payload.push(byte);
                if self.payload.len() == self.expected as usize {
                    self.state = ParseState::Checksum;
                }
                Ok(None)
            }
            ParseState::Checksum => {
                if byte != checksum(&self.payload) {
                    self.reset();
                    return Err(DatagramError::BadChecksum);
                }
                let payload = self.payload.clone();
                self.reset();
                Ok(Some(payload))
            }
        }
    }
}

impl Default for DatagramParser {
    fn default() -> Self {
        Self::new()
    }
}
