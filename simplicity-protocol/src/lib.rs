//! Companion sync protocol for the Simplicity Weather watchface
//!
//! This crate defines the wire format spoken between the watch and its paired
//! companion device. The payload unit is a small key/value *dictionary*:
//!
//! ```text
//! ┌───────┬─────────────────────────────────────────────┐
//! │ COUNT │ TUPLES                                      │
//! │ 1B    │ count × (KEY u32 LE, TYPE u8, LEN u16 LE,   │
//! │       │          LEN value bytes)                   │
//! └───────┴─────────────────────────────────────────────┘
//! ```
//!
//! Every dictionary (inbound weather updates, the outbound fetch request,
//! the watch-side mirror of the last-known values) must fit in a single
//! [`WIRE_BUFFER_SIZE`]-byte buffer. That ceiling is the protocol's only
//! flow-control mechanism.
//!
//! For byte-stream transports (UART) the [`datagram`] module adds a thin
//! framing layer so complete dictionaries can be cut out of the stream.

#![no_std]
#![deny(unsafe_code)]

pub mod datagram;
pub mod dict;
pub mod keys;

pub use datagram::{encode_datagram, DatagramError, DatagramParser, DATAGRAM_START, MAX_DATAGRAM_SIZE};
pub use dict::{DictError, DictReader, DictWriter, Tuple, TupleValue, WIRE_BUFFER_SIZE};
pub use keys::{WeatherKey, FETCH_REQUEST_KEY, FETCH_REQUEST_VALUE};
