//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::Vec;

use simplicity_core::clock::{ClockStyle, WallTime};
use simplicity_core::traits::link::{CompanionLink, LinkError};
use simplicity_protocol::dict::WIRE_BUFFER_SIZE;

/// Channel capacity for inbound weather payloads
const INBOUND_CHANNEL_SIZE: usize = 4;

/// Channel capacity for outbound payloads (the fetch request, in practice)
const OUTBOUND_CHANNEL_SIZE: usize = 2;

/// One deframed dictionary payload
pub type Payload = Vec<u8, WIRE_BUFFER_SIZE>;

/// Minute boundary ticks for the clock renderer
///
/// A Signal, not a Channel: if the event loop ever lags a whole minute, only
/// the latest time is worth rendering.
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, (WallTime, ClockStyle)> = Signal::new();

/// Deframed inbound dictionaries from the companion device
pub static INBOUND: Channel<CriticalSectionRawMutex, Payload, INBOUND_CHANNEL_SIZE> =
    Channel::new();

/// Outbound dictionaries awaiting framing and UART transmission
pub static OUTBOUND: Channel<CriticalSectionRawMutex, Payload, OUTBOUND_CHANNEL_SIZE> =
    Channel::new();

/// Companion link backed by the [`OUTBOUND`] channel
///
/// Sends never block the event loop; a full queue is reported as `Busy` and
/// the datagram is dropped, which the fire-and-forget contract allows.
pub struct ChannelLink;

impl CompanionLink for ChannelLink {
    fn send(&mut self, payload: &[u8]) -> Result<(), LinkError> {
        let datagram = Payload::from_slice(payload).map_err(|_| LinkError::PayloadTooLarge)?;
        OUTBOUND.try_send(datagram).map_err(|_| LinkError::Busy)
    }
}
