//! Companion transport seam.
//!
//! Outbound only: inbound payloads arrive through the host event loop, which
//! hands them to [`crate::Watchface::on_message`] already deframed.

/// Errors the transport can report on send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Outbound queue is full
    Busy,
    /// Payload cannot be framed
    PayloadTooLarge,
    /// Channel to the companion is not open
    Closed,
}

/// Trait for the companion transport
///
/// Sends are fire-and-forget: there is no acknowledgment tracking and no
/// retry. If the companion never answers, the face keeps its last-known
/// values indefinitely.
pub trait CompanionLink {
    /// Queue one datagram payload for the companion
    fn send(&mut self, payload: &[u8]) -> Result<(), LinkError>;
}
