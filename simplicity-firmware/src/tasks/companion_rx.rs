//! Companion UART receive task
//!
//! Deframes datagrams out of the companion byte stream and queues their
//! payloads for the event loop. Framing errors are logged and dropped; the
//! face keeps showing its last good values (the parser has already
//! resynchronized by the time the error is reported).

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use simplicity_protocol::DatagramParser;

use crate::channels::INBOUND;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Companion RX task - receives and deframes datagrams
#[embassy_executor::task]
pub async fn companion_rx_task(mut rx: BufferedUartRx) {
    info!("Companion RX task started");

    let mut parser = DatagramParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(payload)) => {
                            if INBOUND.try_send(payload).is_err() {
                                warn!("Inbound queue full, dropping weather payload");
                            }
                        }
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => {
                            warn!("Companion datagram error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("Companion UART read error: {:?}", e);
            }
        }
    }
}
