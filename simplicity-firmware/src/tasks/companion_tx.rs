//! Companion UART transmit task
//!
//! Frames queued payloads and writes them to the companion link. Sends are
//! fire-and-forget; a write failure is logged and the payload dropped.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use simplicity_protocol::{encode_datagram, MAX_DATAGRAM_SIZE};

use crate::channels::OUTBOUND;

/// Companion TX task - frames and sends outbound datagrams
#[embassy_executor::task]
pub async fn companion_tx_task(mut tx: BufferedUartTx) {
    info!("Companion TX task started");

    loop {
        let payload = OUTBOUND.receive().await;

        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        match encode_datagram(&payload, &mut buf) {
            Ok(len) => {
                if let Err(e) = tx.write_all(&buf[..len]).await {
                    warn!("Companion UART write error: {:?}", e);
                }
            }
            Err(e) => {
                // Payloads come from the bounded channel type, so this
                // only fires on an empty payload
                warn!("Unframeable outbound payload: {:?}", e);
            }
        }
    }
}
