//! Simplicity weather watchface firmware
//!
//! RP2040 firmware binary. Renders a minimalist clock face on a Sharp
//! memory LCD and keeps a temperature/city readout in sync with a
//! companion device over UART.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use simplicity_core::{ClockStyle, Month, WallTime, Watchface};

use crate::channels::{ChannelLink, INBOUND, TICK_SIGNAL};
use crate::display::ls013b7dh03::Ls013b7dh03;
use crate::display::PanelSurface;

mod channels;
mod display;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Clock presentation. There is no user settings surface yet, so the
/// style is fixed at build time.
const CLOCK_STYLE: ClockStyle = ClockStyle::TwelveHour;

/// Wall time at power-on. There is no RTC on the board; the companion
/// is expected to resync the clock out of band.
const BOOT_TIME: WallTime = WallTime::new(Month::January, 1, 0, 0);

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Simplicity firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // UART to the companion device
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for companion link");

    // SPI to the Sharp memory LCD (write-only, CS active high)
    let spi_config = {
        let mut cfg = spi::Config::default();
        cfg.frequency = 2_000_000;
        cfg
    };
    let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, spi_config);
    let cs = Output::new(p.PIN_17, Level::Low);

    let mut panel = Ls013b7dh03::new(spi, cs);
    if panel.clear().await.is_err() {
        warn!("Panel clear failed");
    }
    let mut surface = PanelSurface::new(panel);

    info!("Display initialized");

    // Spawn tasks
    spawner.spawn(tasks::tick::tick_task(BOOT_TIME, CLOCK_STYLE)).unwrap();
    spawner.spawn(tasks::companion_rx::companion_rx_task(rx)).unwrap();
    spawner.spawn(tasks::companion_tx::companion_tx_task(tx)).unwrap();

    info!("All tasks spawned");

    let mut link = ChannelLink;
    let mut face = Watchface::new();
    match face.load(&mut surface, &mut link) {
        Ok(()) => info!("Watchface loaded"),
        Err(e) => error!("Watchface load failed: {}", e),
    }
    if surface.panel_mut().flush().await.is_err() {
        warn!("Panel flush failed");
    }

    // Event loop: minute ticks and inbound weather payloads
    loop {
        match select(TICK_SIGNAL.wait(), INBOUND.receive()).await {
            Either::First((now, style)) => {
                if let Err(e) = face.on_minute_tick(&now, style, &mut surface) {
                    warn!("Tick render failed: {}", e);
                }
            }
            Either::Second(payload) => {
                if let Err(e) = face.on_message(&payload, &mut surface) {
                    warn!("Weather update rejected: {}", e);
                }
            }
        }

        if surface.panel_mut().flush().await.is_err() {
            warn!("Panel flush failed");
        }
    }
}
