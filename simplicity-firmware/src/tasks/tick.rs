//! Minute tick task
//!
//! Advances the wall clock and wakes the clock renderer once per minute.
//! The first tick fires immediately so the face is not blank until the
//! first minute boundary.

use defmt::*;
use embassy_time::{Duration, Ticker};

use simplicity_core::clock::{ClockStyle, WallTime};

use crate::channels::TICK_SIGNAL;

/// Tick task - signals (time, clock style) once per minute
#[embassy_executor::task]
pub async fn tick_task(mut now: WallTime, style: ClockStyle) {
    info!("Tick task started");

    TICK_SIGNAL.signal((now, style));

    let mut ticker = Ticker::every(Duration::from_secs(60));
    loop {
        ticker.next().await;
        now = now.next_minute();
        TICK_SIGNAL.signal((now, style));
    }
}
