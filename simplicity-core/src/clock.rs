//! Clock rendering.
//!
//! Formats the current date and time into two retained fixed-capacity
//! buffers, once per minute tick. The buffers are owned by [`ClockText`] and
//! overwritten in place; the display surface is handed a reference each time
//! the content is recomputed, never a copy it has to keep alive.

use core::fmt::Write;

use heapless::String;

/// Capacity of the time buffer ("HH:MM")
pub const TIME_TEXT_LEN: usize = 5;

/// Capacity of the date buffer ("September 30")
pub const DATE_TEXT_LEN: usize = 12;

/// Clock style setting, the face's only locale input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockStyle {
    TwelveHour,
    TwentyFourHour,
}

/// Month of the year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// Full English month name, as the face prints it
    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Days in this month
    ///
    /// The face displays no year, so February is always 28 days; being a day
    /// off once every four leap-year boundaries resolves itself at the next
    /// companion or RTC resync.
    pub fn days(self) -> u8 {
        match self {
            Month::January
            | Month::March
            | Month::May
            | Month::July
            | Month::August
            | Month::October
            | Month::December => 31,
            Month::April | Month::June | Month::September | Month::November => 30,
            Month::February => 28,
        }
    }

    /// The month after this one, wrapping December to January
    pub fn next(self) -> Month {
        match self {
            Month::January => Month::February,
            Month::February => Month::March,
            Month::March => Month::April,
            Month::April => Month::May,
            Month::May => Month::June,
            Month::June => Month::July,
            Month::July => Month::August,
            Month::August => Month::September,
            Month::September => Month::October,
            Month::October => Month::November,
            Month::November => Month::December,
            Month::December => Month::January,
        }
    }
}

/// A wall-clock instant at minute resolution
///
/// `day` is 1-based; `hour` is 0..24.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallTime {
    pub month: Month,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

impl WallTime {
    pub const fn new(month: Month, day: u8, hour: u8, minute: u8) -> Self {
        Self {
            month,
            day,
            hour,
            minute,
        }
    }

    /// The instant one minute later, rolling over hour, day and month
    pub fn next_minute(self) -> Self {
        let mut next = self;
        next.minute += 1;
        if next.minute < 60 {
            return next;
        }
        next.minute = 0;
        next.hour += 1;
        if next.hour < 24 {
            return next;
        }
        next.hour = 0;
        next.day += 1;
        if next.day <= self.month.days() {
            return next;
        }
        next.day = 1;
        next.month = self.month.next();
        next
    }
}

/// The two retained text buffers of the clock renderer
#[derive(Debug, Clone)]
pub struct ClockText {
    time: String<TIME_TEXT_LEN>,
    date: String<DATE_TEXT_LEN>,
}

impl ClockText {
    pub const fn new() -> Self {
        Self {
            time: String::new(),
            date: String::new(),
        }
    }

    /// Recompute both buffers for the given instant
    ///
    /// Runs at most once a minute, so the date is rewritten unconditionally
    /// rather than dirty-tracked.
    pub fn format(&mut self, now: &WallTime, style: ClockStyle) {
        self.date.clear();
        // Space-padded day: "January  5", "January 15"
        let _ = write!(self.date, "{} {:>2}", now.month.name(), now.day);

        self.time.clear();
        match style {
            ClockStyle::TwentyFourHour => {
                let _ = write!(self.time, "{:02}:{:02}", now.hour, now.minute);
            }
            ClockStyle::TwelveHour => {
                // Written unpadded, so 9:05 never renders as 09:05. There is
                // no strip step to get wrong: `{}` on a u8 cannot zero-pad.
                let hour = match now.hour {
                    0 => 12,
                    h @ 1..=12 => h,
                    h => h - 12,
                };
                let _ = write!(self.time, "{}:{:02}", hour, now.minute);
            }
        }
    }

    /// Current time text ("23:04", "9:05")
    pub fn time(&self) -> &str {
        &self.time
    }

    /// Current date text ("January  5")
    pub fn date(&self) -> &str {
        &self.date
    }
}

impl Default for ClockText {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn formatted(hour: u8, minute: u8, style: ClockStyle) -> String<TIME_TEXT_LEN> {
        let mut text = ClockText::new();
        text.format(&WallTime::new(Month::January, 5, hour, minute), style);
        String::try_from(text.time()).unwrap()
    }

    proptest! {
        #[test]
        fn twenty_four_hour_is_always_zero_padded(hour in 0u8..24, minute in 0u8..60) {
            let time = formatted(hour, minute, ClockStyle::TwentyFourHour);
            let bytes = time.as_bytes();
            prop_assert_eq!(bytes.len(), 5);
            prop_assert_eq!(bytes[2], b':');
            prop_assert!(bytes[0].is_ascii_digit() && bytes[0] <= b'2');
            prop_assert!(bytes[1].is_ascii_digit());
            prop_assert!(bytes[3].is_ascii_digit() && bytes[3] <= b'5');
            prop_assert!(bytes[4].is_ascii_digit());
        }

        #[test]
        fn twelve_hour_never_has_a_leading_zero(hour in 0u8..24, minute in 0u8..60) {
            let time = formatted(hour, minute, ClockStyle::TwelveHour);
            prop_assert_ne!(time.as_bytes()[0], b'0');
            // Hour field is 1..=12, so the text is "H:MM" or "HH:MM"
            prop_assert!(time.len() == 4 || time.len() == 5);
        }
    }

    #[test]
    fn test_twelve_hour_examples() {
        assert_eq!(formatted(9, 5, ClockStyle::TwelveHour).as_str(), "9:05");
        assert_eq!(formatted(12, 5, ClockStyle::TwelveHour).as_str(), "12:05");
        assert_eq!(formatted(10, 5, ClockStyle::TwelveHour).as_str(), "10:05");
        assert_eq!(formatted(21, 5, ClockStyle::TwelveHour).as_str(), "9:05");
        // Midnight is 12, not 0
        assert_eq!(formatted(0, 30, ClockStyle::TwelveHour).as_str(), "12:30");
    }

    #[test]
    fn test_twenty_four_hour_examples() {
        assert_eq!(formatted(9, 5, ClockStyle::TwentyFourHour).as_str(), "09:05");
        assert_eq!(formatted(0, 0, ClockStyle::TwentyFourHour).as_str(), "00:00");
        assert_eq!(formatted(23, 59, ClockStyle::TwentyFourHour).as_str(), "23:59");
    }

    #[test]
    fn test_date_day_is_space_padded() {
        let mut text = ClockText::new();
        text.format(
            &WallTime::new(Month::January, 5, 0, 0),
            ClockStyle::TwentyFourHour,
        );
        assert_eq!(text.date(), "January  5");

        text.format(
            &WallTime::new(Month::January, 15, 0, 0),
            ClockStyle::TwentyFourHour,
        );
        assert_eq!(text.date(), "January 15");
    }

    #[test]
    fn test_longest_date_fits() {
        let mut text = ClockText::new();
        text.format(
            &WallTime::new(Month::September, 30, 0, 0),
            ClockStyle::TwentyFourHour,
        );
        assert_eq!(text.date(), "September 30");
    }

    #[test]
    fn test_next_minute_rollovers() {
        let end_of_hour = WallTime::new(Month::January, 5, 9, 59);
        assert_eq!(
            end_of_hour.next_minute(),
            WallTime::new(Month::January, 5, 10, 0)
        );

        let end_of_day = WallTime::new(Month::January, 31, 23, 59);
        assert_eq!(
            end_of_day.next_minute(),
            WallTime::new(Month::February, 1, 0, 0)
        );

        let end_of_february = WallTime::new(Month::February, 28, 23, 59);
        assert_eq!(
            end_of_february.next_minute(),
            WallTime::new(Month::March, 1, 0, 0)
        );

        let end_of_year = WallTime::new(Month::December, 31, 23, 59);
        assert_eq!(
            end_of_year.next_minute(),
            WallTime::new(Month::January, 1, 0, 0)
        );
    }
}
