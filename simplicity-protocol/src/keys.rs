//! The weather sync schema.
//!
//! The companion pushes exactly two string-valued keys. Anything else found
//! in an inbound dictionary is a future schema addition and must be ignored,
//! not rejected.

/// Keys the companion device is known to send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WeatherKey {
    /// Current temperature, pre-formatted with its unit glyph
    Temperature = 0x0,
    /// Current city/location name
    City = 0x1,
}

impl WeatherKey {
    /// Map a wire key to the schema, `None` for keys we do not know
    pub fn from_key(key: u32) -> Option<Self> {
        match key {
            0x0 => Some(WeatherKey::Temperature),
            0x1 => Some(WeatherKey::City),
            _ => None,
        }
    }

    /// Wire value of this key
    pub fn key(self) -> u32 {
        self as u32
    }
}

/// Key of the one-shot "begin sending weather updates" request
pub const FETCH_REQUEST_KEY: u32 = 1;

/// Value sent with [`FETCH_REQUEST_KEY`] - a handshake marker, not data
pub const FETCH_REQUEST_VALUE: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_map() {
        assert_eq!(WeatherKey::from_key(0x0), Some(WeatherKey::Temperature));
        assert_eq!(WeatherKey::from_key(0x1), Some(WeatherKey::City));
    }

    #[test]
    fn test_unknown_keys_are_none() {
        assert_eq!(WeatherKey::from_key(0x2), None);
        assert_eq!(WeatherKey::from_key(u32::MAX), None);
    }
}
