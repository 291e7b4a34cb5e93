//! Weather sync engine.
//!
//! Keeps the authoritative last-known copy of the companion's two
//! string-valued keys in the *mirror buffer*: a bounded byte buffer that at
//! all times holds a complete, valid dictionary encoding of both fields.
//! Every mutation builds a full candidate encoding first and commits it
//! wholesale, so a later tick can never observe a half-written mirror.
//!
//! Sync failures degrade silently: a malformed payload or an oversized delta
//! is reported to the caller and the mirror - and therefore the display -
//! keeps its previous values. The engine never blanks a field.

use heapless::Vec;

use simplicity_protocol::dict::{DictError, DictReader, DictWriter, TupleValue, WIRE_BUFFER_SIZE};
use simplicity_protocol::keys::{WeatherKey, FETCH_REQUEST_KEY, FETCH_REQUEST_VALUE};

/// Errors the sync engine can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError {
    /// Initial field values do not fit the wire buffer; fatal at load
    Configuration,
    /// A delta would push the mirror past [`WIRE_BUFFER_SIZE`]; mirror kept
    Capacity,
    /// Inbound payload is malformed; mirror kept
    Decode(DictError),
}

impl From<DictError> for SyncError {
    fn from(e: DictError) -> Self {
        SyncError::Decode(e)
    }
}

/// Which field an inbound delta touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Applied {
    Temperature,
    City,
    /// Key outside the schema, or a non-string value; deliberately a no-op
    Ignored,
}

/// Fields changed by one inbound payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Changed {
    pub temperature: bool,
    pub city: bool,
}

/// The mirror of the companion's weather state
#[derive(Debug, Clone)]
pub struct WeatherSync {
    mirror: Vec<u8, WIRE_BUFFER_SIZE>,
}

impl WeatherSync {
    /// Seed the mirror with placeholder values for both fields
    ///
    /// Fails with [`SyncError::Configuration`] if the two values' combined
    /// encoding exceeds the wire buffer; nothing is constructed in that
    /// case. The two short placeholder literals always fit - the bound
    /// protects against future schema growth.
    pub fn new(temperature: &str, city: &str) -> Result<Self, SyncError> {
        let mirror = Self::encode(temperature, city).map_err(|_| SyncError::Configuration)?;
        Ok(Self { mirror })
    }

    /// The one-shot handshake payload asking the companion to start sending
    pub fn fetch_request() -> Result<Vec<u8, WIRE_BUFFER_SIZE>, DictError> {
        let mut writer = DictWriter::new();
        writer.uint(FETCH_REQUEST_KEY, FETCH_REQUEST_VALUE)?;
        Ok(writer.finish())
    }

    /// Apply one decoded delta
    ///
    /// Unknown keys are a forward-compatible no-op. An accepted delta
    /// replaces the whole mirror encoding; a rejected one leaves it
    /// untouched.
    pub fn apply_delta(&mut self, key: u32, value: &str) -> Result<Applied, SyncError> {
        let Some(field) = WeatherKey::from_key(key) else {
            return Ok(Applied::Ignored);
        };

        let (mirror, applied) = match field {
            WeatherKey::Temperature => (
                Self::encode(value, self.city()),
                Applied::Temperature,
            ),
            WeatherKey::City => (
                Self::encode(self.temperature(), value),
                Applied::City,
            ),
        };
        self.mirror = mirror.map_err(|_| SyncError::Capacity)?;
        Ok(applied)
    }

    /// Decode an inbound dictionary and apply every recognized delta
    ///
    /// The whole payload is validated before anything is applied, so a
    /// malformed trailing tuple cannot leave a partially applied update.
    pub fn apply_payload(&mut self, payload: &[u8]) -> Result<Changed, SyncError> {
        DictReader::validate(payload)?;

        let mut changed = Changed::default();
        for tuple in DictReader::new(payload)? {
            let tuple = tuple?;
            // The schema's fields are strings; integer tuples (for instance
            // our own handshake echoed back) are ignored like unknown keys.
            if let TupleValue::CStr(value) = tuple.value {
                match self.apply_delta(tuple.key, value)? {
                    Applied::Temperature => changed.temperature = true,
                    Applied::City => changed.city = true,
                    Applied::Ignored => {}
                }
            }
        }
        Ok(changed)
    }

    /// Last-known temperature text
    pub fn temperature(&self) -> &str {
        self.lookup(WeatherKey::Temperature).unwrap_or("")
    }

    /// Last-known city text
    pub fn city(&self) -> &str {
        self.lookup(WeatherKey::City).unwrap_or("")
    }

    /// Raw mirror encoding (both fields, always complete)
    pub fn mirror(&self) -> &[u8] {
        &self.mirror
    }

    fn encode(temperature: &str, city: &str) -> Result<Vec<u8, WIRE_BUFFER_SIZE>, DictError> {
        let mut writer = DictWriter::new();
        writer.cstring(WeatherKey::Temperature.key(), temperature)?;
        writer.cstring(WeatherKey::City.key(), city)?;
        Ok(writer.finish())
    }

    // The constructor establishes that the mirror always decodes and holds
    // both fields; lookup only returns None for a field it never sees.
    fn lookup(&self, field: WeatherKey) -> Option<&str> {
        let reader = DictReader::new(&self.mirror).ok()?;
        for tuple in reader.flatten() {
            if tuple.key == field.key() {
                if let TupleValue::CStr(value) = tuple.value {
                    return Some(value);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPERATURE_KEY: u32 = 0x0;
    const CITY_KEY: u32 = 0x1;

    fn placeholder_sync() -> WeatherSync {
        WeatherSync::new("-\u{00B0}F", "St Pebblesburg").unwrap()
    }

    #[test]
    fn test_placeholders_readable_before_any_delta() {
        let sync = placeholder_sync();
        assert_eq!(sync.temperature(), "-\u{00B0}F");
        assert_eq!(sync.city(), "St Pebblesburg");
    }

    #[test]
    fn test_delta_updates_only_its_field() {
        let mut sync = placeholder_sync();
        let applied = sync.apply_delta(TEMPERATURE_KEY, "72\u{00B0}F").unwrap();
        assert_eq!(applied, Applied::Temperature);
        assert_eq!(sync.temperature(), "72\u{00B0}F");
        assert_eq!(sync.city(), "St Pebblesburg");
    }

    #[test]
    fn test_unknown_key_is_a_noop() {
        let mut sync = placeholder_sync();
        let before = Vec::<u8, WIRE_BUFFER_SIZE>::from_slice(sync.mirror()).unwrap();

        let applied = sync.apply_delta(0x7, "x").unwrap();
        assert_eq!(applied, Applied::Ignored);
        assert_eq!(sync.mirror(), &before[..]);
    }

    #[test]
    fn test_repeated_delta_is_idempotent() {
        let mut sync = placeholder_sync();
        sync.apply_delta(CITY_KEY, "Reykjavik").unwrap();
        let once = Vec::<u8, WIRE_BUFFER_SIZE>::from_slice(sync.mirror()).unwrap();

        sync.apply_delta(CITY_KEY, "Reykjavik").unwrap();
        assert_eq!(sync.mirror(), &once[..]);
        assert_eq!(sync.city(), "Reykjavik");
    }

    #[test]
    fn test_oversized_initial_values_fail_configuration() {
        let long = "a city name that is far too long to encode next to anything else";
        assert_eq!(
            WeatherSync::new("-\u{00B0}F", long).unwrap_err(),
            SyncError::Configuration
        );
    }

    #[test]
    fn test_oversized_delta_keeps_previous_value() {
        let mut sync = placeholder_sync();
        let long = "a replacement value that cannot share the mirror with the city field";
        assert_eq!(
            sync.apply_delta(TEMPERATURE_KEY, long).unwrap_err(),
            SyncError::Capacity
        );
        assert_eq!(sync.temperature(), "-\u{00B0}F");
        assert_eq!(sync.city(), "St Pebblesburg");
    }

    #[test]
    fn test_payload_applies_both_fields() {
        let mut sync = placeholder_sync();

        let mut writer = DictWriter::new();
        writer.cstring(TEMPERATURE_KEY, "18\u{00B0}C").unwrap();
        writer.cstring(CITY_KEY, "Oslo").unwrap();
        let payload = writer.finish();

        let changed = sync.apply_payload(&payload).unwrap();
        assert!(changed.temperature && changed.city);
        assert_eq!(sync.temperature(), "18\u{00B0}C");
        assert_eq!(sync.city(), "Oslo");
    }

    #[test]
    fn test_malformed_payload_leaves_mirror_untouched() {
        let mut sync = placeholder_sync();
        let before = Vec::<u8, WIRE_BUFFER_SIZE>::from_slice(sync.mirror()).unwrap();

        let mut writer = DictWriter::new();
        writer.cstring(TEMPERATURE_KEY, "30\u{00B0}C").unwrap();
        let good = writer.finish();
        let truncated = &good[..good.len() - 2];

        assert!(matches!(
            sync.apply_payload(truncated),
            Err(SyncError::Decode(_))
        ));
        assert_eq!(sync.mirror(), &before[..]);
        assert_eq!(sync.temperature(), "-\u{00B0}F");
    }

    #[test]
    fn test_handshake_echo_is_ignored() {
        let mut sync = placeholder_sync();
        let payload = WeatherSync::fetch_request().unwrap();

        let changed = sync.apply_payload(&payload).unwrap();
        assert_eq!(changed, Changed::default());
        assert_eq!(sync.city(), "St Pebblesburg");
    }

    #[test]
    fn test_fetch_request_is_a_single_uint_tuple() {
        let payload = WeatherSync::fetch_request().unwrap();
        assert_eq!(payload[0], 1); // one tuple
        assert_eq!(&payload[1..5], &1u32.to_le_bytes()); // key 1
    }
}
