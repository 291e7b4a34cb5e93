//! Lifecycle controller.
//!
//! [`Watchface`] is the application state: the clock text buffers, the
//! weather sync engine and the display region handles, owned in one struct
//! and passed a display surface and companion link by the host event loop.
//! Nothing here is process-global, so tests can run any number of
//! independent faces.
//!
//! The face moves `Unloaded -> Loaded -> Retired`; retirement is terminal.
//! Tick and message handlers are only wired up while the face is loaded, so
//! out-of-phase events cannot happen by construction in the firmware; the
//! handlers still check the phase so misuse shows up in tests as a quiet
//! no-op instead of a panic.

use heapless::Vec;

use simplicity_protocol::dict::DictError;

use crate::clock::{ClockStyle, ClockText, WallTime};
use crate::layout::{Color, RegionLayout, CITY_REGION, DATE_REGION, SEPARATOR_REGION, TEMPERATURE_REGION, TIME_REGION};
use crate::sync::{SyncError, WeatherSync};
use crate::traits::link::{CompanionLink, LinkError};
use crate::traits::surface::{RegionHandle, RegionSurface, SurfaceError};

/// Temperature shown until the first real update arrives
pub const PLACEHOLDER_TEMPERATURE: &str = "-\u{00B0}F";

/// City shown until the first real update arrives
pub const PLACEHOLDER_CITY: &str = "St Pebblesburg";

/// Lifecycle phase of the face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Created, not yet shown
    Unloaded,
    /// On screen, handlers live
    Loaded,
    /// Torn down; terminal
    Retired,
}

/// Events that move the face between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhaseEvent {
    Load,
    Unload,
}

impl Phase {
    /// Process an event and return the next phase
    pub fn transition(self, event: PhaseEvent) -> Self {
        match (self, event) {
            (Phase::Unloaded, PhaseEvent::Load) => Phase::Loaded,
            (Phase::Loaded, PhaseEvent::Unload) => Phase::Retired,
            // Retired is terminal; everything else stays put
            _ => self,
        }
    }
}

/// Errors surfaced by the lifecycle handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaceError {
    /// Load attempted outside the `Unloaded` phase
    BadPhase,
    Sync(SyncError),
    Surface(SurfaceError),
    Link(LinkError),
}

impl From<SyncError> for FaceError {
    fn from(e: SyncError) -> Self {
        FaceError::Sync(e)
    }
}

impl From<SurfaceError> for FaceError {
    fn from(e: SurfaceError) -> Self {
        FaceError::Surface(e)
    }
}

impl From<LinkError> for FaceError {
    fn from(e: LinkError) -> Self {
        FaceError::Link(e)
    }
}

impl From<DictError> for FaceError {
    fn from(e: DictError) -> Self {
        FaceError::Sync(SyncError::Decode(e))
    }
}

/// Handles of the five face regions
#[derive(Debug, Clone, Copy)]
struct FaceRegions {
    date: RegionHandle,
    time: RegionHandle,
    separator: RegionHandle,
    temperature: RegionHandle,
    city: RegionHandle,
}

/// The whole application state of the watchface
#[derive(Debug)]
pub struct Watchface {
    phase: Phase,
    clock: ClockText,
    sync: Option<WeatherSync>,
    regions: Option<FaceRegions>,
    sync_errors: u32,
}

impl Watchface {
    pub const fn new() -> Self {
        Self {
            phase: Phase::Unloaded,
            clock: ClockText::new(),
            sync: None,
            regions: None,
            sync_errors: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Sync failures seen so far (each one logged and ignored by the host)
    pub fn sync_errors(&self) -> u32 {
        self.sync_errors
    }

    /// Bring the face on screen
    ///
    /// Initializes the sync engine with the placeholder values, creates and
    /// styles all five regions, shows the placeholders, and fires the
    /// one-shot fetch request at the companion. The sync engine comes up
    /// before any region is created, so a [`SyncError::Configuration`]
    /// aborts a load that has touched nothing. A failure later in the
    /// sequence destroys every region created so far, so a failed load
    /// leaves the surface clean and the face loadable again.
    pub fn load<S, L>(&mut self, surface: &mut S, link: &mut L) -> Result<(), FaceError>
    where
        S: RegionSurface,
        L: CompanionLink,
    {
        if self.phase != Phase::Unloaded {
            return Err(FaceError::BadPhase);
        }

        let sync = WeatherSync::new(PLACEHOLDER_TEMPERATURE, PLACEHOLDER_CITY)?;

        let mut created: Vec<RegionHandle, 5> = Vec::new();
        let regions = match Self::bring_up(surface, link, &sync, &mut created) {
            Ok(regions) => regions,
            Err(e) => {
                for &handle in &created {
                    let _ = surface.destroy_region(handle);
                }
                return Err(e);
            }
        };

        self.sync = Some(sync);
        self.regions = Some(regions);
        self.phase = self.phase.transition(PhaseEvent::Load);
        Ok(())
    }

    fn bring_up<S, L>(
        surface: &mut S,
        link: &mut L,
        sync: &WeatherSync,
        created: &mut Vec<RegionHandle, 5>,
    ) -> Result<FaceRegions, FaceError>
    where
        S: RegionSurface,
        L: CompanionLink,
    {
        let regions = FaceRegions {
            date: Self::styled_region(surface, created, &DATE_REGION)?,
            time: Self::styled_region(surface, created, &TIME_REGION)?,
            separator: Self::styled_region(surface, created, &SEPARATOR_REGION)?,
            temperature: Self::styled_region(surface, created, &TEMPERATURE_REGION)?,
            city: Self::styled_region(surface, created, &CITY_REGION)?,
        };
        surface.fill(regions.separator, Color::White)?;
        surface.set_text(regions.temperature, sync.temperature())?;
        surface.set_text(regions.city, sync.city())?;

        // Fire-and-forget; if the companion never answers, the placeholders
        // simply stay up.
        let request = WeatherSync::fetch_request()?;
        link.send(&request)?;
        Ok(regions)
    }

    /// Minute tick handler: recompute and push date and time text
    pub fn on_minute_tick<S>(
        &mut self,
        now: &WallTime,
        style: ClockStyle,
        surface: &mut S,
    ) -> Result<(), FaceError>
    where
        S: RegionSurface,
    {
        let Some(regions) = self.regions else {
            return Ok(());
        };

        self.clock.format(now, style);
        surface.set_text(regions.date, self.clock.date())?;
        surface.set_text(regions.time, self.clock.time())?;
        // Both clock regions cover the separator rows, and pushing their
        // text erases the whole region; repaint the line afterwards.
        surface.fill(regions.separator, Color::White)?;
        Ok(())
    }

    /// Inbound payload handler
    ///
    /// Applies the decoded deltas to the mirror and pushes each changed
    /// field to its region before returning, so no later tick can observe
    /// the mirror and the screen disagreeing. On a sync error the previous
    /// values stay up; the error is returned for the host to log.
    pub fn on_message<S>(&mut self, payload: &[u8], surface: &mut S) -> Result<(), FaceError>
    where
        S: RegionSurface,
    {
        let changed = match self.sync.as_mut() {
            Some(sync) => sync.apply_payload(payload),
            None => return Ok(()),
        };
        let changed = match changed {
            Ok(changed) => changed,
            Err(e) => {
                self.on_sync_error();
                return Err(e.into());
            }
        };

        let (Some(sync), Some(regions)) = (&self.sync, self.regions) else {
            return Ok(());
        };
        if changed.temperature {
            surface.set_text(regions.temperature, sync.temperature())?;
        }
        if changed.city {
            surface.set_text(regions.city, sync.city())?;
        }
        Ok(())
    }

    /// Record a sync failure reported by the decode layer
    ///
    /// Policy is log-and-ignore: no retry, no resend, no crash, display
    /// keeps its last good value. The core only counts; the host logs.
    pub fn on_sync_error(&mut self) {
        self.sync_errors = self.sync_errors.saturating_add(1);
    }

    /// Take the face off screen; the face cannot be loaded again
    pub fn unload<S>(&mut self, surface: &mut S) -> Result<(), FaceError>
    where
        S: RegionSurface,
    {
        if self.phase != Phase::Loaded {
            return Ok(());
        }

        // Teardown order: the sync engine writes into the weather regions,
        // so it has to go before those regions are destroyed.
        self.sync = None;
        if let Some(regions) = self.regions.take() {
            surface.destroy_region(regions.city)?;
            surface.destroy_region(regions.temperature)?;
            // Date, time and separator go down with the window itself.
        }
        self.phase = self.phase.transition(PhaseEvent::Unload);
        Ok(())
    }

    fn styled_region<S>(
        surface: &mut S,
        created: &mut Vec<RegionHandle, 5>,
        layout: &RegionLayout,
    ) -> Result<RegionHandle, FaceError>
    where
        S: RegionSurface,
    {
        let region = surface.create_region(layout.bounds)?;
        // Recorded before styling so a region whose styling fails is still
        // reclaimed on the unwind path
        let _ = created.push(region);
        surface.set_style(region, &layout.style)?;
        Ok(region)
    }
}

impl Default for Watchface {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Month;
    use crate::layout::{Rect, TextStyle};
    use crate::sync::WeatherSync;

    use heapless::{String, Vec};
    use simplicity_protocol::dict::{DictWriter, WIRE_BUFFER_SIZE};

    const MAX_MOCK_REGIONS: usize = 16;

    #[derive(Debug, Default, Clone)]
    struct MockRegion {
        live: bool,
        bounds: Rect,
        style: Option<TextStyle>,
        text: String<32>,
        fill: Option<Color>,
        fills: u8,
    }

    /// Recording display surface
    #[derive(Debug, Default)]
    struct MockSurface {
        regions: Vec<MockRegion, MAX_MOCK_REGIONS>,
        fail_fill: bool,
    }

    impl MockSurface {
        fn new() -> Self {
            Self::default()
        }

        fn live_count(&self) -> usize {
            self.regions.iter().filter(|r| r.live).count()
        }

        fn text(&self, region: RegionHandle) -> &str {
            &self.regions[region.0 as usize].text
        }

        fn slot(&mut self, region: RegionHandle) -> Result<&mut MockRegion, SurfaceError> {
            match self.regions.get_mut(region.0 as usize) {
                Some(slot) if slot.live => Ok(slot),
                _ => Err(SurfaceError::InvalidRegion),
            }
        }
    }

    impl RegionSurface for MockSurface {
        fn create_region(&mut self, bounds: Rect) -> Result<RegionHandle, SurfaceError> {
            let handle = RegionHandle(self.regions.len() as u8);
            self.regions
                .push(MockRegion {
                    live: true,
                    bounds,
                    ..MockRegion::default()
                })
                .map_err(|_| SurfaceError::OutOfRegions)?;
            Ok(handle)
        }

        fn set_style(&mut self, region: RegionHandle, style: &TextStyle) -> Result<(), SurfaceError> {
            self.slot(region)?.style = Some(*style);
            Ok(())
        }

        fn set_text(&mut self, region: RegionHandle, text: &str) -> Result<(), SurfaceError> {
            let slot = self.slot(region)?;
            slot.text = String::try_from(text).map_err(|_| SurfaceError::TextTooLong)?;
            Ok(())
        }

        fn fill(&mut self, region: RegionHandle, color: Color) -> Result<(), SurfaceError> {
            if self.fail_fill {
                return Err(SurfaceError::Panel);
            }
            let slot = self.slot(region)?;
            slot.fill = Some(color);
            slot.fills += 1;
            Ok(())
        }

        fn destroy_region(&mut self, region: RegionHandle) -> Result<(), SurfaceError> {
            self.slot(region)?.live = false;
            Ok(())
        }
    }

    /// Recording companion link
    #[derive(Debug, Default)]
    struct MockLink {
        sent: Vec<Vec<u8, WIRE_BUFFER_SIZE>, 4>,
    }

    impl CompanionLink for MockLink {
        fn send(&mut self, payload: &[u8]) -> Result<(), LinkError> {
            let datagram =
                Vec::from_slice(payload).map_err(|_| LinkError::PayloadTooLarge)?;
            self.sent.push(datagram).map_err(|_| LinkError::Busy)?;
            Ok(())
        }
    }

    // Handles in creation order, mirroring FaceRegions
    const DATE: RegionHandle = RegionHandle(0);
    const TIME: RegionHandle = RegionHandle(1);
    const SEPARATOR: RegionHandle = RegionHandle(2);
    const TEMPERATURE: RegionHandle = RegionHandle(3);
    const CITY: RegionHandle = RegionHandle(4);

    fn loaded_face() -> (Watchface, MockSurface, MockLink) {
        let mut face = Watchface::new();
        let mut surface = MockSurface::new();
        let mut link = MockLink::default();
        face.load(&mut surface, &mut link).unwrap();
        (face, surface, link)
    }

    fn payload_of(key: u32, value: &str) -> Vec<u8, WIRE_BUFFER_SIZE> {
        let mut writer = DictWriter::new();
        writer.cstring(key, value).unwrap();
        writer.finish()
    }

    #[test]
    fn test_load_shows_placeholders_and_sends_handshake() {
        let (face, surface, link) = loaded_face();

        assert_eq!(face.phase(), Phase::Loaded);
        assert_eq!(surface.live_count(), 5);
        assert_eq!(surface.text(TEMPERATURE), PLACEHOLDER_TEMPERATURE);
        assert_eq!(surface.text(CITY), PLACEHOLDER_CITY);
        assert_eq!(surface.regions[SEPARATOR.0 as usize].fill, Some(Color::White));

        assert_eq!(link.sent.len(), 1);
        assert_eq!(&link.sent[0][..], &WeatherSync::fetch_request().unwrap()[..]);
    }

    #[test]
    fn test_minute_tick_renders_both_clock_regions() {
        let (mut face, mut surface, _link) = loaded_face();

        let now = WallTime::new(Month::January, 5, 9, 5);
        face.on_minute_tick(&now, ClockStyle::TwelveHour, &mut surface)
            .unwrap();

        assert_eq!(surface.text(DATE), "January  5");
        assert_eq!(surface.text(TIME), "9:05");
    }

    #[test]
    fn test_tick_repaints_separator_over_clock_erase() {
        let (mut face, mut surface, _link) = loaded_face();
        assert_eq!(surface.regions[SEPARATOR.0 as usize].fills, 1);

        // Date and time regions both span the separator rows, and pushing
        // their text erases them; the tick must leave the line standing.
        let now = WallTime::new(Month::January, 5, 9, 5);
        face.on_minute_tick(&now, ClockStyle::TwelveHour, &mut surface)
            .unwrap();

        let separator = &surface.regions[SEPARATOR.0 as usize];
        assert_eq!(separator.fills, 2);
        assert_eq!(separator.fill, Some(Color::White));
    }

    #[test]
    fn test_failed_load_reclaims_created_regions() {
        let mut face = Watchface::new();
        let mut surface = MockSurface::new();
        surface.fail_fill = true;
        let mut link = MockLink::default();

        assert_eq!(
            face.load(&mut surface, &mut link),
            Err(FaceError::Surface(SurfaceError::Panel))
        );
        assert_eq!(face.phase(), Phase::Unloaded);
        assert_eq!(surface.live_count(), 0);

        // Once the surface recovers the face loads cleanly
        surface.fail_fill = false;
        face.load(&mut surface, &mut link).unwrap();
        assert_eq!(face.phase(), Phase::Loaded);
        assert_eq!(surface.live_count(), 5);
        assert_eq!(link.sent.len(), 1);
    }

    #[test]
    fn test_message_updates_only_the_named_field() {
        let (mut face, mut surface, _link) = loaded_face();

        face.on_message(&payload_of(0x0, "72\u{00B0}F"), &mut surface)
            .unwrap();

        assert_eq!(surface.text(TEMPERATURE), "72\u{00B0}F");
        assert_eq!(surface.text(CITY), PLACEHOLDER_CITY);
    }

    #[test]
    fn test_unknown_key_changes_nothing() {
        let (mut face, mut surface, _link) = loaded_face();

        face.on_message(&payload_of(0x9, "x"), &mut surface).unwrap();

        assert_eq!(surface.text(TEMPERATURE), PLACEHOLDER_TEMPERATURE);
        assert_eq!(surface.text(CITY), PLACEHOLDER_CITY);
        assert_eq!(face.sync_errors(), 0);
    }

    #[test]
    fn test_malformed_payload_keeps_last_good_values() {
        let (mut face, mut surface, _link) = loaded_face();

        face.on_message(&payload_of(0x1, "Bergen"), &mut surface)
            .unwrap();

        let good = payload_of(0x1, "Trondheim");
        let result = face.on_message(&good[..good.len() - 3], &mut surface);

        assert!(matches!(result, Err(FaceError::Sync(SyncError::Decode(_)))));
        assert_eq!(surface.text(CITY), "Bergen");
        assert_eq!(face.sync_errors(), 1);
    }

    #[test]
    fn test_unload_destroys_weather_regions_and_retires() {
        let (mut face, mut surface, _link) = loaded_face();

        face.unload(&mut surface).unwrap();

        assert_eq!(face.phase(), Phase::Retired);
        assert!(!surface.regions[TEMPERATURE.0 as usize].live);
        assert!(!surface.regions[CITY.0 as usize].live);
        // The clock regions belong to the window, not the face
        assert!(surface.regions[DATE.0 as usize].live);
        assert!(surface.regions[TIME.0 as usize].live);

        // Retirement is terminal
        let mut link = MockLink::default();
        assert_eq!(
            face.load(&mut surface, &mut link),
            Err(FaceError::BadPhase)
        );
    }

    #[test]
    fn test_handlers_are_noops_before_load() {
        let mut face = Watchface::new();
        let mut surface = MockSurface::new();

        let now = WallTime::new(Month::June, 1, 12, 0);
        face.on_minute_tick(&now, ClockStyle::TwentyFourHour, &mut surface)
            .unwrap();
        face.on_message(&payload_of(0x0, "5\u{00B0}C"), &mut surface)
            .unwrap();

        assert_eq!(surface.live_count(), 0);
    }

    #[test]
    fn test_phase_transitions() {
        assert_eq!(Phase::Unloaded.transition(PhaseEvent::Load), Phase::Loaded);
        assert_eq!(Phase::Loaded.transition(PhaseEvent::Unload), Phase::Retired);
        // Terminal and out-of-order events stay put
        assert_eq!(Phase::Retired.transition(PhaseEvent::Load), Phase::Retired);
        assert_eq!(Phase::Unloaded.transition(PhaseEvent::Unload), Phase::Unloaded);
    }
}
