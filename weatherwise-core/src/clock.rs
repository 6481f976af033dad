use std::fmt::Debug;

use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Time zone the viewer reads dates and hours in.
///
/// Offsets are looked up per instant, so a forecast window that crosses a
/// daylight-saving change keeps each sample on its own local hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerZone {
    /// The operating system's zone.
    #[default]
    System,
    Named(Tz),
    /// A constant offset without daylight-saving rules.
    Fixed(FixedOffset),
}

impl ViewerZone {
    /// Offset in effect at `at`.
    pub fn offset_at(&self, at: DateTime<Utc>) -> FixedOffset {
        let naive = at.naive_utc();
        match self {
            ViewerZone::System => Local.offset_from_utc_datetime(&naive).fix(),
            ViewerZone::Named(tz) => tz.offset_from_utc_datetime(&naive).fix(),
            ViewerZone::Fixed(offset) => *offset,
        }
    }

    pub fn localize(&self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        at.with_timezone(&self.offset_at(at))
    }
}

/// Source of the current instant and the viewer's zone.
///
/// Forecast dates and the UV estimate are evaluated in [`Clock::zone`].
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;

    fn zone(&self) -> ViewerZone;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    zone: ViewerZone,
}

impl SystemClock {
    pub fn in_zone(zone: ViewerZone) -> Self {
        Self { zone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn zone(&self) -> ViewerZone {
        self.zone
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    zone: ViewerZone,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, zone: ViewerZone) -> Self {
        Self { now, zone }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn zone(&self) -> ViewerZone {
        self.zone
    }
}
