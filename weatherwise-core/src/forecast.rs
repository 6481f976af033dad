//! Reduction of the provider's 3-hourly forecast series into the daily and
//! hourly views.
//!
//! Dates and hours are evaluated in the time zone of the `now` passed in,
//! i.e. the viewer's local time. Each sample is converted at its own instant,
//! so zones with daylight-saving rules shift correctly inside the window.

use std::{collections::HashSet, ops::RangeInclusive};

use chrono::{DateTime, Local, NaiveDate, TimeZone, Timelike, Utc};

use crate::{clock::ViewerZone, model::ForecastSample};

/// Number of samples in the hourly view (24 hours at 3-hour spacing).
pub const HOURLY_VIEW_LEN: usize = 8;

/// Maximum number of days in the daily view.
pub const DAILY_VIEW_LEN: usize = 5;

/// Local hours whose sample may represent a whole day.
const MIDDAY_HOURS: RangeInclusive<u32> = 11..=14;

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastViews {
    pub daily: Vec<ForecastSample>,
    pub hourly: Vec<ForecastSample>,
}

/// Builds both views from a forecast series sorted by timestamp.
pub fn reduce<Tz: TimeZone>(samples: &[ForecastSample], now: &DateTime<Tz>) -> ForecastViews {
    ForecastViews {
        daily: daily_view(samples, now),
        hourly: hourly_view(samples),
    }
}

/// [`reduce`] with `now` seen from `zone`.
pub fn reduce_in(
    samples: &[ForecastSample],
    now: DateTime<Utc>,
    zone: ViewerZone,
) -> ForecastViews {
    match zone {
        ViewerZone::System => reduce(samples, &now.with_timezone(&Local)),
        ViewerZone::Named(tz) => reduce(samples, &now.with_timezone(&tz)),
        ViewerZone::Fixed(offset) => reduce(samples, &now.with_timezone(&offset)),
    }
}

/// The first [`HOURLY_VIEW_LEN`] samples, untouched. Shorter input is returned whole.
pub fn hourly_view(samples: &[ForecastSample]) -> Vec<ForecastSample> {
    samples.iter().take(HOURLY_VIEW_LEN).cloned().collect()
}

/// One representative sample per future calendar day, at most [`DAILY_VIEW_LEN`].
///
/// The first pass picks, for each day, the first sample between 11:00 and
/// 14:00 local time. Days without such a sample are then filled with their
/// first sample of the day. Today is never included, and days the provider
/// did not cover are not invented.
pub fn daily_view<Tz: TimeZone>(samples: &[ForecastSample], now: &DateTime<Tz>) -> Vec<ForecastSample> {
    let tz = now.timezone();
    let today = now.date_naive();

    let upcoming: Vec<(NaiveDate, u32, &ForecastSample)> = samples
        .iter()
        .filter_map(|sample| {
            let local = sample.timestamp.with_timezone(&tz);
            let date = local.date_naive();
            (date != today).then_some((date, local.hour(), sample))
        })
        .collect();

    let mut seen: HashSet<NaiveDate> = HashSet::new();
    let mut picked: Vec<&ForecastSample> = Vec::with_capacity(DAILY_VIEW_LEN);

    for (date, hour, sample) in &upcoming {
        if picked.len() >= DAILY_VIEW_LEN {
            break;
        }
        if MIDDAY_HOURS.contains(hour) && seen.insert(*date) {
            picked.push(*sample);
        }
    }

    for (date, _, sample) in &upcoming {
        if picked.len() >= DAILY_VIEW_LEN {
            break;
        }
        if seen.insert(*date) {
            picked.push(*sample);
        }
    }

    // A fallback day can precede a midday day; one sample per date means
    // timestamp order is date order.
    picked.sort_by_key(|sample| sample.timestamp);
    picked.into_iter().cloned().collect()
}
