use chrono::NaiveDateTime;

/// A single timestamped forecast entry for one region.
///
/// Timestamps are provider-local wall-clock times without a zone. The
/// timestamp is the only field the pipeline validates; everything else is
/// passed through as received.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub local_time: NaiveDateTime,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub condition_code: i32,
    pub description: String,
    pub icon_url: String,
}

/// Raw forecast series for one region, as produced by a [`crate::source::ForecastSource`].
///
/// Point order is whatever the provider returned; callers must not assume
/// it is sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSeries {
    pub region: String,
    pub points: Vec<ForecastPoint>,
}

/// One dashboard card: a region name plus the forecast point chosen for it.
/// Built fresh on every refresh cycle and discarded on the next.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRecord {
    pub region: String,
    pub local_time: NaiveDateTime,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub description: String,
    pub icon_url: String,
}

impl DisplayRecord {
    pub fn from_point(region: impl Into<String>, point: ForecastPoint) -> Self {
        Self {
            region: region.into(),
            local_time: point.local_time,
            temperature_c: point.temperature_c,
            humidity_pct: point.humidity_pct,
            description: point.description,
            icon_url: point.icon_url,
        }
    }
}

/// Wall clock plus seconds remaining until the next scheduled refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockState {
    pub now: NaiveDateTime,
    pub countdown: u32,
}
