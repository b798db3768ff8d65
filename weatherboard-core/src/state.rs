use chrono::NaiveDateTime;

use crate::model::{ClockState, DisplayRecord};

/// Everything the presentation layer displays, owned by one controller.
///
/// All mutation goes through [`Dashboard::tick`] and
/// [`Dashboard::complete_refresh`]; readers get value snapshots and never a
/// reference into the live state.
#[derive(Debug, Clone)]
pub struct Dashboard {
    countdown_start: u32,
    clock: ClockState,
    records: Vec<DisplayRecord>,
}

impl Dashboard {
    /// Creates a dashboard with a full countdown and no records yet.
    ///
    /// `countdown_start` is the number of seconds between refreshes; the
    /// countdown wraps back to it after reaching 1.
    pub fn new(now: NaiveDateTime, countdown_start: u32) -> Self {
        Self {
            countdown_start: countdown_start.max(1),
            clock: ClockState {
                now,
                countdown: countdown_start.max(1),
            },
            records: Vec::new(),
        }
    }

    /// One-second clock transition: advances the wall clock and steps the
    /// countdown, wrapping from 1 back to the start value.
    pub fn tick(&mut self, now: NaiveDateTime) {
        self.clock.now = now;
        self.clock.countdown = if self.clock.countdown <= 1 {
            self.countdown_start
        } else {
            self.clock.countdown - 1
        };
    }

    /// Installs the records produced by a finished refresh cycle and
    /// restarts the countdown. The record list is replaced as a whole;
    /// readers never observe a partial update.
    pub fn complete_refresh(&mut self, records: Vec<DisplayRecord>) {
        self.records = records;
        self.clock.countdown = self.countdown_start;
    }

    pub fn clock(&self) -> ClockState {
        self.clock
    }

    pub fn records(&self) -> &[DisplayRecord] {
        &self.records
    }

    /// Value copy of the current state for the presentation layer.
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            clock: self.clock,
            records: self.records.clone(),
        }
    }
}

/// Read-only copy of the dashboard state at one instant.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub clock: ClockState,
    pub records: Vec<DisplayRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").expect("valid test timestamp")
    }

    fn record(region: &str) -> DisplayRecord {
        DisplayRecord {
            region: region.to_string(),
            local_time: ts("2024-01-01T13:00:00"),
            temperature_c: 27.0,
            humidity_pct: 80.0,
            description: "Cloudy".to_string(),
            icon_url: String::new(),
        }
    }

    #[test]
    fn tick_advances_clock_and_decrements_countdown() {
        let mut dashboard = Dashboard::new(ts("2024-01-01T12:00:00"), 60);

        dashboard.tick(ts("2024-01-01T12:00:01"));

        let clock = dashboard.clock();
        assert_eq!(clock.now, ts("2024-01-01T12:00:01"));
        assert_eq!(clock.countdown, 59);
    }

    #[test]
    fn countdown_visits_every_value_once_per_cycle() {
        let mut dashboard = Dashboard::new(ts("2024-01-01T12:00:00"), 60);

        let mut seen = Vec::with_capacity(60);
        for _ in 0..60 {
            dashboard.tick(ts("2024-01-01T12:00:01"));
            seen.push(dashboard.clock().countdown);
        }

        // One full cycle: 59 down to 1, then back to 60.
        assert_eq!(dashboard.clock().countdown, 60);
        let mut sorted = seen.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, (1..=60).collect::<Vec<u32>>());
        assert_eq!(seen.len(), 60);
    }

    #[test]
    fn refresh_replaces_records_and_resets_countdown() {
        let mut dashboard = Dashboard::new(ts("2024-01-01T12:00:00"), 60);
        dashboard.complete_refresh(vec![record("a"), record("b")]);

        for _ in 0..10 {
            dashboard.tick(ts("2024-01-01T12:00:10"));
        }
        assert_eq!(dashboard.clock().countdown, 50);

        dashboard.complete_refresh(vec![record("c")]);

        assert_eq!(dashboard.clock().countdown, 60);
        assert_eq!(dashboard.records().len(), 1);
        assert_eq!(dashboard.records()[0].region, "c");
    }

    #[test]
    fn snapshot_is_detached_from_later_mutation() {
        let mut dashboard = Dashboard::new(ts("2024-01-01T12:00:00"), 60);
        dashboard.complete_refresh(vec![record("a")]);

        let snapshot = dashboard.snapshot();
        dashboard.complete_refresh(vec![record("b"), record("c")]);

        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].region, "a");
        assert_eq!(snapshot.clock.countdown, 60);
    }

    #[test]
    fn zero_countdown_start_is_clamped() {
        let mut dashboard = Dashboard::new(ts("2024-01-01T12:00:00"), 0);
        assert_eq!(dashboard.clock().countdown, 1);
        dashboard.tick(ts("2024-01-01T12:00:01"));
        assert_eq!(dashboard.clock().countdown, 1);
    }
}
