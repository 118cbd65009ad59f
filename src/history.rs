//! Fixed-capacity rolling history windows for the tracked metrics.
//!
//! One window each for pressure, humidity, and wind speed, plus a shared
//! timestamp window. All four move in lockstep: every recorded reading
//! appends to each window and evicts the oldest entry, so the lengths never
//! drift apart and are always exactly the configured capacity. Rainfall and
//! temperature are tracked as current-cycle values only and have no window.

use std::collections::VecDeque;

use chrono::Local;
use rand::Rng;

use crate::models::{HistoryWindows, Reading};

// ---

/// Wall-clock timestamp in 24-hour `HH:MM:SS` form, `offset_secs` in the past.
pub fn clock_stamp(offset_secs: i64) -> String {
    // ---
    (Local::now() - chrono::Duration::seconds(offset_secs))
        .format("%H:%M:%S")
        .to_string()
}

/// Rolling windows of the historized metrics.
///
/// Constructed only via [`MetricHistory::seeded`], which backfills every
/// window to full capacity; a partial window is unrepresentable.
#[derive(Debug, Clone)]
pub struct MetricHistory {
    // ---
    capacity: usize,
    pressure: VecDeque<f64>,
    humidity: VecDeque<f64>,
    wind: VecDeque<f64>,
    timestamps: VecDeque<String>,
}

impl MetricHistory {
    /// Build fully-populated windows of `capacity` synthetic points.
    ///
    /// Values are drawn from the calm idle bands of the feed (pressure
    /// 1010-1015 hPa, humidity 60-70 %, wind 10-15 km/h); timestamps are
    /// backfilled at decreasing multiples of `cycle_secs` so the oldest
    /// point sits `(capacity - 1) * cycle_secs` seconds in the past.
    pub fn seeded(capacity: usize, cycle_secs: u32, rng: &mut impl Rng) -> Self {
        // ---
        assert!(capacity > 0, "history capacity must be at least 1");

        let mut history = Self {
            capacity,
            pressure: VecDeque::with_capacity(capacity),
            humidity: VecDeque::with_capacity(capacity),
            wind: VecDeque::with_capacity(capacity),
            timestamps: VecDeque::with_capacity(capacity),
        };

        for i in 0..capacity {
            history.pressure.push_back(1010.0 + rng.gen_range(0.0..5.0));
            history.humidity.push_back(60.0 + rng.gen_range(0.0..10.0));
            history.wind.push_back(10.0 + rng.gen_range(0.0..5.0));

            let age = (capacity - 1 - i) as i64 * i64::from(cycle_secs);
            history.timestamps.push_back(clock_stamp(age));
        }

        history
    }

    /// Fold a reading into the windows: oldest entry out, newest in.
    ///
    /// FIFO per metric, applied to all tracked metrics and the timestamp
    /// window in one step. Length is unchanged.
    pub fn record(&mut self, reading: &Reading, timestamp: String) {
        // ---
        self.pressure.pop_front();
        self.pressure.push_back(reading.pressure);

        self.humidity.pop_front();
        self.humidity.push_back(reading.humidity);

        self.wind.pop_front();
        self.wind.push_back(reading.wind_speed);

        self.timestamps.pop_front();
        self.timestamps.push_back(timestamp);
    }

    /// Clone the windows into the serializable snapshot view.
    pub fn windows(&self) -> HistoryWindows {
        // ---
        HistoryWindows {
            pressure: self.pressure.iter().copied().collect(),
            humidity: self.humidity.iter().copied().collect(),
            wind: self.wind.iter().copied().collect(),
            timestamps: self.timestamps.iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const CAPACITY: usize = 20;

    fn seeded_history() -> MetricHistory {
        // ---
        let mut rng = StdRng::seed_from_u64(7);
        MetricHistory::seeded(CAPACITY, 30, &mut rng)
    }

    fn reading(pressure: f64) -> Reading {
        // ---
        Reading {
            temperature: 28.0,
            humidity: 55.0,
            pressure,
            wind_speed: 12.0,
            rainfall: 1.0,
        }
    }

    #[test]
    fn test_seeding_fills_every_window() {
        // ---
        let windows = seeded_history().windows();

        assert_eq!(windows.pressure.len(), CAPACITY);
        assert_eq!(windows.humidity.len(), CAPACITY);
        assert_eq!(windows.wind.len(), CAPACITY);
        assert_eq!(windows.timestamps.len(), CAPACITY);

        // Seed values come from the idle bands
        assert!(windows.pressure.iter().all(|p| (1010.0..1015.0).contains(p)));
        assert!(windows.humidity.iter().all(|h| (60.0..70.0).contains(h)));
        assert!(windows.wind.iter().all(|w| (10.0..15.0).contains(w)));
    }

    #[test]
    fn test_record_keeps_length_fixed() {
        // ---
        let mut history = seeded_history();

        for i in 0..(CAPACITY + 1) {
            history.record(&reading(1000.0 + i as f64), format!("12:00:{i:02}"));

            let windows = history.windows();
            assert_eq!(windows.pressure.len(), CAPACITY);
            assert_eq!(windows.timestamps.len(), CAPACITY);
        }
    }

    #[test]
    fn test_record_evicts_oldest_first() {
        // ---
        let mut history = seeded_history();

        // Overwrite the whole seed window with known values
        for i in 0..CAPACITY {
            history.record(&reading(1000.0 + i as f64), format!("12:00:{i:02}"));
        }

        let before = history.windows();
        history.record(&reading(2000.0), "12:01:00".into());
        let after = history.windows();

        // FIFO eviction law: the new head is the old second element
        assert_eq!(after.pressure[0], before.pressure[1]);
        assert_eq!(after.timestamps[0], before.timestamps[1]);
        assert_eq!(*after.pressure.last().unwrap(), 2000.0);
        assert_eq!(after.timestamps.last().unwrap(), "12:01:00");
    }

    #[test]
    fn test_windows_move_in_lockstep() {
        // ---
        let mut history = seeded_history();
        history.record(&reading(995.0), "09:30:00".into());

        let windows = history.windows();
        assert_eq!(*windows.pressure.last().unwrap(), 995.0);
        assert_eq!(*windows.humidity.last().unwrap(), 55.0);
        assert_eq!(*windows.wind.last().unwrap(), 12.0);
        assert_eq!(windows.timestamps.last().unwrap(), "09:30:00");
    }

    #[test]
    fn test_seed_timestamps_are_chronological() {
        // ---
        // Ages decrease toward the tail, so parsed times must be
        // non-decreasing except across a midnight wrap.
        let windows = seeded_history().windows();

        let secs: Vec<i64> = windows
            .timestamps
            .iter()
            .map(|t| {
                let parts: Vec<i64> = t.split(':').map(|p| p.parse().unwrap()).collect();
                parts[0] * 3600 + parts[1] * 60 + parts[2]
            })
            .collect();

        let day = 24 * 3600;
        for pair in secs.windows(2) {
            let delta = (pair[1] - pair[0]).rem_euclid(day);
            assert!(delta < day / 2, "timestamps out of order: {pair:?}");
        }
    }
}
