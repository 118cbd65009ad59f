//! Synthetic acquisition of environmental readings.
//!
//! Stands in for the real sensor feed: one reading per cycle, drawn from a
//! severe or nominal parameter envelope chosen by a weighted coin flip.
//! Consumes nothing but its own random source and never fails; the pipeline
//! still validates every reading at the boundary so a future non-synthetic
//! feed slots in without weakening the invariants downstream.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{round1, Reading, Regime};

// ---

pub struct ReadingGenerator {
    // ---
    rng: StdRng,
    severe_probability: f64,
}

impl ReadingGenerator {
    /// `severe_probability` is the per-cycle chance of the severe envelope;
    /// `seed` pins the random source for reproducible sessions.
    pub fn new(severe_probability: f64, seed: Option<u64>) -> Self {
        // ---
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng,
            severe_probability,
        }
    }

    /// Produce the next reading and the regime it was drawn under.
    ///
    /// Severe envelope: humidity 75-95 %, pressure 995-1010 hPa, wind
    /// 25-55 km/h, rainfall 20-80 mm. Nominal: humidity 40-70 %, pressure
    /// 1008-1018 hPa, wind 5-25 km/h, rainfall 0-10 mm. Temperature is
    /// 24-32 °C regardless of regime. Humidity, wind, and rainfall carry
    /// 1 decimal; temperature and pressure are whole numbers.
    pub fn generate(&mut self) -> (Regime, Reading) {
        // ---
        let regime = if self.rng.gen_bool(self.severe_probability) {
            Regime::Severe
        } else {
            Regime::Nominal
        };

        let (humidity, pressure, wind_speed, rainfall): (f64, f64, f64, f64) = match regime {
            Regime::Severe => (
                self.rng.gen_range(75.0..95.0),
                self.rng.gen_range(995.0..1010.0),
                self.rng.gen_range(25.0..55.0),
                self.rng.gen_range(20.0..80.0),
            ),
            Regime::Nominal => (
                self.rng.gen_range(40.0..70.0),
                self.rng.gen_range(1008.0..1018.0),
                self.rng.gen_range(5.0..25.0),
                self.rng.gen_range(0.0..10.0),
            ),
        };

        let reading = Reading {
            temperature: self.rng.gen_range(24.0f64..32.0).round(),
            humidity: round1(humidity),
            pressure: pressure.round(),
            wind_speed: round1(wind_speed),
            rainfall: round1(rainfall),
        };

        (regime, reading)
    }

    /// Random source shared with one-time setup steps (history seeding).
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
