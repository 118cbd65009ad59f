//! Simulated remote-sensing grid over the monitored site.
//!
//! Each cycle produces a batch of independently jittered sample rows that
//! share regime-driven base values, so a severe cycle shows up as a
//! coherent shift across the whole grid rather than isolated outliers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{round1, round2, Regime, SampleRiskLabel, TelemetrySample};

// ---

/// Reference point the grid rows are jittered around.
#[derive(Debug, Clone, Copy)]
pub struct SiteCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

pub struct GridSampler {
    // ---
    rng: StdRng,
    site: SiteCoordinates,
    batch_size: u32,
}

impl GridSampler {
    pub fn new(site: SiteCoordinates, batch_size: u32, seed: Option<u64>) -> Self {
        // ---
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng,
            site,
            batch_size,
        }
    }

    /// Produce one batch of grid rows for the given regime.
    ///
    /// Base values per regime: cloud-top temperature -60 °C severe vs
    /// -10 °C nominal (±5 jitter); overshooting-top index 1.8 vs 0.5
    /// (+0.2 jitter); moisture flux 28 vs 15 (+1); convective instability
    /// 18 vs 10 (+1). Under the severe regime every row is labeled
    /// Extreme; under nominal the per-row draw is capped at 30, which
    /// never reaches the Extreme threshold.
    pub fn sample(&mut self, regime: Regime, timestamp: &str) -> Vec<TelemetrySample> {
        // ---
        let (ctt_base, ot_base, moisture_base, instability_base) = match regime {
            Regime::Severe => (-60.0, 1.8, 28.0, 18.0),
            Regime::Nominal => (-10.0, 0.5, 15.0, 10.0),
        };

        (0..self.batch_size)
            .map(|id| {
                let scale: u32 = match regime {
                    Regime::Severe => 100,
                    Regime::Nominal => self.rng.gen_range(0..30),
                };

                TelemetrySample {
                    id,
                    latitude: round2(self.site.latitude + self.rng.gen_range(0.0..0.1)),
                    longitude: round2(self.site.longitude + self.rng.gen_range(0.0..0.1)),
                    cloud_top_temp: round2(ctt_base + self.rng.gen_range(-5.0..5.0)),
                    overshooting_top_index: round2(ot_base + self.rng.gen_range(0.0..0.2)),
                    moisture_flux: round1(moisture_base + self.rng.gen_range(0.0..1.0)),
                    convective_instability_index: round1(
                        instability_base + self.rng.gen_range(0.0..1.0),
                    ),
                    risk_label: SampleRiskLabel::from_scale(scale),
                    timestamp: timestamp.to_string(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    const BATCH: u32 = 15;

    fn sampler() -> GridSampler {
        // ---
        let site = SiteCoordinates {
            latitude: 18.5,
            longitude: 74.0,
        };
        GridSampler::new(site, BATCH, Some(21))
    }

    #[test]
    fn test_severe_batch_is_all_extreme() {
        // ---
        let rows = sampler().sample(Regime::Severe, "14:05");

        assert_eq!(rows.len(), BATCH as usize);
        assert!(rows
            .iter()
            .all(|row| row.risk_label == SampleRiskLabel::Extreme));
    }

    #[test]
    fn test_nominal_batch_never_extreme() {
        // ---
        let mut sampler = sampler();

        for _ in 0..50 {
            let rows = sampler.sample(Regime::Nominal, "14:05");
            assert!(rows
                .iter()
                .all(|row| row.risk_label != SampleRiskLabel::Extreme));
        }
    }

    #[test]
    fn test_rows_jitter_around_the_site() {
        // ---
        let rows = sampler().sample(Regime::Nominal, "14:05");

        for row in &rows {
            assert!((18.5..=18.6).contains(&row.latitude), "{row:?}");
            assert!((74.0..=74.1).contains(&row.longitude), "{row:?}");
            assert!((-15.0..=-5.0).contains(&row.cloud_top_temp), "{row:?}");
            assert!((0.5..=0.7).contains(&row.overshooting_top_index), "{row:?}");
            assert!((15.0..=16.0).contains(&row.moisture_flux), "{row:?}");
            assert!(
                (10.0..=11.0).contains(&row.convective_instability_index),
                "{row:?}"
            );
        }
    }

    #[test]
    fn test_severe_bases_shift_the_whole_batch() {
        // ---
        let rows = sampler().sample(Regime::Severe, "02:30");

        for row in &rows {
            assert!((-65.0..=-55.0).contains(&row.cloud_top_temp), "{row:?}");
            assert!((1.8..=2.0).contains(&row.overshooting_top_index), "{row:?}");
            assert!((28.0..=29.0).contains(&row.moisture_flux), "{row:?}");
            assert!(
                (18.0..=19.0).contains(&row.convective_instability_index),
                "{row:?}"
            );
        }
    }

    #[test]
    fn test_rows_carry_ids_and_shared_timestamp() {
        // ---
        let rows = sampler().sample(Regime::Nominal, "23:59");

        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.id, i as u32);
            assert_eq!(row.timestamp, "23:59");
        }
    }
}
