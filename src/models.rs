//! Data model for the risk-assessment pipeline.

use anyhow::{bail, Result};
use serde::Serialize;

// ---

/// One environmental reading, produced once per acquisition cycle.
///
/// Immutable once produced; the next cycle supersedes it rather than
/// mutating it in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    // ---
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub rainfall: f64,
}

impl Reading {
    /// Boundary validation applied before a reading enters the pipeline.
    ///
    /// Invariants: all fields finite, humidity within [0, 100], rainfall
    /// non-negative. A rejected reading must not reach the history buffer
    /// or the scorer.
    pub fn validate(&self) -> Result<()> {
        // ---
        let fields = [
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("pressure", self.pressure),
            ("windSpeed", self.wind_speed),
            ("rainfall", self.rainfall),
        ];

        for (name, value) in fields {
            if !value.is_finite() {
                bail!("non-finite {name} in reading: {value}");
            }
        }

        if !(0.0..=100.0).contains(&self.humidity) {
            bail!("humidity out of range [0, 100]: {}", self.humidity);
        }

        if self.rainfall < 0.0 {
            bail!("negative rainfall: {}", self.rainfall);
        }

        Ok(())
    }
}

impl Default for Reading {
    // Placeholder shown before the first cycle completes
    fn default() -> Self {
        Self {
            temperature: 0.0,
            humidity: 0.0,
            pressure: 0.0,
            wind_speed: 0.0,
            rainfall: 0.0,
        }
    }
}

// ---

/// Synthetic-data branch selected per cycle, biasing all generated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Nominal,
    Severe,
}

/// Three-level classification of current hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

/// Hazard assessment derived solely from the latest reading.
///
/// `score` is the published value, capped at 99; the tier is classified on
/// the uncapped raw sum (see `risk::score`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub score: u8,
    pub tier: RiskTier,
}

// ---

/// Per-row risk label in the sampled telemetry grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SampleRiskLabel {
    Low,
    Moderate,
    Extreme,
}

impl SampleRiskLabel {
    /// Map a 0-100 scale value onto a label. Strict thresholds: > 80 is
    /// Extreme, > 40 is Moderate.
    pub fn from_scale(value: u32) -> Self {
        // ---
        if value > 80 {
            SampleRiskLabel::Extreme
        } else if value > 40 {
            SampleRiskLabel::Moderate
        } else {
            SampleRiskLabel::Low
        }
    }
}

/// One row of the simulated remote-sensing grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySample {
    // ---
    pub id: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub cloud_top_temp: f64,
    pub overshooting_top_index: f64,
    pub moisture_flux: f64,
    pub convective_instability_index: f64,
    pub risk_label: SampleRiskLabel,
    pub timestamp: String,
}

// ---

/// Read-only view of the rolling history windows, cloned into each snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryWindows {
    pub pressure: Vec<f64>,
    pub humidity: Vec<f64>,
    pub wind: Vec<f64>,
    pub timestamps: Vec<String>,
}

/// Countdown state owned exclusively by the acquisition scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleState {
    pub is_analyzing: bool,
    pub seconds_until_next_cycle: u32,
}

/// Whether the latest cycle applied a fresh reading or retained the prior
/// one after boundary rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedStatus {
    Live,
    Degraded,
}

/// Full published state after a cycle or tick, consumed by presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    // ---
    pub reading: Reading,
    pub history: HistoryWindows,
    pub assessment: RiskAssessment,
    pub telemetry_samples: Vec<TelemetrySample>,
    pub cycle_state: CycleState,
    pub feed: FeedStatus,
}

// ---

/// Round to 1 decimal place, matching the feed's published precision.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to 2 decimal places, used for grid coordinates and indices.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn valid_reading() -> Reading {
        // ---
        Reading {
            temperature: 27.0,
            humidity: 55.3,
            pressure: 1012.0,
            wind_speed: 12.4,
            rainfall: 3.1,
        }
    }

    #[test]
    fn test_valid_reading_passes() {
        // ---
        assert!(valid_reading().validate().is_ok());
    }

    #[test]
    fn test_non_finite_fields_rejected() {
        // ---
        let mut reading = valid_reading();
        reading.pressure = f64::NAN;
        assert!(reading.validate().is_err());

        let mut reading = valid_reading();
        reading.wind_speed = f64::INFINITY;
        assert!(reading.validate().is_err());
    }

    #[test]
    fn test_humidity_range_rejected() {
        // ---
        let mut reading = valid_reading();
        reading.humidity = 100.5;
        assert!(reading.validate().is_err());

        reading.humidity = -0.1;
        assert!(reading.validate().is_err());

        // Boundaries are inclusive
        reading.humidity = 100.0;
        assert!(reading.validate().is_ok());
        reading.humidity = 0.0;
        assert!(reading.validate().is_ok());
    }

    #[test]
    fn test_negative_rainfall_rejected() {
        // ---
        let mut reading = valid_reading();
        reading.rainfall = -1.0;
        assert!(reading.validate().is_err());

        reading.rainfall = 0.0;
        assert!(reading.validate().is_ok());
    }

    #[test]
    fn test_sample_label_thresholds() {
        // ---
        assert_eq!(SampleRiskLabel::from_scale(100), SampleRiskLabel::Extreme);
        assert_eq!(SampleRiskLabel::from_scale(81), SampleRiskLabel::Extreme);
        assert_eq!(SampleRiskLabel::from_scale(80), SampleRiskLabel::Moderate);
        assert_eq!(SampleRiskLabel::from_scale(41), SampleRiskLabel::Moderate);
        assert_eq!(SampleRiskLabel::from_scale(40), SampleRiskLabel::Low);
        assert_eq!(SampleRiskLabel::from_scale(0), SampleRiskLabel::Low);
    }

    #[test]
    fn test_rounding_helpers() {
        // ---
        assert_eq!(round1(12.34), 12.3);
        assert_eq!(round1(12.36), 12.4);
        assert_eq!(round2(18.567), 18.57);
        assert_eq!(round2(-60.004), -60.0);
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        // ---
        let json = serde_json::to_value(valid_reading()).unwrap();
        assert!(json.get("windSpeed").is_some());
        assert!(json.get("wind_speed").is_none());

        let assessment = RiskAssessment {
            score: 99,
            tier: RiskTier::High,
        };
        let json = serde_json::to_value(assessment).unwrap();
        assert_eq!(json["tier"], "high");

        let label = serde_json::to_value(SampleRiskLabel::Extreme).unwrap();
        assert_eq!(label, "Extreme");
    }
}
