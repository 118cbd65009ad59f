//! Hazard scoring for the latest reading.
//!
//! Pure, total, and memoryless: the score depends only on the reading it is
//! given, never on history or trend. Each factor contributes independently
//! with a capped amount, so the raw sum is bounded at 100.

use crate::models::{Reading, RiskAssessment, RiskTier};

// ---

/// Classify a reading into a bounded hazard score and tier.
///
/// Additive threshold scoring with strict `>` / `<` comparisons:
/// - humidity:  +30 above 80, else +20 above 70
/// - pressure:  +25 below 1000, else +15 below 1010
/// - windSpeed: +25 above 40, else +15 above 30
/// - rainfall:  +20 above 50, else +15 above 30
///
/// The tier is classified on the raw sum (> 60 high, > 35 moderate) while
/// the published score is capped at 99. A raw sum of 100 therefore still
/// publishes as 99/high; the cap applies to the displayed value only and
/// is never a classification input.
pub fn score(reading: &Reading) -> RiskAssessment {
    // ---
    let mut raw: u32 = 0;

    if reading.humidity > 80.0 {
        raw += 30;
    } else if reading.humidity > 70.0 {
        raw += 20;
    }

    if reading.pressure < 1000.0 {
        raw += 25;
    } else if reading.pressure < 1010.0 {
        raw += 15;
    }

    if reading.wind_speed > 40.0 {
        raw += 25;
    } else if reading.wind_speed > 30.0 {
        raw += 15;
    }

    if reading.rainfall > 50.0 {
        raw += 20;
    } else if reading.rainfall > 30.0 {
        raw += 15;
    }

    let tier = if raw > 60 {
        RiskTier::High
    } else if raw > 35 {
        RiskTier::Moderate
    } else {
        RiskTier::Low
    };

    RiskAssessment {
        score: raw.min(99) as u8,
        tier,
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn reading(humidity: f64, pressure: f64, wind_speed: f64, rainfall: f64) -> Reading {
        // ---
        Reading {
            temperature: 28.0,
            humidity,
            pressure,
            wind_speed,
            rainfall,
        }
    }

    #[test]
    fn test_all_factors_maxed_caps_at_99() {
        // ---
        // Contributions 30 + 25 + 25 + 20 = 100, published capped at 99,
        // tier from the uncapped value
        let assessment = score(&reading(85.0, 995.0, 45.0, 60.0));
        assert_eq!(assessment.score, 99);
        assert_eq!(assessment.tier, RiskTier::High);
    }

    #[test]
    fn test_calm_conditions_score_zero() {
        // ---
        let assessment = score(&reading(50.0, 1015.0, 10.0, 2.0));
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.tier, RiskTier::Low);
    }

    #[test]
    fn test_tier_boundary_at_35_is_strict() {
        // ---
        // humidity 20 + pressure 15 = 35 exactly: still low
        let at_boundary = score(&reading(75.0, 1005.0, 10.0, 2.0));
        assert_eq!(at_boundary.score, 35);
        assert_eq!(at_boundary.tier, RiskTier::Low);

        // 20 + 15 + 15 = 50: moderate
        let above = score(&reading(75.0, 1005.0, 35.0, 2.0));
        assert_eq!(above.score, 50);
        assert_eq!(above.tier, RiskTier::Moderate);
    }

    #[test]
    fn test_tier_boundary_at_60_is_strict() {
        // ---
        // 30 + 15 + 15 = 60 exactly: still moderate
        let at_boundary = score(&reading(85.0, 1005.0, 35.0, 2.0));
        assert_eq!(at_boundary.score, 60);
        assert_eq!(at_boundary.tier, RiskTier::Moderate);

        // 30 + 15 + 15 + 15 = 75: high
        let above = score(&reading(85.0, 1005.0, 35.0, 35.0));
        assert_eq!(above.score, 75);
        assert_eq!(above.tier, RiskTier::High);
    }

    #[test]
    fn test_factor_thresholds_are_strict() {
        // ---
        // Each factor sits exactly on its lower threshold: no contribution
        let on_edges = score(&reading(70.0, 1010.0, 30.0, 30.0));
        assert_eq!(on_edges.score, 0);
        assert_eq!(on_edges.tier, RiskTier::Low);

        // Just past each lower threshold: 20 + 15 + 15 + 15 = 65
        let past_edges = score(&reading(70.1, 1009.9, 30.1, 30.1));
        assert_eq!(past_edges.score, 65);
        assert_eq!(past_edges.tier, RiskTier::High);
    }

    #[test]
    fn test_score_bounded_for_arbitrary_inputs() {
        // ---
        let extremes = [
            reading(100.0, 900.0, 200.0, 500.0),
            reading(0.0, 1100.0, 0.0, 0.0),
            reading(80.0, 1000.0, 40.0, 50.0),
        ];
        for r in &extremes {
            let assessment = score(r);
            assert!(assessment.score <= 99);
        }
    }
}
