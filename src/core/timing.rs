//! Distribution of inter-keystroke intervals.

use crate::collector::types::KeystrokeEvent;
use crate::core::windowing::round_to;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Quantiles reported in [`TimingPercentiles`], as fractions.
const PERCENTILE_FRACTIONS: [f64; 4] = [0.25, 0.50, 0.75, 0.95];

/// Interpolated percentiles of the inter-key interval, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingPercentiles {
    #[serde(rename = "25")]
    pub p25: f64,
    #[serde(rename = "50")]
    pub p50: f64,
    #[serde(rename = "75")]
    pub p75: f64,
    #[serde(rename = "95")]
    pub p95: f64,
}

/// Descriptive statistics of the inter-key interval, in milliseconds.
///
/// `median` is the middle element of the sorted samples (`sorted[n / 2]`),
/// while `percentiles.p50` interpolates between neighbours. The two differ
/// for an even number of samples and both are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingDistribution {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation
    pub std: f64,
    pub percentiles: TimingPercentiles,
}

/// Compute the timing distribution of an ordered keystroke sequence.
///
/// The first keystroke has no predecessor and is skipped, as is every
/// keystroke whose elapsed time is zero (no timing data). With no samples
/// left every figure is 0. All figures are rounded to two decimals.
pub fn timing_distribution(events: &[KeystrokeEvent]) -> TimingDistribution {
    let samples: Vec<f64> = events
        .iter()
        .skip(1)
        .map(|e| e.elapsed_ms)
        .filter(|&ms| ms > 0.0)
        .collect();

    distribution_of(samples)
}

/// Compute the distribution of a set of interval samples.
pub fn distribution_of(mut samples: Vec<f64>) -> TimingDistribution {
    if samples.is_empty() {
        return TimingDistribution::default();
    }

    samples.sort_by(|a, b| a.total_cmp(b));

    let mean = samples.iter().mean();
    let std = samples.iter().population_std_dev();
    let median = samples[samples.len() / 2];

    let [p25, p50, p75, p95] = PERCENTILE_FRACTIONS.map(|p| percentile(&samples, p));

    TimingDistribution {
        mean: round_to(mean, 2),
        median: round_to(median, 2),
        std: round_to(std, 2),
        percentiles: TimingPercentiles {
            p25: round_to(p25, 2),
            p50: round_to(p50, 2),
            p75: round_to(p75, 2),
            p95: round_to(p95, 2),
        },
    }
}

/// Linear interpolation between order statistics of sorted data.
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let k = (sorted.len() - 1) as f64 * fraction;
    let f = k.floor() as usize;
    let c = k - f as f64;

    match sorted.get(f + 1) {
        Some(next) => sorted[f] + c * (next - sorted[f]),
        None => sorted[f],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn events_with_elapsed(elapsed: &[f64]) -> Vec<KeystrokeEvent> {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut at = start;
        elapsed
            .iter()
            .map(|&ms| {
                at += Duration::milliseconds(ms as i64);
                KeystrokeEvent::new(at, "a", ms)
            })
            .collect()
    }

    fn all_zero(dist: &TimingDistribution) -> bool {
        *dist == TimingDistribution::default()
    }

    #[test]
    fn test_degenerate_inputs_are_all_zero() {
        assert!(all_zero(&timing_distribution(&[])));
        assert!(all_zero(&timing_distribution(&events_with_elapsed(&[120.0]))));
        assert!(all_zero(&timing_distribution(&events_with_elapsed(&[
            0.0, 0.0, 0.0
        ]))));
    }

    #[test]
    fn test_four_samples() {
        // The leading event is excluded, leaving [10, 20, 30, 40]
        let events = events_with_elapsed(&[0.0, 40.0, 10.0, 30.0, 20.0]);
        let dist = timing_distribution(&events);

        assert_eq!(dist.mean, 25.0);
        assert_eq!(dist.std, 11.18);
        assert_eq!(dist.median, 30.0);
        assert_eq!(dist.percentiles.p25, 17.5);
        assert_eq!(dist.percentiles.p50, 25.0);
        assert_eq!(dist.percentiles.p75, 32.5);
        assert_eq!(dist.percentiles.p95, 38.5);
    }

    #[test]
    fn test_first_event_excluded_even_when_nonzero() {
        let events = events_with_elapsed(&[1000.0, 50.0, 50.0]);
        let dist = timing_distribution(&events);

        assert_eq!(dist.mean, 50.0);
        assert_eq!(dist.std, 0.0);
    }

    #[test]
    fn test_zero_elapsed_filtered() {
        let events = events_with_elapsed(&[0.0, 100.0, 0.0, 300.0]);
        let dist = timing_distribution(&events);

        assert_eq!(dist.mean, 200.0);
        assert_eq!(dist.std, 100.0);
        assert_eq!(dist.median, 300.0);
        assert_eq!(dist.percentiles.p50, 200.0);
    }

    #[test]
    fn test_single_sample() {
        let dist = distribution_of(vec![42.424]);

        assert_eq!(dist.mean, 42.42);
        assert_eq!(dist.median, 42.42);
        assert_eq!(dist.std, 0.0);
        assert_eq!(dist.percentiles.p95, 42.42);
    }

    #[test]
    fn test_percentile_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 0.5), 3.0);
        assert_eq!(percentile(&sorted, 1.0), 5.0);
        assert!((percentile(&sorted, 0.95) - 4.8).abs() < 1e-9);
        assert_eq!(percentile(&[], 0.5), 0.0);
    }

    #[test]
    fn test_idempotent() {
        let events = events_with_elapsed(&[0.0, 180.0, 95.0, 0.0, 410.0, 62.5, 230.0]);
        let first = timing_distribution(&events);
        let second = timing_distribution(&events);
        assert_eq!(first, second);
    }

    #[test]
    fn test_serialized_percentile_keys() {
        let json = serde_json::to_value(distribution_of(vec![10.0, 20.0])).unwrap();
        let percentiles = json["percentiles"].as_object().unwrap();

        for key in ["25", "50", "75", "95"] {
            assert!(percentiles.contains_key(key), "missing key {key}");
        }
    }
}
