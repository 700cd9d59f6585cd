// Usage Aggregation Module
//
// Turns raw per-app foreground-time samples from the device usage source
// into the summarized report shown to parents. Stateless and purely
// functional; safe to call concurrently.

use safekids_common::types::{UsageReport, UsageSample};
use tracing::debug;

const MS_PER_MINUTE: i64 = 60_000;

/// Summarize one batch of usage samples.
///
/// Single pass over the input: samples with zero or negative foreground
/// time are dropped, everything else is kept in input order and counted
/// toward the total. Minutes are a truncating division of the millisecond
/// sum. Duplicate package names are not merged; a source that reports
/// per-app totals already merged upstream stays merged, anything else is
/// listed as supplied.
pub fn aggregate<I>(samples: I) -> UsageReport
where
    I: IntoIterator<Item = UsageSample>,
{
    let mut total_ms: i64 = 0;
    let mut per_app = Vec::new();

    for sample in samples {
        if sample.foreground_time_ms <= 0 {
            continue;
        }
        total_ms += sample.foreground_time_ms;
        per_app.push(sample);
    }

    let report = UsageReport { total_minutes: total_ms / MS_PER_MINUTE, per_app };
    debug!(
        "Aggregated {} usage samples into {} minutes",
        report.per_app.len(),
        report.total_minutes
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_zero_report() {
        let report = aggregate(Vec::new());
        assert_eq!(report.total_minutes, 0);
        assert!(report.per_app.is_empty());
    }

    #[test]
    fn test_zero_time_samples_excluded() {
        let report = aggregate(vec![
            UsageSample::new("com.example.idle", 0),
            UsageSample::new("com.example.game", 120_000),
        ]);

        assert_eq!(report.total_minutes, 2);
        assert_eq!(report.per_app, vec![UsageSample::new("com.example.game", 120_000)]);
    }

    #[test]
    fn test_negative_time_samples_excluded() {
        let report = aggregate(vec![UsageSample::new("com.example.clock_skew", -5_000)]);
        assert_eq!(report.total_minutes, 0);
        assert!(report.per_app.is_empty());
    }

    #[test]
    fn test_all_filtered_yields_zero_report() {
        let report = aggregate(vec![
            UsageSample::new("a", 0),
            UsageSample::new("b", -1),
        ]);
        assert_eq!(report, UsageReport::default());
    }

    #[test]
    fn test_minutes_truncate() {
        // 179,999 ms is 2.999... minutes, reported as 2.
        let report = aggregate(vec![UsageSample::new("com.example.video", 179_999)]);
        assert_eq!(report.total_minutes, 2);
    }

    #[test]
    fn test_total_sums_across_apps() {
        let report = aggregate(vec![
            UsageSample::new("com.example.video", 90_000),
            UsageSample::new("com.example.game", 45_000),
            UsageSample::new("com.example.chat", 45_000),
        ]);

        // 180,000 ms total even though no single app reaches 2 minutes.
        assert_eq!(report.total_minutes, 3);
        assert_eq!(report.per_app.len(), 3);
    }

    #[test]
    fn test_input_order_preserved() {
        let report = aggregate(vec![
            UsageSample::new("z.last.alphabetically", 60_000),
            UsageSample::new("a.first.alphabetically", 60_000),
        ]);

        assert_eq!(report.per_app[0].package_name, "z.last.alphabetically");
        assert_eq!(report.per_app[1].package_name, "a.first.alphabetically");
    }

    #[test]
    fn test_duplicate_packages_not_merged() {
        let report = aggregate(vec![
            UsageSample::new("com.example.game", 60_000),
            UsageSample::new("com.example.game", 60_000),
        ]);

        assert_eq!(report.per_app.len(), 2);
        assert_eq!(report.total_minutes, 2);
    }
}
