use crate::scoring::{compute_comparison_stats, UsageRelation};

#[test]
fn average_usage_has_no_difference() {
    for household_size in [1, 2, 4, 9] {
        let stats = compute_comparison_stats(300.0, household_size).expect("valid input");
        assert_eq!(stats.difference, 0.0);
        assert_eq!(stats.difference_percent, 0.0);
        assert_eq!(stats.percentile, 100);
        assert_eq!(stats.relation(), UsageRelation::AtAverage);
    }
}

#[test]
fn efficient_usage_has_no_potential_savings() {
    for units in [0.0, 100.0, 209.5, 210.0] {
        let stats = compute_comparison_stats(units, 4).expect("valid input");
        assert_eq!(stats.potential_savings, 0.0, "units {units}");
        assert_eq!(stats.potential_savings_cost, 0.0);
    }
}

#[test]
fn heavy_usage_reports_savings_and_percentile() {
    let stats = compute_comparison_stats(450.0, 4).expect("valid input");

    assert_eq!(stats.community_avg, 300.0);
    assert_eq!(stats.difference, 150.0);
    assert_eq!(stats.difference_percent, 50.0);
    assert_eq!(stats.percentile, 75);
    assert_eq!(stats.efficient_households_avg, 210.0);
    assert_eq!(stats.potential_savings, 240.0);
    assert!((stats.potential_savings_cost - 5_640.0).abs() < 1e-9);
    assert_eq!(stats.relation(), UsageRelation::Above);
    assert!(stats.headline().contains("50.0% more"));
}

#[test]
fn percentile_is_clamped() {
    let light = compute_comparison_stats(0.0, 2).expect("valid input");
    assert_eq!(light.percentile, 100);

    let extreme = compute_comparison_stats(1_200.0, 2).expect("valid input");
    assert_eq!(extreme.percentile, 0);
}

#[test]
fn difference_percent_is_rounded_to_one_decimal() {
    let stats = compute_comparison_stats(290.0, 4).expect("valid input");
    assert_eq!(stats.difference_percent, -3.3);
    assert!(stats.headline().contains("3.3% less"));
}

#[test]
fn rejects_negative_usage() {
    assert!(compute_comparison_stats(-5.0, 4).is_err());
    assert!(compute_comparison_stats(100.0, 0).is_err());
}
