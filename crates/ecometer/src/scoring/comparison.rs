use super::{validate_amount, validate_household, ScoringError, COMMUNITY_AVERAGE};
use crate::config::DEFAULT_TARIFF_PER_UNIT;
use serde::{Deserialize, Serialize};

/// Share of the community average that efficient households use.
const EFFICIENT_SHARE: f64 = 0.7;

/// Where a reading sits relative to the community average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageRelation {
    Above,
    AtAverage,
    Below,
}

/// Reading compared against the fixed community figures.
///
/// `percentile` is a linear estimate around the average, not a statistical
/// rank: anything at or below the average reports 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonStats {
    pub your_usage: f64,
    pub community_avg: f64,
    pub difference: f64,
    pub difference_percent: f64,
    pub percentile: u8,
    pub efficient_households_avg: f64,
    pub potential_savings: f64,
    pub potential_savings_cost: f64,
}

impl ComparisonStats {
    pub fn relation(&self) -> UsageRelation {
        if self.difference > 0.0 {
            UsageRelation::Above
        } else if self.difference < 0.0 {
            UsageRelation::Below
        } else {
            UsageRelation::AtAverage
        }
    }

    pub fn headline(&self) -> String {
        match self.relation() {
            UsageRelation::Above => format!(
                "You're using {:.1}% more energy than the community average",
                self.difference_percent
            ),
            UsageRelation::Below => format!(
                "You're using {:.1}% less energy than the community average",
                self.difference_percent.abs()
            ),
            UsageRelation::AtAverage => {
                "You're using exactly the community average amount of energy".to_string()
            }
        }
    }
}

pub fn compute_comparison_stats(
    units: f64,
    household_size: u32,
) -> Result<ComparisonStats, ScoringError> {
    compare_against(
        units,
        household_size,
        COMMUNITY_AVERAGE,
        DEFAULT_TARIFF_PER_UNIT,
    )
}

pub(crate) fn compare_against(
    units: f64,
    household_size: u32,
    average: f64,
    tariff_per_unit: f64,
) -> Result<ComparisonStats, ScoringError> {
    validate_amount("units", units)?;
    // household size does not change the community figures, but a zero
    // household is still out of domain
    validate_household(household_size)?;

    let difference = units - average;
    let relative = difference / average;
    let percentile = (50.0 + 50.0 * (1.0 - relative)).round().clamp(0.0, 100.0) as u8;
    let efficient_households_avg = average * EFFICIENT_SHARE;
    let potential_savings = (units - efficient_households_avg).max(0.0);

    Ok(ComparisonStats {
        your_usage: units,
        community_avg: average,
        difference,
        difference_percent: (relative * 1000.0).round() / 10.0,
        percentile,
        efficient_households_avg,
        potential_savings,
        potential_savings_cost: potential_savings * tariff_per_unit,
    })
}
