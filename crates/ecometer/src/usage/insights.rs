use serde::Serialize;

use super::domain::{UsageDocument, UsageEntry};

/// Typical split of household consumption, used for the estimated breakdown.
const APPLIANCE_SHARES: [(&str, f64); 7] = [
    ("Air Conditioning", 0.40),
    ("Refrigerator", 0.15),
    ("Lighting", 0.12),
    ("Water Heater", 0.10),
    ("Washing Machine", 0.08),
    ("TV & Entertainment", 0.07),
    ("Other Appliances", 0.08),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

impl TrendDirection {
    pub fn label(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthHighlight {
    pub month: String,
    pub units: f64,
}

impl From<&UsageEntry> for MonthHighlight {
    fn from(entry: &UsageEntry) -> Self {
        Self {
            month: entry.month.clone(),
            units: entry.units,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplianceShare {
    pub appliance: &'static str,
    pub units: f64,
}

/// Figures shown on the statistics view. Fields are `None` when the history
/// is too short to support them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageInsights {
    pub months_tracked: usize,
    pub effective_units: Option<f64>,
    pub monthly_trend: Option<f64>,
    pub change_vs_last_month_pct: Option<f64>,
    pub overall_average: Option<f64>,
    pub recent_average: Option<f64>,
    pub trend_direction: Option<TrendDirection>,
    pub best_month: Option<MonthHighlight>,
    pub highest_month: Option<MonthHighlight>,
    pub estimated_bill: Option<f64>,
    pub appliance_breakdown: Vec<ApplianceShare>,
}

impl UsageInsights {
    pub fn from_document(document: &UsageDocument, tariff_per_unit: f64) -> Self {
        let history = &document.usage_history;
        let months_tracked = history.len();
        let effective_units = document.effective_units();

        let monthly_trend = match history.as_slice() {
            [.., previous, latest] => Some(latest.units - previous.units),
            _ => None,
        };

        // current reading against the last completed month
        let change_vs_last_month_pct = history.last().and_then(|last| {
            let current = document.current_month.units;
            (current > 0.0 && last.units > 0.0)
                .then(|| (current - last.units) / last.units * 100.0)
        });

        let overall_average = average(history.iter());
        let (recent_average, trend_direction) = if months_tracked >= 3 {
            let recent = average(history[months_tracked - 3..].iter());
            let direction = match (recent, overall_average) {
                (Some(recent), Some(overall)) if recent > overall => TrendDirection::Increasing,
                _ => TrendDirection::Decreasing,
            };
            (recent, Some(direction))
        } else {
            (None, None)
        };

        let (best_month, highest_month) = if months_tracked >= 2 {
            (
                history
                    .iter()
                    .min_by(|a, b| a.units.total_cmp(&b.units))
                    .map(MonthHighlight::from),
                // earliest month wins ties, like `best_month`
                history
                    .iter()
                    .rev()
                    .max_by(|a, b| a.units.total_cmp(&b.units))
                    .map(MonthHighlight::from),
            )
        } else {
            (None, None)
        };

        let appliance_breakdown = effective_units
            .map(|total| {
                APPLIANCE_SHARES
                    .iter()
                    .map(|&(appliance, share)| ApplianceShare {
                        appliance,
                        units: total * share,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            months_tracked,
            effective_units,
            monthly_trend,
            change_vs_last_month_pct,
            overall_average,
            recent_average,
            trend_direction,
            best_month,
            highest_month,
            estimated_bill: effective_units.map(|units| units * tariff_per_unit),
            appliance_breakdown,
        }
    }
}

fn average<'a>(entries: impl Iterator<Item = &'a UsageEntry>) -> Option<f64> {
    let (total, count) = entries.fold((0.0, 0usize), |(total, count), entry| {
        (total + entry.units, count + 1)
    });
    (count > 0).then(|| total / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn seed() -> UsageDocument {
        UsageDocument::seed(NaiveDate::from_ymd_opt(2024, 8, 1).expect("valid date"))
    }

    #[test]
    fn seed_history_trends_down() {
        let insights = UsageInsights::from_document(&seed(), 23.5);

        assert_eq!(insights.months_tracked, 3);
        assert_eq!(insights.effective_units, Some(290.0));
        assert_eq!(insights.monthly_trend, Some(-5.0));
        assert_eq!(insights.change_vs_last_month_pct, None);
        assert_eq!(insights.overall_average, Some(865.0 / 3.0));
        assert_eq!(insights.trend_direction, Some(TrendDirection::Decreasing));
        assert_eq!(insights.best_month.map(|m| m.month), Some("Aug 2024".to_string()));
        assert_eq!(
            insights.highest_month.map(|m| m.month),
            Some("Sep 2024".to_string())
        );
        assert_eq!(insights.estimated_bill, Some(290.0 * 23.5));
    }

    #[test]
    fn pending_reading_compares_against_last_month() {
        let mut document = seed();
        document.current_month.units = 319.0;

        let insights = UsageInsights::from_document(&document, 23.5);

        let change = insights.change_vs_last_month_pct.expect("change available");
        assert!((change - 10.0).abs() < 1e-9);
        assert_eq!(insights.effective_units, Some(319.0));
    }

    #[test]
    fn breakdown_covers_every_unit() {
        let insights = UsageInsights::from_document(&seed(), 23.5);

        assert_eq!(insights.appliance_breakdown.len(), APPLIANCE_SHARES.len());
        let total: f64 = insights.appliance_breakdown.iter().map(|s| s.units).sum();
        assert!((total - 290.0).abs() < 1e-9);
        assert_eq!(insights.appliance_breakdown[0].appliance, "Air Conditioning");
        assert!((insights.appliance_breakdown[0].units - 116.0).abs() < 1e-9);
    }

    #[test]
    fn short_history_leaves_figures_empty() {
        let mut document = seed();
        document.usage_history.truncate(1);

        let insights = UsageInsights::from_document(&document, 23.5);

        assert_eq!(insights.monthly_trend, None);
        assert_eq!(insights.recent_average, None);
        assert_eq!(insights.trend_direction, None);
        assert_eq!(insights.best_month, None);
        assert_eq!(insights.highest_month, None);

        document.usage_history.clear();
        let empty = UsageInsights::from_document(&document, 23.5);
        assert_eq!(empty.effective_units, None);
        assert!(empty.appliance_breakdown.is_empty());
        assert_eq!(empty.estimated_bill, None);
    }

    #[test]
    fn highest_month_prefers_earliest_tie() {
        let mut document = seed();
        document.usage_history[0].units = 295.0;

        let insights = UsageInsights::from_document(&document, 23.5);

        assert_eq!(
            insights.highest_month.map(|m| m.month),
            Some("Aug 2024".to_string())
        );
    }
}
