use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::UsageEntry;

const HEADERS: [&str; 5] = [
    "Month",
    "Usage (kWh)",
    "Bill (PKR)",
    "Rate (PKR/kWh)",
    "vs Avg",
];

#[derive(Debug, Serialize)]
struct HistoryRow<'a> {
    #[serde(rename = "Month")]
    month: &'a str,
    #[serde(rename = "Usage (kWh)")]
    units: f64,
    #[serde(rename = "Bill (PKR)")]
    bill: f64,
    #[serde(rename = "Rate (PKR/kWh)")]
    rate: Option<f64>,
    #[serde(rename = "vs Avg")]
    versus_average: String,
}

impl<'a> HistoryRow<'a> {
    fn from_entry(entry: &'a UsageEntry, community_average: f64) -> Self {
        let rate = (entry.units > 0.0).then(|| round_to(entry.bill / entry.units, 2));
        let versus = round_to((entry.units - community_average) / community_average * 100.0, 1);

        Self {
            month: &entry.month,
            units: entry.units,
            bill: entry.bill,
            rate,
            versus_average: format!("{versus:.1}%"),
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Streams the usage history as CSV, one row per month.
pub fn write_history_csv<W: Write>(
    writer: W,
    history: &[UsageEntry],
    community_average: f64,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if history.is_empty() {
        csv_writer.write_record(HEADERS)?;
    }
    for entry in history {
        csv_writer.serialize(HistoryRow::from_entry(entry, community_average))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn history_csv(history: &[UsageEntry], community_average: f64) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_history_csv(&mut buffer, history, community_average)?;
    String::from_utf8(buffer).map_err(|err| csv::Error::from(std::io::Error::other(err)))
}

pub fn export_filename(today: NaiveDate) -> String {
    format!("ecometer_usage_history_{}.csv", today.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(month: &str, units: f64, bill: f64) -> UsageEntry {
        UsageEntry {
            month: month.to_string(),
            units,
            bill,
            bill_image: None,
        }
    }

    #[test]
    fn csv_includes_rate_and_comparison_columns() {
        let history = vec![entry("Aug 2024", 280.0, 6580.0), entry("Sep 2024", 0.0, 0.0)];

        let csv = history_csv(&history, 300.0).expect("csv renders");
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Month,Usage (kWh),Bill (PKR),Rate (PKR/kWh),vs Avg"
        );
        assert_eq!(lines[1], "Aug 2024,280.0,6580.0,23.5,-6.7%");
        assert_eq!(lines[2], "Sep 2024,0.0,0.0,,-100.0%");
    }

    #[test]
    fn empty_history_still_has_headers() {
        let csv = history_csv(&[], 300.0).expect("csv renders");
        assert_eq!(
            csv.trim_end(),
            "Month,Usage (kWh),Bill (PKR),Rate (PKR/kWh),vs Avg"
        );
    }

    #[test]
    fn filename_carries_export_date() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 9).expect("valid date");
        assert_eq!(export_filename(today), "ecometer_usage_history_20250109.csv");
    }
}
