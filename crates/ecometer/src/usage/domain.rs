use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Month labels look like `Oct 2024`.
pub const MONTH_LABEL_FORMAT: &str = "%b %Y";

pub fn month_label(at: NaiveDateTime) -> String {
    at.format(MONTH_LABEL_FORMAT).to_string()
}

/// Household the usage belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub household_size: u32,
    pub location: String,
    pub joined_date: NaiveDate,
}

/// Completed billing period, keyed by its month label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEntry {
    pub month: String,
    pub units: f64,
    pub bill: f64,
    #[serde(default)]
    pub bill_image: Option<String>,
}

/// In-progress period holding the most recent submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentMonth {
    pub units: f64,
    pub bill: f64,
    #[serde(default, with = "upload_timestamp")]
    pub date_uploaded: Option<NaiveDateTime>,
    #[serde(default)]
    pub bill_image: Option<String>,
}

/// Everything persisted for the single tracked user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageDocument {
    pub user: UserProfile,
    #[serde(default)]
    pub usage_history: Vec<UsageEntry>,
    #[serde(default)]
    pub current_month: CurrentMonth,
    #[serde(default)]
    pub eco_score: u8,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub challenges_completed: u32,
}

impl UsageDocument {
    /// Demo document handed out before anything has been persisted.
    pub fn seed(joined_date: NaiveDate) -> Self {
        let history = [
            ("Aug 2024", 280.0, 6580.0),
            ("Sep 2024", 295.0, 6932.0),
            ("Oct 2024", 290.0, 6815.0),
        ];

        Self {
            user: UserProfile {
                name: "Hania".to_string(),
                household_size: 4,
                location: "Lahore".to_string(),
                joined_date,
            },
            usage_history: history
                .into_iter()
                .map(|(month, units, bill)| UsageEntry {
                    month: month.to_string(),
                    units,
                    bill,
                    bill_image: None,
                })
                .collect(),
            current_month: CurrentMonth::default(),
            eco_score: 0,
            achievements: Vec::new(),
            challenges_completed: 0,
        }
    }

    pub fn entry(&self, month: &str) -> Option<&UsageEntry> {
        self.usage_history.iter().find(|entry| entry.month == month)
    }

    pub fn months_tracked(&self) -> usize {
        self.usage_history.len()
    }

    /// Insert-or-update keyed on the month label. Returns `true` when a new
    /// entry was appended.
    pub fn upsert_entry(&mut self, entry: UsageEntry) -> bool {
        match self
            .usage_history
            .iter_mut()
            .find(|existing| existing.month == entry.month)
        {
            Some(existing) => {
                existing.units = entry.units;
                existing.bill = entry.bill;
                existing.bill_image = entry.bill_image;
                false
            }
            None => {
                self.usage_history.push(entry);
                true
            }
        }
    }

    /// Units a caller should treat as "this month": the pending reading when
    /// one exists, otherwise the latest completed period.
    pub fn effective_units(&self) -> Option<f64> {
        if self.current_month.units > 0.0 {
            Some(self.current_month.units)
        } else {
            self.usage_history.last().map(|entry| entry.units)
        }
    }

    /// Checks the invariants a loaded document must hold.
    pub fn validate(&self) -> Result<(), String> {
        if self.user.household_size == 0 {
            return Err("user.household_size must be at least 1".to_string());
        }
        if self.eco_score > 100 {
            return Err(format!("eco_score {} exceeds 100", self.eco_score));
        }

        let mut seen = HashSet::new();
        for entry in &self.usage_history {
            if !seen.insert(entry.month.as_str()) {
                return Err(format!("duplicate usage entry for {}", entry.month));
            }
            check_amount(&entry.month, "units", entry.units)?;
            check_amount(&entry.month, "bill", entry.bill)?;
        }

        check_amount("current_month", "units", self.current_month.units)?;
        check_amount("current_month", "bill", self.current_month.bill)?;
        Ok(())
    }
}

fn check_amount(scope: &str, field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{scope}.{field} must be a non-negative number"))
    }
}

mod upload_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub(super) fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(at) => serializer.serialize_str(&at.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|value| {
            NaiveDateTime::parse_from_str(value.trim(), FORMAT).map_err(|err| {
                serde::de::Error::custom(format!(
                    "failed to parse '{value}' as YYYY-MM-DD HH:MM:SS ({err})"
                ))
            })
        })
        .transpose()
    }
}
