use super::{validate_amount, validate_household, BonusSource, ScoringError};
use super::{MAX_BONUS, PER_PERSON_BASELINE};
use serde::{Deserialize, Serialize};

/// Scores `units` against the default per-person baseline.
pub fn compute_eco_score(
    units: f64,
    household_size: u32,
    bonus: &dyn BonusSource,
) -> Result<u8, ScoringError> {
    score_against_baseline(units, household_size, PER_PERSON_BASELINE, MAX_BONUS, bonus)
}

pub(crate) fn score_against_baseline(
    units: f64,
    household_size: u32,
    per_person_baseline: f64,
    max_bonus: u8,
    bonus: &dyn BonusSource,
) -> Result<u8, ScoringError> {
    validate_amount("units", units)?;
    validate_household(household_size)?;

    let expected = per_person_baseline * f64::from(household_size);
    let efficient = expected * 0.7;
    let heavy = expected * 1.3;
    let band_width = expected * 0.3;

    let score = if units <= efficient {
        95.0 + f64::from(bonus.draw(max_bonus).min(max_bonus))
    } else if units <= expected {
        // 80 at `expected`, climbing towards 95 at `efficient`
        let progress = ((expected - units) / band_width).min(1.0);
        80.0 + (15.0 * progress).floor()
    } else if units <= heavy {
        let progress = ((units - expected) / band_width).min(1.0);
        60.0 + (20.0 * (1.0 - progress)).floor()
    } else {
        (60.0 - (30.0 * (units - heavy) / expected).floor()).max(30.0)
    };

    Ok(score.clamp(0.0, 100.0) as u8)
}

/// Human-facing rating for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Exceptional,
    Excellent,
    Good,
    Fair,
    NeedsAttention,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Self::Exceptional,
            80..=89 => Self::Excellent,
            70..=79 => Self::Good,
            50..=69 => Self::Fair,
            _ => Self::NeedsAttention,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Exceptional => "Exceptional",
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::NeedsAttention => "Needs attention",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Exceptional => "You're in the top 10% of efficient users",
            Self::Excellent => "Better than 80% of households",
            Self::Good => "Above average efficiency",
            Self::Fair => "Room for improvement",
            Self::NeedsAttention => "High consumption detected",
        }
    }

    /// One-line follow-up shown right after a bill is recorded.
    pub fn tip(&self) -> &'static str {
        match self {
            Self::Exceptional | Self::Excellent => {
                "Share your energy-saving strategies with the community to inspire others!"
            }
            Self::Good => {
                "Try reducing AC usage by 30 minutes daily to boost your score by ~8 points."
            }
            Self::Fair => {
                "Unplug devices when not in use and switch to energy-efficient appliances."
            }
            Self::NeedsAttention => {
                "Check for faulty appliances and consider a home energy audit."
            }
        }
    }
}
