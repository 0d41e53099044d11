//! EcoScore computation and the statistics derived from it.
//!
//! Everything here is a pure function of (units, household size) plus the
//! injected [`BonusSource`] that drives the randomized top-band bonus.

mod achievements;
mod advice;
mod bands;
mod bonus;
mod comparison;

#[cfg(test)]
mod tests;

pub use achievements::{achievements_for, Achievement, Badge};
pub use advice::suggestions_for;
pub use bands::{compute_eco_score, ScoreBand};
pub use bonus::{bonus_source, BonusSource, FixedBonus, RandomBonus, SeededBonus};
pub use comparison::{compute_comparison_stats, ComparisonStats, UsageRelation};

use crate::config::DEFAULT_TARIFF_PER_UNIT;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Expected monthly units per household member.
pub const PER_PERSON_BASELINE: f64 = 75.0;
/// Fixed community average used for every comparison.
pub const COMMUNITY_AVERAGE: f64 = 300.0;
/// Upper bound of the top-band bonus.
pub const MAX_BONUS: u8 = 5;

/// Tunables for the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub per_person_baseline: f64,
    pub community_average: f64,
    pub max_bonus: u8,
    pub tariff_per_unit: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            per_person_baseline: PER_PERSON_BASELINE,
            community_average: COMMUNITY_AVERAGE,
            max_bonus: MAX_BONUS,
            tariff_per_unit: DEFAULT_TARIFF_PER_UNIT,
        }
    }
}

/// Raised when callers hand the engine values outside its domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid input: {field} {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

pub(crate) fn validate_amount(field: &'static str, value: f64) -> Result<(), ScoringError> {
    if !value.is_finite() {
        return Err(ScoringError::InvalidInput {
            field,
            reason: "must be a finite number".to_string(),
        });
    }
    if value < 0.0 {
        return Err(ScoringError::InvalidInput {
            field,
            reason: format!("must not be negative (got {value})"),
        });
    }
    Ok(())
}

pub(crate) fn validate_household(household_size: u32) -> Result<(), ScoringError> {
    if household_size == 0 {
        return Err(ScoringError::InvalidInput {
            field: "household_size",
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Stateless evaluator bundling the scoring configuration and bonus source.
#[derive(Clone)]
pub struct EcoScoreEngine {
    config: ScoringConfig,
    bonus: Arc<dyn BonusSource>,
}

impl EcoScoreEngine {
    pub fn new(config: ScoringConfig, bonus: Arc<dyn BonusSource>) -> Self {
        Self { config, bonus }
    }

    pub fn with_bonus(bonus: Arc<dyn BonusSource>) -> Self {
        Self::new(ScoringConfig::default(), bonus)
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, units: f64, household_size: u32) -> Result<u8, ScoringError> {
        bands::score_against_baseline(
            units,
            household_size,
            self.config.per_person_baseline,
            self.config.max_bonus,
            self.bonus.as_ref(),
        )
    }

    pub fn comparison(
        &self,
        units: f64,
        household_size: u32,
    ) -> Result<ComparisonStats, ScoringError> {
        comparison::compare_against(
            units,
            household_size,
            self.config.community_average,
            self.config.tariff_per_unit,
        )
    }

    pub fn suggestions(&self, eco_score: u8, units: f64) -> Vec<String> {
        suggestions_for(eco_score, units, self.config.community_average)
    }

    /// Scores a reading and gathers everything a caller renders next to it.
    pub fn evaluate(
        &self,
        units: f64,
        household_size: u32,
        months_tracked: usize,
    ) -> Result<ScoreReport, ScoringError> {
        let eco_score = self.score(units, household_size)?;
        let comparison = self.comparison(units, household_size)?;
        let band = ScoreBand::from_score(eco_score);

        Ok(ScoreReport {
            eco_score,
            band,
            band_label: band.label(),
            comparison,
            suggestions: self.suggestions(eco_score, units),
            achievements: achievements_for(eco_score, months_tracked),
        })
    }
}

impl std::fmt::Debug for EcoScoreEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcoScoreEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Score plus derived statistics for a single reading.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub eco_score: u8,
    pub band: ScoreBand,
    pub band_label: &'static str,
    pub comparison: ComparisonStats,
    pub suggestions: Vec<String>,
    pub achievements: Vec<Achievement>,
}
