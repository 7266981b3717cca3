//! Scoring constants for the three analyzers.
//!
//! Every cap and normalizer is a named setting with a default, so the
//! formulas can be tuned without code changes. Loaded from JSON; missing
//! fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Caps (maximum points) and normalizers for the lock-in score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockInWeights {
    pub contract_value_cap: f64,
    /// Points awarded per `contract_value_unit` of contract value.
    pub contract_value_points_per_unit: f64,
    pub contract_value_unit: f64,
    pub duration_cap: f64,
    /// Contract length that earns the full duration cap.
    pub duration_full_months: f64,
    pub data_volume_cap: f64,
    pub data_volume_full_gb: f64,
    pub api_cap: f64,
    pub api_full_count: f64,
    pub custom_integration_points: f64,
    pub switching_cost_cap: f64,
}

impl Default for LockInWeights {
    fn default() -> Self {
        Self {
            contract_value_cap: 25.0,
            contract_value_points_per_unit: 5.0,
            contract_value_unit: 1_000_000.0,
            duration_cap: 20.0,
            duration_full_months: 36.0,
            data_volume_cap: 15.0,
            data_volume_full_gb: 1000.0,
            api_cap: 15.0,
            api_full_count: 10.0,
            custom_integration_points: 10.0,
            switching_cost_cap: 15.0,
        }
    }
}

/// Caps and normalizers for the migration difficulty score and task priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationWeights {
    pub time_cap: f64,
    pub time_full_days: f64,
    pub task_count_cap: f64,
    pub task_count_full: f64,
    pub critical_path_cap: f64,
    pub critical_path_full: f64,
    pub priority_per_difficulty: u32,
    pub priority_per_dependency: u32,
}

impl Default for MigrationWeights {
    fn default() -> Self {
        Self {
            time_cap: 40.0,
            time_full_days: 180.0,
            task_count_cap: 30.0,
            task_count_full: 20.0,
            critical_path_cap: 30.0,
            critical_path_full: 15.0,
            priority_per_difficulty: 10,
            priority_per_dependency: 5,
        }
    }
}

/// Factor weights for exit readiness and multipliers for exit-stage costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessWeights {
    pub lock_in: f64,
    pub migration: f64,
    pub data_export: f64,
    pub contract_flexibility: f64,
    pub technical: f64,
    /// preparation -> migration cost, as a fraction of migration difficulty.
    pub migration_stage_factor: f64,
    /// migration -> exited cost, as a fraction of the lock-in score.
    pub exit_stage_factor: f64,
}

impl Default for ReadinessWeights {
    fn default() -> Self {
        Self {
            lock_in: 0.30,
            migration: 0.25,
            data_export: 0.20,
            contract_flexibility: 0.15,
            technical: 0.10,
            migration_stage_factor: 0.7,
            exit_stage_factor: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub lock_in: LockInWeights,
    pub migration: MigrationWeights,
    pub readiness: ReadinessWeights,
}

impl ScoringConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ScoringConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject negative or non-finite constants, and zero normalizers that
    /// would be used as divisors.
    pub fn validate(&self) -> Result<()> {
        let l = &self.lock_in;
        let m = &self.migration;
        let r = &self.readiness;

        let non_negative = [
            ("lock_in.contract_value_cap", l.contract_value_cap),
            (
                "lock_in.contract_value_points_per_unit",
                l.contract_value_points_per_unit,
            ),
            ("lock_in.duration_cap", l.duration_cap),
            ("lock_in.data_volume_cap", l.data_volume_cap),
            ("lock_in.api_cap", l.api_cap),
            ("lock_in.custom_integration_points", l.custom_integration_points),
            ("lock_in.switching_cost_cap", l.switching_cost_cap),
            ("migration.time_cap", m.time_cap),
            ("migration.task_count_cap", m.task_count_cap),
            ("migration.critical_path_cap", m.critical_path_cap),
            ("readiness.lock_in", r.lock_in),
            ("readiness.migration", r.migration),
            ("readiness.data_export", r.data_export),
            ("readiness.contract_flexibility", r.contract_flexibility),
            ("readiness.technical", r.technical),
            ("readiness.migration_stage_factor", r.migration_stage_factor),
            ("readiness.exit_stage_factor", r.exit_stage_factor),
        ];
        for (field, value) in non_negative {
            check(field, value, false)?;
        }

        let divisors = [
            ("lock_in.contract_value_unit", l.contract_value_unit),
            ("lock_in.duration_full_months", l.duration_full_months),
            ("lock_in.data_volume_full_gb", l.data_volume_full_gb),
            ("lock_in.api_full_count", l.api_full_count),
            ("migration.time_full_days", m.time_full_days),
            ("migration.task_count_full", m.task_count_full),
            ("migration.critical_path_full", m.critical_path_full),
        ];
        for (field, value) in divisors {
            check(field, value, true)?;
        }

        Ok(())
    }
}

fn check(field: &str, value: f64, strictly_positive: bool) -> Result<()> {
    let reason = if !value.is_finite() {
        Some(format!("must be finite, got {}", value))
    } else if strictly_positive && value <= 0.0 {
        Some(format!("must be positive, got {}", value))
    } else if value < 0.0 {
        Some(format!("must be non-negative, got {}", value))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(AnalysisError::InvalidConfig {
            field: field.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// `value / full * cap`, clamped to at most `cap`.
pub(crate) fn scaled(value: f64, full: f64, cap: f64) -> f64 {
    (value / full * cap).min(cap)
}

pub(crate) fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}
