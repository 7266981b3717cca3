//! prodly-analysis: vendor lock-in, migration and exit-readiness analyzers.
//!
//! Thin consumers of prodly-core. Each analyzer owns its own graph and/or
//! ordered index and layers a vocabulary on top:
//! - [`LockInAnalyzer`]: vendor records plus a vendor dependency graph.
//! - [`MigrationPlanner`]: migration tasks sequenced by topological order.
//! - [`ExitReadinessDashboard`]: readiness scores in an ordered index and
//!   exit-stage transitions walked with Dijkstra.
//!
//! Scoring constants come from [`ScoringConfig`].

pub mod config;
mod error;
pub mod lockin;
pub mod logging;
pub mod migration;
pub mod readiness;

pub use config::{LockInWeights, MigrationWeights, ReadinessWeights, ScoringConfig};
pub use error::{AnalysisError, Result};
pub use lockin::{LockInAnalyzer, VendorProfile, VendorRecord};
pub use migration::{MigrationPlanner, MigrationTask, TaskPriority};
pub use readiness::{
    ExitPath, ExitReadinessDashboard, ExitStage, ReadinessBreakdown, VendorMetrics,
};

/// The three analyzers built from one scoring config.
#[derive(Debug, Clone)]
pub struct Analyzers {
    pub lock_in: LockInAnalyzer,
    pub migration: MigrationPlanner,
    pub readiness: ExitReadinessDashboard,
}

impl Analyzers {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            lock_in: LockInAnalyzer::with_weights(config.lock_in.clone()),
            migration: MigrationPlanner::with_weights(config.migration.clone()),
            readiness: ExitReadinessDashboard::with_weights(config.readiness.clone()),
        }
    }

    /// Feed a vendor's lock-in score and the current migration difficulty
    /// into the dashboard, together with the remaining qualitative inputs.
    pub fn assess_exit(
        &mut self,
        vendor_id: &str,
        data_export_capability: f64,
        contract_flexibility: f64,
        technical_complexity: f64,
    ) -> Result<f64> {
        let lock_in_score = self
            .lock_in
            .lock_in_score(vendor_id)
            .ok_or_else(|| AnalysisError::UnknownVendor(vendor_id.to_string()))?;
        let migration_difficulty = self.migration.difficulty_score()?;

        self.readiness.add_vendor_metrics(VendorMetrics {
            vendor_id: vendor_id.to_string(),
            lock_in_score,
            migration_difficulty,
            data_export_capability,
            contract_flexibility,
            technical_complexity,
        })
    }
}

impl Default for Analyzers {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}
