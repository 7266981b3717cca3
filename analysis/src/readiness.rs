use std::collections::HashMap;
use std::fmt;

use prodly_core::{OrderedIndex, WeightedGraph};

use crate::config::{clamp_score, ReadinessWeights};
use crate::error::{AnalysisError, Result};

/// Inputs for one vendor's exit readiness. All scores are on a 0-100 scale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorMetrics {
    pub vendor_id: String,
    pub lock_in_score: f64,
    pub migration_difficulty: f64,
    pub data_export_capability: f64,
    pub contract_flexibility: f64,
    pub technical_complexity: f64,
}

/// Per-factor contributions to the readiness score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReadinessBreakdown {
    pub overall: f64,
    pub lock_in_factor: f64,
    pub migration_factor: f64,
    pub data_export_factor: f64,
    pub contract_factor: f64,
    pub technical_factor: f64,
}

/// Stages a vendor passes through on the way out, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitStage {
    Planning,
    Preparation,
    Migration,
    Exited,
}

impl ExitStage {
    pub const ALL: [ExitStage; 4] = [
        ExitStage::Planning,
        ExitStage::Preparation,
        ExitStage::Migration,
        ExitStage::Exited,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExitStage::Planning => "planning",
            ExitStage::Preparation => "preparation",
            ExitStage::Migration => "migration",
            ExitStage::Exited => "exited",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.as_str() == s)
    }
}

impl fmt::Display for ExitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cheapest route from a vendor to an exit stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitPath {
    /// The vendor id followed by the stage names passed through.
    pub steps: Vec<String>,
    pub total_cost: f64,
}

#[derive(Debug, Clone)]
struct ReadinessEntry {
    metrics: VendorMetrics,
    breakdown: ReadinessBreakdown,
}

/// Exit readiness across a vendor portfolio.
///
/// Owns its metrics table; nothing is shared between dashboards. Readiness
/// scores are kept in an [`OrderedIndex`] keyed by vendor id, and each vendor
/// gets a chain of exit-stage vertices in a directed graph whose edge weights
/// are transition costs.
#[derive(Debug, Clone)]
pub struct ExitReadinessDashboard {
    weights: ReadinessWeights,
    metrics: HashMap<String, ReadinessEntry>,
    scores: OrderedIndex,
    exit_graph: WeightedGraph,
}

impl ExitReadinessDashboard {
    pub fn new() -> Self {
        Self::with_weights(ReadinessWeights::default())
    }

    pub fn with_weights(weights: ReadinessWeights) -> Self {
        Self {
            weights,
            metrics: HashMap::new(),
            scores: OrderedIndex::new(),
            exit_graph: WeightedGraph::directed(),
        }
    }

    /// Register a vendor and return its readiness score.
    ///
    /// A vendor can be registered once: its exit-stage edges cannot be
    /// removed, so re-registration would leave stale transition costs behind.
    /// Every score must be finite and within 0..=100, and the id must not
    /// contain the stage separator `::`. Rejected input leaves the dashboard
    /// untouched.
    #[tracing::instrument(skip(self, metrics), fields(vendor = %metrics.vendor_id))]
    pub fn add_vendor_metrics(&mut self, metrics: VendorMetrics) -> Result<f64> {
        if self.metrics.contains_key(&metrics.vendor_id) {
            return Err(AnalysisError::DuplicateVendor(metrics.vendor_id));
        }
        validate_metrics(&metrics)?;

        let breakdown = readiness_breakdown(&metrics, &self.weights);
        let vendor = metrics.vendor_id.clone();

        self.scores.insert(&vendor, breakdown.overall);
        self.add_exit_stages(&metrics, breakdown.overall);
        self.metrics
            .insert(vendor, ReadinessEntry { metrics, breakdown });

        tracing::debug!(readiness = breakdown.overall, "vendor registered");
        Ok(breakdown.overall)
    }

    /// vendor -> planning -> preparation -> migration -> exited
    fn add_exit_stages(&mut self, m: &VendorMetrics, readiness: f64) {
        let w = &self.weights;
        let costs = [
            100.0 - readiness,
            m.migration_difficulty,
            m.migration_difficulty * w.migration_stage_factor,
            m.lock_in_score * w.exit_stage_factor,
        ];

        let mut from = m.vendor_id.clone();
        for (stage, cost) in ExitStage::ALL.into_iter().zip(costs) {
            let to = stage_vertex(&m.vendor_id, stage);
            self.exit_graph.add_edge(&from, &to, cost.max(0.0));
            from = to;
        }
    }

    pub fn exit_readiness(&self, vendor_id: &str) -> Option<f64> {
        self.scores.get(vendor_id)
    }

    pub fn readiness_breakdown(&self, vendor_id: &str) -> Option<ReadinessBreakdown> {
        self.metrics.get(vendor_id).map(|e| e.breakdown)
    }

    pub fn metrics(&self, vendor_id: &str) -> Option<&VendorMetrics> {
        self.metrics.get(vendor_id).map(|e| &e.metrics)
    }

    /// Cheapest transition sequence from a vendor to `target`.
    pub fn optimal_exit_path(&self, vendor_id: &str, target: ExitStage) -> Result<ExitPath> {
        if !self.metrics.contains_key(vendor_id) {
            return Err(AnalysisError::UnknownVendor(vendor_id.to_string()));
        }

        let end = stage_vertex(vendor_id, target);
        let result = prodly_core::try_shortest_path(&self.exit_graph, vendor_id, &end)?;

        let steps = result
            .path
            .iter()
            .map(|v| match v.rsplit_once(STAGE_SEPARATOR) {
                Some((owner, stage)) if owner == vendor_id => stage.to_string(),
                _ => v.clone(),
            })
            .collect();

        Ok(ExitPath {
            steps,
            total_cost: result.total_weight,
        })
    }

    /// `(vendor_id, readiness)`, most ready first; equal scores by vendor id.
    pub fn vendors_by_readiness(&self) -> Vec<(String, f64)> {
        let mut ranked = self.scores.sorted();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    /// `(vendor_id, readiness)` ascending by vendor id.
    pub fn vendors_by_id(&self) -> Vec<(String, f64)> {
        self.scores.sorted()
    }

    pub fn vendor_count(&self) -> usize {
        self.scores.len()
    }
}

impl Default for ExitReadinessDashboard {
    fn default() -> Self {
        Self::new()
    }
}

const STAGE_SEPARATOR: &str = "::";

fn validate_metrics(m: &VendorMetrics) -> Result<()> {
    if m.vendor_id.contains(STAGE_SEPARATOR) {
        return Err(AnalysisError::InvalidVendorId(m.vendor_id.clone()));
    }
    let scores = [
        ("lock_in_score", m.lock_in_score),
        ("migration_difficulty", m.migration_difficulty),
        ("data_export_capability", m.data_export_capability),
        ("contract_flexibility", m.contract_flexibility),
        ("technical_complexity", m.technical_complexity),
    ];
    for (field, value) in scores {
        if !(0.0..=100.0).contains(&value) {
            return Err(AnalysisError::InvalidMetric {
                vendor: m.vendor_id.clone(),
                field,
                value,
            });
        }
    }
    Ok(())
}

fn stage_vertex(vendor_id: &str, stage: ExitStage) -> String {
    format!("{}{}{}", vendor_id, STAGE_SEPARATOR, stage.as_str())
}

/// Weighted readiness factors. Lock-in, migration difficulty and technical
/// complexity count inversely.
pub fn readiness_breakdown(m: &VendorMetrics, w: &ReadinessWeights) -> ReadinessBreakdown {
    let lock_in_factor = (100.0 - m.lock_in_score) * w.lock_in;
    let migration_factor = (100.0 - m.migration_difficulty) * w.migration;
    let data_export_factor = m.data_export_capability * w.data_export;
    let contract_factor = m.contract_flexibility * w.contract_flexibility;
    let technical_factor = (100.0 - m.technical_complexity) * w.technical;

    ReadinessBreakdown {
        overall: clamp_score(
            lock_in_factor + migration_factor + data_export_factor + contract_factor
                + technical_factor,
        ),
        lock_in_factor,
        migration_factor,
        data_export_factor,
        contract_factor,
        technical_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(id: &str, lock_in: f64, difficulty: f64) -> VendorMetrics {
        VendorMetrics {
            vendor_id: id.to_string(),
            lock_in_score: lock_in,
            migration_difficulty: difficulty,
            data_export_capability: 50.0,
            contract_flexibility: 40.0,
            technical_complexity: 30.0,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_breakdown_factors() {
        let b = readiness_breakdown(&metrics("v", 60.0, 20.0), &ReadinessWeights::default());
        assert!(approx(b.lock_in_factor, 12.0));
        assert!(approx(b.migration_factor, 20.0));
        assert!(approx(b.data_export_factor, 10.0));
        assert!(approx(b.contract_factor, 6.0));
        assert!(approx(b.technical_factor, 7.0));
        assert!(approx(b.overall, 55.0));
    }

    #[test]
    fn test_fully_ready_vendor() {
        let m = VendorMetrics {
            vendor_id: "free".into(),
            data_export_capability: 100.0,
            contract_flexibility: 100.0,
            ..Default::default()
        };
        let b = readiness_breakdown(&m, &ReadinessWeights::default());
        assert!(approx(b.overall, 100.0));
    }

    #[test]
    fn test_out_of_range_inputs_clamped() {
        let m = VendorMetrics {
            vendor_id: "odd".into(),
            lock_in_score: 400.0,
            migration_difficulty: 400.0,
            technical_complexity: 400.0,
            ..Default::default()
        };
        let b = readiness_breakdown(&m, &ReadinessWeights::default());
        assert_eq!(b.overall, 0.0);
    }

    #[test]
    fn test_add_and_lookup() {
        let mut d = ExitReadinessDashboard::new();
        let score = d.add_vendor_metrics(metrics("v1", 60.0, 20.0)).unwrap();
        assert!(approx(score, 55.0));
        assert_eq!(d.exit_readiness("v1"), Some(score));
        assert_eq!(d.exit_readiness("v2"), None);
        assert_eq!(d.readiness_breakdown("v1").unwrap().overall, score);
        assert!(d.readiness_breakdown("v2").is_none());
        assert_eq!(d.metrics("v1").unwrap().lock_in_score, 60.0);
    }

    #[test]
    fn test_duplicate_vendor_rejected() {
        let mut d = ExitReadinessDashboard::new();
        d.add_vendor_metrics(metrics("v1", 60.0, 20.0)).unwrap();
        let err = d.add_vendor_metrics(metrics("v1", 10.0, 10.0)).unwrap_err();
        assert!(matches!(err, AnalysisError::DuplicateVendor(id) if id == "v1"));
        assert_eq!(d.vendor_count(), 1);
    }

    #[test]
    fn test_exit_path_full_chain() {
        let mut d = ExitReadinessDashboard::new();
        d.add_vendor_metrics(metrics("v1", 60.0, 20.0)).unwrap();
        let path = d.optimal_exit_path("v1", ExitStage::Exited).unwrap();
        assert_eq!(
            path.steps,
            vec!["v1", "planning", "preparation", "migration", "exited"]
        );
        // (100 - 55) + 20 + 14 + 30
        assert!(approx(path.total_cost, 109.0), "got {}", path.total_cost);
    }

    #[test]
    fn test_exit_path_intermediate_stage() {
        let mut d = ExitReadinessDashboard::new();
        d.add_vendor_metrics(metrics("v1", 60.0, 20.0)).unwrap();
        let path = d.optimal_exit_path("v1", ExitStage::Planning).unwrap();
        assert_eq!(path.steps, vec!["v1", "planning"]);
        assert!(approx(path.total_cost, 45.0));
    }

    #[test]
    fn test_exit_paths_independent_per_vendor() {
        let mut d = ExitReadinessDashboard::new();
        d.add_vendor_metrics(metrics("cheap", 0.0, 0.0)).unwrap();
        d.add_vendor_metrics(metrics("costly", 100.0, 100.0)).unwrap();
        let cheap = d.optimal_exit_path("cheap", ExitStage::Exited).unwrap();
        let costly = d.optimal_exit_path("costly", ExitStage::Exited).unwrap();
        assert_eq!(cheap.steps.len(), 5);
        assert!(cheap.total_cost < costly.total_cost);
    }

    #[test]
    fn test_exit_path_unknown_vendor() {
        let d = ExitReadinessDashboard::new();
        assert!(matches!(
            d.optimal_exit_path("ghost", ExitStage::Exited),
            Err(AnalysisError::UnknownVendor(_))
        ));
    }

    #[test]
    fn test_out_of_range_metric_rejected() {
        let mut d = ExitReadinessDashboard::new();
        let err = d.add_vendor_metrics(metrics("v1", -10.0, 20.0)).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidMetric { field: "lock_in_score", .. }
        ));
        let err = d
            .add_vendor_metrics(metrics("v1", 50.0, f64::NAN))
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidMetric { field: "migration_difficulty", .. }
        ));
        assert_eq!(d.vendor_count(), 0);
        assert_eq!(d.exit_readiness("v1"), None);
    }

    #[test]
    fn test_rejected_vendor_leaves_other_paths_intact() {
        let mut d = ExitReadinessDashboard::new();
        d.add_vendor_metrics(metrics("good", 40.0, 20.0)).unwrap();
        let before = d.optimal_exit_path("good", ExitStage::Exited).unwrap();

        assert!(d.add_vendor_metrics(metrics("bad", -10.0, 20.0)).is_err());
        assert!(d.add_vendor_metrics(metrics("worse", 50.0, -10.0)).is_err());

        let after = d.optimal_exit_path("good", ExitStage::Exited).unwrap();
        assert_eq!(before, after);
        assert!(matches!(
            d.optimal_exit_path("bad", ExitStage::Exited),
            Err(AnalysisError::UnknownVendor(_))
        ));
    }

    #[test]
    fn test_negative_stage_factor_clamped_to_zero() {
        let weights = ReadinessWeights {
            exit_stage_factor: -1.0,
            ..Default::default()
        };
        let mut d = ExitReadinessDashboard::with_weights(weights);
        d.add_vendor_metrics(metrics("v1", 60.0, 20.0)).unwrap();
        let full = d.optimal_exit_path("v1", ExitStage::Exited).unwrap();
        let migrated = d.optimal_exit_path("v1", ExitStage::Migration).unwrap();
        assert_eq!(full.total_cost, migrated.total_cost);
    }

    #[test]
    fn test_vendor_id_with_stage_separator_rejected() {
        let mut d = ExitReadinessDashboard::new();
        d.add_vendor_metrics(metrics("a", 60.0, 20.0)).unwrap();
        let err = d
            .add_vendor_metrics(metrics("a::planning", 10.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidVendorId(id) if id == "a::planning"));

        let path = d.optimal_exit_path("a", ExitStage::Exited).unwrap();
        assert!(approx(path.total_cost, 109.0), "got {}", path.total_cost);
    }

    #[test]
    fn test_vendors_by_readiness_sorts_by_score() {
        let mut d = ExitReadinessDashboard::new();
        d.add_vendor_metrics(metrics("a-locked", 90.0, 80.0)).unwrap();
        d.add_vendor_metrics(metrics("b-free", 10.0, 10.0)).unwrap();
        d.add_vendor_metrics(metrics("c-mid", 50.0, 50.0)).unwrap();

        let ranked: Vec<String> = d
            .vendors_by_readiness()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ranked, vec!["b-free", "c-mid", "a-locked"]);

        let by_id: Vec<String> = d.vendors_by_id().into_iter().map(|(id, _)| id).collect();
        assert_eq!(by_id, vec!["a-locked", "b-free", "c-mid"]);
    }

    #[test]
    fn test_vendors_by_readiness_ties_by_id() {
        let mut d = ExitReadinessDashboard::new();
        d.add_vendor_metrics(metrics("z", 50.0, 50.0)).unwrap();
        d.add_vendor_metrics(metrics("a", 50.0, 50.0)).unwrap();
        let ranked: Vec<String> = d
            .vendors_by_readiness()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ranked, vec!["a", "z"]);
    }

    #[test]
    fn test_dashboards_do_not_share_state() {
        let mut first = ExitReadinessDashboard::new();
        first.add_vendor_metrics(metrics("v1", 60.0, 20.0)).unwrap();
        let second = ExitReadinessDashboard::new();
        assert_eq!(second.exit_readiness("v1"), None);
        assert_eq!(second.vendor_count(), 0);
    }

    #[test]
    fn test_stage_parse() {
        assert_eq!(ExitStage::parse("exited"), Some(ExitStage::Exited));
        assert_eq!(ExitStage::parse("limbo"), None);
        assert_eq!(ExitStage::Migration.to_string(), "migration");
    }
}
