use std::collections::HashMap;

use prodly_core::WeightedGraph;

use crate::config::{clamp_score, scaled, LockInWeights};
use crate::error::{AnalysisError, Result};

/// Contract attributes supplied for one vendor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorProfile {
    pub vendor_id: String,
    pub vendor_name: String,
    pub contract_value: f64,
    pub contract_months: u32,
    pub data_volume_gb: f64,
    pub api_dependencies: u32,
    pub has_custom_integration: bool,
    pub switching_cost: f64,
}

/// A registered vendor with its computed lock-in score (0-100).
#[derive(Debug, Clone, PartialEq)]
pub struct VendorRecord {
    pub profile: VendorProfile,
    pub lock_in_score: f64,
}

/// Scores vendors for lock-in and tracks vendor-to-vendor dependencies.
///
/// Records are held in a hash map for constant-time lookup; dependencies in a
/// directed graph walked depth-first.
#[derive(Debug, Clone)]
pub struct LockInAnalyzer {
    weights: LockInWeights,
    vendors: HashMap<String, VendorRecord>,
    dependencies: WeightedGraph,
}

impl LockInAnalyzer {
    pub fn new() -> Self {
        Self::with_weights(LockInWeights::default())
    }

    pub fn with_weights(weights: LockInWeights) -> Self {
        Self {
            weights,
            vendors: HashMap::new(),
            dependencies: WeightedGraph::directed(),
        }
    }

    /// Register or replace a vendor, returning its lock-in score.
    #[tracing::instrument(skip(self, profile), fields(vendor = %profile.vendor_id))]
    pub fn add_vendor(&mut self, profile: VendorProfile) -> f64 {
        let score = lock_in_score(&profile, &self.weights);
        self.dependencies.add_vertex(&profile.vendor_id);

        let id = profile.vendor_id.clone();
        let replaced = self
            .vendors
            .insert(
                id,
                VendorRecord {
                    profile,
                    lock_in_score: score,
                },
            )
            .is_some();

        tracing::debug!(score, replaced, "vendor scored");
        score
    }

    /// Record that `from` depends on `to`. Either side may be a vendor that
    /// has not been profiled yet.
    pub fn add_dependency(&mut self, from: &str, to: &str) {
        self.dependencies.add_unit_edge(from, to);
    }

    pub fn lock_in_score(&self, vendor_id: &str) -> Option<f64> {
        self.vendors.get(vendor_id).map(|r| r.lock_in_score)
    }

    pub fn vendor(&self, vendor_id: &str) -> Option<&VendorRecord> {
        self.vendors.get(vendor_id)
    }

    /// Everything `vendor_id` transitively depends on, in depth-first
    /// pre-order, excluding the vendor itself.
    pub fn dependencies(&self, vendor_id: &str) -> Result<Vec<String>> {
        if !self.dependencies.has_vertex(vendor_id) {
            return Err(AnalysisError::UnknownVendor(vendor_id.to_string()));
        }
        Ok(prodly_core::dfs(&self.dependencies, vendor_id)
            .into_iter()
            .skip(1)
            .collect())
    }

    /// `(vendor_id, lock_in_score)` for every profiled vendor, ascending by id.
    pub fn all_scores(&self) -> Vec<(String, f64)> {
        let mut scores: Vec<(String, f64)> = self
            .vendors
            .iter()
            .map(|(id, r)| (id.clone(), r.lock_in_score))
            .collect();
        scores.sort_by(|a, b| a.0.cmp(&b.0));
        scores
    }

    pub fn vendor_count(&self) -> usize {
        self.vendors.len()
    }
}

impl Default for LockInAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Sum of six capped factors, clamped to 0-100.
pub fn lock_in_score(p: &VendorProfile, w: &LockInWeights) -> f64 {
    let contract = (p.contract_value / w.contract_value_unit * w.contract_value_points_per_unit)
        .min(w.contract_value_cap);
    let duration = scaled(
        p.contract_months as f64,
        w.duration_full_months,
        w.duration_cap,
    );
    let data = scaled(p.data_volume_gb, w.data_volume_full_gb, w.data_volume_cap);
    let api = scaled(p.api_dependencies as f64, w.api_full_count, w.api_cap);
    let integration = if p.has_custom_integration {
        w.custom_integration_points
    } else {
        0.0
    };
    // switching cost relative to contract value; without a contract value any
    // switching cost is maximal
    let switching = if p.contract_value > 0.0 {
        scaled(p.switching_cost, p.contract_value, w.switching_cost_cap)
    } else if p.switching_cost > 0.0 {
        w.switching_cost_cap
    } else {
        0.0
    };

    clamp_score(contract + duration + data + api + integration + switching)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str) -> VendorProfile {
        VendorProfile {
            vendor_id: id.to_string(),
            vendor_name: format!("{} Inc", id),
            contract_value: 1_000_000.0,
            contract_months: 18,
            data_volume_gb: 500.0,
            api_dependencies: 5,
            has_custom_integration: true,
            switching_cost: 200_000.0,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_score_components() {
        // 5 + 10 + 7.5 + 7.5 + 10 + 3
        let score = lock_in_score(&profile("v1"), &LockInWeights::default());
        assert!(approx(score, 43.0), "got {}", score);
    }

    #[test]
    fn test_score_caps_each_factor() {
        let p = VendorProfile {
            vendor_id: "big".into(),
            contract_value: 50_000_000.0,
            contract_months: 120,
            data_volume_gb: 1e6,
            api_dependencies: 100,
            has_custom_integration: true,
            switching_cost: 1e9,
            ..Default::default()
        };
        assert_eq!(lock_in_score(&p, &LockInWeights::default()), 100.0);
    }

    #[test]
    fn test_score_zero_profile() {
        let p = VendorProfile::default();
        assert_eq!(lock_in_score(&p, &LockInWeights::default()), 0.0);
    }

    #[test]
    fn test_zero_contract_value_with_switching_cost() {
        let p = VendorProfile {
            switching_cost: 10.0,
            ..Default::default()
        };
        assert_eq!(lock_in_score(&p, &LockInWeights::default()), 15.0);
    }

    #[test]
    fn test_add_vendor_stores_score() {
        let mut a = LockInAnalyzer::new();
        let score = a.add_vendor(profile("v1"));
        assert_eq!(a.lock_in_score("v1"), Some(score));
        assert_eq!(a.vendor("v1").unwrap().profile.vendor_name, "v1 Inc");
        assert_eq!(a.lock_in_score("missing"), None);
    }

    #[test]
    fn test_add_vendor_replaces() {
        let mut a = LockInAnalyzer::new();
        a.add_vendor(profile("v1"));
        let mut cheaper = profile("v1");
        cheaper.has_custom_integration = false;
        let score = a.add_vendor(cheaper);
        assert_eq!(a.vendor_count(), 1);
        assert!(approx(score, 33.0));
    }

    #[test]
    fn test_dependencies_depth_first() {
        let mut a = LockInAnalyzer::new();
        a.add_vendor(profile("crm"));
        a.add_dependency("crm", "auth");
        a.add_dependency("crm", "storage");
        a.add_dependency("auth", "directory");
        assert_eq!(
            a.dependencies("crm").unwrap(),
            vec!["auth", "directory", "storage"]
        );
        assert!(a.dependencies("storage").unwrap().is_empty());
    }

    #[test]
    fn test_dependencies_unknown_vendor() {
        let a = LockInAnalyzer::new();
        assert!(matches!(
            a.dependencies("ghost"),
            Err(AnalysisError::UnknownVendor(_))
        ));
    }

    #[test]
    fn test_dependency_cycle_terminates() {
        let mut a = LockInAnalyzer::new();
        a.add_dependency("a", "b");
        a.add_dependency("b", "a");
        assert_eq!(a.dependencies("a").unwrap(), vec!["b"]);
    }

    #[test]
    fn test_all_scores_sorted_by_id() {
        let mut a = LockInAnalyzer::new();
        a.add_vendor(profile("zeta"));
        a.add_vendor(profile("alpha"));
        a.add_vendor(profile("mid"));
        let ids: Vec<String> = a.all_scores().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_custom_weights() {
        let weights = LockInWeights {
            custom_integration_points: 0.0,
            ..Default::default()
        };
        let mut a = LockInAnalyzer::with_weights(weights);
        let score = a.add_vendor(profile("v1"));
        assert!(approx(score, 33.0));
    }
}
