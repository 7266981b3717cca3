use thiserror::Error;

/// Precondition violations reported by the strict traversal variants.
///
/// The lenient operations never return this; they accept any input and leave
/// the result unspecified when a precondition does not hold.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// Dijkstra needs non-negative, non-NaN weights.
    #[error("edge {from} -> {to} has invalid weight {weight}")]
    InvalidWeight { from: String, to: String, weight: f64 },

    /// Topological order requires a DAG.
    #[error("graph contains a cycle through '{vertex}'")]
    Cycle { vertex: String },
}
