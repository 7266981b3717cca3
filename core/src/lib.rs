//! prodly-core: in-memory graph and ordered-index engines.
//!
//! Two independent structures that the vendor analysis layer builds on:
//! a weighted multigraph over string-identified vertices (BFS, DFS,
//! Dijkstra, topological order) and an AVL tree from string keys to `f64`
//! values. Both are single-threaded and synchronous; callers serialize access.
//!
//! Absence is reported through return values (empty vectors, `None`, an
//! infinite path weight). The `try_` traversal variants add fail-fast
//! precondition checks that the lenient ones deliberately skip.

mod error;
mod graph;
mod index;
mod traversal;

pub use error::GraphError;
pub use graph::{Edge, VertexId, WeightedGraph};
pub use index::{Iter, OrderedIndex};
pub use traversal::{
    bfs, dfs, shortest_path, topological_sort, try_shortest_path, try_topological_sort,
    ShortestPath,
};
