use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use crate::error::GraphError;
use crate::graph::{VertexId, WeightedGraph};

/// Result of a shortest path query.
///
/// An unreachable target (or an unknown endpoint) is reported as an empty
/// path with `total_weight == f64::INFINITY`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    pub path: Vec<String>,
    pub total_weight: f64,
}

impl ShortestPath {
    fn unreachable() -> Self {
        Self {
            path: Vec::new(),
            total_weight: f64::INFINITY,
        }
    }

    pub fn is_reachable(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of edges on the path. Zero for a single-vertex or empty path.
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Breadth-first traversal from `start`.
///
/// Each vertex is marked visited when enqueued, so it appears once even when
/// parallel edges lead to it. Neighbors are expanded in adjacency order.
/// Empty if `start` is not a vertex.
pub fn bfs(graph: &WeightedGraph, start: &str) -> Vec<String> {
    let Some(s) = graph.vertex_id(start) else {
        return Vec::new();
    };

    let mut visited = vec![false; graph.vertex_count()];
    let mut queue: VecDeque<VertexId> = VecDeque::new();
    let mut order = Vec::new();

    visited[s] = true;
    queue.push_back(s);

    while let Some(current) = queue.pop_front() {
        order.push(graph.name_of(current));
        for edge in graph.out_edges(current) {
            if !visited[edge.target] {
                visited[edge.target] = true;
                queue.push_back(edge.target);
            }
        }
    }

    order
}

/// Depth-first pre-order traversal from `start`.
///
/// Produces the same order as the recursive formulation (record, then descend
/// into each unvisited neighbor in adjacency order) but keeps an explicit
/// frame stack, so depth is bounded by the reachable vertex count rather than
/// the thread stack. Empty if `start` is not a vertex.
pub fn dfs(graph: &WeightedGraph, start: &str) -> Vec<String> {
    let Some(s) = graph.vertex_id(start) else {
        return Vec::new();
    };

    let mut visited = vec![false; graph.vertex_count()];
    let mut order = Vec::new();
    // (vertex, index of next edge to inspect)
    let mut stack: Vec<(VertexId, usize)> = Vec::new();

    visited[s] = true;
    order.push(graph.name_of(s));
    stack.push((s, 0));

    while let Some(frame) = stack.last_mut() {
        let (v, next) = *frame;
        let edges = graph.out_edges(v);
        if next >= edges.len() {
            stack.pop();
            continue;
        }
        frame.1 += 1;

        let target = edges[next].target;
        if !visited[target] {
            visited[target] = true;
            order.push(graph.name_of(target));
            stack.push((target, 0));
        }
    }

    order
}

/// Heap entry ordered so that `BinaryHeap` pops the smallest distance first,
/// and among equal distances the earliest-registered vertex.
#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    dist: f64,
    vertex: VertexId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Shortest path from `start` to `end` by total edge weight (Dijkstra).
///
/// Precondition: every edge weight is non-negative. This is not checked;
/// negative weights give an unspecified (but finite-time) result. Use
/// [`try_shortest_path`] to reject such graphs up front.
///
/// `start == end` yields the single-vertex path with weight 0. When several
/// paths share the minimal weight, ties are broken toward vertices that were
/// registered first.
pub fn shortest_path(graph: &WeightedGraph, start: &str, end: &str) -> ShortestPath {
    let (Some(s), Some(t)) = (graph.vertex_id(start), graph.vertex_id(end)) else {
        return ShortestPath::unreachable();
    };

    let n = graph.vertex_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<VertexId>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut heap = BinaryHeap::new();

    dist[s] = 0.0;
    heap.push(HeapEntry { dist: 0.0, vertex: s });

    while let Some(HeapEntry { dist: d, vertex: current }) = heap.pop() {
        if visited[current] {
            continue;
        }
        visited[current] = true;

        if current == t {
            break;
        }

        for edge in graph.out_edges(current) {
            if visited[edge.target] {
                continue;
            }
            let alt = d + edge.weight;
            // an infinite edge weight still makes its target reachable
            let first_seen = prev[edge.target].is_none() && edge.target != s;
            if alt < dist[edge.target] || first_seen {
                dist[edge.target] = alt;
                prev[edge.target] = Some(current);
                heap.push(HeapEntry {
                    dist: alt,
                    vertex: edge.target,
                });
            }
        }
    }

    if t != s && prev[t].is_none() {
        return ShortestPath::unreachable();
    }

    // prev links always point at a vertex finalized earlier, so the walk
    // terminates; the bound guards against it regardless.
    let mut path = vec![graph.name_of(t)];
    let mut current = t;
    while let Some(p) = prev[current] {
        if path.len() > n {
            break;
        }
        path.push(graph.name_of(p));
        current = p;
    }
    path.reverse();

    ShortestPath {
        path,
        total_weight: dist[t],
    }
}

/// [`shortest_path`] with the non-negative weight precondition enforced.
pub fn try_shortest_path(
    graph: &WeightedGraph,
    start: &str,
    end: &str,
) -> Result<ShortestPath, GraphError> {
    for v in 0..graph.vertex_count() {
        for edge in graph.out_edges(v) {
            if edge.weight.is_nan() || edge.weight < 0.0 {
                let err = GraphError::InvalidWeight {
                    from: graph.name_of(v),
                    to: graph.name_of(edge.target),
                    weight: edge.weight,
                };
                tracing::debug!(error = %err, "shortest path rejected");
                return Err(err);
            }
        }
    }
    Ok(shortest_path(graph, start, end))
}

/// Topological order: for every edge `u -> v`, `u` precedes `v`.
///
/// Computed as the reverse post-order of a depth-first forest whose roots are
/// taken in vertex registration order. Precondition: the graph is a DAG. On
/// cyclic input every vertex is still returned exactly once, but the order is
/// not a valid topological order. Use [`try_topological_sort`] to detect this.
pub fn topological_sort(graph: &WeightedGraph) -> Vec<String> {
    let n = graph.vertex_count();
    let mut visited = vec![false; n];
    let mut post_order: Vec<VertexId> = Vec::with_capacity(n);
    let mut stack: Vec<(VertexId, usize)> = Vec::new();

    for root in 0..n {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (v, next) = *frame;
            let edges = graph.out_edges(v);
            if next >= edges.len() {
                post_order.push(v);
                stack.pop();
                continue;
            }
            frame.1 += 1;

            let target = edges[next].target;
            if !visited[target] {
                visited[target] = true;
                stack.push((target, 0));
            }
        }
    }

    post_order
        .into_iter()
        .rev()
        .map(|v| graph.name_of(v))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unseen,
    OnStack,
    Done,
}

/// [`topological_sort`] with cycle detection.
///
/// Returns the same order as the lenient variant for a DAG. A back edge
/// (including a self loop) yields [`GraphError::Cycle`] naming a vertex on
/// the cycle.
pub fn try_topological_sort(graph: &WeightedGraph) -> Result<Vec<String>, GraphError> {
    let n = graph.vertex_count();
    let mut marks = vec![Mark::Unseen; n];
    let mut post_order: Vec<VertexId> = Vec::with_capacity(n);
    let mut stack: Vec<(VertexId, usize)> = Vec::new();

    for root in 0..n {
        if marks[root] != Mark::Unseen {
            continue;
        }
        marks[root] = Mark::OnStack;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (v, next) = *frame;
            let edges = graph.out_edges(v);
            if next >= edges.len() {
                marks[v] = Mark::Done;
                post_order.push(v);
                stack.pop();
                continue;
            }
            frame.1 += 1;

            let target = edges[next].target;
            match marks[target] {
                Mark::Unseen => {
                    marks[target] = Mark::OnStack;
                    stack.push((target, 0));
                }
                Mark::OnStack => {
                    let err = GraphError::Cycle {
                        vertex: graph.name_of(target),
                    };
                    tracing::debug!(error = %err, "topological sort rejected");
                    return Err(err);
                }
                Mark::Done => {}
            }
        }
    }

    Ok(post_order
        .into_iter()
        .rev()
        .map(|v| graph.name_of(v))
        .collect())
}
