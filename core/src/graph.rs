use std::collections::HashMap;

/// Dense vertex identifier, assigned in first-reference order.
pub type VertexId = usize;

/// A weighted edge in the adjacency list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: VertexId,
    pub weight: f64,
}

/// In-memory weighted multigraph over string-identified vertices.
///
/// Vertex names are interned into a dense [`VertexId`] the first time they are
/// referenced, so `adjacency[v]` holds the outgoing edges of vertex `v` and
/// every enumeration runs in first-reference order. Parallel edges are kept.
/// In undirected mode every inserted edge is mirrored into both endpoints'
/// lists. Nothing is ever removed.
#[derive(Debug, Clone)]
pub struct WeightedGraph {
    directed: bool,
    names: Vec<String>,
    ids: HashMap<String, VertexId>,
    adjacency: Vec<Vec<Edge>>,
}

impl WeightedGraph {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            names: Vec::new(),
            ids: HashMap::new(),
            adjacency: Vec::new(),
        }
    }

    pub fn directed() -> Self {
        Self::new(true)
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    /// Pre-allocate for a known vertex count.
    pub fn with_capacity(directed: bool, vertex_count: usize) -> Self {
        Self {
            directed,
            names: Vec::with_capacity(vertex_count),
            ids: HashMap::with_capacity(vertex_count),
            adjacency: Vec::with_capacity(vertex_count),
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Register a vertex, returning its id. No-op for a known vertex.
    pub fn add_vertex(&mut self, id: &str) -> VertexId {
        if let Some(&v) = self.ids.get(id) {
            return v;
        }
        let v = self.names.len();
        self.names.push(id.to_string());
        self.ids.insert(id.to_string(), v);
        self.adjacency.push(Vec::new());
        v
    }

    /// Add a weighted edge, creating missing endpoints.
    ///
    /// Calling this twice with the same endpoints creates two parallel edges;
    /// the earlier weight is not replaced.
    pub fn add_edge(&mut self, from: &str, to: &str, weight: f64) {
        let f = self.add_vertex(from);
        let t = self.add_vertex(to);
        self.adjacency[f].push(Edge { target: t, weight });
        if !self.directed {
            self.adjacency[t].push(Edge { target: f, weight });
        }
    }

    /// Add an edge with the default weight of 1.0.
    pub fn add_unit_edge(&mut self, from: &str, to: &str) {
        self.add_edge(from, to, 1.0);
    }

    /// Look up the interned id of a vertex.
    pub fn vertex_id(&self, id: &str) -> Option<VertexId> {
        self.ids.get(id).copied()
    }

    /// Resolve a VertexId back to its name.
    pub fn vertex_name(&self, v: VertexId) -> Option<&str> {
        self.names.get(v).map(|s| s.as_str())
    }

    pub fn has_vertex(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// All vertex names in first-reference order.
    pub fn vertices(&self) -> Vec<&str> {
        self.names.iter().map(|s| s.as_str()).collect()
    }

    /// Neighbor names in adjacency insertion order, duplicates included.
    /// Empty for an unknown vertex.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        self.edges(id).into_iter().map(|(name, _)| name).collect()
    }

    /// Neighbor names with edge weights, in adjacency insertion order.
    pub fn edges(&self, id: &str) -> Vec<(&str, f64)> {
        match self.vertex_id(id) {
            Some(v) => self.adjacency[v]
                .iter()
                .map(|e| (self.names[e.target].as_str(), e.weight))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Outgoing edges of an interned vertex.
    pub(crate) fn out_edges(&self, v: VertexId) -> &[Edge] {
        self.adjacency.get(v).map(|a| a.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn name_of(&self, v: VertexId) -> String {
        self.names[v].clone()
    }

    pub fn vertex_count(&self) -> usize {
        self.names.len()
    }

    /// Number of adjacency entries. An undirected edge counts twice.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|a| a.len()).sum()
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let name_bytes: usize = self.names.iter().map(|s| s.capacity()).sum();
        // names are stored twice: the Vec and the HashMap key
        let vertex_mem = self.names.len() * (2 * size_of::<String>() + size_of::<VertexId>() + 16)
            + 2 * name_bytes;
        let edge_mem: usize = self
            .adjacency
            .iter()
            .map(|a| size_of::<Vec<Edge>>() + a.capacity() * size_of::<Edge>())
            .sum();

        vertex_mem + edge_mem
    }
}

impl Default for WeightedGraph {
    fn default() -> Self {
        Self::directed()
    }
}
