use prodly_analysis::logging;
use prodly_core::{OrderedIndex, WeightedGraph};
use std::time::Instant;

fn main() {
    let mut verbose = false;
    let mut log_json = false;
    let mut log_level: Option<String> = None;
    let mut args: Vec<String> = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "-v" || arg == "--verbose" {
            verbose = true;
        } else if arg == "--log-json" {
            log_json = true;
        } else if let Some(level) = arg.strip_prefix("--log-level=") {
            log_level = Some(level.to_string());
        } else {
            args.push(arg);
        }
    }

    let mode = args.first().map(|s| s.as_str()).unwrap_or("all");
    let vertex_count: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(200_000);

    if mode == "help" || mode == "--help" {
        println!("Usage: prodly-bench [options] [mode] [vertex_count]");
        println!();
        println!("Options:");
        println!("  -v, --verbose        Debug logging for the prodly crates");
        println!("  --log-level=LEVEL    Log level or filter directive (PRODLY_LOG overrides)");
        println!("  --log-json           Emit logs as JSON lines on stderr");
        println!();
        println!("Modes:");
        println!("  all         Run all generators and the index benchmark (default)");
        println!("  tree        Branching dependency tree (DAG, deep paths)");
        println!("  scalefree   Preferential attachment toward older vertices (DAG, hubs)");
        println!("  smallworld  Watts-Strogatz ring lattice + shortcuts (cyclic)");
        println!("  barbell     Two dense clusters joined by a thin bridge (cyclic)");
        println!("  index       OrderedIndex insert / lookup / enumeration");
        println!();
        println!("Default vertex_count: 200000");
        return;
    }

    if let Err(e) = logging::init_tracing(verbose, log_level.as_deref(), log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    tracing::debug!(mode, vertex_count, "starting benchmark");

    println!("prodly-bench");
    println!("============");
    println!();

    // (name, generator, generator output is acyclic)
    let generators: Vec<(&str, fn(u64) -> WeightedGraph, bool)> = match mode {
        "tree" => vec![("Dependency tree", gen_tree, true)],
        "scalefree" => vec![("Scale-free DAG", gen_scale_free, true)],
        "smallworld" => vec![("Small-world (Watts-Strogatz)", gen_small_world, false)],
        "barbell" => vec![("Barbell (cluster-bridge-cluster)", gen_barbell, false)],
        "index" => Vec::new(),
        "all" => vec![
            ("Dependency tree", gen_tree as fn(u64) -> WeightedGraph, true),
            ("Scale-free DAG", gen_scale_free, true),
            ("Small-world (Watts-Strogatz)", gen_small_world, false),
            ("Barbell (cluster-bridge-cluster)", gen_barbell, false),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return;
        }
    };

    for (name, generator, acyclic) in generators {
        run_graph_benchmark(name, generator, vertex_count, acyclic);
    }

    if mode == "index" || mode == "all" {
        run_index_benchmark(vertex_count);
    }
}

fn ms(t: Instant) -> f64 {
    t.elapsed().as_secs_f64() * 1000.0
}

fn run_graph_benchmark(
    name: &str,
    generator: fn(u64) -> WeightedGraph,
    vertex_count: u64,
    acyclic: bool,
) {
    println!("--- {} ---", name);
    println!("Target: {} vertices", vertex_count);

    let t = Instant::now();
    let graph = generator(vertex_count);
    tracing::debug!(
        generator = name,
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "graph generated"
    );
    println!(
        "Generated in {:.2}s: {} vertices, {} edges, ~{:.0}MB",
        t.elapsed().as_secs_f64(),
        graph.vertex_count(),
        graph.edge_count(),
        graph.memory_usage() as f64 / 1_048_576.0
    );
    println!();

    let start = vid(0);
    let far = vid((graph.vertex_count() as u64).saturating_sub(1));

    let t = Instant::now();
    let order = prodly_core::bfs(&graph, &start);
    println!("{:>12} {:>10} reached in {:>8.1}ms", "bfs", order.len(), ms(t));

    let t = Instant::now();
    let order = prodly_core::dfs(&graph, &start);
    println!("{:>12} {:>10} reached in {:>8.1}ms", "dfs", order.len(), ms(t));

    let t = Instant::now();
    let path = prodly_core::shortest_path(&graph, &start, &far);
    let elapsed = ms(t);
    if path.is_reachable() {
        println!(
            "{:>12} {} → {}: {} hops, weight {:.2} in {:.1}ms",
            "dijkstra",
            start,
            far,
            path.hops(),
            path.total_weight,
            elapsed
        );
    } else {
        println!("{:>12} {} → {}: no path ({:.1}ms)", "dijkstra", start, far, elapsed);
    }

    if acyclic {
        let t = Instant::now();
        let order = prodly_core::topological_sort(&graph);
        println!("{:>12} {:>10} ordered in {:>8.1}ms", "toposort", order.len(), ms(t));
    }
    println!();
}

fn run_index_benchmark(key_count: u64) {
    println!("--- OrderedIndex ---");
    println!("Target: {} keys", key_count);

    let mut rng = FastRng::new(2024);
    let keys: Vec<String> = (0..key_count)
        .map(|_| format!("vendor-{:012}", rng.next(u64::MAX >> 1)))
        .collect();

    let mut index = OrderedIndex::new();
    let t = Instant::now();
    for (i, key) in keys.iter().enumerate() {
        index.insert(key, i as f64);
    }
    println!(
        "{:>12} {:>10} keys in {:>8.1}ms (height {})",
        "insert",
        index.len(),
        ms(t),
        index.height()
    );

    let t = Instant::now();
    let hits = keys.iter().filter(|k| index.contains(k)).count();
    println!("{:>12} {:>10} hits in {:>8.1}ms", "lookup", hits, ms(t));

    let t = Instant::now();
    let sorted = index.sorted();
    println!("{:>12} {:>10} rows in {:>8.1}ms", "sorted", sorted.len(), ms(t));
    println!();
}

// ---------------------------------------------------------------------------
// Generators: O(n + edges), single-threaded, deterministic
// ---------------------------------------------------------------------------

fn vid(i: u64) -> String {
    format!("v{}", i)
}

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
    /// Edge weight in [1, 10).
    fn weight(&mut self) -> f64 {
        1.0 + self.next_f64() * 9.0
    }
}

/// Branching tree: each vertex spawns three children, edges point parent →
/// child. Log depth, exponential width.
fn gen_tree(vertex_count: u64) -> WeightedGraph {
    let mut graph = WeightedGraph::with_capacity(true, vertex_count as usize);
    let mut rng = FastRng::new(42);

    let branching = 3u64;
    graph.add_vertex(&vid(0));

    let mut next_id: u64 = 1;
    let mut frontier: Vec<u64> = vec![0];

    while next_id < vertex_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= vertex_count {
                    break;
                }
                let child = next_id;
                next_id += 1;
                graph.add_edge(&vid(parent), &vid(child), rng.weight());
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    graph
}

/// Scale-free via edge-list sampling (O(edges), not O(n²)).
///
/// Each new vertex links from an existing endpoint picked proportionally to
/// degree. Edges always run older → newer, so the result is a DAG rooted
/// near `v0`.
fn gen_scale_free(vertex_count: u64) -> WeightedGraph {
    let edges_per_vertex = 5u64;
    let mut graph = WeightedGraph::with_capacity(true, vertex_count as usize);
    let mut rng = FastRng::new(12345);

    let mut endpoints: Vec<u64> = Vec::with_capacity((vertex_count * edges_per_vertex * 2) as usize);

    // Seed: small forward-only clique
    let seed = 5u64.min(vertex_count);
    for i in 0..seed {
        graph.add_vertex(&vid(i));
    }
    for i in 0..seed {
        for j in (i + 1)..seed {
            graph.add_edge(&vid(i), &vid(j), rng.weight());
            endpoints.push(i);
            endpoints.push(j);
        }
    }

    for new_vertex in seed..vertex_count {
        graph.add_vertex(&vid(new_vertex));
        for _ in 0..edges_per_vertex.min(new_vertex) {
            let source = endpoints[rng.next(endpoints.len() as u64) as usize];
            if source != new_vertex {
                graph.add_edge(&vid(source), &vid(new_vertex), rng.weight());
                endpoints.push(source);
                endpoints.push(new_vertex);
            }
        }
    }

    graph
}

/// Small-world (Watts-Strogatz): ring lattice + random rewiring.
///
/// Each vertex links to its K nearest successors on a ring, each edge rewired
/// with probability p. High clustering, short paths, cyclic.
fn gen_small_world(vertex_count: u64) -> WeightedGraph {
    let k = 5u64;
    let p = 0.05f64;
    let mut graph = WeightedGraph::with_capacity(true, vertex_count as usize);
    let mut rng = FastRng::new(67890);

    for i in 0..vertex_count {
        graph.add_vertex(&vid(i));
    }

    for i in 0..vertex_count {
        for j in 1..=k {
            let neighbor = (i + j) % vertex_count;
            let target = if rng.next_f64() < p {
                let rewired = rng.next(vertex_count);
                if rewired != i {
                    rewired
                } else {
                    neighbor
                }
            } else {
                neighbor
            };
            graph.add_edge(&vid(i), &vid(target), rng.weight());
        }
    }

    graph
}

/// Barbell: two dense undirected clusters joined by a chain of bridge vertices.
///
/// Worst case for shortest path through a bottleneck.
fn gen_barbell(vertex_count: u64) -> WeightedGraph {
    let bridge_len = 10u64;
    let cluster = vertex_count.saturating_sub(bridge_len) / 2;
    let mut graph = WeightedGraph::with_capacity(false, vertex_count as usize);
    let mut rng = FastRng::new(99999);

    for i in 0..cluster {
        graph.add_vertex(&vid(i));
    }
    for i in 0..cluster {
        for _ in 0..10u64.min(cluster.saturating_sub(1)) {
            let target = rng.next(cluster);
            if target != i {
                graph.add_edge(&vid(i), &vid(target), rng.weight());
            }
        }
    }

    // Bridge: chain from the last vertex of A to the first vertex of B
    let bridge_start = cluster;
    let b_start = bridge_start + bridge_len;
    let mut prev = cluster.saturating_sub(1);
    for id in bridge_start..=b_start {
        graph.add_edge(&vid(prev), &vid(id), 1.0);
        prev = id;
    }

    for i in 0..cluster {
        for _ in 0..10u64.min(cluster.saturating_sub(1)) {
            let target = rng.next(cluster);
            if target != i {
                graph.add_edge(&vid(b_start + i), &vid(b_start + target), rng.weight());
            }
        }
    }

    graph
}
