use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use prodly_core::WeightedGraph;

use crate::config::{clamp_score, scaled, MigrationWeights};
use crate::error::{AnalysisError, Result};

/// One unit of work in a vendor migration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationTask {
    pub task_id: String,
    pub task_name: String,
    /// 1 (trivial) to 10 (hardest).
    pub difficulty: u32,
    pub estimated_days: u32,
    /// Tasks that must finish before this one starts.
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPriority {
    pub task_id: String,
    pub priority: u32,
}

/// Sequences and scores the tasks of one vendor migration.
///
/// Each dependency becomes an edge `dependency -> task`, so a topological
/// order of the graph is a valid execution order. Dependencies may name
/// tasks that are never registered; those appear as vertices but are left
/// out of every result.
#[derive(Debug, Clone)]
pub struct MigrationPlanner {
    weights: MigrationWeights,
    tasks: HashMap<String, MigrationTask>,
    graph: WeightedGraph,
}

impl MigrationPlanner {
    pub fn new() -> Self {
        Self::with_weights(MigrationWeights::default())
    }

    pub fn with_weights(weights: MigrationWeights) -> Self {
        Self {
            weights,
            tasks: HashMap::new(),
            graph: WeightedGraph::directed(),
        }
    }

    /// Register a task. Re-registering an id replaces its attributes and
    /// merges the new dependencies into the ones already recorded, since
    /// dependency edges cannot be removed from the graph.
    #[tracing::instrument(skip(self, task), fields(task_id = %task.task_id, deps = task.dependencies.len()))]
    pub fn add_task(&mut self, mut task: MigrationTask) {
        self.graph.add_vertex(&task.task_id);
        let mut dependencies = self
            .tasks
            .remove(&task.task_id)
            .map(|previous| previous.dependencies)
            .unwrap_or_default();
        for dep in task.dependencies.drain(..) {
            if !dependencies.contains(&dep) {
                self.graph.add_unit_edge(&dep, &task.task_id);
                dependencies.push(dep);
            }
        }
        task.dependencies = dependencies;
        self.tasks.insert(task.task_id.clone(), task);
    }

    pub fn task(&self, task_id: &str) -> Option<&MigrationTask> {
        self.tasks.get(task_id)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Registered tasks in an order that respects every dependency.
    pub fn migration_sequence(&self) -> Result<Vec<String>> {
        let order = prodly_core::try_topological_sort(&self.graph)?;
        Ok(order
            .into_iter()
            .filter(|id| self.tasks.contains_key(id))
            .collect())
    }

    /// Sum of the estimated days of all registered tasks.
    pub fn total_days(&self) -> u64 {
        self.tasks.values().map(|t| u64::from(t.estimated_days)).sum()
    }

    fn days(&self, task_id: &str) -> u64 {
        self.tasks
            .get(task_id)
            .map_or(0, |t| u64::from(t.estimated_days))
    }

    /// The dependency chain with the largest cumulative estimated days.
    ///
    /// Ties keep the chain ending earliest in the execution order.
    pub fn critical_path(&self) -> Result<Vec<String>> {
        let order = prodly_core::try_topological_sort(&self.graph)?;

        // best[v]: (days on the heaviest chain ending at v, predecessor)
        let mut best: HashMap<&str, (u64, Option<&str>)> = order
            .iter()
            .map(|id| (id.as_str(), (self.days(id), None)))
            .collect();

        for u in &order {
            let through_u = best[u.as_str()].0;
            for (v, _) in self.graph.edges(u) {
                let candidate = through_u + self.days(v);
                if let Some(entry) = best.get_mut(v) {
                    if candidate > entry.0 {
                        *entry = (candidate, Some(u.as_str()));
                    }
                }
            }
        }

        let mut end: Option<(&str, u64)> = None;
        for id in &order {
            let total = best[id.as_str()].0;
            if end.map_or(true, |(_, d)| total > d) {
                end = Some((id.as_str(), total));
            }
        }

        let mut chain = Vec::new();
        let mut current = end.map(|(id, _)| id);
        while let Some(id) = current {
            chain.push(id.to_string());
            current = best[id].1;
        }
        chain.reverse();
        chain.retain(|id| self.tasks.contains_key(id));
        Ok(chain)
    }

    /// Saturates at `u32::MAX`.
    pub fn task_priority(&self, task: &MigrationTask) -> u32 {
        let deps = u32::try_from(task.dependencies.len()).unwrap_or(u32::MAX);
        task.difficulty
            .saturating_mul(self.weights.priority_per_difficulty)
            .saturating_add(deps.saturating_mul(self.weights.priority_per_dependency))
    }

    /// All registered tasks, highest priority first; ties by task id.
    pub fn prioritized_tasks(&self) -> Vec<TaskPriority> {
        let mut heap: BinaryHeap<(u32, Reverse<&str>)> = self
            .tasks
            .values()
            .map(|t| (self.task_priority(t), Reverse(t.task_id.as_str())))
            .collect();

        let mut ranked = Vec::with_capacity(heap.len());
        while let Some((priority, Reverse(task_id))) = heap.pop() {
            ranked.push(TaskPriority {
                task_id: task_id.to_string(),
                priority,
            });
        }
        ranked
    }

    /// Migration difficulty, 0-100: capped contributions from total days,
    /// task count and critical path length.
    #[tracing::instrument(skip(self))]
    pub fn difficulty_score(&self) -> Result<f64> {
        let w = &self.weights;
        let sequence = self.migration_sequence()?;
        let critical = self.critical_path()?;
        let days = self.total_days();

        let score = scaled(days as f64, w.time_full_days, w.time_cap)
            + scaled(sequence.len() as f64, w.task_count_full, w.task_count_cap)
            + scaled(critical.len() as f64, w.critical_path_full, w.critical_path_cap);

        tracing::debug!(
            days,
            tasks = sequence.len(),
            critical = critical.len(),
            score,
            "migration difficulty"
        );
        Ok(clamp_score(score))
    }

    /// Tasks that `task_id` must wait for, directly or transitively.
    pub fn prerequisites(&self, task_id: &str) -> Result<Vec<String>> {
        if !self.tasks.contains_key(task_id) {
            return Err(AnalysisError::UnknownTask(task_id.to_string()));
        }
        let order = self.migration_sequence()?;
        let mut needed = vec![task_id.to_string()];
        let mut i = 0;
        while i < needed.len() {
            if let Some(task) = self.tasks.get(&needed[i]) {
                for dep in &task.dependencies {
                    if !needed.contains(dep) {
                        needed.push(dep.clone());
                    }
                }
            }
            i += 1;
        }
        Ok(order
            .into_iter()
            .filter(|id| id != task_id && needed.contains(id))
            .collect())
    }
}

impl Default for MigrationPlanner {
    fn default() -> Self {
        Self::new()
    }
}
