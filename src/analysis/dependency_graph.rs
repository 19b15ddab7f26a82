use std::collections::HashMap;

/// A type-safe wrapper for task dependency relationships.
///
/// The `DependencyGraph` maps each task id to the list of task ids it
/// depends on. This reverse-adjacency representation (task → prerequisites)
/// is what the layering pass consumes directly: a task is ready exactly when
/// its dependency list is empty.
///
/// The internal structure is `HashMap<String, Vec<String>>` where:
/// - **Key**: a task id from the batch
/// - **Value**: ids of the tasks that must complete first
///
/// Every key is a batch task id and every value element is also a batch
/// task id; the analyzer drops references to ids outside the batch before
/// the graph is built.
///
/// # Example
/// ```
/// use std::collections::HashMap;
/// use agile_flow::analysis::DependencyGraph;
///
/// // Chain: auth <- users <- permissions
/// let mut graph = HashMap::new();
/// graph.insert("auth".to_string(), vec![]);
/// graph.insert("users".to_string(), vec!["auth".to_string()]);
/// graph.insert("permissions".to_string(), vec!["users".to_string()]);
///
/// let graph = DependencyGraph::from(graph);
/// assert_eq!(graph.dependencies_of("users"), Some(&vec!["auth".to_string()]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph(pub HashMap<String, Vec<String>>);

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Record the full dependency list for a task
    pub fn insert(&mut self, task_id: String, dependencies: Vec<String>) {
        self.0.insert(task_id, dependencies);
    }

    /// Get the dependency list for a task
    pub fn dependencies_of(&self, task_id: &str) -> Option<&Vec<String>> {
        self.0.get(task_id)
    }

    /// Number of tasks in the graph
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(task_id, dependencies)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// Total number of edges in the graph
    pub fn edge_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl From<HashMap<String, Vec<String>>> for DependencyGraph {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}
