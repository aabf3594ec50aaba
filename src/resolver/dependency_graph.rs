//! Reference graph between templates.
//!
//! Edges point from the referencing template to the referenced one. Twig
//! allows templates to reference each other in cycles (a macro file that
//! imports itself through another file, for example), so cycles are reported
//! rather than rejected.

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Node has not been visited.
    White,
    /// Node is currently being visited (in the DFS stack).
    Gray,
    /// Node has been fully visited.
    Black,
}

/// Directed graph of template references keyed by resolved path.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<PathBuf, ()>,
    node_map: HashMap<PathBuf, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph if it doesn't already exist.
    pub fn ensure_node(&mut self, path: &Path) -> NodeIndex {
        if let Some(&index) = self.node_map.get(path) {
            index
        } else {
            let index = self.graph.add_node(path.to_path_buf());
            self.node_map.insert(path.to_path_buf(), index);
            index
        }
    }

    /// Record that `from` references `to`. Repeated references add no edge.
    pub fn add_dependency(&mut self, from: &Path, to: &Path) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);

        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.node_map.contains_key(path)
    }

    /// Templates referenced directly by `path`, in the order the references
    /// were first recorded.
    pub fn direct_dependencies(&self, path: &Path) -> Vec<PathBuf> {
        let Some(&index) = self.node_map.get(path) else {
            return Vec::new();
        };
        // petgraph yields the most recently added edge first
        let mut deps: Vec<PathBuf> =
            self.graph.neighbors(index).map(|idx| self.graph[idx].clone()).collect();
        deps.reverse();
        deps
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Every reference cycle reachable in the graph, each as the path that
    /// closes it (first node repeated at the end).
    pub fn cycles(&self) -> Vec<Vec<PathBuf>> {
        let mut colors: HashMap<NodeIndex, Color> =
            self.graph.node_indices().map(|node| (node, Color::White)).collect();
        let mut path = Vec::new();
        let mut cycles = Vec::new();

        for node in self.graph.node_indices() {
            if matches!(colors.get(&node), Some(Color::White)) {
                self.dfs_visit(node, &mut colors, &mut path, &mut cycles);
            }
        }

        cycles
    }

    fn dfs_visit(
        &self,
        node: NodeIndex,
        colors: &mut HashMap<NodeIndex, Color>,
        path: &mut Vec<NodeIndex>,
        cycles: &mut Vec<Vec<PathBuf>>,
    ) {
        colors.insert(node, Color::Gray);
        path.push(node);

        for neighbor in self.graph.neighbors(node) {
            match colors.get(&neighbor) {
                Some(Color::Gray) => {
                    if let Some(start) = path.iter().position(|n| *n == neighbor) {
                        let mut cycle: Vec<PathBuf> =
                            path[start..].iter().map(|idx| self.graph[*idx].clone()).collect();
                        cycle.push(self.graph[neighbor].clone());
                        cycles.push(cycle);
                    }
                }
                Some(Color::White) => self.dfs_visit(neighbor, colors, path, cycles),
                _ => {}
            }
        }

        path.pop();
        colors.insert(node, Color::Black);
    }

    /// Renders the graph below `root` as an indented tree, labelling each
    /// node with `label`.
    pub fn to_tree_string<F>(&self, root: &Path, label: F) -> String
    where
        F: Fn(&Path) -> String,
    {
        let mut result = format!("{}\n", label(root));
        let mut visited = HashSet::new();
        visited.insert(root.to_path_buf());

        let deps = self.direct_dependencies(root);
        for (i, dep) in deps.iter().enumerate() {
            self.build_tree_string(dep, &label, &mut result, "", i == deps.len() - 1, &mut visited);
        }
        result
    }

    fn build_tree_string<F>(
        &self,
        node: &Path,
        label: &F,
        result: &mut String,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<PathBuf>,
    ) where
        F: Fn(&Path) -> String,
    {
        let connector = if is_last {
            "└── "
        } else {
            "├── "
        };
        result.push_str(&format!("{prefix}{connector}{}\n", label(node)));

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        if !visited.insert(node.to_path_buf()) {
            if !self.direct_dependencies(node).is_empty() {
                result.push_str(&format!("{child_prefix}└── (already listed)\n"));
            }
            return;
        }

        let deps = self.direct_dependencies(node);
        for (i, dep) in deps.iter().enumerate() {
            self.build_tree_string(dep, label, result, &child_prefix, i == deps.len() - 1, visited);
        }
    }
}
