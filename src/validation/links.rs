//! Link-graph validation over a builder tree
//!
//! Builds a directed graph whose nodes are builder paths and whose edges
//! run from each link's owning group to the link's target, then reports
//! dangling links and cycles.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::{Directed, Graph};
use tracing::warn;

use crate::builder::{Builder, GroupBuilder};

/// Result of link validation
#[derive(Debug)]
pub struct LinkValidationResult {
    /// Links whose target path resolves to nothing
    pub dangling: Vec<DanglingLink>,
    /// Cycles through link edges, each given as the paths involved
    pub cycles: Vec<Vec<String>>,
}

impl LinkValidationResult {
    pub fn is_valid(&self) -> bool {
        self.dangling.is_empty() && self.cycles.is_empty()
    }
}

/// A link that does not resolve from the tree root
#[derive(Debug, Clone, PartialEq)]
pub struct DanglingLink {
    /// Path of the link node itself
    pub path: String,
    /// The target path it declares
    pub target_path: String,
}

/// Link validator over completed builder trees
pub struct LinkValidator;

impl LinkValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate every link reachable from `root`
    pub fn validate(&self, root: &GroupBuilder) -> LinkValidationResult {
        let mut links = Vec::new();
        collect_links(root, "", &mut links);

        let mut dangling = Vec::new();
        let mut graph = Graph::<String, (), Directed>::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

        for link in &links {
            if root.get_by_path(&link.target_path).is_none() {
                warn!(
                    path = %link.path,
                    target = %link.target_path,
                    "dangling link"
                );
                dangling.push(link.clone());
                continue;
            }
            let source = *node_map
                .entry(link.owner_path.clone())
                .or_insert_with(|| graph.add_node(link.owner_path.clone()));
            let target = *node_map
                .entry(link.target_path.clone())
                .or_insert_with(|| graph.add_node(link.target_path.clone()));
            graph.add_edge(source, target, ());
        }

        // strongly connected components of size > 1 are cycles; a
        // single-node component cycles only through a self-edge
        let mut cycles = Vec::new();
        for component in tarjan_scc(&graph) {
            let is_cycle = component.len() > 1
                || component
                    .first()
                    .is_some_and(|&node| graph.find_edge(node, node).is_some());
            if is_cycle {
                let mut paths: Vec<String> =
                    component.iter().map(|&node| graph[node].clone()).collect();
                paths.sort_unstable();
                warn!(?paths, "link cycle");
                cycles.push(paths);
            }
        }

        LinkValidationResult {
            dangling: dangling
                .into_iter()
                .map(|link| DanglingLink {
                    path: link.path,
                    target_path: link.target_path,
                })
                .collect(),
            cycles,
        }
    }
}

impl Default for LinkValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct CollectedLink {
    /// Path of the link node
    path: String,
    /// Path of the group owning the link (cycle semantics follow
    /// construction: building the owner requires the target)
    owner_path: String,
    target_path: String,
}

fn collect_links(group: &GroupBuilder, group_path: &str, links: &mut Vec<CollectedLink>) {
    for child in group.children() {
        let child_path = format!("{}/{}", group_path, child.name());
        match child {
            Builder::Link(link) => links.push(CollectedLink {
                path: child_path,
                owner_path: group_path.to_string(),
                target_path: link.target_path().to_string(),
            }),
            Builder::Group(child_group) => collect_links(child_group, &child_path, links),
            Builder::Dataset(_) => {}
        }
    }
}
