//! Concept relationship graph
//!
//! Edges are never dropped: relationships pointing at unknown concepts are
//! kept and listed as dangling, and cycles are either reported or rejected
//! depending on [`CyclePolicy`].

use super::types::{Concept, EnrichmentError, RelationshipType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What to do when directed relationships form a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Build the graph and report cycles
    #[default]
    Allow,
    /// Refuse to build a cyclic graph
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptEdge {
    pub source: String,
    pub target: String,
    pub relationship: RelationshipType,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConceptGraph {
    nodes: BTreeSet<String>,
    edges: Vec<ConceptEdge>,
    /// Edges whose target is not a known concept
    dangling: Vec<ConceptEdge>,
    /// Each cycle as a closed path, first id repeated at the end
    cycles: Vec<Vec<String>>,
}

impl ConceptGraph {
    pub fn build(concepts: &[Concept], policy: CyclePolicy) -> Result<Self, EnrichmentError> {
        let nodes: BTreeSet<String> = concepts.iter().map(|c| c.id.clone()).collect();
        let mut edges = Vec::new();
        let mut dangling = Vec::new();

        for concept in concepts {
            for rel in &concept.relationships {
                let edge = ConceptEdge {
                    source: concept.id.clone(),
                    target: rel.target.clone(),
                    relationship: rel.relationship,
                };
                if nodes.contains(&rel.target) {
                    edges.push(edge);
                } else {
                    dangling.push(edge);
                }
            }
        }

        let mut graph = Self {
            nodes,
            edges,
            dangling,
            cycles: Vec::new(),
        };
        graph.cycles = graph.find_cycles();

        if policy == CyclePolicy::Reject {
            if let Some(cycle) = graph.cycles.first() {
                return Err(EnrichmentError::CycleDetected(cycle.clone()));
            }
        }
        Ok(graph)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[ConceptEdge] {
        &self.edges
    }

    pub fn dangling(&self) -> &[ConceptEdge] {
        &self.dangling
    }

    pub fn cycles(&self) -> &[Vec<String>] {
        &self.cycles
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Outgoing edges of `id`, any relationship type
    pub fn neighbors<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a ConceptEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == id)
    }

    /// Concepts `id` depends on, directly.
    pub fn dependencies<'a>(&'a self, id: &'a str) -> Vec<&'a str> {
        self.neighbors(id)
            .filter(|e| e.relationship == RelationshipType::DependsOn)
            .map(|e| e.target.as_str())
            .collect()
    }

    fn directed_adjacency(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut adj: BTreeMap<&str, Vec<&str>> =
            self.nodes.iter().map(|n| (n.as_str(), Vec::new())).collect();
        for edge in self.edges.iter().filter(|e| e.relationship.is_directed()) {
            if let Some(targets) = adj.get_mut(edge.source.as_str()) {
                targets.push(edge.target.as_str());
            }
        }
        adj
    }

    /// Depth-first search over directed relationships; one cycle per back edge.
    fn find_cycles(&self) -> Vec<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            New,
            Active,
            Done,
        }

        let adj = self.directed_adjacency();
        let mut marks: BTreeMap<&str, Mark> = adj.keys().map(|k| (*k, Mark::New)).collect();
        let mut cycles = Vec::new();

        for &start in adj.keys() {
            if marks.get(start) != Some(&Mark::New) {
                continue;
            }
            // (node, next child index)
            let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
            marks.insert(start, Mark::Active);

            while let Some((node, child)) = stack.last().copied() {
                let children = adj.get(node).map(Vec::as_slice).unwrap_or(&[]);
                if child >= children.len() {
                    marks.insert(node, Mark::Done);
                    stack.pop();
                    continue;
                }
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                let next = children[child];
                match marks.get(next).copied().unwrap_or(Mark::Done) {
                    Mark::New => {
                        marks.insert(next, Mark::Active);
                        stack.push((next, 0));
                    }
                    Mark::Active => {
                        let from = stack.iter().position(|(n, _)| *n == next).unwrap_or(0);
                        let mut cycle: Vec<String> =
                            stack[from..].iter().map(|(n, _)| n.to_string()).collect();
                        cycle.push(next.to_string());
                        cycles.push(cycle);
                    }
                    Mark::Done => {}
                }
            }
        }
        cycles
    }

    /// Dependency-first ordering over directed relationships; `None` when cyclic.
    pub fn topological_order(&self) -> Option<Vec<String>> {
        if self.has_cycles() {
            return None;
        }
        let adj = self.directed_adjacency();
        let mut visited: BTreeSet<&str> = BTreeSet::new();
        let mut order = Vec::new();

        fn visit<'a>(
            node: &'a str,
            adj: &BTreeMap<&'a str, Vec<&'a str>>,
            visited: &mut BTreeSet<&'a str>,
            order: &mut Vec<String>,
        ) {
            if !visited.insert(node) {
                return;
            }
            for &next in adj.get(node).map(Vec::as_slice).unwrap_or(&[]) {
                visit(next, adj, visited, order);
            }
            order.push(node.to_string());
        }

        for &node in adj.keys() {
            visit(node, &adj, &mut visited, &mut order);
        }
        Some(order)
    }
}
