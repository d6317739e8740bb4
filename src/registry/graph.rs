// src/registry/graph.rs

//! Component dependency graph
//!
//! Directed graph over component ids where an edge `a -> b` means `a`
//! links against `b`. Used once per registry build to reject cycles and
//! afterwards to answer ordering and closure queries.
//!
//! All maps are ordered so every traversal, and therefore every error
//! message and link order, is the same for the same input.

use crate::error::{ConsistencyError, Result};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// DFS marking used for back-edge detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// Not reached yet
    White,
    /// On the current DFS path
    Grey,
    /// Fully explored
    Black,
}

/// A directed graph of component requirements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentGraph {
    /// Key: component id, Value: ids it requires
    edges: BTreeMap<String, BTreeSet<String>>,
    /// Key: component id, Value: ids that require it
    reverse_edges: BTreeMap<String, BTreeSet<String>>,
}

impl ComponentGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component with its requirements
    ///
    /// If the component already exists, this merges the requirements.
    pub fn add_component<'a>(&mut self, id: &str, requires: impl IntoIterator<Item = &'a str>) {
        self.edges.entry(id.to_string()).or_default();
        self.reverse_edges.entry(id.to_string()).or_default();

        for dep in requires {
            self.edges.entry(dep.to_string()).or_default();
            self.reverse_edges
                .entry(dep.to_string())
                .or_default()
                .insert(id.to_string());
            self.edges
                .entry(id.to_string())
                .or_default()
                .insert(dep.to_string());
        }
    }

    /// Number of nodes in the graph
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    /// Direct requirements of a component
    pub fn dependencies(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(id)
    }

    /// Components that directly require this one
    pub fn dependents(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.reverse_edges.get(id)
    }

    /// Find one cycle, if any
    ///
    /// Depth-first search with white/grey/black marking. Reaching a grey
    /// node means the edge closes a loop on the current path; the returned
    /// path starts and ends with the same id.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut marks: BTreeMap<&str, Mark> =
            self.edges.keys().map(|k| (k.as_str(), Mark::White)).collect();

        for start in self.edges.keys() {
            if marks.get(start.as_str()) == Some(&Mark::White) {
                if let Some(cycle) = self.visit(start, &mut marks) {
                    return Some(cycle);
                }
            }
        }

        None
    }

    /// Explore everything reachable from `start`
    ///
    /// The stack holds the current path, each node paired with the
    /// requirements it has yet to explore, so depth is bounded by memory
    /// rather than the call stack.
    fn visit<'a>(
        &'a self,
        start: &'a str,
        marks: &mut BTreeMap<&'a str, Mark>,
    ) -> Option<Vec<String>> {
        marks.insert(start, Mark::Grey);
        let mut stack = vec![(start, self.requirements(start))];

        while let Some((node, pending)) = stack.last_mut() {
            let node = *node;
            let Some(dep) = pending.next() else {
                marks.insert(node, Mark::Black);
                stack.pop();
                continue;
            };

            match marks.get(dep.as_str()).copied().unwrap_or(Mark::White) {
                Mark::White => {
                    marks.insert(dep.as_str(), Mark::Grey);
                    stack.push((dep.as_str(), self.requirements(dep)));
                }
                Mark::Grey => {
                    let from = stack.iter().position(|(n, _)| *n == dep.as_str()).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        stack[from..].iter().map(|(n, _)| n.to_string()).collect();
                    cycle.push(dep.clone());
                    return Some(cycle);
                }
                Mark::Black => {}
            }
        }

        None
    }

    fn requirements<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a String> {
        self.edges.get(id).into_iter().flatten()
    }

    /// Fail with a `Cycle` error if the graph is not acyclic
    pub fn ensure_acyclic(&self) -> Result<()> {
        match self.find_cycle() {
            Some(path) => Err(ConsistencyError::Cycle { path }.into()),
            None => Ok(()),
        }
    }

    /// Order components so every one appears after all its requirements
    ///
    /// Kahn's algorithm; among ready nodes the smallest id goes first.
    pub fn topological_sort(&self) -> Result<Vec<String>> {
        let mut remaining: BTreeMap<&str, usize> = self
            .edges
            .iter()
            .map(|(id, deps)| (id.as_str(), deps.len()))
            .collect();

        let mut ready: BTreeSet<&str> = remaining
            .iter()
            .filter(|&(_, deg)| *deg == 0)
            .map(|(id, _)| *id)
            .collect();

        let mut order = Vec::with_capacity(self.edges.len());

        while let Some(node) = ready.pop_first() {
            order.push(node.to_string());

            if let Some(dependents) = self.reverse_edges.get(node) {
                for dependent in dependents {
                    if let Some(deg) = remaining.get_mut(dependent.as_str()) {
                        *deg = deg.saturating_sub(1);
                        if *deg == 0 {
                            ready.insert(dependent.as_str());
                        }
                    }
                }
            }
        }

        if order.len() != self.edges.len() {
            self.ensure_acyclic()?;
        }

        Ok(order)
    }

    /// All components a component requires, directly or not
    pub fn transitive_dependencies(&self, id: &str) -> BTreeSet<String> {
        Self::closure(&self.edges, id)
    }

    /// All components that require a component, directly or not
    pub fn transitive_dependents(&self, id: &str) -> BTreeSet<String> {
        Self::closure(&self.reverse_edges, id)
    }

    fn closure(adjacency: &BTreeMap<String, BTreeSet<String>>, id: &str) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        if let Some(direct) = adjacency.get(id) {
            queue.extend(direct.iter().map(String::as_str));
        }

        while let Some(next) = queue.pop_front() {
            if seen.insert(next.to_string()) {
                if let Some(indirect) = adjacency.get(next) {
                    queue.extend(
                        indirect
                            .iter()
                            .map(String::as_str)
                            .filter(|n| !seen.contains(*n)),
                    );
                }
            }
        }

        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn tao_like() -> ComponentGraph {
        let mut graph = ComponentGraph::new();
        graph.add_component("ACE", []);
        graph.add_component("TAO", ["ACE"]);
        graph.add_component("TAO_AnyTypeCode", ["TAO"]);
        graph.add_component("TAO_PortableServer", ["TAO_AnyTypeCode", "TAO"]);
        graph.add_component("TAO_Svc_Utils", ["TAO_PortableServer"]);
        graph
    }

    #[test]
    fn test_add_component_creates_dependency_nodes() {
        let mut graph = ComponentGraph::new();
        graph.add_component("TAO", ["ACE"]);
        assert_eq!(graph.len(), 2);
        assert!(graph.contains("ACE"));
        assert!(graph.dependents("ACE").unwrap().contains("TAO"));
    }

    #[test]
    fn test_acyclic_graph_has_no_cycle() {
        assert!(tao_like().find_cycle().is_none());
        assert!(tao_like().ensure_acyclic().is_ok());
    }

    #[test]
    fn test_find_cycle_reports_path() {
        let mut graph = tao_like();
        graph.add_component("ACE", ["TAO_Svc_Utils"]);

        let cycle = graph.find_cycle().unwrap();
        assert_eq!(
            cycle,
            vec!["ACE", "TAO_Svc_Utils", "TAO_PortableServer", "TAO", "ACE"]
        );
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let mut graph = ComponentGraph::new();
        graph.add_component("ACE", ["ACE"]);
        assert_eq!(
            graph.find_cycle(),
            Some(vec!["ACE".to_string(), "ACE".to_string()])
        );
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut graph = ComponentGraph::new();
        graph.add_component("A", ["B", "C"]);
        graph.add_component("B", ["D"]);
        graph.add_component("C", ["D"]);
        assert!(graph.find_cycle().is_none());
    }

    #[test]
    fn test_topological_sort_orders_dependencies_first() {
        let order = tao_like().topological_sort().unwrap();
        assert_eq!(
            order,
            vec!["ACE", "TAO", "TAO_AnyTypeCode", "TAO_PortableServer", "TAO_Svc_Utils"]
        );
    }

    #[test]
    fn test_topological_sort_rejects_cycle() {
        let mut graph = tao_like();
        graph.add_component("TAO", ["TAO_Svc_Utils"]);
        let err = graph.topological_sort().unwrap_err();
        assert!(matches!(
            err,
            Error::ConsistencyError(ConsistencyError::Cycle { .. })
        ));
    }

    #[test]
    fn test_transitive_queries() {
        let graph = tao_like();
        let deps = graph.transitive_dependencies("TAO_Svc_Utils");
        assert_eq!(deps.len(), 4);
        assert!(deps.contains("ACE"));

        let dependents = graph.transitive_dependents("TAO");
        assert_eq!(dependents.len(), 3);
        assert!(!dependents.contains("ACE"));
        assert!(graph.transitive_dependencies("ACE").is_empty());
    }

    #[test]
    fn test_deep_chain_does_not_exhaust_the_stack() {
        let ids: Vec<String> = (0..100_000).map(|i| format!("c{:06}", i)).collect();
        let mut graph = ComponentGraph::new();
        for pair in ids.windows(2) {
            graph.add_component(&pair[0], [pair[1].as_str()]);
        }
        assert_eq!(graph.len(), ids.len());
        assert!(graph.find_cycle().is_none());
        assert_eq!(graph.topological_sort().unwrap().first(), ids.last());

        // Close the chain into one long loop
        graph.add_component(&ids[ids.len() - 1], [ids[0].as_str()]);
        let cycle = graph.find_cycle().unwrap();
        assert_eq!(cycle.len(), ids.len() + 1);
        assert_eq!(cycle.first(), Some(&ids[0]));
        assert_eq!(cycle.last(), Some(&ids[0]));
    }
}
