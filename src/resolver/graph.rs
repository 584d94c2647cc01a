//! The target dependency graph.
//!
//! Targets live in a petgraph arena, added in declaration order so that a
//! node's index is its declaration index. An edge `a -> b` means "a depends
//! on b".

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::core::error::DescriptorError;
use crate::core::Target;

/// Dependency graph over a package's targets.
#[derive(Debug)]
pub struct TargetGraph<'a> {
    graph: DiGraph<&'a Target, ()>,
    by_name: HashMap<&'a str, NodeIndex>,
}

impl<'a> TargetGraph<'a> {
    /// Build the graph from targets in declaration order.
    ///
    /// Dependencies naming unknown targets are skipped; the loader has
    /// already rejected them.
    pub fn new(targets: &'a [Target]) -> Self {
        let mut graph = DiGraph::with_capacity(targets.len(), targets.len());
        let mut by_name = HashMap::with_capacity(targets.len());

        for target in targets {
            let node = graph.add_node(target);
            by_name.insert(target.name.as_str(), node);
        }

        for target in targets {
            let Some(&from) = by_name.get(target.name.as_str()) else {
                continue;
            };
            for dep in target.target_dependencies() {
                if let Some(&to) = by_name.get(dep) {
                    if !graph.contains_edge(from, to) {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }

        TargetGraph { graph, by_name }
    }

    pub(crate) fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Direct dependencies of a target, in declaration order.
    pub fn dependencies(&self, name: &str) -> Vec<&'a Target> {
        match self.by_name.get(name) {
            Some(&node) => self
                .sorted_neighbors(node, Direction::Outgoing)
                .into_iter()
                .map(|n| self.graph[n])
                .collect(),
            None => Vec::new(),
        }
    }

    /// All targets reachable from the given target, excluding itself.
    pub fn transitive_dependencies(&self, name: &str) -> HashSet<&'a str> {
        let mut visited = HashSet::new();
        let Some(&start) = self.by_name.get(name) else {
            return visited;
        };

        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            for next in self.graph.neighbors_directed(node, Direction::Outgoing) {
                if next != start && visited.insert(self.graph[next].name.as_str()) {
                    stack.push(next);
                }
            }
        }

        visited
    }

    /// Get targets in build order: dependencies before dependents.
    ///
    /// Among targets whose dependencies are all satisfied, the one declared
    /// first is emitted first, so the order is fully determined by the input.
    pub fn topological_order(&self) -> Result<Vec<&'a Target>, DescriptorError> {
        let mut pending: Vec<usize> = self
            .graph
            .node_indices()
            .map(|n| self.graph.neighbors_directed(n, Direction::Outgoing).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<usize>> = pending
            .iter()
            .enumerate()
            .filter(|(_, count)| **count == 0)
            .map(|(index, _)| Reverse(index))
            .collect();

        let mut order = Vec::with_capacity(self.len());
        while let Some(Reverse(index)) = ready.pop() {
            let node = NodeIndex::new(index);
            order.push(self.graph[node]);

            for dependent in self.graph.neighbors_directed(node, Direction::Incoming) {
                let count = &mut pending[dependent.index()];
                *count -= 1;
                if *count == 0 {
                    ready.push(Reverse(dependent.index()));
                }
            }
        }

        if order.len() < self.len() {
            let cycle = self.find_cycle();
            tracing::debug!("target graph has a cycle: {}", cycle.join(" -> "));
            return Err(DescriptorError::CyclicDependency { cycle });
        }

        Ok(order)
    }

    /// Find one dependency cycle, as target names closing on the first one.
    ///
    /// Picks the strongly connected component containing the earliest
    /// declared target on a cycle, then walks the shortest path from that
    /// target back to itself.
    fn find_cycle(&self) -> Vec<String> {
        let components = tarjan_scc(&self.graph);
        let Some(members) = components
            .iter()
            .filter(|scc| {
                scc.len() > 1 || scc.iter().any(|&n| self.graph.contains_edge(n, n))
            })
            .min_by_key(|scc| scc.iter().min().copied())
        else {
            return Vec::new();
        };

        let in_scc: HashSet<NodeIndex> = members.iter().copied().collect();
        let Some(start) = members.iter().min().copied() else {
            return Vec::new();
        };

        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            for next in self.sorted_neighbors(node, Direction::Outgoing) {
                if !in_scc.contains(&next) {
                    continue;
                }
                if next == start {
                    let mut path = vec![node];
                    let mut current = node;
                    while current != start {
                        match parent.get(&current) {
                            Some(&prev) => {
                                path.push(prev);
                                current = prev;
                            }
                            None => break,
                        }
                    }
                    path.reverse();
                    path.push(start);
                    return path
                        .into_iter()
                        .map(|n| self.graph[n].name.clone())
                        .collect();
                }
                if !parent.contains_key(&next) {
                    parent.insert(next, node);
                    queue.push_back(next);
                }
            }
        }

        members
            .iter()
            .map(|&n| self.graph[n].name.clone())
            .collect()
    }

    fn sorted_neighbors(&self, node: NodeIndex, direction: Direction) -> BTreeSet<NodeIndex> {
        self.graph.neighbors_directed(node, direction).collect()
    }
}
