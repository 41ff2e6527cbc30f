//! Data model filled in by each pipeline stage (§3).
//!
//! Areas and agent starts arrive from the input file and are immutable
//! thereafter; the decomposer creates nodes once; assignment fills
//! `assigned`; routing fills `depot` and `tour`. Nothing here is mutated
//! after the emitter reads it.

use std::collections::HashMap;

use crate::geometry::{GeoPoint, Polygon};

/// An ordered list of polygons: index 0 is the inclusion boundary, the rest
/// are exclusions (§3, Area set).
#[derive(Debug, Clone)]
pub struct AreaSet {
    polygons: Vec<Polygon>,
}

impl AreaSet {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// The survey boundary polygon (index 0).
    pub fn inclusion(&self) -> &Polygon {
        &self.polygons[0]
    }

    /// Forbidden sub-regions (indices 1..).
    pub fn exclusions(&self) -> &[Polygon] {
        &self.polygons[1..]
    }

    /// All polygons, inclusion first, for edge-intersection checks that
    /// apply uniformly to every ring (§4.2.1).
    pub fn all(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

/// A square cell footprint of side `dim` meters, carrying its four corners
/// and center (§3, Cell).
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub corners: [GeoPoint; 4],
    pub center: GeoPoint,
}

/// The accepted cell centers, indexed in row-major decomposition order
/// (§4.2). Node index is simply position in this list.
#[derive(Debug, Clone, Default)]
pub struct NodeGraph {
    nodes: Vec<GeoPoint>,
}

impl NodeGraph {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn push(&mut self, center: GeoPoint) -> usize {
        self.nodes.push(center);
        self.nodes.len() - 1
    }

    pub fn get(&self, index: usize) -> GeoPoint {
        self.nodes[index]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, GeoPoint)> + '_ {
        self.nodes.iter().copied().enumerate()
    }
}

/// A Hamiltonian-cycle tour represented as a successor mapping
/// `node -> next node` (§3, Agent.tour).
#[derive(Debug, Clone, Default)]
pub struct Tour {
    successor: HashMap<usize, usize>,
}

impl Tour {
    pub fn new() -> Self {
        Self {
            successor: HashMap::new(),
        }
    }

    pub fn set_next(&mut self, from: usize, to: usize) {
        self.successor.insert(from, to);
    }

    pub fn next(&self, from: usize) -> Option<usize> {
        self.successor.get(&from).copied()
    }

    pub fn len(&self) -> usize {
        self.successor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.successor.is_empty()
    }

    /// Walk the cycle starting (and ending) at `depot`, yielding each node
    /// visited including the closing return to `depot`.
    pub fn walk(&self, depot: usize) -> TourWalk<'_> {
        TourWalk {
            tour: self,
            current: depot,
            depot,
            done: false,
        }
    }
}

/// Iterator over a tour's cycle, starting and closing at the depot.
pub struct TourWalk<'a> {
    tour: &'a Tour,
    current: usize,
    depot: usize,
    done: bool,
}

impl<'a> Iterator for TourWalk<'a> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.tour.next(self.current)?;
        let edge = (self.current, next);
        self.current = next;
        if next == self.depot {
            self.done = true;
        }
        Some(edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tour_walk_visits_all_assigned_nodes_and_closes() {
        let mut tour = Tour::new();
        tour.set_next(0, 1);
        tour.set_next(1, 2);
        tour.set_next(2, 0);

        let visited: Vec<(usize, usize)> = tour.walk(0).collect();
        assert_eq!(visited, vec![(0, 1), (1, 2), (2, 0)]);
    }

    #[test]
    fn node_graph_preserves_insertion_order() {
        let mut graph = NodeGraph::new();
        let a = graph.push(GeoPoint::new(0.0, 0.0));
        let b = graph.push(GeoPoint::new(1.0, 1.0));
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(graph.len(), 2);
    }
}
