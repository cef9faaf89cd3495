use serde::Serialize;

use crate::domain::env::traffic::traffic_row;
use crate::domain::topology::graph::{RoutingGraph, State};

/// What the agent sees after `reset` and `step`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// `[current, start, end]` node indices.
    pub state_space: [usize; 3],

    /// One `[link index, traffic, capacity]` row per link, in link index order.
    pub traffic_space: Vec<[f64; 3]>,
}

impl Observation {
    pub fn assemble<G: RoutingGraph + ?Sized>(state: &State, graph: &G) -> Self {
        Self {
            state_space: [state.current.get(), state.start.get(), state.end.get()],
            traffic_space: graph.links().iter().map(traffic_row).collect(),
        }
    }

    pub fn current(&self) -> usize {
        self.state_space[0]
    }

    pub fn start(&self) -> usize {
        self.state_space[1]
    }

    pub fn end(&self) -> usize {
        self.state_space[2]
    }

    /// Traffic of the link with the given index.
    pub fn traffic(&self, link: usize) -> Option<f64> {
        self.traffic_space.get(link).map(|row| row[1])
    }
}

/// Upper bound of the action index domain. Not every index below `n` is
/// valid from every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionSpace {
    pub n: usize,
}

impl ActionSpace {
    pub fn contains(&self, action: usize) -> bool {
        action < self.n
    }
}

/// Bounds of every observation the environment can emit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObservationSpace {
    pub num_nodes: usize,
    pub num_links: usize,
    pub max_capacity: f64,
}

impl ObservationSpace {
    pub fn from_graph<G: RoutingGraph + ?Sized>(graph: &G) -> Self {
        Self { num_nodes: graph.num_nodes(), num_links: graph.num_links(), max_capacity: graph.max_capacity() }
    }

    pub fn contains(&self, observation: &Observation) -> bool {
        let state_ok = observation.state_space.iter().all(|&node| node < self.num_nodes);
        let rows_ok = observation.traffic_space.len() == self.num_links
            && observation.traffic_space.iter().enumerate().all(|(i, row)| {
                let [index, traffic, capacity] = *row;
                index == i as f64 && (0.0..=self.max_capacity).contains(&traffic) && (0.0..=self.max_capacity).contains(&capacity) && traffic <= capacity
            });

        state_ok && rows_ok
    }
}
