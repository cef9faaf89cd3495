use rand::RngCore;
use serde::Serialize;

use crate::domain::topology::link::Link;
use crate::domain::utils::id::{LinkIndex, NodeIndex};
use crate::error::Result;

/// Routing progress of one episode: where the packet is, where it came from and
/// where it has to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct State {
    pub current: NodeIndex,
    pub start: NodeIndex,
    pub end: NodeIndex,
}

impl State {
    /// Fresh episode state with the packet sitting on `start`.
    pub fn new(start: NodeIndex, end: NodeIndex) -> Self {
        Self { current: start, start, end }
    }

    pub fn moved_to(self, node: NodeIndex) -> Self {
        Self { current: node, ..self }
    }
}

/// One traversable hop: leave `from` over `link` and arrive at `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Action {
    pub link: LinkIndex,
    pub from: NodeIndex,
    pub to: NodeIndex,
}

/// Graph-side contract the episode controller drives.
///
/// Implementations own the topology and the link traffic values; the
/// controller only rewrites traffic through [`RoutingGraph::links_mut`].
pub trait RoutingGraph: std::fmt::Debug {
    fn num_nodes(&self) -> usize;

    fn links(&self) -> &[Link];

    fn links_mut(&mut self) -> &mut [Link];

    /// Outgoing hops from `state.current`, in a stable order. The position in
    /// the returned vector is the action index an agent selects.
    fn get_actions(&self, state: &State) -> Result<Vec<Action>>;

    /// State reached by taking `action` from `state`.
    fn resolve(&self, action: &Action, state: &State) -> Result<State>;

    /// True iff taking `action` from `state` reaches `state.end`.
    fn terminate(&self, action: &Action, state: &State) -> bool;

    /// Random `(start, start, end)` triple with `start != end`.
    fn get_initial_state(&self, rng: &mut dyn RngCore) -> Result<State>;

    /// Largest number of outgoing hops of any node.
    fn max_out_degree(&self) -> usize;

    fn link(&self, index: LinkIndex) -> Option<&Link> {
        self.links().get(index.get())
    }

    fn num_links(&self) -> usize {
        self.links().len()
    }

    fn max_capacity(&self) -> f64 {
        self.links().iter().map(Link::capacity).fold(0.0, f64::max)
    }
}
