use crate::domain::topology::graph::State;
use crate::domain::topology::node::NodeFlags;
use crate::domain::utils::id::NodeIndex;

/// Everything that changes during one episode.
///
/// Owned by exactly one controller and replaced wholesale on every reset.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeState {
    pub state: State,

    /// `-1` until the first step of the episode.
    pub step_index: i64,

    /// `-1` before the first reset.
    pub episode_index: i64,

    pub finished: bool,

    /// Number of steps rejected with the invalid action penalty.
    pub invalid_actions: u64,

    pub total_reward: f64,

    node_flags: Vec<NodeFlags>,
}

impl EpisodeState {
    /// Starts an episode on `state`: all flags cleared, then the start node is
    /// marked `is_start` and `visited`, the end node `is_end`.
    pub fn begin(state: State, num_nodes: usize, episode_index: i64) -> Self {
        let mut node_flags = vec![NodeFlags::default(); num_nodes];

        if let Some(start) = node_flags.get_mut(state.start.get()) {
            start.is_start = true;
            start.visited = true;
        }
        if let Some(end) = node_flags.get_mut(state.end.get()) {
            end.is_end = true;
        }

        Self { state, step_index: -1, episode_index, finished: false, invalid_actions: 0, total_reward: 0.0, node_flags }
    }

    pub fn flags(&self, node: NodeIndex) -> Option<NodeFlags> {
        self.node_flags.get(node.get()).copied()
    }

    pub fn node_flags(&self) -> &[NodeFlags] {
        &self.node_flags
    }

    /// Returns whether the node had been visited before.
    pub fn mark_visited(&mut self, node: NodeIndex) -> bool {
        match self.node_flags.get_mut(node.get()) {
            Some(flags) => std::mem::replace(&mut flags.visited, true),
            None => false,
        }
    }

    pub fn visited_count(&self) -> usize {
        self.node_flags.iter().filter(|flags| flags.visited).count()
    }

    pub fn reached_destination(&self) -> bool {
        self.state.current == self.state.end
    }
}
