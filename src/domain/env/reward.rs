use crate::domain::topology::graph::{Action, RoutingGraph, State};
use crate::error::{Error, Result};

/// Reward for a single hop.
///
/// Reaching the destination pays a fixed bonus. Any other hop costs the
/// utilization of the link it used, so the agent is pushed towards lightly
/// loaded links.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardFunction {
    pub terminal_bonus: f64,
}

impl Default for RewardFunction {
    fn default() -> Self {
        Self { terminal_bonus: 10.0 }
    }
}

impl RewardFunction {
    pub fn new(terminal_bonus: f64) -> Self {
        Self { terminal_bonus }
    }

    /// `state_before` is the state prior to the move. Traffic is read as it is
    /// at the moment of the call.
    pub fn reward<G: RoutingGraph + ?Sized>(&self, graph: &G, action: &Action, state_before: &State) -> Result<f64> {
        if action.to == state_before.end {
            return Ok(self.terminal_bonus);
        }

        let link = graph
            .link(action.link)
            .filter(|link| link.other_end(state_before.current) == Some(action.to))
            .ok_or(Error::LinkNotFound { from: state_before.current.get(), to: action.to.get() })?;

        Ok(-link.utilization())
    }
}
