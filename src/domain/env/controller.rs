use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::env::config::{EnvConfig, TopologyErrorPolicy, TrafficEvolution};
use crate::domain::env::episode::EpisodeState;
use crate::domain::env::observation::{ActionSpace, Observation, ObservationSpace};
use crate::domain::env::reward::RewardFunction;
use crate::domain::env::traffic::{TrafficModel, format_traffic_table, traffic_row};
use crate::domain::topology::graph::{Action, RoutingGraph, State};
use crate::domain::topology::network_graph::NetworkGraph;
use crate::error::{Error, Result};

/// How the environment handled a `step` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepOutcome {
    /// The packet moved over the selected link.
    Valid,

    /// The action index was out of range for the current node.
    InvalidAction,

    /// The graph failed while handling the action and the failure was turned
    /// into a penalty (see [`TopologyErrorPolicy::Penalize`]).
    TopologyError,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    pub finished: bool,

    /// Auxiliary information. Currently always empty.
    pub info: Map<String, Value>,

    pub outcome: StepOutcome,
}

/// Drives single-packet routing episodes over a network graph.
///
/// The controller exclusively owns the graph (and with it the link traffic),
/// the two random sources and the [`EpisodeState`]. `reset` and `step` are the
/// only transitions.
#[derive(Debug)]
pub struct EpisodeController<G: RoutingGraph = NetworkGraph> {
    graph: G,
    config: EnvConfig,

    /// Start/end selection; seeded once from `config.seed`.
    episode_rng: StdRng,

    traffic_model: TrafficModel,
    reward_fn: RewardFunction,
    episode: EpisodeState,

    action_space: ActionSpace,
    observation_space: ObservationSpace,
}

pub type TrafficRoutingEnv = EpisodeController<NetworkGraph>;

impl<G: RoutingGraph> EpisodeController<G> {
    pub fn new(mut graph: G, config: EnvConfig) -> Result<Self> {
        config.validate()?;

        if graph.num_nodes() < 2 {
            return Err(Error::InvalidTopology(format!("at least 2 nodes are required, found {}", graph.num_nodes())));
        }
        if graph.num_links() == 0 {
            return Err(Error::InvalidTopology("the topology contains no links".to_string()));
        }

        let mut episode_rng = StdRng::seed_from_u64(config.seed);
        let mut traffic_model = TrafficModel::new(config.traffic_source);

        traffic_model.sample_all(graph.links_mut());
        log::debug!("Initial traffic table:\n{}", format_traffic_table(graph.links()));

        let state = graph.get_initial_state(&mut episode_rng)?;
        let episode = EpisodeState::begin(state, graph.num_nodes(), -1);

        let action_space = ActionSpace { n: graph.max_out_degree() };
        let observation_space = ObservationSpace::from_graph(&graph);

        log::info!(
            "Environment ready: {} nodes, {} links, {} actions, max capacity {} | Start Node: {} | End Node: {}",
            observation_space.num_nodes,
            observation_space.num_links,
            action_space.n,
            observation_space.max_capacity,
            state.start,
            state.end
        );

        Ok(Self { graph, reward_fn: RewardFunction::new(config.terminal_bonus), config, episode_rng, traffic_model, episode, action_space, observation_space })
    }

    /// Starts a new episode: fresh start/end pair, freshly sampled traffic,
    /// cleared node flags.
    pub fn reset(&mut self) -> Result<Observation> {
        let state = self.graph.get_initial_state(&mut self.episode_rng)?;

        self.traffic_model.sample_all(self.graph.links_mut());
        self.episode = EpisodeState::begin(state, self.graph.num_nodes(), self.episode.episode_index + 1);

        log::info!("Episode {} reset | Start Node: {} | End Node: {}", self.episode.episode_index, state.start, state.end);
        log::debug!("Traffic table:\n{}", format_traffic_table(self.graph.links()));

        Ok(self.observation())
    }

    /// Moves the packet over the `action_index`-th outgoing link of the
    /// current node.
    ///
    /// An out-of-range index is not an error: the step is charged the invalid
    /// action penalty and nothing else changes. Once the step index exceeds the
    /// step budget the episode is finished with the budget penalty, whatever
    /// the step did otherwise.
    pub fn step(&mut self, action_index: usize) -> Result<StepResult> {
        self.episode.step_index += 1;
        let step_index = self.episode.step_index;

        let (mut reward, outcome) = match self.apply_action(action_index) {
            Ok(reward) => {
                self.evolve_traffic()?;
                (reward, StepOutcome::Valid)
            }
            Err(Error::ActionNotAvailable { index, available }) => {
                self.episode.invalid_actions += 1;
                tracing::debug!(step = step_index, index, available, "InvalidAction: action index out of range, applying penalty");
                (self.config.invalid_action_penalty, StepOutcome::InvalidAction)
            }
            Err(err) => match self.config.topology_error_policy {
                TopologyErrorPolicy::Propagate => return Err(err),
                TopologyErrorPolicy::Penalize => {
                    tracing::warn!(step = step_index, error = %err, "TopologyError: graph failed on action {}, applying penalty", action_index);
                    (self.config.invalid_action_penalty, StepOutcome::TopologyError)
                }
            },
        };

        if step_index > self.config.step_budget {
            if !self.episode.finished {
                tracing::info!(step = step_index, budget = self.config.step_budget, "StepBudgetExceeded: episode {} cut", self.episode.episode_index);
            }
            self.episode.finished = true;
            reward = self.config.step_budget_penalty;
        }

        self.episode.total_reward += reward;

        tracing::debug!(step = step_index, action = action_index, current = %self.episode.state.current, reward, finished = self.episode.finished, outcome = ?outcome, "step");

        Ok(StepResult { observation: self.observation(), reward, finished: self.episode.finished, info: Map::new(), outcome })
    }

    /// Resolves, rewards and commits a valid action. Every fallible call
    /// happens before the first mutation, so a rejected action leaves the
    /// episode untouched.
    fn apply_action(&mut self, action_index: usize) -> Result<f64> {
        let prior = self.episode.state;

        let actions = self.graph.get_actions(&prior)?;
        let action: Action = *actions.get(action_index).ok_or(Error::ActionNotAvailable { index: action_index, available: actions.len() })?;

        let next = self.graph.resolve(&action, &prior)?;
        let reward = self.reward_fn.reward(&self.graph, &action, &prior)?;
        let finished = self.graph.terminate(&action, &prior);

        self.episode.state = next;
        let revisit = self.episode.mark_visited(next.current);
        self.episode.finished = finished;

        tracing::trace!(from = %action.from, to = %action.to, link = %action.link, revisit, "hop");

        Ok(reward)
    }

    fn evolve_traffic(&mut self) -> Result<()> {
        match self.config.traffic_evolution {
            TrafficEvolution::Static => Ok(()),
            TrafficEvolution::Perturb { low_pct, high_pct } => self.perturb_traffic(low_pct, high_pct),
        }
    }

    /// Shifts all link loads by a random percentage in `[low_pct, high_pct]`.
    /// Never invoked by `reset`/`step` unless configured through
    /// [`TrafficEvolution::Perturb`].
    pub fn perturb_traffic(&mut self, low_pct: f64, high_pct: f64) -> Result<()> {
        self.traffic_model.perturb(self.graph.links_mut(), low_pct, high_pct)
    }

    pub fn observation(&self) -> Observation {
        Observation::assemble(&self.episode.state, &self.graph)
    }

    pub fn traffic_table(&self) -> Vec<[f64; 3]> {
        self.graph.links().iter().map(traffic_row).collect()
    }

    /// Actions offered from the current node, in action index order.
    pub fn valid_actions(&self) -> Result<Vec<Action>> {
        self.graph.get_actions(&self.episode.state)
    }

    pub fn state(&self) -> State {
        self.episode.state
    }

    pub fn episode(&self) -> &EpisodeState {
        &self.episode
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn action_space(&self) -> ActionSpace {
        self.action_space
    }

    pub fn observation_space(&self) -> ObservationSpace {
        self.observation_space
    }
}
