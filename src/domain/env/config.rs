use crate::api::env_config_dto::{EnvConfigDto, TopologyErrorPolicyDto, TrafficEvolutionDto, TrafficSourceDto};
use crate::domain::env::traffic::check_perturbation_range;
use crate::error::{Error, Result};

/// Where link traffic randomness comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrafficSource {
    /// Fresh OS entropy on every sampling call; traffic is not reproducible.
    Entropy,

    /// A dedicated generator seeded once, for fully deterministic replay.
    Seeded(u64),
}

/// How traffic evolves between resets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrafficEvolution {
    /// Traffic only changes on reset.
    Static,

    /// After every valid step each link load is shifted by a uniform
    /// percentage of its capacity drawn from `[low_pct, high_pct]`.
    Perturb { low_pct: f64, high_pct: f64 },
}

/// What `step` does when the graph fails for a reason other than an
/// out-of-range action index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyErrorPolicy {
    /// Return the error to the caller.
    Propagate,

    /// Treat it like an invalid action: penalty reward, episode continues.
    Penalize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvConfig {
    /// Seed of the start/end selection generator.
    pub seed: u64,

    /// The episode is cut once the step index exceeds this value.
    pub step_budget: i64,

    pub terminal_bonus: f64,
    pub invalid_action_penalty: f64,
    pub step_budget_penalty: f64,

    pub traffic_source: TrafficSource,
    pub traffic_evolution: TrafficEvolution,
    pub topology_error_policy: TopologyErrorPolicy,

    /// Passed on to the graph when it is built from a topology file.
    pub bidirectional_links: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            step_budget: 100,
            terminal_bonus: 10.0,
            invalid_action_penalty: -1.0,
            step_budget_penalty: -10.0,
            traffic_source: TrafficSource::Entropy,
            traffic_evolution: TrafficEvolution::Static,
            topology_error_policy: TopologyErrorPolicy::Propagate,
            bidirectional_links: true,
        }
    }
}

impl EnvConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.step_budget < 0 {
            return Err(Error::InvalidConfig(format!("step budget must not be negative, got {}", self.step_budget)));
        }

        for (name, value) in
            [("terminal bonus", self.terminal_bonus), ("invalid action penalty", self.invalid_action_penalty), ("step budget penalty", self.step_budget_penalty)]
        {
            if !value.is_finite() {
                return Err(Error::InvalidConfig(format!("{} must be finite, got {}", name, value)));
            }
        }

        if let TrafficEvolution::Perturb { low_pct, high_pct } = self.traffic_evolution {
            check_perturbation_range(low_pct, high_pct)?;
        }

        Ok(())
    }
}

impl TryFrom<EnvConfigDto> for EnvConfig {
    type Error = Error;

    fn try_from(dto: EnvConfigDto) -> Result<Self> {
        let config = EnvConfig {
            seed: dto.seed,
            step_budget: dto.step_budget,
            terminal_bonus: dto.terminal_bonus,
            invalid_action_penalty: dto.invalid_action_penalty,
            step_budget_penalty: dto.step_budget_penalty,
            traffic_source: match dto.traffic_source {
                TrafficSourceDto::Entropy => TrafficSource::Entropy,
                TrafficSourceDto::Seeded(seed) => TrafficSource::Seeded(seed),
            },
            traffic_evolution: match dto.traffic_evolution {
                TrafficEvolutionDto::Static => TrafficEvolution::Static,
                TrafficEvolutionDto::Perturb { low_pct, high_pct } => TrafficEvolution::Perturb { low_pct, high_pct },
            },
            topology_error_policy: match dto.topology_error_policy {
                TopologyErrorPolicyDto::Propagate => TopologyErrorPolicy::Propagate,
                TopologyErrorPolicyDto::Penalize => TopologyErrorPolicy::Penalize,
            },
            bidirectional_links: dto.bidirectional_links,
        };

        config.validate()?;
        Ok(config)
    }
}
