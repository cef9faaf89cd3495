use serde::{Deserialize, Serialize};

/// JSON form of the environment configuration. Every field is optional; the
/// defaults reproduce the classic traffic routing setup.
#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvConfigDto {
    pub seed: u64,
    pub step_budget: i64,
    pub terminal_bonus: f64,
    pub invalid_action_penalty: f64,
    pub step_budget_penalty: f64,
    pub traffic_source: TrafficSourceDto,
    pub traffic_evolution: TrafficEvolutionDto,
    pub topology_error_policy: TopologyErrorPolicyDto,
    pub bidirectional_links: bool,
}

impl Default for EnvConfigDto {
    fn default() -> Self {
        Self {
            seed: 0,
            step_budget: 100,
            terminal_bonus: 10.0,
            invalid_action_penalty: -1.0,
            step_budget_penalty: -10.0,
            traffic_source: TrafficSourceDto::Entropy,
            traffic_evolution: TrafficEvolutionDto::Static,
            topology_error_policy: TopologyErrorPolicyDto::Propagate,
            bidirectional_links: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum TrafficSourceDto {
    Entropy,
    Seeded(u64),
}

#[derive(Debug, Deserialize, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum TrafficEvolutionDto {
    Static,
    #[serde(rename_all = "camelCase")]
    Perturb { low_pct: f64, high_pct: f64 },
}

#[derive(Debug, Deserialize, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TopologyErrorPolicyDto {
    Propagate,
    Penalize,
}
