use std::path::Path;

use crate::api::env_config_dto::EnvConfigDto;
use crate::domain::env::config::EnvConfig;
use crate::domain::env::controller::TrafficRoutingEnv;
use crate::domain::topology::network_graph::NetworkGraph;
use crate::error::Result;
use crate::loader::parser::{load_topology_file, parse_json_file};

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Reads an environment configuration JSON file.
pub fn load_env_config(file_path: impl AsRef<Path>) -> Result<EnvConfig> {
    let dto: EnvConfigDto = parse_json_file(file_path)?;
    EnvConfig::try_from(dto)
}

/// Builds a ready-to-use environment from a topology file (`.json` or SNDlib
/// native format).
pub fn build_environment(topology_path: impl AsRef<Path>, config: EnvConfig) -> Result<TrafficRoutingEnv> {
    let topology = load_topology_file(topology_path)?;
    log::info!("Topology file parsed successfully.");

    let graph = NetworkGraph::try_from((topology, config.bidirectional_links))?;
    log::info!("Network graph constructed successfully.");

    TrafficRoutingEnv::new(graph, config)
}
