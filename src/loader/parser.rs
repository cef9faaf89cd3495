use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::api::topology_dto::TopologyDto;
use crate::error::{Error, Result};
use crate::loader::sndlib::parse_sndlib_str;

/// Parses a JSON file into a given type `T`.
///
/// This function reads a file from `file_path`, attempts to parse it
/// as JSON, and returns an instance of `T`.
///
/// Errors are automatically converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed.
pub fn parse_json_file<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T> {
    let data = fs::read_to_string(file_path).map_err(Error::IoError)?;

    let parsed_data: T = serde_json::from_str(&data).map_err(Error::DeserializationError)?;

    Ok(parsed_data)
}

/// Loads a topology file, choosing the format from the file extension:
/// `.json` files are read as [`TopologyDto`], everything else is treated as
/// SNDlib native format.
pub fn load_topology_file(file_path: impl AsRef<Path>) -> Result<TopologyDto> {
    let file_path = file_path.as_ref();
    let is_json = file_path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let topology = if is_json {
        parse_json_file::<TopologyDto>(file_path)?
    } else {
        let data = fs::read_to_string(file_path)?;
        parse_sndlib_str(&data)?
    };

    log::info!(
        "Loaded topology '{}' from '{}': {} nodes, {} links.",
        topology.name.as_deref().unwrap_or("unnamed"),
        file_path.display(),
        topology.nodes.len(),
        topology.links.len()
    );

    Ok(topology)
}
