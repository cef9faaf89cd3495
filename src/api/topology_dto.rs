use serde::{Deserialize, Serialize};

/// Raw topology description as found in a `.json` topology file, or as
/// produced by the SNDlib loader.
#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyDto {
    #[serde(default)]
    pub name: Option<String>,
    pub nodes: Vec<NodeDto>,
    pub links: Vec<LinkDto>,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDto {
    pub id: String,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDto {
    pub id: String,
    pub source: String,
    pub target: String,
    pub capacity: f64,
}
