use serde::Deserialize;
use serde_json::Value;

/// The slice of a `sys` envelope the client reads back.
#[derive(Debug, Clone, Deserialize)]
pub struct SysData {
    pub id: String,
    #[serde(default)]
    pub version: Option<u64>,
}

/// A space as the management API returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct SpaceData {
    pub sys: SysData,
    pub name: String,
}

/// One page of a collection endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Collection {
    pub items: Vec<Value>,
    #[serde(default)]
    pub total: usize,
}
