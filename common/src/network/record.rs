use std::collections::BTreeMap;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single key/value tag attached to an inventory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// One host as returned by the inventory query, before any filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    #[serde(default)]
    pub private_ip: Option<IpAddr>,
    #[serde(default)]
    pub public_ip: Option<IpAddr>,
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub launch_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl RawRecord {
    /// Collapses the tag list into a map. Later duplicates win.
    pub fn tag_map(&self) -> BTreeMap<String, String> {
        self.tags
            .iter()
            .map(|tag| (tag.key.clone(), tag.value.clone()))
            .collect()
    }
}
