//! Identity metadata cache
//!
//! Last-known volume and node names, used to label samples whose raw
//! records carry only numeric ids. Entries are added or overwritten on
//! every scrape and never evicted: a volume deleted from the cluster keeps
//! resolving to its old name for the life of the process.

use std::collections::HashMap;

use crate::solidfire::types::{Node, Volume};

/// Labels attached to per-volume samples
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeMetadata {
    pub volume_id: i64,
    pub name: String,
    /// Owning account from the `owner_id` attribute, empty when unset
    pub account_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeIdentity {
    pub node_id: i64,
    pub name: String,
}

/// Accumulate-only id to name mappings
#[derive(Debug, Default)]
pub struct MetadataCache {
    volumes: HashMap<i64, VolumeMetadata>,
    nodes: HashMap<i64, NodeIdentity>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite one entry per volume. Volumes missing from
    /// `volumes` keep their existing entry.
    pub fn upsert_volumes(&mut self, volumes: &[Volume]) {
        for volume in volumes {
            self.volumes.insert(
                volume.volume_id,
                VolumeMetadata {
                    volume_id: volume.volume_id,
                    name: volume.name.clone(),
                    account_id: volume.owner_id().unwrap_or_default(),
                },
            );
        }
    }

    pub fn upsert_nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.nodes.insert(
                node.node_id,
                NodeIdentity {
                    node_id: node.node_id,
                    name: node.name.clone(),
                },
            );
        }
    }

    /// Cached volume metadata, or empty strings for an id never seen.
    pub fn lookup_volume(&self, volume_id: i64) -> VolumeMetadata {
        self.volumes
            .get(&volume_id)
            .cloned()
            .unwrap_or_else(|| VolumeMetadata {
                volume_id,
                ..Default::default()
            })
    }

    pub fn lookup_node(&self, node_id: i64) -> NodeIdentity {
        self.nodes
            .get(&node_id)
            .cloned()
            .unwrap_or_else(|| NodeIdentity {
                node_id,
                ..Default::default()
            })
    }

    /// Shorthand for the node name label.
    pub fn node_name(&self, node_id: i64) -> String {
        self.nodes
            .get(&node_id)
            .map(|n| n.name.clone())
            .unwrap_or_default()
    }

    pub fn volume_count(&self) -> usize {
        self.volumes.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
