/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The board: single owner of canvas editor state.
//!
//! `Board` holds the node and edge collections plus the derived active-node
//! id, and is the only writer of all three. The rendering engine feeds it
//! change batches and connect gestures; persistence goes through the
//! embedded [`SnapshotStore`]. Every mutation is synchronous, so a caller
//! observes each operation's full effect before issuing the next.

use log::debug;
use std::path::PathBuf;

use crate::changes::{Change, apply_changes, track_active_node};
use crate::model::{Connection, Edge, Node, NodeData, NodeId, default_edges, default_nodes};
use crate::persistence::{LoadOutcome, MemoryStore, Snapshot, SnapshotStore};

pub struct Board {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    active_node_id: Option<NodeId>,
    store: SnapshotStore,
}

impl Board {
    /// Board over an explicit snapshot store, starting from the default
    /// graph. Callers wanting persisted state follow up with [`Board::load`].
    pub fn with_store(store: SnapshotStore) -> Self {
        Self {
            nodes: default_nodes(),
            edges: default_edges(),
            active_node_id: None,
            store,
        }
    }

    /// Board whose snapshots never leave the process.
    pub fn in_memory() -> Self {
        Self::with_store(SnapshotStore::new(Box::<MemoryStore>::default()))
    }

    /// Board persisting under `base_dir`.
    pub fn new_from_dir(base_dir: PathBuf) -> Self {
        Self::with_store(SnapshotStore::open_at(base_dir))
    }

    /// Board persisting under the platform config directory.
    pub fn open_default() -> Self {
        Self::with_store(SnapshotStore::open_default())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Id recorded by the most recent selection change, if any. May name a
    /// node that has since been removed.
    pub fn active_node_id(&self) -> Option<&str> {
        self.active_node_id.as_deref()
    }

    /// The active node itself; a stale id resolves to `None`.
    pub fn active_node(&self) -> Option<&Node> {
        let id = self.active_node_id.as_ref()?;
        self.nodes.iter().find(|node| &node.id == id)
    }

    /// True once a storage failure has switched persistence off.
    pub fn is_persistence_degraded(&self) -> bool {
        self.store.is_degraded()
    }

    /// Apply one engine-reported node change batch.
    ///
    /// The new collection and the new active-node id are computed from the
    /// same batch and committed together, so observers never see one without
    /// the other.
    pub fn on_nodes_change(&mut self, changes: &[Change<Node>]) {
        self.nodes = apply_changes(changes, &self.nodes);
        self.active_node_id = track_active_node(changes, self.active_node_id.take());
    }

    /// Apply one engine-reported edge change batch.
    pub fn on_edges_change(&mut self, changes: &[Change<Edge>]) {
        self.edges = apply_changes(changes, &self.edges);
    }

    /// Materialize a completed link gesture as an edge.
    ///
    /// A connection matching an existing edge on source, target, and both
    /// handles is dropped, so repeating the same gesture cannot stack
    /// duplicate edges. An absent handle and an empty one name the same
    /// attachment point, keeping the dedup aligned with the derived edge id.
    pub fn on_connect(&mut self, connection: Connection) {
        let duplicate = self.edges.iter().any(|edge| {
            edge.source == connection.source
                && edge.target == connection.target
                && same_handle(&edge.source_handle, &connection.source_handle)
                && same_handle(&edge.target_handle, &connection.target_handle)
        });
        if duplicate {
            debug!(
                "Ignoring duplicate connection {} -> {}",
                connection.source, connection.target
            );
            return;
        }
        self.edges.push(connection.into_edge());
    }

    /// Append a node through the ordinary change path; a duplicate id is
    /// ignored.
    pub fn add_node(&mut self, node: Node) {
        self.nodes = apply_changes(&[Change::Add { item: node }], &self.nodes);
    }

    /// Replace a node's payload wholesale. Unknown ids are a no-op.
    pub fn update_node_data(&mut self, id: &str, data: NodeData) {
        let Some(node) = self.nodes.iter_mut().find(|node| node.id == id) else {
            return;
        };
        node.data = data;
    }

    /// Persist the current graph.
    pub fn save(&mut self) {
        let snapshot = Snapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        };
        self.store.save(&snapshot);
    }

    /// Replace the graph with the persisted snapshot.
    ///
    /// No stored snapshot leaves the board untouched; a malformed one falls
    /// back to the default graph rather than installing partial state.
    pub fn load(&mut self) {
        match self.store.load() {
            LoadOutcome::Snapshot(snapshot) => {
                self.nodes = snapshot.nodes;
                self.edges = snapshot.edges;
            },
            LoadOutcome::Missing => {},
            LoadOutcome::Malformed => {
                self.nodes = default_nodes();
                self.edges = default_edges();
            },
        }
    }

    /// Drop the stored snapshot and restore the default graph.
    pub fn reset(&mut self) {
        self.store.clear();
        self.nodes = default_nodes();
        self.edges = default_edges();
        self.active_node_id = None;
    }
}

/// Handle equality as the derived edge id sees it: absent and empty collapse
/// to the same attachment point.
fn same_handle(a: &Option<String>, b: &Option<String>) -> bool {
    a.as_deref().unwrap_or("") == b.as_deref().unwrap_or("")
}
