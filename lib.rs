/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Graph-state core for an interactive node-and-edge canvas editor.
//!
//! The rendering engine owns pointer gestures and pixels; this crate owns
//! the truth. Interactions arrive as ordered [`Change`] batches or
//! [`Connection`] gestures, a [`Board`] folds them into its node and edge
//! collections, and snapshots round-trip through redb-backed persistence.
//!
//! ```
//! use flowboard::{Board, Connection};
//!
//! let mut board = Board::in_memory();
//! board.on_connect(Connection::new("1", "3"));
//! assert_eq!(board.edges().len(), 1);
//! ```

pub mod board;
pub mod changes;
pub mod model;
pub mod persistence;

pub use board::Board;
pub use changes::{Change, Element, apply_changes, track_active_node};
pub use model::{
    Connection, Dimensions, Edge, EdgeId, Node, NodeData, NodeId, NodeKind, Position,
    default_edges, default_nodes, fresh_node_id,
};
pub use persistence::{
    KeyValueStore, LoadOutcome, MemoryStore, RedbStore, SNAPSHOT_KEY, Snapshot, SnapshotStore,
    StoreError,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
