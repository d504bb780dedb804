/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Graph data structures for the canvas editor core.
//!
//! Core structures:
//! - `Node`: positioned vertex with a kind tag and opaque payload data
//! - `Edge`: directed connection between two node ids
//! - `Connection`: a pending link gesture reported by the rendering engine
//!
//! Serialized field names mirror the persisted JSON shape; transient fields
//! (selection, drag flag, measured size) are skipped when unset so snapshots
//! stay minimal.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Stable node identity (unique within a board).
pub type NodeId = String;

/// Stable edge identity (unique within a board).
pub type EdgeId = String;

/// Opaque per-node payload; shape depends on the node kind.
pub type NodeData = Map<String, Value>;

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Node type tag; selects which canvas widget renders the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Source-only node, outgoing handle only.
    #[serde(rename = "input")]
    Input,
    /// Sink-only node, incoming handle only.
    #[serde(rename = "output")]
    Output,
    /// Free-text note edited inline on the canvas.
    #[serde(rename = "noteNode")]
    Note,
    /// Color swatch with a picker widget.
    #[serde(rename = "colorNode")]
    Color,
    /// Any other tag; round-trips unchanged.
    #[serde(untagged)]
    Other(String),
}

/// Position in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Measured node size, reported by the rendering engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// A graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable node identity; unique within the board.
    pub id: NodeId,

    /// Type tag; `None` renders as the engine's default node.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,

    /// Opaque payload edited by the node's widget.
    pub data: NodeData,

    /// Position in canvas space.
    pub position: Position,

    /// Transient selection flag.
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,

    /// Transient drag-in-flight flag, written by position changes.
    #[serde(default, skip_serializing_if = "is_false")]
    pub dragging: bool,

    /// Measured width, written by dimension changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    /// Measured height, written by dimension changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Node {
    /// Create a node with an explicit kind and payload.
    pub fn new(
        id: impl Into<NodeId>,
        kind: Option<NodeKind>,
        data: NodeData,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            data,
            position,
            selected: false,
            dragging: false,
            width: None,
            height: None,
        }
    }

    /// Note node seeded with the placeholder text its editor widget expects.
    pub fn note(id: impl Into<NodeId>, position: Position) -> Self {
        Self::new(
            id,
            Some(NodeKind::Note),
            data_with_value("say something..."),
            position,
        )
    }

    /// Color node seeded with the swatch default its picker widget expects.
    pub fn color(id: impl Into<NodeId>, position: Position) -> Self {
        Self::new(id, Some(NodeKind::Color), data_with_value("#91a8ee"), position)
    }
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Stable edge identity; unique within the board.
    pub id: EdgeId,

    /// Source node id.
    pub source: NodeId,

    /// Target node id.
    pub target: NodeId,

    /// Optional source attachment point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,

    /// Optional target attachment point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,

    /// Transient selection flag.
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,
}

impl Edge {
    /// Edge with no handles and selection clear.
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            selected: false,
        }
    }
}

/// A pending link gesture: which node (and optionally which handle) connects
/// to which. Connect gestures must supply at least source and target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

impl Connection {
    /// Connection between two nodes with no handle identifiers.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    /// Deterministic id for the edge this connection produces; absent handles
    /// contribute the empty string.
    pub(crate) fn edge_id(&self) -> EdgeId {
        let source_handle = self.source_handle.as_deref().unwrap_or("");
        let target_handle = self.target_handle.as_deref().unwrap_or("");
        format!(
            "edge-{}{}-{}{}",
            self.source, source_handle, self.target, target_handle
        )
    }

    pub(crate) fn into_edge(self) -> Edge {
        let id = self.edge_id();
        Edge {
            id,
            source: self.source,
            target: self.target,
            source_handle: self.source_handle,
            target_handle: self.target_handle,
            selected: false,
        }
    }
}

/// Generate a collision-safe id for `Board::add_node` callers.
pub fn fresh_node_id() -> NodeId {
    Uuid::new_v4().to_string()
}

/// The fixed two-node starter graph installed on first run and by reset.
pub fn default_nodes() -> Vec<Node> {
    vec![
        Node::new(
            "1",
            Some(NodeKind::Input),
            data_with_label("Input"),
            Position::new(250.0, 25.0),
        ),
        Node::new(
            "3",
            Some(NodeKind::Output),
            data_with_label("Output"),
            Position::new(250.0, 250.0),
        ),
    ]
}

/// The starter graph has no edges.
pub fn default_edges() -> Vec<Edge> {
    Vec::new()
}

/// Payload of shape `{value: …}`, the contract of the note and color widgets.
fn data_with_value(value: &str) -> NodeData {
    let mut data = NodeData::new();
    data.insert("value".to_string(), Value::String(value.to_string()));
    data
}

/// Payload of shape `{label: …}`, used by the starter nodes.
fn data_with_label(label: &str) -> NodeData {
    let mut data = NodeData::new();
    data.insert("label".to_string(), Value::String(label.to_string()));
    data
}
