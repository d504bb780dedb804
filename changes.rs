/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Ordered change batches and the pure reducer that applies them.
//!
//! The rendering engine reports every interaction (drag, click, delete key,
//! size measurement) as a batch of [`Change`] values. [`apply_changes`] folds
//! a batch over a collection without mutating the input, so callers can diff
//! old against new or discard the result. [`track_active_node`] derives the
//! active-node summary from the same batch.

use log::debug;

use crate::model::{Dimensions, Edge, Node, Position};

/// One engine-reported mutation of a node or edge collection.
///
/// Batches apply in order; a later change in the same batch sees the effect
/// of an earlier one. Changes naming an unknown id are silent no-ops.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    /// Append `item` unless its id is already present.
    Add { item: T },
    /// Remove the element with this id.
    Remove { id: String },
    /// Replace the element with this id wholesale.
    Replace { id: String, item: T },
    /// Move a node; `None` position means the drag flag alone changed.
    Position {
        id: String,
        position: Option<Position>,
        dragging: Option<bool>,
    },
    /// Set the selection flag.
    Select { id: String, selected: bool },
    /// Record a measured size; `None` leaves the size untouched.
    Dimensions {
        id: String,
        dimensions: Option<Dimensions>,
    },
}

/// Collection element the reducer can address by id.
///
/// Geometry changes are node-only; the defaults make them no-ops so edges
/// ignore stray `Position`/`Dimensions` entries instead of erroring.
pub trait Element: Clone {
    fn id(&self) -> &str;

    fn set_selected(&mut self, selected: bool);

    fn apply_position(&mut self, _position: Option<Position>, _dragging: Option<bool>) {}

    fn apply_dimensions(&mut self, _dimensions: Option<Dimensions>) {}
}

impl Element for Node {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn apply_position(&mut self, position: Option<Position>, dragging: Option<bool>) {
        if let Some(position) = position {
            self.position = position;
        }
        if let Some(dragging) = dragging {
            self.dragging = dragging;
        }
    }

    fn apply_dimensions(&mut self, dimensions: Option<Dimensions>) {
        if let Some(dimensions) = dimensions {
            self.width = Some(dimensions.width);
            self.height = Some(dimensions.height);
        }
    }
}

impl Element for Edge {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

/// Apply a change batch to a collection, returning the new collection.
///
/// The input slice is never mutated. Changes apply in batch order, each
/// against the result of its predecessors. An `Add` whose id is already
/// present is ignored.
pub fn apply_changes<T: Element>(changes: &[Change<T>], elements: &[T]) -> Vec<T> {
    let mut elements = elements.to_vec();
    for change in changes {
        match change {
            Change::Add { item } => {
                if elements.iter().any(|existing| existing.id() == item.id()) {
                    debug!("Ignoring add for duplicate id {}", item.id());
                    continue;
                }
                elements.push(item.clone());
            },
            Change::Remove { id } => {
                elements.retain(|existing| existing.id() != id);
            },
            Change::Replace { id, item } => {
                if let Some(existing) = elements.iter_mut().find(|existing| existing.id() == id) {
                    *existing = item.clone();
                }
            },
            Change::Position {
                id,
                position,
                dragging,
            } => {
                if let Some(existing) = elements.iter_mut().find(|existing| existing.id() == id) {
                    existing.apply_position(*position, *dragging);
                }
            },
            Change::Select { id, selected } => {
                if let Some(existing) = elements.iter_mut().find(|existing| existing.id() == id) {
                    existing.set_selected(*selected);
                }
            },
            Change::Dimensions { id, dimensions } => {
                if let Some(existing) = elements.iter_mut().find(|existing| existing.id() == id) {
                    existing.apply_dimensions(*dimensions);
                }
            },
        }
    }
    elements
}

/// Derive the next active node from a batch.
///
/// The first `Select { selected: true }` wins regardless of later entries.
/// A batch with deselections but no selection clears the active node. A
/// batch with no selection changes at all leaves `current` in place.
pub fn track_active_node(changes: &[Change<Node>], current: Option<String>) -> Option<String> {
    let mut saw_deselect = false;
    for change in changes {
        if let Change::Select { id, selected } = change {
            if *selected {
                return Some(id.clone());
            }
            saw_deselect = true;
        }
    }
    if saw_deselect { None } else { current }
}
