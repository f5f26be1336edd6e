//! Slide ring
//!
//! The ring is the ordered sequence of slides as they are laid out in the
//! container. Continuous mode rotates it by one position whenever a move
//! lands on an edge slot, so there is always a real neighbour to animate
//! toward. Each slide keeps its original index as stable identity.

use std::collections::VecDeque;

use invi_platform::NodeId;

/// One slide element and its discovery-order index
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Item {
    pub element: NodeId,
    pub original_index: usize,
}

/// Direction of a one-step ring rotation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    /// Last slide moves to the front (entering slot 0)
    Backward,
    /// First slide moves to the back (entering the last slot)
    Forward,
}

/// Ordered slides
#[derive(Clone, Debug, Default)]
pub struct Ring {
    items: VecDeque<Item>,
}

impl Ring {
    /// Build a ring in natural order; original indices follow `elements`
    pub fn new(elements: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            items: elements
                .into_iter()
                .enumerate()
                .map(|(original_index, element)| Item {
                    element,
                    original_index,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Item> {
        self.items.get(position)
    }

    /// Ring position of the slide with the given original index
    pub fn position_of(&self, original_index: usize) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.original_index == original_index)
    }

    /// Rotate by one position
    pub fn rotate(&mut self, rotation: Rotation) {
        if self.items.len() < 2 {
            return;
        }
        match rotation {
            Rotation::Backward => self.items.rotate_right(1),
            Rotation::Forward => self.items.rotate_left(1),
        }
    }

    /// Elements in ring order
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.iter().map(|item| item.element)
    }

    /// Original indices in ring order
    pub fn original_order(&self) -> Vec<usize> {
        self.items.iter().map(|item| item.original_index).collect()
    }
}
