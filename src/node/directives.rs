//! Layout directives: childless pseudo-nodes that steer the cursor and emit
//! no markup.
//!
//! [`Node::advance`] is built here too, but it is not a [`Directive`]: it
//! flows like an ordinary child whose size is its offset.

use super::{Node, NodeKind};

/// How a child changes the cursor instead of being placed on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Directive {
    /// Jump to an absolute position and start a new run and section.
    MoveTo { x: f64, y: f64 },
    /// Return to x = 0 and start a new run.
    CarriageReturn,
    /// Move down by the tallest child of the current row and start a new row.
    LineFeed,
}

impl Node {
    /// Classify this node for the flow scan. `None` means it is placed.
    pub fn directive(&self) -> Option<Directive> {
        match self.kind {
            NodeKind::MoveTo { x, y } => Some(Directive::MoveTo { x, y }),
            NodeKind::CarriageReturn => Some(Directive::CarriageReturn),
            NodeKind::LineFeed => Some(Directive::LineFeed),
            _ => None,
        }
    }

    pub fn move_to(x: f64, y: f64) -> Self {
        Node::new(NodeKind::MoveTo { x, y })
    }

    pub fn carriage_return() -> Self {
        Node::new(NodeKind::CarriageReturn)
    }

    pub fn line_feed() -> Self {
        Node::new(NodeKind::LineFeed)
    }

    /// Carriage return followed by line feed: start of the next row.
    pub fn new_line() -> [Self; 2] {
        [Node::carriage_return(), Node::line_feed()]
    }

    pub fn advance(dx: f64, dy: f64) -> Self {
        Node::new(NodeKind::Advance { dx, dy })
    }
}
