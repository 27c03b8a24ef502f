//! Pins: the addresses of node outputs inside a graph.

use std::fmt;

use crate::types::PinType;

/// Identifier of one node in a graph.
///
/// Node identifiers are assigned in creation order, so they are monotone with
/// respect to the order the DSL calls were made in.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
  /// Zero-based position of the node in the graph.
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// A single output of a node.
///
/// Pins are the edges' endpoints: a node records the pins it consumes, and
/// exposes one pin per output. Pins are immutable `Copy` values minted by the
/// generator when the node is instantiated; two pins are equal when they name
/// the same output of the same node.
#[derive(Clone, Copy, Debug)]
pub struct Pin {
  node: NodeId,
  output: u16,
  ty: PinType,
}

impl Pin {
  pub(crate) fn new(node: NodeId, output: u16, ty: PinType) -> Self {
    Pin { node, output, ty }
  }

  /// Node this pin belongs to.
  pub fn node(self) -> NodeId {
    self.node
  }

  /// Zero-based output slot on the node.
  pub fn output(self) -> u16 {
    self.output
  }

  /// Type of the value flowing out of this pin.
  pub fn ty(self) -> PinType {
    self.ty
  }
}

impl PartialEq for Pin {
  fn eq(&self, other: &Self) -> bool {
    self.node == other.node && self.output == other.output
  }
}

impl Eq for Pin {}

impl fmt::Display for Pin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.node, self.output)
  }
}
