//! Errors raised while weaving a graph.

use crate::swizzle::SwizzleSelector;
use crate::types::{Dim, PinType};

/// Errors that can occur while constructing a graph.
///
/// Fallible entry points (mask parsing and validation, loop carried-slot
/// writes, ending a loop region) return these directly. Operator overloads
/// have fixed `std::ops` signatures and cannot, so they panic with the same
/// error rendered through its `Display` implementation; those are
/// programming-contract violations, not runtime conditions.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GraphError {
  /// Two operands were built under different generators.
  #[error("cannot combine values coming from different generators")]
  MixedGenerators,

  /// A swizzle mask has no selectors or more than four.
  #[error("swizzle mask must select between one and four channels, got {0}")]
  InvalidMaskLen(usize),

  /// A swizzle mask literal contains a character that names no channel.
  #[error("swizzle mask contains invalid channel {0:?}")]
  InvalidMaskChar(char),

  /// A selector addresses a channel past the source vector's width.
  #[error("swizzle selector {selector:?} out of range for a {dim:?} source")]
  SwizzleOutOfRange {
    selector: SwizzleSelector,
    dim: Dim,
  },

  /// A write mask names the same destination channel twice.
  #[error("duplicate destination channel {0:?} in swizzle write mask")]
  DuplicateWriteSelector(SwizzleSelector),

  /// A loop region was ended a second time.
  #[error("loop region already ended")]
  DoubleEnd,

  /// A carried slot was reassigned after the loop region was ended.
  #[error("loop region is closed, carried slots are read-only")]
  LoopClosed,

  /// An operation was instantiated with the wrong number of inputs.
  #[error("operation expects {expected} inputs, got {got}")]
  ArityMismatch { expected: usize, got: usize },

  /// A pin was wrapped or assigned at a type it does not carry.
  #[error("type mismatch: expected {expected:?}, found {found:?}")]
  TypeMismatch { expected: PinType, found: PinType },

  /// An expansion does not strictly widen, or changes the element kind.
  #[error("cannot expand {from:?} into {to:?}")]
  InvalidExpand { from: PinType, to: PinType },

  /// A texture was declared with a texel type that is not a scalar or vector.
  #[error("{0:?} is not a valid texel type")]
  InvalidTexel(PinType),

  /// An array was declared with an element type that is not a scalar or vector.
  #[error("{0:?} is not a valid array element type")]
  InvalidArrayElement(PinType),

  /// A carried-slot index past the number of slots a loop region carries.
  #[error("no carried slot {slot}, the loop region carries {len}")]
  NoSuchSlot { slot: usize, len: usize },
}
