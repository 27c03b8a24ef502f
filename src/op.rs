//! The operation catalog: what kind of node a graph cell is.
//!
//! Kinds are opaque to the builder. The only part of a kind's semantics the
//! builder enforces is its input arity; everything else (what an `Add` means,
//! how a `Sample` addresses a texture) belongs to the backend consuming the
//! finished graph.

use crate::pin::NodeId;
use crate::swizzle::SwizzleMask;
use crate::types::{Dim, Matrix, PinType, ScalarKind, V2, V3, V4};

/// Comparison predicate recorded by compare nodes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CompareFunc {
  Lt,
  Lte,
  Eq,
  Neq,
  Gte,
  Gt,
}

/// How an expansion fills the lanes the source does not provide.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ExpandPolicy {
  /// Pad with zeroes.
  AddZeros,

  /// Pad with ones.
  AddOnes,

  /// Pad with zeroes except the last lane, which gets a one. Typical for
  /// promoting a position to homogeneous coordinates.
  OnesAtLast,
}

/// Literal payload of a constant node.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
  Int(i32),
  Int2([i32; 2]),
  Int3([i32; 3]),
  Int4([i32; 4]),
  UInt(u32),
  UInt2([u32; 2]),
  UInt3([u32; 3]),
  UInt4([u32; 4]),
  Float(f32),
  Float2([f32; 2]),
  Float3([f32; 3]),
  Float4([f32; 4]),
  Bool(bool),
  Bool2([bool; 2]),
  Bool3([bool; 3]),
  Bool4([bool; 4]),
  M22([[f32; 2]; 2]),
  M33([[f32; 3]; 3]),
  M44([[f32; 4]; 4]),
}

impl ConstantValue {
  /// Pin type of the single output of a constant node holding this value.
  pub fn pin_type(&self) -> PinType {
    match self {
      ConstantValue::Int(_) => PinType::Prim(ScalarKind::Int, Dim::Scalar),
      ConstantValue::Int2(_) => PinType::Prim(ScalarKind::Int, Dim::D2),
      ConstantValue::Int3(_) => PinType::Prim(ScalarKind::Int, Dim::D3),
      ConstantValue::Int4(_) => PinType::Prim(ScalarKind::Int, Dim::D4),
      ConstantValue::UInt(_) => PinType::Prim(ScalarKind::UInt, Dim::Scalar),
      ConstantValue::UInt2(_) => PinType::Prim(ScalarKind::UInt, Dim::D2),
      ConstantValue::UInt3(_) => PinType::Prim(ScalarKind::UInt, Dim::D3),
      ConstantValue::UInt4(_) => PinType::Prim(ScalarKind::UInt, Dim::D4),
      ConstantValue::Float(_) => PinType::Prim(ScalarKind::Float, Dim::Scalar),
      ConstantValue::Float2(_) => PinType::Prim(ScalarKind::Float, Dim::D2),
      ConstantValue::Float3(_) => PinType::Prim(ScalarKind::Float, Dim::D3),
      ConstantValue::Float4(_) => PinType::Prim(ScalarKind::Float, Dim::D4),
      ConstantValue::Bool(_) => PinType::Prim(ScalarKind::Bool, Dim::Scalar),
      ConstantValue::Bool2(_) => PinType::Prim(ScalarKind::Bool, Dim::D2),
      ConstantValue::Bool3(_) => PinType::Prim(ScalarKind::Bool, Dim::D3),
      ConstantValue::Bool4(_) => PinType::Prim(ScalarKind::Bool, Dim::D4),
      ConstantValue::M22(_) => PinType::Matrix(crate::types::MatrixDim::D22),
      ConstantValue::M33(_) => PinType::Matrix(crate::types::MatrixDim::D33),
      ConstantValue::M44(_) => PinType::Matrix(crate::types::MatrixDim::D44),
    }
  }
}

macro_rules! impl_const_from {
  ($t:ty, $var:ident) => {
    impl From<$t> for ConstantValue {
      fn from(a: $t) -> Self {
        ConstantValue::$var(a)
      }
    }
  };

  (vec $t:ty, $var:ident) => {
    impl From<$t> for ConstantValue {
      fn from(a: $t) -> Self {
        ConstantValue::$var(a.0)
      }
    }
  };
}

impl_const_from!(i32, Int);
impl_const_from!(vec V2<i32>, Int2);
impl_const_from!(vec V3<i32>, Int3);
impl_const_from!(vec V4<i32>, Int4);
impl_const_from!(u32, UInt);
impl_const_from!(vec V2<u32>, UInt2);
impl_const_from!(vec V3<u32>, UInt3);
impl_const_from!(vec V4<u32>, UInt4);
impl_const_from!(f32, Float);
impl_const_from!(vec V2<f32>, Float2);
impl_const_from!(vec V3<f32>, Float3);
impl_const_from!(vec V4<f32>, Float4);
impl_const_from!(bool, Bool);
impl_const_from!(vec V2<bool>, Bool2);
impl_const_from!(vec V3<bool>, Bool3);
impl_const_from!(vec V4<bool>, Bool4);
impl_const_from!(vec Matrix<[[f32; 2]; 2]>, M22);
impl_const_from!(vec Matrix<[[f32; 3]; 3]>, M33);
impl_const_from!(vec Matrix<[[f32; 4]; 4]>, M44);

/// Kind of a graph node.
#[derive(Clone, Debug, PartialEq)]
pub enum OpKind {
  /// A literal constant.
  Constant(ConstantValue),

  /// A named constant bound by the host at draw time (textures and samplers
  /// included).
  Uniform { name: String, ty: PinType },

  /// A per-invocation shader input.
  Input { name: String, ty: PinType },

  /// A named shader output; consumes the pin bound to it.
  Output { name: String },

  Add,
  Sub,
  Mul,
  Div,

  BitAnd,
  BitOr,
  BitXor,

  /// Lane-wise comparison collapsed to a single boolean.
  Compare(CompareFunc),

  /// Dot product of two float vectors.
  Dot,

  /// Channel extraction / reordering.
  Swizzle(SwizzleMask),

  /// Masked overwrite of channels: inputs are (current value, new lanes).
  SwizzleWrite(SwizzleMask),

  /// Assembles a wider vector out of narrower parts.
  Compound,

  /// Widens a value by padding lanes according to the policy.
  Expand(ExpandPolicy),

  /// Selects between two values: inputs are (condition, if-true, if-false).
  Branch,

  /// Texel fetch at integer coordinates: inputs are (texture, address).
  Load,

  /// Filtered texture read: inputs are (texture, sampler, coordinates).
  Sample,

  /// Element read: inputs are (array, index).
  ArrayIndex,

  /// Element overwrite yielding a whole new array: inputs are
  /// (array, index, value).
  ArrayWrite,

  /// Number of elements in an array.
  ArrayLen,

  /// Opens a loop region: inputs are `[n, carried...]`, outputs are
  /// `[iteration index, carried...]`.
  LoopEntry,

  /// Closes the loop region opened by `entry`; consumes the final carried
  /// pins, in slot order.
  LoopExit { entry: NodeId },
}

impl OpKind {
  /// Number of inputs this kind consumes, or `None` for variadic kinds.
  pub fn input_arity(&self) -> Option<usize> {
    match self {
      OpKind::Constant(_) | OpKind::Uniform { .. } | OpKind::Input { .. } => Some(0),
      OpKind::Output { .. } | OpKind::Swizzle(_) | OpKind::Expand(_) | OpKind::ArrayLen => {
        Some(1)
      }
      OpKind::Add
      | OpKind::Sub
      | OpKind::Mul
      | OpKind::Div
      | OpKind::BitAnd
      | OpKind::BitOr
      | OpKind::BitXor
      | OpKind::Compare(_)
      | OpKind::Dot
      | OpKind::SwizzleWrite(_)
      | OpKind::Load
      | OpKind::ArrayIndex => Some(2),
      OpKind::Branch | OpKind::Sample | OpKind::ArrayWrite => Some(3),
      OpKind::Compound | OpKind::LoopEntry | OpKind::LoopExit { .. } => None,
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::types::{Dim, MatrixDim, ScalarKind};

  #[test]
  fn constant_pin_types() {
    let c: ConstantValue = V3::from([1., 2., 3.]).into();
    assert_eq!(c, ConstantValue::Float3([1., 2., 3.]));
    assert_eq!(c.pin_type(), PinType::Prim(ScalarKind::Float, Dim::D3));

    let m: ConstantValue = Matrix::from([[0.; 4]; 4]).into();
    assert_eq!(m.pin_type(), PinType::Matrix(MatrixDim::D44));
  }

  #[test]
  fn arity_table() {
    assert_eq!(OpKind::Constant(ConstantValue::Int(0)).input_arity(), Some(0));
    assert_eq!(OpKind::Sub.input_arity(), Some(2));
    assert_eq!(OpKind::Branch.input_arity(), Some(3));
    assert_eq!(OpKind::Compound.input_arity(), None);
    assert_eq!(OpKind::LoopEntry.input_arity(), None);
  }
}
