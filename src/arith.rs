//! `std::ops` overloads on binders.
//!
//! Every overload appends exactly one node whose inputs are the operand pins
//! in source order. Raw literals on either side are first promoted to a
//! constant node under the binder operand's generator, so `k - b` records the
//! constant pin first and `b - k` records it second; non-commutative
//! operations keep their meaning through promotion.

use std::ops;

use crate::binder::{binary, Binder};
use crate::op::OpKind;
use crate::types::{M22, M33, M44, V2, V3, V4};

macro_rules! impl_binop_Binder {
  ($op:ident, $meth_name:ident, $a:ty, $b:ty) => {
    impl_binop_Binder!($op, $meth_name, $a, $b, $a);
  };

  ($op:ident, $meth_name:ident, $a:ty, $b:ty, $r:ty) => {
    // binder OP binder
    impl ops::$op<Binder<$b>> for Binder<$a> {
      type Output = Binder<$r>;

      fn $meth_name(self, rhs: Binder<$b>) -> Self::Output {
        binary(OpKind::$op, &self, &rhs)
      }
    }

    // binder OP &binder
    impl<'a> ops::$op<&'a Binder<$b>> for Binder<$a> {
      type Output = Binder<$r>;

      fn $meth_name(self, rhs: &'a Binder<$b>) -> Self::Output {
        binary(OpKind::$op, &self, rhs)
      }
    }

    // &binder OP binder
    impl<'a> ops::$op<Binder<$b>> for &'a Binder<$a> {
      type Output = Binder<$r>;

      fn $meth_name(self, rhs: Binder<$b>) -> Self::Output {
        binary(OpKind::$op, self, &rhs)
      }
    }

    // &binder OP &binder
    impl<'a, 'b> ops::$op<&'b Binder<$b>> for &'a Binder<$a> {
      type Output = Binder<$r>;

      fn $meth_name(self, rhs: &'b Binder<$b>) -> Self::Output {
        binary(OpKind::$op, self, rhs)
      }
    }

    // binder OP literal
    impl ops::$op<$b> for Binder<$a> {
      type Output = Binder<$r>;

      fn $meth_name(self, rhs: $b) -> Self::Output {
        let rhs = self.generator().fixed(rhs);
        binary(OpKind::$op, &self, &rhs)
      }
    }

    // &binder OP literal
    impl<'a> ops::$op<$b> for &'a Binder<$a> {
      type Output = Binder<$r>;

      fn $meth_name(self, rhs: $b) -> Self::Output {
        let rhs = self.generator().fixed(rhs);
        binary(OpKind::$op, self, &rhs)
      }
    }

    // literal OP binder
    impl ops::$op<Binder<$b>> for $a {
      type Output = Binder<$r>;

      fn $meth_name(self, rhs: Binder<$b>) -> Self::Output {
        let lhs = rhs.generator().fixed(self);
        binary(OpKind::$op, &lhs, &rhs)
      }
    }

    // literal OP &binder
    impl<'a> ops::$op<&'a Binder<$b>> for $a {
      type Output = Binder<$r>;

      fn $meth_name(self, rhs: &'a Binder<$b>) -> Self::Output {
        let lhs = rhs.generator().fixed(self);
        binary(OpKind::$op, &lhs, rhs)
      }
    }
  };
}

// arithmetic over every kind and width, scalar broadcast included
macro_rules! impl_binarith_Binder {
  ($op:ident, $meth_name:ident) => {
    impl_binop_Binder!($op, $meth_name, i32, i32);
    impl_binop_Binder!($op, $meth_name, V2<i32>, V2<i32>);
    impl_binop_Binder!($op, $meth_name, V2<i32>, i32);
    impl_binop_Binder!($op, $meth_name, V3<i32>, V3<i32>);
    impl_binop_Binder!($op, $meth_name, V3<i32>, i32);
    impl_binop_Binder!($op, $meth_name, V4<i32>, V4<i32>);
    impl_binop_Binder!($op, $meth_name, V4<i32>, i32);

    impl_binop_Binder!($op, $meth_name, u32, u32);
    impl_binop_Binder!($op, $meth_name, V2<u32>, V2<u32>);
    impl_binop_Binder!($op, $meth_name, V2<u32>, u32);
    impl_binop_Binder!($op, $meth_name, V3<u32>, V3<u32>);
    impl_binop_Binder!($op, $meth_name, V3<u32>, u32);
    impl_binop_Binder!($op, $meth_name, V4<u32>, V4<u32>);
    impl_binop_Binder!($op, $meth_name, V4<u32>, u32);

    impl_binop_Binder!($op, $meth_name, f32, f32);
    impl_binop_Binder!($op, $meth_name, V2<f32>, V2<f32>);
    impl_binop_Binder!($op, $meth_name, V2<f32>, f32);
    impl_binop_Binder!($op, $meth_name, V3<f32>, V3<f32>);
    impl_binop_Binder!($op, $meth_name, V3<f32>, f32);
    impl_binop_Binder!($op, $meth_name, V4<f32>, V4<f32>);
    impl_binop_Binder!($op, $meth_name, V4<f32>, f32);
  };
}

impl_binarith_Binder!(Add, add);
impl_binarith_Binder!(Sub, sub);
impl_binarith_Binder!(Mul, mul);
impl_binarith_Binder!(Div, div);

// scalar × vector products, with the scalar on the left
//
// The symmetric vector-on-the-left forms are part of the broadcast rows
// above ($a = Vn<T>, $b = T).
macro_rules! impl_scalar_vec_mul_Binder {
  ($t:ty) => {
    impl_binop_Binder!(Mul, mul, $t, V2<$t>, V2<$t>);
    impl_binop_Binder!(Mul, mul, $t, V3<$t>, V3<$t>);
    impl_binop_Binder!(Mul, mul, $t, V4<$t>, V4<$t>);
  };
}

impl_scalar_vec_mul_Binder!(i32);
impl_scalar_vec_mul_Binder!(u32);
impl_scalar_vec_mul_Binder!(f32);

// matrix products
macro_rules! impl_matmul_Binder {
  ($m:ty, $v:ty) => {
    impl_binop_Binder!(Mul, mul, $m, $m);
    impl_binop_Binder!(Mul, mul, $v, $m, $v);
    impl_binop_Binder!(Mul, mul, $m, $v, $v);
    impl_binop_Binder!(Mul, mul, $m, f32, $m);
    impl_binop_Binder!(Mul, mul, f32, $m, $m);
  };
}

impl_matmul_Binder!(M22, V2<f32>);
impl_matmul_Binder!(M33, V3<f32>);
impl_matmul_Binder!(M44, V4<f32>);

// logical
impl_binop_Binder!(BitAnd, bitand, bool, bool);
impl_binop_Binder!(BitAnd, bitand, V2<bool>, V2<bool>);
impl_binop_Binder!(BitAnd, bitand, V3<bool>, V3<bool>);
impl_binop_Binder!(BitAnd, bitand, V4<bool>, V4<bool>);

impl_binop_Binder!(BitOr, bitor, bool, bool);
impl_binop_Binder!(BitOr, bitor, V2<bool>, V2<bool>);
impl_binop_Binder!(BitOr, bitor, V3<bool>, V3<bool>);
impl_binop_Binder!(BitOr, bitor, V4<bool>, V4<bool>);

impl_binop_Binder!(BitXor, bitxor, bool, bool);
impl_binop_Binder!(BitXor, bitxor, V2<bool>, V2<bool>);
impl_binop_Binder!(BitXor, bitxor, V3<bool>, V3<bool>);
impl_binop_Binder!(BitXor, bitxor, V4<bool>, V4<bool>);

#[cfg(test)]
mod test {
  use super::*;
  use crate::graph::Generator;
  use crate::op::ConstantValue;
  use crate::types::{Dim, Matrix, PinType, ScalarKind};

  #[test]
  fn operand_order_survives_literal_promotion() {
    let gen = Generator::new();
    let a = gen.input::<f32>("a");

    let right = &a - 1.;
    let node = gen.node(right.pin().node());
    assert_eq!(node.kind, OpKind::Sub);
    assert_eq!(node.inputs[0], a.pin());
    assert_eq!(
      gen.node(node.inputs[1].node()).kind,
      OpKind::Constant(ConstantValue::Float(1.))
    );

    let left = 1. - &a;
    let node = gen.node(left.pin().node());
    assert_eq!(node.kind, OpKind::Sub);
    assert_eq!(node.inputs[1], a.pin());
    assert_eq!(
      gen.node(node.inputs[0].node()).kind,
      OpKind::Constant(ConstantValue::Float(1.))
    );
  }

  #[test]
  fn scalar_broadcast() {
    let gen = Generator::new();
    let v = gen.input::<V3<f32>>("velocity");
    let scaled = &v * 0.5;

    assert_eq!(
      scaled.pin().ty(),
      PinType::Prim(ScalarKind::Float, Dim::D3)
    );
  }

  #[test]
  fn scalar_vector_products_in_both_orders() {
    let gen = Generator::new();
    let scale = gen.input::<f32>("scale");
    let dir = gen.input::<V3<f32>>("dir");

    let a = &scale * &dir;
    let node = gen.node(a.pin().node());
    assert_eq!(node.kind, OpKind::Mul);
    assert_eq!(node.inputs, vec![scale.pin(), dir.pin()]);
    assert_eq!(a.pin().ty(), PinType::Prim(ScalarKind::Float, Dim::D3));

    // scalar binder × vector literal
    let b = &scale * V3::from([1., 0., 0.]);
    assert_eq!(b.pin().ty(), PinType::Prim(ScalarKind::Float, Dim::D3));

    // vector binder × scalar, the broadcast row
    let c = &dir * &scale;
    assert_eq!(
      gen.node(c.pin().node()).inputs,
      vec![dir.pin(), scale.pin()]
    );
  }

  #[test]
  fn matrix_vector_products() {
    let gen = Generator::new();
    let m = gen.uniform::<M44>("world");
    let p = gen.input::<V4<f32>>("position");

    let transformed = &p * &m;
    assert_eq!(
      transformed.pin().ty(),
      PinType::Prim(ScalarKind::Float, Dim::D4)
    );

    let node = gen.node(transformed.pin().node());
    assert_eq!(node.kind, OpKind::Mul);
    assert_eq!(node.inputs, vec![p.pin(), m.pin()]);
  }

  #[test]
  fn matrix_literals_promote() {
    let gen = Generator::new();
    let m = gen.uniform::<M22>("rot");
    let scaled = Matrix::from([[2., 0.], [0., 2.]]) * &m;

    let node = gen.node(scaled.pin().node());
    assert_eq!(node.kind, OpKind::Mul);
    assert_eq!(
      gen.node(node.inputs[0].node()).kind,
      OpKind::Constant(ConstantValue::M22([[2., 0.], [0., 2.]]))
    );
  }

  #[test]
  #[should_panic(expected = "different generators")]
  fn mixing_generators_panics() {
    let gen = Generator::new();
    let other = Generator::new();
    let a = gen.fixed(1.);
    let b = other.fixed(2.);
    let _ = a + b;
  }

  #[test]
  fn chained_expressions_append_in_order() {
    let gen = Generator::new();
    let a = gen.input::<f32>("a");
    let b = gen.input::<f32>("b");
    let c = (&a + &b) * (&a - &b);

    let node = gen.node(c.pin().node());
    assert_eq!(node.kind, OpKind::Mul);
    assert_eq!(gen.node(node.inputs[0].node()).kind, OpKind::Add);
    assert_eq!(gen.node(node.inputs[1].node()).kind, OpKind::Sub);
    assert!(node.inputs[0].node() < node.inputs[1].node());
  }
}
