//! Typed pin proxies.
//!
//! A [`Binder<T>`] pairs a pin with the generator that minted it, plus a
//! phantom marker restricting which overloads apply. Binders are the only
//! values DSL user code manipulates: every arithmetic operator, comparison,
//! swizzle or texture read consumes binders and yields fresh ones. User code
//! never constructs a binder directly; they all come out of generator entry
//! points or out of other operations.

use std::fmt;
use std::marker::PhantomData;

use crate::graph::Generator;
use crate::op::{CompareFunc, OpKind};
use crate::pin::Pin;
use crate::types::{Matrix, ToPinType, V2, V3, V4};

/// Erased view over anything that names a pin under a generator.
///
/// Implemented by value binders, texture binders and sampler binders; the
/// generator entry points that accept heterogeneous operands (compound
/// constructors, outputs, loop-carried slots) take `&dyn PinBinder`.
pub trait PinBinder {
  /// Generator the pin was minted under.
  fn generator(&self) -> &Generator;

  /// The pin itself.
  fn pin(&self) -> Pin;
}

/// A typed proxy over one pin.
pub struct Binder<T> {
  gen: Generator,
  pin: Pin,
  _phantom: PhantomData<T>,
}

impl<T> Binder<T> {
  pub(crate) fn new(gen: Generator, pin: Pin) -> Self {
    Binder {
      gen,
      pin,
      _phantom: PhantomData,
    }
  }

  /// The pin this proxy currently designates.
  pub fn pin(&self) -> Pin {
    self.pin
  }

  /// Generator this proxy belongs to.
  pub fn generator(&self) -> &Generator {
    &self.gen
  }

  // Only swizzle writes and loop-carried slots move a proxy to a new pin.
  pub(crate) fn rebind(&mut self, pin: Pin) {
    self.pin = pin;
  }
}

impl<T> Clone for Binder<T> {
  fn clone(&self) -> Self {
    Binder::new(self.gen.clone(), self.pin)
  }
}

impl<T> fmt::Debug for Binder<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Binder").field("pin", &self.pin).finish()
  }
}

impl<T> PinBinder for Binder<T> {
  fn generator(&self) -> &Generator {
    &self.gen
  }

  fn pin(&self) -> Pin {
    self.pin
  }
}

/// Append a two-input node and wrap its single output.
///
/// Panics with [`crate::error::GraphError::MixedGenerators`] when the
/// operands come from different generators.
pub(crate) fn binary<R>(kind: OpKind, lhs: &dyn PinBinder, rhs: &dyn PinBinder) -> Binder<R>
where
  R: ToPinType,
{
  lhs.generator().expect_same(rhs.generator());
  let pin = lhs
    .generator()
    .instantiate1(kind, vec![lhs.pin(), rhs.pin()], R::PIN_TYPE);
  Binder::new(lhs.generator().clone(), pin)
}

/// Conversion of an operand into a binder under a given generator.
///
/// Binders convert to themselves (their own generator wins); raw literals are
/// promoted to constant nodes under the provided generator, so a literal can
/// never trigger a generator mismatch.
pub trait IntoBinder<T> {
  fn into_binder(self, gen: &Generator) -> Binder<T>;
}

impl<T> IntoBinder<T> for Binder<T> {
  fn into_binder(self, _: &Generator) -> Binder<T> {
    self
  }
}

impl<'a, T> IntoBinder<T> for &'a Binder<T> {
  fn into_binder(self, _: &Generator) -> Binder<T> {
    self.clone()
  }
}

macro_rules! impl_IntoBinder_lit {
  ($t:ty) => {
    impl IntoBinder<$t> for $t {
      fn into_binder(self, gen: &Generator) -> Binder<$t> {
        gen.fixed(self)
      }
    }
  };
}

impl_IntoBinder_lit!(i32);
impl_IntoBinder_lit!(V2<i32>);
impl_IntoBinder_lit!(V3<i32>);
impl_IntoBinder_lit!(V4<i32>);
impl_IntoBinder_lit!(u32);
impl_IntoBinder_lit!(V2<u32>);
impl_IntoBinder_lit!(V3<u32>);
impl_IntoBinder_lit!(V4<u32>);
impl_IntoBinder_lit!(f32);
impl_IntoBinder_lit!(V2<f32>);
impl_IntoBinder_lit!(V3<f32>);
impl_IntoBinder_lit!(V4<f32>);
impl_IntoBinder_lit!(bool);
impl_IntoBinder_lit!(V2<bool>);
impl_IntoBinder_lit!(V3<bool>);
impl_IntoBinder_lit!(V4<bool>);
impl_IntoBinder_lit!(Matrix<[[f32; 2]; 2]>);
impl_IntoBinder_lit!(Matrix<[[f32; 3]; 3]>);
impl_IntoBinder_lit!(Matrix<[[f32; 4]; 4]>);

// comparisons
//
// Rust comparison operators must return a plain bool, so these are named
// methods instead of `PartialOrd` overloads. They always yield a scalar
// boolean binder, vector operands included (all-lanes predicate for the
// backend).
macro_rules! impl_compare_Binder {
  (eq only, $t:ty) => {
    impl Binder<$t> {
      fn compare(&self, func: CompareFunc, rhs: impl IntoBinder<$t>) -> Binder<bool> {
        let rhs = rhs.into_binder(self.generator());
        binary(OpKind::Compare(func), self, &rhs)
      }

      pub fn eq(&self, rhs: impl IntoBinder<$t>) -> Binder<bool> {
        self.compare(CompareFunc::Eq, rhs)
      }

      pub fn neq(&self, rhs: impl IntoBinder<$t>) -> Binder<bool> {
        self.compare(CompareFunc::Neq, rhs)
      }
    }
  };

  ($t:ty) => {
    impl_compare_Binder!(eq only, $t);

    impl Binder<$t> {
      pub fn lt(&self, rhs: impl IntoBinder<$t>) -> Binder<bool> {
        self.compare(CompareFunc::Lt, rhs)
      }

      pub fn lte(&self, rhs: impl IntoBinder<$t>) -> Binder<bool> {
        self.compare(CompareFunc::Lte, rhs)
      }

      pub fn gte(&self, rhs: impl IntoBinder<$t>) -> Binder<bool> {
        self.compare(CompareFunc::Gte, rhs)
      }

      pub fn gt(&self, rhs: impl IntoBinder<$t>) -> Binder<bool> {
        self.compare(CompareFunc::Gt, rhs)
      }
    }
  };
}

impl_compare_Binder!(i32);
impl_compare_Binder!(V2<i32>);
impl_compare_Binder!(V3<i32>);
impl_compare_Binder!(V4<i32>);

impl_compare_Binder!(u32);
impl_compare_Binder!(V2<u32>);
impl_compare_Binder!(V3<u32>);
impl_compare_Binder!(V4<u32>);

impl_compare_Binder!(f32);
impl_compare_Binder!(V2<f32>);
impl_compare_Binder!(V3<f32>);
impl_compare_Binder!(V4<f32>);

impl_compare_Binder!(eq only, bool);
impl_compare_Binder!(eq only, V2<bool>);
impl_compare_Binder!(eq only, V3<bool>);
impl_compare_Binder!(eq only, V4<bool>);

// dot product
macro_rules! impl_dot_Binder {
  ($t:ty) => {
    impl Binder<$t> {
      pub fn dot(&self, rhs: impl IntoBinder<$t>) -> Binder<f32> {
        let rhs = rhs.into_binder(self.generator());
        binary(OpKind::Dot, self, &rhs)
      }
    }
  };
}

impl_dot_Binder!(V2<f32>);
impl_dot_Binder!(V3<f32>);
impl_dot_Binder!(V4<f32>);
