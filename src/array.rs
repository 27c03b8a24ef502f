//! Named array binders with indexed reads and writes.
//!
//! Arrays follow the single-assignment rule like everything else: writing an
//! element appends a node that yields a whole new array pin, and the proxy is
//! reseated onto it, the same way swizzle writes move a vector proxy. The
//! array a backend sees is a chain of element overwrites rooted at the named
//! declaration.

use std::fmt;
use std::marker::PhantomData;

use crate::binder::{Binder, IntoBinder, PinBinder};
use crate::error::GraphError;
use crate::graph::Generator;
use crate::op::OpKind;
use crate::pin::Pin;
use crate::types::{Dim, PinType, ScalarKind, ToPinType};

const LEN_TYPE: PinType = PinType::Prim(ScalarKind::UInt, Dim::Scalar);

/// Anything usable as an array index: a `u32`/`i32` literal (promoted to a
/// constant node) or an integer binder computed in the graph.
pub trait AsIndex {
  fn index_pin(self, gen: &Generator) -> Pin;
}

impl AsIndex for u32 {
  fn index_pin(self, gen: &Generator) -> Pin {
    gen.fixed(self).pin()
  }
}

impl AsIndex for i32 {
  fn index_pin(self, gen: &Generator) -> Pin {
    gen.fixed(self).pin()
  }
}

macro_rules! impl_AsIndex_binder {
  ($t:ty) => {
    impl AsIndex for Binder<$t> {
      fn index_pin(self, gen: &Generator) -> Pin {
        gen.expect_same(self.generator());
        self.pin()
      }
    }

    impl<'a> AsIndex for &'a Binder<$t> {
      fn index_pin(self, gen: &Generator) -> Pin {
        gen.expect_same(self.generator());
        self.pin()
      }
    }
  };
}

impl_AsIndex_binder!(u32);
impl_AsIndex_binder!(i32);

impl Generator {
  /// Declare a named array of `len` elements of type `T`.
  pub fn array<T>(&self, name: impl Into<String>, len: u32) -> PinArrayBinder<T>
  where
    T: ToPinType,
  {
    self.named_array(name, Some(len))
  }

  /// Declare a named array whose size is only known at draw time.
  pub fn dynamic_array<T>(&self, name: impl Into<String>) -> PinArrayBinder<T>
  where
    T: ToPinType,
  {
    self.named_array(name, None)
  }

  fn named_array<T>(&self, name: impl Into<String>, len: Option<u32>) -> PinArrayBinder<T>
  where
    T: ToPinType,
  {
    let ty = match T::PIN_TYPE {
      PinType::Prim(kind, dim) => PinType::Array(kind, dim, len),
      other => panic!("{}", GraphError::InvalidArrayElement(other)),
    };

    let pin = self.instantiate1(
      OpKind::Uniform {
        name: name.into(),
        ty,
      },
      Vec::new(),
      ty,
    );
    PinArrayBinder::new(self.clone(), pin)
  }
}

/// Proxy over an array-typed pin, with indexed element access.
pub struct PinArrayBinder<T> {
  gen: Generator,
  pin: Pin,
  _phantom: PhantomData<T>,
}

impl<T> fmt::Debug for PinArrayBinder<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PinArrayBinder")
      .field("pin", &self.pin)
      .finish()
  }
}

impl<T> PinBinder for PinArrayBinder<T> {
  fn generator(&self) -> &Generator {
    &self.gen
  }

  fn pin(&self) -> Pin {
    self.pin
  }
}

impl<T> PinArrayBinder<T>
where
  T: ToPinType,
{
  pub(crate) fn new(gen: Generator, pin: Pin) -> Self {
    PinArrayBinder {
      gen,
      pin,
      _phantom: PhantomData,
    }
  }

  /// Read the element at `index`.
  pub fn at(&self, index: impl AsIndex) -> Binder<T> {
    let index = index.index_pin(&self.gen);
    let pin = self
      .gen
      .instantiate1(OpKind::ArrayIndex, vec![self.pin, index], T::PIN_TYPE);
    Binder::new(self.gen.clone(), pin)
  }

  /// Overwrite the element at `index`.
  ///
  /// The write yields a new array pin and the proxy moves onto it; the
  /// previous array pin stays valid for whoever captured it.
  pub fn set_at(&mut self, index: impl AsIndex, value: impl IntoBinder<T>) {
    let index = index.index_pin(&self.gen);
    let value = value.into_binder(&self.gen);
    self.gen.expect_same(value.generator());

    let pin = self.gen.instantiate1(
      OpKind::ArrayWrite,
      vec![self.pin, index, value.pin()],
      self.pin.ty(),
    );
    self.pin = pin;
  }

  /// Number of elements, as a `u32` scalar binder.
  pub fn len(&self) -> Binder<u32> {
    let pin = self
      .gen
      .instantiate1(OpKind::ArrayLen, vec![self.pin], LEN_TYPE);
    Binder::new(self.gen.clone(), pin)
  }
}
