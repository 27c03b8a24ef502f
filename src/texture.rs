//! Texture and sampler binders.
//!
//! Textures and samplers are named constants like any other uniform; their
//! binders only add the read entry points. Sampling is the filtered path
//! (texture, sampler, normalized coordinates); loading fetches one texel at
//! integer coordinates, widening the address with a zero mip level first.

use std::fmt;
use std::marker::PhantomData;

use crate::binder::{Binder, PinBinder};
use crate::graph::Generator;
use crate::op::{ExpandPolicy, OpKind};
use crate::pin::Pin;
use crate::types::{ToPinType, V2, V3};

/// Proxy over a named 2D texture whose texels read back as `T`.
pub struct Texture2DBinder<T> {
  gen: Generator,
  pin: Pin,
  _phantom: PhantomData<T>,
}

impl<T> fmt::Debug for Texture2DBinder<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Texture2DBinder")
      .field("pin", &self.pin)
      .finish()
  }
}

impl<T> PinBinder for Texture2DBinder<T> {
  fn generator(&self) -> &Generator {
    &self.gen
  }

  fn pin(&self) -> Pin {
    self.pin
  }
}

impl<T> Texture2DBinder<T>
where
  T: ToPinType,
{
  pub(crate) fn new(gen: Generator, pin: Pin) -> Self {
    Texture2DBinder {
      gen,
      pin,
      _phantom: PhantomData,
    }
  }

  /// Filtered read at normalized coordinates.
  pub fn sample(&self, sampler: &SamplerBinder, coords: &Binder<V2<f32>>) -> Binder<T> {
    self.gen.expect_same(sampler.generator());
    self.gen.expect_same(coords.generator());

    let pin = self.gen.instantiate1(
      OpKind::Sample,
      vec![self.pin, sampler.pin(), coords.pin()],
      T::PIN_TYPE,
    );
    Binder::new(self.gen.clone(), pin)
  }

  /// Unfiltered fetch of the texel at integer coordinates, mip level 0.
  pub fn load(&self, coords: &Binder<V2<i32>>) -> Binder<T> {
    self.gen.expect_same(coords.generator());

    let address: Binder<V3<i32>> = self.gen.expand(coords, ExpandPolicy::AddZeros);
    let pin = self
      .gen
      .instantiate1(OpKind::Load, vec![self.pin, address.pin()], T::PIN_TYPE);
    Binder::new(self.gen.clone(), pin)
  }
}

/// Proxy over a named sampler.
#[derive(Debug)]
pub struct SamplerBinder {
  gen: Generator,
  pin: Pin,
}

impl SamplerBinder {
  pub(crate) fn new(gen: Generator, pin: Pin) -> Self {
    SamplerBinder { gen, pin }
  }
}

impl PinBinder for SamplerBinder {
  fn generator(&self) -> &Generator {
    &self.gen
  }

  fn pin(&self) -> Pin {
    self.pin
  }
}
