//! Channel extraction and masked channel writes.

use std::fmt;

use crate::binder::{Binder, IntoBinder, PinBinder};
use crate::error::GraphError;
use crate::op::OpKind;
use crate::types::{Dim, ToPinType, V2, V3, V4};

/// Select a channel to extract from or write into a vector.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SwizzleSelector {
  /// Select the `.x` (or `.r`) channel.
  X,

  /// Select the `.y` (or `.g`) channel.
  Y,

  /// Select the `.z` (or `.b`) channel.
  Z,

  /// Select the `.w` (or `.a`) channel.
  W,
}

impl SwizzleSelector {
  /// Zero-based lane this selector addresses.
  pub fn index(self) -> usize {
    match self {
      SwizzleSelector::X => 0,
      SwizzleSelector::Y => 1,
      SwizzleSelector::Z => 2,
      SwizzleSelector::W => 3,
    }
  }

  fn from_char(c: char) -> Option<Self> {
    match c.to_ascii_lowercase() {
      'x' | 'r' => Some(SwizzleSelector::X),
      'y' | 'g' => Some(SwizzleSelector::Y),
      'z' | 'b' => Some(SwizzleSelector::Z),
      'w' | 'a' => Some(SwizzleSelector::W),
      _ => None,
    }
  }

  fn to_char(self) -> char {
    match self {
      SwizzleSelector::X => 'x',
      SwizzleSelector::Y => 'y',
      SwizzleSelector::Z => 'z',
      SwizzleSelector::W => 'w',
    }
  }
}

/// An ordered run of one to four channel selectors.
///
/// The selector count fixes the width of the swizzled result; the mask itself
/// says nothing about the source width, which is checked when the mask is
/// used ([`SwizzleMask::validate_read`], [`SwizzleMask::validate_write`]).
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct SwizzleMask {
  // unused tail slots are canonically X so derived equality behaves
  sels: [SwizzleSelector; 4],
  len: u8,
}

impl SwizzleMask {
  /// Build a mask from explicit selectors.
  pub fn new(sels: &[SwizzleSelector]) -> Result<Self, GraphError> {
    if sels.is_empty() || sels.len() > 4 {
      return Err(GraphError::InvalidMaskLen(sels.len()));
    }

    let mut mask = [SwizzleSelector::X; 4];
    mask[..sels.len()].copy_from_slice(sels);

    Ok(SwizzleMask {
      sels: mask,
      len: sels.len() as u8,
    })
  }

  /// Parse a compact mask literal such as `"zyx"` or `"rgba"`.
  ///
  /// Case-insensitive; `rgba` channel names alias `xyzw`.
  pub fn parse(s: &str) -> Result<Self, GraphError> {
    let mut sels = Vec::with_capacity(s.len());

    for c in s.chars() {
      sels.push(SwizzleSelector::from_char(c).ok_or(GraphError::InvalidMaskChar(c))?);
    }

    Self::new(&sels)
  }

  /// Number of selected channels.
  pub fn len(&self) -> usize {
    self.len as usize
  }

  /// Width of the value a read through this mask produces.
  pub fn dim(&self) -> Dim {
    // len is 1..=4 by construction
    match Dim::of_width(self.len()) {
      Some(dim) => dim,
      None => Dim::Scalar,
    }
  }

  /// Selected channels, in mask order.
  pub fn selectors(&self) -> &[SwizzleSelector] {
    &self.sels[..self.len()]
  }

  /// Check every selector addresses a lane the source actually has.
  ///
  /// Repetition is fine on reads; `"xxx"` broadcasts a lane.
  pub fn validate_read(&self, source: Dim) -> Result<(), GraphError> {
    for &sel in self.selectors() {
      if sel.index() >= source.width() {
        return Err(GraphError::SwizzleOutOfRange {
          selector: sel,
          dim: source,
        });
      }
    }

    Ok(())
  }

  /// Check the mask is usable as a write destination on the source.
  ///
  /// On top of the read rules, a destination channel may appear only once;
  /// repeating one would make the node ambiguous for backends.
  pub fn validate_write(&self, source: Dim) -> Result<(), GraphError> {
    self.validate_read(source)?;

    let mut seen = [false; 4];
    for &sel in self.selectors() {
      if seen[sel.index()] {
        return Err(GraphError::DuplicateWriteSelector(sel));
      }
      seen[sel.index()] = true;
    }

    Ok(())
  }
}

impl fmt::Debug for SwizzleMask {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "SwizzleMask(")?;
    fmt::Display::fmt(self, f)?;
    write!(f, ")")
  }
}

impl fmt::Display for SwizzleMask {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for &sel in self.selectors() {
      write!(f, "{}", sel.to_char())?;
    }
    Ok(())
  }
}

fn read<R>(source: &dyn PinBinder, source_dim: Dim, sels: &[SwizzleSelector]) -> Binder<R>
where
  R: ToPinType,
{
  let mask = match SwizzleMask::new(sels).and_then(|m| m.validate_read(source_dim).map(|_| m)) {
    Ok(mask) => mask,
    Err(e) => panic!("{}", e),
  };

  let pin = source
    .generator()
    .instantiate1(OpKind::Swizzle(mask), vec![source.pin()], R::PIN_TYPE);
  Binder::new(source.generator().clone(), pin)
}

fn write<S>(target: &mut Binder<S>, source_dim: Dim, sels: &[SwizzleSelector], value: &dyn PinBinder)
where
  S: ToPinType,
{
  let mask = match SwizzleMask::new(sels).and_then(|m| m.validate_write(source_dim).map(|_| m)) {
    Ok(mask) => mask,
    Err(e) => panic!("{}", e),
  };

  target.generator().expect_same(value.generator());
  let pin = target.generator().instantiate1(
    OpKind::SwizzleWrite(mask),
    vec![target.pin(), value.pin()],
    S::PIN_TYPE,
  );
  target.rebind(pin);
}

/// Interface to implement to swizzle-read a binder.
///
/// If you plan to use your implementor with the [`sw!`](sw) macro, `S` must be one of the following types:
///
/// - [`SwizzleSelector`]: to implement `sw!(.x)`.
/// - [[`SwizzleSelector`]; 2]: to implement `sw!(.xx)`.
/// - [[`SwizzleSelector`]; 3]: to implement `sw!(.xxx)`.
/// - [[`SwizzleSelector`]; 4]: to implement `sw!(.xxxx)`.
pub trait Swizzlable<S> {
  type Output;

  fn swizzle(&self, sw: S) -> Self::Output;
}

/// Interface to implement to overwrite some channels of a binder.
///
/// A write moves the binder to the fresh pin produced by the write node; the
/// binder's previous pin stays valid in the graph for whoever captured it.
pub trait SwizzleAssign<S, V> {
  fn set_swizzle(&mut self, sw: S, value: V);
}

macro_rules! impl_swizzle_Binder {
  ($src:ident, $dim:ident) => {
    impl<T> Swizzlable<SwizzleSelector> for Binder<$src<T>>
    where
      T: ToPinType,
    {
      type Output = Binder<T>;

      fn swizzle(&self, x: SwizzleSelector) -> Self::Output {
        read(self, Dim::$dim, &[x])
      }
    }

    impl<T> Swizzlable<[SwizzleSelector; 2]> for Binder<$src<T>>
    where
      V2<T>: ToPinType,
    {
      type Output = Binder<V2<T>>;

      fn swizzle(&self, [x, y]: [SwizzleSelector; 2]) -> Self::Output {
        read(self, Dim::$dim, &[x, y])
      }
    }

    impl<T> Swizzlable<[SwizzleSelector; 3]> for Binder<$src<T>>
    where
      V3<T>: ToPinType,
    {
      type Output = Binder<V3<T>>;

      fn swizzle(&self, [x, y, z]: [SwizzleSelector; 3]) -> Self::Output {
        read(self, Dim::$dim, &[x, y, z])
      }
    }

    impl<T> Swizzlable<[SwizzleSelector; 4]> for Binder<$src<T>>
    where
      V4<T>: ToPinType,
    {
      type Output = Binder<V4<T>>;

      fn swizzle(&self, [x, y, z, w]: [SwizzleSelector; 4]) -> Self::Output {
        read(self, Dim::$dim, &[x, y, z, w])
      }
    }

    impl<T, V> SwizzleAssign<SwizzleSelector, V> for Binder<$src<T>>
    where
      $src<T>: ToPinType,
      T: ToPinType,
      V: IntoBinder<T>,
    {
      fn set_swizzle(&mut self, x: SwizzleSelector, value: V) {
        let value = value.into_binder(self.generator());
        write(self, Dim::$dim, &[x], &value)
      }
    }

    impl<T, V> SwizzleAssign<[SwizzleSelector; 2], V> for Binder<$src<T>>
    where
      $src<T>: ToPinType,
      V2<T>: ToPinType,
      V: IntoBinder<V2<T>>,
    {
      fn set_swizzle(&mut self, [x, y]: [SwizzleSelector; 2], value: V) {
        let value = value.into_binder(self.generator());
        write(self, Dim::$dim, &[x, y], &value)
      }
    }

    impl<T, V> SwizzleAssign<[SwizzleSelector; 3], V> for Binder<$src<T>>
    where
      $src<T>: ToPinType,
      V3<T>: ToPinType,
      V: IntoBinder<V3<T>>,
    {
      fn set_swizzle(&mut self, [x, y, z]: [SwizzleSelector; 3], value: V) {
        let value = value.into_binder(self.generator());
        write(self, Dim::$dim, &[x, y, z], &value)
      }
    }

    impl<T, V> SwizzleAssign<[SwizzleSelector; 4], V> for Binder<$src<T>>
    where
      $src<T>: ToPinType,
      V4<T>: ToPinType,
      V: IntoBinder<V4<T>>,
    {
      fn set_swizzle(&mut self, [x, y, z, w]: [SwizzleSelector; 4], value: V) {
        let value = value.into_binder(self.generator());
        write(self, Dim::$dim, &[x, y, z, w], &value)
      }
    }
  };
}

impl_swizzle_Binder!(V2, D2);
impl_swizzle_Binder!(V3, D3);
impl_swizzle_Binder!(V4, D4);

/// Binders having a `x` or `r` coordinate.
///
/// Akin to swizzling with `.x` or `.r`, but easier.
pub trait HasX {
  type Output;

  fn x(&self) -> Self::Output;
  fn r(&self) -> Self::Output {
    self.x()
  }
}

/// Binders having a `y` or `g` coordinate.
///
/// Akin to swizzling with `.y` or `.g`, but easier.
pub trait HasY {
  type Output;

  fn y(&self) -> Self::Output;
  fn g(&self) -> Self::Output {
    self.y()
  }
}

/// Binders having a `z` or `b` coordinate.
///
/// Akin to swizzling with `.z` or `.b`, but easier.
pub trait HasZ {
  type Output;

  fn z(&self) -> Self::Output;
  fn b(&self) -> Self::Output {
    self.z()
  }
}

/// Binders having a `w` or `a` coordinate.
///
/// Akin to swizzling with `.w` or `.a`, but easier.
pub trait HasW {
  type Output;

  fn w(&self) -> Self::Output;
  fn a(&self) -> Self::Output {
    self.w()
  }
}

macro_rules! impl_has_k {
  ($trait:ident, $name:ident, $selector:ident, $t:ident) => {
    impl<T> $trait for Binder<$t<T>>
    where
      T: ToPinType,
    {
      type Output = Binder<T>;

      fn $name(&self) -> Self::Output {
        self.swizzle(SwizzleSelector::$selector)
      }
    }
  };
}

impl_has_k!(HasX, x, X, V2);
impl_has_k!(HasX, x, X, V3);
impl_has_k!(HasX, x, X, V4);

impl_has_k!(HasY, y, Y, V2);
impl_has_k!(HasY, y, Y, V3);
impl_has_k!(HasY, y, Y, V4);

impl_has_k!(HasZ, z, Z, V3);
impl_has_k!(HasZ, z, Z, V4);

impl_has_k!(HasW, w, W, V4);

/// Swizzle macro.
///
/// This macro allows to swizzle binders to yield binders reorganizing the vector channels. For instance,
/// `sw!(color, .rgbr)` will take a 4D color and will output a 4D color for which the alpha channel is overridden with
/// the red channel.
///
/// Have a look at [`Swizzlable`] for a comprehensive list of what you can do.
#[macro_export]
macro_rules! sw {
  ($e:expr, . $a:tt) => {
    $e.swizzle($crate::sw_extract!($a))
  };

  ($e:expr, . $a:tt . $b:tt) => {
    $e.swizzle([$crate::sw_extract!($a), $crate::sw_extract!($b)])
  };

  ($e:expr, . $a:tt . $b:tt . $c:tt) => {
    $e.swizzle([
      $crate::sw_extract!($a),
      $crate::sw_extract!($b),
      $crate::sw_extract!($c),
    ])
  };

  ($e:expr, . $a:tt . $b:tt . $c:tt . $d:tt) => {
    $e.swizzle([
      $crate::sw_extract!($a),
      $crate::sw_extract!($b),
      $crate::sw_extract!($c),
      $crate::sw_extract!($d),
    ])
  };
}

#[doc(hidden)]
#[macro_export]
macro_rules! sw_extract {
  (x) => {
    $crate::swizzle::SwizzleSelector::X
  };

  (r) => {
    $crate::swizzle::SwizzleSelector::X
  };

  (y) => {
    $crate::swizzle::SwizzleSelector::Y
  };

  (g) => {
    $crate::swizzle::SwizzleSelector::Y
  };

  (z) => {
    $crate::swizzle::SwizzleSelector::Z
  };

  (b) => {
    $crate::swizzle::SwizzleSelector::Z
  };

  (w) => {
    $crate::swizzle::SwizzleSelector::W
  };

  (a) => {
    $crate::swizzle::SwizzleSelector::W
  };
}
