//! Value carriers and the static type vocabulary of graph pins.
//!
//! The DSL is typed at two levels. At the Rust level, marker types such as
//! [`V3<f32>`] or [`M44`] parameterize binders so that operator overloads only
//! exist for sensible combinations. At the graph level, every pin carries a
//! [`PinType`] so backends (and runtime validation) can inspect what flows
//! through an edge. [`ToPinType`] bridges the two.

macro_rules! make_vn {
  ($t:ident, $dim:expr) => {
    /// Scalar vectors.
    ///
    /// Scalar vectors come into three flavors, based on the dimension used:
    ///
    /// - Two dimensions (2D): [`V2<T>`].
    /// - Three dimensions (3D): [`V3<T>`].
    /// - Four dimensions (4D): [`V4<T>`].
    ///
    /// Each type implements the [`From`] trait for sized arrays. For instance, if you want to make a `V3<f32>` from
    /// constants / literals, you can simply use the implementor `From<[f32; 3]> for V3<f32>`.
    #[derive(Clone, Debug, PartialEq)]
    pub struct $t<T>(pub [T; $dim]);

    impl<T> From<[T; $dim]> for $t<T> {
      fn from(a: [T; $dim]) -> Self {
        Self(a)
      }
    }
  };
}

make_vn!(V2, 2);
make_vn!(V3, 3);
make_vn!(V4, 4);

/// Matrix wrapper.
///
/// This type represents a matrix of a given dimension, deduced from the wrapped type.
///
/// > Note: matrices are expressed in column-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<T>(pub T);

impl<T, const M: usize, const N: usize> From<[[T; N]; M]> for Matrix<[[T; N]; M]> {
  fn from(a: [[T; N]; M]) -> Self {
    Matrix(a)
  }
}

/// Matrix dimension.
///
/// Only squared dimensions are supported, as those are the only ones the
/// operation catalog produces.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MatrixDim {
  /// Squared 2 dimension.
  D22,
  /// Squared 3 dimension.
  D33,
  /// Squared 4 dimension.
  D44,
}

/// Dimension of a primitive pin type.
///
/// - [`Dim::Scalar`]: designates a scalar value.
/// - [`Dim::D2`]: designates a 2D vector.
/// - [`Dim::D3`]: designates a 3D vector.
/// - [`Dim::D4`]: designates a 4D vector.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Dim {
  /// Scalar value.
  Scalar,

  /// 2D vector.
  D2,

  /// 3D vector.
  D3,

  /// 4D vector.
  D4,
}

impl Dim {
  /// Number of scalar lanes for this dimension.
  pub fn width(self) -> usize {
    match self {
      Dim::Scalar => 1,
      Dim::D2 => 2,
      Dim::D3 => 3,
      Dim::D4 => 4,
    }
  }

  /// Dimension with the given number of lanes, if any.
  pub fn of_width(width: usize) -> Option<Self> {
    match width {
      1 => Some(Dim::Scalar),
      2 => Some(Dim::D2),
      3 => Some(Dim::D3),
      4 => Some(Dim::D4),
      _ => None,
    }
  }
}

/// Scalar element kind of a primitive pin type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScalarKind {
  /// An integral value.
  Int,

  /// An unsigned integral value.
  UInt,

  /// A floating value.
  Float,

  /// A boolean value.
  Bool,
}

/// Type of a pin, as recorded in the graph.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PinType {
  /// A scalar or vector value.
  Prim(ScalarKind, Dim),

  /// A squared floating matrix.
  Matrix(MatrixDim),

  /// A 2D texture whose texels are of the given kind and width.
  Texture2D(ScalarKind, Dim),

  /// A sampler object.
  Sampler,

  /// An array of scalar or vector elements, sized or dynamically sized.
  Array(ScalarKind, Dim, Option<u32>),
}

impl PinType {
  /// Lane count for primitive pins; `None` for matrices, textures and samplers.
  pub fn dim(self) -> Option<Dim> {
    match self {
      PinType::Prim(_, dim) => Some(dim),
      _ => None,
    }
  }

  /// Kind and dimension for primitive pins.
  pub fn prim(self) -> Option<(ScalarKind, Dim)> {
    match self {
      PinType::Prim(kind, dim) => Some((kind, dim)),
      _ => None,
    }
  }
}

/// Mapping from a Rust marker type to the [`PinType`] its pins carry.
pub trait ToPinType {
  const PIN_TYPE: PinType;
}

macro_rules! impl_ToPinType {
  ($t:ty, $kind:ident, $dim:ident) => {
    impl ToPinType for $t {
      const PIN_TYPE: PinType = PinType::Prim(ScalarKind::$kind, Dim::$dim);
    }
  };
}

impl_ToPinType!(i32, Int, Scalar);
impl_ToPinType!(V2<i32>, Int, D2);
impl_ToPinType!(V3<i32>, Int, D3);
impl_ToPinType!(V4<i32>, Int, D4);

impl_ToPinType!(u32, UInt, Scalar);
impl_ToPinType!(V2<u32>, UInt, D2);
impl_ToPinType!(V3<u32>, UInt, D3);
impl_ToPinType!(V4<u32>, UInt, D4);

impl_ToPinType!(f32, Float, Scalar);
impl_ToPinType!(V2<f32>, Float, D2);
impl_ToPinType!(V3<f32>, Float, D3);
impl_ToPinType!(V4<f32>, Float, D4);

impl_ToPinType!(bool, Bool, Scalar);
impl_ToPinType!(V2<bool>, Bool, D2);
impl_ToPinType!(V3<bool>, Bool, D3);
impl_ToPinType!(V4<bool>, Bool, D4);

macro_rules! make_mat_ty {
  ($t:ident, $n:expr, $mdim:ident) => {
    pub type $t = Matrix<[[f32; $n]; $n]>;

    impl ToPinType for Matrix<[[f32; $n]; $n]> {
      const PIN_TYPE: PinType = PinType::Matrix(MatrixDim::$mdim);
    }
  };
}

make_mat_ty!(M22, 2, D22);
make_mat_ty!(M33, 3, D33);
make_mat_ty!(M44, 4, D44);
