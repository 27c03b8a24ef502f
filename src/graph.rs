//! The graph under construction and the generator handle that grows it.
//!
//! A [`Generator`] is a cheap, clonable handle over a single growing graph.
//! Every DSL surface (operators, swizzles, loop regions, texture reads) funnels
//! into [`Generator::instantiate`], which appends one node and mints one fresh
//! pin per declared output. Nodes are never removed or reordered; the node
//! list a backend receives is exactly the sequence of DSL calls that built it.
//!
//! Generators are identity-compared ([`Generator::same`]), never structurally:
//! two handles denote the same graph only if they were cloned from one
//! another. Combining pins minted under distinct generators is a
//! programming-contract violation and panics with
//! [`GraphError::MixedGenerators`]. Construction is single-threaded; the
//! handle is neither `Send` nor `Sync`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::binder::{Binder, PinBinder};
use crate::error::GraphError;
use crate::op::{ConstantValue, ExpandPolicy, OpKind};
use crate::pin::{NodeId, Pin};
use crate::texture::{SamplerBinder, Texture2DBinder};
use crate::types::{PinType, ToPinType, V2, V3, V4};

/// One cell of the graph: an operation, the pins it consumes and the types it
/// produces.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
  pub kind: OpKind,
  pub inputs: Vec<Pin>,
  pub outputs: Vec<PinType>,
}

/// Handle over a growing graph.
#[derive(Clone)]
pub struct Generator {
  nodes: Rc<RefCell<Vec<Node>>>,
}

impl Default for Generator {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for Generator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Generator")
      .field("nodes", &self.nodes.borrow().len())
      .finish()
  }
}

impl Generator {
  /// Create a generator over a fresh, empty graph.
  pub fn new() -> Self {
    Generator {
      nodes: Rc::new(RefCell::new(Vec::new())),
    }
  }

  /// Whether two handles grow the same graph.
  ///
  /// This is pointer identity, never structural comparison.
  pub fn same(&self, other: &Generator) -> bool {
    Rc::ptr_eq(&self.nodes, &other.nodes)
  }

  pub(crate) fn expect_same(&self, other: &Generator) {
    if !self.same(other) {
      panic!("{}", GraphError::MixedGenerators);
    }
  }

  /// Append one node and mint one pin per declared output.
  pub(crate) fn instantiate(
    &self,
    kind: OpKind,
    inputs: Vec<Pin>,
    outputs: Vec<PinType>,
  ) -> Vec<Pin> {
    if let Some(expected) = kind.input_arity() {
      if inputs.len() != expected {
        panic!(
          "{}",
          GraphError::ArityMismatch {
            expected,
            got: inputs.len(),
          }
        );
      }
    }

    let mut nodes = self.nodes.borrow_mut();
    let id = NodeId(nodes.len() as u32);
    trace!(
      "node {}: {:?}, {} input(s), {} output(s)",
      id,
      kind,
      inputs.len(),
      outputs.len()
    );

    let pins = outputs
      .iter()
      .enumerate()
      .map(|(i, ty)| Pin::new(id, i as u16, *ty))
      .collect();
    nodes.push(Node {
      kind,
      inputs,
      outputs,
    });

    pins
  }

  /// [`Generator::instantiate`] for the common single-output case.
  pub(crate) fn instantiate1(&self, kind: OpKind, inputs: Vec<Pin>, output: PinType) -> Pin {
    self.instantiate(kind, inputs, vec![output])[0]
  }

  /// Promote a literal to a constant node and hand back its binder.
  pub fn fixed<T>(&self, value: T) -> Binder<T>
  where
    T: Into<ConstantValue> + ToPinType,
  {
    let pin = self.instantiate1(OpKind::Constant(value.into()), Vec::new(), T::PIN_TYPE);
    Binder::new(self.clone(), pin)
  }

  /// Declare a named constant bound by the host at draw time.
  pub fn uniform<T>(&self, name: impl Into<String>) -> Binder<T>
  where
    T: ToPinType,
  {
    let pin = self.instantiate1(
      OpKind::Uniform {
        name: name.into(),
        ty: T::PIN_TYPE,
      },
      Vec::new(),
      T::PIN_TYPE,
    );
    Binder::new(self.clone(), pin)
  }

  /// Declare a per-invocation shader input.
  pub fn input<T>(&self, name: impl Into<String>) -> Binder<T>
  where
    T: ToPinType,
  {
    let pin = self.instantiate1(
      OpKind::Input {
        name: name.into(),
        ty: T::PIN_TYPE,
      },
      Vec::new(),
      T::PIN_TYPE,
    );
    Binder::new(self.clone(), pin)
  }

  /// Bind a value to a named shader output.
  pub fn output(&self, name: impl Into<String>, value: &dyn PinBinder) {
    self.expect_same(value.generator());
    self.instantiate(
      OpKind::Output { name: name.into() },
      vec![value.pin()],
      Vec::new(),
    );
  }

  /// Wrap a raw pin back into a typed binder.
  ///
  /// Fails with [`GraphError::TypeMismatch`] when the pin does not carry
  /// `T`'s pin type.
  pub fn wrap<T>(&self, pin: Pin) -> Result<Binder<T>, GraphError>
  where
    T: ToPinType,
  {
    if pin.ty() != T::PIN_TYPE {
      return Err(GraphError::TypeMismatch {
        expected: T::PIN_TYPE,
        found: pin.ty(),
      });
    }

    Ok(Binder::new(self.clone(), pin))
  }

  fn compound(&self, parts: &[&dyn PinBinder], ty: PinType) -> Pin {
    let inputs = parts
      .iter()
      .map(|p| {
        self.expect_same(p.generator());
        p.pin()
      })
      .collect();
    self.instantiate1(OpKind::Compound, inputs, ty)
  }

  /// Assemble a 2D vector out of two scalars.
  pub fn vec2<T>(&self, x: &Binder<T>, y: &Binder<T>) -> Binder<V2<T>>
  where
    V2<T>: ToPinType,
  {
    let pin = self.compound(&[x, y], <V2<T>>::PIN_TYPE);
    Binder::new(self.clone(), pin)
  }

  /// Assemble a 3D vector out of three scalars.
  pub fn vec3<T>(&self, x: &Binder<T>, y: &Binder<T>, z: &Binder<T>) -> Binder<V3<T>>
  where
    V3<T>: ToPinType,
  {
    let pin = self.compound(&[x, y, z], <V3<T>>::PIN_TYPE);
    Binder::new(self.clone(), pin)
  }

  /// Widen a 2D vector with one extra scalar.
  pub fn vec3_from<T>(&self, xy: &Binder<V2<T>>, z: &Binder<T>) -> Binder<V3<T>>
  where
    V3<T>: ToPinType,
  {
    let pin = self.compound(&[xy, z], <V3<T>>::PIN_TYPE);
    Binder::new(self.clone(), pin)
  }

  /// Assemble a 4D vector out of four scalars.
  pub fn vec4<T>(
    &self,
    x: &Binder<T>,
    y: &Binder<T>,
    z: &Binder<T>,
    w: &Binder<T>,
  ) -> Binder<V4<T>>
  where
    V4<T>: ToPinType,
  {
    let pin = self.compound(&[x, y, z, w], <V4<T>>::PIN_TYPE);
    Binder::new(self.clone(), pin)
  }

  /// Widen a 3D vector with one extra scalar.
  pub fn vec4_from<T>(&self, xyz: &Binder<V3<T>>, w: &Binder<T>) -> Binder<V4<T>>
  where
    V4<T>: ToPinType,
  {
    let pin = self.compound(&[xyz, w], <V4<T>>::PIN_TYPE);
    Binder::new(self.clone(), pin)
  }

  /// Widen a value by padding the missing lanes according to `policy`.
  ///
  /// The target type must be strictly wider than the source and carry the
  /// same element kind; anything else is a contract violation and panics
  /// with [`GraphError::InvalidExpand`].
  pub fn expand<S, T>(&self, source: &Binder<S>, policy: ExpandPolicy) -> Binder<T>
  where
    S: ToPinType,
    T: ToPinType,
  {
    let from = S::PIN_TYPE;
    let to = T::PIN_TYPE;
    let widens = match (from.prim(), to.prim()) {
      (Some((fk, fd)), Some((tk, td))) => fk == tk && td.width() > fd.width(),
      _ => false,
    };

    if !widens {
      panic!("{}", GraphError::InvalidExpand { from, to });
    }

    self.expect_same(source.generator());
    let pin = self.instantiate1(OpKind::Expand(policy), vec![source.pin()], to);
    Binder::new(self.clone(), pin)
  }

  /// Select between two values of the same type.
  pub fn branch<T>(
    &self,
    condition: &Binder<bool>,
    if_true: &Binder<T>,
    if_false: &Binder<T>,
  ) -> Binder<T>
  where
    T: ToPinType,
  {
    self.expect_same(condition.generator());
    self.expect_same(if_true.generator());
    self.expect_same(if_false.generator());

    let pin = self.instantiate1(
      OpKind::Branch,
      vec![condition.pin(), if_true.pin(), if_false.pin()],
      T::PIN_TYPE,
    );
    Binder::new(self.clone(), pin)
  }

  /// Declare a named 2D texture whose texels read back as `T`.
  pub fn texture_2d<T>(&self, name: impl Into<String>) -> Texture2DBinder<T>
  where
    T: ToPinType,
  {
    let ty = match T::PIN_TYPE {
      PinType::Prim(kind, dim) => PinType::Texture2D(kind, dim),
      other => panic!("{}", GraphError::InvalidTexel(other)),
    };

    let pin = self.instantiate1(
      OpKind::Uniform {
        name: name.into(),
        ty,
      },
      Vec::new(),
      ty,
    );
    Texture2DBinder::new(self.clone(), pin)
  }

  /// Declare a named sampler.
  pub fn sampler(&self, name: impl Into<String>) -> SamplerBinder {
    let pin = self.instantiate1(
      OpKind::Uniform {
        name: name.into(),
        ty: PinType::Sampler,
      },
      Vec::new(),
      PinType::Sampler,
    );
    SamplerBinder::new(self.clone(), pin)
  }

  /// Number of nodes created so far.
  pub fn node_count(&self) -> usize {
    self.nodes.borrow().len()
  }

  /// Snapshot of one node.
  pub fn node(&self, id: NodeId) -> Node {
    self.nodes.borrow()[id.index()].clone()
  }

  /// Snapshot of the whole graph, in creation order.
  pub fn nodes(&self) -> Vec<Node> {
    self.nodes.borrow().clone()
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::types::{Dim, MatrixDim, ScalarKind};

  #[test]
  fn nodes_are_created_in_call_order() {
    let gen = Generator::new();
    let a = gen.fixed(1.);
    let b = gen.fixed(2.);
    let c = &a + &b;

    assert_eq!(gen.node_count(), 3);
    assert!(a.pin().node() < b.pin().node());
    assert!(b.pin().node() < c.pin().node());
    assert_eq!(
      gen.node(c.pin().node()).inputs,
      vec![a.pin(), b.pin()]
    );
  }

  #[test]
  fn compound_vectors() {
    let gen = Generator::new();
    let x = gen.fixed(1.);
    let y = gen.fixed(2.);
    let z = gen.fixed(3.);
    let v = gen.vec3(&x, &y, &z);

    let node = gen.node(v.pin().node());
    assert_eq!(node.kind, OpKind::Compound);
    assert_eq!(node.inputs, vec![x.pin(), y.pin(), z.pin()]);
    assert_eq!(v.pin().ty(), PinType::Prim(ScalarKind::Float, Dim::D3));
  }

  #[test]
  fn expand_widens() {
    let gen = Generator::new();
    let p = gen.input::<V3<f32>>("position");
    let h: Binder<V4<f32>> = gen.expand(&p, ExpandPolicy::OnesAtLast);

    let node = gen.node(h.pin().node());
    assert_eq!(node.kind, OpKind::Expand(ExpandPolicy::OnesAtLast));
    assert_eq!(h.pin().ty(), PinType::Prim(ScalarKind::Float, Dim::D4));
  }

  #[test]
  #[should_panic(expected = "cannot expand")]
  fn expand_rejects_narrowing() {
    let gen = Generator::new();
    let p = gen.input::<V4<f32>>("position");
    let _: Binder<V2<f32>> = gen.expand(&p, ExpandPolicy::AddZeros);
  }

  #[test]
  #[should_panic(expected = "cannot expand")]
  fn expand_rejects_kind_changes() {
    let gen = Generator::new();
    let p = gen.input::<V2<i32>>("texel");
    let _: Binder<V3<f32>> = gen.expand(&p, ExpandPolicy::AddZeros);
  }

  #[test]
  fn wrap_checks_the_pin_type() {
    let gen = Generator::new();
    let a = gen.fixed(1.);

    assert!(gen.wrap::<f32>(a.pin()).is_ok());
    assert_eq!(
      gen.wrap::<i32>(a.pin()).unwrap_err(),
      GraphError::TypeMismatch {
        expected: PinType::Prim(ScalarKind::Int, Dim::Scalar),
        found: PinType::Prim(ScalarKind::Float, Dim::Scalar),
      }
    );
  }

  #[test]
  fn uniforms_inputs_outputs() {
    let gen = Generator::new();
    let m = gen.uniform::<crate::types::M44>("world_view_projection");
    let p = gen.input::<V4<f32>>("position");
    let t = &p * &m;
    gen.output("out_position", &t);

    assert_eq!(m.pin().ty(), PinType::Matrix(MatrixDim::D44));
    let last = gen.node(NodeId((gen.node_count() - 1) as u32));
    assert_eq!(
      last.kind,
      OpKind::Output {
        name: "out_position".to_owned()
      }
    );
    assert_eq!(last.inputs, vec![t.pin()]);
    assert!(last.outputs.is_empty());
  }

  #[test]
  #[should_panic(expected = "different generators")]
  fn outputs_check_the_generator() {
    let gen = Generator::new();
    let other = Generator::new();
    let a = other.fixed(1.);
    gen.output("color", &a);
  }
}
