//! Structured loop regions.
//!
//! A loop region brackets a stretch of graph construction between an entry
//! node and an exit node. The entry fans the iteration bound and every
//! carried value into fresh pins (the iteration index first), so the body is
//! built against region-local values; ending the region snapshots whatever
//! pins the carried slots hold at that moment into the exit node, in slot
//! order. The loop body's meaning (feeding slot outputs back into the next
//! iteration) belongs to the backend; the region only records the shape.

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use log::debug;

use crate::binder::{Binder, PinBinder};
use crate::error::GraphError;
use crate::graph::Generator;
use crate::op::OpKind;
use crate::pin::{NodeId, Pin};
use crate::types::{Dim, PinType, ScalarKind, ToPinType};

const INDEX_TYPE: PinType = PinType::Prim(ScalarKind::UInt, Dim::Scalar);

/// An open (or ended) loop region with indexed carried slots.
pub struct LoopRegion {
  gen: Generator,
  entry: NodeId,
  index: Pin,
  carried: Vec<Pin>,
  closed: bool,
}

impl Generator {
  /// Open a loop region running `n` times, carrying the given values.
  ///
  /// Every carried value is rebound to a fresh region-local pin; read them
  /// back through [`LoopRegion::value`] rather than using the original
  /// binders inside the body.
  pub fn begin_loop(&self, n: &Binder<u32>, carried: &[&dyn PinBinder]) -> LoopRegion {
    self.expect_same(n.generator());

    let mut inputs = Vec::with_capacity(carried.len() + 1);
    inputs.push(n.pin());
    let mut outputs = Vec::with_capacity(carried.len() + 1);
    outputs.push(INDEX_TYPE);

    for value in carried {
      self.expect_same(value.generator());
      inputs.push(value.pin());
      outputs.push(value.pin().ty());
    }

    let pins = self.instantiate(OpKind::LoopEntry, inputs, outputs);
    let entry = pins[0].node();
    debug!("loop region {} opened, {} carried slot(s)", entry, carried.len());

    LoopRegion {
      gen: self.clone(),
      entry,
      index: pins[0],
      carried: pins[1..].to_vec(),
      closed: false,
    }
  }

  /// [`Generator::begin_loop`] carrying one typed value.
  pub fn begin_loop1<T>(&self, n: &Binder<u32>, value: &Binder<T>) -> Loop1<T>
  where
    T: ToPinType,
  {
    Loop1 {
      region: self.begin_loop(n, &[value]),
      _phantom: PhantomData,
    }
  }

  /// [`Generator::begin_loop`] carrying two typed values.
  pub fn begin_loop2<T, T2>(
    &self,
    n: &Binder<u32>,
    first: &Binder<T>,
    second: &Binder<T2>,
  ) -> Loop2<T, T2>
  where
    T: ToPinType,
    T2: ToPinType,
  {
    Loop2 {
      region: self.begin_loop(n, &[first, second]),
      _phantom: PhantomData,
    }
  }
}

impl LoopRegion {
  /// Node id of the entry node; the exit node refers back to it.
  pub fn entry(&self) -> NodeId {
    self.entry
  }

  /// The iteration index, a region-local `u32` scalar.
  pub fn index(&self) -> Binder<u32> {
    Binder::new(self.gen.clone(), self.index)
  }

  /// Number of carried slots.
  pub fn len(&self) -> usize {
    self.carried.len()
  }

  /// Whether the region carries no values.
  pub fn is_empty(&self) -> bool {
    self.carried.is_empty()
  }

  /// Whether [`LoopRegion::end`] has been called.
  pub fn is_closed(&self) -> bool {
    self.closed
  }

  fn slot_pin(&self, slot: usize) -> Result<Pin, GraphError> {
    self.carried.get(slot).copied().ok_or(GraphError::NoSuchSlot {
      slot,
      len: self.carried.len(),
    })
  }

  /// Pin currently held by a carried slot.
  ///
  /// Stays readable after the region is closed.
  ///
  /// # Panics
  ///
  /// Panics when `slot` is past the number of carried slots; use
  /// [`LoopRegion::value`] for the checked form.
  pub fn carried_pin(&self, slot: usize) -> Pin {
    match self.slot_pin(slot) {
      Ok(pin) => pin,
      Err(e) => panic!("{}", e),
    }
  }

  /// Read a carried slot back as a typed binder.
  pub fn value<T>(&self, slot: usize) -> Result<Binder<T>, GraphError>
  where
    T: ToPinType,
  {
    self.gen.wrap(self.slot_pin(slot)?)
  }

  /// Reassign a carried slot to a new pin.
  ///
  /// The slot keeps its declared type; the exit node will consume whatever
  /// pin each slot holds when the region ends.
  pub fn set<T>(&mut self, slot: usize, value: &Binder<T>) -> Result<(), GraphError>
  where
    T: ToPinType,
  {
    if self.closed {
      return Err(GraphError::LoopClosed);
    }

    if !self.gen.same(value.generator()) {
      return Err(GraphError::MixedGenerators);
    }

    let expected = self.slot_pin(slot)?.ty();
    if value.pin().ty() != expected {
      return Err(GraphError::TypeMismatch {
        expected,
        found: value.pin().ty(),
      });
    }

    self.carried[slot] = value.pin();
    Ok(())
  }

  /// Close the region, snapshotting the carried slots into the exit node.
  pub fn end(&mut self) -> Result<(), GraphError> {
    if self.closed {
      return Err(GraphError::DoubleEnd);
    }

    self.closed = true;
    self.gen.instantiate(
      OpKind::LoopExit { entry: self.entry },
      self.carried.clone(),
      Vec::new(),
    );
    debug!("loop region {} closed", self.entry);

    Ok(())
  }
}

/// A loop region carrying one value, with the slot typed away.
pub struct Loop1<T> {
  region: LoopRegion,
  _phantom: PhantomData<T>,
}

impl<T> Loop1<T>
where
  T: ToPinType,
{
  /// Current value of the carried slot.
  pub fn value(&self) -> Binder<T> {
    // slot 0 was created at T's pin type
    Binder::new(self.region.gen.clone(), self.region.carried[0])
  }

  /// Reassign the carried slot.
  pub fn set_value(&mut self, value: &Binder<T>) -> Result<(), GraphError> {
    self.region.set(0, value)
  }
}

impl<T> Deref for Loop1<T> {
  type Target = LoopRegion;

  fn deref(&self) -> &Self::Target {
    &self.region
  }
}

impl<T> DerefMut for Loop1<T> {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.region
  }
}

/// A loop region carrying two values, with the slots typed away.
pub struct Loop2<T, T2> {
  region: LoopRegion,
  _phantom: PhantomData<(T, T2)>,
}

impl<T, T2> Loop2<T, T2>
where
  T: ToPinType,
  T2: ToPinType,
{
  /// Current value of the first carried slot.
  pub fn first(&self) -> Binder<T> {
    Binder::new(self.region.gen.clone(), self.region.carried[0])
  }

  /// Current value of the second carried slot.
  pub fn second(&self) -> Binder<T2> {
    Binder::new(self.region.gen.clone(), self.region.carried[1])
  }

  /// Reassign the first carried slot.
  pub fn set_first(&mut self, value: &Binder<T>) -> Result<(), GraphError> {
    self.region.set(0, value)
  }

  /// Reassign the second carried slot.
  pub fn set_second(&mut self, value: &Binder<T2>) -> Result<(), GraphError> {
    self.region.set(1, value)
  }
}

impl<T, T2> Deref for Loop2<T, T2> {
  type Target = LoopRegion;

  fn deref(&self) -> &Self::Target {
    &self.region
  }
}

impl<T, T2> DerefMut for Loop2<T, T2> {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.region
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::types::V3;

  #[test]
  fn entry_fans_bound_and_carried_values() {
    let gen = Generator::new();
    let n = gen.fixed(8u32);
    let acc = gen.fixed(0.);
    let pos = gen.input::<V3<f32>>("position");

    let region = gen.begin_loop(&n, &[&acc, &pos]);

    let entry = gen.node(region.entry());
    assert_eq!(entry.kind, OpKind::LoopEntry);
    assert_eq!(entry.inputs, vec![n.pin(), acc.pin(), pos.pin()]);
    assert_eq!(entry.outputs.len(), 3);
    assert_eq!(region.index().pin().ty(), INDEX_TYPE);
    assert_eq!(region.index().pin().output(), 0);
    assert_eq!(region.carried_pin(0).ty(), acc.pin().ty());
    assert_eq!(region.carried_pin(1).ty(), pos.pin().ty());
  }

  #[test]
  fn exit_snapshots_reassigned_slots() {
    let gen = Generator::new();
    let n = gen.fixed(4u32);
    let acc = gen.fixed(0.);
    let mut region = gen.begin_loop(&n, &[&acc]);

    let x1: Binder<f32> = region.value(0).unwrap();
    let x2 = &x1 + 1.;
    region.set(0, &x2).unwrap();
    region.end().unwrap();

    let exit = gen.node(NodeId((gen.node_count() - 1) as u32));
    assert_eq!(
      exit.kind,
      OpKind::LoopExit {
        entry: region.entry()
      }
    );
    assert_eq!(exit.inputs, vec![x2.pin()]);
  }

  #[test]
  fn ending_twice_is_an_error() {
    let gen = Generator::new();
    let n = gen.fixed(4u32);
    let mut region = gen.begin_loop(&n, &[]);

    assert!(region.end().is_ok());
    assert_eq!(region.end().unwrap_err(), GraphError::DoubleEnd);
  }

  #[test]
  fn closed_regions_are_read_only() {
    let gen = Generator::new();
    let n = gen.fixed(4u32);
    let acc = gen.fixed(0.);
    let mut region = gen.begin_loop(&n, &[&acc]);
    region.end().unwrap();

    let next = gen.fixed(1.);
    assert_eq!(region.set(0, &next).unwrap_err(), GraphError::LoopClosed);
    // reads stay valid
    assert!(region.value::<f32>(0).is_ok());
  }

  #[test]
  fn slots_keep_their_declared_type() {
    let gen = Generator::new();
    let n = gen.fixed(4u32);
    let acc = gen.fixed(0.);
    let mut region = gen.begin_loop(&n, &[&acc]);

    let wrong = gen.fixed(1i32);
    match region.set(0, &wrong) {
      Err(GraphError::TypeMismatch { .. }) => {}
      other => panic!("unexpected result {:?}", other.map(|_| ())),
    }
    assert!(region.value::<i32>(0).is_err());
  }

  #[test]
  fn out_of_range_slots_are_an_error() {
    let gen = Generator::new();
    let n = gen.fixed(4u32);
    let acc = gen.fixed(0.);
    let mut region = gen.begin_loop(&n, &[&acc]);

    assert_eq!(
      region.value::<f32>(1).unwrap_err(),
      GraphError::NoSuchSlot { slot: 1, len: 1 }
    );
    let next = gen.fixed(1.);
    assert_eq!(
      region.set(3, &next).unwrap_err(),
      GraphError::NoSuchSlot { slot: 3, len: 1 }
    );
    // slot 0 is unaffected
    assert!(region.set(0, &next).is_ok());
  }

  #[test]
  #[should_panic(expected = "no carried slot")]
  fn carried_pin_panics_out_of_range() {
    let gen = Generator::new();
    let n = gen.fixed(4u32);
    let region = gen.begin_loop(&n, &[]);
    let _ = region.carried_pin(0);
  }

  #[test]
  fn typed_wrappers() {
    let gen = Generator::new();
    let n = gen.fixed(16u32);
    let acc = gen.fixed(0.);
    let mut lp = gen.begin_loop1(&n, &acc);

    let bumped = lp.value() + 2.;
    lp.set_value(&bumped).unwrap();
    assert_eq!(lp.value().pin(), bumped.pin());
    lp.end().unwrap();
    assert!(lp.is_closed());
  }
}
