//! End-to-end graph construction scenarios.

use pinweave::binder::{Binder, PinBinder};
use pinweave::graph::Generator;
use pinweave::op::{CompareFunc, ExpandPolicy, OpKind};
use pinweave::swizzle::{SwizzleAssign, Swizzlable};
use pinweave::sw;
use pinweave::types::{Dim, PinType, ScalarKind, M44, V2, V3, V4};

#[test]
fn vertex_transform() {
  let gen = Generator::new();
  let mvp = gen.uniform::<M44>("mvp");
  let position = gen.input::<V3<f32>>("position");

  let homogeneous: Binder<V4<f32>> = gen.expand(&position, ExpandPolicy::OnesAtLast);
  let clip = &homogeneous * &mvp;
  gen.output("clip_position", &clip);

  let nodes = gen.nodes();
  assert_eq!(nodes.len(), 5);
  assert_eq!(nodes[2].kind, OpKind::Expand(ExpandPolicy::OnesAtLast));
  assert_eq!(nodes[3].kind, OpKind::Mul);
  assert_eq!(nodes[3].inputs, vec![homogeneous.pin(), mvp.pin()]);
  assert_eq!(
    nodes[4].kind,
    OpKind::Output {
      name: "clip_position".to_owned()
    }
  );
  assert_eq!(nodes[4].inputs, vec![clip.pin()]);
}

#[test]
fn lambert_lighting_with_swizzle_write() {
  let gen = Generator::new();
  let normal = gen.input::<V3<f32>>("normal");
  let light_dir = gen.uniform::<V3<f32>>("light_dir");
  let base = gen.input::<V4<f32>>("base_color");

  let intensity = normal.dot(&light_dir);
  let lit = sw!(base, .x.y.z) * &intensity;

  let mut color = base.clone();
  color.set_swizzle(
    [
      pinweave::swizzle::SwizzleSelector::X,
      pinweave::swizzle::SwizzleSelector::Y,
      pinweave::swizzle::SwizzleSelector::Z,
    ],
    &lit,
  );
  gen.output("color", &color);

  // the proxy moved to the write node's output; the original pin is intact
  assert_ne!(color.pin(), base.pin());
  let write = gen.node(color.pin().node());
  assert_eq!(write.inputs, vec![base.pin(), lit.pin()]);
  assert_eq!(
    color.pin().ty(),
    PinType::Prim(ScalarKind::Float, Dim::D4)
  );
}

#[test]
fn conditional_select() {
  let gen = Generator::new();
  let height = gen.input::<f32>("height");
  let in_band = height.gt(0.) & height.lt(10.);
  let ground = gen.uniform::<V4<f32>>("ground_color");
  let sky = gen.uniform::<V4<f32>>("sky_color");

  let picked = gen.branch(&in_band, &ground, &sky);
  gen.output("color", &picked);

  let node = gen.node(picked.pin().node());
  assert_eq!(node.kind, OpKind::Branch);
  assert_eq!(node.inputs[0], in_band.pin());
  assert_eq!(gen.node(in_band.pin().node()).kind, OpKind::BitAnd);
  assert_eq!(
    gen.node(gen.node(in_band.pin().node()).inputs[0].node()).kind,
    OpKind::Compare(CompareFunc::Gt)
  );
}

#[test]
fn carried_accumulation_loop() {
  let gen = Generator::new();
  let n = gen.uniform::<u32>("step_count");
  let seed = gen.fixed(0.);

  let mut lp = gen.begin_loop1(&n, &seed);
  let entry = lp.entry();

  let folded = lp.value() * 0.5 + 1.;
  lp.set_value(&folded).unwrap();
  lp.end().unwrap();

  gen.output("accumulated", &lp.value());

  let entry_node = gen.node(entry);
  assert_eq!(entry_node.kind, OpKind::LoopEntry);
  assert_eq!(entry_node.inputs[0], n.pin());
  assert_eq!(
    entry_node.outputs[0],
    PinType::Prim(ScalarKind::UInt, Dim::Scalar)
  );

  // the exit consumed the reassigned slot, and so does the output
  let exit = gen
    .nodes()
    .into_iter()
    .find(|node| matches!(node.kind, OpKind::LoopExit { .. }))
    .unwrap();
  assert_eq!(exit.kind, OpKind::LoopExit { entry });
  assert_eq!(exit.inputs, vec![folded.pin()]);
  assert_eq!(lp.value().pin(), folded.pin());
}

#[test]
fn two_slot_integration_loop() {
  let gen = Generator::new();
  let n = gen.fixed(16u32);
  let position = gen.input::<V3<f32>>("position");
  let velocity = gen.input::<V3<f32>>("velocity");

  let mut lp = gen.begin_loop2(&n, &position, &velocity);
  let damped = lp.second() * 0.99;
  let moved = lp.first() + &damped;
  lp.set_first(&moved).unwrap();
  lp.set_second(&damped).unwrap();
  lp.end().unwrap();

  let exit = gen
    .nodes()
    .into_iter()
    .find(|node| matches!(node.kind, OpKind::LoopExit { .. }))
    .unwrap();
  assert_eq!(exit.inputs, vec![moved.pin(), damped.pin()]);
}

#[test]
fn indexed_array_update() {
  let gen = Generator::new();
  let i = gen.input::<u32>("index");
  let mut weights = gen.array::<f32>("weights", 10);
  let before = weights.pin();

  let blended = weights.at(2u32) * 2.0 + weights.at(0u32) * -4.0;
  weights.set_at(&i, &blended);

  assert_ne!(weights.pin(), before);
  assert_eq!(
    weights.pin().ty(),
    PinType::Array(ScalarKind::Float, Dim::Scalar, Some(10))
  );

  let write = gen.node(weights.pin().node());
  assert_eq!(write.kind, OpKind::ArrayWrite);
  assert_eq!(write.inputs, vec![before, i.pin(), blended.pin()]);

  let decl = gen.node(write.inputs[0].node());
  assert_eq!(
    decl.kind,
    OpKind::Uniform {
      name: "weights".to_owned(),
      ty: PinType::Array(ScalarKind::Float, Dim::Scalar, Some(10)),
    }
  );
}

#[test]
fn textured_fragment() {
  let gen = Generator::new();
  let albedo = gen.texture_2d::<V4<f32>>("albedo");
  let linear = gen.sampler("linear");
  let uv = gen.input::<V2<f32>>("uv");
  let tint = gen.uniform::<V4<f32>>("tint");

  let texel = albedo.sample(&linear, &uv);
  let color = &texel * &tint;
  gen.output("color", &color);

  let sample = gen.node(texel.pin().node());
  assert_eq!(sample.kind, OpKind::Sample);
  assert_eq!(sample.inputs, vec![albedo.pin(), linear.pin(), uv.pin()]);
  assert_eq!(texel.pin().ty(), PinType::Prim(ScalarKind::Float, Dim::D4));
}

#[test]
fn graph_is_the_call_trace() {
  let gen = Generator::new();
  let a = gen.input::<f32>("a");
  let b = &a + 1.;
  let c = &b * &b;
  let d = 2. - &c;

  let ids: Vec<_> = [&a, &b, &c, &d]
    .iter()
    .map(|binder| binder.pin().node())
    .collect();
  let mut sorted = ids.clone();
  sorted.sort();
  assert_eq!(ids, sorted);
  assert_eq!(gen.node_count(), 6);
}
