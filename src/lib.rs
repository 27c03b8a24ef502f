//! Pinweave, a shader graph EDSL in vanilla Rust.
//!
//! This crate provides an [EDSL] to author shaders as plain Rust expressions, leveraging the Rust compiler (`rustc`)
//! and its type system to ensure soundness and typing. Writing `&a * &b + 1.` does not compute anything: it appends
//! operation nodes to a graph-shaped intermediate representation, which a backend (out of scope here) later lowers to
//! an actual shading language or bytecode. Because the shader is ordinary Rust, it is checked by `rustc`, refactored
//! with regular tooling, and composed with regular functions.
//!
//! # How it works
//!
//! Everything starts with a [`Generator`](graph::Generator), a cheap handle over one growing graph. Generator entry
//! points ([`fixed`](graph::Generator::fixed), [`input`](graph::Generator::input),
//! [`uniform`](graph::Generator::uniform), …) hand back [`Binder`](binder::Binder)s: typed proxies over a single
//! output pin of a node. Operator overloads on binders append nodes and return new binders, so building an expression
//! tree in Rust *is* building the graph. Raw literals mixed into expressions are promoted to constant nodes
//! automatically.
//!
//! ```
//! use pinweave::graph::Generator;
//! use pinweave::types::{M44, V3, V4};
//!
//! let gen = Generator::new();
//! let mvp = gen.uniform::<M44>("mvp");
//! let position = gen.input::<V3<f32>>("position");
//! let clip = &gen.expand::<_, V4<f32>>(&position, pinweave::op::ExpandPolicy::OnesAtLast) * &mvp;
//! gen.output("clip_position", &clip);
//! ```
//!
//! Three rules shape the whole DSL:
//!
//! - Nodes are append-only and created in call order; the graph a backend receives is the trace of the Rust
//!   expressions that built it.
//! - Pins only combine under the generator that minted them. Generators compare by identity
//!   ([`Generator::same`](graph::Generator::same)), and mixing two of them panics: it is a programming error, not a
//!   runtime condition.
//! - Binders are typed; overloads only exist for combinations the operation catalog supports, so most misuse fails to
//!   compile rather than at graph-build time.
//!
//! Construction is single-threaded: generators are neither `Send` nor `Sync`.
//!
//! [EDSL]: https://en.wikipedia.org/wiki/Domain-specific_language#Embedded_domain-specific_languages

pub mod arith;
pub mod array;
pub mod binder;
pub mod error;
pub mod graph;
pub mod op;
pub mod pin;
pub mod region;
pub mod swizzle;
pub mod texture;
pub mod types;
