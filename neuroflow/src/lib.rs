//! A discrete-event runtime for hierarchical dataflow components.
//!
//! Neuroflow lets you assemble a computation out of small stateful
//! _components_ exchanging fixed-length numeric vectors through _ports_, group
//! them into nested _modules_, and drive the whole tree with a _scheduler_
//! over either virtual or wall-clock time.
//!
//! The architecture resembles [flow-based programming][FBP]: a component is
//! an isolated entity with a set of named in-ports and out-ports, and values
//! only travel along connections defined while the agent is being assembled.
//! Components never see the value of a port directly while computing. They
//! work on private caches that are filled by an _input_ phase and drained by
//! an _output_ phase, so that all components observe a consistent view of the
//! world within a scheduling step.
//!
//! [FBP]: https://en.wikipedia.org/wiki/Flow-based_programming
//!
//! # A practical overview
//!
//! Running a computation typically involves three distinct activities:
//!
//! 1. the design of components implementing the computation steps,
//! 2. the assembly of an agent, performed by grouping components into modules
//!    and inter-connecting their ports,
//! 3. the execution of the agent by a scheduler.
//!
//! ## Authoring components
//!
//! A component behavior implements the [`Component`](component::Component)
//! trait. Its [`fire()`](component::Component::fire) method reads the inputs
//! captured during the last input phase and writes results through a
//! [`Context`](component::Context). Results are published on the out-ports of
//! the same name at the next output phase. Optional
//! [`train()`](component::Component::train) and
//! [`reset()`](component::Component::reset) hooks complete the lifecycle.
//!
//! Ready-made behaviors cover the most common needs: a
//! [`ConstantComponent`](component::ConstantComponent) publishes its states,
//! a [`PipeComponent`](component::PipeComponent) forwards inputs to outputs
//! and a [`NullComponent`](component::NullComponent) does nothing at all.
//!
//! ```
//! use neuroflow::component::{Component, Context};
//! use neuroflow::Error;
//!
//! /// Publishes the sum of its two inputs.
//! struct Adder;
//!
//! impl Component for Adder {
//!     fn fire(&mut self, ctx: &mut Context<'_>) -> Result<(), Error> {
//!         let sum: Vec<f64> = ctx
//!             .input("a")?
//!             .iter()
//!             .zip(ctx.input("b")?.iter())
//!             .map(|(a, b)| a + b)
//!             .collect();
//!         ctx.set_result("sum", sum.into());
//!
//!         Ok(())
//!     }
//! }
//! ```
//!
//! ## Assembling an agent
//!
//! A behavior is wrapped into a [`ComponentRef`](component::ComponentRef),
//! a shared handle that owns its ports and caches. Ports are created with a
//! fixed length and connected from a source out-port to a destination
//! in-port. Components are then registered into a [`Module`](module::Module)
//! tree whose root is called the agent.
//!
//! Modules have ports of their own. Aliasing a component port onto a module
//! port lets a module expose the ports of its content, so that connections
//! can be made between modules rather than between components.
//!
//! ```
//! use neuroflow::component::{ComponentRef, ConstantComponent, PipeComponent};
//! use neuroflow::module::{Agent, Module};
//! use neuroflow::ports::Value;
//! use neuroflow::unit::{alias_out_port, connect, Unit};
//!
//! let constant = ComponentRef::new(ConstantComponent);
//! constant.make_out_port("out", 2);
//! constant.set_state("out", Value::from([1.0, 2.0]));
//!
//! // A module exposing the output of its constant.
//! let sensor = Module::new();
//! sensor.make_out_port("out", 2);
//! alias_out_port((&sensor, "out"), (&constant, "out")).unwrap();
//! sensor.add_component("constant", constant).unwrap();
//!
//! let pipe = ComponentRef::new(PipeComponent::new().with_map("in", "out"));
//! pipe.make_in_port("in", 2);
//! pipe.make_out_port("out", 2);
//! connect((&sensor, "out"), (&pipe, "in")).unwrap();
//!
//! let agent = Agent::new();
//! agent.add_submodule("sensor", sensor).unwrap();
//! agent.add_component("pipe", pipe).unwrap();
//!
//! assert_eq!(agent.get_all_components().len(), 2);
//! ```
//!
//! ## Running an agent
//!
//! Three scheduling policies are available in the [`scheduler`] module. The
//! snapshot of components a scheduler drives is taken at construction and
//! only refreshed by [`update()`](scheduler::Scheduler::update).
//!
//! ```
//! use neuroflow::component::{ComponentRef, ConstantComponent, PipeComponent};
//! use neuroflow::module::Agent;
//! use neuroflow::ports::Value;
//! use neuroflow::scheduler::{Scheduler, VirtualTimeSyncScheduler};
//! use neuroflow::unit::{connect, Unit};
//!
//! let constant = ComponentRef::new(ConstantComponent);
//! constant.make_out_port("out", 1);
//! constant.set_state("out", Value::from([3.0]));
//! let pipe = ComponentRef::new(PipeComponent::new().with_map("in", "out"));
//! pipe.make_in_port("in", 1);
//! pipe.make_out_port("out", 1);
//! connect((&constant, "out"), (&pipe, "in")).unwrap();
//!
//! let agent = Agent::new();
//! agent.add_component("constant", constant).unwrap();
//! agent.add_component("pipe", pipe.clone()).unwrap();
//!
//! let mut scheduler = VirtualTimeSyncScheduler::new(&agent, 1);
//! for _ in 0..2 {
//!     scheduler.step().unwrap();
//! }
//! assert_eq!(pipe.get_out_port("out").unwrap().buffer(), Value::from([3.0]));
//! ```
//!
//! # Ordering guarantees
//!
//! Within a scheduling step, all input phases complete before any component
//! is trained or fired, and all components fire before any output phase. A
//! value published in a step is thus observed downstream at the next input
//! phase, never in the same step. Components are visited in the order of
//! their dotted paths within each module, a module's own components before
//! those of its submodules.
//!
//! The only exception is the [`ComponentSet`](component::ComponentSet), which
//! runs its members to completion one after the other by priority within a
//! single activation.
//!
//! # Modules documentation
//!
//! * the [`ports`] module discusses connections, lazy pulls and callbacks,
//! * the [`unit`] module discusses port aliasing and its ordering
//!   constraint,
//! * the [`component`] module details the component lifecycle and timing,
//! * the [`scheduler`] module compares the scheduling policies,
//! * the [`time`] module describes the clocks used by the real-time
//!   scheduler.
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod component;
pub mod error;
pub mod module;
pub mod ports;
pub mod scheduler;
pub mod supervisor;
pub mod time;
pub mod unit;
pub(crate) mod util;

pub use error::Error;
