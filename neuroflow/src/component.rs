//! Computational components.
//!
//! # Component trait
//!
//! Every computation must implement the [`Component`] trait, which only
//! requires a [`fire()`](Component::fire) method. Components never see ports:
//! `fire` reads the values captured by the last input phase and writes states
//! and results through a [`Context`].
//!
//! A component is turned into a port-bearing unit by wrapping it in a
//! [`ComponentRef`], a shared handle which owns the ports, the caches and the
//! timing parameters, and which drives the three-phase execution cycle:
//!
//! 1. [`input(t)`](ComponentRef::input) synchronizes every in-port and
//!    captures a copy of its buffer,
//! 2. [`fire()`](ComponentRef::fire) runs the computation,
//! 3. [`output(t)`](ComponentRef::output) publishes every result to the
//!    out-port of the same name.
//!
//! Input and output timestamps are independently required to never decrease.
//!
//! #### Example
//!
//! A component that doubles its input.
//!
//! ```
//! use neuroflow::component::{Component, ComponentRef, Context};
//! use neuroflow::ports::Value;
//! use neuroflow::unit::Unit;
//! use neuroflow::Error;
//!
//! pub struct Doubler;
//!
//! impl Component for Doubler {
//!     fn fire(&mut self, ctx: &mut Context<'_>) -> Result<(), Error> {
//!         let doubled: Value = ctx.input("in")?.iter().map(|x| 2.0 * x).collect();
//!         ctx.set_result("out", doubled);
//!
//!         Ok(())
//!     }
//! }
//!
//! let doubler = ComponentRef::new(Doubler);
//! doubler.make_in_port("in", 2);
//! doubler.make_out_port("out", 2);
//! doubler.get_in_port("in").unwrap().set_buffer(Value::from([1.0, 2.0])).unwrap();
//!
//! doubler.input(0).unwrap();
//! doubler.fire().unwrap();
//! doubler.output(0).unwrap();
//!
//! assert_eq!(doubler.get_out_port("out").unwrap().buffer(), Value::from([2.0, 4.0]));
//! ```

mod builtin;
mod context;
mod dictionary;
mod gate;
mod set;

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CacheKind, Error};
use crate::ports::{Port, Value};
use crate::time::Time;
use crate::unit::{Ports, Unit};

pub use builtin::{ConstantComponent, NullComponent, PipeComponent};
pub use context::Context;
pub use dictionary::Dictionary;
pub use gate::{TokenGate, TOKEN_IN, TOKEN_OUT};
pub use set::ComponentSet;

/// Trait to be implemented by all computations.
///
/// Only [`fire()`](Component::fire) is required. The
/// [`train()`](Component::train) hook is called by the schedulers right
/// before each `fire`, and [`reset()`](Component::reset) is called when the
/// owning [`ComponentRef`] is reset.
pub trait Component: 'static {
    /// Computes results and new states from the captured inputs and the
    /// current states.
    fn fire(&mut self, ctx: &mut Context<'_>) -> Result<(), Error>;

    /// Updates learned parameters.
    ///
    /// The default implementation does nothing.
    fn train(&mut self, ctx: &mut Context<'_>) -> Result<(), Error> {
        let _ = ctx;

        Ok(())
    }

    /// Resets internal state that is not held in the component's states.
    ///
    /// The default implementation does nothing.
    fn reset(&mut self) {}
}

/// Default interval of a component.
pub const DEFAULT_INTERVAL: Time = 1000;

/// Timing parameters used by the event-driven scheduler.
///
/// A component with offset `o`, interval `i` and sleep `s` captures its
/// inputs and fires at `o`, publishes the results of this activation at
/// `o + i`, activates again at `o + i + s`, and so on with a period of
/// `i + s`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timing {
    /// Time of the first activation.
    pub offset: Time,
    /// Delay between an activation and the publication of its results.
    pub interval: Time,
    /// Delay between a publication and the next activation.
    pub sleep: Time,
}

impl Timing {
    /// Creates timing parameters.
    pub const fn new(offset: Time, interval: Time, sleep: Time) -> Self {
        Self {
            offset,
            interval,
            sleep,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(0, DEFAULT_INTERVAL, 0)
    }
}

/// A shared handle to a component and its ports, caches and timing.
///
/// `ComponentRef`s are clonable. Their clones are shallow copies, which is
/// how a same component can be registered in a module and driven by a
/// scheduler.
#[derive(Clone)]
pub struct ComponentRef {
    inner: Rc<RefCell<ComponentState>>,
}

struct ComponentState {
    ports: Ports,
    inputs: Dictionary,
    states: Dictionary,
    results: Dictionary,
    timing: Timing,
    last_input_time: Time,
    last_output_time: Time,
    behavior: Box<dyn Component>,
}

impl ComponentState {
    fn context_and_behavior(&mut self) -> (Context<'_>, &mut dyn Component) {
        let ctx = Context::new(
            &self.inputs,
            &mut self.states,
            &mut self.results,
            self.last_input_time,
            self.last_output_time,
        );

        (ctx, self.behavior.as_mut())
    }
}

impl ComponentRef {
    /// Wraps a component without ports, with empty caches and default timing.
    pub fn new<C: Component>(component: C) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ComponentState {
                ports: Ports::new(),
                inputs: Dictionary::new(CacheKind::Inputs),
                states: Dictionary::new(CacheKind::States),
                results: Dictionary::new(CacheKind::Results),
                timing: Timing::default(),
                last_input_time: 0,
                last_output_time: 0,
                behavior: Box::new(component),
            })),
        }
    }

    /// Synchronizes every in-port and captures a copy of its buffer in the
    /// inputs cache.
    ///
    /// An error is returned if `time` is older than the time of the previous
    /// input phase, in which case nothing is captured.
    pub fn input(&self, time: Time) -> Result<(), Error> {
        let in_ports: Vec<(String, Port)> = {
            let state = self.inner.borrow();
            if time < state.last_input_time {
                return Err(Error::InputTimeTravel {
                    time,
                    last: state.last_input_time,
                });
            }
            state
                .ports
                .in_ports()
                .iter()
                .map(|(name, port)| (name.clone(), port.clone()))
                .collect()
        };

        // No borrow is held while synchronizing since callbacks may query
        // this component.
        for (_, port) in &in_ports {
            port.sync();
        }

        let mut state = self.inner.borrow_mut();
        for (name, port) in in_ports {
            state.inputs.insert(name, port.buffer());
        }
        state.last_input_time = time;

        Ok(())
    }

    /// Runs the computation of the component.
    pub fn fire(&self) -> Result<(), Error> {
        let mut state = self.inner.borrow_mut();
        let (mut ctx, behavior) = state.context_and_behavior();

        behavior.fire(&mut ctx)
    }

    /// Runs the training hook of the component.
    pub fn train(&self) -> Result<(), Error> {
        let mut state = self.inner.borrow_mut();
        let (mut ctx, behavior) = state.context_and_behavior();

        behavior.train(&mut ctx)
    }

    /// Copies every result into the out-port of the same name and invokes the
    /// callbacks of these ports.
    ///
    /// Results without a matching out-port are ignored and out-ports without
    /// a matching result are left untouched. An error is returned if `time`
    /// is older than the time of the previous output phase or if a result
    /// does not have the length of its port, in which case nothing is
    /// published.
    pub fn output(&self, time: Time) -> Result<(), Error> {
        let updates: Vec<(Port, Value)> = {
            let mut state = self.inner.borrow_mut();
            if time < state.last_output_time {
                return Err(Error::OutputTimeTravel {
                    time,
                    last: state.last_output_time,
                });
            }
            let mut updates = Vec::new();
            for (name, port) in state.ports.out_ports() {
                if let Ok(value) = state.results.get(name) {
                    if value.len() != port.len() {
                        return Err(Error::LengthMismatch {
                            expected: port.len(),
                            actual: value.len(),
                        });
                    }
                    updates.push((port.clone(), value.clone()));
                }
            }
            state.last_output_time = time;

            updates
        };

        for (port, value) in updates {
            port.set_buffer(value)?;
        }

        Ok(())
    }

    /// Resets the timing of the component.
    ///
    /// The last input and output times and the offset are set to 0 and the
    /// interval to its default value. The sleep, the states and the results
    /// are preserved. The [`reset()`](Component::reset) hook is called last.
    pub fn reset(&self) {
        let mut state = self.inner.borrow_mut();
        state.last_input_time = 0;
        state.last_output_time = 0;
        state.timing.offset = 0;
        state.timing.interval = DEFAULT_INTERVAL;
        state.behavior.reset();
    }

    /// Stores a copy of the value as the named state.
    pub fn set_state(&self, name: impl Into<String>, value: Value) {
        self.inner.borrow_mut().states.insert(name, value);
    }

    /// Returns a copy of the named state.
    pub fn get_state(&self, name: &str) -> Result<Value, Error> {
        self.inner.borrow().states.get(name).cloned()
    }

    /// Removes the named state.
    pub fn clear_state(&self, name: &str) -> Result<Value, Error> {
        self.inner.borrow_mut().states.remove(name)
    }

    /// Stores a copy of the value as the named result.
    pub fn set_result(&self, name: impl Into<String>, value: Value) {
        self.inner.borrow_mut().results.insert(name, value);
    }

    /// Returns a copy of the named result.
    pub fn get_result(&self, name: &str) -> Result<Value, Error> {
        self.inner.borrow().results.get(name).cloned()
    }

    /// Removes the named result.
    pub fn clear_result(&self, name: &str) -> Result<Value, Error> {
        self.inner.borrow_mut().results.remove(name)
    }

    /// Returns a copy of the value captured from the named in-port.
    pub fn get_input(&self, name: &str) -> Result<Value, Error> {
        self.inner.borrow().inputs.get(name).cloned()
    }

    /// Returns the timing parameters.
    pub fn timing(&self) -> Timing {
        self.inner.borrow().timing
    }

    /// Sets the timing parameters.
    ///
    /// The event-driven scheduler reads the interval and sleep each time it
    /// reschedules the component, while the offset only matters when the
    /// component is first scheduled.
    pub fn set_timing(&self, timing: Timing) {
        self.inner.borrow_mut().timing = timing;
    }

    /// Returns the time of the last input phase.
    pub fn last_input_time(&self) -> Time {
        self.inner.borrow().last_input_time
    }

    /// Returns the time of the last output phase.
    pub fn last_output_time(&self) -> Time {
        self.inner.borrow().last_output_time
    }

    /// Returns `true` if both handles refer to the same component.
    pub fn ptr_eq(&self, other: &ComponentRef) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns an address identifying the component.
    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }
}

impl Unit for ComponentRef {
    fn ports(&self) -> Ref<'_, Ports> {
        Ref::map(self.inner.borrow(), |state| &state.ports)
    }

    fn ports_mut(&self) -> RefMut<'_, Ports> {
        RefMut::map(self.inner.borrow_mut(), |state| &mut state.ports)
    }
}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(state) => f
                .debug_struct("ComponentRef")
                .field("ports", &state.ports)
                .field("timing", &state.timing)
                .field("last_input_time", &state.last_input_time)
                .field("last_output_time", &state.last_output_time)
                .finish_non_exhaustive(),
            Err(_) => f.write_str("ComponentRef { <borrowed> }"),
        }
    }
}
