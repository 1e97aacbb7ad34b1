use std::fmt;

use crate::error::Error;
use crate::ports::Value;
use crate::time::Time;

use super::Dictionary;

/// A local context for components.
///
/// A `Context` is handed to [`Component::fire()`](super::Component::fire)
/// and [`Component::train()`](super::Component::train). It gives read-only
/// access to the values captured by the last input phase and read-write
/// access to the states and results of the component. Ports are not
/// reachable from a context: results are only published to out-ports during
/// the output phase.
///
/// # Examples
///
/// A component that accumulates its input into a state and publishes the
/// running sum.
///
/// ```
/// use neuroflow::component::{Component, Context};
/// use neuroflow::Error;
///
/// pub struct Accumulator;
///
/// impl Component for Accumulator {
///     fn fire(&mut self, ctx: &mut Context<'_>) -> Result<(), Error> {
///         let x = ctx.input("in")?.clone();
///         let sum = ctx.state_mut("sum")?;
///         for (s, x) in sum.as_mut_slice().iter_mut().zip(x.iter()) {
///             *s += x;
///         }
///         let sum = sum.clone();
///         ctx.set_result("out", sum);
///
///         Ok(())
///     }
/// }
/// ```
pub struct Context<'a> {
    inputs: &'a Dictionary,
    states: &'a mut Dictionary,
    results: &'a mut Dictionary,
    last_input_time: Time,
    last_output_time: Time,
}

impl<'a> Context<'a> {
    /// Creates a new local context.
    pub(crate) fn new(
        inputs: &'a Dictionary,
        states: &'a mut Dictionary,
        results: &'a mut Dictionary,
        last_input_time: Time,
        last_output_time: Time,
    ) -> Self {
        Self {
            inputs,
            states,
            results,
            last_input_time,
            last_output_time,
        }
    }

    /// Returns the value captured from the named in-port.
    pub fn input(&self, name: &str) -> Result<&Value, Error> {
        self.inputs.get(name)
    }

    /// Returns the named state.
    pub fn state(&self, name: &str) -> Result<&Value, Error> {
        self.states.get(name)
    }

    /// Returns a mutable reference to the named state.
    pub fn state_mut(&mut self, name: &str) -> Result<&mut Value, Error> {
        self.states.get_mut(name)
    }

    /// Stores a state.
    pub fn set_state(&mut self, name: impl Into<String>, value: Value) {
        self.states.insert(name, value);
    }

    /// Returns the named result.
    pub fn result(&self, name: &str) -> Result<&Value, Error> {
        self.results.get(name)
    }

    /// Stores a result, to be published on the out-port of the same name
    /// during the next output phase.
    pub fn set_result(&mut self, name: impl Into<String>, value: Value) {
        self.results.insert(name, value);
    }

    /// Returns all captured inputs.
    pub fn inputs(&self) -> &Dictionary {
        self.inputs
    }

    /// Returns all states.
    pub fn states(&self) -> &Dictionary {
        self.states
    }

    /// Returns all states for modification.
    pub fn states_mut(&mut self) -> &mut Dictionary {
        self.states
    }

    /// Returns all results.
    pub fn results(&self) -> &Dictionary {
        self.results
    }

    /// Returns all results for modification.
    pub fn results_mut(&mut self) -> &mut Dictionary {
        self.results
    }

    /// Returns the time of the last input phase.
    pub fn last_input_time(&self) -> Time {
        self.last_input_time
    }

    /// Returns the time of the last output phase.
    pub fn last_output_time(&self) -> Time {
        self.last_output_time
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("inputs", &self.inputs.len())
            .field("states", &self.states.len())
            .field("results", &self.results.len())
            .field("last_input_time", &self.last_input_time)
            .field("last_output_time", &self.last_output_time)
            .finish()
    }
}
