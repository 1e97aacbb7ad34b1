//! Per-step coordination hooks.
//!
//! A [`Supervisor`] is stepped by every scheduler once per scheduling cycle,
//! after the input phase and before any component is trained or fired. It
//! is the place to coordinate training across components, for instance by
//! adjusting their states from a global view of the captured inputs.
//!
//! Closures returning a `Result<(), Error>` implement `Supervisor`.
//!
//! # Examples
//!
//! A supervisor counting scheduling cycles.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use neuroflow::module::Agent;
//! use neuroflow::scheduler::{Scheduler, VirtualTimeSyncScheduler};
//!
//! let agent = Agent::new();
//! let cycles = Rc::new(Cell::new(0));
//! let counter = cycles.clone();
//!
//! let mut scheduler = VirtualTimeSyncScheduler::new(&agent, 1);
//! scheduler.set_supervisor(move || {
//!     counter.set(counter.get() + 1);
//!     Ok(())
//! });
//! scheduler.step().unwrap();
//! scheduler.step().unwrap();
//!
//! assert_eq!(cycles.get(), 2);
//! ```

use crate::error::Error;
use crate::module::{Agent, Snapshot};

/// A hook stepped once per scheduling cycle, before firing.
pub trait Supervisor {
    /// Performs the coordination work of one scheduling cycle.
    fn step(&mut self) -> Result<(), Error>;
}

impl<F> Supervisor for F
where
    F: FnMut() -> Result<(), Error>,
{
    fn step(&mut self) -> Result<(), Error> {
        self()
    }
}

/// A supervisor that does nothing.
///
/// Like any supervisor built for an agent, it holds the agent and a snapshot
/// of its components taken at construction. The snapshot is never refreshed.
#[derive(Clone, Debug)]
pub struct NullSupervisor {
    agent: Agent,
    components: Snapshot,
}

impl NullSupervisor {
    /// Creates a supervisor for the agent.
    pub fn new(agent: &Agent) -> Self {
        Self {
            agent: agent.clone(),
            components: agent.snapshot(),
        }
    }

    /// Returns the supervised agent.
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Returns the components snapshot taken at construction.
    pub fn components(&self) -> &Snapshot {
        &self.components
    }
}

impl Supervisor for NullSupervisor {
    fn step(&mut self) -> Result<(), Error> {
        Ok(())
    }
}
