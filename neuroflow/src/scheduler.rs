//! Schedulers driving components through time.
//!
//! A scheduler owns a [`Snapshot`] of all components reachable from an
//! [`Agent`] and repeatedly runs their input, fire and output phases. Three
//! policies are provided:
//!
//! * [`VirtualTimeSyncScheduler`]: all components run in lockstep and the
//!   virtual time advances by a fixed interval at each step,
//! * [`VirtualTimeScheduler`]: each component runs at its own pace as
//!   configured by its [`Timing`](crate::component::Timing), driven by a
//!   queue of time-ordered events,
//! * [`RealTimeSyncScheduler`]: all components run in lockstep, with each
//!   step paced by a wall clock.
//!
//! Within one step, all input phases complete before any component fires,
//! and all components fire before any output phase. A value published by a
//! component is therefore only observed by a downstream component at its
//! next input phase.
//!
//! The snapshot is not refreshed automatically: after a structural edit of
//! the module tree, [`Scheduler::update()`] must be called for the edit to be
//! taken into account. [`Scheduler::is_stale()`] tells whether this is
//! needed.
//!
//! # Logging
//!
//! Each step is wrapped in a `step` span at the `DEBUG` level and each
//! component phase emits a `TRACE` event carrying the dotted path of the
//! component. Installing a subscriber is left to the application.
//!
//! # Examples
//!
//! A constant component feeding a pipe, one hop per step.
//!
//! ```
//! use neuroflow::component::{ComponentRef, ConstantComponent, PipeComponent};
//! use neuroflow::module::Agent;
//! use neuroflow::ports::Value;
//! use neuroflow::scheduler::{Scheduler, VirtualTimeSyncScheduler};
//! use neuroflow::unit::{connect, Unit};
//!
//! let source = ComponentRef::new(ConstantComponent);
//! source.make_out_port("out", 1);
//! source.set_state("out", Value::from([1.0]));
//!
//! let pipe = ComponentRef::new(PipeComponent::new().with_map("in", "out"));
//! pipe.make_in_port("in", 1);
//! pipe.make_out_port("out", 1);
//! connect((&source, "out"), (&pipe, "in")).unwrap();
//!
//! let agent = Agent::new();
//! agent.add_component("source", source).unwrap();
//! agent.add_component("pipe", pipe.clone()).unwrap();
//!
//! let mut scheduler = VirtualTimeSyncScheduler::new(&agent, 1);
//! assert_eq!(scheduler.step().unwrap(), 1);
//! assert!(pipe.get_out_port("out").unwrap().buffer().is_zero());
//! assert_eq!(scheduler.step().unwrap(), 2);
//! assert_eq!(pipe.get_out_port("out").unwrap().buffer(), Value::from([1.0]));
//! ```

mod real_time;
mod virtual_event;
mod virtual_sync;

use std::fmt;

use tracing::trace;

use crate::component::ComponentRef;
use crate::error::Error;
use crate::module::{Agent, Snapshot};
use crate::supervisor::{NullSupervisor, Supervisor};
use crate::time::Time;

pub use real_time::RealTimeSyncScheduler;
pub use virtual_event::VirtualTimeScheduler;
pub use virtual_sync::VirtualTimeSyncScheduler;

/// Operations common to all schedulers.
pub trait Scheduler {
    /// Takes a new snapshot of the components of the agent and returns it.
    fn update(&mut self) -> Result<Snapshot, Error>;

    /// Runs one scheduling step and returns the new current time.
    fn step(&mut self) -> Result<Time, Error>;

    /// Returns the current time.
    fn current_time(&self) -> Time;

    /// Returns the number of completed steps.
    fn num_steps(&self) -> u64;

    /// Zeroes the current time and the step count and forgets the snapshot.
    ///
    /// The scheduler does nothing until [`update()`](Scheduler::update) is
    /// called again. Components are not reset.
    fn reset(&mut self);

    /// Returns the snapshot of the components driven by the scheduler.
    fn snapshot(&self) -> &Snapshot;

    /// Returns the agent driven by the scheduler.
    fn agent(&self) -> &Agent;

    /// Returns `true` if the module tree of the agent changed since the last
    /// update.
    fn is_stale(&self) -> bool {
        self.snapshot().is_stale(self.agent())
    }
}

/// State shared by all scheduler policies.
pub(crate) struct SchedulerCore {
    pub(crate) agent: Agent,
    pub(crate) snapshot: Snapshot,
    pub(crate) supervisor: Box<dyn Supervisor>,
    pub(crate) current_time: Time,
    pub(crate) num_steps: u64,
}

impl SchedulerCore {
    pub(crate) fn new(agent: &Agent) -> Self {
        Self {
            agent: agent.clone(),
            snapshot: Snapshot::default(),
            supervisor: Box::new(NullSupervisor::new(agent)),
            current_time: 0,
            num_steps: 0,
        }
    }

    pub(crate) fn set_supervisor(&mut self, supervisor: impl Supervisor + 'static) {
        self.supervisor = Box::new(supervisor);
    }

    pub(crate) fn reset(&mut self) {
        self.current_time = 0;
        self.num_steps = 0;
        self.snapshot = Snapshot::default();
    }

    /// Runs the lockstep phases preceding the output phase: input for all,
    /// supervisor, then train and fire for all.
    pub(crate) fn input_and_fire(&mut self, time: Time) -> Result<(), Error> {
        input_all(&self.snapshot, time)?;
        self.supervisor.step()?;
        fire_all(&self.snapshot)
    }
}

impl fmt::Debug for SchedulerCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerCore")
            .field("components", &self.snapshot.len())
            .field("current_time", &self.current_time)
            .field("num_steps", &self.num_steps)
            .finish_non_exhaustive()
    }
}

pub(crate) fn input_all<'a>(
    entries: impl IntoIterator<Item = &'a (String, ComponentRef)>,
    time: Time,
) -> Result<(), Error> {
    for (path, component) in entries {
        trace!(component = %path, time, "input");
        component.input(time)?;
    }

    Ok(())
}

pub(crate) fn fire_all<'a>(
    entries: impl IntoIterator<Item = &'a (String, ComponentRef)>,
) -> Result<(), Error> {
    for (path, component) in entries {
        trace!(component = %path, "fire");
        component.train()?;
        component.fire()?;
    }

    Ok(())
}

pub(crate) fn output_all<'a>(
    entries: impl IntoIterator<Item = &'a (String, ComponentRef)>,
    time: Time,
) -> Result<(), Error> {
    for (path, component) in entries {
        trace!(component = %path, time, "output");
        component.output(time)?;
    }

    Ok(())
}
