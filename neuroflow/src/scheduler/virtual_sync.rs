use tracing::{debug, debug_span};

use crate::error::Error;
use crate::module::{Agent, Snapshot};
use crate::supervisor::Supervisor;
use crate::time::Time;

use super::{output_all, Scheduler, SchedulerCore};

/// A scheduler running all components in lockstep over a virtual time.
///
/// Each step captures the inputs of all components at the current time,
/// steps the supervisor, trains and fires all components, advances the
/// current time by the interval and finally runs the output phase of all
/// components at the new current time.
///
/// A value therefore crosses exactly one connection per step: along a chain
/// of components linked by connections, a value published by the first
/// component reaches the `k`-th downstream component after `k` steps.
#[derive(Debug)]
pub struct VirtualTimeSyncScheduler {
    core: SchedulerCore,
    interval: Time,
}

impl VirtualTimeSyncScheduler {
    /// Creates a scheduler for the agent, advancing the time by `interval` at
    /// each step.
    ///
    /// The components of the agent are snapshotted immediately.
    pub fn new(agent: &Agent, interval: Time) -> Self {
        let mut scheduler = Self {
            core: SchedulerCore::new(agent),
            interval,
        };
        scheduler.core.snapshot = agent.snapshot();

        scheduler
    }

    /// Returns the time increment of each step.
    pub fn interval(&self) -> Time {
        self.interval
    }

    /// Sets the time increment of each step.
    pub fn set_interval(&mut self, interval: Time) {
        self.interval = interval;
    }

    /// Replaces the supervisor.
    pub fn set_supervisor(&mut self, supervisor: impl Supervisor + 'static) {
        self.core.set_supervisor(supervisor);
    }
}

impl Scheduler for VirtualTimeSyncScheduler {
    fn update(&mut self) -> Result<Snapshot, Error> {
        self.core.snapshot = self.core.agent.snapshot();
        debug!(components = self.core.snapshot.len(), "update");

        Ok(self.core.snapshot.clone())
    }

    /// Runs one lockstep cycle and returns the new current time.
    ///
    /// An error is returned and nothing is run if advancing the time by the
    /// interval would overflow.
    fn step(&mut self) -> Result<Time, Error> {
        let next_time = self
            .core
            .current_time
            .checked_add(self.interval)
            .ok_or(Error::TimeOverflow {
                time: self.core.current_time,
                delta: self.interval,
            })?;
        let _span = debug_span!(
            "step",
            scheduler = "virtual_sync",
            time = self.core.current_time
        )
        .entered();

        self.core.input_and_fire(self.core.current_time)?;
        self.core.current_time = next_time;
        output_all(&self.core.snapshot, self.core.current_time)?;
        self.core.num_steps += 1;

        Ok(self.core.current_time)
    }

    fn current_time(&self) -> Time {
        self.core.current_time
    }

    fn num_steps(&self) -> u64 {
        self.core.num_steps
    }

    fn reset(&mut self) {
        self.core.reset();
    }

    fn snapshot(&self) -> &Snapshot {
        &self.core.snapshot
    }

    fn agent(&self) -> &Agent {
        &self.core.agent
    }
}
