use std::time::Duration;

use tracing::{debug, debug_span, warn};

use crate::error::Error;
use crate::module::{Agent, Snapshot};
use crate::supervisor::Supervisor;
use crate::time::{to_millis, Clock, SyncStatus, SystemClock, Time};

use super::{output_all, Scheduler, SchedulerCore};

/// A scheduler running all components in lockstep, paced by a wall clock.
///
/// Each step captures the inputs of all components at the current clock
/// time, steps the supervisor and trains and fires all components. If this
/// took less than the interval, the scheduler then sleeps until one interval
/// has elapsed since the inputs were captured. The output phase of all
/// components finally runs at the clock time reached.
///
/// When the computation exceeds the interval, the step still completes
/// without sleeping and the scheduler reports it as
/// [`lagged`](RealTimeSyncScheduler::lagged) until the next step.
///
/// Time is measured in milliseconds since the reference instant of the clock.
/// The reported times are truncated to whole milliseconds, but the step is
/// paced from the exact instant at which the inputs were captured.
#[derive(Debug)]
pub struct RealTimeSyncScheduler<C: Clock = SystemClock> {
    core: SchedulerCore,
    clock: C,
    interval: Time,
    lagged: bool,
    last_input_time: Time,
    last_output_time: Time,
    last_spent: Time,
}

impl RealTimeSyncScheduler<SystemClock> {
    /// Creates a scheduler for the agent with a step period of `interval`
    /// milliseconds, using a system clock whose reference is the current
    /// instant.
    ///
    /// An error is returned if the interval is null.
    pub fn new(agent: &Agent, interval: Time) -> Result<Self, Error> {
        Self::with_clock(agent, interval, SystemClock::new())
    }
}

impl<C: Clock> RealTimeSyncScheduler<C> {
    /// Creates a scheduler for the agent with a step period of `interval`
    /// milliseconds, paced by the specified clock.
    ///
    /// The components of the agent are snapshotted immediately. An error is
    /// returned if the interval is null.
    pub fn with_clock(agent: &Agent, interval: Time, clock: C) -> Result<Self, Error> {
        if interval == 0 {
            return Err(Error::InvalidInterval(interval));
        }
        let mut core = SchedulerCore::new(agent);
        core.snapshot = agent.snapshot();

        Ok(Self {
            core,
            clock,
            interval,
            lagged: false,
            last_input_time: 0,
            last_output_time: 0,
            last_spent: 0,
        })
    }

    /// Returns the step period in milliseconds.
    pub fn interval(&self) -> Time {
        self.interval
    }

    /// Sets the step period in milliseconds.
    ///
    /// An error is returned and the period is left unchanged if the interval
    /// is null.
    pub fn set_interval(&mut self, interval: Time) -> Result<(), Error> {
        if interval == 0 {
            return Err(Error::InvalidInterval(interval));
        }
        self.interval = interval;

        Ok(())
    }

    /// Replaces the supervisor.
    pub fn set_supervisor(&mut self, supervisor: impl Supervisor + 'static) {
        self.core.set_supervisor(supervisor);
    }

    /// Returns `true` if the computation of the last step exceeded the
    /// interval, that is if [`last_spent()`](Self::last_spent) is greater than
    /// [`interval()`](Self::interval).
    pub fn lagged(&self) -> bool {
        self.lagged
    }

    /// Returns the clock time at which the inputs were last captured.
    pub fn last_input_time(&self) -> Time {
        self.last_input_time
    }

    /// Returns the clock time at which the outputs were last published.
    pub fn last_output_time(&self) -> Time {
        self.last_output_time
    }

    /// Returns the time spent computing during the last step, from input
    /// capture to the end of the fire phase.
    pub fn last_spent(&self) -> Time {
        self.last_spent
    }

    /// Returns the clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: Clock> Scheduler for RealTimeSyncScheduler<C> {
    fn update(&mut self) -> Result<Snapshot, Error> {
        self.core.snapshot = self.core.agent.snapshot();
        debug!(components = self.core.snapshot.len(), "update");

        Ok(self.core.snapshot.clone())
    }

    fn step(&mut self) -> Result<Time, Error> {
        let input_instant = self.clock.elapsed();
        self.last_input_time = to_millis(input_instant);
        let _span = debug_span!(
            "step",
            scheduler = "real_time",
            time = self.last_input_time
        )
        .entered();

        self.core.input_and_fire(self.last_input_time)?;
        self.last_spent = to_millis(self.clock.elapsed().saturating_sub(input_instant));
        self.lagged = self.last_spent > self.interval;

        let deadline = input_instant.saturating_add(Duration::from_millis(self.interval));
        match self.clock.synchronize(deadline) {
            SyncStatus::OutOfSync(lag) if self.lagged => warn!(
                lag = ?lag,
                interval = self.interval,
                spent = self.last_spent,
                "step exceeded its interval"
            ),
            _ => {}
        }

        self.last_output_time = self.clock.now();
        output_all(&self.core.snapshot, self.last_output_time)?;
        self.core.current_time = self.last_output_time;
        self.core.num_steps += 1;

        Ok(self.core.current_time)
    }

    fn current_time(&self) -> Time {
        self.core.current_time
    }

    fn num_steps(&self) -> u64 {
        self.core.num_steps
    }

    /// Zeroes the current time and the step count and forgets the snapshot.
    ///
    /// The interval is kept.
    fn reset(&mut self) {
        self.core.reset();
        self.lagged = false;
        self.last_input_time = 0;
        self.last_output_time = 0;
        self.last_spent = 0;
    }

    fn snapshot(&self) -> &Snapshot {
        &self.core.snapshot
    }

    fn agent(&self) -> &Agent {
        &self.core.agent
    }
}
