use std::collections::HashMap;
use std::fmt;

use tracing::{debug, debug_span, trace};

use crate::component::ComponentRef;
use crate::error::Error;
use crate::module::{Agent, Snapshot};
use crate::supervisor::Supervisor;
use crate::time::Time;
use crate::util::priority_queue::PriorityQueue;

use super::{fire_all, input_all, output_all, Scheduler, SchedulerCore};

/// The kind of a scheduled event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum EventKind {
    /// The results of the last activation are due for publication.
    Fire,
    /// The component is due for activation.
    Quiesce,
}

/// An event targeting the component at `slot` in the snapshot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Event {
    slot: usize,
    kind: EventKind,
}

/// A scheduler running each component at its own pace over a virtual time.
///
/// Each component follows its own [`Timing`](crate::component::Timing): it
/// is activated (inputs captured, then trained and fired) at its offset,
/// publishes the results of this activation `interval` later, is activated
/// again `sleep` after publishing, and so on.
///
/// All events falling on a same time `t` are processed as one batch: the
/// components due for publication run their output phase at `t`, then the
/// components due for activation run their input phase at `t`, the
/// supervisor is stepped, and the activated components are trained and
/// fired. Events scheduled for the same time are dequeued in the order they
/// were scheduled.
///
/// An event that would fall beyond [`Time::MAX`] is never scheduled, so a
/// component whose next publication or activation overflows the time range
/// simply stops.
///
/// The timings of all components are checked before a batch starts, so a
/// [`ZeroPeriod`](Error::ZeroPeriod) error leaves the scheduler untouched.
/// Any other error raised during a batch leaves it partially processed, and
/// the scheduler should then be [reset](Scheduler::reset).
///
/// # Examples
///
/// ```
/// use neuroflow::component::{ComponentRef, ConstantComponent, Timing};
/// use neuroflow::module::Agent;
/// use neuroflow::ports::Value;
/// use neuroflow::scheduler::VirtualTimeScheduler;
/// use neuroflow::unit::Unit;
///
/// let constant = ComponentRef::new(ConstantComponent);
/// constant.make_out_port("out", 1);
/// constant.set_state("out", Value::from([1.0]));
/// constant.set_timing(Timing::new(2, 5, 0));
///
/// let agent = Agent::new();
/// agent.add_component("constant", constant.clone()).unwrap();
///
/// let mut scheduler = VirtualTimeScheduler::new(&agent).unwrap();
/// assert_eq!(scheduler.step_by(0).unwrap(), 2); // activation
/// assert!(constant.get_out_port("out").unwrap().buffer().is_zero());
/// assert_eq!(scheduler.step_by(0).unwrap(), 7); // publication and activation
/// assert_eq!(constant.get_out_port("out").unwrap().buffer(), Value::from([1.0]));
/// ```
pub struct VirtualTimeScheduler {
    core: SchedulerCore,
    queue: PriorityQueue<Time, Event>,
}

impl VirtualTimeScheduler {
    /// Creates a scheduler for the agent and schedules the first activation
    /// of each component at its offset.
    ///
    /// An error is returned if a component has both a null interval and a
    /// null sleep.
    pub fn new(agent: &Agent) -> Result<Self, Error> {
        let mut scheduler = Self {
            core: SchedulerCore::new(agent),
            queue: PriorityQueue::new(),
        };
        scheduler.update()?;

        Ok(scheduler)
    }

    /// Replaces the supervisor.
    pub fn set_supervisor(&mut self, supervisor: impl Supervisor + 'static) {
        self.core.set_supervisor(supervisor);
    }

    /// Returns the time of the next scheduled event, if any.
    pub fn next_event_time(&self) -> Option<Time> {
        self.queue.peek_key().copied()
    }

    /// Returns `true` if at least one event is scheduled.
    pub fn has_pending_events(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Advances the time by the specified quantum, processing all events
    /// scheduled up to the target time, and returns the target time.
    ///
    /// The current time upon completion is the target time whether or not an
    /// event was scheduled for that time. A null quantum is equivalent to
    /// [`step()`](Scheduler::step).
    pub fn step_by(&mut self, quantum: Time) -> Result<Time, Error> {
        if quantum == 0 {
            return self.step();
        }
        let target_time = self
            .core
            .current_time
            .checked_add(quantum)
            .ok_or(Error::TimeOverflow {
                time: self.core.current_time,
                delta: quantum,
            })?;
        let _span = debug_span!(
            "step",
            scheduler = "virtual_event",
            time = target_time
        )
        .entered();

        while let Some(time) = self.next_event_time() {
            if time > target_time {
                break;
            }
            self.process_batch(time)?;
        }
        self.core.current_time = target_time;
        self.core.num_steps += 1;

        Ok(target_time)
    }

    /// Checks that no component has a null activation period.
    fn check_timings(snapshot: &Snapshot) -> Result<(), Error> {
        for (path, component) in snapshot {
            let timing = component.timing();
            if timing.interval == 0 && timing.sleep == 0 {
                return Err(Error::ZeroPeriod {
                    component: path.clone(),
                });
            }
        }

        Ok(())
    }

    /// Schedules an event `delay` after `time`, unless it would overflow.
    fn schedule(&mut self, time: Time, delay: Time, event: Event) {
        match time.checked_add(delay) {
            Some(time) => self.queue.insert(time, event),
            None => debug!(
                slot = event.slot,
                kind = ?event.kind,
                "event beyond the time range dropped"
            ),
        }
    }

    /// Advances the current time to `time` and processes all events scheduled
    /// at `time`, including those scheduled at `time` while the batch is
    /// being drained.
    ///
    /// The timings are checked beforehand, since they may have been edited
    /// since the last update.
    fn process_batch(&mut self, time: Time) -> Result<(), Error> {
        Self::check_timings(&self.core.snapshot)?;
        self.core.current_time = time;

        let snapshot = self.core.snapshot.clone();
        let entries = snapshot.as_slice();
        let mut outputs = Vec::new();
        let mut inputs = Vec::new();

        while self.queue.peek_key() == Some(&time) {
            let Some((_, event)) = self.queue.pull() else {
                break;
            };
            let Some(entry) = entries.get(event.slot) else {
                continue;
            };
            let timing = entry.1.timing();

            match event.kind {
                EventKind::Fire => {
                    outputs.push(entry);
                    self.schedule(
                        time,
                        timing.sleep,
                        Event {
                            slot: event.slot,
                            kind: EventKind::Quiesce,
                        },
                    );
                }
                EventKind::Quiesce => {
                    inputs.push(entry);
                    self.schedule(
                        time,
                        timing.interval,
                        Event {
                            slot: event.slot,
                            kind: EventKind::Fire,
                        },
                    );
                }
            }
        }
        trace!(
            time,
            outputs = outputs.len(),
            inputs = inputs.len(),
            "batch"
        );

        output_all(outputs.iter().copied(), time)?;
        input_all(inputs.iter().copied(), time)?;
        self.core.supervisor.step()?;
        fire_all(inputs.iter().copied())
    }
}

impl Scheduler for VirtualTimeScheduler {
    /// Takes a new snapshot of the components of the agent.
    ///
    /// Pending events of the components still present are preserved, those
    /// of the components no longer present are discarded, and the first
    /// activation of each new component is scheduled at its offset, or at the
    /// current time if the offset lies in the past.
    ///
    /// An error is returned if a component has both a null interval and a
    /// null sleep, in which case the scheduler is left unchanged.
    fn update(&mut self) -> Result<Snapshot, Error> {
        let snapshot = self.core.agent.snapshot();
        Self::check_timings(&snapshot)?;

        // Map each component to its slot in the new snapshot.
        let slots: HashMap<usize, usize> = snapshot
            .components()
            .enumerate()
            .map(|(slot, component)| (component.addr(), slot))
            .collect();
        let old: Vec<&ComponentRef> = self.core.snapshot.components().collect();

        // Pull pending events in queue order and re-insert those of retained
        // components in the same order.
        let mut retained = Vec::with_capacity(self.queue.len());
        let mut scheduled = vec![false; snapshot.len()];
        while let Some((time, event)) = self.queue.pull() {
            let new_slot = old
                .get(event.slot)
                .and_then(|component| slots.get(&component.addr()));
            if let Some(&slot) = new_slot {
                scheduled[slot] = true;
                retained.push((time, Event { slot, ..event }));
            }
        }
        for (time, event) in retained {
            self.queue.insert(time, event);
        }

        for (slot, component) in snapshot.components().enumerate() {
            if !scheduled[slot] {
                let time = component.timing().offset.max(self.core.current_time);
                self.queue.insert(
                    time,
                    Event {
                        slot,
                        kind: EventKind::Quiesce,
                    },
                );
            }
        }

        debug!(
            components = snapshot.len(),
            events = self.queue.len(),
            "update"
        );
        self.core.snapshot = snapshot;

        Ok(self.core.snapshot.clone())
    }

    /// Advances the time to the next scheduled event and processes all events
    /// scheduled for that time.
    ///
    /// An error is returned if no event is scheduled.
    fn step(&mut self) -> Result<Time, Error> {
        let time = self.next_event_time().ok_or(Error::NoScheduledEvent)?;
        let _span = debug_span!("step", scheduler = "virtual_event", time).entered();

        self.process_batch(time)?;
        self.core.num_steps += 1;

        Ok(time)
    }

    fn current_time(&self) -> Time {
        self.core.current_time
    }

    fn num_steps(&self) -> u64 {
        self.core.num_steps
    }

    /// Zeroes the current time and the step count, forgets the snapshot and
    /// discards all pending events.
    fn reset(&mut self) {
        self.core.reset();
        self.queue.clear();
    }

    fn snapshot(&self) -> &Snapshot {
        &self.core.snapshot
    }

    fn agent(&self) -> &Agent {
        &self.core.agent
    }
}

impl fmt::Debug for VirtualTimeScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualTimeScheduler")
            .field("core", &self.core)
            .field("pending_events", &self.queue.len())
            .field("next_event_time", &self.next_event_time())
            .finish()
    }
}
