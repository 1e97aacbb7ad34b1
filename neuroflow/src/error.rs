//! Error reporting.
//!
//! Every invariant violation detected by the runtime is surfaced to the
//! caller as an [`Error`]. None of these errors are transient: they all point
//! at a malformed topology, a misconfigured scheduler, or a component that was
//! driven backwards in time, so nothing is retried or recovered internally.

use std::fmt;

use thiserror::Error;

use crate::time::Time;

/// The two independent port namespaces of a [`Unit`](crate::unit::Unit).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// In-ports.
    In,
    /// Out-ports.
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => f.write_str("in-port"),
            Self::Out => f.write_str("out-port"),
        }
    }
}

/// The kind of child already registered under a name in a
/// [`Module`](crate::module::Module).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChildKind {
    /// A component.
    Component,
    /// A submodule.
    Submodule,
}

impl fmt::Display for ChildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component => f.write_str("component"),
            Self::Submodule => f.write_str("submodule"),
        }
    }
}

/// The per-component caches that can be queried by name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// Values captured from in-ports during the input phase.
    Inputs,
    /// Persistent component state.
    States,
    /// Values to be published during the output phase.
    Results,
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inputs => f.write_str("inputs"),
            Self::States => f.write_str("states"),
            Self::Results => f.write_str("results"),
        }
    }
}

/// Error returned by fallible runtime operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The input phase was requested for a time older than the last input.
    #[error("input at t={time} captured a time travel (last input at t={last})")]
    InputTimeTravel {
        /// Requested time.
        time: Time,
        /// Time of the previous input phase.
        last: Time,
    },

    /// The output phase was requested for a time older than the last output.
    #[error("output at t={time} captured a time travel (last output at t={last})")]
    OutputTimeTravel {
        /// Requested time.
        time: Time,
        /// Time of the previous output phase.
        last: Time,
    },

    /// The name is already used by a child of the other kind.
    #[error("there is already a {existing} named `{name}`")]
    NameCollision {
        /// The offending name.
        name: String,
        /// The kind of the child already registered under this name.
        existing: ChildKind,
    },

    /// No port is registered under this name.
    #[error("no {direction} named `{name}`")]
    MissingPort {
        /// The namespace that was searched.
        direction: Direction,
        /// The port name.
        name: String,
    },

    /// No value is cached under this key.
    #[error("no value for key `{key}` in {cache}")]
    MissingKey {
        /// The cache that was searched.
        cache: CacheKind,
        /// The missing key.
        key: String,
    },

    /// No component is registered under this name.
    #[error("no component named `{0}`")]
    MissingComponent(String),

    /// No submodule is registered under this name or dotted path.
    #[error("no submodule named `{0}`")]
    MissingSubmodule(String),

    /// A real-time scheduler interval must be strictly positive.
    #[error("invalid scheduler interval {0}, the interval must be strictly positive")]
    InvalidInterval(Time),

    /// A component's interval and sleep are both null, so its events would
    /// never let time advance.
    #[error("component `{component}` has a null activation period (interval and sleep are both 0)")]
    ZeroPeriod {
        /// Path of the component.
        component: String,
    },

    /// Advancing the current time would exceed the largest representable
    /// time.
    #[error("cannot advance the time from t={time} by {delta}: the time would overflow")]
    TimeOverflow {
        /// Current time.
        time: Time,
        /// Requested time increment.
        delta: Time,
    },

    /// Two ports or a port and a value have different lengths.
    #[error("length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch {
        /// Length of the port.
        expected: usize,
        /// Length of the offending value or port.
        actual: usize,
    },

    /// The port slot to be replaced by an alias is already shared, so
    /// replacing it would silently detach the units that share it.
    #[error("cannot alias {direction} `{name}`: the port is already shared (alias outer units first)")]
    AliasOrder {
        /// The namespace of the slot.
        direction: Direction,
        /// The slot name.
        name: String,
    },

    /// Adding the submodule would make a module contain itself.
    #[error("adding submodule `{0}` would create a containment cycle")]
    ContainmentCycle(String),

    /// The event queue is empty.
    #[error("no event is scheduled")]
    NoScheduledEvent,
}
