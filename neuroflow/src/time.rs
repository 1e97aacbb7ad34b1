//! Scheduling time and wall clocks.
//!
//! This module provides most notably:
//!
//! * [`Time`]: the integer timestamp carried through every scheduling phase,
//! * [`Clock`]: a trait for types that can pace a real-time scheduler,
//!   implemented for instance by [`SystemClock`].
//!
//! Virtual-time schedulers interpret [`Time`] as an abstract tick count. The
//! real-time scheduler interprets it as a number of milliseconds elapsed since
//! the reference instant of its clock.
//!
//! # Examples
//!
//! A clock that reports lag when a deadline has already elapsed.
//!
//! ```
//! use std::time::Duration;
//!
//! use neuroflow::time::{Clock, SyncStatus, SystemClock};
//!
//! let mut clock = SystemClock::new();
//!
//! // Blocks for about 10ms.
//! assert_eq!(clock.synchronize(Duration::from_millis(10)), SyncStatus::Synchronized);
//! assert!(clock.now() >= 10);
//!
//! // The reference instant is more than 10ms in the past.
//! assert!(matches!(clock.synchronize(Duration::ZERO), SyncStatus::OutOfSync(_)));
//! ```

mod clock;

pub use clock::{Clock, SyncStatus, SystemClock};

pub(crate) use clock::to_millis;

/// A scheduling timestamp.
///
/// Timestamps only ever move forward: every component rejects an input or
/// output phase requested for a timestamp older than its previous one.
pub type Time = u64;
