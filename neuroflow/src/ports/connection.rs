use std::fmt;

use super::port::WeakPort;
use super::{Port, Value};

/// A directed edge copying the buffer of a source port into a destination
/// port.
///
/// A connection is owned by its destination port and only holds non-owning
/// references to both ends, so dropping either port makes the connection
/// inert.
#[derive(Clone)]
pub struct Connection {
    source: WeakPort,
    destination: WeakPort,
}

impl Connection {
    pub(super) fn new(source: &Port, destination: &Port) -> Self {
        Self {
            source: source.downgrade(),
            destination: destination.downgrade(),
        }
    }

    /// Returns the source port if it is still alive.
    pub fn source(&self) -> Option<Port> {
        self.source.upgrade()
    }

    /// Returns the destination port if it is still alive.
    pub fn destination(&self) -> Option<Port> {
        self.destination.upgrade()
    }

    /// Copies the source buffer into the destination buffer and invokes the
    /// callbacks of the destination.
    ///
    /// If the source port has a connection of its own, it is synchronized
    /// first, so that a chain of connections is pulled from its far end.
    pub fn sync(&self) {
        let Some(destination) = self.destination.upgrade() else {
            return;
        };
        if !destination.begin_sync() {
            return;
        }
        if let Some(value) = self.pull() {
            destination.store(value);
        }
        destination.end_sync();
    }

    /// Returns the up-to-date value of the source port.
    fn pull(&self) -> Option<Value> {
        let source = self.source.upgrade()?;
        if !source.is_syncing() {
            source.sync();
        }

        Some(source.buffer())
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("source_alive", &self.source.upgrade().is_some())
            .field("destination_alive", &self.destination.upgrade().is_some())
            .finish()
    }
}
