use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::Error;

use super::{Connection, Value};

/// A function invoked with the new buffer whenever a port is updated.
pub type Callback = Rc<dyn Fn(&Value)>;

/// A named buffer slot of a unit.
///
/// A `Port` holds a fixed-length [`Value`], at most one incoming
/// [`Connection`] from which the buffer can be synchronized, and an ordered
/// list of callbacks.
///
/// Ports are shallow handles: a clone refers to the same buffer, connection
/// and callbacks as the port it was cloned from, so two units holding clones
/// of the same `Port` observe every write made through either of them.
#[derive(Clone)]
pub struct Port {
    inner: Rc<RefCell<PortInner>>,
}

struct PortInner {
    buffer: Value,
    connection: Option<Connection>,
    callbacks: Vec<Callback>,
    // Whether another unit or a connection refers to this port.
    shared: bool,
    // Set while the port pulls from its connection, to cut cyclic pulls.
    syncing: bool,
}

impl Port {
    /// Creates a port holding the all-zero value of the specified length.
    pub fn new(len: usize) -> Self {
        Self::with_value(Value::zeros(len))
    }

    /// Creates a port holding the specified initial value.
    ///
    /// The length of the initial value becomes the length of the port.
    pub fn with_value(value: Value) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PortInner {
                buffer: value,
                connection: None,
                callbacks: Vec::new(),
                shared: false,
                syncing: false,
            })),
        }
    }

    /// Returns the length of the port's value.
    pub fn len(&self) -> usize {
        self.inner.borrow().buffer.len()
    }

    /// Returns `true` if the port holds a zero-length value.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the current buffer.
    pub fn buffer(&self) -> Value {
        self.inner.borrow().buffer.clone()
    }

    /// Overwrites the buffer and invokes the registered callbacks.
    ///
    /// An error is returned if the length of the value differs from the
    /// length of the port.
    pub fn set_buffer(&self, value: Value) -> Result<(), Error> {
        let expected = self.len();
        if value.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                actual: value.len(),
            });
        }
        self.inner.borrow_mut().buffer = value;
        self.invoke_callbacks();

        Ok(())
    }

    /// Creates a connection from the source port into this port.
    ///
    /// A port has at most one incoming connection: any previous connection is
    /// replaced. An error is returned if both ports have different lengths.
    pub fn connect(&self, source: &Port) -> Result<(), Error> {
        let (expected, actual) = (self.len(), source.len());
        if expected != actual {
            return Err(Error::LengthMismatch { expected, actual });
        }
        source.mark_shared();
        self.inner.borrow_mut().connection = Some(Connection::new(source, self));

        Ok(())
    }

    /// Returns the connection attached to this port, if any.
    pub fn connection(&self) -> Option<Connection> {
        self.inner.borrow().connection.clone()
    }

    /// Detaches and returns the connection attached to this port, if any.
    pub fn disconnect(&self) -> Option<Connection> {
        self.inner.borrow_mut().connection.take()
    }

    /// Synchronizes the buffer with the connection.
    ///
    /// This is a no-op if no connection is attached.
    pub fn sync(&self) {
        if let Some(connection) = self.connection() {
            connection.sync();
        }
    }

    /// Appends a callback to the list of callbacks.
    ///
    /// Callbacks are invoked in registration order with the new buffer each
    /// time the port is updated by [`sync()`](Port::sync) or by a component
    /// output. No borrow of the port is held during the call, so a callback
    /// may freely read the port it is attached to.
    pub fn register_callback<F>(&self, callback: F)
    where
        F: Fn(&Value) + 'static,
    {
        self.inner.borrow_mut().callbacks.push(Rc::new(callback));
    }

    /// Invokes all callbacks with the current buffer.
    pub fn invoke_callbacks(&self) {
        let (value, callbacks) = {
            let inner = self.inner.borrow();
            if inner.callbacks.is_empty() {
                return;
            }
            (inner.buffer.clone(), inner.callbacks.clone())
        };
        for callback in callbacks {
            callback(&value);
        }
    }

    /// Returns `true` if both handles refer to the same port.
    pub fn ptr_eq(&self, other: &Port) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns `true` if replacing this port in a unit would detach another
    /// owner, i.e. if the port was already aliased, is the source of a
    /// connection, or carries a connection.
    pub(crate) fn is_shared(&self) -> bool {
        let inner = self.inner.borrow();

        inner.shared || inner.connection.is_some()
    }

    /// Records that another owner refers to this port.
    pub(crate) fn mark_shared(&self) {
        self.inner.borrow_mut().shared = true;
    }

    /// Appends the callbacks of another port to this port's callbacks.
    pub(crate) fn absorb_callbacks(&self, other: &Port) {
        if self.ptr_eq(other) {
            return;
        }
        let callbacks = other.inner.borrow().callbacks.clone();
        self.inner.borrow_mut().callbacks.extend(callbacks);
    }

    pub(crate) fn downgrade(&self) -> WeakPort {
        WeakPort(Rc::downgrade(&self.inner))
    }

    /// Marks the port as being synchronized, returning `false` if it already
    /// is higher up in the pull chain.
    pub(super) fn begin_sync(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.syncing {
            return false;
        }
        inner.syncing = true;

        true
    }

    pub(super) fn end_sync(&self) {
        self.inner.borrow_mut().syncing = false;
    }

    pub(super) fn is_syncing(&self) -> bool {
        self.inner.borrow().syncing
    }

    /// Stores a value without length check, then invokes the callbacks.
    pub(super) fn store(&self, value: Value) {
        self.inner.borrow_mut().buffer = value;
        self.invoke_callbacks();
    }
}

impl fmt::Debug for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Port")
            .field("buffer", &inner.buffer)
            .field("connected", &inner.connection.is_some())
            .field("callbacks", &inner.callbacks.len())
            .finish_non_exhaustive()
    }
}

/// A non-owning reference to a port.
#[derive(Clone)]
pub(crate) struct WeakPort(Weak<RefCell<PortInner>>);

impl WeakPort {
    pub(crate) fn upgrade(&self) -> Option<Port> {
        self.0.upgrade().map(|inner| Port { inner })
    }
}
