//! Ports, connections and the values they carry.
//!
//! A [`Port`] is a named slot of a [`Unit`](crate::unit::Unit) holding a
//! fixed-length [`Value`]. Ports are wired together by [`Connection`]s: a
//! port with an incoming connection copies the buffer of the connection
//! source into its own buffer each time it is synchronized.
//!
//! `Port`s are clonable. Their clones are shallow copies, meaning that a
//! value written through one clone is immediately observed through all other
//! clones. Aliasing a port between two units simply stores such a clone in
//! the slot of the other unit.
//!
//! #### Example
//!
//! This example connects two ports and observes the synchronized value with
//! a callback.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use neuroflow::ports::{Port, Value};
//!
//! let source = Port::new(2);
//! let destination = Port::new(2);
//! destination.connect(&source).unwrap();
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let log = seen.clone();
//! destination.register_callback(move |v| log.borrow_mut().push(v.clone()));
//!
//! source.set_buffer(Value::from([1.0, 2.0])).unwrap();
//! destination.sync();
//!
//! assert_eq!(destination.buffer(), Value::from([1.0, 2.0]));
//! assert_eq!(seen.borrow().len(), 1);
//! ```

mod connection;
mod port;
mod value;

pub use connection::Connection;
pub use port::{Callback, Port};
pub use value::Value;
