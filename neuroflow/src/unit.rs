//! Port-bearing units and the operations that wire them together.
//!
//! Both [`ComponentRef`](crate::component::ComponentRef) and
//! [`Module`](crate::module::Module) implement the [`Unit`] trait, which
//! provides port creation, lookup, connection and aliasing on top of two
//! independent port namespaces.
//!
//! # Aliasing
//!
//! Aliasing makes the slot of one unit refer to the very same [`Port`] as the
//! slot of another unit, so that a containing module can re-expose a port of
//! one of its children. No value is ever copied between aliased slots.
//!
//! Since aliasing replaces the port of the target slot, the port being
//! replaced must not be referred to from anywhere else: aliases are therefore
//! created from the outermost unit inward, and connections are made once all
//! aliases are in place. A misordered alias fails with
//! [`Error::AliasOrder`] rather than silently detaching the units that share
//! the replaced port.
//!
//! # Examples
//!
//! A module re-exposing the out-port of a component:
//!
//! ```
//! use neuroflow::component::{ComponentRef, ConstantComponent};
//! use neuroflow::module::Module;
//! use neuroflow::ports::Value;
//! use neuroflow::unit::{alias_out_port, Unit};
//!
//! let module = Module::new();
//! module.make_out_port("out", 2);
//!
//! let constant = ComponentRef::new(ConstantComponent);
//! constant.make_out_port("out", 2);
//! constant.set_state("out", Value::from([1.0, 2.0]));
//! module.add_component("constant", constant.clone()).unwrap();
//!
//! alias_out_port((&module, "out"), (&constant, "out")).unwrap();
//!
//! constant.input(0).unwrap();
//! constant.fire().unwrap();
//! constant.output(0).unwrap();
//!
//! assert_eq!(module.get_out_port("out").unwrap().buffer(), Value::from([1.0, 2.0]));
//! ```

use std::cell::{Ref, RefMut};
use std::collections::BTreeMap;

use crate::error::{Direction, Error};
use crate::ports::Port;

/// The in-port and out-port namespaces of a unit.
#[derive(Clone, Debug, Default)]
pub struct Ports {
    in_ports: BTreeMap<String, Port>,
    out_ports: BTreeMap<String, Port>,
}

impl Ports {
    /// Creates empty namespaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the in-ports by name.
    pub fn in_ports(&self) -> &BTreeMap<String, Port> {
        &self.in_ports
    }

    /// Returns the out-ports by name.
    pub fn out_ports(&self) -> &BTreeMap<String, Port> {
        &self.out_ports
    }

    fn namespace(&self, direction: Direction) -> &BTreeMap<String, Port> {
        match direction {
            Direction::In => &self.in_ports,
            Direction::Out => &self.out_ports,
        }
    }

    fn namespace_mut(&mut self, direction: Direction) -> &mut BTreeMap<String, Port> {
        match direction {
            Direction::In => &mut self.in_ports,
            Direction::Out => &mut self.out_ports,
        }
    }

    /// Returns a handle to the named port.
    pub fn get(&self, direction: Direction, name: &str) -> Result<Port, Error> {
        self.namespace(direction)
            .get(name)
            .cloned()
            .ok_or_else(|| Error::MissingPort {
                direction,
                name: name.to_owned(),
            })
    }

    /// Stores a port under the specified name, replacing any previous port.
    pub fn insert(&mut self, direction: Direction, name: &str, port: Port) {
        self.namespace_mut(direction).insert(name.to_owned(), port);
    }

    /// Removes and returns the named port.
    pub fn remove(&mut self, direction: Direction, name: &str) -> Result<Port, Error> {
        self.namespace_mut(direction)
            .remove(name)
            .ok_or_else(|| Error::MissingPort {
                direction,
                name: name.to_owned(),
            })
    }
}

/// An entity owning named in-ports and out-ports.
///
/// Implementors only need to give access to their [`Ports`]; all port
/// operations are provided. Units are shared handles, which is why every
/// operation takes `&self`.
pub trait Unit {
    /// Borrows the port namespaces.
    fn ports(&self) -> Ref<'_, Ports>;

    /// Mutably borrows the port namespaces.
    fn ports_mut(&self) -> RefMut<'_, Ports>;

    /// Creates an in-port holding the zero value of the specified length.
    ///
    /// Any in-port previously registered under this name is replaced.
    fn make_in_port(&self, name: &str, len: usize) {
        self.ports_mut().insert(Direction::In, name, Port::new(len));
    }

    /// Creates an out-port holding the zero value of the specified length.
    ///
    /// Any out-port previously registered under this name is replaced.
    fn make_out_port(&self, name: &str, len: usize) {
        self.ports_mut().insert(Direction::Out, name, Port::new(len));
    }

    /// Returns a handle to the named in-port.
    fn get_in_port(&self, name: &str) -> Result<Port, Error> {
        self.ports().get(Direction::In, name)
    }

    /// Returns a handle to the named out-port.
    fn get_out_port(&self, name: &str) -> Result<Port, Error> {
        self.ports().get(Direction::Out, name)
    }

    /// Removes the named in-port.
    fn remove_in_port(&self, name: &str) -> Result<Port, Error> {
        self.ports_mut().remove(Direction::In, name)
    }

    /// Removes the named out-port.
    fn remove_out_port(&self, name: &str) -> Result<Port, Error> {
        self.ports_mut().remove(Direction::Out, name)
    }

    /// Connects the out-port `from` of the source unit to the in-port `to` of
    /// this unit.
    ///
    /// Any connection previously attached to the in-port is replaced.
    fn connect(&self, source: &dyn Unit, from: &str, to: &str) -> Result<(), Error> {
        let source_port = source.get_out_port(from)?;

        self.get_in_port(to)?.connect(&source_port)
    }

    /// Makes the in-port `to` of this unit an alias of the in-port `from` of
    /// the source unit.
    ///
    /// The callbacks registered on the replaced port are appended to those of
    /// the shared port.
    fn alias_in_port(&self, source: &dyn Unit, from: &str, to: &str) -> Result<(), Error> {
        let shared = source.get_in_port(from)?;
        let replaced = self.get_in_port(to)?;
        check_alias(Direction::In, to, &shared, &replaced)?;
        if shared.ptr_eq(&replaced) {
            return Ok(());
        }

        shared.absorb_callbacks(&replaced);
        shared.mark_shared();
        self.ports_mut().insert(Direction::In, to, shared);

        Ok(())
    }

    /// Makes the out-port `to` of this unit an alias of the out-port `from` of
    /// the source unit.
    fn alias_out_port(&self, source: &dyn Unit, from: &str, to: &str) -> Result<(), Error> {
        let shared = source.get_out_port(from)?;
        let replaced = self.get_out_port(to)?;
        check_alias(Direction::Out, to, &shared, &replaced)?;
        if shared.ptr_eq(&replaced) {
            return Ok(());
        }

        shared.mark_shared();
        self.ports_mut().insert(Direction::Out, to, shared);

        Ok(())
    }
}

fn check_alias(direction: Direction, name: &str, shared: &Port, replaced: &Port) -> Result<(), Error> {
    if shared.ptr_eq(replaced) {
        return Ok(());
    }
    if shared.len() != replaced.len() {
        return Err(Error::LengthMismatch {
            expected: replaced.len(),
            actual: shared.len(),
        });
    }
    if replaced.is_shared() {
        return Err(Error::AliasOrder {
            direction,
            name: name.to_owned(),
        });
    }

    Ok(())
}

/// Connects the out-port of the `from` unit to the in-port of the `to` unit.
pub fn connect(from: (&dyn Unit, &str), to: (&dyn Unit, &str)) -> Result<(), Error> {
    to.0.connect(from.0, from.1, to.1)
}

/// Makes the in-port of the `to` unit an alias of the in-port of the `from`
/// unit.
pub fn alias_in_port(from: (&dyn Unit, &str), to: (&dyn Unit, &str)) -> Result<(), Error> {
    to.0.alias_in_port(from.0, from.1, to.1)
}

/// Makes the out-port of the `to` unit an alias of the out-port of the `from`
/// unit.
pub fn alias_out_port(from: (&dyn Unit, &str), to: (&dyn Unit, &str)) -> Result<(), Error> {
    to.0.alias_out_port(from.0, from.1, to.1)
}
