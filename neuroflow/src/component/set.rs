use std::collections::BTreeMap;

use crate::error::Error;

use super::{Component, ComponentRef, Context};

/// A component running a group of components as one atomic step.
///
/// Each `fire` of the set performs a complete input, train, fire and output
/// cycle for every child, one child at a time in ascending priority order,
/// using the last input and output times of the set itself. Equal priorities
/// are ordered by name.
///
/// Since each child publishes before the next one captures its inputs, a
/// chain of connected children ordered by priority propagates a value from
/// its first to its last member within a single activation of the set.
///
/// A set must not contain the component it is wrapped in. The handle of the
/// enclosing component is also borrowed while the children run, so the
/// callbacks of the children's ports may query the children and any other
/// component, but not the component wrapping the set.
#[derive(Debug, Default)]
pub struct ComponentSet {
    components: BTreeMap<String, (i32, ComponentRef)>,
}

impl ComponentSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a child with the specified priority, replacing any child
    /// registered under the same name.
    pub fn add_component(&mut self, name: impl Into<String>, component: ComponentRef, priority: i32) {
        self.components.insert(name.into(), (priority, component));
    }

    /// Returns a handle to the named child.
    pub fn get_component(&self, name: &str) -> Result<ComponentRef, Error> {
        self.components
            .get(name)
            .map(|(_, component)| component.clone())
            .ok_or_else(|| Error::MissingComponent(name.to_owned()))
    }

    /// Removes the named child.
    pub fn remove_component(&mut self, name: &str) -> Result<ComponentRef, Error> {
        self.components
            .remove(name)
            .map(|(_, component)| component)
            .ok_or_else(|| Error::MissingComponent(name.to_owned()))
    }

    /// Returns the priority of the named child.
    pub fn priority(&self, name: &str) -> Result<i32, Error> {
        self.components
            .get(name)
            .map(|(priority, _)| *priority)
            .ok_or_else(|| Error::MissingComponent(name.to_owned()))
    }

    /// Returns the children in execution order.
    pub fn ordered(&self) -> Vec<(&str, &ComponentRef)> {
        let mut children: Vec<_> = self
            .components
            .iter()
            .map(|(name, (priority, component))| (*priority, name.as_str(), component))
            .collect();
        children.sort_by_key(|&(priority, name, _)| (priority, name));

        children
            .into_iter()
            .map(|(_, name, component)| (name, component))
            .collect()
    }
}

impl Component for ComponentSet {
    fn fire(&mut self, ctx: &mut Context<'_>) -> Result<(), Error> {
        let (input_time, output_time) = (ctx.last_input_time(), ctx.last_output_time());
        for (_, child) in self.ordered() {
            child.input(input_time)?;
            child.train()?;
            child.fire()?;
            child.output(output_time)?;
        }

        Ok(())
    }

    /// Resets every child.
    fn reset(&mut self) {
        for (_, child) in self.components.values() {
            child.reset();
        }
    }
}
