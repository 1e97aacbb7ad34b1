use std::collections::BTreeMap;

use crate::error::Error;

use super::{Component, Context};

/// A component publishing its states unchanged.
///
/// Each state is copied into the result of the same name, so a state `"out"`
/// is published on the out-port `"out"`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConstantComponent;

impl Component for ConstantComponent {
    fn fire(&mut self, ctx: &mut Context<'_>) -> Result<(), Error> {
        let states: Vec<_> = ctx
            .states()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        for (name, value) in states {
            ctx.set_result(name, value);
        }

        Ok(())
    }
}

/// A component forwarding captured inputs to results.
///
/// Each mapping `(in, out)` copies the value captured from in-port `in` into
/// the result published on out-port `out`.
#[derive(Clone, Debug, Default)]
pub struct PipeComponent {
    map: BTreeMap<String, String>,
}

impl PipeComponent {
    /// Creates a pipe without mappings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards the in-port `from` to the out-port `to`.
    ///
    /// An in-port has at most one mapping; a previous mapping is replaced.
    pub fn set_map(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.map.insert(from.into(), to.into());
    }

    /// Builder-style variant of [`set_map()`](PipeComponent::set_map).
    pub fn with_map(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.set_map(from, to);

        self
    }
}

impl Component for PipeComponent {
    fn fire(&mut self, ctx: &mut Context<'_>) -> Result<(), Error> {
        for (from, to) in &self.map {
            let value = ctx.input(from)?.clone();
            ctx.set_result(to.clone(), value);
        }

        Ok(())
    }
}

/// A component that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullComponent;

impl Component for NullComponent {
    fn fire(&mut self, _: &mut Context<'_>) -> Result<(), Error> {
        Ok(())
    }
}
