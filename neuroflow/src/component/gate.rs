use crate::error::Error;
use crate::unit::Unit;

use super::{Component, ComponentRef, Context};

/// Name of the in-port carrying the token of a [`TokenGate`].
pub const TOKEN_IN: &str = "token_in";

/// Name of the out-port forwarding the token of a [`TokenGate`].
pub const TOKEN_OUT: &str = "token_out";

/// A component firing the wrapped component at most once per token.
///
/// An external pacer, typically an environment stepped at its own rhythm,
/// numbers its steps with an increasing token sent on [`TOKEN_IN`]. The gate
/// only fires the wrapped component when the received token is exactly one
/// more than the last accepted token, so the wrapped computation runs once
/// per external step regardless of how often it is scheduled. The received
/// token is always forwarded on [`TOKEN_OUT`].
#[derive(Debug)]
pub struct TokenGate<C> {
    inner: C,
    token: f64,
}

impl<C: Component> TokenGate<C> {
    /// Wraps a component. The first accepted token is 1.
    pub fn new(inner: C) -> Self {
        Self { inner, token: 0.0 }
    }

    /// Wraps a component into a [`ComponentRef`] with its token ports
    /// already created.
    pub fn into_component(self) -> ComponentRef {
        let component = ComponentRef::new(self);
        component.make_in_port(TOKEN_IN, 1);
        component.make_out_port(TOKEN_OUT, 1);

        component
    }

    /// Returns the last accepted token.
    pub fn token(&self) -> f64 {
        self.token
    }

    /// Returns the wrapped component.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: Component> Component for TokenGate<C> {
    fn fire(&mut self, ctx: &mut Context<'_>) -> Result<(), Error> {
        let received = ctx.input(TOKEN_IN)?.clone();
        if received.first() == Some(&(self.token + 1.0)) {
            self.token += 1.0;
            self.inner.fire(ctx)?;
        }
        ctx.set_result(TOKEN_OUT, received);

        Ok(())
    }

    fn train(&mut self, ctx: &mut Context<'_>) -> Result<(), Error> {
        self.inner.train(ctx)
    }

    fn reset(&mut self) {
        self.token = 0.0;
        self.inner.reset();
    }
}

impl<C: Component + Default> Default for TokenGate<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}
