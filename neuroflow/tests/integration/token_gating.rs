//! Gating of a fast component by a slower token source.

use std::cell::Cell;
use std::rc::Rc;

use neuroflow::component::{Component, ComponentRef, Context, Timing, TokenGate, TOKEN_IN};
use neuroflow::module::Agent;
use neuroflow::ports::Value;
use neuroflow::scheduler::{Scheduler, VirtualTimeScheduler};
use neuroflow::unit::{connect, Unit};
use neuroflow::Error;

/// Publishes an incrementing step number, starting at 1.
struct Environment;

impl Component for Environment {
    fn fire(&mut self, ctx: &mut Context<'_>) -> Result<(), Error> {
        let step = ctx.state_mut("step")?;
        step.as_mut_slice()[0] += 1.0;
        let step = step.clone();
        ctx.set_result("token", step);

        Ok(())
    }
}

/// Counts activations, whether gated or not.
struct Counter {
    fired: Rc<Cell<u32>>,
}

impl Component for Counter {
    fn fire(&mut self, _: &mut Context<'_>) -> Result<(), Error> {
        self.fired.set(self.fired.get() + 1);

        Ok(())
    }
}

#[test]
fn one_computation_per_environment_step() {
    let environment = ComponentRef::new(Environment);
    environment.make_out_port("token", 1);
    environment.set_state("step", Value::zeros(1));
    environment.set_timing(Timing::new(0, 30, 0));

    let fired = Rc::new(Cell::new(0));
    let gated = TokenGate::new(Counter {
        fired: fired.clone(),
    })
    .into_component();
    gated.set_timing(Timing::new(0, 10, 0));
    connect((&environment, "token"), (&gated, TOKEN_IN)).unwrap();

    let agent = Agent::new();
    agent.add_component("environment", environment.clone()).unwrap();
    agent.add_component("gated", gated.clone()).unwrap();
    let mut scheduler = VirtualTimeScheduler::new(&agent).unwrap();

    while scheduler.current_time() < 300 {
        scheduler.step().unwrap();
    }

    // Ten tokens were published at 30, 60, ..., 300, and the gated component
    // was activated 31 times.
    assert_eq!(
        environment.get_out_port("token").unwrap().buffer(),
        Value::from([10.0])
    );
    assert_eq!(gated.last_input_time(), 300);
    assert_eq!(fired.get(), 10);
}

#[test]
fn reset_accepts_the_first_token_again() {
    let fired = Rc::new(Cell::new(0));
    let gated = TokenGate::new(Counter {
        fired: fired.clone(),
    })
    .into_component();
    let token = gated.get_in_port(TOKEN_IN).unwrap();

    token.set_buffer(Value::from([1.0])).unwrap();
    for time in 0..3 {
        gated.input(time).unwrap();
        gated.fire().unwrap();
    }
    assert_eq!(fired.get(), 1);

    gated.reset();
    gated.input(0).unwrap();
    gated.fire().unwrap();
    assert_eq!(fired.get(), 2);
}
