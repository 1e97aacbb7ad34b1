//! Example: a reflex arc with a nested processing module.
//!
//! This example demonstrates in particular:
//!
//! * custom components keeping their own state,
//! * port aliasing to expose the content of a module,
//! * per-component cadence with the event-driven scheduler,
//! * structured logging with `tracing-subscriber`.
//!
//! ```text
//!                         ┌──────────────────────────┐
//!                         │ cortex                   │
//! ┌──────────┐  signal    │      ┌────────────┐      │         ┌──────────┐
//! │  Sensor  ├───────────►● in ─►│ Integrator ├─► out ●───────►│  Motor   ├───► command
//! └──────────┘            │      └────────────┘      │         └──────────┘
//!                         └──────────────────────────┘
//! ```
//!
//! Run with `RUST_LOG=neuroflow=debug` to follow the scheduling steps.
use neuroflow::component::{Component, ComponentRef, Context, Timing};
use neuroflow::module::{Agent, Module};
use neuroflow::ports::Value;
use neuroflow::scheduler::{Scheduler, VirtualTimeScheduler};
use neuroflow::unit::{alias_in_port, alias_out_port, connect, Unit};
use neuroflow::Error;
use tracing_subscriber::EnvFilter;

/// Sensor publishing a ramp: 1, 2, 3...
struct Sensor;

impl Component for Sensor {
    fn fire(&mut self, ctx: &mut Context<'_>) -> Result<(), Error> {
        let ramp = ctx.state_mut("ramp")?;
        ramp.as_mut_slice()[0] += 1.0;
        let ramp = ramp.clone();
        ctx.set_result("signal", ramp);

        Ok(())
    }
}

/// Leaky integrator: `level = leak * level + in`.
struct Integrator {
    leak: f64,
}

impl Component for Integrator {
    fn fire(&mut self, ctx: &mut Context<'_>) -> Result<(), Error> {
        let input = ctx.input("in")?[0];
        let level = ctx.state_mut("level")?;
        let next = self.leak * level[0] + input;
        level.as_mut_slice()[0] = next;
        let level = level.clone();
        ctx.set_result("out", level);

        Ok(())
    }
}

/// Motor issuing a command when its input exceeds a threshold.
struct Motor {
    threshold: f64,
}

impl Component for Motor {
    fn fire(&mut self, ctx: &mut Context<'_>) -> Result<(), Error> {
        let command = if ctx.input("in")?[0] > self.threshold {
            1.0
        } else {
            0.0
        };
        ctx.set_result("command", Value::from([command]));

        Ok(())
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // ---------------
    // Agent assembly.
    // ---------------

    // Components.
    let sensor = ComponentRef::new(Sensor);
    sensor.make_out_port("signal", 1);
    sensor.set_state("ramp", Value::zeros(1));
    sensor.set_timing(Timing::new(0, 10, 0));

    let integrator = ComponentRef::new(Integrator { leak: 0.5 });
    integrator.make_in_port("in", 1);
    integrator.make_out_port("out", 1);
    integrator.set_state("level", Value::zeros(1));
    integrator.set_timing(Timing::new(0, 5, 5));

    let motor = ComponentRef::new(Motor { threshold: 10.0 });
    motor.make_in_port("in", 1);
    motor.make_out_port("command", 1);
    motor.set_timing(Timing::new(5, 10, 0));

    // The cortex module exposes the ports of its integrator. Aliases are
    // made before connections.
    let cortex = Module::new();
    cortex.make_in_port("in", 1);
    cortex.make_out_port("out", 1);
    alias_in_port((&cortex, "in"), (&integrator, "in"))?;
    alias_out_port((&cortex, "out"), (&integrator, "out"))?;
    cortex.add_component("integrator", integrator)?;

    // Connections.
    connect((&sensor, "signal"), (&cortex, "in"))?;
    connect((&cortex, "out"), (&motor, "in"))?;

    let agent = Agent::new();
    agent.add_component("sensor", sensor)?;
    agent.add_submodule("cortex", cortex.clone())?;
    agent.add_component("motor", motor.clone())?;

    // ----------
    // Execution.
    // ----------

    let mut scheduler = VirtualTimeScheduler::new(&agent)?;
    let command = motor.get_out_port("command")?;
    let mut first_command = None;

    while scheduler.current_time() < 100 {
        let time = scheduler.step()?;
        let level = cortex.get_out_port("out")?.buffer();
        println!("t = {time:>3}  cortex.out = {level}  command = {}", command.buffer());

        if first_command.is_none() && !command.buffer().is_zero() {
            first_command = Some(time);
        }
    }

    match first_command {
        Some(time) => println!("first command issued at t = {time}"),
        None => println!("no command issued"),
    }

    Ok(())
}
