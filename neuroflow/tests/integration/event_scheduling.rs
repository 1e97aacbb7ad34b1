//! Per-component cadence of the event-driven scheduler.

use neuroflow::component::{ComponentRef, ConstantComponent, PipeComponent, Timing};
use neuroflow::error::Error;
use neuroflow::module::Agent;
use neuroflow::ports::Value;
use neuroflow::scheduler::{Scheduler, VirtualTimeScheduler};
use neuroflow::time::Time;
use neuroflow::unit::{connect, Unit};

fn constant(timing: Timing) -> ComponentRef {
    let constant = ComponentRef::new(ConstantComponent);
    constant.make_out_port("out", 1);
    constant.set_state("out", Value::from([1.0]));
    constant.set_timing(timing);

    constant
}

fn pipe(timing: Timing) -> ComponentRef {
    let pipe = ComponentRef::new(PipeComponent::new().with_map("in", "out"));
    pipe.make_in_port("in", 1);
    pipe.make_out_port("out", 1);
    pipe.set_timing(timing);

    pipe
}

fn published(component: &ComponentRef) -> bool {
    !component.get_out_port("out").unwrap().buffer().is_zero()
}

fn captured(component: &ComponentRef) -> bool {
    component
        .get_input("in")
        .map(|value| !value.is_zero())
        .unwrap_or(false)
}

/// Records the first time at which each probe holds.
#[derive(Default)]
struct FirstSeen<'a> {
    probes: Vec<(&'a str, Box<dyn Fn() -> bool + 'a>, Option<Time>)>,
}

impl<'a> FirstSeen<'a> {
    fn probe(mut self, name: &'a str, probe: impl Fn() -> bool + 'a) -> Self {
        self.probes.push((name, Box::new(probe), None));

        self
    }

    fn observe(&mut self, time: Time) {
        for (_, probe, seen) in &mut self.probes {
            if seen.is_none() && probe() {
                *seen = Some(time);
            }
        }
    }

    fn get(&self, name: &str) -> Option<Time> {
        self.probes
            .iter()
            .find(|(n, _, _)| *n == name)
            .and_then(|(_, _, seen)| *seen)
    }
}

#[test]
fn publication_follows_activation_by_interval() {
    let agent = Agent::new();
    let c = constant(Timing::new(2, 5, 0));
    agent.add_component("c", c.clone()).unwrap();
    let mut scheduler = VirtualTimeScheduler::new(&agent).unwrap();

    let mut published_at = Vec::new();
    for _ in 0..4 {
        let time = scheduler.step().unwrap();
        assert_eq!(time, scheduler.current_time());
        published_at.push((time, published(&c)));
    }

    assert_eq!(
        published_at,
        [(2, false), (7, true), (12, true), (17, true)]
    );
}

#[test]
fn chain_with_independent_offsets() {
    let agent = Agent::new();
    let a = constant(Timing::new(200, 500, 0));
    let b = pipe(Timing::new(0, 500, 0));
    let c = pipe(Timing::new(100, 500, 0));
    connect((&a, "out"), (&b, "in")).unwrap();
    connect((&b, "out"), (&c, "in")).unwrap();
    agent.add_component("a", a.clone()).unwrap();
    agent.add_component("b", b.clone()).unwrap();
    agent.add_component("c", c.clone()).unwrap();
    let mut scheduler = VirtualTimeScheduler::new(&agent).unwrap();

    let mut seen = FirstSeen::default()
        .probe("a_out", || published(&a))
        .probe("b_in", || captured(&b))
        .probe("b_out", || published(&b))
        .probe("c_in", || captured(&c));
    while scheduler.current_time() < 2000 {
        let time = scheduler.step().unwrap();
        seen.observe(time);
    }

    assert_eq!(seen.get("a_out"), Some(700));
    assert_eq!(seen.get("b_in"), Some(1000));
    assert_eq!(seen.get("b_out"), Some(1500));
    assert_eq!(seen.get("c_in"), Some(1600));
}

#[test]
fn chain_with_sleep() {
    let agent = Agent::new();
    let a = constant(Timing::new(100, 100, 300));
    let b = pipe(Timing::new(200, 100, 300));
    let c = pipe(Timing::new(300, 100, 300));
    connect((&a, "out"), (&b, "in")).unwrap();
    connect((&b, "out"), (&c, "in")).unwrap();
    agent.add_component("a", a.clone()).unwrap();
    agent.add_component("b", b.clone()).unwrap();
    agent.add_component("c", c.clone()).unwrap();
    let mut scheduler = VirtualTimeScheduler::new(&agent).unwrap();

    let mut seen = FirstSeen::default()
        .probe("a_out", || published(&a))
        .probe("b_in", || captured(&b))
        .probe("b_out", || published(&b))
        .probe("c_in", || captured(&c));
    for _ in 0..10 {
        let time = scheduler.step_by(100).unwrap();
        seen.observe(time);
    }

    assert_eq!(scheduler.current_time(), 1000);
    assert_eq!(seen.get("a_out"), Some(200));
    assert_eq!(seen.get("b_in"), Some(200));
    assert_eq!(seen.get("b_out"), Some(300));
    assert_eq!(seen.get("c_in"), Some(300));

    // `a` is activated at 100, 500 and 900 and publishes at 200, 600
    // and 1000.
    assert_eq!(a.last_input_time(), 900);
    assert_eq!(a.last_output_time(), 1000);
}

#[test]
fn null_period_set_while_running() {
    let agent = Agent::new();
    let c = constant(Timing::new(0, 10, 0));
    agent.add_component("c", c.clone()).unwrap();
    let mut scheduler = VirtualTimeScheduler::new(&agent).unwrap();
    assert_eq!(scheduler.step(), Ok(0));

    c.set_timing(Timing::new(0, 0, 0));

    assert_eq!(
        scheduler.step(),
        Err(Error::ZeroPeriod {
            component: "c".into()
        })
    );
}
