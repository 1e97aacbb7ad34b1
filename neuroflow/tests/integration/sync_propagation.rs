//! Propagation of values by the lockstep scheduler.

use neuroflow::component::{ComponentRef, ComponentSet, ConstantComponent, PipeComponent};
use neuroflow::module::Agent;
use neuroflow::ports::Value;
use neuroflow::scheduler::{Scheduler, VirtualTimeSyncScheduler};
use neuroflow::unit::{connect, Unit};

fn constant(value: f64) -> ComponentRef {
    let constant = ComponentRef::new(ConstantComponent);
    constant.make_out_port("out", 1);
    constant.set_state("out", Value::from([value]));

    constant
}

fn pipe() -> ComponentRef {
    let pipe = ComponentRef::new(PipeComponent::new().with_map("in", "out"));
    pipe.make_in_port("in", 1);
    pipe.make_out_port("out", 1);

    pipe
}

/// Builds `source -> stage_0 -> ... -> stage_{n-1}` and returns the stages.
fn chain(agent: &Agent, len: usize) -> Vec<ComponentRef> {
    let source = constant(1.0);
    agent.add_component("source", source.clone()).unwrap();

    let mut upstream = source;
    let mut stages = Vec::new();
    for i in 0..len {
        let stage = pipe();
        connect((&upstream, "out"), (&stage, "in")).unwrap();
        agent.add_component(&format!("stage_{i}"), stage.clone()).unwrap();
        upstream = stage.clone();
        stages.push(stage);
    }

    stages
}

fn published(component: &ComponentRef) -> bool {
    !component.get_out_port("out").unwrap().buffer().is_zero()
}

#[test]
fn one_hop_per_step() {
    const LEN: usize = 6;

    let agent = Agent::new();
    let stages = chain(&agent, LEN);
    let mut scheduler = VirtualTimeSyncScheduler::new(&agent, 1);

    for step in 1..=LEN + 1 {
        scheduler.step().unwrap();

        // The source publishes after the first step, the k-th stage after
        // k + 1 steps.
        for (k, stage) in stages.iter().enumerate() {
            assert_eq!(
                published(stage),
                k + 2 <= step,
                "stage {k} after {step} step(s)"
            );
        }
    }
}

#[test]
fn component_set_propagates_in_one_step() {
    let a = constant(5.0);
    let b = pipe();
    let c = pipe();
    connect((&a, "out"), (&b, "in")).unwrap();
    connect((&b, "out"), (&c, "in")).unwrap();

    let mut set = ComponentSet::new();
    // Inserted out of order on purpose.
    set.add_component("c", c.clone(), 2);
    set.add_component("a", a, 0);
    set.add_component("b", b, 1);

    let agent = Agent::new();
    agent.add_component("set", ComponentRef::new(set)).unwrap();
    let mut scheduler = VirtualTimeSyncScheduler::new(&agent, 1);

    scheduler.step().unwrap();

    assert_eq!(c.get_out_port("out").unwrap().buffer(), Value::from([5.0]));
}

#[test]
fn supervisor_runs_between_input_and_fire() {
    let agent = Agent::new();
    let source = constant(1.0);
    agent.add_component("source", source.clone()).unwrap();
    let mut scheduler = VirtualTimeSyncScheduler::new(&agent, 10);

    // Overwriting the state from the supervisor is seen by the same fire.
    let supervised = source.clone();
    scheduler.set_supervisor(move || {
        supervised.set_state("out", Value::from([2.0]));
        Ok(())
    });
    assert_eq!(scheduler.step(), Ok(10));

    assert_eq!(source.get_out_port("out").unwrap().buffer(), Value::from([2.0]));
    assert_eq!(source.last_output_time(), 10);
}

#[test]
fn update_after_structural_edit() {
    let agent = Agent::new();
    let stages = chain(&agent, 1);
    let mut scheduler = VirtualTimeSyncScheduler::new(&agent, 1);
    scheduler.step().unwrap();
    scheduler.step().unwrap();
    assert!(published(&stages[0]));

    let late = pipe();
    connect((&stages[0], "out"), (&late, "in")).unwrap();
    agent.add_component("late", late.clone()).unwrap();
    assert!(scheduler.is_stale());

    scheduler.step().unwrap();
    assert!(!published(&late));

    scheduler.update().unwrap();
    scheduler.step().unwrap();
    assert!(published(&late));
}
