//! Port aliasing across nested modules.

use neuroflow::component::{ComponentRef, ConstantComponent, PipeComponent};
use neuroflow::error::{Direction, Error};
use neuroflow::module::{Agent, Module};
use neuroflow::ports::Value;
use neuroflow::scheduler::{Scheduler, VirtualTimeSyncScheduler};
use neuroflow::unit::{alias_in_port, alias_out_port, connect, Unit};

fn module_with_port(direction: Direction, len: usize) -> Module {
    let module = Module::new();
    match direction {
        Direction::In => module.make_in_port("in", len),
        Direction::Out => module.make_out_port("out", len),
    }

    module
}

#[test]
fn output_is_shared_without_copy() {
    let module = module_with_port(Direction::Out, 2);
    let component = ComponentRef::new(ConstantComponent);
    component.make_out_port("out", 2);
    module.add_component("constant", component.clone()).unwrap();

    alias_out_port((&module, "out"), (&component, "out")).unwrap();
    component.set_result("out", Value::from([4.0, 2.0]));
    component.output(0).unwrap();

    assert_eq!(
        module.get_out_port("out").unwrap().buffer(),
        Value::from([4.0, 2.0])
    );
    assert!(module
        .get_out_port("out")
        .unwrap()
        .ptr_eq(&component.get_out_port("out").unwrap()));
}

#[test]
fn three_levels_outside_in() {
    // Producer side: outer > middle > sensor.
    let outer = module_with_port(Direction::Out, 1);
    let middle = module_with_port(Direction::Out, 1);
    let sensor = ComponentRef::new(ConstantComponent);
    sensor.make_out_port("out", 1);
    sensor.set_state("out", Value::from([7.0]));

    alias_out_port((&outer, "out"), (&middle, "out")).unwrap();
    alias_out_port((&middle, "out"), (&sensor, "out")).unwrap();
    middle.add_component("sensor", sensor.clone()).unwrap();
    outer.add_submodule("middle", middle.clone()).unwrap();

    // Consumer side: sink > stage > relay.
    let sink = module_with_port(Direction::In, 1);
    let stage = module_with_port(Direction::In, 1);
    let relay = ComponentRef::new(PipeComponent::new().with_map("in", "out"));
    relay.make_in_port("in", 1);
    relay.make_out_port("out", 1);

    alias_in_port((&sink, "in"), (&stage, "in")).unwrap();
    alias_in_port((&stage, "in"), (&relay, "in")).unwrap();
    stage.add_component("relay", relay.clone()).unwrap();
    sink.add_submodule("stage", stage.clone()).unwrap();

    // Connections come last.
    connect((&outer, "out"), (&sink, "in")).unwrap();

    let agent = Agent::new();
    agent.add_submodule("outer", outer.clone()).unwrap();
    agent.add_submodule("sink", sink).unwrap();
    assert_eq!(
        agent
            .snapshot()
            .paths()
            .collect::<Vec<_>>(),
        ["outer.middle.sensor", "sink.stage.relay"]
    );

    let mut scheduler = VirtualTimeSyncScheduler::new(&agent, 1);

    scheduler.step().unwrap();
    let expected = Value::from([7.0]);
    assert_eq!(sensor.get_out_port("out").unwrap().buffer(), expected);
    assert_eq!(middle.get_out_port("out").unwrap().buffer(), expected);
    assert_eq!(outer.get_out_port("out").unwrap().buffer(), expected);
    assert!(relay.get_out_port("out").unwrap().buffer().is_zero());

    scheduler.step().unwrap();
    assert_eq!(stage.get_in_port("in").unwrap().buffer(), expected);
    assert_eq!(relay.get_input("in").unwrap(), expected);
    assert_eq!(relay.get_out_port("out").unwrap().buffer(), expected);
}

#[test]
fn inside_out_is_rejected() {
    let outer = module_with_port(Direction::Out, 1);
    let middle = module_with_port(Direction::Out, 1);
    let sensor = ComponentRef::new(ConstantComponent);
    sensor.make_out_port("out", 1);

    alias_out_port((&middle, "out"), (&sensor, "out")).unwrap();

    assert_eq!(
        alias_out_port((&outer, "out"), (&middle, "out")),
        Err(Error::AliasOrder {
            direction: Direction::Out,
            name: "out".into()
        })
    );
    // The inner alias is left untouched.
    assert!(middle
        .get_out_port("out")
        .unwrap()
        .ptr_eq(&sensor.get_out_port("out").unwrap()));
}

#[test]
fn alias_requires_equal_lengths() {
    let module = module_with_port(Direction::In, 3);
    let component = ComponentRef::new(PipeComponent::new());
    component.make_in_port("in", 2);

    assert_eq!(
        alias_in_port((&module, "in"), (&component, "in")),
        Err(Error::LengthMismatch {
            expected: 2,
            actual: 3
        })
    );
}
