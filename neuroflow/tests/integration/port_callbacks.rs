//! Callbacks observing port updates.

use std::cell::RefCell;
use std::rc::Rc;

use neuroflow::component::{ComponentRef, ConstantComponent, PipeComponent};
use neuroflow::module::{Agent, Module};
use neuroflow::ports::{Port, Value};
use neuroflow::scheduler::{Scheduler, VirtualTimeSyncScheduler};
use neuroflow::unit::{alias_in_port, connect, Unit};

fn recorder(port: &Port) -> Rc<RefCell<Vec<Value>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    port.register_callback(move |value| sink.borrow_mut().push(value.clone()));

    log
}

#[test]
fn sync_and_output_invoke_callbacks() {
    let source = ComponentRef::new(ConstantComponent);
    source.make_out_port("out", 1);
    source.set_state("out", Value::from([3.0]));
    let pipe = ComponentRef::new(PipeComponent::new().with_map("in", "out"));
    pipe.make_in_port("in", 1);
    pipe.make_out_port("out", 1);
    connect((&source, "out"), (&pipe, "in")).unwrap();

    let published = recorder(&source.get_out_port("out").unwrap());
    let received = recorder(&pipe.get_in_port("in").unwrap());

    let agent = Agent::new();
    agent.add_component("source", source).unwrap();
    agent.add_component("pipe", pipe).unwrap();
    let mut scheduler = VirtualTimeSyncScheduler::new(&agent, 1);

    scheduler.step().unwrap();
    assert_eq!(*published.borrow(), [Value::from([3.0])]);
    assert_eq!(*received.borrow(), [Value::zeros(1)]);

    scheduler.step().unwrap();
    assert_eq!(published.borrow().len(), 2);
    assert_eq!(received.borrow().last(), Some(&Value::from([3.0])));
}

#[test]
fn aliased_in_port_keeps_inner_callbacks() {
    let module = Module::new();
    module.make_in_port("in", 1);
    let inner = ComponentRef::new(PipeComponent::new());
    inner.make_in_port("in", 1);
    let inner_log = recorder(&inner.get_in_port("in").unwrap());
    let module_log = recorder(&module.get_in_port("in").unwrap());

    alias_in_port((&module, "in"), (&inner, "in")).unwrap();
    module
        .get_in_port("in")
        .unwrap()
        .set_buffer(Value::from([1.5]))
        .unwrap();

    assert_eq!(*module_log.borrow(), [Value::from([1.5])]);
    assert_eq!(*inner_log.borrow(), [Value::from([1.5])]);
}

#[test]
fn callback_may_query_its_component() {
    let component = ComponentRef::new(ConstantComponent);
    component.make_out_port("out", 1);
    component.set_state("out", Value::from([9.0]));

    let seen = Rc::new(RefCell::new(None));
    let (observer, slot) = (component.clone(), seen.clone());
    component
        .get_out_port("out")
        .unwrap()
        .register_callback(move |_| *slot.borrow_mut() = Some(observer.last_output_time()));

    component.input(4).unwrap();
    component.fire().unwrap();
    component.output(4).unwrap();

    assert_eq!(*seen.borrow(), Some(4));
}
