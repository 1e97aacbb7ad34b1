//! Monotonicity of the input and output times of components.

use neuroflow::component::{ComponentRef, ConstantComponent};
use neuroflow::error::Error;
use neuroflow::ports::Value;
use neuroflow::time::Time;
use neuroflow::unit::Unit;
use proptest::prelude::*;

fn component() -> ComponentRef {
    let component = ComponentRef::new(ConstantComponent);
    component.make_out_port("out", 1);
    component.set_state("out", Value::from([1.0]));

    component
}

#[derive(Clone, Copy, Debug)]
enum Call {
    Input(Time),
    Output(Time),
}

fn call() -> impl Strategy<Value = Call> {
    prop_oneof![
        (0..50u64).prop_map(Call::Input),
        (0..50u64).prop_map(Call::Output),
    ]
}

proptest! {
    #[test]
    fn past_times_are_rejected(calls in prop::collection::vec(call(), 1..40)) {
        let component = component();
        let (mut last_input, mut last_output) = (0, 0);

        for call in calls {
            match call {
                Call::Input(time) => {
                    let result = component.input(time);
                    if time < last_input {
                        prop_assert_eq!(
                            result,
                            Err(Error::InputTimeTravel { time, last: last_input })
                        );
                    } else {
                        prop_assert!(result.is_ok());
                        last_input = time;
                    }
                }
                Call::Output(time) => {
                    let result = component.output(time);
                    if time < last_output {
                        prop_assert_eq!(
                            result,
                            Err(Error::OutputTimeTravel { time, last: last_output })
                        );
                    } else {
                        prop_assert!(result.is_ok());
                        last_output = time;
                    }
                }
            }
            prop_assert_eq!(component.last_input_time(), last_input);
            prop_assert_eq!(component.last_output_time(), last_output);
        }
    }
}

#[test]
fn fresh_ports_hold_zeros() {
    let component = component();
    component.make_in_port("in", 4);

    assert_eq!(component.get_in_port("in").unwrap().buffer(), Value::zeros(4));
    assert_eq!(component.get_out_port("out").unwrap().buffer(), Value::zeros(1));
}

#[test]
fn equal_times_are_accepted() {
    let component = component();

    component.input(3).unwrap();
    component.input(3).unwrap();
    component.output(3).unwrap();
    component.output(3).unwrap();

    assert_eq!(component.last_input_time(), 3);
    assert_eq!(component.last_output_time(), 3);
}
