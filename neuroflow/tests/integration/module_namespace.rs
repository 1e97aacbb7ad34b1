//! Child namespaces and tree queries of modules.

use neuroflow::component::{ComponentRef, NullComponent};
use neuroflow::error::{ChildKind, Error};
use neuroflow::module::{Agent, Module};

#[test]
fn component_then_submodule() {
    let module = Module::new();
    module
        .add_component("x", ComponentRef::new(NullComponent))
        .unwrap();

    assert_eq!(
        module.add_submodule("x", Module::new()),
        Err(Error::NameCollision {
            name: "x".into(),
            existing: ChildKind::Component
        })
    );
    assert!(module.get_submodule("x").is_err());
}

#[test]
fn submodule_then_component() {
    let module = Module::new();
    module.add_submodule("x", Module::new()).unwrap();

    assert_eq!(
        module.add_component("x", ComponentRef::new(NullComponent)),
        Err(Error::NameCollision {
            name: "x".into(),
            existing: ChildKind::Submodule
        })
    );
    assert!(module.get_component("x").is_err());
}

#[test]
fn removal_frees_the_name() {
    let module = Module::new();
    module.add_submodule("x", Module::new()).unwrap();
    module.remove_submodule("x").unwrap();

    module
        .add_component("x", ComponentRef::new(NullComponent))
        .unwrap();
    assert_eq!(
        module.remove_submodule("x").unwrap_err(),
        Error::MissingSubmodule("x".into())
    );
}

#[test]
fn containment_cycles_are_rejected() {
    let agent = Agent::new();
    let child = Module::new();
    let grandchild = Module::new();
    child.add_submodule("grandchild", grandchild.clone()).unwrap();
    agent.add_submodule("child", child.clone()).unwrap();

    assert!(matches!(
        grandchild.add_submodule("loop", agent.clone()),
        Err(Error::ContainmentCycle(_))
    ));
    assert!(matches!(
        agent.add_submodule("self", agent.clone()),
        Err(Error::ContainmentCycle(_))
    ));
}

#[test]
fn shared_component_is_listed_once() {
    let agent = Agent::new();
    let left = Module::new();
    let right = Module::new();
    let shared = ComponentRef::new(NullComponent);
    left.add_component("shared", shared.clone()).unwrap();
    right.add_component("shared", shared).unwrap();
    agent.add_submodule("left", left).unwrap();
    agent.add_submodule("right", right).unwrap();

    let components = agent.get_all_components();

    assert_eq!(components.len(), 1);
    assert_eq!(components[0].0, "left.shared");
    assert_eq!(
        agent
            .get_all_submodules()
            .into_iter()
            .map(|(path, _)| path)
            .collect::<Vec<_>>(),
        ["left", "right"]
    );
}

#[test]
fn dotted_lookup() {
    let agent = Agent::new();
    let child = Module::new();
    let grandchild = Module::new();
    child.add_submodule("grandchild", grandchild.clone()).unwrap();
    agent.add_submodule("child", child).unwrap();

    assert!(agent
        .get_submodule("child.grandchild")
        .unwrap()
        .ptr_eq(&grandchild));
    assert_eq!(
        agent.get_submodule("child.missing").unwrap_err(),
        Error::MissingSubmodule("child.missing".into())
    );
}
