//! Hierarchical containers of components.
//!
//! A [`Module`] holds named components and named submodules. Component names
//! and submodule names share a single namespace within a module, so a name
//! can never designate both a component and a submodule.
//!
//! Schedulers do not walk the module tree at each step. Instead they iterate
//! over a [`Snapshot`], a flattened list of all components reachable from the
//! root module, taken by [`Module::snapshot()`]. Structural edits are only
//! observed after a new snapshot is taken, which can be detected with
//! [`Snapshot::is_stale()`].
//!
//! # Examples
//!
//! ```
//! use neuroflow::component::{ComponentRef, NullComponent};
//! use neuroflow::module::{Agent, Module};
//!
//! let agent = Agent::new();
//! let vision = Module::new();
//! vision.add_component("retina", ComponentRef::new(NullComponent)).unwrap();
//! agent.add_submodule("vision", vision).unwrap();
//!
//! let snapshot = agent.snapshot();
//! assert_eq!(snapshot.paths().collect::<Vec<_>>(), ["vision.retina"]);
//!
//! agent.add_component("motor", ComponentRef::new(NullComponent)).unwrap();
//! assert!(snapshot.is_stale(&agent));
//! ```

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::rc::Rc;
use std::slice;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::component::ComponentRef;
use crate::error::{ChildKind, Error};
use crate::unit::{Ports, Unit};

/// Structural revision numbers, unique across all modules.
static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// A shared handle to a container of components and submodules.
///
/// `Module`s are clonable. Their clones are shallow copies.
#[derive(Clone)]
pub struct Module {
    inner: Rc<RefCell<ModuleState>>,
}

/// The top-level module that roots a scheduler.
pub type Agent = Module;

struct ModuleState {
    ports: Ports,
    components: BTreeMap<String, ComponentRef>,
    submodules: BTreeMap<String, Module>,
    revision: u64,
}

impl Module {
    /// Creates an empty module without ports.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ModuleState {
                ports: Ports::new(),
                components: BTreeMap::new(),
                submodules: BTreeMap::new(),
                revision: next_revision(),
            })),
        }
    }

    /// Adds a component, replacing any component registered under the same
    /// name.
    ///
    /// An error is returned if a submodule is registered under this name.
    pub fn add_component(&self, name: &str, component: ComponentRef) -> Result<(), Error> {
        let mut state = self.inner.borrow_mut();
        if state.submodules.contains_key(name) {
            return Err(Error::NameCollision {
                name: name.to_owned(),
                existing: ChildKind::Submodule,
            });
        }
        state.components.insert(name.to_owned(), component);
        state.revision = next_revision();

        Ok(())
    }

    /// Returns a handle to the named component.
    pub fn get_component(&self, name: &str) -> Result<ComponentRef, Error> {
        self.inner
            .borrow()
            .components
            .get(name)
            .cloned()
            .ok_or_else(|| Error::MissingComponent(name.to_owned()))
    }

    /// Removes the named component.
    pub fn remove_component(&self, name: &str) -> Result<ComponentRef, Error> {
        let mut state = self.inner.borrow_mut();
        let component = state
            .components
            .remove(name)
            .ok_or_else(|| Error::MissingComponent(name.to_owned()))?;
        state.revision = next_revision();

        Ok(component)
    }

    /// Adds a submodule, replacing any submodule registered under the same
    /// name.
    ///
    /// An error is returned if a component is registered under this name or
    /// if the submodule is, or contains, this module.
    pub fn add_submodule(&self, name: &str, submodule: Module) -> Result<(), Error> {
        if submodule.ptr_eq(self) || submodule.contains(self) {
            return Err(Error::ContainmentCycle(name.to_owned()));
        }
        let mut state = self.inner.borrow_mut();
        if state.components.contains_key(name) {
            return Err(Error::NameCollision {
                name: name.to_owned(),
                existing: ChildKind::Component,
            });
        }
        state.submodules.insert(name.to_owned(), submodule);
        state.revision = next_revision();

        Ok(())
    }

    /// Returns a handle to the submodule designated by a dotted path such as
    /// `"vision.retina"`.
    pub fn get_submodule(&self, path: &str) -> Result<Module, Error> {
        let missing = || Error::MissingSubmodule(path.to_owned());

        let mut module = self.clone();
        for name in path.split('.') {
            let child = module.inner.borrow().submodules.get(name).cloned();
            module = child.ok_or_else(missing)?;
        }

        Ok(module)
    }

    /// Removes the named direct submodule.
    pub fn remove_submodule(&self, name: &str) -> Result<Module, Error> {
        let mut state = self.inner.borrow_mut();
        let submodule = state
            .submodules
            .remove(name)
            .ok_or_else(|| Error::MissingSubmodule(name.to_owned()))?;
        state.revision = next_revision();

        Ok(submodule)
    }

    /// Returns all submodules reachable from this module with their dotted
    /// paths, in depth-first order.
    ///
    /// A submodule reachable through several paths is only listed once,
    /// under the first path found.
    pub fn get_all_submodules(&self) -> Vec<(String, Module)> {
        let mut visited = HashSet::new();
        let mut submodules = Vec::new();
        self.collect_submodules("", &mut visited, &mut submodules);

        submodules
    }

    fn collect_submodules(
        &self,
        prefix: &str,
        visited: &mut HashSet<usize>,
        submodules: &mut Vec<(String, Module)>,
    ) {
        let children: Vec<(String, Module)> = self
            .inner
            .borrow()
            .submodules
            .iter()
            .map(|(name, module)| (join(prefix, name), module.clone()))
            .collect();

        for (path, module) in children {
            if visited.insert(module.addr()) {
                submodules.push((path.clone(), module.clone()));
                module.collect_submodules(&path, visited, submodules);
            }
        }
    }

    /// Returns all components reachable from this module with their dotted
    /// paths.
    ///
    /// Components of a module are listed in name order before those of its
    /// submodules, which are visited depth-first in name order. A component
    /// reachable through several paths is only listed once, under the first
    /// path found.
    pub fn get_all_components(&self) -> Vec<(String, ComponentRef)> {
        let mut visited_modules = HashSet::new();
        let mut visited_components = HashSet::new();
        let mut components = Vec::new();
        self.collect_components(
            "",
            &mut visited_modules,
            &mut visited_components,
            &mut components,
        );

        components
    }

    fn collect_components(
        &self,
        prefix: &str,
        visited_modules: &mut HashSet<usize>,
        visited_components: &mut HashSet<usize>,
        components: &mut Vec<(String, ComponentRef)>,
    ) {
        if !visited_modules.insert(self.addr()) {
            return;
        }
        let (own, children): (Vec<_>, Vec<_>) = {
            let state = self.inner.borrow();
            (
                state
                    .components
                    .iter()
                    .map(|(name, component)| (join(prefix, name), component.clone()))
                    .collect(),
                state
                    .submodules
                    .iter()
                    .map(|(name, module)| (join(prefix, name), module.clone()))
                    .collect(),
            )
        };

        for (path, component) in own {
            if visited_components.insert(component.addr()) {
                components.push((path, component));
            }
        }
        for (path, module) in children {
            module.collect_components(&path, visited_modules, visited_components, components);
        }
    }

    /// Takes a snapshot of all components reachable from this module.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.revision(),
            entries: self.get_all_components().into(),
        }
    }

    /// Returns the latest structural revision of this module and all its
    /// submodules.
    ///
    /// Revisions are globally unique and increase with each structural edit
    /// (addition or removal of a component or submodule) anywhere in the
    /// tree.
    pub fn revision(&self) -> u64 {
        let state = self.inner.borrow();

        state
            .submodules
            .values()
            .map(Module::revision)
            .fold(state.revision, u64::max)
    }

    /// Returns `true` if `other` is a submodule of this module at any depth.
    pub fn contains(&self, other: &Module) -> bool {
        self.inner
            .borrow()
            .submodules
            .values()
            .any(|child| child.ptr_eq(other) || child.contains(other))
    }

    /// Returns `true` if both handles refer to the same module.
    pub fn ptr_eq(&self, other: &Module) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }
}

impl Default for Module {
    fn default() -> Self {
        Self::new()
    }
}

impl Unit for Module {
    fn ports(&self) -> Ref<'_, Ports> {
        Ref::map(self.inner.borrow(), |state| &state.ports)
    }

    fn ports_mut(&self) -> RefMut<'_, Ports> {
        RefMut::map(self.inner.borrow_mut(), |state| &mut state.ports)
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(state) => f
                .debug_struct("Module")
                .field("ports", &state.ports)
                .field("components", &state.components.keys().collect::<Vec<_>>())
                .field("submodules", &state.submodules)
                .finish_non_exhaustive(),
            Err(_) => f.write_str("Module { <borrowed> }"),
        }
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}.{name}")
    }
}

/// A flattened, immutable list of components taken from a module tree.
///
/// Snapshots are cheap to clone. They keep the components alive but do not
/// track later structural edits of the tree.
#[derive(Clone, Debug)]
pub struct Snapshot {
    revision: u64,
    entries: Rc<[(String, ComponentRef)]>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            revision: 0,
            entries: Rc::from(Vec::new()),
        }
    }
}

impl Snapshot {
    /// Returns the revision of the tree when the snapshot was taken.
    ///
    /// An empty default snapshot has revision 0, which is never the revision
    /// of a module.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns `true` if the module tree changed since the snapshot was taken.
    pub fn is_stale(&self, root: &Module) -> bool {
        root.revision() != self.revision
    }

    /// Returns the number of components.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the snapshot has no component.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the component registered under a dotted path.
    pub fn get(&self, path: &str) -> Option<&ComponentRef> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, component)| component)
    }

    /// Iterates over the dotted paths and components.
    pub fn iter(&self) -> slice::Iter<'_, (String, ComponentRef)> {
        self.entries.iter()
    }

    /// Returns the dotted paths and components as a slice.
    pub fn as_slice(&self) -> &[(String, ComponentRef)] {
        &self.entries
    }

    /// Iterates over the dotted paths.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(path, _)| path.as_str())
    }

    /// Iterates over the components.
    pub fn components(&self) -> impl Iterator<Item = &ComponentRef> {
        self.entries.iter().map(|(_, component)| component)
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a (String, ComponentRef);
    type IntoIter = slice::Iter<'a, (String, ComponentRef)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
