// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Dispose-then-construct lifecycle for the map instance.
//!
//! The map is derived entirely from [`MapInputs`]. Every frame the current
//! inputs are compared with the ones the live instance was built from; any
//! difference drops the old instance first and only then builds a new one,
//! so at most one instance exists at any time.

use log::{debug, info};
use owm_client::Coordinates;

/// Everything a map instance is derived from
#[derive(Debug, Clone, PartialEq)]
pub struct MapInputs {
    /// Bumped on every successful lookup, so re-fetching the same city
    /// still yields new inputs.
    pub revision: u64,
    pub coordinates: Coordinates,
    /// Popup text for the marker
    pub label: String,
}

/// What [`MapLifecycle::sync`] did this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Inputs unchanged, live instance (or absence of one) kept
    Unchanged,
    /// No instance before, one now
    Built,
    /// Previous instance disposed, replacement built
    Rebuilt,
    /// Previous instance disposed, none now
    TornDown,
}

/// Owns at most one map instance of type `T`
pub struct MapLifecycle<T> {
    active: Option<(MapInputs, T)>,
    instances_built: u64,
}

impl<T> std::fmt::Debug for MapLifecycle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapLifecycle")
            .field("inputs", &self.active.as_ref().map(|(inputs, _)| inputs))
            .field("instances_built", &self.instances_built)
            .finish()
    }
}

impl<T> Default for MapLifecycle<T> {
    fn default() -> Self {
        Self {
            active: None,
            instances_built: 0,
        }
    }
}

impl<T> MapLifecycle<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the live instance in line with `inputs`.
    ///
    /// `build` receives the inputs and a 1-based instance number. It is only
    /// called after any previous instance has been dropped.
    pub fn sync<F>(&mut self, inputs: Option<&MapInputs>, build: F) -> Transition
    where
        F: FnOnce(&MapInputs, u64) -> T,
    {
        let current = self.active.as_ref().map(|(active_inputs, _)| active_inputs);
        if current == inputs {
            return Transition::Unchanged;
        }

        let had_instance = self.dispose();

        let Some(inputs) = inputs else {
            debug!("Map inputs cleared");
            return Transition::TornDown;
        };

        self.instances_built += 1;
        info!(
            "Building map #{} for '{}' at ({}, {})",
            self.instances_built, inputs.label, inputs.coordinates.lat, inputs.coordinates.lon
        );
        let instance = build(inputs, self.instances_built);
        self.active = Some((inputs.clone(), instance));

        if had_instance {
            Transition::Rebuilt
        } else {
            Transition::Built
        }
    }

    /// Drop the live instance, if any. Returns whether one existed.
    pub fn dispose(&mut self) -> bool {
        match self.active.take() {
            Some((inputs, instance)) => {
                info!("Disposing map for '{}' (revision {})", inputs.label, inputs.revision);
                drop(instance);
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    #[cfg(test)]
    pub fn inputs(&self) -> Option<&MapInputs> {
        self.active.as_ref().map(|(inputs, _)| inputs)
    }

    pub fn instance_mut(&mut self) -> Option<&mut T> {
        self.active.as_mut().map(|(_, instance)| instance)
    }

    /// Number of instances built over the lifetime of this owner
    #[cfg(test)]
    pub fn instances_built(&self) -> u64 {
        self.instances_built
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records construction and disposal order into a shared log
    struct Tracked {
        id: u64,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.log.borrow_mut().push(format!("dispose {}", self.id));
        }
    }

    fn london(revision: u64) -> MapInputs {
        MapInputs {
            revision,
            coordinates: Coordinates::new(51.5, -0.12),
            label: "London".to_string(),
        }
    }

    fn build_tracked(log: &Rc<RefCell<Vec<String>>>) -> impl FnOnce(&MapInputs, u64) -> Tracked + '_ {
        move |_, id| {
            log.borrow_mut().push(format!("build {id}"));
            Tracked {
                id,
                log: Rc::clone(log),
            }
        }
    }

    #[test]
    fn test_no_inputs_no_map() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut lifecycle: MapLifecycle<Tracked> = MapLifecycle::new();
        assert_eq!(lifecycle.sync(None, build_tracked(&log)), Transition::Unchanged);
        assert!(!lifecycle.is_active());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_build_once_for_same_inputs() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut lifecycle = MapLifecycle::new();
        let inputs = london(1);

        assert_eq!(lifecycle.sync(Some(&inputs), build_tracked(&log)), Transition::Built);
        assert_eq!(lifecycle.sync(Some(&inputs), build_tracked(&log)), Transition::Unchanged);
        assert_eq!(lifecycle.instances_built(), 1);
        assert_eq!(*log.borrow(), vec!["build 1"]);
        assert_eq!(lifecycle.inputs(), Some(&inputs));
    }

    #[test]
    fn test_refetch_disposes_before_building() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut lifecycle = MapLifecycle::new();

        lifecycle.sync(Some(&london(1)), build_tracked(&log));
        // Same city, new successful lookup
        let transition = lifecycle.sync(Some(&london(2)), build_tracked(&log));

        assert_eq!(transition, Transition::Rebuilt);
        assert_eq!(*log.borrow(), vec!["build 1", "dispose 1", "build 2"]);
        assert_eq!(lifecycle.instance_mut().map(|p| p.id), Some(2));
    }

    #[test]
    fn test_inputs_cleared_tears_down() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut lifecycle = MapLifecycle::new();

        lifecycle.sync(Some(&london(1)), build_tracked(&log));
        assert_eq!(lifecycle.sync(None, build_tracked(&log)), Transition::TornDown);

        assert!(!lifecycle.is_active());
        assert_eq!(*log.borrow(), vec!["build 1", "dispose 1"]);
    }

    #[test]
    fn test_drop_of_owner_disposes_instance() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut lifecycle = MapLifecycle::new();
            lifecycle.sync(Some(&london(1)), build_tracked(&log));
        }
        assert_eq!(*log.borrow(), vec!["build 1", "dispose 1"]);
    }
}
