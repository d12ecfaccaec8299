//! Named scene items the orbit camera can follow

use std::collections::BTreeMap;

use nalgebra::Vector3;

use lidarview_core::{Error, Result, RigidTransform};

/// Name that selects no follow target
pub const FOLLOW_NONE: &str = "none";

/// World poses of followable items, e.g. axis markers riding on a vehicle
#[derive(Debug, Clone, Default)]
pub struct FollowTargets {
    items: BTreeMap<String, RigidTransform>,
    followed: Option<String>,
}

impl FollowTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item, or update its pose if the name is already known
    pub fn set_pose(&mut self, name: impl Into<String>, pose: RigidTransform) {
        self.items.insert(name.into(), pose);
    }

    /// Remove an item; following it stops
    pub fn remove(&mut self, name: &str) -> Option<RigidTransform> {
        if self.followed.as_deref() == Some(name) {
            log::debug!("Followed item '{}' removed", name);
            self.followed = None;
        }
        self.items.remove(name)
    }

    /// Remove every item and stop following
    pub fn clear(&mut self) {
        self.items.clear();
        self.followed = None;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Selectable names, starting with [`FOLLOW_NONE`]
    pub fn names(&self) -> Vec<&str> {
        std::iter::once(FOLLOW_NONE)
            .chain(self.items.keys().map(String::as_str))
            .collect()
    }

    /// Follow the named item, or nothing for [`FOLLOW_NONE`]
    pub fn follow(&mut self, name: &str) -> Result<()> {
        if name == FOLLOW_NONE {
            self.followed = None;
        } else if self.items.contains_key(name) {
            self.followed = Some(name.to_string());
        } else {
            return Err(Error::InvalidInput(format!("no followable item named '{}'", name)));
        }
        log::debug!("Following {}", name);
        Ok(())
    }

    pub fn followed(&self) -> Option<&str> {
        self.followed.as_deref()
    }

    /// World position of the followed item
    pub fn target(&self) -> Option<Vector3<f64>> {
        let name = self.followed.as_ref()?;
        self.items.get(name).map(RigidTransform::translation_part)
    }
}
