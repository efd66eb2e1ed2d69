//! Live map views. A view holds at most one backend instance at a time.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Identifier of a mounted search view, e.g. `"events"` or `"stores"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewId(String);

impl ViewId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ViewId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ViewId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared, single-threaded set of views with a live map instance.
#[derive(Debug, Clone, Default)]
pub struct MapRegistry {
    live: Rc<RefCell<HashSet<ViewId>>>,
}

impl MapRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_live(&self, view: &ViewId) -> bool {
        self.live.borrow().contains(view)
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.borrow().len()
    }

    /// Claims `view`. Returns `None` if it is already live.
    pub(crate) fn claim(&self, view: ViewId) -> Option<Registration> {
        if !self.live.borrow_mut().insert(view.clone()) {
            return None;
        }
        Some(Registration {
            registry: self.clone(),
            view,
        })
    }
}

/// Claim on a view; released on drop.
#[derive(Debug)]
pub(crate) struct Registration {
    registry: MapRegistry,
    view: ViewId,
}

impl Registration {
    pub(crate) fn view(&self) -> &ViewId {
        &self.view
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.live.borrow_mut().remove(&self.view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_is_refused_while_first_is_held() {
        let registry = MapRegistry::new();
        let first = registry.claim("events".into());
        assert!(first.is_some());
        assert!(registry.claim("events".into()).is_none());
        assert!(registry.claim("stores".into()).is_some_and(|r| r.view().as_str() == "stores"));
    }

    #[test]
    fn dropping_registration_frees_the_view() {
        let registry = MapRegistry::new();
        let view = ViewId::from("events");
        let claim = registry.claim(view.clone());
        assert!(registry.is_live(&view));
        drop(claim);
        assert!(!registry.is_live(&view));
        assert_eq!(registry.live_count(), 0);
        assert!(registry.claim(view).is_some());
    }
}
