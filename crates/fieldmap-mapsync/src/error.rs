use thiserror::Error;

use crate::registry::ViewId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// A second live instance was requested for a mounted view.
    #[error("map view {view} already has a live instance")]
    InstantiationConflict { view: ViewId },
}
