#![forbid(unsafe_code)]

//! Member identity as seen by the layout engine.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Stable, unique, string-like member identifier.
///
/// Cloning is a reference-count bump; identifiers are copied into placements,
/// reports, and selection events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(Arc<str>);

impl MemberId {
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MemberId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl Borrow<str> for MemberId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Anything the layout engine can place.
///
/// Only the identifier matters to placement; display attributes stay with the
/// record owner.
pub trait Member {
    fn member_id(&self) -> &MemberId;
}

impl Member for MemberId {
    fn member_id(&self) -> &MemberId {
        self
    }
}

impl<M: Member + ?Sized> Member for &M {
    fn member_id(&self) -> &MemberId {
        (**self).member_id()
    }
}
