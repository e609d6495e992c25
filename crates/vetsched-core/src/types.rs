use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minutes in a day. Working hours and slot boundaries lie in `0..=MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Opaque identity of a business object (schedule, act, clinician, view).
///
/// Two references are equal when they identify the same object; nothing
/// else about the object is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(Uuid);

impl Reference {
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Creates a reference to a freshly identified object.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for Reference {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
