use serde::{Deserialize, Serialize};

/// Credit type of a [`Person`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonKind {
    #[default]
    Actor,
    GuestStar,
    Director,
    Writer,
    Producer,
    Composer,
    Presenter,
}

/// A cast or crew credit attached to a metadata result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub name: String,
    pub kind: PersonKind,
    /// Character name for actors, job title for crew.
    pub role: Option<String>,
    pub sort_order: Option<i32>,
}

impl Person {
    pub fn new(name: impl Into<String>, kind: PersonKind) -> Self {
        Self {
            name: name.into(),
            kind,
            role: None,
            sort_order: None,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}
