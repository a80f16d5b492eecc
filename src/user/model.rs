use serde::{Deserialize, Serialize};

use super::Id;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    pub id: Id,
    pub name: String,
    pub avatar_url: String,
}

impl Profile {
    pub fn new(id: Id, name: impl Into<String>, avatar_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            avatar_url: avatar_url.into(),
        }
    }
}
