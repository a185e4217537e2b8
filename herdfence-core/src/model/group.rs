use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{DeviceId, GroupId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub members: BTreeSet<DeviceId>,
}

impl Group {
    pub fn new(id: GroupId, name: &str) -> Group {
        Group {
            id,
            name: name.to_string(),
            description: None,
            members: BTreeSet::new(),
        }
    }

    pub fn with_members(mut self, members: impl IntoIterator<Item = DeviceId>) -> Group {
        self.members.extend(members);
        self
    }
}
