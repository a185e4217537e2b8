use serde::{Deserialize, Serialize};

use super::{GeofenceId, GroupId, Region};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    pub id: GeofenceId,
    pub group_id: GroupId,
    pub name: String,
    pub region: Region,
    pub active: bool,
}
