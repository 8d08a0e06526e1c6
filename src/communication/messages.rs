use crate::shared_data::FleetSnapshot;
use serde::{Deserialize, Serialize};

/// What the tracker tells the outside world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackerMessage {
    SessionStarted { session: u64, routes: Vec<String> },
    FleetUpdated(FleetSnapshot),
    SessionEnded { session: u64 },
}

impl TrackerMessage {
    pub fn session(&self) -> u64 {
        match self {
            TrackerMessage::SessionStarted { session, .. } => *session,
            TrackerMessage::FleetUpdated(snapshot) => snapshot.session,
            TrackerMessage::SessionEnded { session } => *session,
        }
    }
}
