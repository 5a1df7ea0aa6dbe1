//! Session snapshot for observers

use serde::{Deserialize, Serialize};

use ball_crush_core::BoardSnapshot;
use ball_crush_types::CascadeState;

use crate::objectives::ObjectiveProgress;

/// Owned copy of everything an observer may show about a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub level: u32,
    pub state: CascadeState,
    pub score: u32,
    pub moves_left: u32,
    pub multiplier: u32,
    pub cascade_count: u32,
    pub pending_animations: u32,
    pub board: BoardSnapshot,
    pub objectives: Vec<ObjectiveProgress>,
}

impl SessionSnapshot {
    /// Percentage of objectives complete, 0-100
    pub fn completion(&self) -> u32 {
        if self.objectives.is_empty() {
            return 0;
        }
        let done = self.objectives.iter().filter(|o| o.is_complete()).count();
        (done * 100 / self.objectives.len()) as u32
    }
}
