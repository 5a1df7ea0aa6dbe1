//! Level objective tracking

use serde::{Deserialize, Serialize};

use ball_crush_config::ObjectiveDef;
use ball_crush_types::ObjectiveId;

/// Progress toward one objective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveProgress {
    pub id: ObjectiveId,
    pub current: u32,
    pub target: u32,
}

impl ObjectiveProgress {
    pub fn is_complete(&self) -> bool {
        self.current >= self.target
    }
}

/// Receives objective signals from the coordinator
///
/// Ids are `score`, `collect_<color>`, `special_<kind>` and `obstacle_<name>`.
pub trait ObjectiveTracker {
    fn increment(&mut self, id: &ObjectiveId, amount: u32);

    fn all_complete(&self) -> bool;

    fn progress(&self) -> Vec<ObjectiveProgress> {
        Vec::new()
    }
}

/// Tracker for a fixed set of targets
///
/// Signals for ids without a target are ignored; progress saturates at the target.
/// An empty tracker is never complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Objectives {
    entries: Vec<ObjectiveProgress>,
}

impl Objectives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_defs(defs: &[ObjectiveDef]) -> Self {
        let mut objectives = Self::new();
        for def in defs {
            objectives.add(def.id(), def.target());
        }
        objectives
    }

    /// Add a target; a repeated id keeps the larger target
    pub fn add(&mut self, id: ObjectiveId, target: u32) {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => entry.target = entry.target.max(target),
            None => self.entries.push(ObjectiveProgress {
                id,
                current: 0,
                target,
            }),
        }
    }

    pub fn get(&self, id: &ObjectiveId) -> Option<&ObjectiveProgress> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ObjectiveTracker for Objectives {
    fn increment(&mut self, id: &ObjectiveId, amount: u32) {
        if let Some(entry) = self.entries.iter_mut().find(|e| &e.id == id) {
            entry.current = entry.current.saturating_add(amount).min(entry.target);
        }
    }

    fn all_complete(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(ObjectiveProgress::is_complete)
    }

    fn progress(&self) -> Vec<ObjectiveProgress> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ball_crush_types::Color;

    #[test]
    fn completes_when_every_target_is_met() {
        let mut objectives = Objectives::from_defs(&[
            ObjectiveDef::Score { target: 100 },
            ObjectiveDef::CollectColor {
                color: Color::Red,
                target: 5,
            },
        ]);
        objectives.increment(&ObjectiveId::score(), 150);
        assert!(!objectives.all_complete());

        objectives.increment(&ObjectiveId::collect(Color::Red), 3);
        objectives.increment(&ObjectiveId::collect(Color::Red), 3);
        assert!(objectives.all_complete());

        let score = objectives.get(&ObjectiveId::score()).unwrap();
        assert_eq!(score.current, 100);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut objectives = Objectives::new();
        objectives.add(ObjectiveId::obstacle("ice"), 2);
        objectives.increment(&ObjectiveId::obstacle("stone"), 5);
        assert_eq!(objectives.get(&ObjectiveId::obstacle("ice")).unwrap().current, 0);
    }

    #[test]
    fn empty_tracker_is_never_complete() {
        assert!(!Objectives::new().all_complete());
    }
}
