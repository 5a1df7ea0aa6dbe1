//! Obstacle definitions and the registry that owns them
//!
//! Game logic never inspects an obstacle's name; it reads the behaviour flags and damage
//! table of the definition its [`ObstacleKind`] points at. The registry is built once at
//! session start and shared immutably by the board and the cascade coordinator.

use serde::{Deserialize, Serialize};

use crate::ObstacleKind;

/// What caused an obstacle to take damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageTrigger {
    /// A plain match (or special clear) happened in a 4-neighbour cell
    AdjacentMatch,
    /// A special activation reached the obstacle's own cell
    SpecialHit,
}

/// Damage taken per trigger; zero or negative means immune to that trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageTable {
    pub adjacent_match: i32,
    pub special_hit: i32,
}

impl DamageTable {
    pub fn amount(&self, trigger: DamageTrigger) -> i32 {
        match trigger {
            DamageTrigger::AdjacentMatch => self.adjacent_match,
            DamageTrigger::SpecialHit => self.special_hit,
        }
    }
}

/// Presentation hint attached to hit/destroy notifications
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    pub shake_intensity: f32,
    pub shake_duration_ms: u32,
    pub particle_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleEffects {
    pub hit: EffectDescriptor,
    pub destroy: EffectDescriptor,
}

/// Behaviour of one obstacle kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDef {
    /// Registry name, used in level configs and objective ids
    pub name: String,
    pub display_name: String,
    /// Starting hit points
    pub hp: u32,
    /// Anchored in place during gravity
    pub immovable: bool,
    /// A hosted piece may take part in color runs
    pub matchable: bool,
    /// The player may select/swap this cell
    pub swappable: bool,
    /// Hosts a piece that is revealed when the obstacle is destroyed
    pub contains_piece: bool,
    pub damage: DamageTable,
    pub effects: ObstacleEffects,
}

impl ObstacleDef {
    /// Immovable solid block with no piece underneath
    pub fn stone() -> Self {
        Self {
            name: "stone".to_string(),
            display_name: "Stone".to_string(),
            hp: 2,
            immovable: true,
            matchable: false,
            swappable: false,
            contains_piece: false,
            damage: DamageTable {
                adjacent_match: 1,
                special_hit: 1,
            },
            effects: ObstacleEffects {
                hit: EffectDescriptor {
                    shake_intensity: 2.0,
                    shake_duration_ms: 150,
                    particle_count: 4,
                },
                destroy: EffectDescriptor {
                    shake_intensity: 3.0,
                    shake_duration_ms: 200,
                    particle_count: 8,
                },
            },
        }
    }

    /// Frozen overlay on top of a piece
    pub fn ice() -> Self {
        Self {
            name: "ice".to_string(),
            display_name: "Ice".to_string(),
            hp: 1,
            immovable: false,
            matchable: false,
            swappable: false,
            contains_piece: true,
            damage: DamageTable {
                adjacent_match: 1,
                special_hit: 1,
            },
            effects: ObstacleEffects {
                hit: EffectDescriptor {
                    shake_intensity: 1.0,
                    shake_duration_ms: 100,
                    particle_count: 3,
                },
                destroy: EffectDescriptor {
                    shake_intensity: 2.0,
                    shake_duration_ms: 150,
                    particle_count: 6,
                },
            },
        }
    }
}

/// Immutable lookup table from [`ObstacleKind`] to its definition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleRegistry {
    defs: Vec<ObstacleDef>,
}

impl ObstacleRegistry {
    /// Empty registry (boards without obstacles)
    pub fn new() -> Self {
        Self { defs: Vec::new() }
    }

    /// Registry holding `stone` and `ice`
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(ObstacleDef::stone());
        registry.register(ObstacleDef::ice());
        registry
    }

    /// Add a definition and return its key; a definition with the same name is replaced
    pub fn register(&mut self, def: ObstacleDef) -> ObstacleKind {
        if let Some(kind) = self.lookup(&def.name) {
            self.defs[kind.0 as usize] = def;
            return kind;
        }
        self.defs.push(def);
        ObstacleKind((self.defs.len() - 1) as u8)
    }

    pub fn get(&self, kind: ObstacleKind) -> Option<&ObstacleDef> {
        self.defs.get(kind.0 as usize)
    }

    /// Find a kind by registry name
    pub fn lookup(&self, name: &str) -> Option<ObstacleKind> {
        self.defs
            .iter()
            .position(|d| d.name == name)
            .map(|i| ObstacleKind(i as u8))
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObstacleKind, &ObstacleDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, d)| (ObstacleKind(i as u8), d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_lookup() {
        let registry = ObstacleRegistry::standard();
        let stone = registry.lookup("stone").unwrap();
        let ice = registry.lookup("ice").unwrap();

        assert_ne!(stone, ice);
        assert!(registry.get(stone).unwrap().immovable);
        assert!(registry.get(ice).unwrap().contains_piece);
        assert_eq!(registry.lookup("lava"), None);
    }

    #[test]
    fn register_same_name_replaces() {
        let mut registry = ObstacleRegistry::standard();
        let mut tough = ObstacleDef::stone();
        tough.hp = 5;

        let kind = registry.register(tough);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(kind).unwrap().hp, 5);
    }

    #[test]
    fn damage_table_per_trigger() {
        let table = DamageTable {
            adjacent_match: 0,
            special_hit: 3,
        };
        assert_eq!(table.amount(DamageTrigger::AdjacentMatch), 0);
        assert_eq!(table.amount(DamageTrigger::SpecialHit), 3);
    }
}
