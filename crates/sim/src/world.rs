//! World state management.
//!
//! Owns the field and the roster of players standing on it.

use std::collections::BTreeMap;

use fieldtree::{Diagonal, Point};
use glam::IVec2;
use rand::Rng;
use tracing::debug;

use crate::config::GameConfig;
use crate::error::SimError;
use crate::field::Field;
use crate::player::{Colour, Player};

/// Side of the box that must be empty below-right of a fresh spawn point.
pub const SPAWN_CLEARANCE: u32 = 10;

/// Random locations tried before giving up on a spawn.
const SPAWN_ATTEMPTS: usize = 10_000;

/// The field together with every player in the game.
#[derive(Debug)]
pub struct World {
    pub field: Field,
    players: BTreeMap<String, Player>,
}

impl World {
    pub fn new(field: Field) -> Self {
        Self {
            field,
            players: BTreeMap::new(),
        }
    }

    /// Pick a random free point on the field.
    ///
    /// With `clearance`, the point is also rejected when anyone stands in the
    /// box spanning [`SPAWN_CLEARANCE`] units south and east of it.
    pub fn random_location<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        clearance: bool,
    ) -> Result<Point, SimError> {
        let bounds = self.field.bounds();
        for _ in 0..SPAWN_ATTEMPTS {
            let point = Point::new(
                rng.random_range(bounds.min.x..=bounds.max.x),
                rng.random_range(bounds.min.y..=bounds.max.y),
            );
            if self.field.contains_point(point) {
                continue;
            }
            if clearance {
                let corner = point.saturating_add(IVec2::splat(SPAWN_CLEARANCE as i32));
                let nearby =
                    self.field.names_in_range(corner, Diagonal::NorthWest, SPAWN_CLEARANCE);
                if !nearby.is_empty() {
                    continue;
                }
            }
            return Ok(point);
        }
        Err(SimError::FieldFull { attempts: SPAWN_ATTEMPTS })
    }

    /// Put `player` on the field at its current location.
    pub fn add_player(&mut self, player: Player) -> Result<(), SimError> {
        self.field.insert(player.name(), player.location())?;
        debug!(name = %player.name(), location = ?player.location(), "Spawned player");
        self.players.insert(player.name().to_string(), player);
        Ok(())
    }

    /// Spawn players `"0"` to `count - 1` with random vision and speed at
    /// well spaced locations. Returns their names in spawn order.
    pub fn spawn_roster<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        colour: Colour,
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<Vec<String>, SimError> {
        let mut names = Vec::with_capacity(count);
        for i in 0..count {
            let location = self.random_location(rng, true)?;
            let vision = rng.random_range(0..=config.max_vision);
            let speed = rng.random_range(1..=config.max_speed.max(1));
            let name = i.to_string();
            self.add_player(Player::new(name.clone(), location, colour, vision, speed))?;
            names.push(name);
        }
        Ok(names)
    }

    /// Take a player off the field and out of the game.
    pub fn remove_player(&mut self, name: &str) -> Option<Player> {
        self.field.remove(name);
        let removed = self.players.remove(name);
        if removed.is_some() {
            debug!(%name, "Removed player");
        }
        removed
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.get(name)
    }

    pub fn player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.get_mut(name)
    }

    /// Players in name order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.values_mut()
    }

    /// Player names in name order.
    pub fn names(&self) -> Vec<String> {
        self.players.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Let `name` look around and take one step.
    pub fn advance<R: Rng + ?Sized>(&mut self, name: &str, rng: &mut R) {
        if let Some(player) = self.players.get_mut(name) {
            player.next_direction(&self.field, rng);
            player.step(&mut self.field);
        }
    }

    /// Unordered pairs of players within `distance` of each other on both
    /// axes. Each pair is listed once, smaller name first.
    pub fn collisions(&self, distance: u32) -> Vec<(String, String)> {
        let reach = i32::try_from(distance).unwrap_or(i32::MAX);
        let mut pairs = Vec::new();
        for player in self.players.values() {
            let corner = player.location().saturating_add(IVec2::splat(reach));
            let span = distance.saturating_mul(2);
            for other in self.field.names_in_range(corner, Diagonal::NorthWest, span) {
                if other.as_str() > player.name() {
                    pairs.push((player.name().to_string(), other));
                }
            }
        }
        pairs.sort();
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldConfig, FieldKind};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn world(extent: i32) -> World {
        let config = FieldConfig { kind: FieldKind::Quad, extent, ..FieldConfig::default() };
        World::new(Field::new(&config))
    }

    #[test]
    fn test_spawn_roster_keeps_players_apart() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut world = world(500);
        let names = world
            .spawn_roster(30, Colour::Green, &GameConfig::default(), &mut rng)
            .unwrap();
        assert_eq!(names.len(), 30);
        assert_eq!(world.len(), 30);
        assert_eq!(world.field.len(), 30);

        for player in world.players() {
            assert_eq!(world.field.location(player.name()), Some(player.location()));
            assert!(player.speed() >= 1);
            assert!(player.vision() <= GameConfig::default().max_vision);
        }
    }

    #[test]
    fn test_spawn_fails_when_full() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut world = world(1);
        for (i, point) in [(0, 0), (0, 1), (1, 0), (1, 1)].into_iter().enumerate() {
            let point = Point::new(point.0, point.1);
            world.add_player(Player::new(i.to_string(), point, Colour::Green, 0, 1)).unwrap();
        }
        assert!(matches!(world.random_location(&mut rng, false), Err(SimError::FieldFull { .. })));
    }

    #[test]
    fn test_add_player_rejects_taken_point() {
        let mut world = world(100);
        world.add_player(Player::new("a", Point::new(5, 5), Colour::Green, 0, 1)).unwrap();
        let err = world
            .add_player(Player::new("b", Point::new(5, 5), Colour::Green, 0, 1))
            .unwrap_err();
        assert!(matches!(err, SimError::Tree(ref e) if e.is_out_of_bounds()));
        assert!(!world.contains("b"));
    }

    #[test]
    fn test_collisions_are_unique_pairs() {
        let mut world = world(100);
        for (name, x, y) in [("a", 10, 10), ("b", 12, 11), ("c", 11, 8), ("d", 50, 50)] {
            world.add_player(Player::new(name, Point::new(x, y), Colour::Green, 0, 1)).unwrap();
        }
        assert_eq!(
            world.collisions(2),
            vec![
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "c".to_string()),
            ]
        );
        assert!(world.collisions(0).is_empty());
    }

    #[test]
    fn test_remove_player() {
        let mut world = world(100);
        world.add_player(Player::new("a", Point::new(5, 5), Colour::Green, 0, 1)).unwrap();
        assert!(world.remove_player("a").is_some());
        assert!(world.remove_player("a").is_none());
        assert!(world.field.is_empty());
        assert!(world.is_empty());
    }
}
