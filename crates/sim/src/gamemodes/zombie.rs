use super::{GameMode, bounce};
use crate::config::GameConfig;
use crate::error::SimError;
use crate::player::{Colour, Player};
use crate::world::World;
use rand::rngs::StdRng;
use std::collections::BTreeSet;
use tracing::debug;

/// Zombie tag: a slow zombie turns every human it touches.
pub struct Zombie {
    zombies: BTreeSet<String>,
}

impl Zombie {
    pub fn new() -> Self {
        Self {
            zombies: BTreeSet::new(),
        }
    }

    pub fn is_zombie(&self, name: &str) -> bool {
        self.zombies.contains(name)
    }

    fn humans(&self, world: &World) -> Vec<String> {
        world
            .players()
            .map(|player| player.name().to_string())
            .filter(|name| !self.zombies.contains(name))
            .collect()
    }

    /// Enlist `zombie`: chases every human, fled by every human.
    fn enlist(&mut self, world: &mut World, zombie: &str) {
        self.zombies.insert(zombie.to_string());
        let humans = self.humans(world);
        for player in world.players_mut() {
            if player.name() == zombie {
                player.clear_targets();
                for enemy in player.enemies().to_vec() {
                    player.ignore_enemy(&enemy);
                }
                for human in &humans {
                    player.select_target(human);
                }
            } else if self.zombies.contains(player.name()) {
                player.ignore_target(zombie);
            } else {
                player.select_enemy(zombie);
            }
        }
    }

    fn infect(&mut self, world: &mut World, name: &str) {
        debug!(%name, "Infected");
        self.enlist(world, name);
        if let Some(player) = world.player_mut(name) {
            player.set_speed(1);
            player.set_colour(Colour::Purple);
        }
    }
}

impl Default for Zombie {
    fn default() -> Self {
        Self::new()
    }
}

impl GameMode for Zombie {
    fn name(&self) -> &str {
        "Zombie Tag"
    }

    fn setup(
        &mut self,
        world: &mut World,
        config: &GameConfig,
        rng: &mut StdRng,
    ) -> Result<(), SimError> {
        world.spawn_roster(config.players, Colour::Green, config, rng)?;
        let location = world.random_location(rng, false)?;
        let name = config.players.to_string();
        let zombie = Player::new(name.clone(), location, Colour::Purple, config.max_vision, 1);
        world.add_player(zombie)?;
        self.enlist(world, &name);
        Ok(())
    }

    fn handle_collision(&mut self, world: &mut World, first: &str, second: &str) {
        match (self.is_zombie(first), self.is_zombie(second)) {
            (true, false) => self.infect(world, second),
            (false, true) => self.infect(world, first),
            _ => {}
        }
        bounce(world, first, second);
    }

    fn check_for_winner(&mut self, world: &mut World) -> Option<String> {
        if self.humans(world).is_empty() {
            Some("zombies".to_string())
        } else {
            Some("humans".to_string())
        }
    }
}
