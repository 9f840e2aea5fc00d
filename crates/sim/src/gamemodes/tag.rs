use super::{GameMode, bounce};
use crate::config::GameConfig;
use crate::error::SimError;
use crate::player::Colour;
use crate::world::World;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

/// Classic tag: one player is "it" and chases everyone else.
pub struct Tag {
    it: Option<String>,
}

impl Tag {
    pub fn new() -> Self {
        Self { it: None }
    }

    pub fn it(&self) -> Option<&str> {
        self.it.as_deref()
    }

    /// Make `name` "it": purple, chasing everyone, fled by everyone.
    fn crown(&mut self, world: &mut World, name: &str) {
        let previous = self.it.replace(name.to_string());
        let names = world.names();
        for player in world.players_mut() {
            if let Some(old) = &previous {
                player.ignore_enemy(old);
            }
            if player.name() == name {
                player.set_colour(Colour::Purple);
                for other in &names {
                    player.select_target(other);
                }
            } else {
                player.set_colour(Colour::Green);
                player.clear_targets();
                player.select_enemy(name);
            }
        }
    }

    fn tag(&mut self, world: &mut World, tagger: &str, tagged: &str) {
        debug!(%tagger, %tagged, "Tagged");
        self.crown(world, tagged);
        if let Some(player) = world.player_mut(tagged) {
            player.increase_points(1);
        }
        bounce(world, tagger, tagged);
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self::new()
    }
}

impl GameMode for Tag {
    fn name(&self) -> &str {
        "Tag"
    }

    fn setup(
        &mut self,
        world: &mut World,
        config: &GameConfig,
        rng: &mut StdRng,
    ) -> Result<(), SimError> {
        let names = world.spawn_roster(config.players, Colour::Green, config, rng)?;
        if let Some(it) = names.choose(rng) {
            info!(%it, "Picked first player to be it");
            self.crown(world, it);
        }
        Ok(())
    }

    fn handle_collision(&mut self, world: &mut World, first: &str, second: &str) {
        match self.it.as_deref() {
            Some(it) if it == first => self.tag(world, first, second),
            Some(it) if it == second => self.tag(world, second, first),
            _ => bounce(world, first, second),
        }
    }

    fn check_for_winner(&mut self, world: &mut World) -> Option<String> {
        match world.len() {
            0 => None,
            1 => world.names().pop(),
            2 => {
                if let Some(it) = self.it.take() {
                    world.remove_player(&it);
                }
                world.names().pop()
            }
            _ => {
                let it = self.it.as_deref();
                let tagged: Vec<String> = world
                    .players()
                    .filter(|player| player.points() > 0 && Some(player.name()) != it)
                    .map(|player| player.name().to_string())
                    .collect();
                for name in tagged {
                    info!(%name, "Eliminated for having been it");
                    world.remove_player(&name);
                }
                None
            }
        }
    }
}
