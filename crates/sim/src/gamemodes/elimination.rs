use super::{GameMode, bounce};
use crate::config::GameConfig;
use crate::error::SimError;
use crate::player::Colour;
use crate::world::World;
use rand::rngs::StdRng;
use tracing::{debug, info};

/// Elimination tag: everyone hunts exactly one other player in a ring.
pub struct Elimination;

impl Elimination {
    pub fn new() -> Self {
        Self
    }

    /// `hunter` caught its target `prey`: prey leaves the game and its target
    /// passes to the hunter.
    fn eliminate(world: &mut World, hunter: &str, prey: &str) {
        let Some(caught) = world.remove_player(prey) else {
            return;
        };
        info!(%hunter, %prey, "Eliminated");
        if let Some(player) = world.player_mut(hunter) {
            player.ignore_target(prey);
            if let Some(next) = caught.targets().first() {
                player.select_target(next);
            }
            player.increase_points(1);
        }
    }
}

impl Default for Elimination {
    fn default() -> Self {
        Self::new()
    }
}

impl GameMode for Elimination {
    fn name(&self) -> &str {
        "Elimination Tag"
    }

    fn setup(
        &mut self,
        world: &mut World,
        config: &GameConfig,
        rng: &mut StdRng,
    ) -> Result<(), SimError> {
        let names = world.spawn_roster(config.players, Colour::Random, config, rng)?;
        for (i, name) in names.iter().enumerate() {
            let target = &names[(i + 1) % names.len()];
            if let Some(player) = world.player_mut(name) {
                player.select_target(target);
            }
        }
        Ok(())
    }

    fn handle_collision(&mut self, world: &mut World, first: &str, second: &str) {
        let hunts = |hunter: &str, prey: &str| {
            world
                .player(hunter)
                .is_some_and(|player| player.targets().iter().any(|t| t == prey))
        };
        let (second_hunts, first_hunts) = (hunts(second, first), hunts(first, second));
        if second_hunts {
            Self::eliminate(world, second, first);
        } else if first_hunts {
            Self::eliminate(world, first, second);
        } else {
            debug!(%first, %second, "Bumped");
            bounce(world, first, second);
        }
    }

    /// The single highest scorer wins. A tie at the top decides nothing.
    fn check_for_winner(&mut self, world: &mut World) -> Option<String> {
        let best = world.players().map(|player| player.points()).max()?;
        let mut leaders = world.players().filter(|player| player.points() == best);
        let leader = leaders.next()?;
        if leaders.next().is_some() {
            return None;
        }
        Some(leader.name().to_string())
    }
}
