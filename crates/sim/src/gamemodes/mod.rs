use crate::config::{GameConfig, ModeKind};
use crate::error::SimError;
use crate::world::World;
use rand::rngs::StdRng;

pub mod elimination;
pub mod tag;
pub mod zombie;

pub trait GameMode: Send + Sync {
    fn name(&self) -> &str;

    /// Populate `world` and hand out the starting roles.
    fn setup(
        &mut self,
        world: &mut World,
        config: &GameConfig,
        rng: &mut StdRng,
    ) -> Result<(), SimError>;

    /// React to `first` and `second` touching. Both are in `world` when called.
    fn handle_collision(&mut self, world: &mut World, first: &str, second: &str);

    /// Name of the winning player or group, if the game is decided. May remove
    /// players as a side effect.
    fn check_for_winner(&mut self, world: &mut World) -> Option<String>;
}

pub fn get_gamemode(kind: ModeKind) -> Box<dyn GameMode> {
    match kind {
        ModeKind::Tag => Box::new(tag::Tag::new()),
        ModeKind::Zombie => Box::new(zombie::Zombie::new()),
        ModeKind::Elimination => Box::new(elimination::Elimination::new()),
    }
}

/// Turn both players around, as after any bump.
fn bounce(world: &mut World, first: &str, second: &str) {
    for name in [first, second] {
        if let Some(player) = world.player_mut(name) {
            player.reverse_direction();
        }
    }
}
