//! Game state and main loop.

use std::fmt;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::SimError;
use crate::field::Field;
use crate::gamemodes::{GameMode, get_gamemode};
use crate::world::World;

/// One game in progress.
pub struct Simulation {
    config: Config,
    world: World,
    gamemode: Box<dyn GameMode>,
    rng: StdRng,
    tick_count: u64,
}

impl Simulation {
    /// Build the field and let the configured mode populate it.
    pub fn new(config: Config) -> Result<Self, SimError> {
        let mut rng = match config.game.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut world = World::new(Field::new(&config.field));
        let mut gamemode = get_gamemode(config.game.mode);
        gamemode.setup(&mut world, &config.game, &mut rng)?;
        Ok(Self {
            config,
            world,
            gamemode,
            rng,
            tick_count: 0,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn gamemode(&self) -> &dyn GameMode {
        self.gamemode.as_ref()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Advance the game by one tick. Returns the winner once one is decided.
    pub fn tick(&mut self) -> Option<String> {
        self.tick_count += 1;

        for name in self.world.names() {
            self.world.advance(&name, &mut self.rng);
        }

        for (first, second) in self.world.collisions(self.config.game.collision_distance) {
            // An earlier collision this tick may have removed either player.
            if !self.world.contains(&first) || !self.world.contains(&second) {
                continue;
            }
            debug!(%first, %second, tick = self.tick_count, "Collision");
            self.gamemode.handle_collision(&mut self.world, &first, &second);
        }

        let rebalance_interval = self.config.field.rebalance_interval;
        if rebalance_interval > 0 && self.tick_count % rebalance_interval == 0 {
            self.world.field.rebalance();
        }

        let duration = self.config.game.duration;
        if duration > 0 && self.tick_count % duration == 0 {
            return self.gamemode.check_for_winner(&mut self.world);
        }
        None
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Winner,
    TickLimit,
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::Winner => "winner decided",
            StopReason::TickLimit => "tick limit reached",
            StopReason::Interrupted => "interrupted",
        })
    }
}

/// Result of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub winner: Option<String>,
    pub ticks: u64,
    pub reason: StopReason,
    /// Players still on the field at the end.
    pub survivors: Vec<String>,
}

impl Outcome {
    fn new(sim: &Simulation, winner: Option<String>, reason: StopReason) -> Self {
        Self {
            winner,
            ticks: sim.tick_count(),
            reason,
            survivors: sim.world().names(),
        }
    }
}

/// Run a game to completion on the configured tick interval.
pub async fn run(config: Config) -> anyhow::Result<Outcome> {
    let tick_interval_ms = config.game.tick_interval_ms;
    let max_ticks = config.game.max_ticks;
    let mut sim = Simulation::new(config)?;
    info!(
        "Started {} with {} players on a {} field",
        sim.gamemode().name(),
        sim.world().len(),
        sim.world().field.kind()
    );

    let mut ticker = (tick_interval_ms > 0).then(|| {
        let mut ticker = interval(Duration::from_millis(tick_interval_ms));
        // Skip missed ticks rather than bursting to catch up.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    });
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        if max_ticks > 0 && sim.tick_count() >= max_ticks {
            info!("Stopping after {} ticks without a winner", sim.tick_count());
            return Ok(Outcome::new(&sim, None, StopReason::TickLimit));
        }

        tokio::select! {
            _ = &mut shutdown => {
                info!("Interrupted at tick {}", sim.tick_count());
                return Ok(Outcome::new(&sim, None, StopReason::Interrupted));
            }
            _ = next_tick(&mut ticker) => {}
        }

        if let Some(winner) = sim.tick() {
            info!("{} won at tick {}", winner, sim.tick_count());
            return Ok(Outcome::new(&sim, Some(winner), StopReason::Winner));
        }
        if sim.tick_count() % 100 == 0 {
            debug!(
                tick = sim.tick_count(),
                players = sim.world().len(),
                height = sim.world().field.height(),
                "Progress"
            );
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => tokio::task::yield_now().await,
    }
}
