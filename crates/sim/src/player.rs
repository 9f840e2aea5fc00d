//! Players and their movement rules.

use std::fmt;

use fieldtree::{Diagonal, Point, Step};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::field::Field;

/// Team colour shown for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colour {
    Green,
    Purple,
    Random,
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Colour::Green => "green",
            Colour::Purple => "purple",
            Colour::Random => "random",
        })
    }
}

/// A player on the field.
///
/// A name is never both a target and an enemy, and a player never lists
/// itself as either.
#[derive(Debug, Clone)]
pub struct Player {
    name: String,
    location: Point,
    colour: Colour,
    /// How far the player sees in each diagonal direction.
    vision: u32,
    /// Units moved per step.
    speed: u32,
    points: u32,
    targets: Vec<String>,
    enemies: Vec<String>,
    direction: Step,
}

impl Player {
    pub fn new(
        name: impl Into<String>,
        location: Point,
        colour: Colour,
        vision: u32,
        speed: u32,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            colour,
            vision,
            speed,
            points: 0,
            targets: Vec::new(),
            enemies: Vec::new(),
            direction: Step::North,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn colour(&self) -> Colour {
        self.colour
    }

    pub fn vision(&self) -> u32 {
        self.vision
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn enemies(&self) -> &[String] {
        &self.enemies
    }

    pub fn direction(&self) -> Step {
        self.direction
    }

    pub fn set_colour(&mut self, colour: Colour) {
        self.colour = colour;
    }

    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed;
    }

    pub fn increase_points(&mut self, points: u32) {
        self.points = self.points.saturating_add(points);
    }

    /// Chase `name`. Ignored for enemies, duplicates and the player itself.
    pub fn select_target(&mut self, name: &str) {
        if name != self.name
            && !self.enemies.iter().any(|e| e == name)
            && !self.targets.iter().any(|t| t == name)
        {
            self.targets.push(name.to_string());
        }
    }

    pub fn ignore_target(&mut self, name: &str) {
        self.targets.retain(|t| t != name);
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    /// Flee from `name`. Ignored for targets, duplicates and the player itself.
    pub fn select_enemy(&mut self, name: &str) {
        if name != self.name
            && !self.targets.iter().any(|t| t == name)
            && !self.enemies.iter().any(|e| e == name)
        {
            self.enemies.push(name.to_string());
        }
    }

    pub fn ignore_enemy(&mut self, name: &str) {
        self.enemies.retain(|e| e != name);
    }

    pub fn reverse_direction(&mut self) {
        self.direction = self.direction.reverse();
    }

    /// Look down two distinct random diagonals and face the best direction.
    ///
    /// A target seen towards a diagonal votes for both compass directions of
    /// that diagonal; an enemy votes for the other two. Ties are broken at
    /// random. Returns every direction with the top score, in [`Step::ALL`]
    /// order.
    pub fn next_direction<R: Rng + ?Sized>(&mut self, field: &Field, rng: &mut R) -> Vec<Step> {
        let mut tally = [0u32; 4];
        for diagonal in Diagonal::ALL.choose_multiple(rng, 2) {
            for seen in field.names_in_range(self.location, *diagonal, self.vision) {
                let chasing = self.targets.contains(&seen);
                let fleeing = self.enemies.contains(&seen);
                for (score, step) in tally.iter_mut().zip(Step::ALL) {
                    let towards = diagonal.leans(step);
                    *score += u32::from(chasing && towards) + u32::from(fleeing && !towards);
                }
            }
        }

        let best_score = tally.iter().copied().max().unwrap_or(0);
        let best: Vec<Step> = Step::ALL
            .into_iter()
            .zip(tally)
            .filter(|(_, score)| *score == best_score)
            .map(|(step, _)| step)
            .collect();
        if let Some(step) = best.choose(rng) {
            self.direction = *step;
        }
        best
    }

    /// Move `speed` units in the current direction. A blocked move turns the
    /// player around instead.
    pub fn step(&mut self, field: &mut Field) {
        match field.move_name(&self.name, self.direction, self.speed) {
            Ok(Some(location)) => self.location = location,
            Ok(None) => {}
            Err(err) => {
                debug!(name = %self.name, direction = %self.direction, "Blocked: {}", err);
                self.reverse_direction();
            }
        }
    }
}
