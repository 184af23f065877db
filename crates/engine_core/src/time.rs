//! Game clock for the simulation loop.
//!
//! `GameTime` owns frame timing, the game-speed multiplier and the pause flag.
//! Every tick it hands out a [`SimClock`] value that systems consume instead of
//! reading any global state.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Simulated date, measured in game hours since the start of the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct GameDate {
    hours: f64,
}

impl GameDate {
    pub const ZERO: GameDate = GameDate { hours: 0.0 };

    pub fn from_hours(hours: f64) -> Self {
        Self { hours }
    }

    pub fn hours(&self) -> f64 {
        self.hours
    }

    /// A date `hours` later than this one.
    pub fn add_hours(&self, hours: f64) -> Self {
        Self {
            hours: self.hours + hours,
        }
    }

    /// Game hours elapsed from `earlier` to `self` (negative if `earlier` is later).
    pub fn hours_since(&self, earlier: GameDate) -> f64 {
        self.hours - earlier.hours
    }
}

impl std::fmt::Display for GameDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}h", self.hours)
    }
}

/// Player-selectable simulation speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameSpeed {
    Slowest,
    Slow,
    #[default]
    Normal,
    Fast,
    Fastest,
}

impl GameSpeed {
    /// Multiplier applied to the base hours-per-second rate.
    pub fn multiplier(self) -> f32 {
        match self {
            GameSpeed::Slowest => 0.25,
            GameSpeed::Slow => 0.5,
            GameSpeed::Normal => 1.0,
            GameSpeed::Fast => 2.0,
            GameSpeed::Fastest => 4.0,
        }
    }
}

/// Snapshot of the clock passed into every tick call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimClock {
    /// Current simulated date.
    pub date: GameDate,
    /// Real seconds covered by this tick.
    pub real_delta: f32,
    /// Game-speed multiplier in effect.
    pub game_speed: f32,
    /// True while the simulation is paused.
    pub paused: bool,
    /// Game hours per real second at normal speed.
    pub hours_per_second: f32,
    /// Frame counter.
    pub frame: u64,
}

impl Default for SimClock {
    fn default() -> Self {
        Self {
            date: GameDate::ZERO,
            real_delta: 0.0,
            game_speed: 1.0,
            paused: false,
            hours_per_second: 1.0,
            frame: 0,
        }
    }
}

impl SimClock {
    /// Game hours per real second after the game-speed multiplier.
    pub fn hours_per_second_adjusted(&self) -> f32 {
        self.hours_per_second * self.game_speed
    }

    /// Game hours covered by this tick (zero while paused).
    pub fn delta_hours(&self) -> f64 {
        if self.paused {
            0.0
        } else {
            (self.real_delta * self.hours_per_second_adjusted()) as f64
        }
    }
}

/// Manages frame timing, game speed, pause and the simulated date.
#[derive(Debug)]
pub struct GameTime {
    /// Time of the last wall-clock frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Fixed timestep for physics (default 60 Hz).
    fixed_timestep: Duration,
    /// Accumulated time for fixed updates.
    accumulator: Duration,
    /// Simulated date.
    date: GameDate,
    /// Game hours per real second at normal speed.
    hours_per_second: f32,
    game_speed: GameSpeed,
    paused: bool,
}

impl Default for GameTime {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl GameTime {
    /// Create a clock running `hours_per_second` game hours per real second.
    pub fn new(hours_per_second: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            frame_count: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / 60.0),
            accumulator: Duration::ZERO,
            date: GameDate::ZERO,
            hours_per_second,
            game_speed: GameSpeed::Normal,
            paused: false,
        }
    }

    /// Advance by wall-clock time since the previous call.
    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.advance(delta);
    }

    /// Advance by an explicit real-time delta. Used by headless runs and tests.
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.frame_count += 1;
        self.accumulator += delta;
        if !self.paused {
            let hours = delta.as_secs_f64() * self.hours_per_second_adjusted() as f64;
            self.date = self.date.add_hours(hours);
        }
    }

    /// Clock for the frame-rate tick.
    pub fn clock(&self) -> SimClock {
        SimClock {
            date: self.date,
            real_delta: self.delta.as_secs_f32(),
            game_speed: self.game_speed.multiplier(),
            paused: self.paused,
            hours_per_second: self.hours_per_second,
            frame: self.frame_count,
        }
    }

    /// Clock for a fixed physics tick.
    pub fn fixed_clock(&self) -> SimClock {
        SimClock {
            real_delta: self.fixed_timestep.as_secs_f32(),
            ..self.clock()
        }
    }

    /// Check if a fixed update should run and consume the time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            true
        } else {
            false
        }
    }

    /// Set the fixed timestep rate in Hz.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        self.fixed_timestep = Duration::from_secs_f64(1.0 / hz);
    }

    pub fn date(&self) -> GameDate {
        self.date
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn game_speed(&self) -> GameSpeed {
        self.game_speed
    }

    pub fn set_game_speed(&mut self, speed: GameSpeed) {
        if speed != self.game_speed {
            log::info!("Game speed {:?} -> {:?}", self.game_speed, speed);
            self.game_speed = speed;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Game hours per real second after the game-speed multiplier.
    pub fn hours_per_second_adjusted(&self) -> f32 {
        self.hours_per_second * self.game_speed.multiplier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_date_by_adjusted_rate() {
        let mut time = GameTime::new(2.0);
        time.set_game_speed(GameSpeed::Fast);
        time.advance(Duration::from_millis(500));
        assert!((time.date().hours() - 2.0).abs() < 1e-6);
        assert_eq!(time.frame_count(), 1);
    }

    #[test]
    fn paused_clock_keeps_date() {
        let mut time = GameTime::new(1.0);
        time.advance(Duration::from_secs(1));
        time.set_paused(true);
        time.advance(Duration::from_secs(5));
        assert!((time.date().hours() - 1.0).abs() < 1e-6);
        assert!(time.clock().paused);
        assert_eq!(time.clock().delta_hours(), 0.0);
    }

    #[test]
    fn fixed_updates_consume_accumulator() {
        let mut time = GameTime::new(1.0);
        time.set_fixed_rate(10.0);
        time.advance(Duration::from_millis(250));
        let mut steps = 0;
        while time.should_fixed_update() {
            steps += 1;
        }
        assert_eq!(steps, 2);
        assert!((time.fixed_clock().real_delta - 0.1).abs() < 1e-6);
    }

    #[test]
    fn game_date_ordering() {
        let a = GameDate::from_hours(1.0);
        let b = a.add_hours(0.5);
        assert!(b > a);
        assert!((b.hours_since(a) - 0.5).abs() < 1e-9);
    }
}
