//! Game state and core simulation types
//!
//! World coordinates have y increasing upward. A platform's `pos.y` is its
//! top surface; the slab extends `height` downward. The viewport shows
//! `[scroll_offset, scroll_offset + view.x]` horizontally.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::platforms::spawn_initial_platforms;
use crate::consts::*;

/// The single persistent ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Constant after creation, always > 0
    pub radius: f32,
    /// Visual spin accumulator (radians-ish, presentation only)
    pub rotation: f32,
}

impl Ball {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            pos: Vec2::new(BALL_START_X, BALL_START_Y),
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            rotation: 0.0,
        }
    }
}

/// An axis-aligned platform segment
///
/// Immutable once created; the generator adds and retires platforms
/// wholesale, never mutates them in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Left edge (x) and top surface height (y)
    pub pos: Vec2,
    pub width: f32,
    /// Slab thickness, extending downward from `pos.y`
    pub height: f32,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width,
            height: PLATFORM_THICKNESS,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    /// Bottom of the slab (the underside surface)
    #[inline]
    pub fn underside(&self) -> f32 {
        self.pos.y - self.height
    }

    /// Whether `x` lies over the platform span widened by `margin` each side
    #[inline]
    pub fn spans(&self, x: f32, margin: f32) -> bool {
        x >= self.pos.x - margin && x <= self.right() + margin
    }
}

/// Complete world state for one run (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Live RNG, consumed by the platform generator
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Set exactly once per run, cleared only by reset
    pub game_over: bool,
    /// Maximum floor(ball.x) ever reached; monotonic non-decreasing
    pub score: u64,
    /// Camera x offset; trails the ball with a dead zone, never below 0
    pub scroll_offset: f32,
    /// Viewport extent in world units
    pub view: Vec2,
    pub ball: Ball,
    pub platforms: Vec<Platform>,
}

impl GameState {
    /// Create a fresh run: fixed safe platform, procedural fill ahead of the
    /// ball, score 0, offset 0, ball at the spawn point.
    pub fn new(seed: u64) -> Self {
        let view = Vec2::new(VIEW_WIDTH, VIEW_HEIGHT);
        let ball = Ball::new(1);
        let mut rng = Pcg32::seed_from_u64(seed);
        let platforms = spawn_initial_platforms(&mut rng, ball.pos.x, view);

        Self {
            seed,
            rng,
            time_ticks: 0,
            game_over: false,
            score: 0,
            scroll_offset: 0.0,
            view,
            ball,
            platforms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_run_invariants() {
        let state = GameState::new(42);
        assert!(!state.game_over);
        assert_eq!(state.score, 0);
        assert_eq!(state.scroll_offset, 0.0);
        assert_eq!(state.ball.pos, Vec2::new(BALL_START_X, BALL_START_Y));
        assert_eq!(state.ball.vel, Vec2::ZERO);
        assert_eq!(state.ball.radius, BALL_RADIUS);
        // Fixed safe platform plus at least 25 procedural ones
        assert!(state.platforms.len() >= 26);
        assert_eq!(
            state.platforms[0],
            Platform::new(SAFE_PLATFORM_X, SAFE_PLATFORM_Y, SAFE_PLATFORM_WIDTH)
        );
    }

    #[test]
    fn test_reset_is_deterministic() {
        // Same seed reproduces the identical initial world
        let a = GameState::new(7);
        let b = GameState::new(7);
        assert_eq!(a.ball, b.ball);
        assert_eq!(a.platforms, b.platforms);
        assert_eq!(a.rng, b.rng);
    }

    #[test]
    fn test_safe_platform_under_spawn() {
        let state = GameState::new(123);
        let safe = &state.platforms[0];
        assert!(safe.spans(state.ball.pos.x, 0.0));
        assert!(safe.pos.y < state.ball.pos.y);
    }
}
