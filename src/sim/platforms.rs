//! Procedural platform generation and recycling
//!
//! Platforms spawn ahead of the ball and retire once they fall far enough
//! behind it, keeping the live list (and the per-tick collision scan)
//! bounded at ~tens of entries. The ahead-of-ball target shrinks as the
//! score grows, so the world gets sparser the further the run goes.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{GameState, Platform};
use crate::consts::*;

/// Generate one platform anchored at `anchor_x`:
/// x uniform within two viewport-widths past the anchor, y quantized to
/// 100-unit bands starting at 10, width uniform in [50, 200).
pub fn random_platform(rng: &mut Pcg32, anchor_x: f32, view: Vec2) -> Platform {
    let x = anchor_x + rng.random_range(0.0..RECYCLE_DISTANCE_FACTOR * view.x);
    let band = (rng.random_range(0.0..(view.y - 30.0)) / 100.0).floor();
    let y = 10.0 + band * 100.0;
    let width = rng.random_range(50.0..200.0);
    Platform::new(x, y, width)
}

/// Fresh-run world: the fixed safe platform plus a full procedural fill
/// anchored at the ball.
pub fn spawn_initial_platforms(rng: &mut Pcg32, ball_x: f32, view: Vec2) -> Vec<Platform> {
    let mut platforms = Vec::with_capacity(BASE_PLATFORM_TARGET as usize + 1);
    platforms.push(Platform::new(
        SAFE_PLATFORM_X,
        SAFE_PLATFORM_Y,
        SAFE_PLATFORM_WIDTH,
    ));
    for _ in 0..BASE_PLATFORM_TARGET {
        platforms.push(random_platform(rng, ball_x, view));
    }
    platforms
}

/// Difficulty-scaled ahead-of-ball platform count: `max(25 - score/1000, 10)`
pub fn platform_target(score: u64) -> usize {
    BASE_PLATFORM_TARGET
        .saturating_sub(score / DIFFICULTY_STEP)
        .max(MIN_PLATFORM_TARGET) as usize
}

/// Retire platforms whose right edge fell more than two viewport-widths
/// behind the ball, then top up until the count strictly ahead of that
/// horizon reaches the difficulty target.
pub fn recycle_platforms(state: &mut GameState) {
    let horizon = RECYCLE_DISTANCE_FACTOR * state.view.x;
    let ball_x = state.ball.pos.x;

    state.platforms.retain(|p| p.right() >= ball_x - horizon);

    let target = platform_target(state.score);
    let mut ahead = state
        .platforms
        .iter()
        .filter(|p| p.pos.x > ball_x + horizon)
        .count();
    while ahead < target {
        let platform = random_platform(&mut state.rng, ball_x + horizon, state.view);
        state.platforms.push(platform);
        ahead += 1;
    }
}
