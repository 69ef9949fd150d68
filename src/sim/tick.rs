//! The per-tick physics step
//!
//! Order of operations per tick:
//! 1. Freeze check (game over + ball fallen past the freeze threshold)
//! 2. Collision resolution against all platforms
//! 3. Gravity + swept vertical integration (unless resting)
//! 4. Terminal-velocity clamp
//! 5. Horizontal control, drag and spin
//! 6. Scroll-offset hysteresis
//! 7. World boundaries and game-over detection
//! 8. Score update
//! 9. Platform recycling
//!
//! Scheduling the next tick is the loop's job, not the simulation's.

use super::collision::resolve_collisions;
use super::input::{InputBuffer, Key};
use super::platforms::recycle_platforms;
use super::state::{Ball, GameState, Platform};
use crate::consts::*;

/// Advance the simulation by exactly one logical step.
pub fn tick(state: &mut GameState, input: &mut InputBuffer) {
    // Once the run is over and the ball has fallen out of sight the
    // simulation freezes in its final state.
    if state.game_over && state.ball.pos.y < FALL_FREEZE_Y {
        return;
    }
    state.time_ticks += 1;

    let resting = resolve_collisions(&mut state.ball, &state.platforms, input);

    if !resting {
        state.ball.vel.y += GRAVITY;
        integrate_vertical(&mut state.ball, &state.platforms);
    }
    state.ball.vel.y = state.ball.vel.y.clamp(-TERMINAL_VELOCITY, TERMINAL_VELOCITY);

    apply_horizontal_control(&mut state.ball, input);
    update_scroll(state);
    enforce_bounds(state);

    // Non-finite state is unrecoverable arithmetic poison; end the run
    if !(state.ball.pos.is_finite() && state.ball.vel.is_finite()) {
        log::error!(
            "non-finite ball state at tick {}, ending run (pos {:?}, vel {:?})",
            state.time_ticks,
            state.ball.pos,
            state.ball.vel
        );
        state.game_over = true;
        return;
    }

    state.score = state.score.max(state.ball.pos.x.floor() as u64);
    recycle_platforms(state);
}

/// Swept vertical integration: advance y by vy, but never past the nearest
/// qualifying platform surface in the direction of travel (a platform the
/// ball is horizontally over). With no candidate ahead, no clamp applies.
fn integrate_vertical(ball: &mut Ball, platforms: &[Platform]) {
    let naive = ball.pos.y + ball.vel.y;

    if ball.vel.y < 0.0 {
        // Falling: nearest top surface at or below the center
        let floor = platforms
            .iter()
            .filter(|p| p.spans(ball.pos.x, 0.0) && p.pos.y + ball.radius <= ball.pos.y)
            .map(|p| p.pos.y + ball.radius)
            .fold(f32::NEG_INFINITY, f32::max);
        ball.pos.y = if floor.is_finite() { naive.max(floor) } else { naive };
    } else if ball.vel.y > 0.0 {
        // Rising: nearest underside at or above the center
        let ceiling = platforms
            .iter()
            .filter(|p| p.spans(ball.pos.x, 0.0) && p.underside() - ball.radius >= ball.pos.y)
            .map(|p| p.underside() - ball.radius)
            .fold(f32::INFINITY, f32::min);
        ball.pos.y = if ceiling.is_finite() { naive.min(ceiling) } else { naive };
    }
}

/// Held left/right keys accelerate, drag always applies, and below the
/// halt threshold horizontal motion stops entirely (skipping the position
/// update and spin accumulation).
fn apply_horizontal_control(ball: &mut Ball, input: &InputBuffer) {
    if input.is_held(Key::Left) {
        ball.vel.x -= X_ACCEL;
    }
    if input.is_held(Key::Right) {
        ball.vel.x += X_ACCEL;
    }
    ball.vel.x *= RESISTANCE;

    if ball.vel.x.abs() < HALT_THRESHOLD {
        ball.vel.x = 0.0;
    } else {
        ball.pos.x += ball.vel.x;
        ball.rotation += 4.0 * ball.vel.x;
    }
}

/// Scroll hysteresis: the camera only moves once the ball leaves the dead
/// zone between the left and right margins, and never goes below 0.
fn update_scroll(state: &mut GameState) {
    let left_margin = SCROLL_LEFT_FRACTION * state.view.x;
    let right_margin = SCROLL_RIGHT_FRACTION * state.view.x;
    let rel = state.ball.pos.x - state.scroll_offset;

    if rel < left_margin {
        state.scroll_offset = (state.ball.pos.x - left_margin).max(0.0);
    } else if rel > right_margin {
        state.scroll_offset = state.ball.pos.x - right_margin;
    }
}

/// World boundaries: the left wall reflects, the viewport top reflects vy
/// downward, and falling below y=0 ends the run. The right side is
/// unbounded (scrolling world).
fn enforce_bounds(state: &mut GameState) {
    let ball = &mut state.ball;

    if ball.pos.x - ball.radius < 0.0 {
        ball.pos.x = ball.radius;
        ball.vel.x = ball.vel.x.abs();
    }
    if ball.pos.y + ball.radius > state.view.y {
        ball.pos.y = state.view.y - ball.radius;
        ball.vel.y = -ball.vel.y.abs();
    }
    if ball.pos.y - ball.radius < 0.0 {
        state.game_over = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    /// State with the ball airborne and no platforms near it
    fn airborne_state() -> (GameState, InputBuffer) {
        let mut state = GameState::new(1);
        state.platforms.clear();
        state.ball.pos = Vec2::new(50.0, 400.0);
        state.ball.vel = Vec2::ZERO;
        (state, InputBuffer::new())
    }

    /// State with the ball resting on a platform directly below it
    fn resting_state() -> (GameState, InputBuffer) {
        let mut state = GameState::new(1);
        state.platforms.clear();
        let plat = Platform::new(0.0, 100.0, 100.0);
        state.ball.pos = Vec2::new(50.0, plat.pos.y + state.ball.radius);
        state.ball.vel = Vec2::ZERO;
        state.platforms.push(plat);
        (state, InputBuffer::new())
    }

    #[test]
    fn test_first_airborne_tick_applies_gravity() {
        let (mut state, mut input) = airborne_state();
        tick(&mut state, &mut input);
        assert_eq!(state.ball.vel.y, GRAVITY);
        assert_eq!(state.ball.pos.y, 400.0 + GRAVITY);
    }

    #[test]
    fn test_resting_suspends_gravity() {
        let (mut state, mut input) = resting_state();
        for _ in 0..10 {
            tick(&mut state, &mut input);
            assert_eq!(state.ball.pos.y, 110.0);
            assert_eq!(state.ball.vel.y, 0.0);
        }
    }

    #[test]
    fn test_jump_from_rest() {
        let (mut state, mut input) = resting_state();
        input.key_down(Key::Jump);
        tick(&mut state, &mut input);
        // One press, one impulse: -GRAVITY * 20 = 5.0 upward
        assert_eq!(state.ball.vel.y, 5.0);
        assert!(!input.jump_requested());
        assert!(!input.is_held(Key::Jump));

        // Next tick the ball leaves the surface
        tick(&mut state, &mut input);
        assert!(state.ball.pos.y > 110.0);
    }

    #[test]
    fn test_swept_integration_clamps_to_surface() {
        let (mut state, mut input) = resting_state();
        // High above the platform, falling fast enough to tunnel naively
        state.ball.pos.y = 130.0;
        state.ball.vel.y = -24.75; // -25 after gravity; naive y would be 105
        tick(&mut state, &mut input);
        assert_eq!(state.ball.pos.y, 110.0);
    }

    #[test]
    fn test_swept_integration_without_candidates() {
        let (mut state, mut input) = airborne_state();
        state.ball.vel.y = -24.75;
        tick(&mut state, &mut input);
        // No platform below: naive integration, no clamp
        assert_eq!(state.ball.pos.y, 400.0 - 25.0);
    }

    #[test]
    fn test_terminal_velocity_cap() {
        let (mut state, mut input) = airborne_state();
        state.ball.vel.y = -100.0;
        tick(&mut state, &mut input);
        assert_eq!(state.ball.vel.y, -TERMINAL_VELOCITY);
    }

    #[test]
    fn test_horizontal_control_and_drag() {
        let (mut state, mut input) = airborne_state();
        input.key_down(Key::Right);
        tick(&mut state, &mut input);
        assert_eq!(state.ball.vel.x, X_ACCEL * RESISTANCE);
        assert!(state.ball.pos.x > 50.0);
        assert!(state.ball.rotation > 0.0);

        // Released: drag decays vx to a dead stop
        input.key_up(Key::Right);
        for _ in 0..200 {
            tick(&mut state, &mut input);
        }
        assert_eq!(state.ball.vel.x, 0.0);
    }

    #[test]
    fn test_halt_threshold_skips_position_update() {
        let (mut state, mut input) = airborne_state();
        state.ball.vel.x = 0.04;
        let x = state.ball.pos.x;
        let rotation = state.ball.rotation;
        tick(&mut state, &mut input);
        assert_eq!(state.ball.vel.x, 0.0);
        assert_eq!(state.ball.pos.x, x);
        assert_eq!(state.ball.rotation, rotation);
    }

    #[test]
    fn test_left_wall_reflects() {
        let mut state = GameState::new(1);
        state.ball.pos = Vec2::new(5.0, 300.0);
        state.ball.vel = Vec2::new(-2.0, 0.0);
        enforce_bounds(&mut state);
        assert_eq!(state.ball.pos.x, state.ball.radius);
        assert_eq!(state.ball.vel.x, 2.0);
    }

    #[test]
    fn test_viewport_top_reflects_downward() {
        let mut state = GameState::new(1);
        state.ball.pos = Vec2::new(50.0, 595.0);
        state.ball.vel = Vec2::new(0.0, 5.0);
        enforce_bounds(&mut state);
        assert_eq!(state.ball.pos.y, state.view.y - state.ball.radius);
        assert_eq!(state.ball.vel.y, -5.0);
    }

    #[test]
    fn test_fall_below_zero_ends_run() {
        let (mut state, mut input) = airborne_state();
        state.ball.pos.y = 5.0;
        tick(&mut state, &mut input);
        assert!(state.game_over);

        // Stays over across many more ticks, and eventually freezes
        for _ in 0..500 {
            tick(&mut state, &mut input);
            assert!(state.game_over);
        }
        assert!(state.ball.pos.y < FALL_FREEZE_Y);
        let frozen = state.ball.clone();
        tick(&mut state, &mut input);
        assert_eq!(state.ball, frozen);
    }

    #[test]
    fn test_scroll_hysteresis() {
        let mut state = GameState::new(1);
        let left = SCROLL_LEFT_FRACTION * state.view.x; // 100
        let right = SCROLL_RIGHT_FRACTION * state.view.x; // 320

        // Inside the dead zone: no movement
        state.ball.pos.x = 200.0;
        update_scroll(&mut state);
        assert_eq!(state.scroll_offset, 0.0);

        // Past the right margin: snap so the ball sits on it
        state.ball.pos.x = 1000.0;
        update_scroll(&mut state);
        assert_eq!(state.scroll_offset, 1000.0 - right);

        // Back inside the new dead zone: unchanged
        state.ball.pos.x = 900.0;
        update_scroll(&mut state);
        assert_eq!(state.scroll_offset, 680.0);

        // Past the left margin: snap, floored at 0
        state.ball.pos.x = 60.0;
        update_scroll(&mut state);
        assert_eq!(state.scroll_offset, 0.0);
        state.scroll_offset = 500.0;
        state.ball.pos.x = 550.0;
        update_scroll(&mut state);
        assert_eq!(state.scroll_offset, 550.0 - left);
    }

    #[test]
    fn test_score_tracks_max_x() {
        let (mut state, mut input) = airborne_state();
        state.ball.pos.x = 321.7;
        tick(&mut state, &mut input);
        assert_eq!(state.score, 321);

        // Moving back left never lowers it
        state.ball.pos.x = 50.0;
        tick(&mut state, &mut input);
        assert_eq!(state.score, 321);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = GameState::new(77);
        let mut b = GameState::new(77);
        let mut input_a = InputBuffer::new();
        let mut input_b = InputBuffer::new();
        input_a.key_down(Key::Right);
        input_b.key_down(Key::Right);

        for _ in 0..300 {
            tick(&mut a, &mut input_a);
            tick(&mut b, &mut input_b);
        }
        assert_eq!(a.ball, b.ball);
        assert_eq!(a.score, b.score);
        assert_eq!(a.platforms, b.platforms);
    }

    /// Map an opcode to an input mutation, for property runs
    fn apply_op(input: &mut InputBuffer, op: u8) {
        match op {
            0 => input.key_down(Key::Left),
            1 => input.key_up(Key::Left),
            2 => input.key_down(Key::Right),
            3 => input.key_up(Key::Right),
            4 => input.key_down(Key::Jump),
            5 => input.key_up(Key::Jump),
            _ => {}
        }
    }

    proptest! {
        #[test]
        fn prop_score_monotonic_and_offset_nonnegative(
            seed in any::<u64>(),
            ops in prop::collection::vec(0u8..8, 1..300),
        ) {
            let mut state = GameState::new(seed);
            let mut input = InputBuffer::new();
            let mut last_score = state.score;

            for op in ops {
                apply_op(&mut input, op);
                tick(&mut state, &mut input);
                prop_assert!(state.score >= last_score);
                prop_assert!(state.scroll_offset >= 0.0);
                prop_assert!(state.ball.pos.is_finite());
                prop_assert!(state.ball.vel.is_finite());
                last_score = state.score;
            }
        }

        #[test]
        fn prop_game_over_latches(
            seed in any::<u64>(),
            ops in prop::collection::vec(0u8..8, 1..300),
        ) {
            let mut state = GameState::new(seed);
            let mut input = InputBuffer::new();
            let mut was_over = false;

            for op in ops {
                apply_op(&mut input, op);
                tick(&mut state, &mut input);
                if was_over {
                    prop_assert!(state.game_over);
                }
                was_over = state.game_over;
            }
        }

        #[test]
        fn prop_ahead_count_meets_target(
            seed in any::<u64>(),
            ops in prop::collection::vec(0u8..8, 1..100),
        ) {
            use super::super::platforms::platform_target;

            let mut state = GameState::new(seed);
            let mut input = InputBuffer::new();
            let horizon = RECYCLE_DISTANCE_FACTOR * state.view.x;

            for op in ops {
                apply_op(&mut input, op);
                tick(&mut state, &mut input);
                if state.game_over {
                    break;
                }
                let ahead = state
                    .platforms
                    .iter()
                    .filter(|p| p.pos.x > state.ball.pos.x + horizon)
                    .count();
                prop_assert!(ahead >= platform_target(state.score));
            }
        }
    }
}
