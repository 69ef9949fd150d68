//! Bounce Runner - a side-scrolling bouncing-ball platform game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, platform generation)
//!
//! The library is pure and platform-independent; all browser wiring (frame
//! scheduling, keyboard events, canvas presentation) lives in the binary.

pub mod sim;

pub use sim::{Ball, GameState, InputBuffer, Key, Platform, tick};

/// Game configuration constants
///
/// All physics constants are tuned per-tick, not per-second: one tick is one
/// animation frame, and test harnesses drive ticks at a fixed logical rate.
pub mod consts {
    /// Vertical acceleration per tick (negative = downward)
    pub const GRAVITY: f32 = -0.25;
    /// Horizontal acceleration per tick while Left/Right is held
    pub const X_ACCEL: f32 = 0.25;
    /// Horizontal drag applied every tick
    pub const RESISTANCE: f32 = 0.95;
    /// Fraction of vertical speed kept on a face bounce
    pub const BOUNCINESS: f32 = 0.8;

    /// Below this |vy| a face bounce settles the ball to rest
    pub const REST_THRESHOLD: f32 = 0.2;
    /// Below this |vx| horizontal motion halts entirely
    pub const HALT_THRESHOLD: f32 = 0.05;
    /// Vertical speed cap in either direction
    pub const TERMINAL_VELOCITY: f32 = -GRAVITY * 100.0;
    /// Upward speed added by a consumed jump request
    pub const JUMP_IMPULSE: f32 = -GRAVITY * 20.0;

    /// Viewport dimensions (world units == CSS pixels)
    pub const VIEW_WIDTH: f32 = 800.0;
    pub const VIEW_HEIGHT: f32 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_START_X: f32 = 50.0;
    pub const BALL_START_Y: f32 = 300.0;

    /// Platform slab thickness
    pub const PLATFORM_THICKNESS: f32 = 10.0;
    /// Fixed safe platform under the spawn point (y on the generator band grid)
    pub const SAFE_PLATFORM_X: f32 = 20.0;
    pub const SAFE_PLATFORM_Y: f32 = 110.0;
    pub const SAFE_PLATFORM_WIDTH: f32 = 160.0;

    /// Platforms are retired/spawned this many viewport-widths from the ball
    pub const RECYCLE_DISTANCE_FACTOR: f32 = 2.0;
    /// Ahead-of-ball platform count at score 0
    pub const BASE_PLATFORM_TARGET: u64 = 25;
    /// Floor for the ahead-of-ball platform count
    pub const MIN_PLATFORM_TARGET: u64 = 10;
    /// Score points per one-platform reduction of the target
    pub const DIFFICULTY_STEP: u64 = 1000;

    /// Scroll dead-zone margins as fractions of the viewport width
    pub const SCROLL_LEFT_FRACTION: f32 = 0.125;
    pub const SCROLL_RIGHT_FRACTION: f32 = 0.4;

    /// After game over, ticks become no-ops once the ball has fallen past this
    pub const FALL_FREEZE_Y: f32 = -100.0;
}
