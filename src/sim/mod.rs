//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One logical tick per animation frame
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! The presentation layer reads the state read-only once per frame; input
//! events mutate only the [`InputBuffer`], which the tick reads at its
//! boundaries.

pub mod collision;
pub mod input;
pub mod platforms;
pub mod state;
pub mod tick;

pub use collision::{reflect_off_corner, resolve_collisions};
pub use input::{InputBuffer, Key};
pub use platforms::{platform_target, random_platform, recycle_platforms};
pub use state::{Ball, GameState, Platform};
pub use tick::tick;
