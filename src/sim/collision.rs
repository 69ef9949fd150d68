//! Collision detection and response for the ball against platform slabs
//!
//! Two-phase test per platform, corner phase first:
//! - Corner phase: circle-vs-corner with a perfectly elastic reflection
//!   about the corner-to-center vector. At most one corner reflection
//!   fires per tick across all platforms.
//! - Face phase: top/underside contact with snapping, a lossy BOUNCINESS
//!   bounce, a rest threshold, and one-shot jump consumption.
//!
//! Platforms are scanned linearly every tick; the recycling policy keeps
//! the list at ~tens of entries, so no spatial index is needed.

use glam::Vec2;

use super::input::InputBuffer;
use super::state::{Ball, Platform};
use crate::consts::*;

/// Reflect the ball's velocity elastically about the corner-to-center
/// vector: `v += c·d` with `c = -2(v·d)/(d·d)`.
///
/// Returns false without touching the velocity when the corner vector is
/// degenerate (ball center on the corner); dividing there would inject
/// NaN into the velocity and permanently corrupt the run.
pub fn reflect_off_corner(ball: &mut Ball, corner: Vec2) -> bool {
    let d = ball.pos - corner;
    let dd = d.length_squared();
    if dd <= f32::EPSILON {
        return false;
    }
    let c = -2.0 * ball.vel.dot(d) / dd;
    ball.vel += c * d;
    true
}

/// The four corners of a platform, each tagged with its outward x
/// direction (-1 for left corners, +1 for right corners).
fn corners(platform: &Platform) -> [(Vec2, f32); 4] {
    let top = platform.pos.y;
    let bottom = platform.underside();
    [
        (Vec2::new(platform.pos.x, top), -1.0),
        (Vec2::new(platform.right(), top), 1.0),
        (Vec2::new(platform.pos.x, bottom), -1.0),
        (Vec2::new(platform.right(), bottom), 1.0),
    ]
}

/// Corner phase for one platform. Tests each corner; the ball must be on
/// the corner's outward side and within `radius` of the corner point.
/// Returns true on the first corner that reflects.
fn resolve_corners(ball: &mut Ball, platform: &Platform) -> bool {
    for (corner, outward_x) in corners(platform) {
        let on_outward_side = outward_x * (ball.pos.x - corner.x) > 0.0;
        let within_radius =
            (ball.pos - corner).length_squared() < ball.radius * ball.radius;
        if on_outward_side && within_radius && reflect_off_corner(ball, corner) {
            return true;
        }
    }
    false
}

/// Face phase for one platform. Returns true when the ball came to rest on
/// the top surface this tick.
fn resolve_faces(ball: &mut Ball, platform: &Platform, input: &mut InputBuffer) -> bool {
    let r = ball.radius;
    // Horizontal span is widened by radius/2 on each side
    if !platform.spans(ball.pos.x, r / 2.0) {
        return false;
    }

    if (ball.pos.y - platform.pos.y).abs() <= r {
        // Top-face contact: snap onto the surface
        ball.pos.y = platform.pos.y + r;
        if ball.vel.y < 0.0 {
            ball.vel.y = -BOUNCINESS * ball.vel.y;
        }
        let mut resting = false;
        if ball.vel.y.abs() < REST_THRESHOLD {
            ball.vel.y = 0.0;
            resting = true;
        }
        if input.jump_requested() && ball.vel.y >= 0.0 {
            input.consume_jump();
            ball.vel.y += JUMP_IMPULSE;
        }
        resting
    } else if (ball.pos.y - platform.underside()).abs() <= r {
        // Underside contact: snap below, reflect upward momentum back down
        ball.pos.y = platform.underside() - r;
        if ball.vel.y > 0.0 {
            ball.vel.y = -BOUNCINESS * ball.vel.y;
        }
        false
    } else {
        false
    }
}

/// Run the full two-phase collision resolution against every platform.
///
/// Corner collisions take precedence: once one corner has reflected, no
/// further corner tests run this tick. The face phase is skipped for the
/// platform whose corner fired. Returns true when the ball is resting on
/// a top surface (suspends gravity integration for this tick).
pub fn resolve_collisions(
    ball: &mut Ball,
    platforms: &[Platform],
    input: &mut InputBuffer,
) -> bool {
    let mut corner_hit = false;
    let mut resting = false;

    for platform in platforms {
        if !corner_hit && resolve_corners(ball, platform) {
            corner_hit = true;
            continue;
        }
        resting |= resolve_faces(ball, platform, input);
    }

    resting
}
