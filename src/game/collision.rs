//! Bullet-asteroid and asteroid-ship collision resolution

use super::entities::{Asteroid, Bullet, EntityId};
use super::field;

/// Removals produced by one frame's bullet sweep.
///
/// Removals are collected against a consistent snapshot of the frame's
/// positions and applied by the caller afterwards; nothing is removed
/// mid-scan.
#[derive(Debug, Default)]
pub struct FrameResolution {
    /// Bullets consumed this frame, by completing or partial hits
    pub spent_bullets: Vec<EntityId>,
    /// Asteroids whose word completion was confirmed by a hit
    pub destroyed: Vec<EntityId>,
}

/// Sweep all bullet x asteroid pairs using the current frame's positions.
///
/// A bullet resolves against at most one asteroid (first match wins) and an
/// asteroid takes at most one completing hit per frame. A hit destroys the
/// asteroid only once its word is fully typed; a hit on a partially typed
/// word consumes the bullet and is otherwise inert.
pub fn resolve_frame(bullets: &[Bullet], asteroids: &[Asteroid]) -> FrameResolution {
    let mut resolution = FrameResolution::default();

    for bullet in bullets {
        let (bx, by) = bullet.position();
        for asteroid in asteroids {
            if resolution.destroyed.contains(&asteroid.id) {
                continue;
            }
            if field::distance(bx, by, asteroid.x, asteroid.y) < asteroid.radius / 2.0 {
                if asteroid.typed >= asteroid.word_len() {
                    resolution.destroyed.push(asteroid.id);
                }
                resolution.spent_bullets.push(bullet.id);
                break;
            }
        }
    }

    resolution
}

/// Whether an asteroid is touching the ship this frame
pub fn hits_ship(asteroid: &Asteroid) -> bool {
    field::distance_to_ship(asteroid.x, asteroid.y) < asteroid.radius + field::SHIP_RADIUS
}
