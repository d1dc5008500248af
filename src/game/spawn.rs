//! Asteroid spawning

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::words::WordPool;

use super::entities::{Asteroid, EntityId};
use super::field;

/// Creates asteroids with randomized kinematics from the word pool
#[derive(Debug)]
pub struct Spawner {
    rng: ChaCha8Rng,
}

impl Spawner {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self { rng }
    }

    /// Spawn one asteroid just above the field. Returns `None` when the pool
    /// is empty.
    pub fn spawn(&mut self, pool: &WordPool, id: EntityId) -> Option<Asteroid> {
        let word = pool.pick(&mut self.rng)?.to_string();

        Some(Asteroid {
            id,
            word,
            typed: 0,
            x: self.rng.gen_range(0.0..field::SPAWN_X_MAX),
            y: field::SPAWN_Y,
            vx: self.rng.gen_range(-0.5..0.5),
            vy: self.rng.gen_range(0.5..1.5),
            radius: self.rng.gen_range(30.0..50.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::FALLBACK_WORDS;
    use rand::SeedableRng;

    #[test]
    fn spawned_asteroids_stay_in_the_reference_ranges() {
        let mut spawner = Spawner::new(ChaCha8Rng::seed_from_u64(7));
        let pool = WordPool::fallback();

        for i in 0..64 {
            let a = spawner.spawn(&pool, EntityId(i)).unwrap();
            assert!(FALLBACK_WORDS.contains(&a.word.as_str()));
            assert_eq!(a.typed, 0);
            assert!((0.0..field::SPAWN_X_MAX).contains(&a.x));
            assert_eq!(a.y, field::SPAWN_Y);
            assert!((-0.5..0.5).contains(&a.vx));
            assert!((0.5..1.5).contains(&a.vy));
            assert!((30.0..50.0).contains(&a.radius));
        }
    }

    #[test]
    fn empty_pool_spawns_nothing() {
        let mut spawner = Spawner::new(ChaCha8Rng::seed_from_u64(7));
        let pool = WordPool::new(Vec::new());
        assert!(spawner.spawn(&pool, EntityId(0)).is_none());
    }

    #[test]
    fn seeded_spawner_is_deterministic() {
        let pool = WordPool::fallback();
        let mut first = Spawner::new(ChaCha8Rng::seed_from_u64(42));
        let mut second = Spawner::new(ChaCha8Rng::seed_from_u64(42));

        let a = first.spawn(&pool, EntityId(0)).unwrap();
        let b = second.spawn(&pool, EntityId(0)).unwrap();
        assert_eq!(a.word, b.word);
        assert_eq!(a.x, b.x);
        assert_eq!(a.vx, b.vx);
        assert_eq!(a.radius, b.radius);
    }
}
