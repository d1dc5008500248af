//! Keystroke-to-target matching

use crate::config::Alphabet;

use super::entities::Asteroid;
use super::field;

/// Normalize a raw key event to a lowercase character of the active alphabet.
/// Anything else (digits, punctuation, letters outside the alphabet) is
/// discarded before matching.
pub fn normalize_key(raw: char, alphabet: Alphabet) -> Option<char> {
    let c = raw.to_lowercase().next()?;
    alphabet.contains(c).then_some(c)
}

/// Select the asteroid the keystroke advances: among the asteroids whose next
/// expected character equals `c`, the one nearest to the ship. Ties keep the
/// first-found asteroid. Returns an index into `asteroids`.
pub fn select_target(asteroids: &[Asteroid], c: char) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut best_distance = f32::INFINITY;

    for (idx, asteroid) in asteroids.iter().enumerate() {
        if asteroid.next_char() != Some(c) {
            continue;
        }
        let distance = field::distance_to_ship(asteroid.x, asteroid.y);
        if distance < best_distance {
            best_distance = distance;
            best = Some(idx);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::EntityId;

    fn asteroid(id: u64, word: &str, typed: usize, x: f32, y: f32) -> Asteroid {
        Asteroid {
            id: EntityId(id),
            word: word.to_string(),
            typed,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            radius: 40.0,
        }
    }

    #[test]
    fn normalize_lowercases_and_filters() {
        assert_eq!(normalize_key('A', Alphabet::Mixed), Some('a'));
        assert_eq!(normalize_key('Ж', Alphabet::Mixed), Some('ж'));
        assert_eq!(normalize_key('7', Alphabet::Mixed), None);
        assert_eq!(normalize_key(' ', Alphabet::Mixed), None);
        assert_eq!(normalize_key('ж', Alphabet::Latin), None);
        assert_eq!(normalize_key('q', Alphabet::Cyrillic), None);
    }

    #[test]
    fn no_candidate_means_no_target() {
        let asteroids = vec![asteroid(0, "hello", 0, 100.0, 100.0)];
        assert_eq!(select_target(&asteroids, 'x'), None);
    }

    #[test]
    fn matching_is_case_insensitive_on_the_word() {
        let asteroids = vec![asteroid(0, "Hello", 0, 100.0, 100.0)];
        assert_eq!(select_target(&asteroids, 'h'), Some(0));
    }

    #[test]
    fn nearest_candidate_wins() {
        // Both need 'h'; the second sits much closer to the ship
        let asteroids = vec![
            asteroid(0, "hello", 0, 100.0, 100.0),
            asteroid(1, "hatch", 0, 390.0, 500.0),
        ];
        assert_eq!(select_target(&asteroids, 'h'), Some(1));
    }

    #[test]
    fn mid_word_progress_shifts_the_expected_character() {
        let asteroids = vec![
            asteroid(0, "hello", 2, 100.0, 100.0), // expects 'l'
            asteroid(1, "lemon", 0, 700.0, 100.0), // expects 'l'
        ];
        // Asteroid 0 is nearer to the ship than asteroid 1
        assert_eq!(select_target(&asteroids, 'l'), Some(0));
        // 'e' was already typed on asteroid 0 and is not yet due on asteroid 1
        assert_eq!(select_target(&asteroids, 'e'), None);
    }

    #[test]
    fn fully_typed_words_are_not_candidates() {
        let asteroids = vec![asteroid(0, "hi", 2, 400.0, 500.0)];
        assert_eq!(select_target(&asteroids, 'h'), None);
        assert_eq!(select_target(&asteroids, 'i'), None);
    }
}
