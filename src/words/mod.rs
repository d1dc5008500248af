//! Word pool for asteroid spawning

use rand::Rng;
use tracing::{info, warn};

use crate::api::CompetitionClient;

/// Built-in words used when the remote pool cannot be fetched
pub const FALLBACK_WORDS: [&str; 5] = ["hello", "world", "typing", "speed", "competition"];

/// Candidate words for the active language track
#[derive(Debug, Clone)]
pub struct WordPool {
    words: Vec<String>,
}

impl WordPool {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// The built-in fallback pool
    pub fn fallback() -> Self {
        Self::new(FALLBACK_WORDS.iter().map(|w| w.to_string()).collect())
    }

    /// Fetch the pool once at session-room entry. A failure permanently
    /// substitutes the fallback list for this client session; no retries.
    pub async fn load(client: &CompetitionClient) -> Self {
        match client.words().await {
            Ok(words) if !words.is_empty() => {
                info!(count = words.len(), "Word pool loaded");
                Self::new(words)
            }
            Ok(_) => {
                warn!("Word pool is empty, using fallback words");
                Self::fallback()
            }
            Err(err) => {
                warn!(error = %err, "Failed to load word pool, using fallback words");
                Self::fallback()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Pick a uniformly random word
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<&str> {
        if self.words.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.words.len());
        Some(&self.words[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Alphabet, Config};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn fallback_pool_matches_builtin_list() {
        let pool = WordPool::fallback();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..32 {
            let word = pool.pick(&mut rng).unwrap();
            assert!(FALLBACK_WORDS.contains(&word));
        }
    }

    #[test]
    fn empty_pool_yields_no_word() {
        let pool = WordPool::new(Vec::new());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(pool.is_empty());
        assert!(pool.pick(&mut rng).is_none());
    }

    #[test]
    fn load_falls_back_when_the_api_is_unreachable() {
        let config = Config {
            // Nothing listens here; the fetch fails fast
            api_base_url: "http://127.0.0.1:9".to_string(),
            auth_token: "token".to_string(),
            user_name: "tester".to_string(),
            log_level: "info".to_string(),
            alphabet: Alphabet::Mixed,
        };
        let client = CompetitionClient::new(&config);

        let pool = tokio_test::block_on(WordPool::load(&client));

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(FALLBACK_WORDS.contains(&pool.pick(&mut rng).unwrap()));
    }
}
