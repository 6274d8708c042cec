use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Characters a random claim string is drawn from.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const DEFAULT_SEED: u64 = 13666;

/// Seeded random string generator shared by every worker of a run.
///
/// All draws go through a single lock, held for the duration of one string, so
/// the produced sequence depends only on the order of `next_string` calls.
pub struct RandomSource {
    rng: Mutex<StdRng>,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draw `len` characters uniformly from [`ALPHABET`].
    pub fn next_string(&self, len: usize) -> String {
        let mut rng = self.rng.lock();
        (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl std::fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomSource").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn is_alphanumeric(s: &str) -> bool {
        s.bytes().all(|b| ALPHABET.contains(&b))
    }

    #[test]
    fn test_next_string_length_and_alphabet() {
        let source = RandomSource::default();

        for len in [0, 1, 16, 64] {
            let s = source.next_string(len);
            assert_eq!(s.len(), len);
            assert!(is_alphanumeric(&s), "unexpected character in {s:?}");
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = RandomSource::new(42);
        let b = RandomSource::new(42);

        let seq_a: Vec<_> = (0..10).map(|_| a.next_string(16)).collect();
        let seq_b: Vec<_> = (0..10).map(|_| b.next_string(16)).collect();

        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a = RandomSource::new(DEFAULT_SEED);
        let b = RandomSource::new(DEFAULT_SEED + 1);

        assert_ne!(a.next_string(16), b.next_string(16));
    }

    #[test]
    fn test_consecutive_draws_differ() {
        let source = RandomSource::default();
        let draws: HashSet<_> = (0..100).map(|_| source.next_string(16)).collect();

        assert_eq!(draws.len(), 100);
    }

    #[test]
    fn test_concurrent_draws_are_whole_strings() {
        let source = Arc::new(RandomSource::default());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let source = Arc::clone(&source);
                thread::spawn(move || (0..200).map(|_| source.next_string(16)).collect::<Vec<_>>())
            })
            .collect();

        let mut total = 0;
        for handle in handles {
            for s in handle.join().unwrap() {
                assert_eq!(s.len(), 16);
                assert!(is_alphanumeric(&s));
                total += 1;
            }
        }
        assert_eq!(total, 8 * 200);
    }
}
