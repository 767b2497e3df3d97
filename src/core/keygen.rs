/*
 * Random identifier generation for the export pipeline. Two uses: minting
 * session-scoped resource keys at discovery time (30 chars, letting the UI
 * reference a resource without re-resolving its path) and generating the
 * short prefixes used to rename colliding snippet entries during a merge.
 *
 * Uniqueness is guaranteed by retry against a caller-supplied predicate, so
 * the uniqueness scope (one discovery session, one merge group) is explicit
 * at the call site rather than hidden global state.
 */
use rand::Rng;

/// Lowercase base-36 alphabet, matching the archive's historical key shape.
pub const ALPHANUMERIC_LOWER: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of a session-scoped resource key.
pub const RESOURCE_KEY_LENGTH: usize = 30;

/// Length of the prefix prepended to a renamed snippet entry.
pub const SNIPPET_RENAME_PREFIX_LENGTH: usize = 7;

#[derive(Debug, Clone)]
pub struct RandomKeyGenerator {
    charset: Vec<char>,
    length: usize,
}

impl RandomKeyGenerator {
    pub fn new(charset: &str, length: usize) -> Self {
        assert!(!charset.is_empty(), "charset must not be empty");
        assert!(length > 0, "key length must be positive");
        RandomKeyGenerator {
            charset: charset.chars().collect(),
            length,
        }
    }

    /// Generator for resource keys.
    pub fn resource_keys() -> Self {
        Self::new(ALPHANUMERIC_LOWER, RESOURCE_KEY_LENGTH)
    }

    /// Generator for snippet rename prefixes.
    pub fn snippet_prefixes() -> Self {
        Self::new(ALPHANUMERIC_LOWER, SNIPPET_RENAME_PREFIX_LENGTH)
    }

    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| self.charset[rng.random_range(0..self.charset.len())])
            .collect()
    }

    /// Generates candidates until one is not claimed by `is_taken`. Correct
    /// and fast for the small collections this tool deals with.
    pub fn generate_unique<F>(&self, is_taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        loop {
            let candidate = self.generate();
            if !is_taken(&candidate) {
                return candidate;
            }
        }
    }
}
