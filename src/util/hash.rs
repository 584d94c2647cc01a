//! Hashing utilities for plan fingerprints.

use sha2::{Digest, Sha256};

/// A hasher for building fingerprints from multiple components.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    /// Create a new fingerprint builder.
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a string component to the fingerprint.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0");
        self
    }

    /// Add multiple strings to the fingerprint.
    pub fn update_strs<'a>(&mut self, items: impl IntoIterator<Item = &'a str>) -> &mut Self {
        let mut count = 0usize;
        for s in items {
            self.update_str(s);
            count += 1;
        }
        // Length suffix keeps ["a", "b"] + [] apart from ["a"] + ["b"]
        self.update_str(&count.to_string())
    }

    /// Finish and return the full hex digest.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}
