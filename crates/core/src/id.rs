// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use rand::distributions::{Distribution, Uniform};

const ID_PREFIX: &str = "pending";
const SUFFIX_LEN: usize = 9;
const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a pending mutation ID from a timestamp.
/// Format: pending_{unix_ms}_{suffix} where suffix is 9 random base-36 chars
pub fn generate_id(created_at: &DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let index = Uniform::from(0..SUFFIX_ALPHABET.len());
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(SUFFIX_ALPHABET[index.sample(&mut rng)]))
        .collect();
    format!(
        "{}_{}_{}",
        ID_PREFIX,
        created_at.timestamp_millis(),
        suffix
    )
}

/// Generate an ID that `exists` does not already report.
pub fn generate_unique_id<F>(created_at: &DateTime<Utc>, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    loop {
        let id = generate_id(created_at);
        if !exists(&id) {
            return id;
        }
    }
}

/// Validate that an ID is usable as a blob key: non-empty, not hidden, no path
/// separators, no parent references, ASCII printable only.
pub fn validate_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && !key.contains("..")
        && key
            .chars()
            .all(|c| c.is_ascii_graphic() && c != '/' && c != '\\' && c != ':')
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
