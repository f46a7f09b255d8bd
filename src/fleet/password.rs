//! Random passwords for code-server instances

use std::sync::OnceLock;

use rand::seq::SliceRandom;
use rand::Rng;

/// Characters dropped from the alphabet so passwords survive shell and CSV quoting
pub const EXCLUDED: [char; 3] = ['"', '\'', '\\'];

/// ASCII letters, digits and punctuation minus [`EXCLUDED`]
pub fn alphabet() -> &'static [char] {
    static ALPHABET: OnceLock<Vec<char>> = OnceLock::new();
    ALPHABET.get_or_init(|| {
        ('!'..='~')
            .filter(|c| c.is_ascii_alphanumeric() || c.is_ascii_punctuation())
            .filter(|c| !EXCLUDED.contains(c))
            .collect()
    })
}

/// Generate a password of `length` characters from the thread-local CSPRNG.
pub fn generate_password(length: usize) -> String {
    generate_password_with(&mut rand::thread_rng(), length)
}

pub fn generate_password_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    let chars = alphabet();
    (0..length)
        .filter_map(|_| chars.choose(&mut *rng))
        .collect()
}
