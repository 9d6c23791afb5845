//! Random password generation.

use rand::Rng;

/// Characters a generated password may contain.
const ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";

/// Shortest password `generate` will produce.
pub const MIN_LENGTH: usize = 6;

/// Generate a random password of `length` characters from the fixed
/// alphabet. Lengths below [`MIN_LENGTH`] are raised to it.
pub fn generate(length: usize) -> String {
    let length = length.max(MIN_LENGTH);
    let mut rng = rand::rng();
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
