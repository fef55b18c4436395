use rand::Rng;
use subtle::ConstantTimeEq;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                         abcdefghijklmnopqrstuvwxyz\
                         0123456789";

/// Generates a random alphanumeric string of `length` characters.
///
/// Used for invitation tokens and admin bootstrap codes.
pub fn random_alphanumeric(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Compares a caller-supplied secret against the expected one in constant time.
///
/// Only the length of the expected secret can be learned from timing.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
