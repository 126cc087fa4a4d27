//! Strong password generation for new accounts and admin resets.

use rand::seq::SliceRandom;
use rand::Rng;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

pub const PASSWORD_LENGTH: usize = 12;

/// 12 alphanumeric characters with at least one lowercase letter, one
/// uppercase letter and one digit.
pub fn generate_strong_password() -> String {
    generate_with(&mut rand::thread_rng())
}

/// Same as [`generate_strong_password`] with a caller-supplied RNG.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let all: Vec<u8> = [LOWERCASE, UPPERCASE, DIGITS].concat();

    let mut chars: Vec<u8> = Vec::with_capacity(PASSWORD_LENGTH);
    for class in [LOWERCASE, UPPERCASE, DIGITS] {
        chars.push(class[rng.gen_range(0..class.len())]);
    }
    while chars.len() < PASSWORD_LENGTH {
        chars.push(all[rng.gen_range(0..all.len())]);
    }
    chars.shuffle(rng);

    chars.into_iter().map(char::from).collect()
}
