//! Argon2id hashing with fixed cost parameters.

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use lazy_static::lazy_static;

/// Memory cost in KiB.
pub const MEMORY_COST: u32 = 19456;
pub const TIME_COST: u32 = 2;
pub const PARALLELISM: u32 = 1;
pub const OUTPUT_LEN: usize = 32;

lazy_static! {
    /// Stand-in hash verified when the username is unknown, so a miss costs as
    /// much as a wrong password.
    static ref DUMMY_HASH: Result<String, password_hash::Error> =
        hash_password("dummy password that never matches");
}

fn hasher() -> Result<Argon2<'static>, password_hash::Error> {
    let params = Params::new(MEMORY_COST, TIME_COST, PARALLELISM, Some(OUTPUT_LEN))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes `password` into a PHC string carrying its own salt and parameters.
pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(hasher()?
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match hasher()?.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Runs a full verify against [`DUMMY_HASH`]; always `Ok(false)` unless hashing is broken.
pub fn verify_dummy(password: &str) -> Result<bool, password_hash::Error> {
    let hash = DUMMY_HASH.as_ref().map_err(Clone::clone)?;
    verify_password(password, hash).map(|_| false)
}
