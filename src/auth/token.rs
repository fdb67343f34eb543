use anyhow::Context;
use rand::{rngs::OsRng, RngCore};
use uuid::Builder;

/// Generates an opaque session token from 16 bytes of OS randomness.
///
/// The bytes are laid out as a version 4 UUID, leaving 122 random bits.
/// An entropy source failure is returned instead of falling back to a weaker RNG.
pub fn new_session_token() -> anyhow::Result<String> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("read session token entropy")?;
    let token = Builder::from_random_bytes(bytes).into_uuid();
    Ok(token.hyphenated().to_string())
}
