//! Identity token generation.
//!
//! Tokens are RFC-4122 version-4 UUIDs formatted as lowercase 8-4-4-4-12
//! hex groups. `new_token` draws from the platform's secure generator;
//! `token_from_bytes` builds the same shape from caller-supplied entropy.

use uuid::Uuid;

/// Issues a fresh identity token from the platform's secure UUID generator.
/// The bytes go through the shared formatter, so both entropy sources
/// produce one layout; the fixups are a no-op on an already-v4 UUID.
pub fn new_token() -> String {
    token_from_bytes(Uuid::new_v4().into_bytes())
}

/// Builds a version-4 token from 16 caller-supplied random bytes.
///
/// Applies the RFC-4122 fixups by hand: the version nibble (`4`) in byte 6
/// and the `10` variant bits in byte 8, then lays the result out as
/// lowercase 8-4-4-4-12 hyphen-joined hex groups.
pub fn token_from_bytes(mut bytes: [u8; 16]) -> String {
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
