//! Storage key generation for uploaded images.

use rand::RngCore;

/// Number of random bytes behind each key (256 bits).
pub const KEY_BYTES: usize = 32;

/// Generate a fresh object-store key: 32 random bytes, lower-case hex.
pub fn generate_image_name() -> String {
    let mut bytes = [0u8; KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
