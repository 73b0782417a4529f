//! Reservation cookies.
//!
//! A cookie is the only thing standing between a reservation id (which
//! is sequential and therefore guessable) and the tickets it holds, so
//! it is drawn from the thread-local CSPRNG.

use std::fmt;

use rand::distributions::{Distribution, Uniform};

/// Cookie length on the wire.
pub const COOKIE_LEN: usize = 48;

/// Cookie bytes are printable, non-space ASCII.
const COOKIE_MIN_BYTE: u8 = 0x21;
const COOKIE_MAX_BYTE: u8 = 0x7E;

/// 48-byte opaque token proving the right to confirm a reservation.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cookie([u8; COOKIE_LEN]);

impl Cookie {
    pub fn from_bytes(bytes: [u8; COOKIE_LEN]) -> Self {
        Cookie(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; COOKIE_LEN] {
        &self.0
    }

    /// Generate a fresh, unguessable cookie.
    pub fn generate() -> Self {
        let alphabet = Uniform::new_inclusive(COOKIE_MIN_BYTE, COOKIE_MAX_BYTE);
        let mut rng = rand::thread_rng();

        let mut bytes = [0u8; COOKIE_LEN];
        for byte in bytes.iter_mut() {
            *byte = alphabet.sample(&mut rng);
        }
        Cookie(bytes)
    }
}

// Cookies end up in debug logs; never print the secret itself.
impl fmt::Debug for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cookie(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_cookies_are_printable() {
        let cookie = Cookie::generate();
        assert!(cookie
            .as_bytes()
            .iter()
            .all(|b| (COOKIE_MIN_BYTE..=COOKIE_MAX_BYTE).contains(b)));
    }

    #[test]
    fn generated_cookies_differ() {
        let a = Cookie::generate();
        let b = Cookie::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn debug_output_hides_bytes() {
        let cookie = Cookie::from_bytes([b'!'; COOKIE_LEN]);
        assert_eq!(format!("{:?}", cookie), "Cookie(..)");
    }
}
