use rand::RngCore;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use sha2::{Digest, Sha256};

use crate::modules::models::admin::AdminToken;
use crate::modules::models::general::establish_connection;

/// # hash a password with a fresh random salt
/// stored as `<salt-hex>$<digest-hex>`
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);

    format!(
        "{}${}",
        hex::encode(salt),
        hex::encode(digest_with_salt(&salt, password))
    )
}

/// # check a plain text password against a stored `salt$digest` pair
/// anything that does not decode as such a pair simply fails the check
pub fn verify_password(stored: &str, password: &str) -> bool {
    let (salt_hex, digest_hex) = match stored.split_once('$') {
        Some(parts) => parts,
        None => return false,
    };

    let salt = match hex::decode(salt_hex) {
        Ok(salt) => salt,
        Err(_) => return false,
    };

    hex::encode(digest_with_salt(&salt, password)) == digest_hex
}

fn digest_with_salt(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

/// # generate a bearer token
/// 32 random bytes, hex encoded
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// request guard for the admin endpoints.
///
/// pulls the bearer token out of the Authorization header and checks it
/// against the issued tokens; anything missing, unknown or expired is a
/// 401 before the handler runs.
pub struct AdminSession {
    pub username: String,
    pub token: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminSession {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let token = match request
            .headers()
            .get_one("Authorization")
            .and_then(|header| header.strip_prefix("Bearer "))
        {
            Some(token) => token.to_string(),
            None => return Outcome::Error((Status::Unauthorized, ())),
        };

        let conn = &mut establish_connection();
        match AdminToken::from_token(conn, &token) {
            Ok(session) if !session.is_expired() => Outcome::Success(AdminSession {
                username: session.username,
                token,
            }),
            _ => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let stored = hash_password("paddock pass");
        assert!(verify_password(&stored, "paddock pass"));
    }

    #[test]
    fn wrong_password_fails() {
        let stored = hash_password("paddock pass");
        assert!(!verify_password(&stored, "paddock Pass"));
        assert!(!verify_password(&stored, ""));
    }

    #[test]
    fn equal_passwords_get_different_salts() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn garbage_digests_never_verify() {
        assert!(!verify_password("", "anything"));
        assert!(!verify_password("no-separator", "anything"));
        assert!(!verify_password("zz$not-hex", "anything"));
    }

    #[test]
    fn tokens_are_long_and_unique() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert_ne!(token, generate_token());
    }
}
