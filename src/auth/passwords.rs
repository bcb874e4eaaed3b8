//! Password and card-number hashing, issued credentials

use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256, Sha512};

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Random per-user salt, stored alongside the hash
pub fn new_salt() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    hex(&bytes)
}

/// Salted SHA-256 digest of a password
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex(&hasher.finalize())
}

pub fn verify_password(password: &str, salt: &str, stored_hash: &str) -> bool {
    hash_password(password, salt) == stored_hash
}

/// One-way digest of a club payment-card number. The raw number is hashed
/// at club creation and again at top-up time; only digests are compared.
pub fn hash_card_number(card_number: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(card_number.as_bytes());
    hex(&hasher.finalize())
}

/// Credentials issued by a cinema manager for a new club representative:
/// a 6-digit username and an 8-character alphanumeric password, shown once.
pub fn issue_rep_credentials() -> (String, String) {
    let mut rng = rand::thread_rng();
    let username = rng.gen_range(100_000..=999_999).to_string();
    let password: String = (0..8).map(|_| rng.sample(Alphanumeric) as char).collect();
    (username, password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_verifies_with_its_own_salt_only() {
        let salt = new_salt();
        let hash = hash_password("s3cret", &salt);
        assert!(verify_password("s3cret", &salt, &hash));
        assert!(!verify_password("s3cret!", &salt, &hash));

        let other_salt = new_salt();
        assert!(!verify_password("s3cret", &other_salt, &hash));
    }

    #[test]
    fn test_card_hash_is_stable_and_never_raw() {
        let digest = hash_card_number("4929123456781234");
        assert_eq!(digest, hash_card_number("4929123456781234"));
        assert_ne!(digest, hash_card_number("4929123456781235"));
        // SHA-512 hex is 128 chars, so a raw PAN can never equal its digest
        assert_eq!(digest.len(), 128);
    }

    #[test]
    fn test_issued_credentials_shape() {
        let (username, password) = issue_rep_credentials();
        assert_eq!(username.len(), 6);
        assert!(username.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(password.len(), 8);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
