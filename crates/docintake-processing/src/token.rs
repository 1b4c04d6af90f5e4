//! Integrity tokens binding a submitter to a stored document.
//!
//! A token is the hex HMAC-SHA256 of `"{submitter_id}:{file_path}:{file_url}"`
//! under the service secret. Tokens are deterministic and carry no expiry.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct TokenIssuer {
    key: Vec<u8>,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").field("key", &"<redacted>").finish()
    }
}

impl TokenIssuer {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            key: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self, submitter_id: &str, file_path: &str, file_url: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key size");
        mac.update(format!("{}:{}:{}", submitter_id, file_path, file_url).as_bytes());
        mac
    }

    /// 64-character lowercase hex token.
    pub fn issue(&self, submitter_id: &str, file_path: &str, file_url: &str) -> String {
        hex::encode(self.mac(submitter_id, file_path, file_url).finalize().into_bytes())
    }

    /// Constant-time check of a presented token.
    pub fn verify(&self, submitter_id: &str, file_path: &str, file_url: &str, token: &str) -> bool {
        let Ok(presented) = hex::decode(token) else {
            return false;
        };
        self.mac(submitter_id, file_path, file_url)
            .verify_slice(&presented)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn token_is_deterministic_hex() {
        let issuer = TokenIssuer::new(SECRET);
        let a = issuer.issue("u-1", "/tmp/x/cv.pdf", "https://cdn/cvs/cv.pdf");
        let b = issuer.issue("u-1", "/tmp/x/cv.pdf", "https://cdn/cvs/cv.pdf");

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn every_input_affects_token() {
        let issuer = TokenIssuer::new(SECRET);
        let base = issuer.issue("u-1", "/p", "https://u");

        assert_ne!(base, issuer.issue("u-2", "/p", "https://u"));
        assert_ne!(base, issuer.issue("u-1", "/q", "https://u"));
        assert_ne!(base, issuer.issue("u-1", "/p", "https://v"));
        assert_ne!(base, TokenIssuer::new("another-secret").issue("u-1", "/p", "https://u"));
    }

    #[test]
    fn token_is_hmac_over_colon_joined_inputs() {
        let issuer = TokenIssuer::new("Jefe");
        let mut mac = HmacSha256::new_from_slice(b"Jefe").unwrap();
        mac.update(b"u-1:/tmp/upload/cv.pdf:https://cdn/cvs/cv.pdf");

        assert_eq!(
            issuer.issue("u-1", "/tmp/upload/cv.pdf", "https://cdn/cvs/cv.pdf"),
            hex::encode(mac.finalize().into_bytes())
        );
    }

    #[test]
    fn verify_accepts_only_matching_token() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer.issue("u-1", "/p", "https://u");

        assert!(issuer.verify("u-1", "/p", "https://u", &token));
        assert!(!issuer.verify("u-1", "/p", "https://other", &token));
        assert!(!issuer.verify("u-1", "/p", "https://u", "not-hex"));
        assert!(!issuer.verify("u-1", "/p", "https://u", &token[..32]));
    }

    #[test]
    fn debug_redacts_key() {
        let issuer = TokenIssuer::new(SECRET);
        assert!(!format!("{:?}", issuer).contains(SECRET));
    }
}
