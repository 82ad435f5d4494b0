//! URL-parameter user profiles and the ECB cut-and-paste forgery against
//! an oracle that encrypts them.

use std::collections::HashMap;
use std::fmt::Display;

use crate::aes::{decrypt_aes_128_ecb, encrypt_aes_128_ecb, BLOCK_SIZE};
use crate::error::CrackError;
use crate::pkcs7::pkcs7_pad;

#[derive(Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub email: String,
    pub uid: u32,
    pub role: String,
}

impl UserProfile {
    /// Build the profile for an email address: fixed uid, role `user`.
    /// Metacharacters that would let the caller inject their own fields
    /// are rejected.
    pub fn profile_for(email: &str) -> Result<Self, CrackError> {
        if email.contains(['&', '=']) {
            return Err(CrackError::InvalidInput(
                "email address must not contain '&' or '='".into(),
            ));
        }
        Ok(Self {
            email: email.to_string(),
            uid: 10,
            role: "user".to_string(),
        })
    }
}

impl Display for UserProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "email={}&uid={}&role={}", self.email, self.uid, self.role)
    }
}

impl TryFrom<&str> for UserProfile {
    type Error = CrackError;

    fn try_from(encoded: &str) -> Result<Self, Self::Error> {
        let params = parse_params(encoded);
        let field = |key: &str| {
            params
                .get(key)
                .cloned()
                .ok_or_else(|| CrackError::InvalidInput(format!("profile is missing '{key}'")))
        };
        Ok(Self {
            email: field("email")?,
            uid: field("uid")?
                .parse()
                .map_err(|e| CrackError::InvalidInput(format!("uid is not a number: {e}")))?,
            role: field("role")?,
        })
    }
}

/// Parse a `k=v&k2=v2` parameter string. Malformed pairs are dropped.
pub fn parse_params(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Encrypts encoded profiles under a session-fixed key.
pub struct UserProfileOracle {
    key: [u8; BLOCK_SIZE],
}

impl UserProfileOracle {
    pub fn new(key: [u8; BLOCK_SIZE]) -> Self {
        Self { key }
    }

    pub fn profile_for(&self, email: &str) -> Result<Vec<u8>, CrackError> {
        let profile = UserProfile::profile_for(email)?;
        Ok(encrypt_aes_128_ecb(profile.to_string().as_bytes(), &self.key))
    }

    /// Decrypt and parse a profile ciphertext; the consuming side of the
    /// oracle, used to check what a forged ciphertext grants.
    pub fn open(&self, ciphertext: &[u8]) -> Result<UserProfile, CrackError> {
        let decoded = decrypt_aes_128_ecb(ciphertext, &self.key);
        UserProfile::try_from(String::from_utf8_lossy(&decoded).as_ref())
    }
}

/// Forge a `role=admin` ciphertext from a profile oracle by cutting and
/// pasting ECB blocks. Returns the email the forged profile carries and
/// the forged ciphertext.
pub fn forge_admin_profile(oracle: &UserProfileOracle) -> Result<(String, Vec<u8>), CrackError> {
    // "email=" is 6 bytes, so 10 filler characters land the next byte at a
    // block boundary; the second block of this ciphertext encrypts
    // "admin" plus a full PKCS#7 padding run.
    let cut_email = [b"AAAAAAAAAA".to_vec(), pkcs7_pad(b"admin", BLOCK_SIZE as u8)].concat();
    let cut = oracle.profile_for(&String::from_utf8_lossy(&cut_email))?;
    let admin_block = &cut[BLOCK_SIZE..2 * BLOCK_SIZE];

    // A 13-character email makes "email=<..>&uid=10&role=" exactly two
    // blocks, so the role value is the whole final block. Swap it.
    let paste_email = "foo13@bar.com";
    let paste = oracle.profile_for(paste_email)?;
    let forged = [&paste[..2 * BLOCK_SIZE], admin_block].concat();
    Ok((paste_email.to_string(), forged))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::oracle::random_key;

    #[test]
    fn parse_params_parses_query_arguments() {
        let parsed = parse_params("foo=bar&baz=qux&zap=zazzle");

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed["foo"], "bar");
        assert_eq!(parsed["baz"], "qux");
        assert_eq!(parsed["zap"], "zazzle");
    }

    #[test]
    fn profile_encoding_round_trips() {
        let profile = UserProfile::profile_for("foo@bar.com").unwrap();

        let encoded = profile.to_string();

        assert_eq!(encoded, "email=foo@bar.com&uid=10&role=user");
        assert_eq!(UserProfile::try_from(encoded.as_str()).unwrap(), profile);
    }

    #[test]
    fn metacharacters_in_emails_are_rejected() {
        let result = UserProfile::profile_for("foo@bar.com&role=admin");

        assert!(matches!(result, Err(CrackError::InvalidInput(_))));
    }

    #[test]
    fn cut_and_paste_forges_an_admin_profile() {
        let oracle = UserProfileOracle::new(random_key());

        let (email, forged) = forge_admin_profile(&oracle).unwrap();
        let profile = oracle.open(&forged).unwrap();

        assert_eq!(profile.email, email);
        assert_eq!(profile.role, "admin");
    }
}
