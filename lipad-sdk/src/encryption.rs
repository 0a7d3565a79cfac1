//! Payload encryption for the Lipad hosted checkout.
//!
//! The checkout page receives the merchant payload as an opaque string
//! produced by:
//!
//! ```text
//! iv     = hex(SHA-256(encryption_key))[..16]     (ASCII bytes)
//! key    = hex(SHA-256(shared_secret))[..32]      (ASCII bytes)
//! output = base64(AES-256-CBC/PKCS#7(key, iv, json(payload)))
//! ```
//!
//! The key material is the *text* of the lowercase hex digest, truncated,
//! not the raw digest bytes. The gateway decrypts with the same derivation,
//! so it must stay bit-for-bit identical.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use serde::Serialize;
use std::fmt;
use zeroize::Zeroizing;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const IV_LENGTH: usize = 16;
const KEY_LENGTH: usize = 32;

/// Errors produced by [`PayloadCipher`].
#[derive(Debug, thiserror::Error)]
pub enum EncryptionError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid key or iv length")]
    InvalidLength,
    #[error("invalid base64 encoding")]
    InvalidBase64,
    #[error("ciphertext could not be decrypted")]
    Decrypt,
}

/// AES-256-CBC cipher keyed from the client's encryption passphrase and
/// shared secret.
#[derive(Clone)]
pub struct PayloadCipher {
    iv: Zeroizing<[u8; IV_LENGTH]>,
    key: Zeroizing<[u8; KEY_LENGTH]>,
}

impl PayloadCipher {
    /// Derive the IV from `encryption_key` and the cipher key from
    /// `shared_secret`.
    pub fn new(encryption_key: &str, shared_secret: &str) -> Self {
        Self {
            iv: Zeroizing::new(hex_digest_prefix(encryption_key)),
            key: Zeroizing::new(hex_digest_prefix(shared_secret)),
        }
    }

    /// Serialize `payload` to compact JSON and encrypt it.
    pub fn encrypt<T: Serialize + ?Sized>(&self, payload: &T) -> Result<String, EncryptionError> {
        let json = serde_json::to_vec(payload)?;
        self.encrypt_bytes(&json)
    }

    /// Encrypt raw bytes and return standard, padded base64.
    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<String, EncryptionError> {
        let ciphertext = Aes256CbcEnc::new_from_slices(self.key.as_slice(), self.iv.as_slice())
            .map_err(|_| EncryptionError::InvalidLength)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);
        Ok(fast32::base64::RFC4648.encode(&ciphertext))
    }

    /// Reverse [`encrypt`](Self::encrypt), returning the decoded JSON value.
    pub fn decrypt(&self, encoded: &str) -> Result<serde_json::Value, EncryptionError> {
        let plaintext = self.decrypt_bytes(encoded)?;
        Ok(serde_json::from_slice(&plaintext)?)
    }

    /// Reverse [`encrypt_bytes`](Self::encrypt_bytes).
    pub fn decrypt_bytes(&self, encoded: &str) -> Result<Vec<u8>, EncryptionError> {
        let ciphertext = fast32::base64::RFC4648
            .decode_str(encoded.trim())
            .map_err(|_| EncryptionError::InvalidBase64)?;
        Aes256CbcDec::new_from_slices(self.key.as_slice(), self.iv.as_slice())
            .map_err(|_| EncryptionError::InvalidLength)?
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| EncryptionError::Decrypt)
    }
}

impl fmt::Debug for PayloadCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadCipher").finish_non_exhaustive()
    }
}

/// First `N` ASCII characters of the lowercase hex SHA-256 digest of `input`.
fn hex_digest_prefix<const N: usize>(input: &str) -> [u8; N] {
    let digest = ring::digest::digest(&ring::digest::SHA256, input.as_bytes());
    let hex = Zeroizing::new(hex::encode(digest.as_ref()));
    let mut out = [0u8; N];
    out.copy_from_slice(&hex.as_bytes()[..N]);
    out
}
