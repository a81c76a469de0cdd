use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};

const VERSION_BYTE: u8 = 0x01;
const NONCE_LEN: usize = 12;

/// Encrypts auth-config secret material at rest.
///
/// Envelope layout: version byte, 96-bit nonce, AES-256-GCM ciphertext.
/// Without a configured key the JSON plaintext is stored as-is, which keeps
/// local development working against an empty environment.
#[derive(Debug, Clone)]
pub struct SecretCipher {
    key: Option<[u8; 32]>,
}

impl SecretCipher {
    /// Build from an optional 32-byte hex key (64 hex chars)
    pub fn from_hex_key(key_hex: Option<&str>) -> AppResult<Self> {
        let key = match key_hex {
            None => None,
            Some(hex_str) => {
                let bytes = hex::decode(hex_str.trim())
                    .map_err(|_| AppError::Internal("encryption key is not valid hex".into()))?;
                let key: [u8; 32] = bytes.try_into().map_err(|_| {
                    AppError::Internal("encryption key must be exactly 32 bytes".into())
                })?;
                Some(key)
            }
        };
        Ok(Self { key })
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }

    /// Serialize `value` to JSON and seal it when a key is configured
    pub fn encrypt_json<T: Serialize>(&self, value: &T) -> AppResult<Vec<u8>> {
        let plain = serde_json::to_vec(value)
            .map_err(|e| AppError::Internal(format!("secrets serialization failed: {}", e)))?;

        let Some(key) = &self.key else {
            return Ok(plain);
        };

        let cipher = Aes256Gcm::new(key.into());
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plain.as_ref())
            .map_err(|e| AppError::Internal(format!("secrets encryption failed: {:?}", e)))?;

        let mut out = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
        out.push(VERSION_BYTE);
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Open a sealed envelope (or parse stored plaintext JSON)
    pub fn decrypt_json(&self, data: &[u8]) -> AppResult<serde_json::Value> {
        let sealed = data.first() == Some(&VERSION_BYTE) && data.len() > 1 + NONCE_LEN;
        if !sealed {
            return serde_json::from_slice(data)
                .map_err(|e| AppError::Internal(format!("stored secrets are not JSON: {}", e)));
        }

        let Some(key) = &self.key else {
            return Err(AppError::Internal(
                "stored secrets are encrypted but no encryption key is configured".into(),
            ));
        };

        let cipher = Aes256Gcm::new(key.into());
        let (nonce_bytes, ciphertext) = data[1..].split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plain = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| AppError::Internal(format!("secrets decryption failed: {:?}", e)))?;

        serde_json::from_slice(&plain)
            .map_err(|e| AppError::Internal(format!("decrypted secrets are not JSON: {}", e)))
    }
}
