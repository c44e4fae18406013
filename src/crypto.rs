//! Field-level encryption for bank and withdrawal details.
//!
//! Ciphertext is `base64(nonce[12] || ciphertext || tag)`. Without a configured key the
//! encryptor runs in passthrough mode and stores plaintext.

use aes_gcm::{aead::Aead, AeadCore, Aes256Gcm, KeyInit, Nonce};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;
use thiserror::Error;

const NONCE_SIZE: usize = 12;

#[derive(Debug, Error)]
pub enum CryptoError {
	#[error("encryption failed: {0}")]
	EncryptionFailed(String),
	#[error("decryption failed: {0}")]
	DecryptionFailed(String),
	#[error("invalid key length: expected 32 bytes, got {0}")]
	InvalidKeyLength(usize),
	#[error("invalid key encoding: {0}")]
	InvalidKeyEncoding(String),
	#[error("invalid ciphertext: {0}")]
	InvalidCiphertext(String),
	#[error("json error: {0}")]
	Json(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct FieldEncryptor {
	cipher: Option<Aes256Gcm>,
}

impl FieldEncryptor {
	pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
		if key.len() != 32 {
			return Err(CryptoError::InvalidKeyLength(key.len()));
		}
		let cipher = Aes256Gcm::new_from_slice(key)
			.map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
		Ok(Self { cipher: Some(cipher) })
	}

	pub fn passthrough() -> Self {
		Self { cipher: None }
	}

	/// Key as configured in `BANK_DATA_KEY`: standard base64 of 32 bytes.
	pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
		let bytes = BASE64
			.decode(encoded.trim())
			.map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;
		Self::new(&bytes)
	}

	pub fn is_enabled(&self) -> bool {
		self.cipher.is_some()
	}

	pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
		let Some(cipher) = &self.cipher else {
			return Ok(plaintext.to_string());
		};

		let nonce = Aes256Gcm::generate_nonce(&mut aes_gcm::aead::OsRng);
		let ciphertext = cipher
			.encrypt(&nonce, plaintext.as_bytes())
			.map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

		let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
		combined.extend_from_slice(&nonce);
		combined.extend_from_slice(&ciphertext);
		Ok(BASE64.encode(&combined))
	}

	pub fn decrypt(&self, encoded: &str) -> Result<String, CryptoError> {
		let Some(cipher) = &self.cipher else {
			return Ok(encoded.to_string());
		};

		let combined =
			BASE64.decode(encoded).map_err(|e| CryptoError::InvalidCiphertext(e.to_string()))?;
		if combined.len() <= NONCE_SIZE {
			return Err(CryptoError::InvalidCiphertext(format!(
				"expected more than {NONCE_SIZE} bytes, got {}",
				combined.len()
			)));
		}
		let (nonce, ciphertext) = combined.split_at(NONCE_SIZE);
		let plaintext = cipher
			.decrypt(Nonce::from_slice(nonce), ciphertext)
			.map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;
		String::from_utf8(plaintext).map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
	}

	pub fn encrypt_json<T: Serialize>(&self, value: &T) -> Result<String, CryptoError> {
		self.encrypt(&serde_json::to_string(value)?)
	}
}

impl std::fmt::Debug for FieldEncryptor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FieldEncryptor").field("enabled", &self.is_enabled()).finish()
	}
}
