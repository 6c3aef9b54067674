// ## 📂 File: `src/crypto/cipher.rs`

//! src/crypto/cipher.rs
//! AES-256 block cipher over whole in-memory buffers.
//!
//! Design notes:
//! - Key-file mode: CBC + PKCS#7 with the IV stored in the key file.
//! - Password mode: the primitive's default mode (ECB + PKCS#7), no IV.
//! - No integrity tag. A bad key is only detected when unpadding fails.
//! - Both modes fail closed: no partial plaintext on error.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};

use crate::crypto::kdf::DerivedKey;
use crate::crypto::key_material::KeyMaterial;
use crate::crypto::types::{ChainingMode, CipherMode, CryptoError, IV_LEN_16, KEY_LEN_32};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256EcbEnc = ecb::Encryptor<Aes256>;
type Aes256EcbDec = ecb::Decryptor<Aes256>;

/// Validated key (and IV) borrowed for the duration of one transform.
#[derive(Clone, Copy)]
pub enum BlockCipherEngine<'a> {
    Cbc { key: &'a [u8; KEY_LEN_32], iv: &'a [u8; IV_LEN_16] },
    Ecb { key: &'a [u8; KEY_LEN_32] },
}

impl<'a> BlockCipherEngine<'a> {
    /// Build an engine from raw slices. `Some(iv)` selects CBC, `None` selects ECB.
    pub fn new(key: &'a [u8], iv: Option<&'a [u8]>) -> Result<Self, CryptoError> {
        let key: &'a [u8; KEY_LEN_32] = key.try_into().map_err(|_| CryptoError::InvalidKeyLen {
            expected: KEY_LEN_32,
            actual: key.len(),
        })?;

        match iv {
            Some(iv) => {
                let iv: &'a [u8; IV_LEN_16] = iv.try_into().map_err(|_| CryptoError::InvalidIvLen {
                    expected: IV_LEN_16,
                    actual: iv.len(),
                })?;
                Ok(Self::Cbc { key, iv })
            }
            None => Ok(Self::Ecb { key }),
        }
    }

    pub fn from_key_material(material: &'a KeyMaterial) -> Self {
        Self::Cbc { key: material.key(), iv: material.iv() }
    }

    pub fn from_derived_key(key: &'a DerivedKey) -> Self {
        Self::Ecb { key: key.as_bytes() }
    }

    pub fn chaining(&self) -> ChainingMode {
        match self {
            Self::Cbc { .. } => ChainingMode::Cbc,
            Self::Ecb { .. } => ChainingMode::Ecb,
        }
    }

    /// Pad and encrypt `plaintext`. Output length is the next multiple of 16
    /// strictly greater than the input length.
    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        match *self {
            Self::Cbc { key, iv } => Aes256CbcEnc::new(key.into(), iv.into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            Self::Ecb { key } => Aes256EcbEnc::new(key.into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        }
    }

    /// Decrypt and unpad `ciphertext`.
    ///
    /// Errors:
    /// - `PaddingOrAuth` when the length is not block aligned or the padding is invalid.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let out = match *self {
            Self::Cbc { key, iv } => Aes256CbcDec::new(key.into(), iv.into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            Self::Ecb { key } => Aes256EcbDec::new(key.into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        };
        out.map_err(|_| CryptoError::PaddingOrAuth {
            mode: self.chaining(),
            len: ciphertext.len(),
        })
    }

    pub fn apply(&self, data: &[u8], mode: CipherMode) -> Result<Vec<u8>, CryptoError> {
        match mode {
            CipherMode::Encrypt => Ok(self.encrypt(data)),
            CipherMode::Decrypt => self.decrypt(data),
        }
    }
}

/// Summary: One-shot AES-256 transform of `data`.
/// - `iv = Some(_)`: CBC/PKCS#7 (key-file mode). The IV must be fresh per encryption.
/// - `iv = None`: ECB/PKCS#7 (password mode).
///
/// Errors:
/// - `InvalidKeyLen` / `InvalidIvLen` for malformed key material.
/// - `PaddingOrAuth` when decryption fails to unpad.
#[inline]
pub fn transform(
    data: &[u8],
    key: &[u8],
    iv: Option<&[u8]>,
    mode: CipherMode,
) -> Result<Vec<u8>, CryptoError> {
    BlockCipherEngine::new(key, iv)?.apply(data, mode)
}
