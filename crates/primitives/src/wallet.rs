//! A `KeyedAccount` is a wrapper around an ethers wallet derived from a BIP-39 seed phrase
//! for one BIP-44 path, whose key material can be scrubbed on demand.
use crate::constants::derivation::BIP44_PREFIX;
use ethers::{
    core::k256::ecdsa::SigningKey,
    signers::{coins_bip39::English, MnemonicBuilder, Signer},
    types::{Address, Bytes, Signature, H256},
    utils::hash_message,
};
use parking_lot::RwLock;
use std::fmt;
use thiserror::Error;
use tracing::trace;

/// Keyed account errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyedAccountError {
    /// Key derivation failed
    #[error("derivation error: {inner}")]
    Derivation {
        /// The inner error message
        inner: String,
    },

    /// Signing failed
    #[error("signing error: {inner}")]
    Signing {
        /// The inner error message
        inner: String,
    },

    /// Key material was scrubbed
    #[error("the account has been disposed")]
    Disposed,
}

/// Public and (while not disposed) private key of a keyed account
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    /// Uncompressed SEC1 public key
    pub public_key: Bytes,
    /// Raw private key, `None` after disposal
    pub private_key: Option<Bytes>,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// One derived keypair for one BIP-44 path
pub struct KeyedAccount {
    /// Path relative to `m/44'/60'`
    path: String,
    address: Address,
    public_key: Bytes,
    signer: RwLock<Option<ethers::signers::Wallet<SigningKey>>>,
}

impl KeyedAccount {
    /// Derives the account at `m/44'/60'/{path}` from the given mnemonic phrase
    ///
    /// # Arguments
    /// * `phrase` - The mnemonic phrase
    /// * `path` - The path segment after the coin type, e.g. `0'/0/5`
    ///
    /// # Returns
    /// * `Self` - A new `KeyedAccount` instance
    pub fn from_phrase(phrase: &str, path: &str) -> Result<Self, KeyedAccountError> {
        let full_path = Self::full_path(path);
        let signer = MnemonicBuilder::<English>::default()
            .phrase(phrase)
            .derivation_path(&full_path)
            .and_then(|builder| builder.build())
            .map_err(|e| KeyedAccountError::Derivation { inner: e.to_string() })?;

        let public_key =
            Bytes::from(signer.signer().verifying_key().to_encoded_point(false).as_bytes().to_vec());
        let address = signer.address();
        trace!("Derived account {address:?} at {full_path}");

        Ok(Self { path: path.into(), address, public_key, signer: RwLock::new(Some(signer)) })
    }

    /// Full BIP-44 path for a relative path segment
    pub fn full_path(path: &str) -> String {
        format!("{BIP44_PREFIX}/{path}")
    }

    /// Path relative to `m/44'/60'`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Address of the key (owner of the smart account)
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn is_disposed(&self) -> bool {
        self.signer.read().is_none()
    }

    pub fn key_pair(&self) -> KeyPair {
        KeyPair {
            public_key: self.public_key.clone(),
            private_key: self
                .signer
                .read()
                .as_ref()
                .map(|signer| Bytes::from(signer.signer().to_bytes().to_vec())),
        }
    }

    /// Signs the message (EIP-191 personal message)
    pub fn sign_message(&self, message: &[u8]) -> Result<Signature, KeyedAccountError> {
        self.sign_hash(hash_message(message))
    }

    /// Signs a prehashed message
    pub fn sign_hash(&self, hash: H256) -> Result<Signature, KeyedAccountError> {
        let guard = self.signer.read();
        let signer = guard.as_ref().ok_or(KeyedAccountError::Disposed)?;
        signer.sign_hash(hash).map_err(|e| KeyedAccountError::Signing { inner: e.to_string() })
    }

    /// Signs a user operation hash the way ECDSA-validated smart accounts expect it
    /// (EIP-191 over the 32 hash bytes)
    pub fn sign_user_operation_hash(&self, hash: H256) -> Result<Bytes, KeyedAccountError> {
        self.sign_message(hash.as_bytes()).map(|sig| sig.to_vec().into())
    }

    /// Verifies that `signature` over `message` was produced by this account
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        signature.verify(message.to_vec(), self.address).is_ok()
    }

    /// Scrubs the private key (the underlying key zeroizes on drop). Safe to call repeatedly.
    pub fn dispose(&self) {
        if self.signer.write().take().is_some() {
            trace!("Disposed key material of {:?}", self.address);
        }
    }
}

impl fmt::Debug for KeyedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedAccount")
            .field("path", &self.path)
            .field("address", &self.address)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
