//! Request and response schemas.

use std::fmt;

use thiserror::Error;
use zeroize::Zeroizing;

use crate::codec::Fields;
use crate::derivation::argon2::{MIN_SALT_LEN, TAG_LENGTH};

/// A 32-byte Argon2 tag.
pub type Digest = [u8; TAG_LENGTH as usize];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("salt must be at least {} bytes, got {len}", MIN_SALT_LEN)]
    SaltTooShort { len: usize },
}

/// Caller inputs for one hash.
///
/// Password and key are wiped from memory when dropped.
#[derive(Clone, Default)]
pub struct Credentials {
    password: Zeroizing<Vec<u8>>,
    salt: Vec<u8>,
    key: Option<Zeroizing<Vec<u8>>>,
    ad: Option<Vec<u8>>,
}

impl Credentials {
    pub fn new(password: impl Into<Vec<u8>>, salt: impl Into<Vec<u8>>) -> Self {
        Self {
            password: Zeroizing::new(password.into()),
            salt: salt.into(),
            key: None,
            ad: None,
        }
    }

    /// Sets the secret key (Argon2 `K`).
    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(Zeroizing::new(key.into()));
        self
    }

    /// Sets the associated data (Argon2 `X`).
    pub fn with_ad(mut self, ad: impl Into<Vec<u8>>) -> Self {
        self.ad = Some(ad.into());
        self
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.salt.len() < MIN_SALT_LEN {
            return Err(ValidationError::SaltTooShort {
                len: self.salt.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &"<redacted>")
            .field("salt", &self.salt)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("ad", &self.ad)
            .finish()
    }
}

/// A hash request as delivered to the worker.
///
/// Only constructible from valid credentials.
#[derive(Debug)]
pub struct HashRequest {
    callid: u64,
    credentials: Credentials,
}

impl HashRequest {
    pub fn new(callid: u64, credentials: Credentials) -> Result<Self, ValidationError> {
        credentials.validate()?;
        Ok(Self::validated(callid, credentials))
    }

    /// Wraps credentials the caller has already validated.
    pub(crate) fn validated(callid: u64, credentials: Credentials) -> Self {
        Self {
            callid,
            credentials,
        }
    }

    pub fn callid(&self) -> u64 {
        self.callid
    }

    /// The inputs in parameter block order.
    pub fn fields(&self) -> Fields<'_> {
        let c = &self.credentials;
        Fields {
            password: &c.password,
            salt: &c.salt,
            key: c.key.as_deref().map(Vec::as_slice),
            ad: c.ad.as_deref(),
        }
    }
}

/// The worker's answer to one request.
///
/// A successful response always carries a digest and a failed one never
/// does; failures carry no further detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashResponse {
    callid: u64,
    data: Option<Digest>,
}

impl HashResponse {
    pub fn completed(callid: u64, digest: Digest) -> Self {
        Self {
            callid,
            data: Some(digest),
        }
    }

    pub fn failed(callid: u64) -> Self {
        Self { callid, data: None }
    }

    pub fn callid(&self) -> u64 {
        self.callid
    }

    pub fn success(&self) -> bool {
        self.data.is_some()
    }

    pub fn data(&self) -> Option<&Digest> {
        self.data.as_ref()
    }
}
