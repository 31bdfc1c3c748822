//! # Ledger Identifiers
//!
//! Canonical identifier types shared by every subsystem.
//!
//! - `AccountId`: `name@domain`
//! - `AssetId`: `name#domain`
//! - `RoleId`: bare lowercase name
//!
//! Names are `[a-z_0-9]{1,32}`; domains are DNS-like label sequences.
//! Comparisons are byte-exact. Identifiers serialize as their canonical
//! string form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum length of an account, asset, or role name.
pub const MAX_NAME_LENGTH: usize = 32;

/// Maximum length of a full domain.
pub const MAX_DOMAIN_LENGTH: usize = 255;

/// Maximum length of a single domain label.
const MAX_LABEL_LENGTH: usize = 63;

/// A domain identifier (DNS-like label sequence).
pub type DomainId = String;

/// Errors produced when parsing an identifier from its string form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    /// Name part violates `[a-z_0-9]{1,32}`.
    #[error("invalid name part: {0:?}")]
    InvalidName(String),

    /// Domain part is not a valid DNS-like label sequence.
    #[error("invalid domain part: {0:?}")]
    InvalidDomain(String),

    /// The separator for this identifier kind is missing or repeated.
    #[error("expected exactly one {separator:?} in {input:?}")]
    MissingSeparator { separator: char, input: String },
}

/// Returns true iff `s` is a valid name: `[a-z_0-9]{1,32}`.
pub fn is_valid_name(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_NAME_LENGTH
        && s.bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Returns true iff `s` is a valid DNS-like domain.
///
/// Labels are separated by dots, each `1..=63` characters of lowercase
/// alphanumerics with interior hyphens allowed.
pub fn is_valid_domain(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_DOMAIN_LENGTH {
        return false;
    }
    s.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LENGTH
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    })
}

fn split_once_exact(input: &str, separator: char) -> Result<(&str, &str), IdParseError> {
    let mut parts = input.splitn(2, separator);
    let name = parts.next().unwrap_or_default();
    let domain = parts.next().ok_or_else(|| IdParseError::MissingSeparator {
        separator,
        input: input.to_owned(),
    })?;
    if domain.contains(separator) {
        return Err(IdParseError::MissingSeparator {
            separator,
            input: input.to_owned(),
        });
    }
    Ok((name, domain))
}

/// An account identifier: `name@domain`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId {
    name: String,
    domain: DomainId,
}

impl AccountId {
    /// Builds an account id from validated parts.
    pub fn new(name: &str, domain: &str) -> Result<Self, IdParseError> {
        if !is_valid_name(name) {
            return Err(IdParseError::InvalidName(name.to_owned()));
        }
        if !is_valid_domain(domain) {
            return Err(IdParseError::InvalidDomain(domain.to_owned()));
        }
        Ok(Self {
            name: name.to_owned(),
            domain: domain.to_owned(),
        })
    }

    /// The local name part.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The domain part.
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.domain)
    }
}

impl FromStr for AccountId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, domain) = split_once_exact(s, '@')?;
        Self::new(name, domain)
    }
}

impl TryFrom<String> for AccountId {
    type Error = IdParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.to_string()
    }
}

/// An asset identifier: `name#domain`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId {
    name: String,
    domain: DomainId,
}

impl AssetId {
    /// Builds an asset id from validated parts.
    pub fn new(name: &str, domain: &str) -> Result<Self, IdParseError> {
        if !is_valid_name(name) {
            return Err(IdParseError::InvalidName(name.to_owned()));
        }
        if !is_valid_domain(domain) {
            return Err(IdParseError::InvalidDomain(domain.to_owned()));
        }
        Ok(Self {
            name: name.to_owned(),
            domain: domain.to_owned(),
        })
    }

    /// The local name part.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The domain part.
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.domain)
    }
}

impl FromStr for AssetId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, domain) = split_once_exact(s, '#')?;
        Self::new(name, domain)
    }
}

impl TryFrom<String> for AssetId {
    type Error = IdParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AssetId> for String {
    fn from(id: AssetId) -> Self {
        id.to_string()
    }
}

/// A role identifier: `[a-z_0-9]{1,32}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleId(String);

impl RoleId {
    /// Builds a role id from a validated name.
    pub fn new(name: &str) -> Result<Self, IdParseError> {
        if !is_valid_name(name) {
            return Err(IdParseError::InvalidName(name.to_owned()));
        }
        Ok(Self(name.to_owned()))
    }

    /// The role name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoleId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RoleId {
    type Error = IdParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RoleId> for String {
    fn from(id: RoleId) -> Self {
        id.0
    }
}
