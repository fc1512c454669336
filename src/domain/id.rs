use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::error::TodoError;

/// Identifier scheme of a store backend.
pub trait TodoId:
    Clone + Debug + Display + FromStr + Serialize + PartialEq + Eq + Send + Sync + 'static
{
}

impl<T> TodoId for T where
    T: Clone + Debug + Display + FromStr + Serialize + PartialEq + Eq + Send + Sync + 'static
{
}

/// Parses a raw path segment into the backend's identifier type.
pub fn parse_id<I: TodoId>(raw: &str) -> Result<I, TodoError> {
    raw.parse::<I>().map_err(|_| TodoError::InvalidId(raw.to_string()))
}

/// Opaque identifier assigned by the persistent store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn generate() -> Self { Self(Uuid::new_v4()) }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { Display::fmt(&self.0.hyphenated(), f) }
}

impl FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Uuid::parse_str(s).map(Self) }
}

/// Counter-based identifier handed out by the in-memory store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SequentialId(pub u64);

impl Display for SequentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { Display::fmt(&self.0, f) }
}

#[derive(Debug, Error)]
#[error("malformed sequential id")]
pub struct MalformedSequentialId;

impl FromStr for SequentialId {
    type Err = MalformedSequentialId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MalformedSequentialId);
        }
        s.parse().map(Self).map_err(|_| MalformedSequentialId)
    }
}
