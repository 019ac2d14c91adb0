//! # Domain Model: Client Records
//!
//! This module defines the one entity the store knows about, [`Client`], and the
//! two inputs that produce or change it: [`ClientDraft`] and [`ClientPatch`].
//!
//! ## Identity and Timestamps
//!
//! - `id` is a UUID v4 assigned by the repository on create. Callers never supply it.
//! - `created_at` is stamped once on create and is never rewritten.
//!
//! Both fields are therefore absent from the inputs: a draft carries only the
//! user-editable fields, and a patch can only touch those same fields.
//!
//! ## Partial Updates
//!
//! [`ClientPatch`] tracks each field as an `Option`. `None` means "keep the current
//! value", so `ClientPatch { age: Some(40), ..Default::default() }` changes only the
//! age. There is no way to clear a field: every field of a client is required.
//!
//! ## Persisted Timestamps
//!
//! New records serialize `created_at` as RFC 3339 (`2024-05-01T10:00:00Z`). Older
//! files were written with naive local ISO timestamps (`2024-05-01T10:00:00.123456`);
//! those are read back as UTC so the files stay loadable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub age: u8,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn new(id: Uuid, draft: ClientDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            last_name: draft.last_name,
            age: draft.age,
            created_at,
        }
    }

    /// Apply the supplied fields of `patch`. Returns `true` if any value changed.
    pub fn apply(&mut self, patch: ClientPatch) -> bool {
        let mut changed = false;
        if let Some(name) = patch.name {
            changed |= self.name != name;
            self.name = name;
        }
        if let Some(last_name) = patch.last_name {
            changed |= self.last_name != last_name;
            self.last_name = last_name;
        }
        if let Some(age) = patch.age {
            changed |= self.age != age;
            self.age = age;
        }
        changed
    }
}

/// Fields required to create a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDraft {
    pub name: String,
    pub last_name: String,
    pub age: u8,
}

impl ClientDraft {
    pub fn new(name: impl Into<String>, last_name: impl Into<String>, age: u8) -> Self {
        Self {
            name: name.into(),
            last_name: last_name.into(),
            age,
        }
    }
}

/// Fields to replace on update. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<u8>,
}

pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    const NAIVE_ISO: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => Ok(dt.with_timezone(&Utc)),
            // Legacy files carry no offset
            Err(err) => NaiveDateTime::parse_from_str(raw, NAIVE_ISO)
                .map(|naive| naive.and_utc())
                .map_err(|_| err),
        }
    }
}
