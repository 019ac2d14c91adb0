//! Wire-level request/response shapes and their field validation.
//!
//! Requests arrive with loose types (`age` as any integer, strings of any length)
//! and are turned into [`ClientDraft`] / [`ClientPatch`] only after every field
//! passes. All violations are reported together.

use crate::model::{Client, ClientDraft, ClientPatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub const NAME_MAX_CHARS: usize = 100;
pub const AGE_MAX: i64 = 150;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    pub last_name: String,
    pub age: i64,
}

impl CreateClientRequest {
    pub fn validate(self) -> Result<ClientDraft, ValidationError> {
        let mut violations = Vec::new();
        check_text("name", &self.name, &mut violations);
        check_text("last_name", &self.last_name, &mut violations);
        let age = check_age(self.age, &mut violations);

        match age {
            Some(age) if violations.is_empty() => Ok(ClientDraft {
                name: self.name,
                last_name: self.last_name,
                age,
            }),
            _ => Err(ValidationError { violations }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateClientRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
}

impl UpdateClientRequest {
    pub fn validate(self) -> Result<ClientPatch, ValidationError> {
        let mut violations = Vec::new();
        if let Some(name) = &self.name {
            check_text("name", name, &mut violations);
        }
        if let Some(last_name) = &self.last_name {
            check_text("last_name", last_name, &mut violations);
        }
        let age = self.age.and_then(|age| check_age(age, &mut violations));

        if !violations.is_empty() {
            return Err(ValidationError { violations });
        }
        Ok(ClientPatch {
            name: self.name,
            last_name: self.last_name,
            age,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientResponse {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub age: u8,
    pub created_at: DateTime<Utc>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            last_name: client.last_name,
            age: client.age,
            created_at: client.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Validation failed: {}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn check_text(field: &'static str, value: &str, violations: &mut Vec<FieldViolation>) {
    let len = value.chars().count();
    if len == 0 || len > NAME_MAX_CHARS {
        violations.push(FieldViolation {
            field,
            message: format!(
                "must be between 1 and {} characters (got {})",
                NAME_MAX_CHARS, len
            ),
        });
    }
}

fn check_age(age: i64, violations: &mut Vec<FieldViolation>) -> Option<u8> {
    if (0..=AGE_MAX).contains(&age) {
        u8::try_from(age).ok()
    } else {
        violations.push(FieldViolation {
            field: "age",
            message: format!("must be between 0 and {} (got {})", AGE_MAX, age),
        });
        None
    }
}
