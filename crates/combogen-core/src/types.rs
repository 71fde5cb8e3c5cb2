use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validation::MAX_TYPES;

/// Identifier assigned by the storage engine to a persisted selection set.
pub type GenerationId = i64;

/// One valid ordered combination of item names.
pub type Selection = Vec<String>;

/// Every selection produced for one request, in enumeration order.
pub type SelectionSet = Vec<Selection>;

/// Single-letter label grouping the items of one pool (pool 0 is `A`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeLabel(char);

impl TypeLabel {
    /// Label for the pool at `index`, or `None` past `Z`.
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= MAX_TYPES {
            return None;
        }
        let offset = u8::try_from(index).ok()?;
        Some(Self(char::from(b'A' + offset)))
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for TypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A generated item such as `B2`: second item of pool `B`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub type_label: TypeLabel,
    /// 1-based position within its pool.
    pub index: u32,
}

impl Item {
    pub fn new(type_label: TypeLabel, index: u32) -> Self {
        Self {
            name: format!("{type_label}{index}"),
            type_label,
            index,
        }
    }
}

/// Request payload: item counts per pool plus the target selection length.
///
/// Stored verbatim in the audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub items: Vec<u32>,
    pub length: usize,
}

impl GenerationRequest {
    pub fn new(items: Vec<u32>, length: usize) -> Self {
        Self { items, length }
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Durable result of one generation request; also the response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub id: GenerationId,
    #[serde(rename = "combination")]
    pub selections: SelectionSet,
}

impl GenerationRecord {
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
