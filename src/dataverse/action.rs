use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::errors::InvocationError;

pub const AUDIT_SPACE_SNAPSHOT: &str = "unl_AuditSpaceSnapshot";

static GUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("guid pattern")
});

/// An unbound custom action: invoked by name, parameters sent as the JSON body.
pub trait UnboundAction: Serialize + Send + Sync {
    const OPERATION: &'static str;
}

/// Record GUID in the lowercase, brace-less form the action expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Accepts `{GUID}` as returned by form contexts as well as the bare form.
    pub fn parse(value: &str) -> Result<Self, InvocationError> {
        let trimmed = value.trim();
        let bare = trimmed
            .strip_prefix('{')
            .and_then(|v| v.strip_suffix('}'))
            .unwrap_or(trimmed);
        if !GUID.is_match(bare) {
            return Err(InvocationError::InvalidRecordId(value.to_owned()));
        }
        Ok(Self(bare.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parameters of `unl_AuditSpaceSnapshot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditSpaceSnapshot {
    #[serde(rename = "unl_EventName")]
    pub event_name: String,
    #[serde(rename = "unl_RecordId")]
    pub record_id: RecordId,
    #[serde(rename = "unl_TableLogicalName")]
    pub table_logical_name: String,
}

impl AuditSpaceSnapshot {
    pub fn new(
        event_name: &str,
        record_id: &str,
        table_logical_name: &str,
    ) -> Result<Self, InvocationError> {
        let event_name = required("unl_EventName", event_name)?;
        let table_logical_name = required("unl_TableLogicalName", table_logical_name)?;
        Ok(Self {
            event_name,
            record_id: RecordId::parse(record_id)?,
            table_logical_name,
        })
    }
}

impl UnboundAction for AuditSpaceSnapshot {
    const OPERATION: &'static str = AUDIT_SPACE_SNAPSHOT;
}

fn required(name: &'static str, value: &str) -> Result<String, InvocationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InvocationError::InvalidParameter {
            name,
            reason: "must not be empty".to_owned(),
        });
    }
    Ok(value.to_owned())
}
