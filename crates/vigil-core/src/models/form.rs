use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::config::FormConfig;

/// Sender name used when the submitter gave neither a name nor an email.
pub const ANONYMOUS_SENDER: &str = "Anonymous";

/// User-entered form values.
///
/// The well-known keys are typed; anything else a form collects goes into
/// `extra` and is sent flat alongside them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(&key.into(), value);
        self
    }

    /// Set a field by key, routing well-known keys to their typed slot.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match key {
            "name" => self.name = Some(value),
            "email" => self.email = Some(value),
            "phone" => self.phone = Some(value),
            "message" => self.message = Some(value),
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
    }

    /// Most specific identity available: name, then email, then "Anonymous".
    pub fn sender_name(&self) -> &str {
        non_blank(&self.name)
            .or_else(|| non_blank(&self.email))
            .unwrap_or(ANONYMOUS_SENDER)
    }

    /// Flat key/value view. Typed keys win over an `extra` entry of the same name.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map: Map<String, Value> = self
            .extra
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();

        let typed = [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("message", &self.message),
        ];
        for (key, value) in typed {
            if let Some(v) = value {
                map.insert(key.to_string(), Value::String(v.clone()));
            }
        }
        map
    }
}

/// Values the submitter adds on top of the user's fields.
#[derive(Debug, Clone)]
pub struct SubmissionMeta<'a> {
    pub urls: &'a [String],
    /// Number of files the user supplied, uploaded or not
    pub file_count: usize,
    /// Origin site identifier
    pub source: &'a str,
    pub submitted_at: DateTime<Utc>,
}

/// Final JSON body posted to the forms relay.
#[derive(Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormPayload(Map<String, Value>);

impl FormPayload {
    /// Shallow-merge the user's fields with the relay keys and metadata.
    /// Computed keys replace user keys of the same name.
    pub fn build(fields: &FormFields, form: &FormConfig, meta: SubmissionMeta<'_>) -> Self {
        let mut map = fields.to_map();

        map.insert(
            "access_key".to_string(),
            Value::String(form.access_key.clone()),
        );
        map.insert("subject".to_string(), Value::String(form.subject()));
        map.insert(
            "from_name".to_string(),
            Value::String(fields.sender_name().to_string()),
        );
        if !meta.urls.is_empty() {
            map.insert(
                form.media_field.clone(),
                Value::String(meta.urls.join(", ")),
            );
        }
        map.insert(
            "submitted_at".to_string(),
            Value::String(meta.submitted_at.to_rfc3339()),
        );
        map.insert("source".to_string(), Value::String(meta.source.to_string()));
        map.insert("file_count".to_string(), Value::from(meta.file_count));
        map.insert(
            "uploaded_file_count".to_string(),
            Value::from(meta.urls.len()),
        );

        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl Debug for FormPayload {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut map = f.debug_map();
        for (key, value) in &self.0 {
            if key == "access_key" {
                map.entry(key, &"[redacted]");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}
