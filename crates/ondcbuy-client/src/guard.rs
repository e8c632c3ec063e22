//! At-most-once guard for select events.
//!
//! A select for a given `(product id, quantity, options)` is sent at most
//! once per in-memory session. Options are canonicalized before keying, so
//! `{"size":"M","color":"red"}` and `{"color":"red","size":"M"}` collide.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::error::ClientError;

/// Item configuration chosen by the buyer (size, colour, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectOptions(BTreeMap<String, serde_json::Value>);

impl SelectOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds options from a JSON object; `null` means no options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnexpectedShape`] for any other JSON type.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ClientError> {
        match value {
            serde_json::Value::Null => Ok(Self::default()),
            serde_json::Value::Object(map) => Ok(Self(map.into_iter().collect())),
            _ => Err(ClientError::UnexpectedShape {
                context: "select options (expected an object)".to_owned(),
            }),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }

    /// Serialization with object keys sorted at every depth.
    #[must_use]
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        out.push('{');
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_canonical_str(k, &mut out);
            out.push(':');
            write_canonical(v, &mut out);
        }
        out.push('}');
        out
    }
}

fn write_canonical_str(s: &str, out: &mut String) {
    out.push_str(&serde_json::Value::String(s.to_owned()).to_string());
}

fn write_canonical(value: &serde_json::Value, out: &mut String) {
    match value {
        serde_json::Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, k) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical_str(k, out);
                out.push(':');
                write_canonical(&map[k], out);
            }
            out.push('}');
        }
        serde_json::Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Identity of one select configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectKey {
    pub product_id: String,
    pub quantity: u32,
    options: String,
}

impl SelectKey {
    #[must_use]
    pub fn new(product_id: &str, quantity: u32, options: &SelectOptions) -> Self {
        Self {
            product_id: product_id.to_owned(),
            quantity,
            options: options.canonical(),
        }
    }

    #[must_use]
    pub fn canonical_options(&self) -> &str {
        &self.options
    }
}

/// Keys of selects already sent successfully in this session.
#[derive(Debug, Default)]
pub struct SelectGuard {
    sent: HashSet<SelectKey>,
}

impl SelectGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &SelectKey) -> bool {
        self.sent.contains(key)
    }

    /// Returns `false` if the key was already recorded.
    pub fn record(&mut self, key: SelectKey) -> bool {
        self.sent.insert(key)
    }

    pub fn forget(&mut self, key: &SelectKey) -> bool {
        self.sent.remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sent.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }

    pub fn clear(&mut self) {
        self.sent.clear();
    }
}
