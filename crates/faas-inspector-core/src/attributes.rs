//! Flat attribute record produced by one inspection.
//!
//! Every collector writes into the same [`AttributeRecord`]. Values are a small
//! tagged union ([`AttributeValue`]) so the record keeps the shape of a JSON
//! document without falling back to untyped values.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Well-known attribute names.
pub mod keys {
    pub const VERSION: &str = "version";
    pub const LANG: &str = "lang";
    pub const UUID: &str = "uuid";
    pub const NEW_CONTAINER: &str = "newcontainer";
    pub const VM_UPTIME: &str = "vmuptime";
    pub const CPU_TYPE: &str = "cpuType";
    pub const CPU_MODEL: &str = "cpuModel";
    pub const CPU_USR: &str = "cpuUsr";
    pub const CPU_NICE: &str = "cpuNice";
    pub const CPU_KRN: &str = "cpuKrn";
    pub const CPU_IDLE: &str = "cpuIdle";
    pub const CPU_IOWAIT: &str = "cpuIowait";
    pub const CPU_IRQ: &str = "cpuIrq";
    pub const CPU_SOFT_IRQ: &str = "cpuSoftIrq";
    pub const VM_CPU_STEAL: &str = "vmcpusteal";
    pub const PLATFORM: &str = "platform";
    pub const LINUX_VERSION: &str = "linuxVersion";
    pub const FRAMEWORK_RUNTIME: &str = "frameworkRuntime";
    pub const RUNTIME: &str = "runtime";
}

/// A single scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a float. Integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(v) => Some(*v),
            AttributeValue::Int(v) => Some(*v as f64),
            AttributeValue::Str(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Int(v) => write!(f, "{v}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::Str(s) => f.write_str(s),
        }
    }
}

/// Parses command-line style values: integer first, then float, else string.
impl FromStr for AttributeValue {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(v) = s.parse::<i64>() {
            return Ok(AttributeValue::Int(v));
        }
        if let Ok(v) = s.parse::<f64>()
            && v.is_finite()
        {
            return Ok(AttributeValue::Float(v));
        }
        Ok(AttributeValue::Str(s.to_string()))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(value.into())
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        AttributeValue::Int(value.into())
    }
}

/// Booleans are stored as `0`/`1`, matching `newcontainer`.
impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Int(i64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

/// Key → value record for one invocation.
///
/// Keys are unique and ordering carries no meaning; a `BTreeMap` keeps
/// serialized output stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeRecord {
    attributes: BTreeMap<String, AttributeValue>,
}

impl AttributeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.attributes.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }
}
