//! Payload codec for link frames.
//!
//! The link does not impose a schema on device messages. Every frame is
//! either structured JSON or opaque text, and the [`Payload`] type keeps
//! that distinction explicit at the boundary.
//!
//! # Decoding
//!
//! Inbound text is parsed as JSON first. Anything that fails to parse is
//! passed through unchanged as [`Payload::Raw`], so a device printing plain
//! diagnostic lines never loses a message.
//!
//! # Encoding
//!
//! [`Payload::Structured`] is serialized to compact JSON text,
//! [`Payload::Raw`] is sent verbatim.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, from_str, from_value, to_string, to_value};

use crate::error::Result;

// ============================================================================
// Payload
// ============================================================================

/// A single message exchanged with the device.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Decoded JSON value.
    Structured(Value),
    /// Text that is not valid JSON.
    Raw(String),
}

// ============================================================================
// Payload - Constructors
// ============================================================================

impl Payload {
    /// Creates a structured payload from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if `value` cannot be
    /// represented as JSON.
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::Structured(to_value(value)?))
    }

    /// Creates a raw text payload.
    #[inline]
    #[must_use]
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    /// Decodes inbound text, falling back to raw text when it is not JSON.
    #[must_use]
    pub fn decode(text: &str) -> Self {
        match from_str::<Value>(text) {
            Ok(value) => Self::Structured(value),
            Err(_) => Self::Raw(text.to_owned()),
        }
    }
}

// ============================================================================
// Payload - Accessors
// ============================================================================

impl Payload {
    /// Encodes the payload into the text sent on the wire.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn encode(&self) -> Result<String> {
        match self {
            Self::Structured(value) => Ok(to_string(value)?),
            Self::Raw(text) => Ok(text.clone()),
        }
    }

    /// Returns `true` if the payload decoded as JSON.
    #[inline]
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    /// Returns the JSON value, if any.
    #[inline]
    #[must_use]
    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            Self::Structured(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// Returns the raw text, if the payload was not JSON.
    #[inline]
    #[must_use]
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Structured(_) => None,
            Self::Raw(text) => Some(text),
        }
    }

    /// Deserializes a structured payload into a typed message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if the payload is raw text
    /// or does not match `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            Self::Structured(value) => Ok(from_value(value.clone())?),
            Self::Raw(text) => Ok(from_str(text)?),
        }
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl From<Value> for Payload {
    #[inline]
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

impl From<String> for Payload {
    #[inline]
    fn from(text: String) -> Self {
        Self::Raw(text)
    }
}

impl From<&str> for Payload {
    #[inline]
    fn from(text: &str) -> Self {
        Self::Raw(text.to_owned())
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured(value) => write!(f, "{value}"),
            Self::Raw(text) => f.write_str(text),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
