use std::fmt;

use juniper::{GraphQLScalar, InputValue, ScalarValue};
use mongodb::bson::oid::ObjectId;
use serde::{Serialize, Serializer};


/// An identifier as received from or sent to API users: a 24 character
/// hexadecimal string naming exactly one stored document.
///
/// Parsing never fails at the GraphQL level. Instead, the raw string is kept
/// and malformed IDs are reported by the operation that tries to use them via
/// [`Self::object_id`]. That way, a bad ID becomes a validation error with a
/// message naming the offending field, instead of a generic request error.
#[derive(Debug, Clone, PartialEq, Eq, GraphQLScalar)]
#[graphql(
    name = "ObjectID",
    description = "A 24 character hexadecimal identifier",
    parse_token(String),
)]
pub(crate) struct Id {
    raw: String,
    parsed: Option<ObjectId>,
}

impl Id {
    /// Returns the parsed object ID or `None` if the raw string is not 24 hex
    /// digits.
    pub(crate) fn object_id(&self) -> Option<ObjectId> {
        self.parsed
    }

    /// The string this ID was created from.
    pub(crate) fn as_str(&self) -> &str {
        &self.raw
    }

    fn to_output<S: ScalarValue>(&self) -> juniper::Value<S> {
        juniper::Value::scalar(self.raw.clone())
    }

    fn from_input<S: ScalarValue>(input: &InputValue<S>) -> Result<Self, String> {
        let s = input.as_string_value().ok_or("expected string")?;
        Ok(Self::from(s))
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        // `parse_str` also accepts upper case digits.
        let parsed = if s.len() == 24 { ObjectId::parse_str(s).ok() } else { None };
        Self { raw: s.to_owned(), parsed }
    }
}

impl From<ObjectId> for Id {
    fn from(oid: ObjectId) -> Self {
        Self { raw: oid.to_hex(), parsed: Some(oid) }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.fmt(f)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
