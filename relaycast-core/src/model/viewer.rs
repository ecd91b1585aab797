use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifies one viewer inside a broadcaster's registry.
///
/// Assigned by the broadcaster from a monotonically increasing counter.
/// Serialized as a JSON integer; numeric strings are accepted on input
/// because browsers occasionally echo the id back as a string.
#[derive(Debug, Serialize, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(transparent)]
pub struct ViewerId(pub u64);

impl ViewerId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for ViewerId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct ViewerIdVisitor;

impl Visitor<'_> for ViewerIdVisitor {
    type Value = ViewerId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ViewerId, E> {
        Ok(ViewerId(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ViewerId, E> {
        u64::try_from(v)
            .map(ViewerId)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ViewerId, E> {
        v.trim()
            .parse::<u64>()
            .map(ViewerId)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for ViewerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ViewerIdVisitor)
    }
}
