use std::{fmt, marker::PhantomData};

use serde::{
    Deserialize, Deserializer,
    de::{self, MapAccess, Visitor},
};

/// A time-keyed mapping as written in a configuration file.
///
/// Keys may be numbers or strings that parse as numbers, so the same mapping
/// loads from JSON and TOML (string keys) and from YAML (numeric keys).
/// Entries are kept sorted by time; duplicate times are preserved so that the
/// consumer can reject them.
///
/// # Examples
///
/// ```
/// use rampup_core::Knots;
///
/// let knots: Knots<f64> = serde_json::from_str(r#"{"4.0": 4.0, "0": 2.0}"#).unwrap();
/// assert_eq!(knots.as_slice(), &[(0.0, 2.0), (4.0, 4.0)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Knots<V>(Vec<(f64, V)>);

impl<V> Knots<V> {
    /// Returns the entries in time order.
    #[must_use]
    pub fn as_slice(&self) -> &[(f64, V)] {
        &self.0
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Applies `f` to every value, keeping the times.
    pub fn map<U>(self, mut f: impl FnMut(V) -> U) -> Knots<U> {
        Knots(self.0.into_iter().map(|(t, v)| (t, f(v))).collect())
    }
}

impl<V> FromIterator<(f64, V)> for Knots<V> {
    fn from_iter<I: IntoIterator<Item = (f64, V)>>(iter: I) -> Self {
        let mut entries: Vec<_> = iter.into_iter().collect();
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self(entries)
    }
}

impl<V> IntoIterator for Knots<V> {
    type Item = (f64, V);
    type IntoIter = std::vec::IntoIter<(f64, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Knots<V> {
    type Item = &'a (f64, V);
    type IntoIter = std::slice::Iter<'a, (f64, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Knots<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(KnotsVisitor(PhantomData))
    }
}

struct KnotsVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for KnotsVisitor<V> {
    type Value = Knots<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from time to value")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((TimeKey(time), value)) = map.next_entry::<TimeKey, V>()? {
            entries.push((time, value));
        }
        Ok(entries.into_iter().collect())
    }
}

/// A map key holding a time, written either as a number or as a string.
struct TimeKey(f64);

impl<'de> Deserialize<'de> for TimeKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimeKeyVisitor)
    }
}

struct TimeKeyVisitor;

impl Visitor<'_> for TimeKeyVisitor {
    type Value = TimeKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a string holding a number")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(TimeKey(v))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(TimeKey(v as f64))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(TimeKey(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.trim()
            .parse()
            .map(TimeKey)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}
