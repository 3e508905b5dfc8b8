//! Loosely-typed ERP records and the join/expand engine that denormalizes
//! independent entity sets into nested product records.
//!
//! The ERP schema varies per entity set, so an [`Entity`] is a field-name map
//! read through typed accessors that return `None` for absent or mistyped
//! fields. Strict typing happens later, at the product mapper boundary.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// A single field value inside an [`Entity`].
///
/// Deserializes from any JSON value; objects become nested entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Entity(Entity),
    List(Vec<FieldValue>),
}

impl FieldValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value. Numeric strings are accepted because some
    /// OData services serialize decimals as text.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(FieldValue::Null, FieldValue::Number)
    }
}

impl From<Entity> for FieldValue {
    fn from(value: Entity) -> Self {
        FieldValue::Entity(value)
    }
}

/// A field-name to value record from one ERP entity set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(BTreeMap<String, FieldValue>);

impl Entity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for fixtures.
    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.0.insert(field.to_owned(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    #[must_use]
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_f64)
    }

    #[must_use]
    pub fn flag(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_bool)
    }

    /// Iterates the nested entities stored under `field`.
    ///
    /// Yields nothing when the field is absent or not a list; non-entity list
    /// elements are skipped.
    pub fn nested<'a>(&'a self, field: &str) -> impl Iterator<Item = &'a Entity> + 'a {
        let items: &'a [FieldValue] = match self.get(field) {
            Some(FieldValue::List(items)) => items,
            _ => &[],
        };
        items.iter().filter_map(|item| match item {
            FieldValue::Entity(entity) => Some(entity),
            _ => None,
        })
    }

    /// Returns the first nested entity under `field`, if any.
    #[must_use]
    pub fn first_nested(&self, field: &str) -> Option<&Entity> {
        self.nested(field).next()
    }

    fn with_list(&self, field: &str, items: Vec<Entity>) -> Entity {
        let mut expanded = self.clone();
        expanded.0.insert(
            field.to_owned(),
            FieldValue::List(items.into_iter().map(FieldValue::Entity).collect()),
        );
        expanded
    }
}

/// An ordered sequence of entities; order follows the source pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityCollection(Vec<Entity>);

impl EntityCollection {
    #[must_use]
    pub fn new(entities: Vec<Entity>) -> Self {
        Self(entities)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Entity> {
        self.0
    }

    /// Appends another page, keeping page order.
    pub fn extend(&mut self, page: EntityCollection) {
        self.0.extend(page.0);
    }

    /// Joins `right` onto every record of `self`.
    ///
    /// Each output record is the left record plus `as_field`, holding every
    /// right record for which `predicate(left, right)` is true, in `right`'s
    /// order. Output order and length equal `self`'s; no match yields an
    /// empty list. Cost is `|self| * |right|` predicate calls.
    #[must_use]
    pub fn expand<P>(&self, right: &EntityCollection, predicate: P, as_field: &str) -> Self
    where
        P: Fn(&Entity, &Entity) -> bool,
    {
        let expanded = self
            .0
            .iter()
            .map(|left| {
                let matches = right
                    .0
                    .iter()
                    .filter(|r| predicate(left, *r))
                    .cloned()
                    .collect();
                left.with_list(as_field, matches)
            })
            .collect();
        Self(expanded)
    }

    /// Equality join on a text key, equivalent to
    /// `expand(right, fields_equal(left_field, right_field), as_field)`
    /// but linear: `right` is bucketed by key first, preserving its order
    /// inside each bucket.
    #[must_use]
    pub fn expand_on(
        &self,
        right: &EntityCollection,
        left_field: &str,
        right_field: &str,
        as_field: &str,
    ) -> Self {
        let mut buckets: HashMap<&str, Vec<&Entity>> = HashMap::new();
        for r in &right.0 {
            if let Some(key) = r.text(right_field) {
                buckets.entry(key).or_default().push(r);
            }
        }

        let expanded = self
            .0
            .iter()
            .map(|left| {
                let matches = left
                    .text(left_field)
                    .and_then(|key| buckets.get(key))
                    .map(|found| found.iter().map(|e| (*e).clone()).collect())
                    .unwrap_or_default();
                left.with_list(as_field, matches)
            })
            .collect();
        Self(expanded)
    }
}

impl FromIterator<Entity> for EntityCollection {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for EntityCollection {
    type Item = Entity;
    type IntoIter = std::vec::IntoIter<Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a EntityCollection {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Predicate matching when `left[left_field]` and `right[right_field]` are
/// both present text values and equal.
pub fn fields_equal<'f>(
    left_field: &'f str,
    right_field: &'f str,
) -> impl Fn(&Entity, &Entity) -> bool + 'f {
    move |left, right| match (left.text(left_field), right.text(right_field)) {
        (Some(l), Some(r)) => l == r,
        _ => false,
    }
}

#[cfg(test)]
#[path = "entity_test.rs"]
mod tests;
