//! Checking insert batches.
//!
//! A batch is only inserted if every single record in it is fine. To give the
//! caller a complete picture, all records are checked and every problem is
//! collected before deciding.

use std::collections::HashSet;

use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::model::{Id, IsoDate};


/// Collects problems of all records in one batch.
pub(crate) struct Validator {
    label: &'static str,
    problems: Vec<String>,
    ids: HashSet<ObjectId>,
}

impl Validator {
    /// `label` is the capitalized entity name used in messages, e.g. "Movie".
    pub(crate) fn new(label: &'static str) -> Self {
        Self { label, problems: Vec::new(), ids: HashSet::new() }
    }

    /// Starts checking one record. Problems found via the returned value are
    /// added to this validator.
    pub(crate) fn record<'a, T: Serialize>(&'a mut self, record: &'a T) -> RecordCheck<'a, T> {
        RecordCheck { validator: self, record, json: None }
    }

    /// Returns all collected problems, in the order they were found, or `Ok`
    /// if there were none.
    pub(crate) fn finish(self) -> Result<(), Vec<String>> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            Err(self.problems)
        }
    }
}

/// Checks the fields of a single record. Every check returns the validated
/// value or `None`, in which case a problem was recorded.
pub(crate) struct RecordCheck<'a, T> {
    validator: &'a mut Validator,
    record: &'a T,
    json: Option<String>,
}

impl<T: Serialize> RecordCheck<'_, T> {
    /// The field has to be present and non-empty.
    pub(crate) fn required(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        match value {
            Some(v) if !v.is_empty() => Some(v.to_owned()),
            _ => {
                self.missing(field);
                None
            }
        }
    }

    /// The field has to be present and a valid ISO 8601 date.
    pub(crate) fn required_date(&mut self, field: &str, value: Option<&str>) -> Option<IsoDate> {
        let value = self.required(field, value)?;
        match value.parse::<IsoDate>() {
            Ok(date) => Some(date),
            Err(e) => {
                self.invalid(field, &e.to_string());
                None
            }
        }
    }

    /// If given, the field has to be a valid ID. Returns `Some(None)` if the
    /// field was not given.
    pub(crate) fn optional_id(&mut self, field: &str, value: Option<&Id>) -> Option<Option<ObjectId>> {
        match value {
            None => Some(None),
            Some(id) => self.id(field, id).map(Some),
        }
    }

    /// Like [`Self::optional_id`], but the ID must not be used by any other
    /// record of the batch.
    pub(crate) fn unique_id(&mut self, field: &str, value: Option<&Id>) -> Option<Option<ObjectId>> {
        let out = self.optional_id(field, value)?;
        if let Some(id) = out {
            if !self.validator.ids.insert(id) {
                self.invalid(field, "used by another record in this batch");
                return None;
            }
        }
        Some(out)
    }

    /// If given, every element of the list has to be a valid ID. All
    /// malformed elements are reported.
    pub(crate) fn optional_ids(
        &mut self,
        field: &str,
        value: Option<&[Id]>,
    ) -> Option<Option<Vec<ObjectId>>> {
        let Some(ids) = value else {
            return Some(None);
        };

        let parsed = ids.iter()
            .enumerate()
            .map(|(i, id)| self.id(&format!("{field}[{i}]"), id))
            .collect::<Vec<_>>();
        parsed.into_iter().collect::<Option<Vec<_>>>().map(Some)
    }

    fn id(&mut self, field: &str, id: &Id) -> Option<ObjectId> {
        let out = id.object_id();
        if out.is_none() {
            self.invalid(field, "not a valid ID, expected 24 hexadecimal characters");
        }
        out
    }

    fn missing(&mut self, field: &str) {
        let label = self.validator.label;
        let msg = format!("{label} missing required field `{field}`: `{}`", self.json());
        self.validator.problems.push(msg);
    }

    fn invalid(&mut self, field: &str, reason: &str) {
        let label = self.validator.label;
        let msg = format!("{label} has invalid field `{field}` ({reason}): `{}`", self.json());
        self.validator.problems.push(msg);
    }

    fn json(&mut self) -> &str {
        let record = self.record;
        self.json.get_or_insert_with(|| {
            serde_json::to_string(record).unwrap_or_else(|_| "<unprintable>".into())
        })
    }
}
