//! Building read filters from optional equality-match arguments.
//!
//! Every supplied argument adds one clause and the clauses are combined with
//! OR: asking for a title and a release date returns movies having that title
//! plus movies released on that date. Nothing supplied means no constraint.

use mongodb::bson::Bson;

use crate::{
    model::{Id, IsoDate},
    store::{Clause, Filter},
};
use super::err::{CatalogResult, invalid_input};


/// Collects clauses and problems with the arguments. See the module docs.
#[derive(Debug, Default)]
pub(crate) struct FilterBuilder {
    clauses: Vec<Clause>,
    problems: Vec<String>,
}

impl FilterBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Matches documents whose `field` equals the given string. Absent or
    /// empty strings are ignored.
    pub(crate) fn text(mut self, field: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.clauses.push(Clause::Eq { field, value: value.into() });
        }
        self
    }

    /// Like [`Self::text`], but the value has to be an ISO 8601 date.
    pub(crate) fn date(mut self, field: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            match value.parse::<IsoDate>() {
                Ok(date) => self.clauses.push(Clause::Eq { field, value: date.as_str().into() }),
                Err(e) => self.problems.push(format!("`{field}` '{value}' is {e}")),
            }
        }
        self
    }

    /// Matches documents whose `field` is the given identifier. `arg` names
    /// the argument in error messages, as it can differ from the stored field
    /// (e.g. `id` vs. `_id`).
    pub(crate) fn id(mut self, field: &'static str, arg: &str, value: Option<&Id>) -> Self {
        if let Some(value) = self.parse_id(arg, value) {
            self.clauses.push(Clause::Eq { field, value });
        }
        self
    }

    /// Matches documents whose array `field` contains the given identifier.
    pub(crate) fn contains_id(mut self, field: &'static str, arg: &str, value: Option<&Id>) -> Self {
        if let Some(value) = self.parse_id(arg, value) {
            self.clauses.push(Clause::Contains { field, value });
        }
        self
    }

    fn parse_id(&mut self, arg: &str, value: Option<&Id>) -> Option<Bson> {
        let value = value.filter(|v| !v.as_str().is_empty())?;
        match value.object_id() {
            Some(oid) => Some(oid.into()),
            None => {
                self.problems.push(format!(
                    "`{arg}` '{value}' is not a valid ID (expected 24 hexadecimal characters)",
                ));
                None
            }
        }
    }

    /// Returns the disjunction of all clauses, or an error listing every
    /// malformed argument.
    pub(crate) fn finish(self) -> CatalogResult<Filter> {
        if !self.problems.is_empty() {
            return Err(invalid_input!("Invalid arguments: {}", self.problems.join(", ")));
        }

        Ok(Filter::any_of(self.clauses))
    }
}
