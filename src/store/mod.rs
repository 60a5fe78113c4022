//! The persistence gateway: a small abstraction over document collections.
//!
//! The catalog logic never talks to MongoDB directly. It builds a [`Filter`]
//! and hands it to a [`Collection`]. There are two implementations: one
//! backed by a MongoDB collection and one keeping documents in memory.

use std::sync::Arc;

use futures::future::BoxFuture;
use mongodb::bson::{Bson, Document};

use crate::prelude::*;

mod memory;
mod mongo;

pub(crate) use self::{
    memory::MemoryCollection,
    mongo::MongoCollection,
};


/// A predicate over documents.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Filter {
    /// Matches every document.
    All,

    /// Matches documents that satisfy at least one of the clauses. Never
    /// empty: use [`Filter::any_of`] to construct this.
    AnyOf(Vec<Clause>),
}

/// A single condition on one field of a document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Clause {
    /// The field is equal to the value.
    Eq { field: &'static str, value: Bson },

    /// The field is an array containing the value.
    Contains { field: &'static str, value: Bson },

    /// The field is equal to one of the values.
    In { field: &'static str, values: Vec<Bson> },
}

impl Filter {
    /// Combines the clauses disjunctively. No clauses means "no constraint",
    /// i.e. [`Filter::All`].
    pub(crate) fn any_of(clauses: Vec<Clause>) -> Self {
        if clauses.is_empty() {
            Self::All
        } else {
            Self::AnyOf(clauses)
        }
    }

    pub(crate) fn single(clause: Clause) -> Self {
        Self::AnyOf(vec![clause])
    }

    /// Evaluates this filter against a document, with the same semantics the
    /// MongoDB translation has.
    pub(crate) fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::All => true,
            Self::AnyOf(clauses) => clauses.iter().any(|c| c.matches(doc)),
        }
    }
}

impl Clause {
    fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::Eq { field, value } => doc.get(field) == Some(value),
            Self::Contains { field, value } => match doc.get(field) {
                Some(Bson::Array(items)) => items.contains(value),
                _ => false,
            },
            Self::In { field, values } => doc.get(field).is_some_and(|v| values.contains(v)),
        }
    }
}


/// One collection of documents, e.g. all movies.
///
/// The methods return boxed futures so that the trait stays object safe and
/// the API context can hold a `dyn Collection`.
pub(crate) trait Collection: Send + Sync {
    /// Name of the collection, only used for log messages.
    fn name(&self) -> &str;

    /// Returns all documents matching `filter`, in no particular order.
    fn find<'a>(&'a self, filter: &'a Filter) -> BoxFuture<'a, Result<Vec<Document>>>;

    /// Inserts all given documents.
    fn insert_many(&self, docs: Vec<Document>) -> BoxFuture<'_, Result<()>>;

    /// Deletes all documents matching `filter` and returns how many were
    /// deleted.
    fn delete_many<'a>(&'a self, filter: &'a Filter) -> BoxFuture<'a, Result<u64>>;
}


/// Handles to all collections the catalog works with. Cheap to clone.
#[derive(Clone)]
pub(crate) struct Store {
    movies: Arc<dyn Collection>,
    people: Arc<dyn Collection>,
}

impl Store {
    pub(crate) fn new(movies: Arc<dyn Collection>, people: Arc<dyn Collection>) -> Self {
        Self { movies, people }
    }

    /// A store that keeps everything in memory and forgets it when dropped.
    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryCollection::new("movies")),
            Arc::new(MemoryCollection::new("people")),
        )
    }

    pub(crate) fn movies(&self) -> &dyn Collection {
        &*self.movies
    }

    pub(crate) fn people(&self) -> &dyn Collection {
        &*self.people
    }
}
