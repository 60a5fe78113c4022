use futures::{future::BoxFuture, FutureExt, TryStreamExt};
use mongodb::bson::{doc, Bson, Document};

use crate::prelude::*;
use super::{Clause, Collection, Filter};


/// A collection stored in MongoDB.
pub(crate) struct MongoCollection {
    inner: mongodb::Collection<Document>,
}

impl MongoCollection {
    pub(crate) fn new(inner: mongodb::Collection<Document>) -> Self {
        Self { inner }
    }
}

impl Collection for MongoCollection {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn find<'a>(&'a self, filter: &'a Filter) -> BoxFuture<'a, Result<Vec<Document>>> {
        async move {
            let query = to_query(filter);
            trace!(collection = self.name(), %query, "Running `find`");
            let docs = self.inner.find(query)
                .await
                .with_context(|| format!("failed to query '{}'", self.name()))?
                .try_collect::<Vec<_>>()
                .await
                .with_context(|| format!("failed to read results from '{}'", self.name()))?;
            Ok(docs)
        }.boxed()
    }

    fn insert_many(&self, docs: Vec<Document>) -> BoxFuture<'_, Result<()>> {
        async move {
            trace!(collection = self.name(), count = docs.len(), "Running `insertMany`");
            self.inner.insert_many(docs)
                .await
                .with_context(|| format!("failed to insert into '{}'", self.name()))?;
            Ok(())
        }.boxed()
    }

    fn delete_many<'a>(&'a self, filter: &'a Filter) -> BoxFuture<'a, Result<u64>> {
        async move {
            let query = to_query(filter);
            trace!(collection = self.name(), %query, "Running `deleteMany`");
            let result = self.inner.delete_many(query)
                .await
                .with_context(|| format!("failed to delete from '{}'", self.name()))?;
            Ok(result.deleted_count)
        }.boxed()
    }
}

/// Translates our filter into a MongoDB query document.
fn to_query(filter: &Filter) -> Document {
    match filter {
        Filter::All => doc! {},
        Filter::AnyOf(clauses) => {
            let clauses = clauses.iter().map(|c| Bson::Document(clause_to_query(c)));
            doc! { "$or": clauses.collect::<Vec<_>>() }
        }
    }
}

fn clause_to_query(clause: &Clause) -> Document {
    let mut out = Document::new();
    match clause {
        // Equality against an array field in MongoDB means "array contains
        // value", so both clauses map to the same query.
        Clause::Eq { field, value } | Clause::Contains { field, value } => {
            out.insert(*field, value.clone());
        }
        Clause::In { field, values } => {
            out.insert(*field, doc! { "$in": values.clone() });
        }
    }
    out
}
