//! The catalog operations: finding, inserting and removing movies and people.
//!
//! All operations are generic over [`Entity`] and work exactly the same for
//! both collections. They return [`CatalogResult`]s; turning those into the
//! `{ success, message, docs }` shape callers see is done by [`envelope`].

use mongodb::bson::{oid::ObjectId, Bson};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    model::Id,
    prelude::*,
    store::{Clause, Collection, Filter, Store},
};
use self::{
    err::{internal_error, invalid_input},
    validate::{RecordCheck, Validator},
};

pub(crate) mod envelope;
pub(crate) mod err;
mod filter;
mod movie;
mod person;
mod validate;

#[cfg(test)]
mod tests;

pub(crate) use self::{
    err::{CatalogError, CatalogResult},
    filter::FilterBuilder,
    movie::MovieQuery,
    person::PersonQuery,
};


#[derive(Debug, Clone, confique::Config)]
pub(crate) struct CatalogConfig {
    /// What `remove` does when called without IDs (or with an empty list).
    /// If `true`, all records of that collection are deleted. If `false`,
    /// nothing is deleted.
    #[config(default = true)]
    pub(crate) remove_all_without_ids: bool,
}

/// How a record type is called in messages.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Noun {
    pub(crate) singular: &'static str,
    pub(crate) plural: &'static str,
    /// Capitalized singular, used at the start of a sentence.
    pub(crate) label: &'static str,
}

impl Noun {
    /// E.g. "0 movies", "1 movie", "2 people".
    pub(crate) fn count(&self, n: u64) -> String {
        let noun = if n == 1 { self.singular } else { self.plural };
        format!("{n} {noun}")
    }
}

/// A record type the catalog manages.
pub(crate) trait Entity: Serialize + DeserializeOwned + Send + Sync + Sized {
    /// Unvalidated input for `insert`.
    type Draft: Serialize + Sync;

    /// Optional equality-match arguments for `find`.
    type Query: Sync;

    const NOUN: Noun;

    fn collection(store: &Store) -> &dyn Collection;

    fn id(&self) -> ObjectId;

    /// How a record is named in the success message of `insert`.
    fn display_name(&self) -> String;

    fn filter(query: &Self::Query) -> CatalogResult<Filter>;

    /// Checks all fields of `draft`, recording every problem in `check`.
    /// Returns `None` if at least one problem was found.
    fn from_draft(draft: &Self::Draft, check: &mut RecordCheck<'_, Self::Draft>) -> Option<Self>;
}


/// Returns all records matching `query`. See [`FilterBuilder`] for how
/// arguments are combined.
pub(crate) async fn find<E: Entity>(store: &Store, query: &E::Query) -> CatalogResult<Vec<E>> {
    let filter = E::filter(query)?;
    find_matching(store, &filter).await
}

pub(crate) async fn find_matching<E: Entity>(store: &Store, filter: &Filter) -> CatalogResult<Vec<E>> {
    E::collection(store)
        .find(filter)
        .await?
        .into_iter()
        .map(|doc| mongodb::bson::from_document(doc).map_err(Into::into))
        .collect()
}

/// Returns the records with the given IDs, in the order of `ids`. IDs that
/// do not exist are skipped and duplicates are only returned once.
pub(crate) async fn find_by_ids<E: Entity>(store: &Store, ids: &[ObjectId]) -> CatalogResult<Vec<E>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let values = ids.iter().map(|&id| Bson::from(id)).collect();
    let mut out = find_matching::<E>(store, &Filter::single(Clause::In { field: "_id", values }))
        .await?;
    out.sort_by_key(|e| ids.iter().position(|&id| id == e.id()));
    Ok(out)
}

/// Validates all drafts and inserts them if none has a problem. Returns the
/// success message.
pub(crate) async fn insert<E: Entity>(store: &Store, drafts: &[E::Draft]) -> CatalogResult<String> {
    let noun = E::NOUN;
    if drafts.is_empty() {
        return Err(invalid_input!("No {} provided", noun.plural));
    }

    let mut validator = Validator::new(noun.label);
    let records = drafts.iter()
        .map(|draft| E::from_draft(draft, &mut validator.record(draft)))
        .collect::<Vec<_>>();
    if let Err(problems) = validator.finish() {
        debug!("Rejected batch of {}: {}", noun.count(drafts.len() as u64), problems.join(", "));
        return Err(invalid_input!(
            "Added 0 {} due to one or more errors: {}",
            noun.plural,
            problems.join(", "),
        ));
    }
    let records = records.into_iter()
        .collect::<Option<Vec<E>>>()
        .ok_or_else(|| internal_error!("{} rejected without a reported problem", noun.label))?;

    // A store may write part of a batch before hitting a duplicate key, so
    // taken IDs have to be rejected up front.
    let ids = records.iter().map(E::id).collect::<Vec<_>>();
    let taken = find_by_ids::<E>(store, &ids).await?;
    if !taken.is_empty() {
        let problems = taken.iter()
            .map(|e| format!("{} with ID '{}' already exists", noun.label, e.id()))
            .collect::<Vec<_>>();
        debug!("Rejected batch of {}: {}", noun.count(drafts.len() as u64), problems.join(", "));
        return Err(invalid_input!(
            "Added 0 {} due to one or more errors: {}",
            noun.plural,
            problems.join(", "),
        ));
    }

    let docs = records.iter()
        .map(mongodb::bson::to_document)
        .collect::<Result<Vec<_>, _>>()?;
    let collection = E::collection(store);
    collection.insert_many(docs).await?;
    info!("Inserted {} into '{}'", noun.count(records.len() as u64), collection.name());

    let names = records.iter().map(E::display_name).collect::<Vec<_>>();
    Ok(format!("Added {}: {}", noun.plural, names.join(", ")))
}

/// Deletes the records with the given IDs and returns the success message.
///
/// Without IDs, all records are deleted if `config.remove_all_without_ids` is
/// set, otherwise none. If any ID is malformed, nothing is deleted.
pub(crate) async fn remove<E: Entity>(
    store: &Store,
    ids: Option<&[Id]>,
    config: &CatalogConfig,
) -> CatalogResult<String> {
    let noun = E::NOUN;
    let collection = E::collection(store);
    let ids = ids.unwrap_or_default();

    let filter = if ids.is_empty() {
        if !config.remove_all_without_ids {
            debug!("`remove` on '{}' without IDs: not deleting anything", collection.name());
            return Ok(format!("Deleted {}", noun.count(0)));
        }
        warn!("`remove` on '{}' without IDs: deleting all {}", collection.name(), noun.plural);
        Filter::All
    } else {
        let malformed = ids.iter()
            .filter(|id| id.object_id().is_none())
            .map(|id| format!("'{id}'"))
            .collect::<Vec<_>>();
        if !malformed.is_empty() {
            return Err(invalid_input!(
                "Deleted {} due to invalid IDs (expected 24 hexadecimal characters): {}",
                noun.count(0),
                malformed.join(", "),
            ));
        }

        let values = ids.iter().filter_map(Id::object_id).map(Bson::from).collect();
        Filter::single(Clause::In { field: "_id", values })
    };

    let deleted = collection.delete_many(&filter).await?;
    info!("Deleted {} from '{}'", noun.count(deleted), collection.name());
    Ok(format!("Deleted {}", noun.count(deleted)))
}
