use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::{Id, IsoDate};


/// A stored movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Movie {
    #[serde(rename = "_id")]
    pub(crate) id: ObjectId,
    pub(crate) title: String,
    pub(crate) release_date: IsoDate,

    /// Weak reference to a `Person`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) director_id: Option<ObjectId>,

    /// Weak references to `Person`s, in billing order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) actor_ids: Option<Vec<ObjectId>>,
}

/// A movie as passed to `insert`, before validation.
///
/// Required fields are optional here so that a batch with missing fields can
/// be reported in full instead of failing on the first problem.
#[derive(Debug, Clone, Default, Serialize, juniper::GraphQLInputObject)]
#[graphql(name = "Training_Movies_Insert_Input", rename_all = "none")]
pub(crate) struct NewMovie {
    /// Identifier for the new movie. Generated if not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<Id>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,

    /// ISO 8601 date without time, e.g. `2023-01-01`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) release_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) director_id: Option<Id>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) actor_ids: Option<Vec<Id>>,
}
