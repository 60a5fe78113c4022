use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::Id;


/// A stored person, i.e. someone who directed or acted in movies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Person {
    #[serde(rename = "_id")]
    pub(crate) id: ObjectId,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
}

/// A person as passed to `insert`, before validation. See `NewMovie`.
#[derive(Debug, Clone, Default, Serialize, juniper::GraphQLInputObject)]
#[graphql(name = "Training_People_Insert_Input", rename_all = "none")]
pub(crate) struct NewPerson {
    /// Identifier for the new person. Generated if not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<Id>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) last_name: Option<String>,
}
