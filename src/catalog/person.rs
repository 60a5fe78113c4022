use mongodb::bson::oid::ObjectId;

use crate::{
    model::{Id, NewPerson, Person},
    store::{Collection, Filter, Store},
};
use super::{CatalogResult, Entity, FilterBuilder, Noun, RecordCheck};


/// Arguments of `find` on people. All are optional.
#[derive(Debug, Clone, Default)]
pub(crate) struct PersonQuery {
    pub(crate) id: Option<Id>,
    pub(crate) first_name: Option<String>,
    pub(crate) last_name: Option<String>,
}

impl Entity for Person {
    type Draft = NewPerson;
    type Query = PersonQuery;

    const NOUN: Noun = Noun { singular: "person", plural: "people", label: "Person" };

    fn collection(store: &Store) -> &dyn Collection {
        store.people()
    }

    fn id(&self) -> ObjectId {
        self.id
    }

    fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    fn filter(query: &PersonQuery) -> CatalogResult<Filter> {
        FilterBuilder::new()
            .id("_id", "id", query.id.as_ref())
            .text("first_name", query.first_name.as_deref())
            .text("last_name", query.last_name.as_deref())
            .finish()
    }

    fn from_draft(draft: &NewPerson, check: &mut RecordCheck<'_, NewPerson>) -> Option<Self> {
        let id = check.unique_id("id", draft.id.as_ref());
        let first_name = check.required("first_name", draft.first_name.as_deref());
        let last_name = check.required("last_name", draft.last_name.as_deref());

        Some(Self {
            id: id?.unwrap_or_else(ObjectId::new),
            first_name: first_name?,
            last_name: last_name?,
        })
    }
}
