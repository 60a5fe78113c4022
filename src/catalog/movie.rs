use mongodb::bson::oid::ObjectId;

use crate::{
    model::{Id, Movie, NewMovie, Person},
    store::{Clause, Collection, Filter, Store},
};
use super::{CatalogResult, Entity, FilterBuilder, Noun, RecordCheck};


/// Arguments of `find` on movies. All are optional.
#[derive(Debug, Clone, Default)]
pub(crate) struct MovieQuery {
    pub(crate) id: Option<Id>,
    pub(crate) title: Option<String>,
    pub(crate) release_date: Option<String>,
    pub(crate) director_id: Option<Id>,

    /// Matches movies where this person is one of the actors.
    pub(crate) actor_id: Option<Id>,
}

impl Entity for Movie {
    type Draft = NewMovie;
    type Query = MovieQuery;

    const NOUN: Noun = Noun { singular: "movie", plural: "movies", label: "Movie" };

    fn collection(store: &Store) -> &dyn Collection {
        store.movies()
    }

    fn id(&self) -> ObjectId {
        self.id
    }

    fn display_name(&self) -> String {
        self.title.clone()
    }

    fn filter(query: &MovieQuery) -> CatalogResult<Filter> {
        FilterBuilder::new()
            .id("_id", "id", query.id.as_ref())
            .text("title", query.title.as_deref())
            .date("release_date", query.release_date.as_deref())
            .id("director_id", "director_id", query.director_id.as_ref())
            .contains_id("actor_ids", "actor_id", query.actor_id.as_ref())
            .finish()
    }

    fn from_draft(draft: &NewMovie, check: &mut RecordCheck<'_, NewMovie>) -> Option<Self> {
        // All checks run before the first `?` so every problem gets recorded.
        let id = check.unique_id("id", draft.id.as_ref());
        let title = check.required("title", draft.title.as_deref());
        let release_date = check.required_date("release_date", draft.release_date.as_deref());
        let director_id = check.optional_id("director_id", draft.director_id.as_ref());
        let actor_ids = check.optional_ids("actor_ids", draft.actor_ids.as_deref());

        Some(Self {
            id: id?.unwrap_or_else(ObjectId::new),
            title: title?,
            release_date: release_date?,
            director_id: director_id?,
            actor_ids: actor_ids?,
        })
    }
}

impl Movie {
    /// Movies directed by the given person.
    pub(crate) fn directed_by(person: &Person) -> Filter {
        Filter::single(Clause::Eq { field: "director_id", value: person.id.into() })
    }

    /// Movies the given person acted in.
    pub(crate) fn starring(person: &Person) -> Filter {
        Filter::single(Clause::Contains { field: "actor_ids", value: person.id.into() })
    }
}
