use juniper::graphql_object;

use crate::{
    api::{Context, err::ApiResult},
    catalog::{self, envelope::{Found, Outcome}, PersonQuery},
    model::{Id, Movie, NewPerson, Person},
    store::Filter,
};


#[graphql_object(Context = Context, name = "Training_People_Person", rename_all = "none")]
impl Person {
    fn id(&self) -> Id {
        self.id.into()
    }

    fn first_name(&self) -> &str {
        &self.first_name
    }

    fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Movies directed by this person. `null` if there are none.
    async fn directed(&self, context: &Context) -> ApiResult<Option<Vec<Movie>>> {
        self.movies(Movie::directed_by(self), context).await
    }

    /// Movies this person acted in. `null` if there are none.
    async fn acted_in(&self, context: &Context) -> ApiResult<Option<Vec<Movie>>> {
        self.movies(Movie::starring(self), context).await
    }
}

impl Person {
    async fn movies(&self, filter: Filter, context: &Context) -> ApiResult<Option<Vec<Movie>>> {
        catalog::find_matching::<Movie>(&context.store, &filter)
            .await
            .map(|movies| Some(movies).filter(|m| !m.is_empty()))
            .map_err(|e| context.field_error(e))
    }
}


pub(crate) struct PeopleQuery;

#[graphql_object(Context = Context, name = "Training_People_Query", rename_all = "none")]
impl PeopleQuery {
    /// Returns all people matching at least one of the given arguments. All
    /// people are returned if no argument is given.
    async fn find(
        id: Option<Id>,
        first_name: Option<String>,
        last_name: Option<String>,
        context: &Context,
    ) -> PeopleFound {
        let query = PersonQuery { id, first_name, last_name };
        context.found(catalog::find::<Person>(&context.store, &query).await).into()
    }
}

pub(crate) struct PeopleMutation;

#[graphql_object(Context = Context, name = "Training_People_Mutation", rename_all = "none")]
impl PeopleMutation {
    /// Adds all given people. If any of them is invalid, none is added.
    async fn insert(people: Vec<NewPerson>, context: &Context) -> PeopleInserted {
        context.outcome(catalog::insert::<Person>(&context.store, &people).await).into()
    }

    /// Deletes the people with the given IDs. Movies referencing them are not
    /// touched. Without IDs, the behavior depends on the configuration.
    async fn remove(ids: Option<Vec<Id>>, context: &Context) -> PeopleRemoved {
        let result = catalog::remove::<Person>(
            &context.store,
            ids.as_deref(),
            &context.config.catalog,
        ).await;
        context.outcome(result).into()
    }
}


#[derive(juniper::GraphQLObject)]
#[graphql(Context = Context, name = "Training_People_Find_Response")]
pub(crate) struct PeopleFound {
    success: bool,
    message: Option<String>,
    docs: Vec<Person>,
}

impl From<Found<Person>> for PeopleFound {
    fn from(Found { success, message, docs }: Found<Person>) -> Self {
        Self { success, message, docs }
    }
}

#[derive(juniper::GraphQLObject)]
#[graphql(Context = Context, name = "Training_People_Insert_Response")]
pub(crate) struct PeopleInserted {
    success: bool,
    message: String,
}

impl From<Outcome> for PeopleInserted {
    fn from(Outcome { success, message }: Outcome) -> Self {
        Self { success, message }
    }
}

#[derive(juniper::GraphQLObject)]
#[graphql(Context = Context, name = "Training_People_Remove_Response")]
pub(crate) struct PeopleRemoved {
    success: bool,
    message: String,
}

impl From<Outcome> for PeopleRemoved {
    fn from(Outcome { success, message }: Outcome) -> Self {
        Self { success, message }
    }
}
