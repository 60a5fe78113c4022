use juniper::graphql_object;

use crate::{
    api::{Context, err::ApiResult},
    catalog::{self, envelope::{Found, Outcome}, MovieQuery},
    model::{Id, Movie, NewMovie, Person},
};


#[graphql_object(Context = Context, name = "Training_Movies_Movie", rename_all = "none")]
impl Movie {
    fn id(&self) -> Id {
        self.id.into()
    }

    fn title(&self) -> &str {
        &self.title
    }

    /// ISO 8601 date, e.g. `1979-05-25`.
    fn release_date(&self) -> &str {
        self.release_date.as_str()
    }

    fn director_id(&self) -> Option<Id> {
        self.director_id.map(Id::from)
    }

    /// The director of this movie. `null` if not set or if the referenced
    /// person does not exist.
    async fn director(&self, context: &Context) -> ApiResult<Option<Person>> {
        let Some(id) = self.director_id else {
            return Ok(None);
        };

        catalog::find_by_ids::<Person>(&context.store, &[id])
            .await
            .map(|people| people.into_iter().next())
            .map_err(|e| context.field_error(e))
    }

    fn actor_ids(&self) -> Option<Vec<Id>> {
        self.actor_ids.as_ref().map(|ids| ids.iter().copied().map(Id::from).collect())
    }

    /// The actors of this movie, in the order of `actor_ids`. References to
    /// people that do not exist are skipped. `null` if no actor was found.
    async fn actors(&self, context: &Context) -> ApiResult<Option<Vec<Person>>> {
        let Some(ids) = &self.actor_ids else {
            return Ok(None);
        };

        catalog::find_by_ids::<Person>(&context.store, ids)
            .await
            .map(|people| Some(people).filter(|p| !p.is_empty()))
            .map_err(|e| context.field_error(e))
    }
}


pub(crate) struct MoviesQuery;

#[graphql_object(Context = Context, name = "Training_Movies_Query", rename_all = "none")]
impl MoviesQuery {
    /// Returns all movies matching at least one of the given arguments. All
    /// movies are returned if no argument is given.
    async fn find(
        id: Option<Id>,
        title: Option<String>,
        release_date: Option<String>,
        director_id: Option<Id>,
        actor_id: Option<Id>,
        context: &Context,
    ) -> MoviesFound {
        let query = MovieQuery { id, title, release_date, director_id, actor_id };
        context.found(catalog::find::<Movie>(&context.store, &query).await).into()
    }
}

pub(crate) struct MoviesMutation;

#[graphql_object(Context = Context, name = "Training_Movies_Mutation", rename_all = "none")]
impl MoviesMutation {
    /// Adds all given movies. If any of them is invalid, none is added.
    async fn insert(movies: Vec<NewMovie>, context: &Context) -> MoviesInserted {
        context.outcome(catalog::insert::<Movie>(&context.store, &movies).await).into()
    }

    /// Deletes the movies with the given IDs. Without IDs, the behavior
    /// depends on the configuration: either all movies or none are deleted.
    async fn remove(ids: Option<Vec<Id>>, context: &Context) -> MoviesRemoved {
        let result = catalog::remove::<Movie>(
            &context.store,
            ids.as_deref(),
            &context.config.catalog,
        ).await;
        context.outcome(result).into()
    }
}


#[derive(juniper::GraphQLObject)]
#[graphql(Context = Context, name = "Training_Movies_Find_Response")]
pub(crate) struct MoviesFound {
    success: bool,
    message: Option<String>,
    docs: Vec<Movie>,
}

impl From<Found<Movie>> for MoviesFound {
    fn from(Found { success, message, docs }: Found<Movie>) -> Self {
        Self { success, message, docs }
    }
}

#[derive(juniper::GraphQLObject)]
#[graphql(Context = Context, name = "Training_Movies_Insert_Response")]
pub(crate) struct MoviesInserted {
    success: bool,
    message: String,
}

impl From<Outcome> for MoviesInserted {
    fn from(Outcome { success, message }: Outcome) -> Self {
        Self { success, message }
    }
}

#[derive(juniper::GraphQLObject)]
#[graphql(Context = Context, name = "Training_Movies_Remove_Response")]
pub(crate) struct MoviesRemoved {
    success: bool,
    message: String,
}

impl From<Outcome> for MoviesRemoved {
    fn from(Outcome { success, message }: Outcome) -> Self {
        Self { success, message }
    }
}
