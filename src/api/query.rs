use juniper::graphql_object;

use super::{
    Context,
    model::{movie::MoviesQuery, person::PeopleQuery},
};


/// The root query object.
pub(crate) struct Query;

#[graphql_object(Context = Context)]
impl Query {
    fn training() -> TrainingQuery {
        TrainingQuery
    }
}

pub(crate) struct TrainingQuery;

#[graphql_object(Context = Context, name = "Training_Query")]
impl TrainingQuery {
    fn movies() -> MoviesQuery {
        MoviesQuery
    }

    fn people() -> PeopleQuery {
        PeopleQuery
    }
}
