use juniper::graphql_object;

use super::{
    Context,
    model::{movie::MoviesMutation, person::PeopleMutation},
};


/// The root mutation object.
pub(crate) struct Mutation;

#[graphql_object(Context = Context)]
impl Mutation {
    fn training() -> TrainingMutation {
        TrainingMutation
    }
}

pub(crate) struct TrainingMutation;

#[graphql_object(Context = Context, name = "Training_Mutation")]
impl TrainingMutation {
    fn movies() -> MoviesMutation {
        MoviesMutation
    }

    fn people() -> PeopleMutation {
        PeopleMutation
    }
}
