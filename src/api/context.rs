use std::sync::Arc;

use crate::{
    api::err::ApiError,
    catalog::{envelope::{Found, Outcome}, CatalogError, CatalogResult},
    config::Config,
    store::Store,
};


/// The context that is accessible to every resolver in our API.
pub(crate) struct Context {
    pub(crate) store: Store,
    pub(crate) config: Arc<Config>,
}

impl juniper::Context for Context {}

impl Context {
    fn expose_internal_errors(&self) -> bool {
        self.config.general.expose_internal_errors
    }

    /// Wraps the result of a `find` operation into the response envelope.
    pub(crate) fn found<T>(&self, result: CatalogResult<Vec<T>>) -> Found<T> {
        Found::new(result, self.expose_internal_errors())
    }

    /// Wraps the result of `insert` or `remove` into the response envelope.
    pub(crate) fn outcome(&self, result: CatalogResult<String>) -> Outcome {
        Outcome::new(result, self.expose_internal_errors())
    }

    /// For resolvers that report failures as GraphQL errors instead of an
    /// envelope.
    pub(crate) fn field_error(&self, err: CatalogError) -> ApiError {
        ApiError {
            msg: err.user_message(self.expose_internal_errors()),
            kind: err.kind,
        }
    }
}
