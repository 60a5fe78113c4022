//! API error handling.
//!
//! Operations report their failures inside the response envelope. Only
//! resolvers that follow references between records (e.g. `Movie.director`)
//! fail with GraphQL errors. Those carry the error kind as extension.

use juniper::{FieldError, IntoFieldError, ScalarValue, graphql_value};

use crate::catalog::err::ErrorKind;


pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Create via [`Context::field_error`][super::Context::field_error] so that
/// internal details are only included if configured.
#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) msg: String,
    pub(crate) kind: ErrorKind,
}

impl<S: ScalarValue> IntoFieldError<S> for ApiError {
    fn into_field_error(self) -> FieldError<S> {
        FieldError::new(self.msg, graphql_value!({
            "kind": (self.kind.kind_str()),
        }))
    }
}
