//! The GraphQL types of the `training` namespace: the records themselves,
//! the per-collection query and mutation objects and their responses.

pub(crate) mod movie;
pub(crate) mod person;
