//! The uniform result shapes callers see.
//!
//! Expected failures never escape as errors: they are turned into
//! `success: false` plus a message. Internal errors are already logged by
//! the time they get here and their details are only passed on if
//! `expose_internal` is set.

use super::CatalogResult;


/// Result of a `find` operation. `docs` is empty on failure.
#[derive(Debug)]
pub(crate) struct Found<T> {
    pub(crate) success: bool,
    pub(crate) message: Option<String>,
    pub(crate) docs: Vec<T>,
}

impl<T> Found<T> {
    pub(crate) fn new(result: CatalogResult<Vec<T>>, expose_internal: bool) -> Self {
        match result {
            Ok(docs) => Self { success: true, message: None, docs },
            Err(e) => Self {
                success: false,
                message: Some(e.user_message(expose_internal)),
                docs: vec![],
            },
        }
    }
}

/// Result of `insert` and `remove`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Outcome {
    pub(crate) success: bool,
    pub(crate) message: String,
}

impl Outcome {
    pub(crate) fn new(result: CatalogResult<String>, expose_internal: bool) -> Self {
        match result {
            Ok(message) => Self { success: true, message },
            Err(e) => Self { success: false, message: e.user_message(expose_internal) },
        }
    }
}
