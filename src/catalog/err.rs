//! Errors of catalog operations.
//!
//! There are only two kinds: the caller did something wrong (reported with a
//! specific message) or something went wrong on our side (logged here,
//! reported to the caller as a generic message). A query that matches nothing
//! is not an error at all.

use std::fmt;

use crate::prelude::*;


pub(crate) type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug)]
pub(crate) struct CatalogError {
    pub(crate) msg: String,
    pub(crate) kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorKind {
    /// Malformed or missing input: bad identifier, bad date, missing required
    /// field, empty batch.
    InvalidInput,

    /// Anything failing in the persistence layer or in (de)serializing
    /// documents. Out of control of the caller.
    Internal,
}

impl ErrorKind {
    pub(crate) fn kind_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl CatalogError {
    pub(crate) const UNKNOWN_FAILURE: &'static str = "An unknown error occurred";

    /// The message to show the caller. Details of internal errors are only
    /// included if `expose_internal` is set.
    pub(crate) fn user_message(&self, expose_internal: bool) -> String {
        match self.kind {
            ErrorKind::InvalidInput => self.msg.clone(),
            ErrorKind::Internal if expose_internal => {
                format!("{}: {}", Self::UNKNOWN_FAILURE, self.msg)
            }
            ErrorKind::Internal => Self::UNKNOWN_FAILURE.into(),
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.msg, self.kind.kind_str())
    }
}

impl std::error::Error for CatalogError {}

impl From<anyhow::Error> for CatalogError {
    fn from(src: anyhow::Error) -> Self {
        // This is the last place where the full error chain is available: the
        // caller only ever gets to see a generic message.
        error!("Store error: {src:#}");
        debug!("Detailed error: {src:?}");

        Self {
            msg: format!("{src:#}"),
            kind: ErrorKind::Internal,
        }
    }
}

impl From<mongodb::bson::ser::Error> for CatalogError {
    fn from(src: mongodb::bson::ser::Error) -> Self {
        error!("Failed to serialize document: {src}");
        Self {
            msg: format!("failed to serialize document: {src}"),
            kind: ErrorKind::Internal,
        }
    }
}

impl From<mongodb::bson::de::Error> for CatalogError {
    fn from(src: mongodb::bson::de::Error) -> Self {
        error!("Stored document does not have the expected shape: {src}");
        Self {
            msg: format!("failed to deserialize document: {src}"),
            kind: ErrorKind::Internal,
        }
    }
}


// ===== Helper macros to easily create errors ==================================================

/// Creates a `CatalogError` with a `format!` like syntax.
macro_rules! catalog_err {
    ($kind:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::catalog::err::CatalogError {
            msg: format!($fmt $(, $arg)*),
            kind: $crate::catalog::err::ErrorKind::$kind,
        }
    };
}

macro_rules! invalid_input {
    ($($t:tt)+) => { $crate::catalog::err::catalog_err!(InvalidInput, $($t)*) };
}

macro_rules! internal_error {
    ($($t:tt)+) => { $crate::catalog::err::catalog_err!(Internal, $($t)*) };
}

pub(crate) use catalog_err;
pub(crate) use invalid_input;
pub(crate) use internal_error;
