//! Items that define the domain data model.
//!
//! These are the records as they are stored, the shapes in which new records
//! arrive, and the small value types (IDs, dates) shared by the store, the
//! catalog logic and the API.

mod date;
mod id;
mod movie;
mod person;

pub(crate) use self::{
    date::IsoDate,
    id::Id,
    movie::{Movie, NewMovie},
    person::{NewPerson, Person},
};
