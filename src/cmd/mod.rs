pub(crate) mod check;
pub(crate) mod exec;
pub(crate) mod export_api_schema;
