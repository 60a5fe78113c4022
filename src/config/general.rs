#[derive(Debug, confique::Config)]
pub(crate) struct GeneralConfig {
    /// If set to `true`, the message of internal errors (e.g. a failed
    /// database query) is passed on to API users. Otherwise they only see
    /// "An unknown error occurred". Details are always logged.
    ///
    /// Only enable this for development.
    #[config(default = false)]
    pub(crate) expose_internal_errors: bool,
}
