use snafu::Snafu;

/// all errors the crate can surface to a caller.
///
/// route handlers map these onto http statuses, the binaries print them.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// a lap time string does not match the canonical `M:SS.mmm` format
    #[snafu(display("invalid lap time \"{input}\": expected M:SS.mmm"))]
    ParseError { input: String },

    /// a stored entry turned out to hold an unparsable lap time.
    /// the admin layer validates before persisting, so seeing this means
    /// the database holds data that never went through validation.
    #[snafu(display("entry {entry_id} has an unparsable lap time \"{input}\""))]
    ValidationError { entry_id: String, input: String },

    #[snafu(display("unknown event status \"{status}\""))]
    InvalidStatusError { status: String },

    #[snafu(display("{name} already exists"))]
    AlreadyExistsError { name: String },

    #[snafu(display("database error: {source}"))]
    DatabaseError { source: diesel::result::Error },
}

pub type CustomResult<T> = Result<T, Error>;
