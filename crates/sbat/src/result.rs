use ascii::AsciiChar;

/// Errors produced while parsing SBAT payloads.
#[derive(thiserror::Error, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A payload byte is outside the ASCII range. SBAT fields are
    /// ASCII by definition.
    #[error("payload contains a non-ASCII byte")]
    InvalidAscii,

    /// A field contains an ASCII character that is neither alphanumeric
    /// nor in [`ALLOWED_SPECIAL_CHARS`]. Quotes, backslashes and commas
    /// are never valid inside a field, so the format needs no escaping.
    ///
    /// [`ALLOWED_SPECIAL_CHARS`]: crate::ALLOWED_SPECIAL_CHARS
    #[error("field contains disallowed character `{0}`")]
    SpecialChar(AsciiChar),

    /// A generation field is empty, non-numeric, zero, or does not fit
    /// in a `u32`.
    #[error("field is not a valid generation number")]
    InvalidGeneration,

    /// The payload holds more records than the backing storage accepts.
    #[error("payload has more records than the storage can hold")]
    TooManyRecords,

    /// A record is missing its component name or generation.
    #[error("record has too few fields")]
    TooFewFields,
}

/// Crate-wide [`Result`] alias.
///
/// [`Result`]: core::result::Result
pub type Result<T> = core::result::Result<T, Error>;
