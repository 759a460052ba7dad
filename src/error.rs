use thiserror::Error;

/// Every error this crate can produce.
#[derive(Error, Debug)]
pub enum Error {
    /// A UCD record did not have exactly 14 fields after the codepoint.
    #[error("UCD record for {codepoint} has {found} fields, expected 14")]
    Format {
        /// The codepoint the record was being built for.
        codepoint: String,
        /// The number of fields actually found.
        found: usize,
    },

    /// The decomposition field has unbalanced `<` / `>` markers.
    #[error("malformed decomposition field `{0}`")]
    Parse(String),

    /// The Unicode property provider reported a failure status.
    #[error("native library error code {0}")]
    NativeLibrary(i32),

    /// Text that should have been a hexadecimal codepoint.
    #[error("invalid codepoint `{0}`")]
    InvalidCodepoint(String),

    /// A rename would put two writing systems under the same locale.
    #[error("a writing system for `{0}` is already stored")]
    LocaleInUse(String),

    /// Reading or writing a backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// (De)serializing a writing system failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
