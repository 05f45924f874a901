use derive_more::From;

/// Error types that can occur while describing Go struct types.
#[derive(Debug, From)]
pub enum Error {
    /// An invalid argument was provided.
    InvalidArgument(String),

    /// An I/O error occurred while writing the output.
    #[from]
    Io(std::io::Error),

    /// The JSON output could not be produced.
    #[from]
    Json(serde_json::Error),

    /// An error from the structdoc-core library.
    #[from]
    Resolve(structdoc_core::Error),
}

impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(fmt, "Invalid argument: {msg}"),
            Error::Io(e) => write!(fmt, "{e}"),
            Error::Json(e) => write!(fmt, "{e}"),
            Error::Resolve(e) => write!(fmt, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidArgument(_) => None,
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Resolve(e) => Some(e),
        }
    }
}
