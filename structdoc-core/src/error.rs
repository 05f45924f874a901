use core::fmt;

/// The Error type for the structdoc-core crate.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// The sources of a package could not be read or parsed.
    Parse(ParseError),
    /// An embedded field does not denote a struct declared in the module.
    MalformedEmbedding {
        /// The type (or synthetic inline type) holding the embedded field.
        enclosing: String,
        /// The embedded type, as written in the source.
        embedded: String,
    },
    /// The resolution went deeper than allowed, or a type ended up embedding itself.
    ///
    /// Carries the chain of `package.Type` frames that led to the cycle, outermost first.
    CycleDetected(Vec<String>),
}

/// The Result type for the structdoc-core crate.
pub type Result<T> = core::result::Result<T, Error>;

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{e}"),
            Error::MalformedEmbedding {
                enclosing,
                embedded,
            } => write!(
                f,
                "`{enclosing}` embeds `{embedded}`, which is not a struct declared in the module"
            ),
            Error::CycleDetected(chain) => {
                write!(f, "Cycle detected while resolving: {}", chain.join(" -> "))
            }
        }
    }
}

/// A package could not be turned into declarations.
#[derive(Debug)]
pub struct ParseError {
    package: String,
    file: Option<String>,
    line: Option<usize>,
    message: String,
    source: Option<std::io::Error>,
}

impl ParseError {
    /// A syntax error in `file` at `line`.
    pub fn syntax(
        package: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            file: Some(file.into()),
            line: Some(line),
            message: message.into(),
            source: None,
        }
    }

    /// An I/O failure while reading the package, optionally in a specific file.
    pub fn io(package: impl Into<String>, file: Option<String>, source: std::io::Error) -> Self {
        Self {
            package: package.into(),
            file,
            line: None,
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// The frontend has no sources for the package.
    pub fn missing(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            file: None,
            line: None,
            message: "no such package".to_string(),
            source: None,
        }
    }

    /// The package path that failed.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The file that failed, if the failure is file-specific.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// The 1-based line of a syntax error.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// A human readable description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl core::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn core::error::Error + 'static))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to parse package `{}`", self.package)?;
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, " ({file}:{line})")?,
            (Some(file), None) => write!(f, " ({file})")?,
            _ => (),
        }
        write!(f, ": {}", self.message)
    }
}
