use thiserror::Error;

/// Result type alias using ApiDeltaError
pub type Result<T> = std::result::Result<T, ApiDeltaError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that release automation can match
/// on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Extraction
    PackageNotFound,
    MultiplePackages,
    NoExports,
    Parse,

    // Versioning
    InvalidVersion,
    InvalidPreviousVersion,

    // Configuration
    InvalidConfig,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::PackageNotFound => "ERR_PACKAGE_NOT_FOUND",
            ExErrorKind::MultiplePackages => "ERR_MULTIPLE_PACKAGES",
            ExErrorKind::NoExports => "ERR_NO_EXPORTS",
            ExErrorKind::Parse => "ERR_PARSE",
            ExErrorKind::InvalidVersion => "ERR_INVALID_VERSION",
            ExErrorKind::InvalidPreviousVersion => "ERR_INVALID_PREVIOUS_VERSION",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Flattens an [`ApiDeltaError`] into a kind, a stable code and optional
/// context fields for logging and machine-readable CLI output.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    version: Option<String>,
    message: String,
    candidates: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            version: None,
            message: String::new(),
            candidates: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add filesystem path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add version string context
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add candidate names (used for MultiplePackages to carry the package list)
    pub fn with_candidates(mut self, names: Vec<String>) -> Self {
        self.candidates = Some(names);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the version context, if any
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get candidate names, if any
    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(version) = &self.version {
            write!(f, " (version: {})", version)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for apidelta operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiDeltaError {
    // ===== Extraction Errors =====
    /// The directory holds no Go package (no non-test `.go` file with a package clause)
    #[error("no Go package found in {dir}")]
    PackageNotFound { dir: String },

    /// The directory holds more than one package
    #[error("found multiple packages in {dir}: {names:?}")]
    MultiplePackages { dir: String, names: Vec<String> },

    /// The package has no exported declarations
    #[error("package {package} doesn't contain any exports")]
    NoExports { package: String },

    /// The Go grammar could not be loaded or a file could not be parsed at all
    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    // ===== Versioning Errors =====
    /// A version string is not valid semver
    #[error("invalid version {version}: {reason}")]
    InvalidVersion { version: String, reason: String },

    /// A stable release was requested from a prerelease baseline
    #[error("must have stable previous version, got {version}")]
    InvalidPreviousVersion { version: String },

    // ===== Configuration Errors =====
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    // ===== Integration Errors =====
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ApiDeltaError {
    /// Wrap a `std::io::Error` together with the path that produced it
    pub fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        ApiDeltaError::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from ApiDeltaError to ExError
impl From<ApiDeltaError> for ExError {
    fn from(err: ApiDeltaError) -> Self {
        match err {
            ApiDeltaError::PackageNotFound { dir } => ExError::new(ExErrorKind::PackageNotFound)
                .with_path(dir)
                .with_message("no Go package found"),

            ApiDeltaError::MultiplePackages { dir, names } => {
                ExError::new(ExErrorKind::MultiplePackages)
                    .with_path(dir)
                    .with_message(format!("found {} packages", names.len()))
                    .with_candidates(names)
            }

            ApiDeltaError::NoExports { package } => ExError::new(ExErrorKind::NoExports)
                .with_message(format!("package {} doesn't contain any exports", package)),

            ApiDeltaError::Parse { path, reason } => ExError::new(ExErrorKind::Parse)
                .with_path(path)
                .with_message(reason),

            ApiDeltaError::InvalidVersion { version, reason } => {
                ExError::new(ExErrorKind::InvalidVersion)
                    .with_version(version)
                    .with_message(reason)
            }

            ApiDeltaError::InvalidPreviousVersion { version } => {
                ExError::new(ExErrorKind::InvalidPreviousVersion)
                    .with_version(version)
                    .with_message("must have stable previous version")
            }

            ApiDeltaError::InvalidConfig { message } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }

            ApiDeltaError::Io { path, message } => ExError::new(ExErrorKind::Io)
                .with_path(path)
                .with_message(message),

            ApiDeltaError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            ApiDeltaError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to ApiDeltaError
impl From<serde_json::Error> for ApiDeltaError {
    fn from(err: serde_json::Error) -> Self {
        ApiDeltaError::Serialization {
            message: err.to_string(),
        }
    }
}
