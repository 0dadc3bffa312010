//! Error types and result definitions for pipeline assembly.
//!
//! No error values travel through stage channels; the abnormal conditions of the data
//! plane are prevented by construction (see [`crate::concurrency::channel`]). The types
//! here cover the crate's remaining fallible surface with classification and captured
//! callsite metadata.

use std::borrow::Cow;
use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Convenient result type for pipeline operations using [`FlowError`] as the error type.
pub type FlowResult<T> = Result<T, FlowError>;

/// Specific categories of errors that can occur during pipeline assembly and teardown.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The pipeline configuration failed validation.
    ConfigError,
    /// A stage task panicked and was contained at its task boundary.
    StagePanic,
    /// Uncategorized.
    Unknown,
}

/// Main error type for pipeline operations.
///
/// [`FlowError`] carries a [`ErrorKind`] classification, a static description, optional
/// dynamic detail, an optional source error, and the callsite at which it was built.
/// Instances are normally constructed through the [`crate::flow_error!`] and
/// [`crate::bail!`] macros.
#[derive(Debug, Clone)]
pub struct FlowError {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
}

impl FlowError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Returns the captured callsite location for this error.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Attaches an originating [`error::Error`] to this error and returns the modified
    /// instance.
    ///
    /// The stored source is preserved across clones and exposed via
    /// [`error::Error::source`].
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    /// Creates a [`FlowError`] from its components.
    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
    ) -> Self {
        Self {
            kind,
            description,
            detail,
            source: None,
            location: Location::caller(),
        }
    }
}

impl From<(ErrorKind, &'static str)> for FlowError {
    #[track_caller]
    fn from((kind, description): (ErrorKind, &'static str)) -> Self {
        Self::from_components(kind, description.into(), None)
    }
}

impl From<(ErrorKind, &'static str, String)> for FlowError {
    #[track_caller]
    fn from((kind, description, detail): (ErrorKind, &'static str, String)) -> Self {
        Self::from_components(kind, description.into(), Some(detail.into()))
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:?}] {} @ {}:{}:{}",
            self.kind,
            self.description,
            self.location.file(),
            self.location.line(),
            self.location.column()
        )?;

        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }

        Ok(())
    }
}

impl error::Error for FlowError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn error::Error + 'static))
    }
}
