use core::fmt;

/// Recoverable error conditions. None of these indicate a corrupted
/// detector; the failed call can be retried with corrected input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A write would overflow the ring buffer. The caller must provide
    /// smaller chunks or drain columns faster.
    CapacityExceeded,
    /// Empty template, empty feature vectors or inconsistent feature
    /// dimensionality.
    InvalidTemplate,
    /// A per-position parameter vector has the wrong length.
    LengthMismatch,
    /// Templates and callbacks can only be registered before `initialize`.
    RegistrationClosed,
    /// `initialize` was called twice.
    AlreadyInitialized,
    /// Audio was ingested before `initialize`.
    NotInitialized,
    /// `initialize` was called without any registered template.
    NoTemplates,
    /// A serialized template's byte length is not a positive multiple of
    /// the feature row size.
    MalformedTemplateFile,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match self {
            Error::CapacityExceeded => "write exceeds remaining ring buffer capacity",
            Error::InvalidTemplate => "empty template or inconsistent feature dimension",
            Error::LengthMismatch => "parameter vector length does not match",
            Error::RegistrationClosed => "registration is closed after initialization",
            Error::AlreadyInitialized => "already initialized",
            Error::NotInitialized => "not initialized",
            Error::NoTemplates => "no templates registered",
            Error::MalformedTemplateFile => "template byte length is not a multiple of the row size",
        };
        write!(f, "{}", message)
    }
}
