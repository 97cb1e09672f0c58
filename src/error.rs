use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Reader exhausted mid-field.
    Io(std::io::Error),
    /// Declared length inconsistent with header or VSA framing.
    BadLength(String),
    /// Value does not satisfy its dictionary type.
    BadType(String),
    /// Name not found in the dictionary.
    DictionaryMiss(String),
    /// Dictionary document rejected at load.
    DictionaryLoad(String),
    /// Occurrence bounds or forbidden attribute in a Diameter message.
    SchemaViolation(String),
    /// Authenticator validation failed.
    CryptoMismatch(String),
    /// RADIUS AVP would exceed 255 bytes and is not of concat type.
    OversizedAvp(String),
    /// Internal assertion failed, e.g. bytes written != declared length.
    LogicInvariant(String),
    Json(serde_json::Error),
    DecodeError(String),
    EncodeError(String),
    TryFromSliceError(std::array::TryFromSliceError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "{}", e),
            Error::BadLength(msg) => write!(f, "bad length: {}", msg),
            Error::BadType(msg) => write!(f, "bad type: {}", msg),
            Error::DictionaryMiss(name) => write!(f, "not found in dictionary: {}", name),
            Error::DictionaryLoad(msg) => write!(f, "dictionary load: {}", msg),
            Error::SchemaViolation(msg) => write!(f, "schema violation: {}", msg),
            Error::CryptoMismatch(msg) => write!(f, "crypto mismatch: {}", msg),
            Error::OversizedAvp(msg) => write!(f, "oversized avp: {}", msg),
            Error::LogicInvariant(msg) => write!(f, "logic invariant: {}", msg),
            Error::Json(e) => write!(f, "{}", e),
            Error::DecodeError(msg) => write!(f, "{}", msg),
            Error::EncodeError(msg) => write!(f, "{}", msg),
            Error::TryFromSliceError(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<std::array::TryFromSliceError> for Error {
    fn from(err: std::array::TryFromSliceError) -> Error {
        Error::TryFromSliceError(err)
    }
}
