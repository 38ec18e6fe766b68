use sitegen_core::archive::ArchiveError;
use sitegen_core::prompt::PromptError;
use sitegen_core::session::SessionError;

#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Generation service error: {0}")]
    Service(String),

    #[error("Nothing to package: the response contains no file markers")]
    EmptyBundle,

    #[error("Please generate the site first")]
    NotGenerated,

    #[error("Unsafe file path in response: {0}")]
    UnsafePath(String),

    #[error("Archive error: {0}")]
    Archive(String),
}

impl From<PromptError> for Error {
    fn from(err: PromptError) -> Self {
        Error::InvalidInput(err.to_string())
    }
}

impl From<ArchiveError> for Error {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::EmptyBundle => Error::EmptyBundle,
            ArchiveError::UnsafePath(path) => Error::UnsafePath(path),
            err => Error::Archive(err.to_string()),
        }
    }
}

impl From<SessionError> for Error {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotGenerated => Error::NotGenerated,
            SessionError::Archive(err) => err.into(),
        }
    }
}
