use std::error::Error as StdError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("missing {field} in response")]
    MissingMedia { field: &'static str },

    #[error("{setting} is missing")]
    NotConfigured { setting: &'static str },

    /// Every credential failed; `source` is the last failure observed.
    #[error("all {attempts} credential(s) failed, last error: {source}")]
    Exhausted {
        attempts: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    #[must_use]
    pub fn external<E>(context: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
