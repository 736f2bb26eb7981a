use std::path::PathBuf;

use thiserror::Error;

/// Why a question bank could not be produced. Both variants end the quiz in
/// the error phase; the detail only goes to the log.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read question file {}: {source}", path.display())]
    Fetch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("question source contained no well-formed records")]
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("no question is being asked")]
    NotActive,
    #[error("waiting for the current question to advance")]
    AwaitingAdvance,
    #[error("option {0} does not exist")]
    NoSuchOption(usize),
}
