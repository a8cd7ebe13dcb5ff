//! Editor error type.
//!
//! Every failure here is fatal to the process. The `Display` form is
//! `<operation>: <system error>`, ready to print after the screen is cleared.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Terminal control or terminal I/O failed.
    #[error(transparent)]
    Term(#[from] kilo_term::Error),

    /// The file named on the command line could not be opened.
    #[error("fopen: {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading lines from an opened file failed.
    #[error("getline: {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
