use std::io;

use thiserror::Error;

/// Errors surfaced by a conversion. Each variant names the phase that failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read input file")]
    Input(#[source] io::Error),

    #[error("malformed markdown tree: {0}")]
    Parse(String),

    #[error("failed to serialize {part}")]
    Xml {
        part: &'static str,
        #[source]
        source: quick_xml::Error,
    },

    #[error("failed to build document archive")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to write output")]
    Output(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
