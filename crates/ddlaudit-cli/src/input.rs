//! Resolving where the DDL comes from

use std::io::Read;
use std::path::{Path, PathBuf};

/// Display name used for standard input
pub const STDIN_NAME: &str = "<stdin>";

/// Where to read the schema from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `None` and `-` both mean standard input
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            Some(path) if path != Path::new("-") => Self::File(path.to_path_buf()),
            _ => Self::Stdin,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Stdin => STDIN_NAME.to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Read the whole input.
    ///
    /// Reading from an interactive terminal is refused: there is nothing
    /// piped in, and the caller should show usage instead.
    pub fn read(&self, stdin_is_terminal: bool) -> Result<String, InputError> {
        match self {
            Self::Stdin if stdin_is_terminal => Err(InputError::InteractiveStdin),
            Self::Stdin => read_piped(std::io::stdin().lock()),
            Self::File(path) => {
                std::fs::read_to_string(path).map_err(|source| InputError::File {
                    path: path.clone(),
                    source,
                })
            }
        }
    }
}

fn read_piped(mut reader: impl Read) -> Result<String, InputError> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(InputError::Stdin)?;
    Ok(content)
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("no input file given and nothing piped on standard input")]
    InteractiveStdin,

    #[error("{}: {}", .path.display(), .source)]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("standard input: {0}")]
    Stdin(#[source] std::io::Error),
}
