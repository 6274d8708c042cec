use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::batch;
use crate::error::{Result, SinkError};
use crate::producer::TokenProducer;

/// Write one token per line to `path`, creating parent directories and
/// truncating any previous content.
pub fn write_lines<T: AsRef<str>>(path: impl AsRef<Path>, tokens: &[T]) -> Result<(), SinkError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SinkError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let write_err = |source| SinkError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(write_err)?);
    for token in tokens {
        writer.write_all(token.as_ref().as_bytes()).map_err(write_err)?;
        writer.write_all(b"\n").map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;

    debug!(path = %path.display(), lines = tokens.len(), "tokens written");
    Ok(())
}

/// Generate `count` tokens and write them to `path`.
///
/// Nothing is written when generation fails. Returns the number of lines
/// written.
pub fn generate_to_file<P>(path: impl AsRef<Path>, count: usize, producer: &P) -> Result<usize>
where
    P: TokenProducer + ?Sized,
{
    let tokens = batch::generate(count, producer)?;
    write_lines(path, &tokens)?;
    Ok(tokens.len())
}
