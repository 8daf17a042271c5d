//! crates/cli/src/frontend/destination.rs
//!
//! Output operands. File output is written to a hidden temporary file in
//! the destination directory and renamed over the destination only once
//! the job succeeded. A failed job leaves the destination untouched and the
//! temporary file is removed when the [`Destination`] is dropped.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};

use super::arguments::Operand;
use super::error::CliError;

/// Name prefix of temporary output files.
const STAGING_PREFIX: &str = ".rdelta-tmp-";

pub(crate) enum Destination<'a, W: Write> {
    Stdout(&'a mut W),
    Staged {
        file: NamedTempFile,
        path: PathBuf,
        force: bool,
    },
}

impl<'a, W: Write> Destination<'a, W> {
    /// Opens an output operand. Existing files are only replaced with
    /// `force`.
    pub(crate) fn open(
        operand: &Operand,
        force: bool,
        stdout: &'a mut W,
    ) -> Result<Self, CliError> {
        let Operand::Path(path) = operand else {
            return Ok(Self::Stdout(stdout));
        };
        if !force && fs::symlink_metadata(path).is_ok() {
            return Err(CliError::Exists(operand.clone()));
        }

        let file = staging_builder()
            .tempfile_in(staging_dir(path))
            .map_err(|source| CliError::Open {
                operand: operand.clone(),
                source,
            })?;
        Ok(Self::Staged {
            file,
            path: path.clone(),
            force,
        })
    }

    /// Moves staged output into place.
    pub(crate) fn commit(self) -> Result<(), CliError> {
        let Self::Staged { file, path, force } = self else {
            return Ok(());
        };
        let persisted = if force {
            file.persist(&path)
        } else {
            file.persist_noclobber(&path)
        };
        match persisted {
            Ok(_) => Ok(()),
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                Err(CliError::Exists(Operand::Path(path)))
            }
            Err(err) => Err(CliError::Commit {
                operand: Operand::Path(path),
                source: err.error,
            }),
        }
    }
}

impl<W: Write> Write for Destination<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(out) => out.write(buf),
            Self::Staged { file, .. } => file.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Self::Stdout(out) => out.write_all(buf),
            Self::Staged { file, .. } => file.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(out) => out.flush(),
            Self::Staged { file, .. } => file.flush(),
        }
    }
}

fn staging_builder() -> Builder<'static, 'static> {
    let mut builder = Builder::new();
    builder.prefix(STAGING_PREFIX);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Same mode a plain create would get once the umask applies.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder
}

fn staging_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
