use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::archive::utils::RemoveFileError;
use crate::models::ExtractionErrorKind;

/// Why seeding the cache failed. Display is the message shown to the user.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Local file not found: {}", .path.display())]
    MissingSource { path: PathBuf },

    #[error("Cannot remove existing file: {file}. Please close VRChat and try again.")]
    Locked {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied during extraction. Please close VRChat and try again: {source}")]
    PermissionDenied {
        #[source]
        source: io::Error,
    },

    #[error("Invalid zip file: {reason}")]
    CorruptArchive { reason: String },

    #[error("Extract error: {message}")]
    Extraction { message: String },
}

impl ExtractError {
    pub fn kind(&self) -> ExtractionErrorKind {
        match self {
            ExtractError::MissingSource { .. } => ExtractionErrorKind::MissingSource,
            ExtractError::Locked { .. } | ExtractError::PermissionDenied { .. } => {
                ExtractionErrorKind::PermissionDenied
            }
            ExtractError::CorruptArchive { .. } => ExtractionErrorKind::CorruptArchive,
            ExtractError::Extraction { .. } => ExtractionErrorKind::ExtractionError,
        }
    }

    /// Classify a failure while clearing the destination
    pub fn from_removal(error: RemoveFileError) -> Self {
        if is_permission_error(&error.source) {
            let file = error
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| error.path.display().to_string());
            ExtractError::Locked {
                file,
                source: error.source,
            }
        } else {
            ExtractError::Extraction {
                message: error.to_string(),
            }
        }
    }

    /// Classify a failure while opening or unpacking the archive
    pub fn from_zip(error: zip::result::ZipError) -> Self {
        use zip::result::ZipError;

        match error {
            ZipError::InvalidArchive(reason) => ExtractError::CorruptArchive {
                reason: reason.to_string(),
            },
            ZipError::Io(source) if is_permission_error(&source) => {
                ExtractError::PermissionDenied { source }
            }
            ZipError::Io(source) if is_checksum_error(&source) => ExtractError::CorruptArchive {
                reason: source.to_string(),
            },
            other => ExtractError::Extraction {
                message: other.to_string(),
            },
        }
    }
}

/// True for errors caused by missing rights or by another process holding
/// the file open. Wrapped I/O errors are checked down the source chain.
pub fn is_permission_error(error: &io::Error) -> bool {
    if is_permission_kind(error) {
        return true;
    }

    let mut next = std::error::Error::source(error);
    while let Some(inner) = next {
        if let Some(io_error) = inner.downcast_ref::<io::Error>()
            && is_permission_kind(io_error)
        {
            return true;
        }
        next = inner.source();
    }

    false
}

fn is_permission_kind(error: &io::Error) -> bool {
    if error.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }

    #[cfg(windows)]
    {
        const ERROR_SHARING_VIOLATION: i32 = 32;
        const ERROR_LOCK_VIOLATION: i32 = 33;
        if matches!(
            error.raw_os_error(),
            Some(ERROR_SHARING_VIOLATION | ERROR_LOCK_VIOLATION)
        ) {
            return true;
        }
    }

    false
}

/// zip reports a CRC mismatch as a plain I/O error once an entry is read
fn is_checksum_error(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::InvalidData || error.to_string().contains("Invalid checksum")
}
