use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::archive::utils::remove_regular_files;
use crate::archive::zip::{extract_zip_with, open_zip};
use crate::error::ExtractError;
use crate::models::{ExtractionOutcome, ExtractionRequest};

type RemoveFn = dyn Fn(&Path) -> io::Result<()>;
type CreateFn = dyn Fn(&Path) -> io::Result<fs::File>;

/// Replaces the contents of a cache directory with a ZIP archive.
///
/// Clearing is not transactional: if a file cannot be removed, the files
/// removed before it stay removed and nothing is extracted.
pub struct Extractor {
    remove_file: Box<RemoveFn>,
    create_file: Box<CreateFn>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            remove_file: Box::new(|path: &Path| fs::remove_file(path)),
            create_file: Box::new(|path: &Path| fs::File::create(path)),
        }
    }

    /// Use `remove_file` instead of `std::fs::remove_file` when clearing
    /// the destination
    pub fn with_remover(
        mut self,
        remove_file: impl Fn(&Path) -> io::Result<()> + 'static,
    ) -> Self {
        self.remove_file = Box::new(remove_file);
        self
    }

    /// Use `create_file` instead of `std::fs::File::create` for extracted files
    pub fn with_file_creator(
        mut self,
        create_file: impl Fn(&Path) -> io::Result<fs::File> + 'static,
    ) -> Self {
        self.create_file = Box::new(create_file);
        self
    }

    pub fn extract(&self, request: &ExtractionRequest) -> ExtractionOutcome {
        match self.try_extract(request) {
            Ok(entries) => {
                info!(entries, destination = %request.destination.display(), "cache seeded");
                ExtractionOutcome::Succeeded { entries }
            }
            Err(error) => {
                warn!(kind = ?error.kind(), %error, "extraction failed");
                ExtractionOutcome::Failed(error)
            }
        }
    }

    fn try_extract(&self, request: &ExtractionRequest) -> Result<usize, ExtractError> {
        let source = &request.source_archive;
        let destination = &request.destination;

        if !source.is_file() {
            return Err(ExtractError::MissingSource {
                path: source.clone(),
            });
        }

        if destination.exists() {
            let removed = remove_regular_files(destination, self.remove_file.as_ref())
                .map_err(ExtractError::from_removal)?;
            debug!(removed, "cleared existing cache files");
        }

        let mut archive = open_zip(source).map_err(ExtractError::from_zip)?;
        debug!(entries = archive.len(), archive = %source.display(), "opened archive");

        extract_zip_with(&mut archive, destination, self.create_file.as_ref())
            .map_err(ExtractError::from_zip)
    }
}
