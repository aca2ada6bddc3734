use std::fs;
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use zip::ZipArchive;
use zip::result::ZipResult;

/// Open a ZIP archive for reading
pub fn open_zip(zip_path: &Path) -> ZipResult<ZipArchive<fs::File>> {
    let file = fs::File::open(zip_path).map_err(|e| with_path(e, zip_path))?;
    ZipArchive::new(file)
}

/// Extract every entry of `archive` below `extract_to`, creating directories
/// as needed. Entries whose names would escape `extract_to` are skipped.
/// Returns the number of entries written.
pub fn extract_zip<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    extract_to: &Path,
) -> ZipResult<usize> {
    extract_zip_with(archive, extract_to, &|path| fs::File::create(path))
}

/// Same as [`extract_zip`], opening output files through `create_file`
pub fn extract_zip_with<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    extract_to: &Path,
    create_file: &dyn Fn(&Path) -> io::Result<fs::File>,
) -> ZipResult<usize> {
    fs::create_dir_all(extract_to).map_err(|e| with_path(e, extract_to))?;

    let mut extracted_count = 0;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;

        let Some(relative) = file.enclosed_name().map(Path::to_path_buf) else {
            warn!(name = file.name(), "skipping entry with unsafe path");
            continue;
        };
        let outpath = extract_to.join(relative);

        if file.is_dir() {
            fs::create_dir_all(&outpath).map_err(|e| with_path(e, &outpath))?;
        } else {
            if let Some(parent) = outpath.parent()
                && !parent.exists()
            {
                fs::create_dir_all(parent).map_err(|e| with_path(e, parent))?;
            }

            let mut outfile = create_file(&outpath).map_err(|e| with_path(e, &outpath))?;
            io::copy(&mut file, &mut outfile)?;

            // Set file permissions on Unix-like systems
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = file.unix_mode() {
                    fs::set_permissions(&outpath, fs::Permissions::from_mode(mode))
                        .map_err(|e| with_path(e, &outpath))?;
                }
            }
        }

        debug!(path = %outpath.display(), "extracted");
        extracted_count += 1;
    }

    Ok(extracted_count)
}

/// An I/O failure on a specific output path. The original error is kept as
/// the source so its OS error code survives.
#[derive(Debug, Error)]
#[error("{}: {source}", .path.display())]
pub struct PathIoError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

pub(crate) fn with_path(error: io::Error, path: &Path) -> io::Error {
    io::Error::new(
        error.kind(),
        PathIoError {
            path: path.to_path_buf(),
            source: error,
        },
    )
}

/// Write a ZIP file with the given entries. Names ending in `/` become
/// directories.
#[cfg(test)]
pub(crate) fn write_test_zip(path: &Path, entries: &[(&str, &str)]) {
    use std::io::Write;
    use zip::write::FileOptions;

    let file = fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = FileOptions::default();
    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data.as_bytes()).unwrap();
        }
    }
    writer.finish().unwrap();
}
