use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::error::ExtractError;

/// Command line arguments. With no flags the tool runs interactively.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Cache archive to extract (defaults to the archive bundled with the tool)
    #[arg(short, long)]
    pub archive: Option<PathBuf>,
    /// VRChat cache folder; skips the prompt when the folder exists
    #[arg(short = 'c', long = "cache-root")]
    pub cache_root: Option<PathBuf>,
    /// Settings file (defaults to cache-seed.toml next to the archive)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Exit without waiting for Enter
    #[arg(long)]
    pub no_pause: bool,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// One extraction: which archive goes into which cache directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub source_archive: PathBuf,
    pub destination: PathBuf,
}

impl ExtractionRequest {
    pub fn new(source_archive: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source_archive: source_archive.into(),
            destination: destination.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionErrorKind {
    MissingSource,
    PermissionDenied,
    CorruptArchive,
    ExtractionError,
}

/// Result of a single extraction. A failure always carries its error.
#[derive(Debug)]
pub enum ExtractionOutcome {
    Succeeded { entries: usize },
    Failed(ExtractError),
}

impl ExtractionOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, ExtractionOutcome::Succeeded { .. })
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            ExtractionOutcome::Succeeded { .. } => None,
            ExtractionOutcome::Failed(error) => Some(error.to_string()),
        }
    }

    pub fn error_kind(&self) -> Option<ExtractionErrorKind> {
        match self {
            ExtractionOutcome::Succeeded { .. } => None,
            ExtractionOutcome::Failed(error) => Some(error.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_flags() {
        let args = Args::try_parse_from(["vrc-cache-seed"]).unwrap();
        assert!(args.archive.is_none());
        assert!(args.cache_root.is_none());
        assert!(!args.no_pause);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_parse_all_flags() {
        let args = Args::try_parse_from([
            "vrc-cache-seed",
            "--archive",
            "bundle.zip",
            "-c",
            "/cache",
            "--config",
            "seed.toml",
            "--no-pause",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.archive, Some(PathBuf::from("bundle.zip")));
        assert_eq!(args.cache_root, Some(PathBuf::from("/cache")));
        assert_eq!(args.config, Some(PathBuf::from("seed.toml")));
        assert!(args.no_pause);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_outcome_message_only_on_failure() {
        let ok = ExtractionOutcome::Succeeded { entries: 3 };
        assert!(ok.succeeded());
        assert!(ok.error_message().is_none());
        assert!(ok.error_kind().is_none());

        let failed = ExtractionOutcome::Failed(ExtractError::MissingSource {
            path: PathBuf::from("missing.zip"),
        });
        assert!(!failed.succeeded());
        assert!(failed.error_message().unwrap().contains("not found"));
        assert_eq!(failed.error_kind(), Some(ExtractionErrorKind::MissingSource));
    }
}
