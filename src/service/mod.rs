//! File access as an explicit capability.
//!
//! The host (a desktop shell, the CLI, or a test) supplies a [`FileService`].
//! Dialog-style operations can be canceled by the user; cancellation is a
//! [`DialogOutcome::Canceled`] value, never an error.

use std::fs;
use std::path::{Path, PathBuf};

use crate::conversion::{format_for_export, internal_to_raw_with, RawExportOptions};
use crate::error::BboxError;
use crate::import::{decode_dataset_with_palette, DecodedDataset};
use crate::model::{Dataset, LabelPalette};

/// Result of an operation the user may cancel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogOutcome<T> {
    Completed(T),
    Canceled,
}

impl<T> DialogOutcome<T> {
    /// Converts to `Option`, mapping a cancel to `None`.
    pub fn completed(self) -> Option<T> {
        match self {
            DialogOutcome::Completed(v) => Some(v),
            DialogOutcome::Canceled => None,
        }
    }
}

/// A file picked and read through [`FileService::open_file`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Host file operations used by the editor.
pub trait FileService {
    /// Lets the user pick a file and returns its text.
    fn open_file(&mut self) -> Result<DialogOutcome<OpenedFile>, BboxError>;

    /// Lets the user pick a destination and writes `contents` to it.
    fn save_file(&mut self, contents: &str) -> Result<DialogOutcome<PathBuf>, BboxError>;

    /// Checks that an image exists and returns its loadable path.
    ///
    /// Fails with [`BboxError::ImageNotFound`] when it does not.
    fn load_image(&self, path: &str) -> Result<PathBuf, BboxError>;
}

/// Filesystem-backed service.
///
/// Pre-selected paths stand in for dialog choices: with no open (or save)
/// path configured, the corresponding operation reports a cancel. Relative
/// image paths are resolved against `image_dir` when one is set.
#[derive(Clone, Debug, Default)]
pub struct FsFileService {
    open_path: Option<PathBuf>,
    save_path: Option<PathBuf>,
    image_dir: Option<PathBuf>,
}

impl FsFileService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_open_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.open_path = Some(path.into());
        self
    }

    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(path.into());
        self
    }

    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }
}

impl FileService for FsFileService {
    fn open_file(&mut self) -> Result<DialogOutcome<OpenedFile>, BboxError> {
        let Some(path) = self.open_path.clone() else {
            log::debug!("open canceled: no file selected");
            return Ok(DialogOutcome::Canceled);
        };

        let contents = fs::read_to_string(&path).map_err(|e| {
            log::error!("failed to read {}: {}", path.display(), e);
            BboxError::Io(e)
        })?;
        log::info!("read {} ({} bytes)", path.display(), contents.len());
        Ok(DialogOutcome::Completed(OpenedFile { path, contents }))
    }

    fn save_file(&mut self, contents: &str) -> Result<DialogOutcome<PathBuf>, BboxError> {
        let Some(path) = self.save_path.clone() else {
            log::debug!("save canceled: no destination selected");
            return Ok(DialogOutcome::Canceled);
        };

        fs::write(&path, contents).map_err(|e| {
            log::error!("failed to write {}: {}", path.display(), e);
            BboxError::Io(e)
        })?;
        log::info!("wrote {} ({} bytes)", path.display(), contents.len());
        Ok(DialogOutcome::Completed(path))
    }

    fn load_image(&self, path: &str) -> Result<PathBuf, BboxError> {
        let candidate = Path::new(path);
        let resolved = match &self.image_dir {
            Some(dir) if candidate.is_relative() => dir.join(candidate),
            _ => candidate.to_path_buf(),
        };

        if resolved.exists() {
            Ok(resolved)
        } else {
            log::warn!("image not found at path: {}", resolved.display());
            Err(BboxError::ImageNotFound(resolved))
        }
    }
}

/// Opens a dataset file of either layout.
///
/// Returns `Ok(None)` when the user cancels.
pub fn load_dataset<S: FileService + ?Sized>(
    service: &mut S,
    palette: &LabelPalette,
) -> Result<Option<DecodedDataset>, BboxError> {
    let opened = match service.open_file()? {
        DialogOutcome::Completed(opened) => opened,
        DialogOutcome::Canceled => return Ok(None),
    };

    let decoded = decode_dataset_with_palette(&opened.contents, palette).map_err(|e| match e {
        BboxError::JsonParse { source, .. } => BboxError::JsonParse {
            path: opened.path.clone(),
            source,
        },
        BboxError::InvalidStructure {
            raw_error,
            internal_error,
            ..
        } => BboxError::InvalidStructure {
            path: opened.path.clone(),
            raw_error,
            internal_error,
        },
        other => other,
    })?;
    Ok(Some(decoded))
}

/// Saves `dataset` in the raw format.
///
/// Returns the chosen path, or `Ok(None)` when the user cancels.
pub fn save_dataset<S: FileService + ?Sized>(
    service: &mut S,
    dataset: &Dataset,
    opts: &RawExportOptions,
) -> Result<Option<PathBuf>, BboxError> {
    let raw = internal_to_raw_with(dataset, opts);
    let text = format_for_export(&raw).map_err(|source| BboxError::JsonWrite {
        path: PathBuf::from("<export>"),
        source,
    })?;

    Ok(service.save_file(&text)?.completed())
}

/// Returns a `file://` URL for a found image, or the original reference.
///
/// Relative paths are made absolute first so no directory reads as a URL host.
pub fn resolve_image_url<S: FileService + ?Sized>(service: &S, path: &str) -> String {
    match service.load_image(path) {
        Ok(found) => {
            let absolute = std::path::absolute(&found).unwrap_or(found);
            format!("file://{}", absolute.display())
        }
        Err(_) => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::DatasetShape;
    use crate::model::demo_dataset;

    #[test]
    fn test_unconfigured_service_cancels() {
        let mut service = FsFileService::new();
        let palette = LabelPalette::builtin();

        assert!(load_dataset(&mut service, &palette).unwrap().is_none());
        assert!(save_dataset(&mut service, &demo_dataset(), &RawExportOptions::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut service = FsFileService::new()
            .with_save_path(&path)
            .with_open_path(&path);

        let saved = save_dataset(&mut service, &demo_dataset(), &RawExportOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(saved, path);

        let decoded = load_dataset(&mut service, &LabelPalette::builtin())
            .unwrap()
            .unwrap();
        assert_eq!(decoded.shape, DatasetShape::Raw);
        assert_eq!(decoded.dataset.box_count(), 4);
    }

    #[test]
    fn test_load_reports_path_on_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{oops").unwrap();

        let mut service = FsFileService::new().with_open_path(&path);
        let err = load_dataset(&mut service, &LabelPalette::builtin()).unwrap_err();
        match err {
            BboxError::JsonParse { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_relative_image_url_is_absolute() {
        let service = FsFileService::new();
        let url = resolve_image_url(&service, "src/service/mod.rs");

        let expected = std::path::absolute("src/service/mod.rs").unwrap();
        assert_eq!(url, format!("file://{}", expected.display()));
        assert!(!url.starts_with("file://src"));
    }

    #[test]
    fn test_load_image_and_url() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("img.png"), b"png").unwrap();
        let service = FsFileService::new().with_image_dir(dir.path());

        let found = service.load_image("img.png").unwrap();
        assert_eq!(found, dir.path().join("img.png"));
        assert!(resolve_image_url(&service, "img.png").starts_with("file://"));

        let err = service.load_image("missing.png").unwrap_err();
        assert!(matches!(err, BboxError::ImageNotFound(_)));
        assert_eq!(resolve_image_url(&service, "missing.png"), "missing.png");
    }
}
