//! Prediction run coordination: input collection and output placement.

use crate::constants::predict;
use crate::error::{Error, Result};
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Options for a prediction run.
#[derive(Debug, Clone, Default)]
pub struct PredictOptions {
    /// Output directory (None = same as each input).
    pub output_dir: Option<PathBuf>,
    /// Overwrite existing result artifacts.
    pub force: bool,
    /// Write a JSON report next to each annotated image.
    pub save_json: bool,
    /// Print detections to stdout as JSON.
    pub debug: bool,
    /// Show progress bars.
    pub progress_enabled: bool,
}

/// Result of checking whether a file should be predicted.
#[derive(Debug, PartialEq, Eq)]
pub enum ProcessCheck {
    /// File should be processed.
    Process,
    /// Skip - result artifact already exists and overwrite was not forced.
    SkipExists,
    /// Skip - file is itself a previous prediction output.
    SkipResultArtifact,
}

/// Determine the output directory for a file.
pub fn output_dir_for(input: &Path, explicit_output_dir: Option<&Path>) -> PathBuf {
    explicit_output_dir.map_or_else(
        || {
            input
                .parent()
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        },
        Path::to_path_buf,
    )
}

/// File stem, lossy for non-UTF-8 names.
fn file_stem_lossy(input: &Path) -> Cow<'_, str> {
    input
        .file_stem()
        .map_or_else(|| Cow::Borrowed("output"), OsStr::to_string_lossy)
}

/// Annotated image path for an input.
pub fn annotated_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = file_stem_lossy(input);
    output_dir.join(format!(
        "{stem}{}.{}",
        predict::RESULT_SUFFIX,
        predict::OUTPUT_EXT
    ))
}

/// JSON report path for an input.
pub fn report_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = file_stem_lossy(input);
    output_dir.join(format!("{stem}{}.json", predict::RESULT_SUFFIX))
}

/// Check whether a file should be predicted.
pub fn should_process(input: &Path, output_dir: &Path, force: bool) -> ProcessCheck {
    if file_stem_lossy(input).contains(predict::RESULT_MARKER) {
        return ProcessCheck::SkipResultArtifact;
    }

    if !force && annotated_path_for(input, output_dir).exists() {
        return ProcessCheck::SkipExists;
    }

    ProcessCheck::Process
}

/// Check if a file's content sniffs as an image.
///
/// Goes by magic bytes rather than extension so renamed or extension-less
/// images still count and mislabeled files do not.
fn is_image_file(path: &Path) -> bool {
    image::ImageReader::open(path)
        .and_then(image::ImageReader::with_guessed_format)
        .is_ok_and(|reader| reader.format().is_some())
}

/// Check if a file carries a recognized image extension.
fn has_image_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        predict::IMAGE_EXTENSIONS
            .iter()
            .any(|supported| ext.eq_ignore_ascii_case(OsStr::new(supported)))
    })
}

/// Collect input images from paths.
///
/// Directories are scanned one level deep; non-image files inside them are
/// ignored. A file passed explicitly must sniff as an image, with a
/// distinct error when its extension claims one.
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_image_file(path) {
                files.push(path.clone());
            } else if has_image_extension(path) {
                return Err(Error::BrokenImage { path: path.clone() });
            } else {
                return Err(Error::NotAnImage { path: path.clone() });
            }
        } else if path.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
                .filter_map(std::result::Result::ok)
                .map(|entry| entry.path())
                .filter(|p| p.is_file() && is_image_file(p))
                .collect();
            entries.sort();
            debug!("{} image(s) found in {}", entries.len(), path.display());
            files.extend(entries);
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    if files.is_empty() {
        return Err(Error::NoValidImages);
    }

    Ok(files)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_dir_for_with_explicit() {
        let input = Path::new("/data/annas.jpg");
        let output = output_dir_for(input, Some(Path::new("/results")));
        assert_eq!(output, PathBuf::from("/results"));
    }

    #[test]
    fn test_output_dir_for_without_explicit() {
        let input = Path::new("/data/annas.jpg");
        let output = output_dir_for(input, None);
        assert_eq!(output, PathBuf::from("/data"));
    }

    #[test]
    fn test_annotated_path_for() {
        let path = annotated_path_for(Path::new("annas.jpg"), Path::new("/output"));
        assert_eq!(path, PathBuf::from("/output/annas_result.jpg"));
    }

    #[test]
    fn test_report_path_for() {
        let path = report_path_for(Path::new("annas.jpg"), Path::new("/output"));
        assert_eq!(path, PathBuf::from("/output/annas_result.json"));
    }

    #[test]
    fn test_should_process_skips_prior_results() {
        let check = should_process(Path::new("annas_result.jpg"), Path::new("/output"), true);
        assert_eq!(check, ProcessCheck::SkipResultArtifact);
    }

    #[test]
    fn test_should_process_skips_existing_output() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("annas_result.jpg"), b"x").unwrap();

        let check = should_process(Path::new("annas.jpg"), tmp.path(), false);
        assert_eq!(check, ProcessCheck::SkipExists);

        let forced = should_process(Path::new("annas.jpg"), tmp.path(), true);
        assert_eq!(forced, ProcessCheck::Process);
    }

    fn write_image(path: &Path) {
        image::ImageBuffer::from_pixel(2, 2, image::Rgb([10u8, 20, 30]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_has_image_extension() {
        assert!(has_image_extension(Path::new("annas.jpg")));
        assert!(has_image_extension(Path::new("annas.PNG")));
        assert!(has_image_extension(Path::new("annas.webp")));
        assert!(!has_image_extension(Path::new("annas.txt")));
        assert!(!has_image_extension(Path::new("annas")));
    }

    #[test]
    fn test_collect_rejects_non_image_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, b"just text").unwrap();

        let result = collect_input_files(&[path]);
        assert!(matches!(result, Err(Error::NotAnImage { .. })));
    }

    #[test]
    fn test_collect_rejects_broken_image() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.jpg");
        std::fs::write(&path, b"not actually a jpeg").unwrap();

        let result = collect_input_files(&[path]);
        assert!(matches!(result, Err(Error::BrokenImage { .. })));
    }

    #[test]
    fn test_collect_scans_directory_one_level() {
        let tmp = TempDir::new().unwrap();
        write_image(&tmp.path().join("a.jpg"));
        write_image(&tmp.path().join("b.png"));
        std::fs::write(tmp.path().join("notes.txt"), b"just text").unwrap();

        let nested = tmp.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        write_image(&nested.join("c.jpg"));

        let files = collect_input_files(&[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.parent() == Some(tmp.path())));
    }

    #[test]
    fn test_collect_empty_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = collect_input_files(&[tmp.path().to_path_buf()]);
        assert!(matches!(result, Err(Error::NoValidImages)));
    }
}
