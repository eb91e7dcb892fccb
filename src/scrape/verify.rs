//! Dataset integrity checks.
//!
//! A downloaded image counts as valid when the file is non-empty and its
//! contents decode as an image. Anything else is a defect the scrape loop
//! can repair by re-fetching the species.

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single problem found while scanning a species directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Defect {
    /// The species directory contains no image files at all.
    EmptyDir(PathBuf),
    /// A zero-length file, usually from an aborted download.
    EmptyFile(PathBuf),
    /// A file whose contents do not decode as an image.
    NotAnImage(PathBuf),
}

impl Defect {
    /// The path the defect refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::EmptyDir(p) | Self::EmptyFile(p) | Self::NotAnImage(p) => p,
        }
    }

    /// True when the defect names a removable file (not a directory).
    pub fn is_file(&self) -> bool {
        !matches!(self, Self::EmptyDir(_))
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDir(p) => write!(f, "{}: no images", p.display()),
            Self::EmptyFile(p) => write!(f, "{}: empty file", p.display()),
            Self::NotAnImage(p) => write!(f, "{}: not a valid image", p.display()),
        }
    }
}

/// Verification outcome for one species directory.
#[derive(Debug)]
pub struct SpeciesReport {
    /// Species name, taken from the directory name.
    pub species: String,
    /// Number of files that decoded successfully.
    pub valid_images: usize,
    /// Problems found under this directory.
    pub defects: Vec<Defect>,
}

impl SpeciesReport {
    /// True when every file under the directory is a decodable image.
    pub fn is_clean(&self) -> bool {
        self.defects.is_empty()
    }
}

/// Verification outcome for a whole dataset tree.
#[derive(Debug, Default)]
pub struct DatasetReport {
    /// Per-species reports, ordered by species name.
    pub species: Vec<SpeciesReport>,
}

impl DatasetReport {
    /// Names of species with at least one defect.
    pub fn defective_species(&self) -> Vec<String> {
        self.species
            .iter()
            .filter(|r| !r.is_clean())
            .map(|r| r.species.clone())
            .collect()
    }

    /// Total number of defects across all species.
    pub fn total_defects(&self) -> usize {
        self.species.iter().map(|r| r.defects.len()).sum()
    }

    /// Total number of valid images across all species.
    pub fn total_valid(&self) -> usize {
        self.species.iter().map(|r| r.valid_images).sum()
    }

    /// True when no species has a defect.
    pub fn is_clean(&self) -> bool {
        self.species.iter().all(SpeciesReport::is_clean)
    }
}

/// Check one image file: non-empty and decodable.
///
/// The format is sniffed from the content, not the extension; downloads
/// are always named `.jpg` but the source may have served another format.
fn check_image(path: &Path) -> Result<Option<Defect>> {
    let metadata = std::fs::metadata(path).map_err(Error::Io)?;
    if metadata.len() == 0 {
        return Ok(Some(Defect::EmptyFile(path.to_path_buf())));
    }

    let decoded = image::ImageReader::open(path)
        .map_err(Error::Io)?
        .with_guessed_format()
        .map_err(Error::Io)?
        .decode();

    match decoded {
        Ok(_) => Ok(None),
        Err(e) => {
            debug!("decode failed for {}: {e}", path.display());
            Ok(Some(Defect::NotAnImage(path.to_path_buf())))
        }
    }
}

/// Scan one species directory for defects.
pub fn scan_species_dir(dir: &Path) -> Result<SpeciesReport> {
    let species = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(Error::Io)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    let mut report = SpeciesReport {
        species,
        valid_images: 0,
        defects: Vec::new(),
    };

    if files.is_empty() {
        report.defects.push(Defect::EmptyDir(dir.to_path_buf()));
        return Ok(report);
    }

    for file in files {
        match check_image(&file)? {
            Some(defect) => report.defects.push(defect),
            None => report.valid_images += 1,
        }
    }

    Ok(report)
}

/// Scan a dataset root, one subdirectory per species.
pub fn scan_dataset(root: &Path) -> Result<DatasetReport> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)
        .map_err(Error::Io)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();

    let mut report = DatasetReport::default();
    for dir in dirs {
        report.species.push(scan_species_dir(&dir)?);
    }

    Ok(report)
}
