//! Error types for birdspot.

/// Result type alias for birdspot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for birdspot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Required environment variable is not set.
    #[error("environment variable '{name}' is not set ({purpose})")]
    MissingEnv {
        /// Name of the missing variable.
        name: String,
        /// What the variable is used for.
        purpose: String,
    },

    /// Model file does not exist.
    #[error("model file does not exist: {path} (train the model before running predictions)")]
    ModelFileNotFound {
        /// Path to the missing model file.
        path: std::path::PathBuf,
    },

    /// Model file has an unrecognized extension.
    #[error("invalid model file format: {path} (expected one of the supported export formats)")]
    InvalidModelFormat {
        /// Path to the rejected model file.
        path: std::path::PathBuf,
    },

    /// Model format is recognized but not loadable for native inference.
    #[error("model format '{format}' cannot be loaded directly, export the weights to ONNX first")]
    UnsupportedModelFormat {
        /// The non-loadable format extension.
        format: String,
    },

    /// Labels file does not exist.
    #[error("labels file does not exist: {path}")]
    LabelsFileNotFound {
        /// Path to the missing labels file.
        path: std::path::PathBuf,
    },

    /// No valid image files found.
    #[error("no valid image files found in the provided paths")]
    NoValidImages,

    /// File is not an image.
    #[error("input file '{path}' is not an image")]
    NotAnImage {
        /// Path to the rejected file.
        path: std::path::PathBuf,
    },

    /// File carries an image extension but its content is not an image.
    #[error("input file '{path}' is not a valid image (maybe the file is broken?)")]
    BrokenImage {
        /// Path to the rejected file.
        path: std::path::PathBuf,
    },

    /// Failed to decode an image file.
    #[error("failed to decode image '{path}'")]
    ImageDecode {
        /// Path to the image file.
        path: std::path::PathBuf,
        /// Underlying decode error.
        #[source]
        source: image::ImageError,
    },

    /// Failed to write an image file.
    #[error("failed to write image '{path}'")]
    ImageWrite {
        /// Path to the image file.
        path: std::path::PathBuf,
        /// Underlying encode error.
        #[source]
        source: image::ImageError,
    },

    /// Failed to encode an image in memory.
    #[error("failed to encode image")]
    ImageEncode {
        /// Underlying encode error.
        #[source]
        source: image::ImageError,
    },

    /// Failed to initialize ONNX runtime.
    #[error("failed to initialize ONNX runtime: {reason}")]
    RuntimeInitialization {
        /// Description of the initialization failure.
        reason: String,
    },

    /// Failed to build detector.
    #[error("failed to build detector: {reason}")]
    DetectorBuild {
        /// Description of the build failure.
        reason: String,
    },

    /// Inference failed.
    #[error("inference failed: {reason}")]
    Inference {
        /// Description of the inference failure.
        reason: String,
    },

    /// Photo API reported a failure status.
    #[error("photo API error {code}: {message}")]
    FlickrApi {
        /// Upstream error code.
        code: i64,
        /// Upstream error message.
        message: String,
    },

    /// HTTP request failed.
    #[error("request to '{url}' failed")]
    HttpRequest {
        /// URL that failed.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// Download failed.
    #[error("failed to download from '{url}'")]
    DownloadFailed {
        /// URL that failed.
        url: String,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Checklist page contained no species entries.
    #[error("no species entries found at '{url}' (page markup may have changed)")]
    ChecklistEmpty {
        /// URL of the checklist page.
        url: String,
    },

    /// Failed to read species list file.
    #[error("failed to read species list file '{path}'")]
    SpeciesListRead {
        /// Path to the species list file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to write species list file.
    #[error("failed to write species list file '{path}'")]
    SpeciesListWrite {
        /// Path to the species list file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: csv::Error,
    },

    /// Species list file contained no species.
    #[error("species list file '{path}' contains no species")]
    SpeciesListEmpty {
        /// Path to the species list file.
        path: std::path::PathBuf,
    },

    /// Dataset verification found defects after all retry rounds.
    #[error("dataset incomplete: {defects} species still defective after {rounds} fetch rounds")]
    DatasetIncomplete {
        /// Number of species still defective.
        defects: usize,
        /// Number of fetch rounds performed.
        rounds: usize,
    },

    /// Standalone dataset verification found defects.
    #[error("found {defects} defect(s) across {species} species")]
    DatasetDefective {
        /// Total defects found.
        defects: usize,
        /// Number of species with at least one defect.
        species: usize,
    },

    /// Failed to launch the external trainer program.
    #[error("failed to launch '{program}' (is it installed and on PATH?)")]
    TrainerSpawn {
        /// The trainer program name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// External trainer program exited with a failure status.
    #[error("'{program}' exited with {status}")]
    TrainerFailed {
        /// The trainer program name.
        program: String,
        /// Exit status of the process.
        status: std::process::ExitStatus,
    },

    /// Exported model artifact was not created.
    #[error("expected exported model at '{path}' but it was not created")]
    ExportMissing {
        /// Path where the artifact was expected.
        path: std::path::PathBuf,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreateFailed {
        /// Path to the output directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write JSON output file.
    #[error("failed to write JSON output file '{path}'")]
    JsonWrite {
        /// Path to the JSON file.
        path: std::path::PathBuf,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to upload an object to storage.
    #[error("failed to upload '{key}' to bucket '{bucket}'")]
    UploadFailed {
        /// Destination bucket.
        bucket: String,
        /// Object key.
        key: String,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Run was interrupted by the user.
    #[error("interrupted")]
    Interrupted,

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}
