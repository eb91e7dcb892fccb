//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "birdspot";

/// Environment variable names honored for credentials and paths.
pub mod env {
    /// Photo API key.
    pub const FLICKR_API_KEY: &str = "FLICKR_API_KEY";
    /// Project root for model artifacts and training data.
    pub const PROJECT_DIR: &str = "PROJECT_DIR";
    /// S3 bucket receiving annotated serverless outputs.
    pub const AWS_BUCKET: &str = "AWS_BUCKET";
    /// CDN domain that fronts the output bucket.
    pub const CLOUDFRONT_URL: &str = "CLOUDFRONT_URL";
}

/// Photo API request constants.
pub mod flickr {
    /// REST endpoint for all API methods.
    pub const REST_URL: &str = "https://api.flickr.com/services/rest/";

    /// Search method name.
    pub const METHOD_SEARCH: &str = "flickr.photos.search";

    /// Photos per result page.
    pub const PAGE_SIZE: u32 = 100;

    /// Public photos only.
    pub const PRIVACY_PUBLIC: u8 = 1;

    /// Photos only (no screenshots or other media).
    pub const CONTENT_TYPE_PHOTOS: u8 = 0;

    /// Relevance sort order.
    pub const SORT_RELEVANCE: &str = "relevance";

    /// Every license except All Rights Reserved (id 0).
    pub const LICENSES: &str = "1,2,3,4,5,6,7,8,9,10";

    /// Extra attributes requested per photo.
    pub const EXTRAS: &str = "url_o";
}

/// Dataset scraping defaults.
pub mod scrape {
    /// Images fetched per species.
    pub const DEFAULT_PER_SPECIES: u32 = 100;

    /// Concurrent downloads in flight.
    pub const DEFAULT_CONCURRENT_DOWNLOADS: usize = 16;

    /// Fetch rounds: one initial pass plus re-fetches for defective species.
    pub const DEFAULT_RETRY_ROUNDS: usize = 3;

    /// Dataset directory relative to the project root.
    pub const DEFAULT_DATASET_DIR: &str = "data";

    /// Downloaded image file extension.
    pub const IMAGE_EXT: &str = "jpg";

    /// HTTP connect timeout in seconds.
    pub const CONNECT_TIMEOUT_SECS: u64 = 30;

    /// HTTP request timeout in seconds for a single download.
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;
}

/// Species checklist defaults.
pub mod checklist {
    /// California Bird Records Committee checklist page.
    pub const DEFAULT_URL: &str = "https://californiabirds.org/checklist.asp";

    /// Default output CSV filename.
    pub const DEFAULT_OUTPUT: &str = "california_birds.csv";
}

/// External trainer invocation defaults.
pub mod trainer {
    /// Trainer CLI program name.
    pub const DEFAULT_PROGRAM: &str = "yolo";

    /// Dataset description file relative to the project root.
    pub const DEFAULT_DATA: &str = "data.yaml";

    /// Training epochs.
    pub const DEFAULT_EPOCHS: u32 = 125;

    /// Training batch size.
    pub const DEFAULT_BATCH: u32 = 80;

    /// GPU device indices used for training.
    pub const DEFAULT_DEVICES: &[u32] = &[0, 1];

    /// Checkpoint save interval in epochs.
    pub const DEFAULT_SAVE_PERIOD: u32 = 5;

    /// Pretrained base weights to fine-tune from.
    pub const DEFAULT_BASE_WEIGHTS: &str = "yolov8m.pt";

    /// Trained weights path relative to the project root.
    pub const TRAINED_WEIGHTS: &str = "runs/train/weights/best.pt";
}

/// Detection model defaults.
pub mod model {
    /// Square input size expected by exported detection models.
    pub const DEFAULT_INPUT_SIZE: u32 = 640;

    /// Default minimum confidence threshold for detections.
    pub const DEFAULT_CONFIDENCE: f32 = 0.25;

    /// Default IoU threshold for non-maximum suppression.
    pub const DEFAULT_IOU: f32 = 0.45;

    /// Maximum detections kept per image.
    pub const DEFAULT_MAX_DETECTIONS: usize = 300;

    /// Gray fill value for letterbox padding.
    pub const LETTERBOX_FILL: u8 = 114;

    /// Input tensor name used by exported detection models.
    pub const INPUT_NAME: &str = "images";

    /// Output tensor name used by exported detection models.
    pub const OUTPUT_NAME: &str = "output0";

    /// Exported model path relative to the project root.
    pub const DEFAULT_PATH: &str = "runs/train/weights/best.onnx";

    /// Recognized model export extensions.
    pub const EXPORT_EXTENSIONS: &[&str] = &[
        "pt",
        "torchscript",
        "onnx",
        "engine",
        "mlpackage",
        "pb",
        "tflite",
    ];

    /// The only export format loadable for native inference.
    pub const NATIVE_EXTENSION: &str = "onnx";
}

/// Confidence value bounds.
pub mod confidence {
    /// Minimum valid confidence value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid confidence value.
    pub const MAX: f32 = 1.0;
    /// Decimal places for confidence formatting.
    pub const DECIMAL_PLACES: i32 = 5;
}

/// Prediction output constants.
pub mod predict {
    /// Suffix appended to annotated output stems.
    pub const RESULT_SUFFIX: &str = "_result";

    /// Stems containing this marker are prior outputs and are skipped.
    pub const RESULT_MARKER: &str = "result";

    /// Annotated image extension.
    pub const OUTPUT_EXT: &str = "jpg";

    /// Extensions treated as images when collecting directory inputs.
    pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp", "tif", "tiff"];
}

/// Serverless handler constants.
pub mod serve {
    /// Model file packed next to the serverless binary.
    pub const DEFAULT_MODEL: &str = "best.onnx";

    /// Error message returned when the job has no input URL.
    pub const ERROR_URL_MISSING: &str = "URL does not exist.";

    /// Object extension for uploaded annotated images.
    pub const OUTPUT_EXT: &str = "png";

    /// Content type for uploaded annotated images.
    pub const OUTPUT_CONTENT_TYPE: &str = "image/png";
}

/// Default scraping targets: common Californian species, used when no
/// checklist or explicit species are provided.
pub const DEFAULT_TARGET_SPECIES: &[&str] = &[
    "Mallard",
    "American Wigeon",
    "Northern Pintail",
    "Northern Shoveler",
    "Cinnamon Teal",
    "Ring-necked duck",
    "Lesser Scaup",
    "Ruddy Duck",
    "Pied-billed Grebe",
    "American White Pelican",
    "Double-crested Cormorant",
    "Black-crowned Night-Heron",
    "Green Heron",
    "Snowy Egret",
    "Great Egret",
    "Great Blue Heron",
    "Turkey Vulture",
    "Osprey",
    "Cooper\u{2019}s Hawk",
    "Red-shouldered Hawk",
    "Red-tailed Hawk",
    "American Kestrel",
    "American Coot",
    "Great Horned Owl",
    "Anna\u{2019}s Hummingbird",
    "Allen\u{2019}s Hummingbird",
    "Belted Kingfisher",
    "Northern Flicker",
    "Downy Woodpecker",
    "Black Phoebe",
    "Western Scrub-Jay",
];
