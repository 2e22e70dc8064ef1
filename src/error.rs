// Error type for the scratch panel.
// Every variant states *where* things went wrong.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No container with this id exists in the document.
    #[error("mount point not found: {0}")]
    MountNotFound(String),

    /// The `foreground` option is empty.
    #[error("a foreground image must be specified")]
    MissingForeground,

    /// Decoding or reading an image failed.
    #[error("failed to load image '{reference}': {source}")]
    ImageLoad {
        reference: String,
        #[source]
        source: image::ImageError,
    },

    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// A value of the wrong type was supplied for an option.
    #[error("option '{key}' expects {expected}")]
    OptionType { key: &'static str, expected: &'static str },

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    // Used by the windowed host.
    #[error("window init error: {0}")]
    WindowInit(String),
    #[error("window update error: {0}")]
    WindowUpdate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
