use thiserror::Error;

#[derive(Error, Debug)]
pub enum FractalisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid screen dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot parse extended-precision number: {0}")]
    ParseScalar(String),

    #[error("Display error: {0}")]
    Display(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Compute worker panicked")]
    WorkerPanicked,
}

pub type Result<T> = std::result::Result<T, FractalisError>;
