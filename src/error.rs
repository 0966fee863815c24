use std::path::PathBuf;

pub type SlideshowResult<T> = Result<T, SlideshowError>;

#[derive(thiserror::Error, Debug)]
pub enum SlideshowError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("no usable images found in '{}'", folder.display())]
    NoImages { folder: PathBuf },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlideshowError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn no_images(folder: impl Into<PathBuf>) -> Self {
        Self::NoImages {
            folder: folder.into(),
        }
    }
}
