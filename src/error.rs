use miette::Diagnostic;
use thiserror::Error;

/// Main error type for pxl operations
#[derive(Error, Diagnostic, Debug)]
pub enum PxlError {
    #[error("IO error: {0}")]
    #[diagnostic(code(pxl::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(pxl::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Image error with {path}: {message}")]
    #[diagnostic(code(pxl::image))]
    Image {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(pxl::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Serialization error: {message}")]
    #[diagnostic(code(pxl::serialize))]
    Serialize { message: String },

    #[error("Compile error: {message}")]
    #[diagnostic(code(pxl::compile))]
    Compile {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, PxlError>;
