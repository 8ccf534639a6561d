use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: missing column '{column}'")]
    MissingColumn { row: u64, column: &'static str },

    #[error("Row {row}: invalid value '{value}' for column '{column}': {reason}")]
    InvalidField {
        row: u64,
        column: &'static str,
        value: String,
        reason: String,
    },

    #[error("Row {row}: media {media_id} already has a {rendition} rendition")]
    DuplicateRendition {
        row: u64,
        media_id: i64,
        rendition: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
