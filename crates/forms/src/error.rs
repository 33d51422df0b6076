#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("'{element}' does not fit on the page (x={x}, y={y}, w={w}, h={h} mm)")]
    OutOfBounds {
        element: String,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
    #[error("failed to serialise PDF: {0}")]
    Serialize(String),
    #[error(
        "failed to write referral form (path: {path}): {source}",
        path = path.display()
    )]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type FormResult<T> = std::result::Result<T, FormError>;
