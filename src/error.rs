use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaletteError {
    /// No pixel surface could be obtained for the image.
    #[error("Rendering unavailable: {0}")]
    RenderingUnavailable(String),
    #[error("Invalid hex color '{0}': expected 6 hex digits")]
    InvalidHex(String),
}

impl From<image::ImageError> for PaletteError {
    fn from(err: image::ImageError) -> Self {
        PaletteError::RenderingUnavailable(format!("unable to decode image: {err}"))
    }
}
