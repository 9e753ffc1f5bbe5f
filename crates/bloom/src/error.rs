use thiserror::Error;

/// Caller defects in how buttons were set up. These are never recovered from.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("button {index} shows text but has no text lines")]
    MissingText { index: usize },
    #[error("button {index} shows an icon but has no icon")]
    MissingIcon { index: usize },
    #[error("a button set needs at least one button")]
    EmptyButtonSet,
    #[error("invalid color '{0}', expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("surface error: {0}")]
    Surface(String),
}
