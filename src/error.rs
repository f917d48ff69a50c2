/// Errors raised while configuring or driving the wheel
#[derive(Debug, thiserror::Error)]
pub enum WheelError {
    #[error("the wheel needs at least one sector")]
    NoSectors,
    #[error("invalid sector `{0}`, expected LABEL:#RRGGBB:ICON")]
    InvalidSector(String),
    #[error("invalid color `{0}`, expected #RRGGBB")]
    InvalidColor(String),
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WheelError>;
