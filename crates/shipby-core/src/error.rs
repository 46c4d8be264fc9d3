use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShipByError {
    #[error("order has no ship-by date; cannot apply the staging buffer")]
    MissingShipBy,

    #[error("ship-by date overflowed while adding the staging buffer")]
    DateOverflow,

    #[error("unknown time zone '{0}'")]
    UnknownTimeZone(String),

    #[error("config not found at {0}")]
    ConfigNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ShipByError>;
