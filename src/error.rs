use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    #[error("Malformed packet")]
    MalformedPacket,

    #[error("Not enough size for {what}: need {need} bytes, have {have} bytes")]
    BufferTooSmall {
        what: &'static str,
        need: usize,
        have: usize,
    },

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid resource data: {0}")]
    InvalidResourceData(String),

    #[error("Tagged option too long: {0} bytes")]
    OptionTooLong(usize),

    #[error("Tagged options are not carried by this frame type")]
    OptionsNotSupported,

    #[error("Invalid extension header: {0}")]
    InvalidExtensionHeader(String),

    #[error("Record section is full")]
    SectionFull,

    #[error("Message too large: {0}")]
    MessageTooLarge(String),

    #[error("Invalid field value: {0}")]
    InvalidField(String),
}

impl From<std::io::Error> for PacketError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => PacketError::MalformedPacket,
            _ => PacketError::InvalidField(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, PacketError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid output format: {0}")]
    InvalidOutputFormat(String),

    #[error("Invalid protocol: {0}")]
    InvalidProtocol(String),

    #[error("Invalid max input size: {0}")]
    InvalidMaxInput(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}
