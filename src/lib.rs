pub mod common;
pub mod config;
pub mod cursor;
pub mod dns;
pub mod error;
pub mod ieee80211;
pub mod inspect;
pub mod ipv6;
pub mod payload;

pub use dns::DNSPacket;
pub use error::{ConfigError, PacketError, Result};
pub use ieee80211::Dot11Frame;
pub use ipv6::Ipv6Packet;
pub use payload::Payload;
