//! Inner payloads and dispatch by IP protocol number.

use tracing::debug;

use crate::error::{PacketError, Result};
use crate::ipv6::Ipv6Packet;

/// IP protocol numbers (IANA "Assigned Internet Protocol Numbers").
pub struct IpProtocol;

impl IpProtocol {
    pub const HOP_BY_HOP: u8 = 0;
    pub const ICMP: u8 = 1;
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
    pub const IPV6: u8 = 41;
    pub const ROUTING: u8 = 43;
    pub const FRAGMENT: u8 = 44;
    pub const ESP: u8 = 50;
    pub const AUTHENTICATION: u8 = 51;
    pub const ICMPV6: u8 = 58;
    pub const NO_NEXT_HEADER: u8 = 59;
    pub const DESTINATION_OPTIONS: u8 = 60;
    pub const MOBILITY: u8 = 135;
}

/// Whatever follows a decoded header. Protocols without a decoder here are
/// kept as raw bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    Raw(Vec<u8>),
    Ipv6(Box<Ipv6Packet>),
}

impl Payload {
    /// Protocol number to put in the enclosing header's next-header field,
    /// when this payload has one.
    pub fn protocol(&self) -> Option<u8> {
        match self {
            Payload::Raw(_) => None,
            Payload::Ipv6(_) => Some(IpProtocol::IPV6),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Payload::Raw(bytes) => bytes.len(),
            Payload::Ipv6(packet) => packet.size(),
        }
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        match self {
            Payload::Raw(bytes) => Ok(bytes.clone()),
            Payload::Ipv6(packet) => packet.serialize(),
        }
    }

    /// Raw payloads have nothing to compare and always match.
    pub fn matches_response(&self, response: &[u8]) -> bool {
        match self {
            Payload::Raw(_) => true,
            Payload::Ipv6(packet) => packet.matches_response(response),
        }
    }
}

/// Most IPv6 packets the decoder will unwrap below the outermost one.
pub const MAX_NESTING_DEPTH: usize = 16;

/// Decodes `bytes` as the payload announced by `protocol`.
pub fn from_ip_protocol(protocol: u8, bytes: &[u8]) -> Result<Payload> {
    dispatch(protocol, bytes, 0)
}

/// `depth` is the nesting level of the packet carrying `bytes`, 0 for the
/// outermost one.
pub(crate) fn dispatch(protocol: u8, bytes: &[u8], depth: usize) -> Result<Payload> {
    match protocol {
        IpProtocol::IPV6 => {
            if depth >= MAX_NESTING_DEPTH {
                debug!("IPv6 encapsulation deeper than {} levels", MAX_NESTING_DEPTH);
                return Err(PacketError::MalformedPacket);
            }
            debug!("Dispatching {} payload bytes to IPv6", bytes.len());
            Ok(Payload::Ipv6(Box::new(Ipv6Packet::parse_nested(
                bytes,
                depth + 1,
            )?)))
        }
        other => {
            debug!("No decoder for protocol {}, keeping {} raw bytes", other, bytes.len());
            Ok(Payload::Raw(bytes.to_vec()))
        }
    }
}
