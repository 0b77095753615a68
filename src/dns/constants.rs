/// DNS Response Code constants from RFC 1035 and subsequent RFCs
pub struct DNSRcode;

impl DNSRcode {
    pub const NOERROR: u8 = 0; // No error
    pub const FORMERR: u8 = 1; // Format error
    pub const SERVFAIL: u8 = 2; // Server failure
    pub const NXDOMAIN: u8 = 3; // Name error
    pub const NOTIMP: u8 = 4; // Not implemented
    pub const REFUSED: u8 = 5; // Query refused
    pub const YXDOMAIN: u8 = 6; // Name exists when it should not
    pub const YXRRSET: u8 = 7; // RR Set exists when it should not
    pub const NXRRSET: u8 = 8; // RR Set that should exist does not
    pub const NOTAUTH: u8 = 9; // Not authorized
    pub const NOTZONE: u8 = 10; // Name not contained in zone
}

/// Value of the QR bit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum QRType {
    #[default]
    Query,
    Response,
}

impl From<bool> for QRType {
    fn from(qr: bool) -> Self {
        if qr { QRType::Response } else { QRType::Query }
    }
}

/// Offset of the first byte after the fixed header. Compression pointers
/// never target anything below it.
pub const HEADER_SIZE: usize = 12;

/// Longest presentation-form name the decoder will produce.
pub const MAX_NAME_LENGTH: usize = 255;

pub const MAX_LABEL_LENGTH: usize = 63;

/// Compression pointers carry 14 bits of offset.
pub const MAX_POINTER_TARGET: usize = 0x3FFF;
