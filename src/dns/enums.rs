#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DNSResourceType {
    #[default]
    A,
    NS,
    MD,
    MF,
    CNAME,
    SOA,
    MB,
    MG,
    MR,
    NULL,
    WKS,
    PTR,
    HINFO,
    MINFO,
    MX,
    TXT,
    AAAA,
    SRV,
    DNAME,
    OPT,
    DS,
    RRSIG,
    NSEC,
    DNSKEY,
    AXFR,
    MAILB,
    ANY,
    /// Any type code without a dedicated variant, carried through unchanged.
    Unknown(u16),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DNSResourceClass {
    #[default]
    IN,
    CS,
    CH,
    HS,
    ANY,
    Unknown(u16),
}

impl From<u16> for DNSResourceClass {
    fn from(value: u16) -> Self {
        match value {
            1 => DNSResourceClass::IN,
            2 => DNSResourceClass::CS,
            3 => DNSResourceClass::CH,
            4 => DNSResourceClass::HS,
            255 => DNSResourceClass::ANY,
            other => DNSResourceClass::Unknown(other),
        }
    }
}

impl From<DNSResourceClass> for u16 {
    fn from(value: DNSResourceClass) -> Self {
        match value {
            DNSResourceClass::IN => 1,
            DNSResourceClass::CS => 2,
            DNSResourceClass::CH => 3,
            DNSResourceClass::HS => 4,
            DNSResourceClass::ANY => 255,
            DNSResourceClass::Unknown(other) => other,
        }
    }
}

impl From<u16> for DNSResourceType {
    fn from(value: u16) -> Self {
        match value {
            1 => DNSResourceType::A,
            2 => DNSResourceType::NS,
            3 => DNSResourceType::MD,
            4 => DNSResourceType::MF,
            5 => DNSResourceType::CNAME,
            6 => DNSResourceType::SOA,
            7 => DNSResourceType::MB,
            8 => DNSResourceType::MG,
            9 => DNSResourceType::MR,
            10 => DNSResourceType::NULL,
            11 => DNSResourceType::WKS,
            12 => DNSResourceType::PTR,
            13 => DNSResourceType::HINFO,
            14 => DNSResourceType::MINFO,
            15 => DNSResourceType::MX,
            16 => DNSResourceType::TXT,
            28 => DNSResourceType::AAAA,
            33 => DNSResourceType::SRV,
            39 => DNSResourceType::DNAME,
            41 => DNSResourceType::OPT,
            43 => DNSResourceType::DS,
            46 => DNSResourceType::RRSIG,
            47 => DNSResourceType::NSEC,
            48 => DNSResourceType::DNSKEY,
            252 => DNSResourceType::AXFR,
            253 => DNSResourceType::MAILB,
            255 => DNSResourceType::ANY,
            other => DNSResourceType::Unknown(other),
        }
    }
}

impl From<DNSResourceType> for u16 {
    fn from(value: DNSResourceType) -> Self {
        match value {
            DNSResourceType::A => 1,
            DNSResourceType::NS => 2,
            DNSResourceType::MD => 3,
            DNSResourceType::MF => 4,
            DNSResourceType::CNAME => 5,
            DNSResourceType::SOA => 6,
            DNSResourceType::MB => 7,
            DNSResourceType::MG => 8,
            DNSResourceType::MR => 9,
            DNSResourceType::NULL => 10,
            DNSResourceType::WKS => 11,
            DNSResourceType::PTR => 12,
            DNSResourceType::HINFO => 13,
            DNSResourceType::MINFO => 14,
            DNSResourceType::MX => 15,
            DNSResourceType::TXT => 16,
            DNSResourceType::AAAA => 28,
            DNSResourceType::SRV => 33,
            DNSResourceType::DNAME => 39,
            DNSResourceType::OPT => 41,
            DNSResourceType::DS => 43,
            DNSResourceType::RRSIG => 46,
            DNSResourceType::NSEC => 47,
            DNSResourceType::DNSKEY => 48,
            DNSResourceType::AXFR => 252,
            DNSResourceType::MAILB => 253,
            DNSResourceType::ANY => 255,
            DNSResourceType::Unknown(other) => other,
        }
    }
}

impl DNSResourceType {
    /// Types whose rdata is (or ends in) a possibly compressed domain name.
    pub fn contains_dname(self) -> bool {
        matches!(
            self,
            DNSResourceType::NS
                | DNSResourceType::CNAME
                | DNSResourceType::PTR
                | DNSResourceType::MX
                | DNSResourceType::DNAME
        )
    }
}
