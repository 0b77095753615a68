use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use tracing::trace;

use super::{
    enums::{DNSResourceClass, DNSResourceType},
    name::{decode_domain_name, encode_domain_name},
};
use crate::cursor::{InputCursor, OutputCursor};
use crate::error::{PacketError, Result};

/// Fixed fields between a record's name and its rdata: type, class, ttl, rdlength.
pub(crate) const RECORD_FIXED_SIZE: usize = 10;

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DNSResource {
    pub dname: String,
    pub rtype: DNSResourceType,
    pub rclass: DNSResourceClass,
    pub ttl: u32,
    pub data: DNSResourceData,
}

/// Decoded rdata. The variant follows the record type: A and AAAA carry
/// addresses, NS/CNAME/PTR/DNAME a name, MX a preference plus exchange name,
/// and everything else opaque bytes.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DNSResourceData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    Name(String),
    MX(u16, String),
    Raw(Vec<u8>),
}

impl Default for DNSResourceData {
    fn default() -> Self {
        DNSResourceData::Raw(Vec::new())
    }
}

impl fmt::Display for DNSResourceData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DNSResourceData::A(addr) => write!(f, "{}", addr),
            DNSResourceData::AAAA(addr) => write!(f, "{}", addr),
            DNSResourceData::Name(name) => write!(f, "{}", name),
            DNSResourceData::MX(preference, exchange) => write!(f, "{} {}", preference, exchange),
            DNSResourceData::Raw(bytes) => write!(f, "{}", hex::encode(bytes)),
        }
    }
}

impl DNSResource {
    pub fn new(
        dname: impl Into<String>,
        rtype: DNSResourceType,
        data: DNSResourceData,
        ttl: u32,
    ) -> Self {
        Self {
            dname: dname.into(),
            rtype,
            rclass: DNSResourceClass::IN,
            ttl,
            data,
        }
    }

    pub fn with_class(mut self, rclass: DNSResourceClass) -> Self {
        self.rclass = rclass;
        self
    }

    fn encode_rdata(&self) -> Result<Vec<u8>> {
        let rdata = match (self.rtype, &self.data) {
            (DNSResourceType::A, DNSResourceData::A(addr)) => addr.octets().to_vec(),
            (DNSResourceType::AAAA, DNSResourceData::AAAA(addr)) => addr.octets().to_vec(),
            (DNSResourceType::MX, DNSResourceData::MX(preference, exchange)) => {
                let mut rdata = preference.to_be_bytes().to_vec();
                rdata.extend_from_slice(&encode_domain_name(exchange)?);
                rdata
            }
            (rtype, DNSResourceData::Name(name))
                if rtype.contains_dname() && rtype != DNSResourceType::MX =>
            {
                encode_domain_name(name)?
            }
            (rtype, DNSResourceData::Raw(bytes))
                if !rtype.contains_dname()
                    && !matches!(rtype, DNSResourceType::A | DNSResourceType::AAAA) =>
            {
                bytes.clone()
            }
            (rtype, data) => {
                return Err(PacketError::InvalidResourceData(format!(
                    "{:?} record cannot carry {:?}",
                    rtype, data
                )));
            }
        };
        if rdata.len() > usize::from(u16::MAX) {
            return Err(PacketError::MessageTooLarge(format!(
                "rdata of {} bytes",
                rdata.len()
            )));
        }
        Ok(rdata)
    }

    /// Wire form with an uncompressed owner name.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let name = encode_domain_name(&self.dname)?;
        let rdata = self.encode_rdata()?;
        let mut buf = vec![0u8; name.len() + RECORD_FIXED_SIZE + rdata.len()];
        let mut out = OutputCursor::new(&mut buf);
        out.write_bytes(&name)?;
        out.write_be::<u16>(self.rtype.into())?;
        out.write_be::<u16>(self.rclass.into())?;
        out.write_be::<u32>(self.ttl)?;
        out.write_be::<u16>(rdata.len() as u16)?;
        out.write_bytes(&rdata)?;
        Ok(buf)
    }

    /// Decodes the record at `pos` in the records buffer. Returns it along
    /// with the offset right after it.
    pub(crate) fn decode(records: &[u8], pos: usize) -> Result<(Self, usize)> {
        let (dname, consumed) = decode_domain_name(records, pos)?;
        let mut cursor = InputCursor::at(records, pos + consumed)?;
        let rtype: DNSResourceType = cursor.read_be::<u16>()?.into();
        let rclass = cursor.read_be::<u16>()?.into();
        let ttl = cursor.read_be::<u32>()?;
        let mut data_size = usize::from(cursor.read_be::<u16>()?);

        let mut preference = 0;
        if rtype == DNSResourceType::MX {
            if data_size < 2 {
                return Err(PacketError::MalformedPacket);
            }
            preference = cursor.read_be::<u16>()?;
            data_size -= 2;
        }
        if !cursor.can_read(data_size) {
            return Err(PacketError::MalformedPacket);
        }

        let data = match rtype {
            DNSResourceType::A => {
                if data_size != 4 {
                    return Err(PacketError::MalformedPacket);
                }
                DNSResourceData::A(Ipv4Addr::from(cursor.read_array::<4>()?))
            }
            DNSResourceType::AAAA => {
                if data_size != 16 {
                    return Err(PacketError::MalformedPacket);
                }
                DNSResourceData::AAAA(Ipv6Addr::from(cursor.read_array::<16>()?))
            }
            rtype if rtype.contains_dname() => {
                let (name, used) = decode_domain_name(records, cursor.position())?;
                if used > data_size {
                    return Err(PacketError::MalformedPacket);
                }
                cursor.skip(data_size)?;
                if rtype == DNSResourceType::MX {
                    DNSResourceData::MX(preference, name)
                } else {
                    DNSResourceData::Name(name)
                }
            }
            _ => DNSResourceData::Raw(cursor.read_bytes(data_size)?.to_vec()),
        };

        trace!("Decoded {:?} record for {}", rtype, dname);
        Ok((
            DNSResource {
                dname,
                rtype,
                rclass,
                ttl,
                data,
            },
            cursor.position(),
        ))
    }
}
