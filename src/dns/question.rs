use super::{
    enums::{DNSResourceClass, DNSResourceType},
    name::{decode_domain_name, encode_domain_name},
};
use crate::cursor::{InputCursor, OutputCursor};
use crate::error::Result;

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DNSQuestion {
    pub dname: String,
    pub qtype: DNSResourceType,
    pub qclass: DNSResourceClass,
}

impl DNSQuestion {
    pub fn new(dname: impl Into<String>, qtype: DNSResourceType, qclass: DNSResourceClass) -> Self {
        Self {
            dname: dname.into(),
            qtype,
            qclass,
        }
    }

    /// Wire form: uncompressed name, qtype, qclass.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let name = encode_domain_name(&self.dname)?;
        let mut buf = vec![0u8; name.len() + 4];
        let mut out = OutputCursor::new(&mut buf);
        out.write_bytes(&name)?;
        out.write_be::<u16>(self.qtype.into())?;
        out.write_be::<u16>(self.qclass.into())?;
        Ok(buf)
    }

    /// Decodes the question at `pos` in the records buffer. Returns it along
    /// with the offset right after it.
    pub(crate) fn decode(records: &[u8], pos: usize) -> Result<(Self, usize)> {
        let (dname, consumed) = decode_domain_name(records, pos)?;
        let mut cursor = InputCursor::at(records, pos + consumed)?;
        let qtype = cursor.read_be::<u16>()?.into();
        let qclass = cursor.read_be::<u16>()?.into();
        Ok((
            DNSQuestion {
                dname,
                qtype,
                qclass,
            },
            cursor.position(),
        ))
    }
}
