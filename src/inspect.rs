//! Decode raw bytes with one of the crate's codecs and summarise the result
//! in a form that prints as text or serialises as JSON.

use std::fmt;
use std::net::Ipv6Addr;

use serde::Serialize;
use tracing::debug;

use crate::config::Protocol;
use crate::dns::DNSPacket;
use crate::dns::header::DNSHeader;
use crate::dns::question::DNSQuestion;
use crate::dns::resource::DNSResource;
use crate::error::Result;
use crate::ieee80211::Dot11Frame;
use crate::ieee80211::body::FrameBody;
use crate::ieee80211::header::Dot11Header;
use crate::ipv6::Ipv6Packet;
use crate::payload::Payload;

#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub protocol: Protocol,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    pub summary: Summary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Summary {
    Dns(DnsSummary),
    Dot11(Dot11Summary),
    Ipv6(Ipv6Summary),
}

#[derive(Debug, Clone, Serialize)]
pub struct DnsSummary {
    pub header: DNSHeader,
    pub questions: Vec<DNSQuestion>,
    pub answers: Vec<DNSResource>,
    pub authority: Vec<DNSResource>,
    pub additional: Vec<DNSResource>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaggedOptionSummary {
    pub id: u8,
    pub length: u8,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dot11Summary {
    pub header: Dot11Header,
    pub body: FrameBody,
    pub essid: Option<String>,
    pub channel: Option<u8>,
    pub supported_rates: Option<Vec<f32>>,
    pub options: Vec<TaggedOptionSummary>,
    pub payload_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtensionSummary {
    pub next_header: u8,
    pub size: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PayloadSummary {
    Raw { bytes: usize },
    Ipv6(Box<Ipv6Summary>),
}

#[derive(Debug, Clone, Serialize)]
pub struct Ipv6Summary {
    pub version: u8,
    pub traffic_class: u8,
    pub flow_label: u32,
    pub payload_length: u16,
    pub next_header: u8,
    pub hop_limit: u8,
    pub src_addr: Ipv6Addr,
    pub dst_addr: Ipv6Addr,
    pub extension_headers: Vec<ExtensionSummary>,
    pub payload: Option<PayloadSummary>,
}

impl From<&Ipv6Packet> for Ipv6Summary {
    fn from(packet: &Ipv6Packet) -> Self {
        Ipv6Summary {
            version: packet.version(),
            traffic_class: packet.traffic_class(),
            flow_label: packet.flow_label(),
            payload_length: packet.payload_length(),
            next_header: packet.next_header(),
            hop_limit: packet.hop_limit(),
            src_addr: packet.src_addr(),
            dst_addr: packet.dst_addr(),
            extension_headers: packet
                .ext_headers()
                .iter()
                .map(|ext| ExtensionSummary {
                    next_header: ext.next_header,
                    size: ext.size(),
                })
                .collect(),
            payload: packet.payload().map(|payload| match payload {
                Payload::Raw(bytes) => PayloadSummary::Raw { bytes: bytes.len() },
                Payload::Ipv6(inner) => PayloadSummary::Ipv6(Box::new(Self::from(inner.as_ref()))),
            }),
        }
    }
}

/// Decodes `bytes` as `protocol`. Decode errors are returned unchanged.
pub fn inspect(protocol: Protocol, bytes: &[u8], show_raw: bool) -> Result<Inspection> {
    debug!("Inspecting {} bytes as {}", bytes.len(), protocol);
    let summary = match protocol {
        Protocol::Dns => {
            let packet = DNSPacket::parse(bytes)?;
            Summary::Dns(DnsSummary {
                header: packet.header().clone(),
                questions: packet.queries()?,
                answers: packet.answers()?,
                authority: packet.authority()?,
                additional: packet.additional()?,
            })
        }
        Protocol::Dot11 => {
            let frame = Dot11Frame::parse(bytes)?;
            Summary::Dot11(Dot11Summary {
                header: frame.header().clone(),
                body: frame.body().clone(),
                essid: frame.essid(),
                channel: frame.channel(),
                supported_rates: frame.supported_rates(),
                options: frame
                    .options()
                    .iter()
                    .map(|opt| TaggedOptionSummary {
                        id: opt.option(),
                        length: opt.length(),
                        value: hex::encode(opt.value()),
                    })
                    .collect(),
                payload_bytes: frame.payload().map_or(0, Payload::size),
            })
        }
        Protocol::Ipv6 => Summary::Ipv6(Ipv6Summary::from(&Ipv6Packet::parse(bytes)?)),
    };

    Ok(Inspection {
        protocol,
        size: bytes.len(),
        raw: show_raw.then(|| hex::encode(bytes)),
        summary,
    })
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} message, {} bytes", self.protocol, self.size)?;
        if let Some(raw) = &self.raw {
            writeln!(f, "raw: {}", raw)?;
        }
        match &self.summary {
            Summary::Dns(dns) => write!(f, "{}", dns),
            Summary::Dot11(dot11) => write!(f, "{}", dot11),
            Summary::Ipv6(ipv6) => write_ipv6(f, ipv6, 0),
        }
    }
}

impl fmt::Display for DnsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.header;
        writeln!(
            f,
            "id={:#06x} qr={} opcode={} aa={} tc={} rd={} ra={} ad={} cd={} rcode={}",
            h.id, h.qr as u8, h.opcode, h.aa as u8, h.tc as u8, h.rd as u8, h.ra as u8,
            h.ad as u8, h.cd as u8, h.rcode
        )?;
        writeln!(f, "questions ({}):", self.questions.len())?;
        for q in &self.questions {
            writeln!(f, "  {} {:?} {:?}", q.dname, q.qtype, q.qclass)?;
        }
        for (title, records) in [
            ("answers", &self.answers),
            ("authority", &self.authority),
            ("additional", &self.additional),
        ] {
            writeln!(f, "{} ({}):", title, records.len())?;
            for r in records {
                writeln!(f, "  {} {} {:?} {:?} {}", r.dname, r.ttl, r.rclass, r.rtype, r.data)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Dot11Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let control = &self.header.control;
        writeln!(
            f,
            "type={} subtype={} to_ds={} from_ds={} seq={} frag={}",
            control.frame_type,
            control.subtype,
            control.to_ds as u8,
            control.from_ds as u8,
            self.header.seq_num,
            self.header.frag_num
        )?;
        writeln!(
            f,
            "addr1={} addr2={} addr3={}",
            self.header.addr1, self.header.addr2, self.header.addr3
        )?;
        if control.has_addr4() {
            writeln!(f, "addr4={}", self.header.addr4)?;
        }
        writeln!(f, "body: {:?}", self.body)?;
        if let Some(essid) = &self.essid {
            writeln!(f, "essid: {}", essid)?;
        }
        if let Some(channel) = self.channel {
            writeln!(f, "channel: {}", channel)?;
        }
        if let Some(rates) = &self.supported_rates {
            writeln!(f, "rates: {:?} Mbps", rates)?;
        }
        for opt in &self.options {
            writeln!(f, "  option {} len {}: {}", opt.id, opt.length, opt.value)?;
        }
        if self.payload_bytes > 0 {
            writeln!(f, "payload: {} bytes", self.payload_bytes)?;
        }
        Ok(())
    }
}

fn write_ipv6(f: &mut fmt::Formatter<'_>, ipv6: &Ipv6Summary, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    writeln!(
        f,
        "{pad}{} -> {} tc={} flow={:#07x} hop_limit={} payload_length={} next={}",
        ipv6.src_addr,
        ipv6.dst_addr,
        ipv6.traffic_class,
        ipv6.flow_label,
        ipv6.hop_limit,
        ipv6.payload_length,
        ipv6.next_header
    )?;
    for ext in &ipv6.extension_headers {
        writeln!(f, "{pad}  extension: {} bytes, next={}", ext.size, ext.next_header)?;
    }
    match &ipv6.payload {
        Some(PayloadSummary::Raw { bytes }) => writeln!(f, "{pad}  payload: {} bytes", bytes),
        Some(PayloadSummary::Ipv6(inner)) => write_ipv6(f, inner, depth + 1),
        None => Ok(()),
    }
}
