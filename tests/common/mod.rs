//! Packet builders shared by the integration tests.

#![allow(dead_code)] // Not every test file uses every helper

use std::net::Ipv6Addr;

use netframe::{
    dns::{
        DNSPacket,
        enums::{DNSResourceClass, DNSResourceType},
        question::DNSQuestion,
    },
    ieee80211::header::MacAddress,
};

pub const STATION: MacAddress = MacAddress([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
pub const ACCESS_POINT: MacAddress = MacAddress([0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb]);

/// Create a basic test DNS query packet
pub fn create_test_query(domain: &str, qtype: DNSResourceType) -> DNSPacket {
    create_test_query_with_id(1234, domain, qtype)
}

pub fn create_test_query_with_id(id: u16, domain: &str, qtype: DNSResourceType) -> DNSPacket {
    let mut packet = DNSPacket::new();
    packet.set_id(id);
    packet.set_recursion_desired(true);
    packet
        .add_query(&DNSQuestion::new(domain, qtype, DNSResourceClass::IN))
        .expect("valid test query");
    packet
}

pub fn ipv6(addr: &str) -> Ipv6Addr {
    addr.parse().expect("valid IPv6 literal")
}

/// Decodes a hex fixture, ignoring whitespace between bytes.
pub fn from_hex(text: &str) -> Vec<u8> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(digits).expect("valid hex fixture")
}
