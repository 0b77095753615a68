mod common;

use common::{from_hex, ipv6};
use netframe::PacketError;
use netframe::ipv6::{Ipv6Packet, is_extension_header};
use netframe::payload::{IpProtocol, MAX_NESTING_DEPTH, Payload};

// Hop-by-hop options with a router alert, then a UDP datagram. Rows:
// version/class/flow + payload length + next header + hop limit,
// source address, destination address,
// hop-by-hop (next UDP, length 0, router alert, PadN), UDP header
const HOP_BY_HOP_UDP: &str = "
    60 00 00 00 00 10 00 40
    fe 80 00 00 00 00 00 00 00 00 00 00 00 00 00 01
    ff 02 00 00 00 00 00 00 00 00 00 00 00 00 00 01
    11 00 05 02 00 00 01 00
    02 22 02 23 00 08 00 00
";

#[test]
fn test_parse_with_extension_header() {
    let bytes = from_hex(HOP_BY_HOP_UDP);
    let packet = Ipv6Packet::parse(&bytes).expect("Failed to parse packet");

    assert_eq!(packet.version(), 6);
    assert_eq!(packet.traffic_class(), 0);
    assert_eq!(packet.flow_label(), 0);
    assert_eq!(packet.payload_length(), 16);
    assert_eq!(packet.next_header(), IpProtocol::HOP_BY_HOP);
    assert_eq!(packet.hop_limit(), 64);
    assert_eq!(packet.src_addr(), ipv6("fe80::1"));
    assert_eq!(packet.dst_addr(), ipv6("ff02::1"));

    let ext_headers = packet.ext_headers();
    assert_eq!(ext_headers.len(), 1);
    assert_eq!(ext_headers[0].next_header, IpProtocol::UDP);
    assert_eq!(ext_headers[0].size(), 8);
    assert_eq!(ext_headers[0].length_field(), 0);
    assert_eq!(ext_headers[0].payload(), &[0x05, 0x02, 0x00, 0x00, 0x01, 0x00]);

    assert!(packet.search_header(IpProtocol::HOP_BY_HOP).is_some());
    assert!(packet.search_header(IpProtocol::ROUTING).is_none());

    assert_eq!(packet.payload(), Some(&Payload::Raw(bytes[48..].to_vec())));
    assert_eq!(packet.header_size(), 48);
    assert_eq!(packet.size(), bytes.len());
    assert_eq!(packet.serialize().unwrap(), bytes);
}

#[test]
fn test_build_with_extension_header() {
    let mut packet = Ipv6Packet::new(ipv6("ff02::1"), ipv6("fe80::1"));
    assert_eq!(packet.next_header(), IpProtocol::NO_NEXT_HEADER);

    packet
        .add_ext_header(IpProtocol::HOP_BY_HOP, vec![0x05, 0x02, 0x00, 0x00, 0x01, 0x00])
        .unwrap();
    assert_eq!(packet.next_header(), IpProtocol::HOP_BY_HOP);
    assert_eq!(packet.ext_headers()[0].next_header, IpProtocol::NO_NEXT_HEADER);

    // Raw payloads carry no protocol number, so the chain end is set by hand
    packet.set_last_next_header(IpProtocol::UDP);
    packet.set_payload(Payload::Raw(vec![0x02, 0x22, 0x02, 0x23, 0x00, 0x08, 0x00, 0x00]));

    assert_eq!(packet.serialize().unwrap(), from_hex(HOP_BY_HOP_UDP));
    // serialize works on a copy
    assert_eq!(packet.payload_length(), 0);

    packet.finalize().unwrap();
    assert_eq!(packet.payload_length(), 16);
}

#[test]
fn test_extension_chain_linking() {
    let mut packet = Ipv6Packet::new(ipv6("2001:db8::2"), ipv6("2001:db8::1"));
    packet.add_ext_header(IpProtocol::HOP_BY_HOP, vec![0; 6]).unwrap();
    packet.add_ext_header(IpProtocol::ROUTING, vec![0; 22]).unwrap();
    packet.add_ext_header(IpProtocol::DESTINATION_OPTIONS, vec![0; 14]).unwrap();

    // Each header names the one after it; the last one still ends the chain
    assert_eq!(packet.next_header(), IpProtocol::HOP_BY_HOP);
    let next: Vec<u8> = packet.ext_headers().iter().map(|h| h.next_header).collect();
    assert_eq!(
        next,
        vec![
            IpProtocol::ROUTING,
            IpProtocol::DESTINATION_OPTIONS,
            IpProtocol::NO_NEXT_HEADER,
        ]
    );
    assert_eq!(packet.header_size(), 40 + 8 + 24 + 16);

    let routing = packet.search_header(IpProtocol::ROUTING).unwrap();
    assert_eq!(routing.size(), 24);
    assert_eq!(routing.length_field(), 2);

    let bytes = packet.serialize().unwrap();
    assert_eq!(&bytes[4..6], &[0x00, 48]);
    assert_eq!(&bytes[48..50], &[IpProtocol::DESTINATION_OPTIONS, 2]);
    assert_eq!(&bytes[72..74], &[IpProtocol::NO_NEXT_HEADER, 1]);

    let reparsed = Ipv6Packet::parse(&bytes).unwrap();
    assert_eq!(reparsed.ext_headers(), packet.ext_headers());
    assert!(reparsed.payload().is_none());
}

#[test]
fn test_extension_header_size_checked() {
    let mut packet = Ipv6Packet::new(ipv6("::1"), ipv6("::1"));
    assert!(matches!(
        packet.add_ext_header(IpProtocol::FRAGMENT, vec![0; 5]),
        Err(PacketError::InvalidExtensionHeader(_))
    ));
    assert!(matches!(
        packet.add_ext_header(IpProtocol::ROUTING, vec![0; 2054]),
        Err(PacketError::InvalidExtensionHeader(_))
    ));
    // A failed add leaves the chain untouched
    assert!(packet.ext_headers().is_empty());
    assert_eq!(packet.next_header(), IpProtocol::NO_NEXT_HEADER);

    packet.add_ext_header(IpProtocol::ROUTING, vec![0; 2046]).unwrap();
    assert_eq!(packet.ext_headers()[0].length_field(), 255);
}

#[test]
fn test_ipv6_in_ipv6() {
    let mut inner = Ipv6Packet::new(ipv6("2001:db8:1::2"), ipv6("2001:db8:1::1"));
    inner.set_traffic_class(0x2e);
    inner.set_flow_label(0xabcde);
    inner.set_payload(Payload::Raw(b"hello".to_vec()));

    let mut outer = Ipv6Packet::new(ipv6("2001:db8::2"), ipv6("2001:db8::1"));
    outer.add_ext_header(IpProtocol::DESTINATION_OPTIONS, vec![0; 6]).unwrap();
    outer.set_payload(Payload::Ipv6(Box::new(inner.clone())));

    let bytes = outer.serialize().unwrap();
    assert_eq!(bytes.len(), 40 + 8 + 40 + 5);
    // The chain now ends in the encapsulated packet
    assert_eq!(bytes[40], IpProtocol::IPV6);
    assert_eq!(&bytes[4..6], &[0x00, 53]);

    let reparsed = Ipv6Packet::parse(&bytes).unwrap();
    let Some(Payload::Ipv6(decoded)) = reparsed.payload() else {
        panic!("expected encapsulated IPv6, got {:?}", reparsed.payload());
    };
    assert_eq!(decoded.src_addr(), inner.src_addr());
    assert_eq!(decoded.traffic_class(), 0x2e);
    assert_eq!(decoded.flow_label(), 0xabcde);
    assert_eq!(decoded.payload_length(), 5);
    assert_eq!(decoded.payload(), Some(&Payload::Raw(b"hello".to_vec())));
}

#[test]
fn test_short_buffers() {
    let bytes = from_hex(HOP_BY_HOP_UDP);
    assert_eq!(
        Ipv6Packet::parse(&bytes[..39]),
        Err(PacketError::BufferTooSmall {
            what: "IPv6 header",
            need: 40,
            have: 39,
        })
    );
    // Extension header cut short
    assert_eq!(
        Ipv6Packet::parse(&bytes[..45]),
        Err(PacketError::MalformedPacket)
    );

    // Bare header with nothing behind it
    let packet = Ipv6Packet::parse(&bytes[..40]).unwrap();
    assert!(packet.ext_headers().is_empty());
    assert!(packet.payload().is_none());
}

#[test]
fn test_esp_not_walked() {
    let mut bytes = from_hex(HOP_BY_HOP_UDP);
    bytes[6] = IpProtocol::ESP;

    let packet = Ipv6Packet::parse(&bytes).unwrap();
    assert!(packet.ext_headers().is_empty());
    assert_eq!(packet.payload(), Some(&Payload::Raw(bytes[40..].to_vec())));
    assert!(!is_extension_header(IpProtocol::ESP));
    assert!(!is_extension_header(IpProtocol::NO_NEXT_HEADER));
    assert!(is_extension_header(IpProtocol::MOBILITY));
}

#[test]
fn test_payload_too_large() {
    let mut packet = Ipv6Packet::new(ipv6("::2"), ipv6("::1"));
    packet.set_payload(Payload::Raw(vec![0; 65536]));
    assert!(matches!(
        packet.serialize(),
        Err(PacketError::MessageTooLarge(_))
    ));
}

#[test]
fn test_setters_mask_fields() {
    let mut packet = Ipv6Packet::new(ipv6("::2"), ipv6("::1"));
    packet.set_flow_label(0xffff_ffff);
    packet.set_version(0x16);
    assert_eq!(packet.flow_label(), 0x000f_ffff);
    assert_eq!(packet.version(), 6);
}

#[test]
fn test_matches_response() {
    let mut request = Ipv6Packet::new(ipv6("2001:db8::2"), ipv6("2001:db8::1"));
    request.set_payload(Payload::Raw(vec![0; 4]));

    let mut reply = Ipv6Packet::new(ipv6("2001:db8::1"), ipv6("2001:db8::2"));
    reply.add_ext_header(IpProtocol::DESTINATION_OPTIONS, vec![0; 6]).unwrap();
    reply.set_last_next_header(IpProtocol::UDP);
    reply.set_payload(Payload::Raw(vec![0; 16]));
    let reply_bytes = reply.serialize().unwrap();
    assert!(request.matches_response(&reply_bytes));

    let stranger = Ipv6Packet::new(ipv6("2001:db8::1"), ipv6("2001:db8::99"));
    assert!(!request.matches_response(&stranger.serialize().unwrap()));

    // Queries to a link-local multicast group accept any responder
    let mut solicit = Ipv6Packet::new(ipv6("ff02::1:2"), ipv6("2001:db8::1"));
    solicit.set_payload(Payload::Raw(vec![0; 4]));
    assert!(solicit.matches_response(&stranger.serialize().unwrap()));

    assert!(!request.matches_response(&reply_bytes[..39]));
}

/// `levels` bare headers, each one carrying the next.
fn nested_headers(levels: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(levels * 40);
    for level in 0..levels {
        let next_header = if level + 1 == levels {
            IpProtocol::NO_NEXT_HEADER
        } else {
            IpProtocol::IPV6
        };
        bytes.extend_from_slice(&[0x60, 0x00, 0x00, 0x00, 0x00, 0x00, next_header, 64]);
        bytes.extend_from_slice(&[0; 32]);
    }
    bytes
}

#[test]
fn test_nesting_depth_limited() {
    let packet = Ipv6Packet::parse(&nested_headers(MAX_NESTING_DEPTH + 1)).unwrap();
    let mut levels = 1;
    let mut current = &packet;
    while let Some(Payload::Ipv6(inner)) = current.payload() {
        levels += 1;
        current = &**inner;
    }
    assert_eq!(levels, MAX_NESTING_DEPTH + 1);

    assert_eq!(
        Ipv6Packet::parse(&nested_headers(MAX_NESTING_DEPTH + 2)),
        Err(PacketError::MalformedPacket)
    );
    // Rejected after a bounded walk rather than exhausting the stack
    assert_eq!(
        Ipv6Packet::parse(&nested_headers(100_000)),
        Err(PacketError::MalformedPacket)
    );
}
