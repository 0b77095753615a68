use std::net::Ipv4Addr;

use netframe::PacketError;
use netframe::dns::{
    DNSPacket,
    constants::QRType,
    enums::{DNSResourceClass, DNSResourceType},
    resource::DNSResourceData,
};

// Sample DNS query packet for google.com (A record)
// This is a real DNS query captured from dig google.com
const GOOGLE_COM_QUERY: &[u8] = &[
    0x12, 0x34, // Transaction ID
    0x01, 0x00, // Flags: Standard query
    0x00, 0x01, // Questions: 1
    0x00, 0x00, // Answer RRs: 0
    0x00, 0x00, // Authority RRs: 0
    0x00, 0x00, // Additional RRs: 0
    // Question section
    0x06, b'g', b'o', b'o', b'g', b'l', b'e', // "google"
    0x03, b'c', b'o', b'm', // "com"
    0x00, // Root label
    0x00, 0x01, // Type: A
    0x00, 0x01, // Class: IN
];

// Response to an example.com A query, answer owner compressed to the question
const EXAMPLE_COM_RESPONSE: &[u8] = &[
    0xab, 0xcd, // Transaction ID
    0x81, 0x80, // Flags: Response, RD, RA
    0x00, 0x01, // Questions: 1
    0x00, 0x01, // Answer RRs: 1
    0x00, 0x00, // Authority RRs: 0
    0x00, 0x00, // Additional RRs: 0
    // Question section
    0x07, b'e', b'x', b'a', b'm', b'p', b'l', b'e', // "example"
    0x03, b'c', b'o', b'm', // "com"
    0x00, // Root label
    0x00, 0x01, // Type: A
    0x00, 0x01, // Class: IN
    // Answer section
    0xc0, 0x0c, // Name: pointer to offset 12
    0x00, 0x01, // Type: A
    0x00, 0x01, // Class: IN
    0x00, 0x00, 0x0e, 0x10, // TTL: 3600
    0x00, 0x04, // Data length
    0x5d, 0xb8, 0xd8, 0x22, // 93.184.216.34
];

#[test]
fn test_parse_dns_header() {
    let packet = DNSPacket::parse(GOOGLE_COM_QUERY).expect("Failed to parse packet");

    assert_eq!(packet.id(), 0x1234);
    assert_eq!(packet.qr(), QRType::Query);
    assert_eq!(packet.opcode(), 0); // Standard query
    assert!(!packet.authoritative_answer());
    assert!(!packet.truncated());
    assert!(packet.recursion_desired());
    assert!(!packet.recursion_available());
    assert!(!packet.z());
    assert!(!packet.authenticated_data());
    assert!(!packet.checking_disabled());
    assert_eq!(packet.rcode(), 0);
    assert_eq!(packet.questions_count(), 1);
    assert_eq!(packet.answers_count(), 0);
    assert_eq!(packet.authority_count(), 0);
    assert_eq!(packet.additional_count(), 0);
}

#[test]
fn test_parse_dns_question() {
    let packet = DNSPacket::parse(GOOGLE_COM_QUERY).expect("Failed to parse packet");

    let questions = packet.queries().unwrap();
    assert_eq!(questions.len(), 1);

    let question = &questions[0];
    assert_eq!(question.dname, "google.com");
    assert_eq!(question.qtype, DNSResourceType::A);
    assert_eq!(question.qclass, DNSResourceClass::IN);
}

#[test]
fn test_serialize_preserves_wire_bytes() {
    let packet = DNSPacket::parse(GOOGLE_COM_QUERY).unwrap();
    assert_eq!(packet.header_size(), GOOGLE_COM_QUERY.len());
    assert_eq!(packet.serialize().unwrap(), GOOGLE_COM_QUERY);

    let packet = DNSPacket::parse(EXAMPLE_COM_RESPONSE).unwrap();
    assert_eq!(packet.serialize().unwrap(), EXAMPLE_COM_RESPONSE);
}

#[test]
fn test_serialize_into_buffer() {
    let packet = DNSPacket::parse(GOOGLE_COM_QUERY).unwrap();

    let mut buf = [0u8; 512];
    let written = packet.serialize_into(&mut buf).unwrap();
    assert_eq!(written, GOOGLE_COM_QUERY.len());
    assert_eq!(&buf[..written], GOOGLE_COM_QUERY);

    let mut small = [0u8; 16];
    assert_eq!(
        packet.serialize_into(&mut small),
        Err(PacketError::BufferTooSmall {
            what: "serialization",
            need: GOOGLE_COM_QUERY.len(),
            have: 16,
        })
    );
}

#[test]
fn test_parse_compressed_answer() {
    let packet = DNSPacket::parse(EXAMPLE_COM_RESPONSE).unwrap();
    assert_eq!(packet.qr(), QRType::Response);
    assert!(packet.recursion_available());

    let answers = packet.answers().unwrap();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].dname, "example.com");
    assert_eq!(answers[0].rtype, DNSResourceType::A);
    assert_eq!(answers[0].rclass, DNSResourceClass::IN);
    assert_eq!(answers[0].ttl, 3600);
    assert_eq!(
        answers[0].data,
        DNSResourceData::A(Ipv4Addr::new(93, 184, 216, 34))
    );

    assert!(packet.authority().unwrap().is_empty());
    assert!(packet.additional().unwrap().is_empty());
}

#[test]
fn test_section_offsets() {
    let packet = DNSPacket::parse(EXAMPLE_COM_RESPONSE).unwrap();
    // Question occupies 17 bytes, answer 16
    assert_eq!(packet.section_offsets(), [17, 33, 33]);
}

#[test]
fn test_multiple_questions() {
    let packet_data = vec![
        0x00, 0x01, // Transaction ID
        0x01, 0x00, // Flags
        0x00, 0x02, // Questions: 2
        0x00, 0x00, // Answer RRs: 0
        0x00, 0x00, // Authority RRs: 0
        0x00, 0x00, // Additional RRs: 0
        // First question: example.com A
        0x07, b'e', b'x', b'a', b'm', b'p', b'l', b'e', // "example"
        0x03, b'c', b'o', b'm', // "com"
        0x00, // Root
        0x00, 0x01, // Type: A
        0x00, 0x01, // Class: IN
        // Second question: test.org AAAA
        0x04, b't', b'e', b's', b't', // "test"
        0x03, b'o', b'r', b'g', // "org"
        0x00, // Root
        0x00, 0x1c, // Type: AAAA
        0x00, 0x01, // Class: IN
    ];

    let packet = DNSPacket::parse(&packet_data).expect("Failed to parse packet");
    let questions = packet.queries().unwrap();
    assert_eq!(questions.len(), 2);

    assert_eq!(questions[0].dname, "example.com");
    assert_eq!(questions[0].qtype, DNSResourceType::A);

    assert_eq!(questions[1].dname, "test.org");
    assert_eq!(questions[1].qtype, DNSResourceType::AAAA);
}

#[test]
fn test_label_parsing_edge_cases() {
    // Root domain query
    let root_query = vec![
        0x00, 0x01, // Transaction ID
        0x01, 0x00, // Flags
        0x00, 0x01, // Questions: 1
        0x00, 0x00, // Answer RRs: 0
        0x00, 0x00, // Authority RRs: 0
        0x00, 0x00, // Additional RRs: 0
        0x00, // Root label only
        0x00, 0x02, // Type: NS
        0x00, 0x01, // Class: IN
    ];

    let packet = DNSPacket::parse(&root_query).expect("Failed to parse root query");
    let questions = packet.queries().unwrap();
    assert_eq!(questions[0].dname, "");
    assert_eq!(questions[0].qtype, DNSResourceType::NS);
}

#[test]
fn test_max_label_length() {
    let mut packet_data = vec![
        0x00, 0x01, // Transaction ID
        0x01, 0x00, // Flags
        0x00, 0x01, // Questions: 1
        0x00, 0x00, // Answer RRs: 0
        0x00, 0x00, // Authority RRs: 0
        0x00, 0x00, // Additional RRs: 0
    ];
    packet_data.push(63);
    packet_data.extend(std::iter::repeat_n(b'a', 63));
    packet_data.extend_from_slice(&[
        0x03, b'c', b'o', b'm', // "com"
        0x00, // Root
        0x00, 0x01, // Type: A
        0x00, 0x01, // Class: IN
    ]);

    let packet = DNSPacket::parse(&packet_data).expect("Failed to parse max label");
    let questions = packet.queries().unwrap();
    assert_eq!(questions[0].dname.len(), 63 + 4);
    assert!(questions[0].dname.ends_with(".com"));
}

#[test]
fn test_header_too_short() {
    assert_eq!(
        DNSPacket::parse(&GOOGLE_COM_QUERY[..11]),
        Err(PacketError::MalformedPacket)
    );
}

#[test]
fn test_truncated_question() {
    // Name ends before the type and class
    let result = DNSPacket::parse(&GOOGLE_COM_QUERY[..GOOGLE_COM_QUERY.len() - 3]);
    assert_eq!(result, Err(PacketError::MalformedPacket));
}

#[test]
fn test_truncated_rdata() {
    // Data length promises four bytes, only two remain
    let result = DNSPacket::parse(&EXAMPLE_COM_RESPONSE[..EXAMPLE_COM_RESPONSE.len() - 2]);
    assert_eq!(result, Err(PacketError::MalformedPacket));
}

#[test]
fn test_count_larger_than_body() {
    let mut data = GOOGLE_COM_QUERY.to_vec();
    data[7] = 0x01; // Claim one answer that is not there
    assert_eq!(DNSPacket::parse(&data), Err(PacketError::MalformedPacket));
}

#[test]
fn test_trailing_bytes_dropped() {
    let mut data = GOOGLE_COM_QUERY.to_vec();
    data.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

    let packet = DNSPacket::parse(&data).unwrap();
    assert_eq!(packet.header_size(), GOOGLE_COM_QUERY.len());
    assert_eq!(packet.serialize().unwrap(), GOOGLE_COM_QUERY);
}

#[test]
fn test_forward_pointer_rejected() {
    let mut data = EXAMPLE_COM_RESPONSE.to_vec();
    // Point the answer owner at itself instead of the question
    data[29] = 0xc0;
    data[30] = 0x1d;
    let packet = DNSPacket::parse(&data).unwrap();
    assert_eq!(packet.answers(), Err(PacketError::MalformedPacket));
}

#[test]
fn test_pointer_into_header_rejected() {
    let mut data = EXAMPLE_COM_RESPONSE.to_vec();
    data[30] = 0x04;
    let packet = DNSPacket::parse(&data).unwrap();
    assert_eq!(packet.answers(), Err(PacketError::MalformedPacket));
}

#[test]
fn test_matches_response() {
    let query = DNSPacket::parse(GOOGLE_COM_QUERY).unwrap();

    let mut response = GOOGLE_COM_QUERY.to_vec();
    response[2] |= 0x80;
    assert!(query.matches_response(&response));

    response[1] = 0x35;
    assert!(!query.matches_response(&response));

    // Too short to carry a header
    assert!(!query.matches_response(&GOOGLE_COM_QUERY[..4]));
}
