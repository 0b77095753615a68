mod common;

use common::{ACCESS_POINT, from_hex, ipv6};
use netframe::config::Protocol;
use netframe::ieee80211::{Dot11Frame, header::MacAddress};
use netframe::inspect::{PayloadSummary, Summary, inspect};
use netframe::ipv6::Ipv6Packet;
use netframe::payload::Payload;
use netframe::{PacketError, dns::enums::DNSResourceType};

#[test]
fn test_inspect_dns_text() {
    let packet = common::create_test_query_with_id(0x0042, "example.org", DNSResourceType::AAAA);
    let bytes = packet.serialize().unwrap();

    let inspection = inspect(Protocol::Dns, &bytes, false).unwrap();
    assert_eq!(inspection.size, bytes.len());
    assert!(inspection.raw.is_none());

    let text = inspection.to_string();
    assert!(text.starts_with("dns message"));
    assert!(text.contains("id=0x0042"));
    assert!(text.contains("rd=1"));
    assert!(text.contains("example.org AAAA IN"));
    assert!(text.contains("answers (0):"));
}

#[test]
fn test_inspect_beacon_json() {
    let mut beacon = Dot11Frame::beacon(MacAddress::BROADCAST, ACCESS_POINT);
    beacon.add_ssid("lab").unwrap();
    beacon.add_channel(11).unwrap();
    let bytes = beacon.serialize().unwrap();

    let inspection = inspect(Protocol::Dot11, &bytes, true).unwrap();
    let json = serde_json::to_value(&inspection).unwrap();
    assert_eq!(json["protocol"], "dot11");
    assert_eq!(json["summary"]["kind"], "dot11");
    assert_eq!(json["summary"]["essid"], "lab");
    assert_eq!(json["summary"]["channel"], 11);
    assert_eq!(json["summary"]["header"]["addr1"], "ff:ff:ff:ff:ff:ff");
    assert_eq!(json["summary"]["options"][0]["value"], hex::encode("lab"));
    assert_eq!(json["raw"], hex::encode(&bytes));

    let text = inspection.to_string();
    assert!(text.contains("essid: lab"));
    assert!(text.contains("channel: 11"));
}

#[test]
fn test_inspect_nested_ipv6() {
    let mut inner = Ipv6Packet::new(ipv6("2001:db8:1::2"), ipv6("2001:db8:1::1"));
    inner.set_payload(Payload::Raw(vec![0; 8]));
    let mut outer = Ipv6Packet::new(ipv6("2001:db8::2"), ipv6("2001:db8::1"));
    outer.set_payload(Payload::Ipv6(Box::new(inner)));
    let bytes = outer.serialize().unwrap();

    let inspection = inspect(Protocol::Ipv6, &bytes, false).unwrap();
    let Summary::Ipv6(summary) = &inspection.summary else {
        panic!("expected IPv6 summary");
    };
    assert_eq!(summary.next_header, 41);
    let Some(PayloadSummary::Ipv6(nested)) = &summary.payload else {
        panic!("expected nested IPv6 payload");
    };
    assert_eq!(nested.src_addr, ipv6("2001:db8:1::1"));
    assert!(matches!(nested.payload, Some(PayloadSummary::Raw { bytes: 8 })));

    let text = inspection.to_string();
    assert!(text.contains("2001:db8::1 -> 2001:db8::2"));
    assert!(text.contains("  2001:db8:1::1 -> 2001:db8:1::2"));
    assert!(text.contains("payload: 8 bytes"));
}

#[test]
fn test_inspect_reports_decode_errors() {
    let bytes = from_hex("80 00 00");
    assert_eq!(
        inspect(Protocol::Dot11, &bytes, false).unwrap_err(),
        PacketError::BufferTooSmall {
            what: "802.11 header and body",
            need: 36,
            have: 3,
        }
    );
    assert_eq!(
        inspect(Protocol::Dns, &bytes, false).unwrap_err(),
        PacketError::MalformedPacket
    );
}
