//! Fixed-size bodies that follow the MAC header, one per frame variant.

use crate::cursor::InputCursor;
use crate::error::Result;

macro_rules! capability_flags {
    ($($get:ident, $set:ident => $bit:expr;)*) => {
        $(
            pub fn $get(&self) -> bool {
                self.0 & (1 << $bit) != 0
            }

            pub fn $set(&mut self, value: bool) {
                if value {
                    self.0 |= 1 << $bit;
                } else {
                    self.0 &= !(1 << $bit);
                }
            }
        )*
    };
}

/// The 16-bit capability information field of management frames.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct CapabilityInformation(pub u16);

impl CapabilityInformation {
    capability_flags! {
        ess, set_ess => 0;
        ibss, set_ibss => 1;
        cf_poll, set_cf_poll => 2;
        cf_poll_request, set_cf_poll_request => 3;
        privacy, set_privacy => 4;
        short_preamble, set_short_preamble => 5;
        pbcc, set_pbcc => 6;
        channel_agility, set_channel_agility => 7;
        spectrum_mgmt, set_spectrum_mgmt => 8;
        qos, set_qos => 9;
        short_slot_time, set_short_slot_time => 10;
        apsd, set_apsd => 11;
        radio_measurement, set_radio_measurement => 12;
        dsss_ofdm, set_dsss_ofdm => 13;
        delayed_block_ack, set_delayed_block_ack => 14;
        immediate_block_ack, set_immediate_block_ack => 15;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum FrameBody {
    Beacon {
        timestamp: u64,
        interval: u16,
        capability: CapabilityInformation,
    },
    Disassoc {
        reason_code: u16,
    },
    AssocRequest {
        capability: CapabilityInformation,
        listen_interval: u16,
    },
    AssocResponse {
        capability: CapabilityInformation,
        status_code: u16,
        aid: u16,
    },
    QosData {
        qos_control: u16,
    },
    /// Any other type/subtype; nothing after the header is interpreted.
    #[default]
    Generic,
}

impl FrameBody {
    /// Zeroed body for the variant selected by the frame-control type and
    /// subtype.
    pub fn for_kind(frame_type: u8, subtype: u8) -> Self {
        use super::header::{FrameSubtype, FrameType};

        let capability = CapabilityInformation::default();
        match (frame_type, subtype) {
            (FrameType::MANAGEMENT, FrameSubtype::BEACON) => FrameBody::Beacon {
                timestamp: 0,
                interval: 0,
                capability,
            },
            (FrameType::MANAGEMENT, FrameSubtype::DISASSOC) => FrameBody::Disassoc { reason_code: 0 },
            (FrameType::MANAGEMENT, FrameSubtype::ASSOC_REQUEST) => FrameBody::AssocRequest {
                capability,
                listen_interval: 0,
            },
            (FrameType::MANAGEMENT, FrameSubtype::ASSOC_RESPONSE) => FrameBody::AssocResponse {
                capability,
                status_code: 0,
                aid: 0,
            },
            (FrameType::DATA, FrameSubtype::QOS_DATA) => FrameBody::QosData { qos_control: 0 },
            _ => FrameBody::Generic,
        }
    }

    pub fn fixed_size(&self) -> usize {
        match self {
            FrameBody::Beacon { .. } => 12,
            FrameBody::Disassoc { .. } => 2,
            FrameBody::AssocRequest { .. } => 4,
            FrameBody::AssocResponse { .. } => 6,
            FrameBody::QosData { .. } => 2,
            FrameBody::Generic => 0,
        }
    }

    /// Management variants are followed by tagged options.
    pub fn carries_options(&self) -> bool {
        !matches!(self, FrameBody::QosData { .. } | FrameBody::Generic)
    }

    /// Fills the fields of this variant from `cursor`. The caller has already
    /// checked that `fixed_size()` bytes are available.
    pub(crate) fn decode_fields(&mut self, cursor: &mut InputCursor<'_>) -> Result<()> {
        match self {
            FrameBody::Beacon {
                timestamp,
                interval,
                capability,
            } => {
                *timestamp = cursor.read_le::<u64>()?;
                *interval = cursor.read_le::<u16>()?;
                capability.0 = cursor.read_le::<u16>()?;
            }
            FrameBody::Disassoc { reason_code } => {
                *reason_code = cursor.read_le::<u16>()?;
            }
            FrameBody::AssocRequest {
                capability,
                listen_interval,
            } => {
                capability.0 = cursor.read_le::<u16>()?;
                *listen_interval = cursor.read_le::<u16>()?;
            }
            FrameBody::AssocResponse {
                capability,
                status_code,
                aid,
            } => {
                capability.0 = cursor.read_le::<u16>()?;
                *status_code = cursor.read_le::<u16>()?;
                *aid = cursor.read_le::<u16>()?;
            }
            FrameBody::QosData { qos_control } => {
                *qos_control = cursor.read_le::<u16>()?;
            }
            FrameBody::Generic => {}
        }
        Ok(())
    }

    pub(crate) fn write_to(&self, buf: &mut Vec<u8>) {
        match self {
            FrameBody::Beacon {
                timestamp,
                interval,
                capability,
            } => {
                buf.extend_from_slice(&timestamp.to_le_bytes());
                buf.extend_from_slice(&interval.to_le_bytes());
                buf.extend_from_slice(&capability.0.to_le_bytes());
            }
            FrameBody::Disassoc { reason_code } => {
                buf.extend_from_slice(&reason_code.to_le_bytes());
            }
            FrameBody::AssocRequest {
                capability,
                listen_interval,
            } => {
                buf.extend_from_slice(&capability.0.to_le_bytes());
                buf.extend_from_slice(&listen_interval.to_le_bytes());
            }
            FrameBody::AssocResponse {
                capability,
                status_code,
                aid,
            } => {
                buf.extend_from_slice(&capability.0.to_le_bytes());
                buf.extend_from_slice(&status_code.to_le_bytes());
                buf.extend_from_slice(&aid.to_le_bytes());
            }
            FrameBody::QosData { qos_control } => {
                buf.extend_from_slice(&qos_control.to_le_bytes());
            }
            FrameBody::Generic => {}
        }
    }
}
