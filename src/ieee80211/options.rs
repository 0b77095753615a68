//! Tagged parameters (information elements) of management frames.

use tracing::{debug, trace};

use crate::error::{PacketError, Result};

/// Element IDs of the tagged parameters this crate knows by name.
pub struct TaggedOptionType;

impl TaggedOptionType {
    pub const SSID: u8 = 0;
    pub const SUPPORTED_RATES: u8 = 1;
    pub const FH_SET: u8 = 2;
    pub const DS_SET: u8 = 3;
    pub const CF_SET: u8 = 4;
    pub const TIM: u8 = 5;
    pub const IBSS_SET: u8 = 6;
    pub const COUNTRY: u8 = 7;
    pub const HOPPING_PATTERN_PARAMS: u8 = 8;
    pub const HOPPING_PATTERN_TABLE: u8 = 9;
    pub const REQUEST: u8 = 10;
    pub const BSS_LOAD: u8 = 11;
    pub const EDCA: u8 = 12;
    pub const TSPEC: u8 = 13;
    pub const TCLAS: u8 = 14;
    pub const SCHEDULE: u8 = 15;
    pub const CHALLENGE_TEXT: u8 = 16;
    pub const POWER_CONSTRAINT: u8 = 32;
    pub const POWER_CAPABILITY: u8 = 33;
    pub const TPC_REQUEST: u8 = 34;
    pub const TPC_REPORT: u8 = 35;
    pub const SUPPORTED_CHANNELS: u8 = 36;
    pub const CHANNEL_SWITCH: u8 = 37;
    pub const MEASUREMENT_REQUEST: u8 = 38;
    pub const MEASUREMENT_REPORT: u8 = 39;
    pub const QUIET: u8 = 40;
    pub const IBSS_DFS: u8 = 41;
    pub const ERP_INFORMATION: u8 = 42;
    pub const TS_DELAY: u8 = 43;
    pub const TCLAS_PROCESSING: u8 = 44;
    pub const QOS_CAPABILITY: u8 = 46;
    pub const RSN: u8 = 48;
    pub const EXT_SUPPORTED_RATES: u8 = 50;
}

/// One element: an ID byte, a length byte and up to 255 bytes of value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaggedOption {
    option: u8,
    value: Vec<u8>,
}

impl TaggedOption {
    pub fn new(option: u8, value: Vec<u8>) -> Result<Self> {
        if value.len() > usize::from(u8::MAX) {
            return Err(PacketError::OptionTooLong(value.len()));
        }
        Ok(Self { option, value })
    }

    pub fn option(&self) -> u8 {
        self.option
    }

    pub fn length(&self) -> u8 {
        self.value.len() as u8
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Wire size: ID and length bytes plus the value.
    pub fn size(&self) -> usize {
        self.value.len() + 2
    }
}

/// Elements in insertion order, with their combined wire size kept current.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaggedOptionSet {
    options: Vec<TaggedOption>,
    total_size: usize,
}

impl TaggedOptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks ID/length pairs until the input runs out. An element whose
    /// declared length overruns the input ends the walk and is dropped.
    pub fn parse(mut bytes: &[u8]) -> Self {
        let mut set = Self::new();
        while let [option, length, rest @ ..] = bytes {
            let length = usize::from(*length);
            if length > rest.len() {
                debug!(
                    "Dropping truncated tagged option {}: declared {} bytes, {} left",
                    option,
                    length,
                    rest.len()
                );
                break;
            }
            trace!("Tagged option {} with {} bytes", option, length);
            set.add(TaggedOption {
                option: *option,
                value: rest[..length].to_vec(),
            });
            bytes = &rest[length..];
        }
        set
    }

    pub fn add(&mut self, option: TaggedOption) {
        self.total_size += option.size();
        self.options.push(option);
    }

    /// First element with this ID. Later duplicates are only reachable
    /// through [`iter`](Self::iter).
    pub fn find(&self, option: u8) -> Option<&TaggedOption> {
        self.options.iter().find(|opt| opt.option == option)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaggedOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub(crate) fn write_to(&self, buf: &mut Vec<u8>) {
        for opt in &self.options {
            buf.push(opt.option);
            buf.push(opt.length());
            buf.extend_from_slice(&opt.value);
        }
    }
}
