//! Domain name encoding and compressed-name resolution.
//!
//! Offsets handed to these functions are positions in the records buffer,
//! i.e. the message with its 12-byte header stripped. Compression pointers on
//! the wire are absolute message offsets, so a pointer target `t` lives at
//! records position `t - HEADER_SIZE`.

use tracing::trace;

use super::constants::{HEADER_SIZE, MAX_LABEL_LENGTH, MAX_NAME_LENGTH};
use crate::cursor::InputCursor;
use crate::error::{PacketError, Result};

const POINTER_MASK: u8 = 0xC0;

/// Encodes a dotted name as length-prefixed labels plus the root byte.
///
/// An empty name (or a lone `.`) encodes to the root label. A single
/// trailing dot is accepted and ignored.
pub fn encode_domain_name(name: &str) -> Result<Vec<u8>> {
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    let mut out = Vec::with_capacity(trimmed.len() + 2);
    if !trimmed.is_empty() {
        for label in trimmed.split('.') {
            if label.is_empty() {
                return Err(PacketError::InvalidDomainName(format!(
                    "empty label in {name:?}"
                )));
            }
            if label.len() > MAX_LABEL_LENGTH {
                return Err(PacketError::InvalidDomainName(format!(
                    "label {label:?} exceeds {MAX_LABEL_LENGTH} bytes"
                )));
            }
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
    }
    out.push(0);
    if out.len() > MAX_NAME_LENGTH {
        return Err(PacketError::InvalidDomainName(format!(
            "{name:?} exceeds {MAX_NAME_LENGTH} bytes"
        )));
    }
    Ok(out)
}

/// Decodes the name starting at `start`, following compression pointers.
///
/// Returns the dotted name and the number of bytes the occurrence at `start`
/// occupies on the wire, which stops right after the first pointer.
///
/// A pointer must target an offset past the header and strictly before the
/// pointer itself. Every jump therefore moves backwards, which rules out
/// loops and keeps the walk inside bytes already known to exist.
pub fn decode_domain_name(records: &[u8], start: usize) -> Result<(String, usize)> {
    let mut cursor = InputCursor::at(records, start)?;
    let mut name: Vec<u8> = Vec::with_capacity(64);
    let mut consumed = None;

    loop {
        let len = cursor.read_u8()?;
        match len & POINTER_MASK {
            POINTER_MASK => {
                let pointer_pos = cursor.position() - 1;
                let low = cursor.read_u8()?;
                let target = (usize::from(len & !POINTER_MASK) << 8) | usize::from(low);
                if target < HEADER_SIZE {
                    return Err(PacketError::MalformedPacket);
                }
                let target = target - HEADER_SIZE;
                if target >= pointer_pos {
                    return Err(PacketError::MalformedPacket);
                }
                if consumed.is_none() {
                    consumed = Some(cursor.position() - start);
                }
                trace!("Following compression pointer {} -> {}", pointer_pos, target);
                cursor = InputCursor::at(records, target)?;
            }
            0 => {
                if len == 0 {
                    break;
                }
                let label = cursor.read_bytes(usize::from(len))?;
                if name.len() + label.len() + 1 > MAX_NAME_LENGTH {
                    return Err(PacketError::MalformedPacket);
                }
                if !name.is_empty() {
                    name.push(b'.');
                }
                name.extend_from_slice(label);
            }
            // 0x40 and 0x80 prefixes are extended label types we don't speak
            _ => return Err(PacketError::MalformedPacket),
        }
    }

    let consumed = consumed.unwrap_or_else(|| cursor.position() - start);
    Ok((String::from_utf8_lossy(&name).into_owned(), consumed))
}

/// Advances `cursor` past one on-wire name occurrence without following
/// pointers. Returns the position of the terminating pointer, if any.
pub(crate) fn skip_domain_name(cursor: &mut InputCursor<'_>) -> Result<Option<usize>> {
    loop {
        let len = cursor.read_u8()?;
        match len & POINTER_MASK {
            POINTER_MASK => {
                let pointer_pos = cursor.position() - 1;
                cursor.skip(1)?;
                return Ok(Some(pointer_pos));
            }
            0 => {
                if len == 0 {
                    return Ok(None);
                }
                cursor.skip(usize::from(len))?;
            }
            _ => return Err(PacketError::MalformedPacket),
        }
    }
}

/// Absolute message offset stored in the pointer at `pos`.
pub(crate) fn pointer_target(records: &[u8], pos: usize) -> usize {
    (usize::from(records[pos] & !POINTER_MASK) << 8) | usize::from(records[pos + 1])
}

pub(crate) fn write_pointer(records: &mut [u8], pos: usize, target: usize) {
    records[pos] = POINTER_MASK | ((target >> 8) as u8 & !POINTER_MASK);
    records[pos + 1] = (target & 0xFF) as u8;
}
