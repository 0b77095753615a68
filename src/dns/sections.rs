//! The packed records buffer that sits after the DNS header.
//!
//! Questions, answers, authority and additional records share one `Vec<u8>`.
//! Three offsets mark where the last three sections begin; nothing else
//! records where a section lives, so every mutation keeps them exact.

use smallvec::SmallVec;
use tracing::{debug, trace};

use super::constants::{HEADER_SIZE, MAX_POINTER_TARGET};
use super::enums::DNSResourceType;
use super::name::{pointer_target, skip_domain_name, write_pointer};
use super::question::DNSQuestion;
use super::resource::{DNSResource, RECORD_FIXED_SIZE};
use crate::cursor::InputCursor;
use crate::error::{PacketError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Section {
    Questions,
    Answers,
    Authority,
    Additional,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RecordSections {
    data: Vec<u8>,
    answers_idx: usize,
    authority_idx: usize,
    additional_idx: usize,
}

impl RecordSections {
    /// Scans `data` once to find where each section starts. Every record is
    /// skipped structurally; a declared rdata length running past the end of
    /// the buffer is rejected. Bytes after the last additional record are
    /// dropped.
    pub(crate) fn scan(mut data: Vec<u8>, counts: [u16; 4]) -> Result<Self> {
        let [questions, answers, authority, additional] = counts;
        let mut cursor = InputCursor::new(&data);

        for _ in 0..questions {
            skip_domain_name(&mut cursor)?;
            cursor.skip(4)?;
        }
        let answers_idx = cursor.position();
        skip_records(&mut cursor, answers)?;
        let authority_idx = cursor.position();
        skip_records(&mut cursor, authority)?;
        let additional_idx = cursor.position();
        skip_records(&mut cursor, additional)?;
        let end = cursor.position();

        if end < data.len() {
            debug!("Discarding {} trailing bytes after additional section", data.len() - end);
            data.truncate(end);
        }
        debug!(
            "Section offsets: answers={}, authority={}, additional={}, end={}",
            answers_idx, authority_idx, additional_idx, end
        );

        Ok(Self {
            data,
            answers_idx,
            authority_idx,
            additional_idx,
        })
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn offsets(&self) -> [usize; 3] {
        [self.answers_idx, self.authority_idx, self.additional_idx]
    }

    fn range(&self, section: Section) -> (usize, usize) {
        match section {
            Section::Questions => (0, self.answers_idx),
            Section::Answers => (self.answers_idx, self.authority_idx),
            Section::Authority => (self.authority_idx, self.additional_idx),
            Section::Additional => (self.additional_idx, self.data.len()),
        }
    }

    pub(crate) fn questions(&self) -> Result<Vec<DNSQuestion>> {
        let (mut pos, end) = self.range(Section::Questions);
        let mut out = Vec::new();
        while pos < end {
            let (question, next) = DNSQuestion::decode(&self.data, pos)?;
            out.push(question);
            pos = next;
        }
        Ok(out)
    }

    /// Decodes one record section afresh from the buffer.
    pub(crate) fn records(&self, section: Section) -> Result<Vec<DNSResource>> {
        let (mut pos, end) = self.range(section);
        let mut out = Vec::new();
        while pos < end {
            let (record, next) = DNSResource::decode(&self.data, pos)?;
            out.push(record);
            pos = next;
        }
        Ok(out)
    }

    /// Splices `encoded` in at the end of `section`.
    ///
    /// Every byte at or after the insertion point moves forward by
    /// `encoded.len()`, so any compression pointer targeting that region is
    /// rewritten first, then the boundaries of the later sections shift.
    pub(crate) fn insert(&mut self, section: Section, encoded: &[u8]) -> Result<()> {
        let threshold = self.range(section).1;
        let delta = encoded.len();

        let pointers = self.pointers_at_or_after(threshold)?;
        for &pos in &pointers {
            let target = pointer_target(&self.data, pos) + delta;
            if target > MAX_POINTER_TARGET {
                return Err(PacketError::MessageTooLarge(format!(
                    "compression pointer target {} exceeds 14 bits",
                    target
                )));
            }
        }
        for &pos in &pointers {
            let target = pointer_target(&self.data, pos);
            trace!("Rewriting pointer at {}: {} -> {}", pos, target, target + delta);
            write_pointer(&mut self.data, pos, target + delta);
        }

        match section {
            Section::Questions => {
                self.answers_idx += delta;
                self.authority_idx += delta;
                self.additional_idx += delta;
            }
            Section::Answers => {
                self.authority_idx += delta;
                self.additional_idx += delta;
            }
            Section::Authority => self.additional_idx += delta,
            Section::Additional => {}
        }

        self.data
            .splice(threshold..threshold, encoded.iter().copied());
        debug!(
            "Inserted {} bytes into {:?} at offset {}, {} pointers rewritten",
            delta,
            section,
            threshold,
            pointers.len()
        );
        Ok(())
    }

    /// Positions of every compression pointer, in owner names and in
    /// name-bearing rdata, whose target lies at or after `threshold`.
    fn pointers_at_or_after(&self, threshold: usize) -> Result<SmallVec<[usize; 8]>> {
        let mut found = SmallVec::new();
        let mut collect = |pointer: Option<usize>| {
            if let Some(pos) = pointer {
                let target = pointer_target(&self.data, pos);
                if target >= HEADER_SIZE && target - HEADER_SIZE >= threshold {
                    found.push(pos);
                }
            }
        };

        let mut cursor = InputCursor::new(&self.data);
        while cursor.position() < self.answers_idx {
            collect(skip_domain_name(&mut cursor)?);
            cursor.skip(4)?;
        }
        while !cursor.is_empty() {
            collect(skip_domain_name(&mut cursor)?);
            let rtype = DNSResourceType::from(cursor.read_be::<u16>()?);
            cursor.skip(RECORD_FIXED_SIZE - 4)?;
            let data_size = usize::from(cursor.read_be::<u16>()?);
            let rdata_start = cursor.position();
            let rdata_end = rdata_start + data_size;
            let name_start = if rtype == DNSResourceType::MX {
                rdata_start + 2
            } else {
                rdata_start
            };
            // The name walk stays inside this record's rdata
            if rtype.contains_dname() && name_start < rdata_end {
                let bounded = self.data.get(..rdata_end).ok_or(PacketError::MalformedPacket)?;
                let mut rdata = InputCursor::at(bounded, name_start)?;
                collect(skip_domain_name(&mut rdata)?);
            }
            cursor = InputCursor::at(&self.data, rdata_end)?;
        }
        Ok(found)
    }
}

fn skip_records(cursor: &mut InputCursor<'_>, count: u16) -> Result<()> {
    for _ in 0..count {
        skip_domain_name(cursor)?;
        cursor.skip(RECORD_FIXED_SIZE - 2)?;
        let data_size = usize::from(cursor.read_be::<u16>()?);
        if !cursor.can_read(data_size) {
            return Err(PacketError::MalformedPacket);
        }
        cursor.skip(data_size)?;
    }
    Ok(())
}
