/*
 * Diameter header:
 *
 *   0                   1                   2                   3
 *   0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
 *  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
 *  |    Version    |                 Message Length                |
 *  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
 *  | command flags |                  Command-Code                 |
 *  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
 *  |                         Application-ID                        |
 *  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
 *  |                      Hop-by-Hop Identifier                    |
 *  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
 *  |                      End-to-End Identifier                    |
 *  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
 *
 * Command Flags:
 *   0 1 2 3 4 5 6 7
 *  +-+-+-+-+-+-+-+-+  R(equest), P(roxyable), E(rror)
 *  |R P E T r r r r|  T(potentially re-transmitted), r(eserved)
 *  +-+-+-+-+-+-+-+-+
 */

pub mod avp;
pub mod validate;

pub use avp::flags as avp_flags;
pub use avp::Avp;

use lazy_static::lazy_static;
use std::io::Read;
use std::io::Write;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::value::Value;

pub const HEADER_LEN: usize = 20;

/// Command flag bits.
pub mod flags {
    pub const REQUEST: u8 = 0x80;
    pub const PROXYABLE: u8 = 0x40;
    pub const ERROR: u8 = 0x20;
    pub const RETRANSMIT: u8 = 0x10;
}

lazy_static! {
    static ref HOP_BY_HOP: AtomicU32 = AtomicU32::new(rand::random());
    static ref END_TO_END: AtomicU32 = AtomicU32::new(end_to_end_seed());
}

/// E2E seed per RFC 6733 §3: low 12 bits of the current time in the high
/// 12 bits, the rest random.
fn end_to_end_seed() -> u32 {
    let secs = Utc::now().timestamp() as u32;
    ((secs & 0xFFF) << 20) | (rand::random::<u32>() & 0x000F_FFFF)
}

pub fn next_hop_by_hop_id() -> u32 {
    HOP_BY_HOP.fetch_add(1, Ordering::Relaxed)
}

pub fn next_end_to_end_id() -> u32 {
    END_TO_END.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFlags {
    pub request: bool,
    pub proxyable: bool,
    pub error: bool,
    pub retransmit: bool,
}

impl CommandFlags {
    pub fn from_bits(bits: u8) -> CommandFlags {
        CommandFlags {
            request: bits & flags::REQUEST != 0,
            proxyable: bits & flags::PROXYABLE != 0,
            error: bits & flags::ERROR != 0,
            retransmit: bits & flags::RETRANSMIT != 0,
        }
    }

    pub fn to_bits(self) -> u8 {
        let mut bits = 0;
        if self.request {
            bits |= flags::REQUEST;
        }
        if self.proxyable {
            bits |= flags::PROXYABLE;
        }
        if self.error {
            bits |= flags::ERROR;
        }
        if self.retransmit {
            bits |= flags::RETRANSMIT;
        }
        bits
    }
}

#[derive(Debug, Clone)]
pub struct DiameterMessage {
    pub flags: CommandFlags,
    pub command_code: u32,
    pub application_id: u32,
    pub hop_by_hop_id: u32,
    pub end_to_end_id: u32,
    avps: Vec<Avp>,
    dict: Arc<Dictionary>,
}

impl PartialEq for DiameterMessage {
    fn eq(&self, other: &Self) -> bool {
        self.flags == other.flags
            && self.command_code == other.command_code
            && self.application_id == other.application_id
            && self.hop_by_hop_id == other.hop_by_hop_id
            && self.end_to_end_id == other.end_to_end_id
            && self.avps == other.avps
    }
}

impl DiameterMessage {
    pub fn new(
        command_code: u32,
        application_id: u32,
        flag_bits: u8,
        hop_by_hop_id: u32,
        end_to_end_id: u32,
        dict: Arc<Dictionary>,
    ) -> DiameterMessage {
        DiameterMessage {
            flags: CommandFlags::from_bits(flag_bits),
            command_code,
            application_id,
            hop_by_hop_id,
            end_to_end_id,
            avps: Vec::new(),
            dict,
        }
    }

    /// Builds a request by application and command name with fresh
    /// hop-by-hop and end-to-end identifiers.
    pub fn new_request(
        application_name: &str,
        command_name: &str,
        dict: Arc<Dictionary>,
    ) -> Result<DiameterMessage> {
        let app = dict.application_by_name(application_name)?;
        let command = app.command_by_name(command_name)?;
        Ok(DiameterMessage::new(
            command.code,
            app.code,
            flags::REQUEST,
            next_hop_by_hop_id(),
            next_end_to_end_id(),
            dict,
        ))
    }

    /// Builds the answer skeleton for this request: same command,
    /// application and identifiers, R flag cleared.
    pub fn response(&self) -> DiameterMessage {
        DiameterMessage {
            flags: CommandFlags {
                request: false,
                proxyable: self.flags.proxyable,
                error: false,
                retransmit: false,
            },
            command_code: self.command_code,
            application_id: self.application_id,
            hop_by_hop_id: self.hop_by_hop_id,
            end_to_end_id: self.end_to_end_id,
            avps: Vec::new(),
            dict: Arc::clone(&self.dict),
        }
    }

    pub fn avps(&self) -> &[Avp] {
        &self.avps
    }

    pub fn dict(&self) -> &Arc<Dictionary> {
        &self.dict
    }

    /// Dictionary view of the command code.
    pub fn command_name(&self) -> Option<String> {
        self.dict
            .command(self.application_id, self.command_code)
            .ok()
            .map(|cmd| cmd.name.clone())
    }

    /// Dictionary view of the application id.
    pub fn application_name(&self) -> Option<String> {
        self.dict
            .application_by_code(self.application_id)
            .ok()
            .map(|app| app.name.clone())
    }

    /// Total message length: header plus every AVP with its padding.
    pub fn length(&self) -> Result<u32> {
        let mut total = HEADER_LEN as u32;
        for avp in &self.avps {
            total += avp.length()? + avp.padding()?;
        }
        Ok(total)
    }

    pub fn decode_from<R: Read>(reader: &mut R, dict: Arc<Dictionary>) -> Result<DiameterMessage> {
        let mut b = [0; HEADER_LEN];
        reader.read_exact(&mut b)?;

        if b[0] != 1 {
            return Err(Error::DecodeError(format!(
                "unsupported diameter version {}",
                b[0]
            )));
        }
        let length = u32::from_be_bytes([0, b[1], b[2], b[3]]) as usize;
        if length < HEADER_LEN {
            return Err(Error::BadLength(format!("message declares length {}", length)));
        }
        let flags = CommandFlags::from_bits(b[4]);
        let command_code = u32::from_be_bytes([0, b[5], b[6], b[7]]);
        let application_id = u32::from_be_bytes([b[8], b[9], b[10], b[11]]);
        let hop_by_hop_id = u32::from_be_bytes([b[12], b[13], b[14], b[15]]);
        let end_to_end_id = u32::from_be_bytes([b[16], b[17], b[18], b[19]]);

        let mut body = vec![0u8; length - HEADER_LEN];
        reader.read_exact(&mut body)?;

        let mut avps = Vec::new();
        let mut cursor = std::io::Cursor::new(&body[..]);
        while (cursor.position() as usize) < body.len() {
            avps.push(Avp::decode_from(&mut cursor, &dict)?);
        }

        Ok(DiameterMessage {
            flags,
            command_code,
            application_id,
            hop_by_hop_id,
            end_to_end_id,
            avps,
            dict,
        })
    }

    /// Emits the message. For requests, AVPs that the command schema marks
    /// mandatory get their M flag forced, mutating the in-memory AVP so the
    /// object matches what was written. Refuses to emit when the bytes
    /// produced disagree with the computed length field.
    pub fn encode_to<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        if self.flags.request {
            if let Ok(command) = self.dict.command(self.application_id, self.command_code) {
                for avp in &mut self.avps {
                    if let Some(rule) = command.request.get(avp.name()) {
                        if rule.mandatory {
                            avp.set_mandatory(true);
                        }
                    }
                }
            }
        }

        let length = self.length()?;
        if length > 0xFF_FFFF {
            return Err(Error::EncodeError(format!(
                "message length {} does not fit in 24 bits",
                length
            )));
        }
        if self.command_code > 0xFF_FFFF {
            return Err(Error::EncodeError(format!(
                "command code {} does not fit in 24 bits",
                self.command_code
            )));
        }

        let mut buf = Vec::with_capacity(length as usize);
        buf.push(1);
        buf.extend_from_slice(&[(length >> 16) as u8, (length >> 8) as u8, length as u8]);
        buf.push(self.flags.to_bits());
        buf.extend_from_slice(&[
            (self.command_code >> 16) as u8,
            (self.command_code >> 8) as u8,
            self.command_code as u8,
        ]);
        buf.extend_from_slice(&self.application_id.to_be_bytes());
        buf.extend_from_slice(&self.hop_by_hop_id.to_be_bytes());
        buf.extend_from_slice(&self.end_to_end_id.to_be_bytes());
        for avp in &self.avps {
            avp.encode_to(&mut buf)?;
        }

        if buf.len() != length as usize {
            return Err(Error::LogicInvariant(format!(
                "encoded {} bytes but computed length {}",
                buf.len(),
                length
            )));
        }
        writer.write_all(&buf)?;
        Ok(())
    }

    // --- attribute manipulation ---

    pub fn add_avp(&mut self, avp: Avp) {
        self.avps.push(avp);
    }

    /// Appends a new AVP built from the dictionary, flags clear; the M flag
    /// is settled at encode time from the command schema.
    pub fn add<V: Into<Value>>(&mut self, name: &str, value: V) -> Result<&mut DiameterMessage> {
        let avp = Avp::new(name, value, 0, &self.dict)?;
        self.avps.push(avp);
        Ok(self)
    }

    pub fn add_if_not_present<V: Into<Value>>(
        &mut self,
        name: &str,
        value: V,
    ) -> Result<&mut DiameterMessage> {
        if self.get_avp(name).is_none() {
            return self.add(name, value);
        }
        Ok(self)
    }

    /// Replaces every occurrence of `name` with a single new AVP.
    pub fn replace<V: Into<Value>>(
        &mut self,
        name: &str,
        value: V,
    ) -> Result<&mut DiameterMessage> {
        self.delete_all(name);
        self.add(name, value)
    }

    pub fn delete_all(&mut self, name: &str) {
        self.avps.retain(|avp| avp.name() != name);
    }

    /// First AVP by name, as a copy.
    pub fn get_avp(&self, name: &str) -> Option<Avp> {
        self.avps.iter().find(|avp| avp.name() == name).cloned()
    }

    /// Every AVP by name, as copies.
    pub fn get_all(&self, name: &str) -> Vec<Avp> {
        self.avps
            .iter()
            .filter(|avp| avp.name() == name)
            .cloned()
            .collect()
    }

    /// Dotted-path lookup walking grouped AVPs, first match at each level.
    pub fn get_path(&self, path: &str) -> Option<Avp> {
        let mut segments = path.split('.');
        let mut current = self.get_avp(segments.next()?)?;
        for segment in segments {
            current = current.first_child(segment)?;
        }
        Some(current)
    }

    /// Filtered copy. Exactly one filter is honored: `positive` keeps only
    /// the named AVPs, otherwise `negative` drops the named ones; with
    /// neither, everything is copied. Order is preserved.
    pub fn copy(&self, positive: Option<&[&str]>, negative: Option<&[&str]>) -> DiameterMessage {
        let avps = match (positive, negative) {
            (Some(keep), _) => self
                .avps
                .iter()
                .filter(|avp| keep.contains(&avp.name()))
                .cloned()
                .collect(),
            (None, Some(drop)) => self
                .avps
                .iter()
                .filter(|avp| !drop.contains(&avp.name()))
                .cloned()
                .collect(),
            (None, None) => self.avps.clone(),
        };
        DiameterMessage {
            flags: self.flags,
            command_code: self.command_code,
            application_id: self.application_id,
            hop_by_hop_id: self.hop_by_hop_id,
            end_to_end_id: self.end_to_end_id,
            avps,
            dict: Arc::clone(&self.dict),
        }
    }

    // --- convenience accessors; zero values on miss by contract ---

    pub fn get_string(&self, name: &str) -> String {
        self.get_avp(name).map_or_else(String::new, |a| a.string_value())
    }

    pub fn get_int(&self, name: &str) -> i64 {
        self.get_avp(name).map_or(0, |a| a.i64_value())
    }

    pub fn get_float(&self, name: &str) -> f64 {
        self.get_avp(name).map_or(0.0, |a| a.f64_value())
    }

    pub fn get_date(&self, name: &str) -> DateTime<Utc> {
        self.get_avp(name)
            .map_or_else(crate::value::zero_time, |a| a.time_value())
    }

    pub fn get_ip(&self, name: &str) -> IpAddr {
        self.get_avp(name)
            .map_or_else(crate::value::zero_ip, |a| a.ip_value())
    }

    pub fn get_octets(&self, name: &str) -> Vec<u8> {
        self.get_avp(name).map_or_else(Vec::new, |a| a.octets_value())
    }
}
