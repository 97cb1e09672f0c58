/*
 * RADIUS packet format:
 *
 *  0                   1                   2                   3
 *  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
 * +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
 * |     Code      |  Identifier   |            Length             |
 * +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
 * |                                                               |
 * |                         Authenticator                         |
 * |                                                               |
 * |                                                               |
 * +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
 * |  Attributes ...
 * +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-
 */

pub mod avp;
pub mod crypto;

pub use avp::Avp;
pub use crypto::{
    check_request_authenticator, check_response_authenticator, validate_request_authenticator,
    validate_response_authenticator,
};

use std::io::Cursor;
use std::io::Read;
use std::io::Write;
use std::net::IpAddr;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::value::Value;

/// Maximum total packet length, RFC 2865 §3.
pub const MAX_PACKET_LEN: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketCode {
    AccessRequest = 1,
    AccessAccept = 2,
    AccessReject = 3,
    AccountingRequest = 4,
    AccountingResponse = 5,
    DisconnectRequest = 40,
    DisconnectAck = 41,
    DisconnectNak = 42,
    CoaRequest = 43,
    CoaAck = 44,
    CoaNak = 45,
}

impl PacketCode {
    pub fn from_u8(code: u8) -> Option<PacketCode> {
        match code {
            1 => Some(PacketCode::AccessRequest),
            2 => Some(PacketCode::AccessAccept),
            3 => Some(PacketCode::AccessReject),
            4 => Some(PacketCode::AccountingRequest),
            5 => Some(PacketCode::AccountingResponse),
            40 => Some(PacketCode::DisconnectRequest),
            41 => Some(PacketCode::DisconnectAck),
            42 => Some(PacketCode::DisconnectNak),
            43 => Some(PacketCode::CoaRequest),
            44 => Some(PacketCode::CoaAck),
            45 => Some(PacketCode::CoaNak),
            _ => None,
        }
    }

    pub fn is_request(&self) -> bool {
        matches!(
            self,
            PacketCode::AccessRequest
                | PacketCode::AccountingRequest
                | PacketCode::DisconnectRequest
                | PacketCode::CoaRequest
        )
    }
}

#[derive(Debug, Clone)]
pub struct Packet {
    pub code: PacketCode,
    pub identifier: u8,
    /// For requests, the authenticator sent on the wire. For responses this
    /// keeps the authenticator of the request being answered; the response
    /// authenticator only exists in the emitted bytes.
    pub authenticator: [u8; 16],
    avps: Vec<Avp>,
    dict: Arc<Dictionary>,
}

impl PartialEq for Packet {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
            && self.identifier == other.identifier
            && self.authenticator == other.authenticator
            && self.avps == other.avps
    }
}

impl Packet {
    pub fn new(code: PacketCode, dict: Arc<Dictionary>) -> Packet {
        Packet {
            code,
            identifier: 0,
            authenticator: [0; 16],
            avps: Vec::new(),
            dict,
        }
    }

    /// Builds the answer skeleton for this request: same identifier, and the
    /// request authenticator carried through for the response digest and for
    /// hiding attributes in the answer.
    pub fn response(&self, code: PacketCode) -> Packet {
        Packet {
            code,
            identifier: self.identifier,
            authenticator: self.authenticator,
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

    /// Parses a packet. When the buffer holds a response, pass the
    /// authenticator of the matching request so hidden attributes decrypt
    /// against the right key source.
    pub fn decode_from<R: Read>(
        reader: &mut R,
        dict: Arc<Dictionary>,
        secret: &[u8],
        request_authenticator: Option<[u8; 16]>,
    ) -> Result<Packet> {
        let mut header = [0u8; 20];
        reader.read_exact(&mut header)?;

        let code = PacketCode::from_u8(header[0])
            .ok_or_else(|| Error::DecodeError(format!("unknown packet code {}", header[0])))?;
        let identifier = header[1];
        let length = u16::from_be_bytes([header[2], header[3]]) as usize;
        if !(20..=MAX_PACKET_LEN).contains(&length) {
            return Err(Error::BadLength(format!("packet declares length {}", length)));
        }
        let mut authenticator = [0u8; 16];
        authenticator.copy_from_slice(&header[4..20]);

        let mut attrs = vec![0u8; length - 20];
        reader.read_exact(&mut attrs)?;

        let hiding_auth = request_authenticator.unwrap_or(authenticator);
        let mut avps: Vec<Avp> = Vec::new();
        let mut cursor = Cursor::new(&attrs[..]);
        while (cursor.position() as usize) < attrs.len() {
            let avp = Avp::decode_from(&mut cursor, &dict, secret, &hiding_auth)?;
            // Concat reassembly: a fragment continues the previous AVP of
            // the same code.
            if avp.is_concat() {
                if let Some(last) = avps.last_mut() {
                    if last.code() == avp.code() && last.vendor_id() == avp.vendor_id() {
                        let mut bytes = last.octets_value();
                        bytes.extend_from_slice(&avp.octets_value());
                        last.set_value(Value::Octets(bytes));
                        continue;
                    }
                }
            }
            avps.push(avp);
        }

        Ok(Packet {
            code,
            identifier,
            authenticator,
            avps,
            dict,
        })
    }

    /// Emits the packet. For requests, `identifier` is assigned and the
    /// authenticator is produced here: Access-Requests get a fresh random
    /// value (or `reuse_authenticator` verbatim for retransmissions),
    /// hash-type requests get `MD5(code|id|len|zeros|attrs|secret)`. Both are
    /// written back into the packet. Responses digest over the request
    /// authenticator held by the packet.
    pub fn encode_to<W: Write>(
        &mut self,
        writer: &mut W,
        secret: &[u8],
        identifier: u8,
        reuse_authenticator: Option<[u8; 16]>,
    ) -> Result<()> {
        if self.code.is_request() {
            self.identifier = identifier;
            self.authenticator = match self.code {
                PacketCode::AccessRequest => {
                    reuse_authenticator.unwrap_or_else(crypto::random_authenticator)
                }
                // Hash-type requests zero the field while digesting; hidden
                // attributes are keyed on the zeros as well.
                _ => [0; 16],
            };
        }

        let attrs = self.encode_avps(secret)?;
        let length = 20 + attrs.len();
        if length > MAX_PACKET_LEN {
            return Err(Error::EncodeError(format!(
                "packet of {} bytes exceeds the {} limit",
                length, MAX_PACKET_LEN
            )));
        }

        let wire_authenticator = match self.code {
            PacketCode::AccessRequest => self.authenticator,
            PacketCode::AccountingRequest
            | PacketCode::DisconnectRequest
            | PacketCode::CoaRequest => {
                let digest = crypto::packet_digest(
                    self.code as u8,
                    self.identifier,
                    length as u16,
                    &[0; 16],
                    &attrs,
                    secret,
                );
                self.authenticator = digest;
                digest
            }
            _ => crypto::packet_digest(
                self.code as u8,
                self.identifier,
                length as u16,
                &self.authenticator,
                &attrs,
                secret,
            ),
        };

        writer.write_all(&[self.code as u8, self.identifier])?;
        writer.write_all(&(length as u16).to_be_bytes())?;
        writer.write_all(&wire_authenticator)?;
        writer.write_all(&attrs)?;
        Ok(())
    }

    fn encode_avps(&self, secret: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for avp in &self.avps {
            if avp.is_concat() {
                let bytes = avp.octets_value();
                let header = if avp.vendor_id() != 0 { 8 } else { 2 };
                if bytes.len() + header > 255 {
                    for chunk in bytes.chunks(avp::CONCAT_CHUNK) {
                        let mut fragment = avp.clone();
                        fragment.set_value(Value::Octets(chunk.to_vec()));
                        fragment.encode_to(&mut out, secret, &self.authenticator)?;
                    }
                    continue;
                }
            }
            avp.encode_to(&mut out, secret, &self.authenticator)?;
        }
        Ok(out)
    }

    // --- attribute manipulation ---

    pub fn add_avp(&mut self, avp: Avp) {
        self.avps.push(avp);
    }

    /// Appends a new attribute built from the dictionary.
    pub fn add<V: Into<Value>>(&mut self, name: &str, value: V) -> Result<&mut Packet> {
        let avp = Avp::new(name, value, &self.dict)?;
        self.avps.push(avp);
        Ok(self)
    }

    pub fn add_if_not_present<V: Into<Value>>(
        &mut self,
        name: &str,
        value: V,
    ) -> Result<&mut Packet> {
        if self.get_avp(name).is_none() {
            return self.add(name, value);
        }
        Ok(self)
    }

    /// Replaces every occurrence of `name` with a single new attribute.
    pub fn replace<V: Into<Value>>(&mut self, name: &str, value: V) -> Result<&mut Packet> {
        self.delete_all(name);
        self.add(name, value)
    }

    pub fn delete_all(&mut self, name: &str) {
        self.avps.retain(|avp| avp.name() != name);
    }

    /// First attribute by name, as a copy.
    pub fn get_avp(&self, name: &str) -> Option<Avp> {
        self.avps.iter().find(|avp| avp.name() == name).cloned()
    }

    /// Every attribute by name, as copies.
    pub fn get_all(&self, name: &str) -> Vec<Avp> {
        self.avps
            .iter()
            .filter(|avp| avp.name() == name)
            .cloned()
            .collect()
    }

    /// Dotted-path lookup. RADIUS attributes do not nest, so only a
    /// single-segment path can match.
    pub fn get_path(&self, path: &str) -> Option<Avp> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        if segments.next().is_some() {
            return None;
        }
        self.get_avp(first)
    }

    /// Filtered copy. Exactly one filter is honored: `positive` keeps only
    /// the named attributes, otherwise `negative` drops the named ones;
    /// with neither, everything is copied. Order is preserved.
    pub fn copy(&self, positive: Option<&[&str]>, negative: Option<&[&str]>) -> Packet {
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
        Packet {
            code: self.code,
            identifier: self.identifier,
            authenticator: self.authenticator,
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

    /// CHAP check against this request: the challenge is the
    /// `CHAP-Challenge` attribute when present, else the request
    /// authenticator.
    pub fn verify_chap(&self, password: &str) -> bool {
        let chap_password = match self.get_avp("CHAP-Password") {
            Some(avp) => avp.octets_value(),
            None => return false,
        };
        let challenge = match self.get_avp("CHAP-Challenge") {
            Some(avp) => avp.octets_value(),
            None => self.authenticator.to_vec(),
        };
        crypto::verify_chap(password.as_bytes(), &chap_password, &challenge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DEFAULT_DICT;

    const AUTH: [u8; 16] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];
    const SECRET: &[u8] = b"mysecret";

    #[test]
    fn test_access_request_pap() {
        let mut request = Packet::new(PacketCode::AccessRequest, Arc::clone(&DEFAULT_DICT));
        request.add("User-Name", "alice").unwrap();
        request.add("User-Password", "hello").unwrap();

        let mut wire = Vec::new();
        request.encode_to(&mut wire, SECRET, 7, Some(AUTH)).unwrap();
        assert_eq!(request.identifier, 7);
        assert_eq!(request.authenticator, AUTH);
        assert_eq!(u16::from_be_bytes([wire[2], wire[3]]) as usize, wire.len());

        let mut cursor = Cursor::new(&wire[..]);
        let parsed =
            Packet::decode_from(&mut cursor, Arc::clone(&DEFAULT_DICT), SECRET, None).unwrap();
        assert_eq!(parsed.code, PacketCode::AccessRequest);
        assert_eq!(parsed.identifier, 7);
        assert_eq!(parsed.get_string("User-Name"), "alice");
        assert_eq!(parsed.get_string("User-Password"), "hello");
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_chap_verification() {
        let mut request = Packet::new(PacketCode::AccessRequest, Arc::clone(&DEFAULT_DICT));
        request.authenticator = AUTH;

        let mut ctx = md5::Context::new();
        ctx.consume([0x01]);
        ctx.consume(b"pwd");
        ctx.consume(AUTH);
        let mut chap = vec![0x01];
        chap.extend_from_slice(&ctx.compute().0);
        request.add("CHAP-Password", chap).unwrap();

        assert!(request.verify_chap("pwd"));
        assert!(!request.verify_chap("PWD"));
    }

    #[test]
    fn test_chap_prefers_challenge_attribute() {
        let mut request = Packet::new(PacketCode::AccessRequest, Arc::clone(&DEFAULT_DICT));
        request.authenticator = AUTH;
        let challenge = vec![0x55u8; 16];

        let mut ctx = md5::Context::new();
        ctx.consume([0x02]);
        ctx.consume(b"pwd");
        ctx.consume(&challenge[..]);
        let mut chap = vec![0x02];
        chap.extend_from_slice(&ctx.compute().0);

        request.add("CHAP-Password", chap).unwrap();
        request.add("CHAP-Challenge", challenge).unwrap();
        assert!(request.verify_chap("pwd"));
    }

    #[test]
    fn test_salted_tunnel_password_through_packet() {
        let mut request = Packet::new(PacketCode::AccessRequest, Arc::clone(&DEFAULT_DICT));
        request.add("Tunnel-Password", "top-secret:1").unwrap();

        let mut wire = Vec::new();
        request.encode_to(&mut wire, SECRET, 1, Some(AUTH)).unwrap();

        let mut cursor = Cursor::new(&wire[..]);
        let parsed =
            Packet::decode_from(&mut cursor, Arc::clone(&DEFAULT_DICT), SECRET, None).unwrap();
        let avp = parsed.get_avp("Tunnel-Password").unwrap();
        assert_eq!(avp.tag(), 1);
        assert_eq!(avp.string_value(), "top-secret");
    }

    #[test]
    fn test_concat_fragmentation_and_reassembly() {
        let payload: Vec<u8> = (0..600u32).map(|i| i as u8).collect();
        let mut request = Packet::new(PacketCode::AccessRequest, Arc::clone(&DEFAULT_DICT));
        request.add("EAP-Message", payload.clone()).unwrap();

        let mut wire = Vec::new();
        request.encode_to(&mut wire, SECRET, 3, Some(AUTH)).unwrap();

        // Three consecutive fragments of the same code on the wire.
        let mut fragments = 0;
        let mut offset = 20;
        while offset < wire.len() {
            assert_eq!(wire[offset], 79);
            fragments += 1;
            offset += wire[offset + 1] as usize;
        }
        assert_eq!(fragments, 3);

        let mut cursor = Cursor::new(&wire[..]);
        let parsed =
            Packet::decode_from(&mut cursor, Arc::clone(&DEFAULT_DICT), SECRET, None).unwrap();
        assert_eq!(parsed.get_all("EAP-Message").len(), 1);
        assert_eq!(parsed.get_octets("EAP-Message"), payload);
    }

    #[test]
    fn test_accounting_request_authenticator() {
        let mut request = Packet::new(PacketCode::AccountingRequest, Arc::clone(&DEFAULT_DICT));
        request.add("Acct-Status-Type", "Start").unwrap();
        request.add("Acct-Session-Id", "sess-1").unwrap();

        let mut wire = Vec::new();
        request.encode_to(&mut wire, SECRET, 9, None).unwrap();
        assert_eq!(&request.authenticator[..], &wire[4..20]);

        assert!(validate_request_authenticator(&wire, SECRET));
        let mut tampered = wire.clone();
        tampered[24] ^= 0x01;
        assert!(!validate_request_authenticator(&tampered, SECRET));
        assert!(!validate_request_authenticator(&wire, b"other"));
    }

    #[test]
    fn test_response_authenticator() {
        let mut request = Packet::new(PacketCode::AccessRequest, Arc::clone(&DEFAULT_DICT));
        request.add("User-Name", "alice").unwrap();
        let mut wire = Vec::new();
        request.encode_to(&mut wire, SECRET, 5, None).unwrap();

        let mut response = request.response(PacketCode::AccessAccept);
        response.add("Reply-Message", "welcome").unwrap();
        assert_eq!(response.identifier, 5);

        let mut wire = Vec::new();
        response.encode_to(&mut wire, SECRET, 0, None).unwrap();
        assert!(validate_response_authenticator(
            &wire,
            &request.authenticator,
            SECRET
        ));

        for i in 0..wire.len() {
            let mut tampered = wire.clone();
            tampered[i] ^= 0x80;
            assert!(!validate_response_authenticator(
                &tampered,
                &request.authenticator,
                SECRET
            ));
        }
    }

    #[test]
    fn test_message_api() {
        let mut packet = Packet::new(PacketCode::AccessRequest, Arc::clone(&DEFAULT_DICT));
        packet.add("User-Name", "alice").unwrap();
        packet.add("NAS-Port", 15).unwrap();
        packet.add("Class", vec![1u8, 2, 3]).unwrap();

        packet.add_if_not_present("User-Name", "bob").unwrap();
        assert_eq!(packet.get_all("User-Name").len(), 1);
        assert_eq!(packet.get_string("User-Name"), "alice");

        packet.replace("User-Name", "carol").unwrap();
        assert_eq!(packet.get_all("User-Name").len(), 1);
        assert_eq!(packet.get_string("User-Name"), "carol");

        packet.delete_all("Class");
        assert!(packet.get_avp("Class").is_none());

        // Convenience accessors return zero values on miss.
        assert_eq!(packet.get_string("Reply-Message"), "");
        assert_eq!(packet.get_int("Session-Timeout"), 0);
        assert_eq!(packet.get_ip("NAS-IP-Address"), crate::value::zero_ip());
        assert!(packet.get_octets("Class").is_empty());

        // Returned attributes are copies.
        let avp = packet.get_avp("User-Name").unwrap();
        drop(avp);
        assert_eq!(packet.get_string("User-Name"), "carol");
    }

    #[test]
    fn test_filtered_copy() {
        let mut packet = Packet::new(PacketCode::AccessRequest, Arc::clone(&DEFAULT_DICT));
        packet.add("User-Name", "alice").unwrap();
        packet.add("NAS-Port", 15).unwrap();
        packet.add("Calling-Station-Id", "00-11-22-33-44-55").unwrap();

        let positive = packet.copy(Some(&["User-Name", "NAS-Port"]), None);
        assert_eq!(positive.avps().len(), 2);
        assert_eq!(positive.avps()[0].name(), "User-Name");
        assert_eq!(positive.avps()[1].name(), "NAS-Port");

        let negative = packet.copy(None, Some(&["NAS-Port"]));
        assert_eq!(negative.avps().len(), 2);
        assert!(negative.get_avp("NAS-Port").is_none());

        let full = packet.copy(None, None);
        assert_eq!(full, packet);
    }

    #[test]
    fn test_get_path_single_segment_only() {
        let mut packet = Packet::new(PacketCode::AccessRequest, Arc::clone(&DEFAULT_DICT));
        packet.add("User-Name", "alice").unwrap();
        assert_eq!(packet.get_path("User-Name").unwrap().string_value(), "alice");
        assert!(packet.get_path("User-Name.Sub").is_none());
    }

    #[test]
    fn test_reject_unknown_packet_code() {
        let mut wire = vec![99u8, 0, 0, 20];
        wire.extend_from_slice(&[0; 16]);
        let mut cursor = Cursor::new(&wire[..]);
        assert!(matches!(
            Packet::decode_from(&mut cursor, Arc::clone(&DEFAULT_DICT), SECRET, None),
            Err(Error::DecodeError(_))
        ));
    }

    #[test]
    fn test_reject_bad_packet_length() {
        let mut wire = vec![1u8, 0, 0, 10];
        wire.extend_from_slice(&[0; 16]);
        let mut cursor = Cursor::new(&wire[..]);
        assert!(matches!(
            Packet::decode_from(&mut cursor, Arc::clone(&DEFAULT_DICT), SECRET, None),
            Err(Error::BadLength(_))
        ));
    }

    #[test]
    fn test_dictionary_miss_on_add() {
        let mut packet = Packet::new(PacketCode::AccessRequest, Arc::clone(&DEFAULT_DICT));
        assert!(matches!(
            packet.add("No-Such-Attribute", "x"),
            Err(Error::DictionaryMiss(_))
        ));
    }
}
