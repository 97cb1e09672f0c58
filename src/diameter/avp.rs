/*
 * AVP format:
 *   0                   1                   2                   3
 *   0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
 *  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
 *  |                           AVP Code                            |
 *  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
 *  |  Flags       |                 AVP Length                     |
 *  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
 *  |                         Vendor ID (optional)                  |
 *  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
 *  |                             Data ...          |    Padding    |
 *  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
 *
 * AVP Flags:
 *   0 1 2 3 4 5 6 7
 *  +-+-+-+-+-+-+-+-+  V(endor), M(andatory), P(rotected)
 *  |V M P r r r r r|  r(eserved)
 *  +-+-+-+-+-+-+-+-+
 *
 * The Length field excludes padding; the padding of each child is part of
 * a grouped parent's length.
 */

use std::io::Cursor;
use std::io::Read;
use std::io::Write;
use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::Ipv6Addr;
use std::sync::Arc;

use chrono::TimeZone;
use chrono::Utc;

use crate::dictionary::{Dictionary, DiameterAvpSpec, DiameterAvpType, UNKNOWN_DIAMETER_SPEC};
use crate::error::{Error, Result};
use crate::radius::avp::parse_ipv6_prefix;
use crate::value::Value;

/// AVP flag bits.
pub mod flags {
    pub const V: u8 = 0x80;
    pub const M: u8 = 0x40;
    pub const P: u8 = 0x20;
}

/// Seconds between 1900-01-01 and 1970-01-01; Diameter time counts from
/// the former.
const RFC868_OFFSET: i64 = 2208988800;

#[derive(Debug, Clone)]
pub struct Avp {
    code: u32,
    vendor_id: u32,
    mandatory: bool,
    private: bool,
    value: Value,
    spec: Arc<DiameterAvpSpec>,
}

impl PartialEq for Avp {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
            && self.vendor_id == other.vendor_id
            && self.mandatory == other.mandatory
            && self.private == other.private
            && self.value == other.value
    }
}

impl Avp {
    /// Builds an AVP by dictionary name, coercing `value` to the declared
    /// type. `avp_flags` is a combination of [`flags::M`] and [`flags::P`];
    /// the vendor bit follows the dictionary.
    pub fn new<V: Into<Value>>(
        name: &str,
        value: V,
        avp_flags: u8,
        dict: &Dictionary,
    ) -> Result<Avp> {
        let spec = dict.diameter_by_name(name)?;
        let value = coerce(&spec, value.into())?;
        Ok(Avp {
            code: spec.code,
            vendor_id: spec.vendor_id,
            mandatory: avp_flags & flags::M != 0,
            private: avp_flags & flags::P != 0,
            value,
            spec,
        })
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn vendor_id(&self) -> u32 {
        self.vendor_id
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn is_private(&self) -> bool {
        self.private
    }

    pub(crate) fn set_mandatory(&mut self, mandatory: bool) {
        self.mandatory = mandatory;
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn spec(&self) -> &Arc<DiameterAvpSpec> {
        &self.spec
    }

    /// String view; enumerated integers render as their dictionary name.
    pub fn string_value(&self) -> String {
        if let Value::I64(v) = self.value {
            if let Some(name) = self.spec.enum_name(v) {
                return name.to_string();
            }
        }
        self.value.as_string()
    }

    pub fn i64_value(&self) -> i64 {
        self.value.as_i64()
    }

    pub fn f64_value(&self) -> f64 {
        self.value.as_f64()
    }

    pub fn octets_value(&self) -> Vec<u8> {
        self.value.as_octets()
    }

    pub fn ip_value(&self) -> IpAddr {
        self.value.as_ip()
    }

    pub fn time_value(&self) -> chrono::DateTime<Utc> {
        self.value.as_time()
    }

    /// First child of a grouped AVP by name, as a copy.
    pub fn first_child(&self, name: &str) -> Option<Avp> {
        self.value
            .as_group()
            .iter()
            .find(|avp| avp.name() == name)
            .cloned()
    }

    /// Appends a child to a grouped AVP. The parent is left untouched when
    /// it is not grouped.
    pub fn push_child(&mut self, child: Avp) -> Result<()> {
        match self.value.as_group_mut() {
            Some(children) => {
                children.push(child);
                Ok(())
            }
            None => Err(Error::BadType(format!(
                "{} is not a grouped avp",
                self.spec.name
            ))),
        }
    }

    /// Header plus payload, excluding this AVP's own padding.
    pub fn length(&self) -> Result<u32> {
        let header = if self.vendor_id != 0 { 12 } else { 8 };
        Ok(header + payload_length(&self.spec, &self.value)?)
    }

    pub fn padding(&self) -> Result<u32> {
        Ok(pad_to_32_bits(payload_length(&self.spec, &self.value)?))
    }

    pub fn decode_from<R: Read>(reader: &mut R, dict: &Dictionary) -> Result<Avp> {
        let mut b = [0; 8];
        reader.read_exact(&mut b)?;

        let code = u32::from_be_bytes([b[0], b[1], b[2], b[3]]);
        let has_vendor = b[4] & flags::V != 0;
        let mandatory = b[4] & flags::M != 0;
        let private = b[4] & flags::P != 0;
        let length = u32::from_be_bytes([0, b[5], b[6], b[7]]);

        let vendor_id = if has_vendor {
            let mut b = [0; 4];
            reader.read_exact(&mut b)?;
            u32::from_be_bytes(b)
        } else {
            0
        };

        let header_length: u32 = if has_vendor { 12 } else { 8 };
        if length < header_length {
            return Err(Error::BadLength(format!(
                "avp {} declares length {}",
                code, length
            )));
        }
        let value_length = (length - header_length) as usize;
        let mut payload = vec![0u8; value_length];
        reader.read_exact(&mut payload)?;

        let spec = dict.diameter_by_code(vendor_id, code);
        if Arc::ptr_eq(&spec, &UNKNOWN_DIAMETER_SPEC) {
            log::debug!("unknown diameter avp {}/{}", vendor_id, code);
        }
        let value = decode_value(&spec, &payload, dict)?;

        // Padding to the next 32-bit boundary is not part of the length.
        let padding = pad_to_32_bits(value_length as u32);
        if padding > 0 {
            let mut pad = [0u8; 3];
            reader.read_exact(&mut pad[..padding as usize])?;
        }

        Ok(Avp {
            code,
            vendor_id,
            mandatory,
            private,
            value,
            spec,
        })
    }

    pub fn encode_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let length = self.length()?;
        if length > 0xFF_FFFF {
            return Err(Error::EncodeError(format!(
                "{}: length {} does not fit in 24 bits",
                self.spec.name, length
            )));
        }

        writer.write_all(&self.code.to_be_bytes())?;

        let mut flag_bits: u8 = 0;
        if self.vendor_id != 0 {
            flag_bits |= flags::V;
        }
        if self.mandatory {
            flag_bits |= flags::M;
        }
        if self.private {
            flag_bits |= flags::P;
        }
        writer.write_all(&[flag_bits])?;
        writer.write_all(&[(length >> 16) as u8, (length >> 8) as u8, length as u8])?;

        if self.vendor_id != 0 {
            writer.write_all(&self.vendor_id.to_be_bytes())?;
        }

        encode_value(&self.spec, &self.value, writer)?;

        let padding = self.padding()?;
        for _ in 0..padding {
            writer.write_all(&[0])?;
        }
        Ok(())
    }
}

fn pad_to_32_bits(length: u32) -> u32 {
    (4 - (length & 0b11)) % 4
}

fn payload_length(spec: &DiameterAvpSpec, value: &Value) -> Result<u32> {
    let len = match spec.avp_type {
        DiameterAvpType::None | DiameterAvpType::OctetString => value.as_octets().len() as u32,
        DiameterAvpType::UTF8String
        | DiameterAvpType::DiameterIdentity
        | DiameterAvpType::DiameterURI
        | DiameterAvpType::IPFilterRule => value.as_string().len() as u32,
        DiameterAvpType::Integer32
        | DiameterAvpType::Unsigned32
        | DiameterAvpType::Enumerated
        | DiameterAvpType::Float32
        | DiameterAvpType::Time => 4,
        DiameterAvpType::Integer64 | DiameterAvpType::Unsigned64 | DiameterAvpType::Float64 => 8,
        DiameterAvpType::Address => match value.as_ip() {
            IpAddr::V4(_) => 6,
            IpAddr::V6(_) => 18,
        },
        DiameterAvpType::IPv4Address => 4,
        DiameterAvpType::IPv6Address => 16,
        DiameterAvpType::IPv6Prefix => 18,
        DiameterAvpType::Grouped => {
            let mut total = 0u32;
            for child in value.as_group() {
                total += child.length()? + child.padding()?;
            }
            total
        }
    };
    Ok(len)
}

fn decode_value(spec: &DiameterAvpSpec, payload: &[u8], dict: &Dictionary) -> Result<Value> {
    let want = |n: usize| -> Result<()> {
        if payload.len() != n {
            return Err(Error::BadLength(format!(
                "{}: expected {} payload bytes, got {}",
                spec.name,
                n,
                payload.len()
            )));
        }
        Ok(())
    };
    match spec.avp_type {
        DiameterAvpType::None | DiameterAvpType::OctetString => {
            Ok(Value::Octets(payload.to_vec()))
        }
        DiameterAvpType::UTF8String
        | DiameterAvpType::DiameterIdentity
        | DiameterAvpType::DiameterURI
        | DiameterAvpType::IPFilterRule => match String::from_utf8(payload.to_vec()) {
            Ok(s) => Ok(Value::Utf8(s)),
            Err(_) => Err(Error::BadType(format!("{}: payload is not utf-8", spec.name))),
        },
        DiameterAvpType::Integer32 => {
            want(4)?;
            Ok(Value::I64(i32::from_be_bytes(payload.try_into()?) as i64))
        }
        DiameterAvpType::Unsigned32 | DiameterAvpType::Enumerated => {
            want(4)?;
            Ok(Value::I64(u32::from_be_bytes(payload.try_into()?) as i64))
        }
        DiameterAvpType::Integer64 => {
            want(8)?;
            Ok(Value::I64(i64::from_be_bytes(payload.try_into()?)))
        }
        DiameterAvpType::Unsigned64 => {
            want(8)?;
            // Held in the signed value space; the upper half folds over.
            Ok(Value::I64(u64::from_be_bytes(payload.try_into()?) as i64))
        }
        DiameterAvpType::Float32 => {
            want(4)?;
            Ok(Value::F64(f32::from_be_bytes(payload.try_into()?) as f64))
        }
        DiameterAvpType::Float64 => {
            want(8)?;
            Ok(Value::F64(f64::from_be_bytes(payload.try_into()?)))
        }
        DiameterAvpType::Address => {
            if payload.len() < 2 {
                return Err(Error::BadLength(format!("{}: address too short", spec.name)));
            }
            let family = u16::from_be_bytes([payload[0], payload[1]]);
            let addr = &payload[2..];
            match family {
                1 => {
                    let octets: [u8; 4] = addr
                        .try_into()
                        .map_err(|_| Error::BadLength(format!("{}: bad ipv4 address", spec.name)))?;
                    Ok(Value::Ip(IpAddr::V4(Ipv4Addr::from(octets))))
                }
                2 => {
                    let octets: [u8; 16] = addr
                        .try_into()
                        .map_err(|_| Error::BadLength(format!("{}: bad ipv6 address", spec.name)))?;
                    Ok(Value::Ip(IpAddr::V6(Ipv6Addr::from(octets))))
                }
                other => Err(Error::BadType(format!(
                    "{}: unknown address family {}",
                    spec.name, other
                ))),
            }
        }
        DiameterAvpType::IPv4Address => {
            want(4)?;
            let octets: [u8; 4] = payload.try_into()?;
            Ok(Value::Ip(IpAddr::V4(Ipv4Addr::from(octets))))
        }
        DiameterAvpType::IPv6Address => {
            want(16)?;
            let octets: [u8; 16] = payload.try_into()?;
            Ok(Value::Ip(IpAddr::V6(Ipv6Addr::from(octets))))
        }
        DiameterAvpType::Time => {
            want(4)?;
            let since_1900 = u32::from_be_bytes(payload.try_into()?);
            let unix = since_1900 as i64 - RFC868_OFFSET;
            let timestamp = Utc
                .timestamp_opt(unix, 0)
                .single()
                .ok_or_else(|| Error::BadType(format!("{}: timestamp out of range", spec.name)))?;
            Ok(Value::Time(timestamp))
        }
        DiameterAvpType::IPv6Prefix => {
            want(18)?;
            let len = payload[1];
            let octets: [u8; 16] = payload[2..].try_into()?;
            Ok(Value::Utf8(format!("{}/{}", Ipv6Addr::from(octets), len)))
        }
        DiameterAvpType::Grouped => {
            let mut avps = Vec::new();
            let mut cursor = Cursor::new(payload);
            let mut offset = 0usize;
            while offset < payload.len() {
                let avp = Avp::decode_from(&mut cursor, dict)?;
                offset += avp.length()? as usize;
                offset += avp.padding()? as usize;
                avps.push(avp);
            }
            // sanity check, make sure the children fill the group exactly
            if offset != payload.len() {
                return Err(Error::BadLength(format!(
                    "{}: grouped children span {} of {} bytes",
                    spec.name,
                    offset,
                    payload.len()
                )));
            }
            Ok(Value::Group(avps))
        }
    }
}

fn encode_value<W: Write>(spec: &DiameterAvpSpec, value: &Value, writer: &mut W) -> Result<()> {
    match spec.avp_type {
        DiameterAvpType::None | DiameterAvpType::OctetString => {
            writer.write_all(&value.as_octets())?;
        }
        DiameterAvpType::UTF8String
        | DiameterAvpType::DiameterIdentity
        | DiameterAvpType::DiameterURI
        | DiameterAvpType::IPFilterRule => {
            writer.write_all(value.as_string().as_bytes())?;
        }
        DiameterAvpType::Integer32 => {
            writer.write_all(&(value.as_i64() as i32).to_be_bytes())?;
        }
        DiameterAvpType::Unsigned32 | DiameterAvpType::Enumerated => {
            writer.write_all(&(value.as_i64() as u32).to_be_bytes())?;
        }
        DiameterAvpType::Integer64 => {
            writer.write_all(&value.as_i64().to_be_bytes())?;
        }
        DiameterAvpType::Unsigned64 => {
            writer.write_all(&(value.as_i64() as u64).to_be_bytes())?;
        }
        DiameterAvpType::Float32 => {
            writer.write_all(&(value.as_f64() as f32).to_be_bytes())?;
        }
        DiameterAvpType::Float64 => {
            writer.write_all(&value.as_f64().to_be_bytes())?;
        }
        DiameterAvpType::Address => match value.as_ip() {
            IpAddr::V4(ip) => {
                writer.write_all(&1u16.to_be_bytes())?;
                writer.write_all(&ip.octets())?;
            }
            IpAddr::V6(ip) => {
                writer.write_all(&2u16.to_be_bytes())?;
                writer.write_all(&ip.octets())?;
            }
        },
        DiameterAvpType::IPv4Address => match value.as_ip() {
            IpAddr::V4(ip) => writer.write_all(&ip.octets())?,
            IpAddr::V6(_) => {
                return Err(Error::BadType(format!(
                    "{}: ipv6 address in an ipv4 attribute",
                    spec.name
                )))
            }
        },
        DiameterAvpType::IPv6Address => match value.as_ip() {
            IpAddr::V6(ip) => writer.write_all(&ip.octets())?,
            IpAddr::V4(_) => {
                return Err(Error::BadType(format!(
                    "{}: ipv4 address in an ipv6 attribute",
                    spec.name
                )))
            }
        },
        DiameterAvpType::Time => {
            let since_1900 = value.as_time().timestamp() + RFC868_OFFSET;
            if since_1900 < 0 || since_1900 > u32::MAX as i64 {
                return Err(Error::EncodeError(format!(
                    "{}: time does not fit in 32 bits",
                    spec.name
                )));
            }
            writer.write_all(&(since_1900 as u32).to_be_bytes())?;
        }
        DiameterAvpType::IPv6Prefix => {
            let (addr, len) = parse_ipv6_prefix(&value.as_string())?;
            writer.write_all(&[0, len])?;
            writer.write_all(&addr.octets())?;
        }
        DiameterAvpType::Grouped => {
            for child in value.as_group() {
                child.encode_to(writer)?;
            }
        }
    }
    Ok(())
}

/// Coerces a caller-supplied value to the dictionary type.
fn coerce(spec: &DiameterAvpSpec, value: Value) -> Result<Value> {
    let fail = |value: &Value| {
        Err(Error::BadType(format!(
            "{:?} does not fit avp {} of type {:?}",
            value, spec.name, spec.avp_type
        )))
    };
    match spec.avp_type {
        DiameterAvpType::None | DiameterAvpType::OctetString => match value {
            Value::Octets(_) => Ok(value),
            Value::Utf8(s) => match hex::decode(&s) {
                Ok(b) => Ok(Value::Octets(b)),
                Err(_) => fail(&Value::Utf8(s)),
            },
            other => fail(&other),
        },
        DiameterAvpType::UTF8String
        | DiameterAvpType::DiameterIdentity
        | DiameterAvpType::DiameterURI
        | DiameterAvpType::IPFilterRule => match value {
            Value::Utf8(_) => Ok(value),
            other => fail(&other),
        },
        DiameterAvpType::Integer32
        | DiameterAvpType::Integer64
        | DiameterAvpType::Unsigned32
        | DiameterAvpType::Unsigned64 => match value {
            Value::I64(_) => Ok(value),
            Value::Utf8(s) => match s.parse::<i64>() {
                Ok(v) => Ok(Value::I64(v)),
                Err(_) => fail(&Value::Utf8(s)),
            },
            other => fail(&other),
        },
        DiameterAvpType::Enumerated => match value {
            Value::I64(_) => Ok(value),
            Value::Utf8(s) => {
                if let Some(v) = spec.enum_value(&s) {
                    return Ok(Value::I64(v));
                }
                match s.parse::<i64>() {
                    Ok(v) => Ok(Value::I64(v)),
                    Err(_) => fail(&Value::Utf8(s)),
                }
            }
            other => fail(&other),
        },
        DiameterAvpType::Float32 | DiameterAvpType::Float64 => match value {
            Value::F64(_) => Ok(value),
            Value::I64(v) => Ok(Value::F64(v as f64)),
            other => fail(&other),
        },
        DiameterAvpType::Address => match value {
            Value::Ip(_) => Ok(value),
            Value::Utf8(s) => match s.parse::<IpAddr>() {
                Ok(ip) => Ok(Value::Ip(ip)),
                Err(_) => fail(&Value::Utf8(s)),
            },
            other => fail(&other),
        },
        DiameterAvpType::IPv4Address => match value {
            Value::Ip(IpAddr::V4(_)) => Ok(value),
            Value::Utf8(s) => match s.parse::<Ipv4Addr>() {
                Ok(ip) => Ok(Value::Ip(IpAddr::V4(ip))),
                Err(_) => fail(&Value::Utf8(s)),
            },
            other => fail(&other),
        },
        DiameterAvpType::IPv6Address => match value {
            Value::Ip(IpAddr::V6(_)) => Ok(value),
            Value::Utf8(s) => match s.parse::<Ipv6Addr>() {
                Ok(ip) => Ok(Value::Ip(IpAddr::V6(ip))),
                Err(_) => fail(&Value::Utf8(s)),
            },
            other => fail(&other),
        },
        DiameterAvpType::Time => match value {
            Value::Time(_) => Ok(value),
            Value::Utf8(s) => match chrono::DateTime::parse_from_rfc3339(&s) {
                Ok(t) => Ok(Value::Time(t.with_timezone(&Utc))),
                Err(_) => fail(&Value::Utf8(s)),
            },
            other => fail(&other),
        },
        DiameterAvpType::IPv6Prefix => match value {
            Value::Utf8(s) => {
                let (addr, len) = parse_ipv6_prefix(&s)?;
                Ok(Value::Utf8(format!("{}/{}", addr, len)))
            }
            other => fail(&other),
        },
        DiameterAvpType::Grouped => match value {
            Value::Group(_) => Ok(value),
            other => fail(&other),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DEFAULT_DICT;

    fn roundtrip(avp: &Avp) -> Avp {
        let mut encoded = Vec::new();
        avp.encode_to(&mut encoded).unwrap();
        assert_eq!(encoded.len() % 4, 0);
        let mut cursor = Cursor::new(&encoded);
        Avp::decode_from(&mut cursor, &DEFAULT_DICT).unwrap()
    }

    #[test]
    fn test_utf8_roundtrip_with_padding() {
        let avp = Avp::new("Session-Id", "ses;12345888", flags::M, &DEFAULT_DICT).unwrap();
        let out = roundtrip(&avp);
        assert_eq!(out, avp);
        assert_eq!(out.string_value(), "ses;12345888");
        assert!(out.is_mandatory());

        // 13 payload bytes leave three bytes of padding.
        let avp = Avp::new("Session-Id", "ses;123456888", flags::M, &DEFAULT_DICT).unwrap();
        assert_eq!(avp.length().unwrap(), 21);
        assert_eq!(avp.padding().unwrap(), 3);
        let out = roundtrip(&avp);
        assert_eq!(out.string_value(), "ses;123456888");
    }

    #[test]
    fn test_unsigned32_roundtrip() {
        let avp = Avp::new("Result-Code", 2001u32, flags::M, &DEFAULT_DICT).unwrap();
        let out = roundtrip(&avp);
        assert_eq!(out.i64_value(), 2001);
    }

    #[test]
    fn test_unsigned32_high_bit() {
        let avp = Avp::new("Result-Code", 0xFFFF_FFFEu32, 0, &DEFAULT_DICT).unwrap();
        let out = roundtrip(&avp);
        assert_eq!(out.i64_value(), 0xFFFF_FFFE);
    }

    #[test]
    fn test_enumerated_by_name() {
        let avp = Avp::new("CC-Request-Type", "INITIAL_REQUEST", flags::M, &DEFAULT_DICT).unwrap();
        assert_eq!(avp.i64_value(), 1);
        let out = roundtrip(&avp);
        assert_eq!(out.string_value(), "INITIAL_REQUEST");
    }

    #[test]
    fn test_vendor_avp_header() {
        let avp = Avp::new("TGPP-Charging-Id", vec![1u8, 2, 3, 4], flags::M, &DEFAULT_DICT)
            .unwrap();
        let mut encoded = Vec::new();
        avp.encode_to(&mut encoded).unwrap();

        assert_eq!(encoded[4] & flags::V, flags::V);
        assert_eq!(
            u32::from_be_bytes([encoded[8], encoded[9], encoded[10], encoded[11]]),
            10415
        );
        assert_eq!(avp.length().unwrap(), 16);

        let mut cursor = Cursor::new(&encoded);
        let out = Avp::decode_from(&mut cursor, &DEFAULT_DICT).unwrap();
        assert_eq!(out.name(), "TGPP-Charging-Id");
        assert_eq!(out.vendor_id(), 10415);
    }

    #[test]
    fn test_address_families() {
        let avp = Avp::new("Host-IP-Address", "10.0.0.1", flags::M, &DEFAULT_DICT).unwrap();
        assert_eq!(avp.length().unwrap(), 14);
        let out = roundtrip(&avp);
        assert_eq!(out.ip_value().to_string(), "10.0.0.1");

        let avp = Avp::new("Host-IP-Address", "fc66::1", flags::M, &DEFAULT_DICT).unwrap();
        assert_eq!(avp.length().unwrap(), 26);
        let out = roundtrip(&avp);
        assert_eq!(out.ip_value().to_string(), "fc66::1");
    }

    #[test]
    fn test_time_is_seconds_since_1900() {
        let t = Utc.with_ymd_and_hms(2024, 1, 10, 10, 35, 58).unwrap();
        let avp = Avp::new("Event-Timestamp", t, 0, &DEFAULT_DICT).unwrap();
        let mut encoded = Vec::new();
        avp.encode_to(&mut encoded).unwrap();
        let wire = u32::from_be_bytes([encoded[8], encoded[9], encoded[10], encoded[11]]);
        assert_eq!(wire as i64, t.timestamp() + RFC868_OFFSET);

        let out = roundtrip(&avp);
        assert_eq!(out.time_value(), t);
    }

    #[test]
    fn test_grouped_roundtrip() {
        let inner = vec![
            Avp::new("Subscription-Id-Type", "END_USER_E164", flags::M, &DEFAULT_DICT).unwrap(),
            Avp::new("Subscription-Id-Data", "34617123456", flags::M, &DEFAULT_DICT).unwrap(),
        ];
        let avp = Avp::new("Subscription-Id", inner, flags::M, &DEFAULT_DICT).unwrap();

        let out = roundtrip(&avp);
        assert_eq!(out, avp);
        let children = out.value().as_group();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name(), "Subscription-Id-Type");
        assert_eq!(
            out.first_child("Subscription-Id-Data").unwrap().string_value(),
            "34617123456"
        );
    }

    #[test]
    fn test_grouped_length_includes_child_padding() {
        let inner = vec![
            // 8 header + 1 payload byte, padded to 12 on the wire.
            Avp::new("Session-Id", "x", flags::M, &DEFAULT_DICT).unwrap(),
        ];
        let avp = Avp::new("Subscription-Id", inner, flags::M, &DEFAULT_DICT).unwrap();
        assert_eq!(avp.length().unwrap(), 8 + 12);
    }

    #[test]
    fn test_24_bit_length_high_byte() {
        let big = vec![0xabu8; 70_000];
        let avp = Avp::new("Class", big.clone(), 0, &DEFAULT_DICT).unwrap();
        let length = avp.length().unwrap();
        assert_eq!(length, 70_008);

        let mut encoded = Vec::new();
        avp.encode_to(&mut encoded).unwrap();
        // 24-bit big-endian split: high byte is length >> 16.
        assert_eq!(encoded[5], (length >> 16) as u8);
        assert_eq!(encoded[6], (length >> 8) as u8);
        assert_eq!(encoded[7], length as u8);

        let mut cursor = Cursor::new(&encoded);
        let out = Avp::decode_from(&mut cursor, &DEFAULT_DICT).unwrap();
        assert_eq!(out.octets_value(), big);
    }

    #[test]
    fn test_unknown_avp_decodes_as_octets() {
        let _ = env_logger::builder().is_test(true).try_init();
        let data = [
            0x00, 0x00, 0xff, 0x00, // code 65280
            0x00, 0x00, 0x00, 0x0a, // flags, length 10
            0xca, 0xfe, 0x00, 0x00, // two payload bytes, two padding
        ];
        let mut cursor = Cursor::new(&data[..]);
        let out = Avp::decode_from(&mut cursor, &DEFAULT_DICT).unwrap();
        assert_eq!(out.name(), "UNKNOWN");
        assert_eq!(out.octets_value(), vec![0xca, 0xfe]);
    }

    #[test]
    fn test_truncated_avp() {
        let data = [
            0x00, 0x00, 0x01, 0x07, // code 263
            0x40, 0x00, 0x00, 0x10, // flags, length 16
            0x61, 0x62, // short payload
        ];
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            Avp::decode_from(&mut cursor, &DEFAULT_DICT),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_group_length_mismatch() {
        // Subscription-Id (grouped) declaring 10 payload bytes that do not
        // contain a whole child AVP.
        let data = [
            0x00, 0x00, 0x01, 0xbb, // code 443
            0x40, 0x00, 0x00, 0x12, // flags, length 18
            0x00, 0x00, 0x01, 0xc2, // child code 450
            0x40, 0x00, 0x00, 0x0c, // child flags, child length 12
            0x00, 0x00, // truncated child payload
        ];
        let mut cursor = Cursor::new(&data[..]);
        assert!(Avp::decode_from(&mut cursor, &DEFAULT_DICT).is_err());
    }

    #[test]
    fn test_bad_type_on_construction() {
        assert!(matches!(
            Avp::new("Session-Id", 42i64, 0, &DEFAULT_DICT),
            Err(Error::BadType(_))
        ));
        assert!(matches!(
            Avp::new("Result-Code", 3.25f64, 0, &DEFAULT_DICT),
            Err(Error::BadType(_))
        ));
        assert!(matches!(
            Avp::new("Subscription-Id", "not-a-group", 0, &DEFAULT_DICT),
            Err(Error::BadType(_))
        ));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_utf8_roundtrip(s in "[ -~]{0,64}") {
                let avp = Avp::new("Session-Id", s.as_str(), flags::M, &DEFAULT_DICT).unwrap();
                let out = roundtrip(&avp);
                prop_assert_eq!(out.string_value(), s);
            }

            #[test]
            fn prop_unsigned32_roundtrip(v in any::<u32>()) {
                let avp = Avp::new("Result-Code", v, 0, &DEFAULT_DICT).unwrap();
                let out = roundtrip(&avp);
                prop_assert_eq!(out.i64_value(), v as i64);
            }
        }
    }

    #[test]
    fn test_push_child() {
        let mut group = Avp::new("Subscription-Id", Vec::<Avp>::new(), flags::M, &DEFAULT_DICT)
            .unwrap();
        let child =
            Avp::new("Subscription-Id-Type", "END_USER_IMSI", flags::M, &DEFAULT_DICT).unwrap();
        group.push_child(child).unwrap();
        assert_eq!(group.value().as_group().len(), 1);

        let mut scalar = Avp::new("Session-Id", "s", 0, &DEFAULT_DICT).unwrap();
        let child =
            Avp::new("Subscription-Id-Type", "END_USER_IMSI", flags::M, &DEFAULT_DICT).unwrap();
        assert!(scalar.push_child(child).is_err());
        assert_eq!(scalar.string_value(), "s");
    }
}
