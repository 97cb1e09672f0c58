/*
 * RADIUS attribute format:
 *
 *  0                   1                   2
 *  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3
 * +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
 * |     Code      |    Length     |  Value ...
 * +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
 *
 * Vendor-specific attributes (code 26) nest one level:
 *
 * | 26 | Length | Vendor-Id (4) | Vendor-Code | Vendor-Len | Value ...
 *
 * The value region is, in order: optional tag byte, optional two salt
 * bytes, then the (possibly hidden) payload. Length counts everything
 * from Code onwards; there is no padding.
 */

use std::io::Read;
use std::io::Write;
use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::Ipv6Addr;
use std::sync::Arc;

use chrono::TimeZone;
use chrono::Utc;

use crate::dictionary::{Dictionary, RadiusAvpSpec, RadiusAvpType, UNKNOWN_RADIUS_SPEC};
use crate::error::{Error, Result};
use crate::radius::crypto;
use crate::value::Value;

pub const VENDOR_SPECIFIC: u8 = 26;

/// The largest payload chunk emitted for a concat attribute; keeps the
/// fragment AVP comfortably under the 255-byte length limit.
pub const CONCAT_CHUNK: usize = 240;

#[derive(Debug, Clone)]
pub struct Avp {
    code: u8,
    vendor_id: u32,
    tag: u8,
    value: Value,
    spec: Arc<RadiusAvpSpec>,
}

impl PartialEq for Avp {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
            && self.vendor_id == other.vendor_id
            && self.tag == other.tag
            && self.value == other.value
    }
}

impl Avp {
    /// Builds an attribute by dictionary name, coercing `value` to the
    /// declared type. Tagged attributes take a string of the form
    /// `"value:N"` with `N` in `[0, 31]`.
    pub fn new<V: Into<Value>>(name: &str, value: V, dict: &Dictionary) -> Result<Avp> {
        let spec = dict.radius_by_name(name)?;
        Avp::from_spec(spec, value.into())
    }

    pub(crate) fn from_spec(spec: Arc<RadiusAvpSpec>, value: Value) -> Result<Avp> {
        let (tag, raw) = if spec.tagged {
            match value {
                Value::Utf8(s) => {
                    let (v, tag) = split_tag(&s, &spec.name)?;
                    (tag, Value::Utf8(v))
                }
                _ => {
                    return Err(Error::BadType(format!(
                        "tagged attribute {} takes a \"value:tag\" string",
                        spec.name
                    )))
                }
            }
        } else {
            (0, value)
        };
        let value = coerce(&spec, raw)?;
        Ok(Avp {
            code: spec.code,
            vendor_id: spec.vendor_id,
            tag,
            value,
            spec,
        })
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn vendor_id(&self) -> u32 {
        self.vendor_id
    }

    pub fn tag(&self) -> u8 {
        self.tag
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn spec(&self) -> &Arc<RadiusAvpSpec> {
        &self.spec
    }

    pub(crate) fn set_value(&mut self, value: Value) {
        self.value = value;
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

    /// Decodes one attribute. `authenticator` is the hiding key source: the
    /// packet's own authenticator for requests, the request's authenticator
    /// for responses.
    pub fn decode_from<R: Read>(
        reader: &mut R,
        dict: &Dictionary,
        secret: &[u8],
        authenticator: &[u8; 16],
    ) -> Result<Avp> {
        let mut head = [0u8; 2];
        reader.read_exact(&mut head)?;
        let code = head[0];
        let length = head[1] as usize;
        if length < 2 {
            return Err(Error::BadLength(format!(
                "attribute {} declares length {}",
                code, length
            )));
        }
        let mut body = vec![0u8; length - 2];
        reader.read_exact(&mut body)?;

        let (vendor_id, code, payload) = if code == VENDOR_SPECIFIC {
            if body.len() < 6 {
                return Err(Error::BadLength("vendor-specific attribute too short".into()));
            }
            let vendor_id = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
            let vcode = body[4];
            let vlen = body[5] as usize;
            if vlen != length - 6 {
                return Err(Error::BadLength(format!(
                    "vendor length {} does not match attribute length {}",
                    vlen, length
                )));
            }
            (vendor_id, vcode, &body[6..])
        } else {
            (0, code, &body[..])
        };

        let spec = dict.radius_by_code(vendor_id, code);
        if Arc::ptr_eq(&spec, &UNKNOWN_RADIUS_SPEC) {
            log::debug!("unknown radius attribute {}/{}", vendor_id, code);
        }
        decode_payload(spec, vendor_id, code, payload, secret, authenticator)
    }

    /// Encodes one attribute (one fragment; concat splitting is the
    /// packet's job). Fails with `OversizedAvp` past 255 bytes.
    pub fn encode_to<W: Write>(
        &self,
        writer: &mut W,
        secret: &[u8],
        authenticator: &[u8; 16],
    ) -> Result<()> {
        let mut data = encode_value(&self.spec, self.tag, &self.value)?;

        let hidden = self.spec.salted || self.spec.encrypted;
        let salt = if self.spec.salted {
            crypto::random_salt().to_vec()
        } else {
            Vec::new()
        };
        if hidden {
            if self.spec.with_len {
                if data.len() > 255 {
                    return Err(Error::OversizedAvp(format!(
                        "{}: internal length prefix cannot express {} bytes",
                        self.spec.name,
                        data.len()
                    )));
                }
                let mut prefixed = Vec::with_capacity(data.len() + 1);
                prefixed.push(data.len() as u8);
                prefixed.extend_from_slice(&data);
                data = prefixed;
            }
            data = crypto::hide(&data, authenticator, secret, &salt);
        }

        let tag_len = if self.spec.tagged { 1 } else { 0 };
        let body_len = tag_len + salt.len() + data.len();
        let total = if self.vendor_id != 0 {
            8 + body_len
        } else {
            2 + body_len
        };
        if total > 255 {
            return Err(Error::OversizedAvp(format!(
                "{} would encode to {} bytes",
                self.spec.name, total
            )));
        }

        if self.vendor_id != 0 {
            writer.write_all(&[VENDOR_SPECIFIC, total as u8])?;
            writer.write_all(&self.vendor_id.to_be_bytes())?;
            writer.write_all(&[self.code, (total - 6) as u8])?;
        } else {
            writer.write_all(&[self.code, total as u8])?;
        }
        if self.spec.tagged {
            writer.write_all(&[self.tag])?;
        }
        writer.write_all(&salt)?;
        writer.write_all(&data)?;
        Ok(())
    }

    /// Total encoded size assuming no hiding-induced padding changes; used
    /// by the packet layer to decide concat splitting before encoding.
    pub(crate) fn is_concat(&self) -> bool {
        self.spec.concat
    }
}

fn split_tag(s: &str, name: &str) -> Result<(String, u8)> {
    let pos = s.rfind(':').ok_or_else(|| {
        Error::BadType(format!("tagged attribute {} is missing a :tag suffix", name))
    })?;
    let tag: u8 = s[pos + 1..]
        .parse()
        .map_err(|_| Error::BadType(format!("bad tag in {:?} for {}", s, name)))?;
    if tag > 31 {
        return Err(Error::BadType(format!("tag {} out of range for {}", tag, name)));
    }
    Ok((s[..pos].to_string(), tag))
}

/// Coerces a caller-supplied value to the dictionary type.
fn coerce(spec: &RadiusAvpSpec, value: Value) -> Result<Value> {
    let fail = |value: &Value| {
        Err(Error::BadType(format!(
            "{:?} does not fit attribute {} of type {:?}",
            value, spec.name, spec.avp_type
        )))
    };
    match spec.avp_type {
        RadiusAvpType::None | RadiusAvpType::Octets => match value {
            Value::Octets(_) => Ok(value),
            Value::Utf8(s) => match hex::decode(&s) {
                Ok(b) => Ok(Value::Octets(b)),
                Err(_) => fail(&Value::Utf8(s)),
            },
            other => fail(&other),
        },
        RadiusAvpType::String => match value {
            Value::Utf8(_) => Ok(value),
            other => fail(&other),
        },
        RadiusAvpType::Integer | RadiusAvpType::Integer64 => match value {
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
        RadiusAvpType::Address => match value {
            Value::Ip(IpAddr::V4(_)) => Ok(value),
            Value::Utf8(s) => match s.parse::<Ipv4Addr>() {
                Ok(ip) => Ok(Value::Ip(IpAddr::V4(ip))),
                Err(_) => fail(&Value::Utf8(s)),
            },
            other => fail(&other),
        },
        RadiusAvpType::IPv6Address => match value {
            Value::Ip(IpAddr::V6(_)) => Ok(value),
            Value::Utf8(s) => match s.parse::<Ipv6Addr>() {
                Ok(ip) => Ok(Value::Ip(IpAddr::V6(ip))),
                Err(_) => fail(&Value::Utf8(s)),
            },
            other => fail(&other),
        },
        RadiusAvpType::IPv6Prefix => match value {
            Value::Utf8(s) => {
                let (addr, len) = parse_ipv6_prefix(&s)?;
                Ok(Value::Utf8(format!("{}/{}", addr, len)))
            }
            other => fail(&other),
        },
        RadiusAvpType::InterfaceId => match value {
            Value::Octets(ref b) if b.len() == 8 => Ok(value),
            Value::Utf8(s) => match hex::decode(&s) {
                Ok(b) if b.len() == 8 => Ok(Value::Octets(b)),
                _ => fail(&Value::Utf8(s)),
            },
            other => fail(&other),
        },
        RadiusAvpType::Time => match value {
            Value::Time(_) => Ok(value),
            Value::Utf8(s) => match chrono::DateTime::parse_from_rfc3339(&s) {
                Ok(t) => Ok(Value::Time(t.with_timezone(&Utc))),
                Err(_) => fail(&Value::Utf8(s)),
            },
            other => fail(&other),
        },
    }
}

pub(crate) fn parse_ipv6_prefix(s: &str) -> Result<(Ipv6Addr, u8)> {
    let (addr, len) = s
        .split_once('/')
        .ok_or_else(|| Error::BadType(format!("ipv6 prefix {:?} is missing /len", s)))?;
    let addr: Ipv6Addr = addr
        .parse()
        .map_err(|_| Error::BadType(format!("bad ipv6 prefix address in {:?}", s)))?;
    let len: u8 = len
        .parse()
        .map_err(|_| Error::BadType(format!("bad ipv6 prefix length in {:?}", s)))?;
    if len > 128 {
        return Err(Error::BadType(format!("ipv6 prefix length {} > 128", len)));
    }
    Ok((addr, len))
}

fn decode_payload(
    spec: Arc<RadiusAvpSpec>,
    vendor_id: u32,
    code: u8,
    payload: &[u8],
    secret: &[u8],
    authenticator: &[u8; 16],
) -> Result<Avp> {
    let mut p = payload;

    let mut tag = 0u8;
    if spec.tagged {
        if p.is_empty() {
            return Err(Error::BadLength(format!("{}: no room for tag", spec.name)));
        }
        tag = p[0];
        p = &p[1..];
    }

    let hidden = spec.salted || spec.encrypted;
    let mut salt: &[u8] = &[];
    if spec.salted {
        if p.len() < 2 {
            return Err(Error::BadLength(format!("{}: no room for salt", spec.name)));
        }
        salt = &p[..2];
        p = &p[2..];
    }

    let plain;
    let data: &[u8] = if hidden {
        plain = crypto::unhide(p, authenticator, secret, salt)?;
        if spec.with_len {
            let n = *plain.first().ok_or_else(|| {
                Error::BadLength(format!("{}: empty hidden payload", spec.name))
            })? as usize;
            if n > plain.len() - 1 {
                return Err(Error::BadLength(format!(
                    "{}: internal length {} exceeds payload {}",
                    spec.name,
                    n,
                    plain.len() - 1
                )));
            }
            &plain[1..1 + n]
        } else if spec.avp_type == RadiusAvpType::String {
            // Without an internal length, hidden strings keep their block
            // padding; trim it so the semantic value is the password.
            let end = plain.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            &plain[..end]
        } else {
            &plain[..]
        }
    } else {
        p
    };

    let value = decode_value(&spec, data)?;
    Ok(Avp {
        code,
        vendor_id,
        tag,
        value,
        spec,
    })
}

fn decode_value(spec: &RadiusAvpSpec, data: &[u8]) -> Result<Value> {
    let want = |n: usize| -> Result<()> {
        if data.len() != n {
            return Err(Error::BadLength(format!(
                "{}: expected {} payload bytes, got {}",
                spec.name,
                n,
                data.len()
            )));
        }
        Ok(())
    };
    match spec.avp_type {
        RadiusAvpType::None | RadiusAvpType::Octets => Ok(Value::Octets(data.to_vec())),
        RadiusAvpType::String => match String::from_utf8(data.to_vec()) {
            Ok(s) => Ok(Value::Utf8(s)),
            Err(_) => Err(Error::BadType(format!("{}: payload is not utf-8", spec.name))),
        },
        RadiusAvpType::Integer => {
            if spec.tagged && !spec.salted {
                want(3)?;
                Ok(Value::I64(
                    u32::from_be_bytes([0, data[0], data[1], data[2]]) as i64,
                ))
            } else {
                want(4)?;
                Ok(Value::I64(
                    u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as i64,
                ))
            }
        }
        RadiusAvpType::Integer64 => {
            want(8)?;
            Ok(Value::I64(i64::from_be_bytes(data.try_into()?)))
        }
        RadiusAvpType::Address => {
            want(4)?;
            Ok(Value::Ip(IpAddr::V4(Ipv4Addr::new(
                data[0], data[1], data[2], data[3],
            ))))
        }
        RadiusAvpType::IPv6Address => {
            want(16)?;
            let octets: [u8; 16] = data.try_into()?;
            Ok(Value::Ip(IpAddr::V6(Ipv6Addr::from(octets))))
        }
        RadiusAvpType::IPv6Prefix => {
            want(18)?;
            let len = data[1];
            let octets: [u8; 16] = data[2..].try_into()?;
            Ok(Value::Utf8(format!("{}/{}", Ipv6Addr::from(octets), len)))
        }
        RadiusAvpType::InterfaceId => {
            want(8)?;
            Ok(Value::Octets(data.to_vec()))
        }
        RadiusAvpType::Time => {
            want(4)?;
            let secs = u32::from_be_bytes(data.try_into()?);
            Ok(Value::Time(Utc.timestamp_opt(secs as i64, 0).single().ok_or(
                Error::BadType(format!("{}: timestamp out of range", spec.name)),
            )?))
        }
    }
}

fn encode_value(spec: &RadiusAvpSpec, _tag: u8, value: &Value) -> Result<Vec<u8>> {
    match spec.avp_type {
        RadiusAvpType::None | RadiusAvpType::Octets | RadiusAvpType::InterfaceId => {
            Ok(value.as_octets())
        }
        RadiusAvpType::String => Ok(value.as_string().into_bytes()),
        RadiusAvpType::Integer => {
            let v = value.as_i64() as u32;
            if spec.tagged && !spec.salted {
                Ok(v.to_be_bytes()[1..].to_vec())
            } else {
                Ok(v.to_be_bytes().to_vec())
            }
        }
        RadiusAvpType::Integer64 => Ok(value.as_i64().to_be_bytes().to_vec()),
        RadiusAvpType::Address => match value.as_ip() {
            IpAddr::V4(ip) => Ok(ip.octets().to_vec()),
            IpAddr::V6(_) => Err(Error::BadType(format!(
                "{}: ipv6 address in an ipv4 attribute",
                spec.name
            ))),
        },
        RadiusAvpType::IPv6Address => match value.as_ip() {
            IpAddr::V6(ip) => Ok(ip.octets().to_vec()),
            IpAddr::V4(_) => Err(Error::BadType(format!(
                "{}: ipv4 address in an ipv6 attribute",
                spec.name
            ))),
        },
        RadiusAvpType::IPv6Prefix => {
            let (addr, len) = parse_ipv6_prefix(&value.as_string())?;
            let mut out = vec![0u8, len];
            out.extend_from_slice(&addr.octets());
            Ok(out)
        }
        RadiusAvpType::Time => {
            let secs = value.as_time().timestamp();
            if secs < 0 || secs > u32::MAX as i64 {
                return Err(Error::EncodeError(format!(
                    "{}: time does not fit in 32 bits",
                    spec.name
                )));
            }
            Ok((secs as u32).to_be_bytes().to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DEFAULT_DICT;
    use std::io::Cursor;

    const AUTH: [u8; 16] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];
    const SECRET: &[u8] = b"mysecret";

    fn roundtrip(avp: &Avp) -> Avp {
        let mut encoded = Vec::new();
        avp.encode_to(&mut encoded, SECRET, &AUTH).unwrap();
        let mut cursor = Cursor::new(&encoded);
        Avp::decode_from(&mut cursor, &DEFAULT_DICT, SECRET, &AUTH).unwrap()
    }

    #[test]
    fn test_string_roundtrip() {
        let avp = Avp::new("User-Name", "alice", &DEFAULT_DICT).unwrap();
        let out = roundtrip(&avp);
        assert_eq!(out, avp);
        assert_eq!(out.string_value(), "alice");
    }

    #[test]
    fn test_integer_and_enum() {
        let avp = Avp::new("Service-Type", "Framed-User", &DEFAULT_DICT).unwrap();
        assert_eq!(avp.i64_value(), 2);
        let out = roundtrip(&avp);
        assert_eq!(out.i64_value(), 2);
        assert_eq!(out.string_value(), "Framed-User");
    }

    #[test]
    fn test_address_roundtrip() {
        let avp = Avp::new("NAS-IP-Address", "192.168.0.1", &DEFAULT_DICT).unwrap();
        let out = roundtrip(&avp);
        assert_eq!(out.ip_value().to_string(), "192.168.0.1");
    }

    #[test]
    fn test_ipv6_prefix_roundtrip() {
        let avp = Avp::new("Framed-IPv6-Prefix", "fc66::/64", &DEFAULT_DICT).unwrap();
        let out = roundtrip(&avp);
        assert_eq!(out.string_value(), "fc66::/64");

        let mut encoded = Vec::new();
        avp.encode_to(&mut encoded, SECRET, &AUTH).unwrap();
        // code, length, reserved, prefix-len, 16 address bytes
        assert_eq!(encoded.len(), 20);
        assert_eq!(encoded[3], 64);
    }

    #[test]
    fn test_vendor_specific_framing() {
        let avp = Avp::new("Cisco-AVPair", "ssid=guest", &DEFAULT_DICT).unwrap();
        let mut encoded = Vec::new();
        avp.encode_to(&mut encoded, SECRET, &AUTH).unwrap();

        assert_eq!(encoded[0], VENDOR_SPECIFIC);
        assert_eq!(encoded[1] as usize, encoded.len());
        assert_eq!(u32::from_be_bytes([encoded[2], encoded[3], encoded[4], encoded[5]]), 9);
        assert_eq!(encoded[6], 1);
        assert_eq!(encoded[7] as usize, encoded.len() - 6);

        let mut cursor = Cursor::new(&encoded);
        let out = Avp::decode_from(&mut cursor, &DEFAULT_DICT, SECRET, &AUTH).unwrap();
        assert_eq!(out.name(), "Cisco-AVPair");
        assert_eq!(out.string_value(), "ssid=guest");
    }

    #[test]
    fn test_hidden_password() {
        let avp = Avp::new("User-Password", "hello", &DEFAULT_DICT).unwrap();
        let mut encoded = Vec::new();
        avp.encode_to(&mut encoded, SECRET, &AUTH).unwrap();
        // header + one keystream block
        assert_eq!(encoded.len(), 18);
        assert_ne!(&encoded[2..7], &b"hello"[..]);

        let mut cursor = Cursor::new(&encoded);
        let out = Avp::decode_from(&mut cursor, &DEFAULT_DICT, SECRET, &AUTH).unwrap();
        assert_eq!(out.string_value(), "hello");
    }

    #[test]
    fn test_salted_tunnel_password() {
        let avp = Avp::new("Tunnel-Password", "top-secret:1", &DEFAULT_DICT).unwrap();
        assert_eq!(avp.tag(), 1);

        let mut encoded = Vec::new();
        avp.encode_to(&mut encoded, SECRET, &AUTH).unwrap();
        // code, length, tag, salt(2), one hidden block
        assert_eq!(encoded.len(), 21);
        assert!(encoded[3] & 0x80 != 0);

        let mut cursor = Cursor::new(&encoded);
        let out = Avp::decode_from(&mut cursor, &DEFAULT_DICT, SECRET, &AUTH).unwrap();
        assert_eq!(out.tag(), 1);
        assert_eq!(out.string_value(), "top-secret");
    }

    #[test]
    fn test_tagged_integer_is_three_bytes() {
        for tag in [0u8, 0x1f] {
            let avp = Avp::new("Tunnel-Type", &format!("L2TP:{}", tag)[..], &DEFAULT_DICT).unwrap();
            let mut encoded = Vec::new();
            avp.encode_to(&mut encoded, SECRET, &AUTH).unwrap();
            // code, length, tag, then only three value bytes
            assert_eq!(encoded.len(), 6);
            assert_eq!(encoded[2], tag);
            assert_eq!(&encoded[3..], &[0, 0, 3]);

            let mut cursor = Cursor::new(&encoded);
            let out = Avp::decode_from(&mut cursor, &DEFAULT_DICT, SECRET, &AUTH).unwrap();
            assert_eq!(out.tag(), tag);
            assert_eq!(out.i64_value(), 3);
        }
    }

    #[test]
    fn test_tag_out_of_range() {
        assert!(matches!(
            Avp::new("Tunnel-Type", "L2TP:32", &DEFAULT_DICT),
            Err(Error::BadType(_))
        ));
        assert!(matches!(
            Avp::new("Tunnel-Type", "L2TP", &DEFAULT_DICT),
            Err(Error::BadType(_))
        ));
    }

    #[test]
    fn test_zero_length_octets() {
        let avp = Avp::new("Class", Vec::<u8>::new(), &DEFAULT_DICT).unwrap();
        let mut encoded = Vec::new();
        avp.encode_to(&mut encoded, SECRET, &AUTH).unwrap();
        assert_eq!(encoded, vec![25, 2]);

        let mut cursor = Cursor::new(&encoded);
        let out = Avp::decode_from(&mut cursor, &DEFAULT_DICT, SECRET, &AUTH).unwrap();
        assert!(out.octets_value().is_empty());
    }

    #[test]
    fn test_255_boundary() {
        // 253 payload bytes + 2 header bytes is exactly 255.
        let avp = Avp::new("Class", vec![0xab; 253], &DEFAULT_DICT).unwrap();
        let mut encoded = Vec::new();
        avp.encode_to(&mut encoded, SECRET, &AUTH).unwrap();
        assert_eq!(encoded.len(), 255);

        let avp = Avp::new("Class", vec![0xab; 254], &DEFAULT_DICT).unwrap();
        let mut encoded = Vec::new();
        assert!(matches!(
            avp.encode_to(&mut encoded, SECRET, &AUTH),
            Err(Error::OversizedAvp(_))
        ));
    }

    #[test]
    fn test_unknown_code_decodes_as_octets() {
        let _ = env_logger::builder().is_test(true).try_init();
        let data = [249u8, 5, 0xca, 0xfe, 0x99];
        let mut cursor = Cursor::new(&data[..]);
        let out = Avp::decode_from(&mut cursor, &DEFAULT_DICT, SECRET, &AUTH).unwrap();
        assert_eq!(out.name(), "UNKNOWN");
        assert_eq!(out.octets_value(), vec![0xca, 0xfe, 0x99]);
    }

    #[test]
    fn test_truncated_payload() {
        let data = [1u8, 9, b'a', b'b'];
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            Avp::decode_from(&mut cursor, &DEFAULT_DICT, SECRET, &AUTH),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_bad_type_on_construction() {
        assert!(matches!(
            Avp::new("NAS-Port", 3.5f64, &DEFAULT_DICT),
            Err(Error::BadType(_))
        ));
        assert!(matches!(
            Avp::new("NAS-IP-Address", "not-an-ip", &DEFAULT_DICT),
            Err(Error::BadType(_))
        ));
        assert!(matches!(
            Avp::new("Class", "zz-not-hex", &DEFAULT_DICT),
            Err(Error::BadType(_))
        ));
    }

    #[test]
    fn test_octets_accepts_hex_string() {
        let avp = Avp::new("Class", "cafe01", &DEFAULT_DICT).unwrap();
        assert_eq!(avp.octets_value(), vec![0xca, 0xfe, 0x01]);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_octets_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..=253)) {
                let avp = Avp::new("Class", bytes.clone(), &DEFAULT_DICT).unwrap();
                let out = roundtrip(&avp);
                prop_assert_eq!(out.octets_value(), bytes);
            }

            #[test]
            fn prop_hidden_string_roundtrip(s in "[ -~]{1,64}") {
                let avp = Avp::new("User-Password", s.as_str(), &DEFAULT_DICT).unwrap();
                let out = roundtrip(&avp);
                prop_assert_eq!(out.string_value(), s);
            }
        }
    }
}
