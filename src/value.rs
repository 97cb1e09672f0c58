//! Dynamically typed AVP values.
//!
//! Both protocols hold their attribute payloads in a single tagged enum.
//! Enumerated attributes are plain `I64` values; the dictionary provides the
//! string view. IPv6 prefixes, filter rules, Diameter identities and URIs are
//! held as `Utf8` (a prefix in `addr/len` form); the wire codecs parse and
//! format them. Unsigned64 is held inside `I64`, so values above `2^63 - 1`
//! are not representable.

use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::Ipv6Addr;

use crate::diameter;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Octets(Vec<u8>),
    Utf8(String),
    I64(i64),
    F64(f64),
    Ip(IpAddr),
    Time(DateTime<Utc>),
    Group(Vec<diameter::Avp>),
}

pub fn zero_time() -> DateTime<Utc> {
    Utc.timestamp_opt(0, 0).unwrap()
}

pub fn zero_ip() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

impl Value {
    /// String view. Octets render as lowercase hex, never as raw bytes.
    pub fn as_string(&self) -> String {
        match self {
            Value::Octets(b) => hex::encode(b),
            Value::Utf8(s) => s.clone(),
            Value::I64(v) => v.to_string(),
            Value::F64(v) => v.to_string(),
            Value::Ip(ip) => ip.to_string(),
            Value::Time(t) => t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            Value::Group(_) => String::new(),
        }
    }

    pub fn as_i64(&self) -> i64 {
        match self {
            Value::I64(v) => *v,
            Value::F64(v) => *v as i64,
            Value::Utf8(s) => s.parse().unwrap_or(0),
            _ => 0,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Value::F64(v) => *v,
            Value::I64(v) => *v as f64,
            Value::Utf8(s) => s.parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    pub fn as_octets(&self) -> Vec<u8> {
        match self {
            Value::Octets(b) => b.clone(),
            Value::Utf8(s) => s.as_bytes().to_vec(),
            _ => Vec::new(),
        }
    }

    pub fn as_ip(&self) -> IpAddr {
        match self {
            Value::Ip(ip) => *ip,
            Value::Utf8(s) => s.parse().unwrap_or_else(|_| zero_ip()),
            _ => zero_ip(),
        }
    }

    pub fn as_time(&self) -> DateTime<Utc> {
        match self {
            Value::Time(t) => *t,
            _ => zero_time(),
        }
    }

    pub fn as_group(&self) -> &[diameter::Avp] {
        match self {
            Value::Group(avps) => avps,
            _ => &[],
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Vec<diameter::Avp>> {
        match self {
            Value::Group(avps) => Some(avps),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Utf8(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Utf8(s)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I64(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::I64(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        // Truncates into the signed value space.
        Value::I64(v as i64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F64(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<IpAddr> for Value {
    fn from(ip: IpAddr) -> Self {
        Value::Ip(ip)
    }
}

impl From<Ipv4Addr> for Value {
    fn from(ip: Ipv4Addr) -> Self {
        Value::Ip(IpAddr::V4(ip))
    }
}

impl From<Ipv6Addr> for Value {
    fn from(ip: Ipv6Addr) -> Self {
        Value::Ip(IpAddr::V6(ip))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Octets(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Octets(b.to_vec())
    }
}

impl From<Vec<diameter::Avp>> for Value {
    fn from(avps: Vec<diameter::Avp>) -> Self {
        Value::Group(avps)
    }
}
