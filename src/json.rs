//! JSON interchange for attributes, packets and messages.
//!
//! An AVP is a single-property object `{"<Name>": <value>}` whose value form
//! follows the dictionary type: strings for string-ish types, hex for octets,
//! numbers for integers and floats, RFC 3339 for time, nested arrays of AVP
//! objects for grouped AVPs. Tagged RADIUS attributes render as
//! `"value:tag"`. Enumerated integers render as their dictionary name when
//! one exists and are accepted in either form on load.
//!
//! Loading goes through the same construction path as the programmatic API,
//! so values are validated against the dictionary; messages named by
//! application/command name get their codes tidied from the dictionary.

use serde_json::json;
use serde_json::Value as Json;
use std::sync::Arc;

use crate::diameter::{self, DiameterMessage};
use crate::dictionary::{Dictionary, DiameterAvpType, RadiusAvpType};
use crate::error::{Error, Result};
use crate::radius::{self, Packet, PacketCode};
use crate::value::Value;

fn value_from_json(v: &Json) -> Result<Value> {
    match v {
        Json::String(s) => Ok(Value::Utf8(s.clone())),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::I64(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::I64(u as i64))
            } else {
                Ok(Value::F64(n.as_f64().unwrap_or(0.0)))
            }
        }
        other => Err(Error::BadType(format!(
            "unsupported json value {} for an attribute",
            other
        ))),
    }
}

fn single_property(v: &Json) -> Result<(&String, &Json)> {
    let object = v
        .as_object()
        .ok_or_else(|| Error::DecodeError(format!("avp json must be an object, got {}", v)))?;
    if object.len() != 1 {
        return Err(Error::DecodeError(format!(
            "avp json must have exactly one property, got {}",
            object.len()
        )));
    }
    Ok(object.iter().next().expect("one property"))
}

impl radius::Avp {
    pub fn to_json(&self) -> Json {
        let spec = self.spec();
        let value = if spec.tagged {
            json!(format!("{}:{}", self.string_value(), self.tag()))
        } else {
            match spec.avp_type {
                RadiusAvpType::Integer | RadiusAvpType::Integer64 => {
                    match spec.enum_name(self.i64_value()) {
                        Some(name) => json!(name),
                        None => json!(self.i64_value()),
                    }
                }
                _ => json!(self.string_value()),
            }
        };
        json!({ self.name(): value })
    }

    pub fn from_json(v: &Json, dict: &Dictionary) -> Result<radius::Avp> {
        let (name, value) = single_property(v)?;
        radius::Avp::new(name, value_from_json(value)?, dict)
    }
}

impl Packet {
    pub fn to_json(&self) -> Json {
        json!({
            "Code": self.code as u8,
            "Identifier": self.identifier,
            "Authenticator": hex::encode(self.authenticator),
            "avps": self.avps().iter().map(|avp| avp.to_json()).collect::<Vec<_>>(),
        })
    }

    pub fn from_json(v: &Json, dict: Arc<Dictionary>) -> Result<Packet> {
        let object = v
            .as_object()
            .ok_or_else(|| Error::DecodeError("packet json must be an object".into()))?;

        let code = object
            .get("Code")
            .and_then(|c| c.as_u64())
            .ok_or_else(|| Error::DecodeError("packet json needs a numeric Code".into()))?;
        let code = PacketCode::from_u8(code as u8)
            .ok_or_else(|| Error::DecodeError(format!("unknown packet code {}", code)))?;

        let mut packet = Packet::new(code, dict);
        if let Some(id) = object.get("Identifier").and_then(|i| i.as_u64()) {
            packet.identifier = id as u8;
        }
        if let Some(auth) = object.get("Authenticator").and_then(|a| a.as_str()) {
            let bytes = hex::decode(auth)
                .map_err(|_| Error::BadType("authenticator is not hex".into()))?;
            let bytes: [u8; 16] = bytes
                .as_slice()
                .try_into()
                .map_err(|_| Error::BadLength("authenticator must be 16 bytes".into()))?;
            packet.authenticator = bytes;
        }
        if let Some(avps) = object.get("avps").and_then(|a| a.as_array()) {
            for avp in avps {
                let avp = radius::Avp::from_json(avp, packet.dict())?;
                packet.add_avp(avp);
            }
        }
        Ok(packet)
    }
}

impl diameter::Avp {
    pub fn to_json(&self) -> Json {
        let spec = self.spec();
        let value = match spec.avp_type {
            DiameterAvpType::Grouped => Json::Array(
                self.value()
                    .as_group()
                    .iter()
                    .map(|child| child.to_json())
                    .collect(),
            ),
            DiameterAvpType::Integer32
            | DiameterAvpType::Integer64
            | DiameterAvpType::Unsigned32
            | DiameterAvpType::Unsigned64
            | DiameterAvpType::Enumerated => match spec.enum_name(self.i64_value()) {
                Some(name) => json!(name),
                None => json!(self.i64_value()),
            },
            DiameterAvpType::Float32 | DiameterAvpType::Float64 => json!(self.f64_value()),
            _ => json!(self.string_value()),
        };
        json!({ self.name(): value })
    }

    pub fn from_json(v: &Json, dict: &Dictionary) -> Result<diameter::Avp> {
        let (name, value) = single_property(v)?;
        let value = match value {
            Json::Array(children) => {
                let mut avps = Vec::with_capacity(children.len());
                for child in children {
                    avps.push(diameter::Avp::from_json(child, dict)?);
                }
                Value::Group(avps)
            }
            other => value_from_json(other)?,
        };
        diameter::Avp::new(name, value, 0, dict)
    }
}

impl DiameterMessage {
    pub fn to_json(&self) -> Json {
        let mut object = serde_json::Map::new();
        object.insert("IsRequest".into(), json!(self.flags.request));
        object.insert("IsProxyable".into(), json!(self.flags.proxyable));
        object.insert("IsError".into(), json!(self.flags.error));
        object.insert("IsRetransmission".into(), json!(self.flags.retransmit));
        object.insert("CommandCode".into(), json!(self.command_code));
        object.insert("ApplicationId".into(), json!(self.application_id));
        if let Some(name) = self.command_name() {
            object.insert("CommandName".into(), json!(name));
        }
        if let Some(name) = self.application_name() {
            object.insert("ApplicationName".into(), json!(name));
        }
        object.insert("HopByHopId".into(), json!(self.hop_by_hop_id));
        object.insert("EndToEndId".into(), json!(self.end_to_end_id));
        object.insert(
            "avps".into(),
            Json::Array(self.avps().iter().map(|avp| avp.to_json()).collect()),
        );
        Json::Object(object)
    }

    /// Loads a message. Command and application may be given by code, by
    /// name, or both; names alone are tidied into codes via the dictionary.
    pub fn from_json(v: &Json, dict: Arc<Dictionary>) -> Result<DiameterMessage> {
        let object = v
            .as_object()
            .ok_or_else(|| Error::DecodeError("message json must be an object".into()))?;

        let application_id = match object.get("ApplicationId").and_then(|a| a.as_u64()) {
            Some(code) => code as u32,
            None => {
                let name = object
                    .get("ApplicationName")
                    .and_then(|a| a.as_str())
                    .ok_or_else(|| {
                        Error::DecodeError("message json needs ApplicationId or ApplicationName".into())
                    })?;
                dict.application_by_name(name)?.code
            }
        };
        let command_code = match object.get("CommandCode").and_then(|c| c.as_u64()) {
            Some(code) => code as u32,
            None => {
                let name = object
                    .get("CommandName")
                    .and_then(|c| c.as_str())
                    .ok_or_else(|| {
                        Error::DecodeError("message json needs CommandCode or CommandName".into())
                    })?;
                dict.application_by_code(application_id)?
                    .command_by_name(name)?
                    .code
            }
        };

        let get_flag = |key: &str| object.get(key).and_then(|f| f.as_bool()).unwrap_or(false);
        let mut flag_bits = 0u8;
        if get_flag("IsRequest") {
            flag_bits |= diameter::flags::REQUEST;
        }
        if get_flag("IsProxyable") {
            flag_bits |= diameter::flags::PROXYABLE;
        }
        if get_flag("IsError") {
            flag_bits |= diameter::flags::ERROR;
        }
        if get_flag("IsRetransmission") {
            flag_bits |= diameter::flags::RETRANSMIT;
        }

        let hop_by_hop_id = object
            .get("HopByHopId")
            .and_then(|h| h.as_u64())
            .unwrap_or(0) as u32;
        let end_to_end_id = object
            .get("EndToEndId")
            .and_then(|e| e.as_u64())
            .unwrap_or(0) as u32;

        let mut message = DiameterMessage::new(
            command_code,
            application_id,
            flag_bits,
            hop_by_hop_id,
            end_to_end_id,
            dict,
        );
        if let Some(avps) = object.get("avps").and_then(|a| a.as_array()) {
            for avp in avps {
                let avp = diameter::Avp::from_json(avp, message.dict())?;
                message.add_avp(avp);
            }
        }
        Ok(message)
    }
}
