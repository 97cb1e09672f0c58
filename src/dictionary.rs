//! Attribute dictionaries for both protocols.
//!
//! A [`Dictionary`] holds the parsed RADIUS and Diameter attribute metadata:
//! vendors, attribute specs (type, flags, enum maps, grouped-child rules) and,
//! for Diameter, applications and their command schemas. It is built once at
//! startup, then shared read-only behind an `Arc` — the codecs never mutate it.
//!
//! The canonical source format is one JSON document per protocol; see
//! [`Dictionary::load_radius_json`] and [`Dictionary::load_diameter_json`].
//! A FreeRADIUS-style text loader producing the same in-memory content lives
//! in [`crate::freeradius`].

use lazy_static::lazy_static;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vendor {
    pub id: u32,
    pub name: String,
}

/// RADIUS on-wire attribute types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusAvpType {
    /// Unknown attribute; payload kept as raw octets.
    None,
    Octets,
    String,
    Integer,
    Integer64,
    Address,
    IPv6Address,
    IPv6Prefix,
    InterfaceId,
    Time,
}

impl RadiusAvpType {
    fn parse(s: &str) -> Result<RadiusAvpType> {
        match s {
            "None" => Ok(RadiusAvpType::None),
            "Octets" => Ok(RadiusAvpType::Octets),
            "String" => Ok(RadiusAvpType::String),
            "Integer" => Ok(RadiusAvpType::Integer),
            "Integer64" => Ok(RadiusAvpType::Integer64),
            "Address" => Ok(RadiusAvpType::Address),
            "IPv6Address" => Ok(RadiusAvpType::IPv6Address),
            "IPv6Prefix" => Ok(RadiusAvpType::IPv6Prefix),
            "InterfaceId" => Ok(RadiusAvpType::InterfaceId),
            "Time" => Ok(RadiusAvpType::Time),
            other => Err(Error::DictionaryLoad(format!(
                "unknown radius attribute type {}",
                other
            ))),
        }
    }
}

/// Diameter AVP data formats, RFC 6733 §4.2/§4.3 plus the derived types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiameterAvpType {
    /// Unknown AVP; payload kept as raw octets.
    None,
    OctetString,
    Integer32,
    Integer64,
    Unsigned32,
    Unsigned64,
    Float32,
    Float64,
    Grouped,
    Address,
    Time,
    UTF8String,
    DiameterIdentity,
    DiameterURI,
    Enumerated,
    IPFilterRule,
    IPv4Address,
    IPv6Address,
    IPv6Prefix,
}

impl DiameterAvpType {
    fn parse(s: &str) -> Result<DiameterAvpType> {
        match s {
            "None" => Ok(DiameterAvpType::None),
            "OctetString" => Ok(DiameterAvpType::OctetString),
            "Integer32" => Ok(DiameterAvpType::Integer32),
            "Integer64" => Ok(DiameterAvpType::Integer64),
            "Unsigned32" => Ok(DiameterAvpType::Unsigned32),
            "Unsigned64" => Ok(DiameterAvpType::Unsigned64),
            "Float32" => Ok(DiameterAvpType::Float32),
            "Float64" => Ok(DiameterAvpType::Float64),
            "Grouped" => Ok(DiameterAvpType::Grouped),
            "Address" => Ok(DiameterAvpType::Address),
            "Time" => Ok(DiameterAvpType::Time),
            "UTF8String" => Ok(DiameterAvpType::UTF8String),
            "DiameterIdentity" => Ok(DiameterAvpType::DiameterIdentity),
            "DiameterURI" => Ok(DiameterAvpType::DiameterURI),
            "Enumerated" => Ok(DiameterAvpType::Enumerated),
            "IPFilterRule" => Ok(DiameterAvpType::IPFilterRule),
            "IPv4Address" => Ok(DiameterAvpType::IPv4Address),
            "IPv6Address" => Ok(DiameterAvpType::IPv6Address),
            "IPv6Prefix" => Ok(DiameterAvpType::IPv6Prefix),
            other => Err(Error::DictionaryLoad(format!(
                "unknown diameter avp type {}",
                other
            ))),
        }
    }
}

#[derive(Debug)]
pub struct RadiusAvpSpec {
    pub vendor_id: u32,
    pub code: u8,
    /// Qualified name, `<VendorName>-<AttrName>`, bare for vendor 0.
    pub name: String,
    pub avp_type: RadiusAvpType,
    pub enum_by_name: Option<HashMap<String, i64>>,
    pub enum_by_value: Option<HashMap<i64, String>>,
    /// RFC 2865 §5.2 hiding.
    pub encrypted: bool,
    /// One-byte tag before the payload.
    pub tagged: bool,
    /// Salted-encrypt variant; implies hiding.
    pub salted: bool,
    /// One-byte plaintext length prefix inside the encrypted payload.
    pub with_len: bool,
    /// Value may span several consecutive AVPs of the same code.
    pub concat: bool,
}

impl RadiusAvpSpec {
    pub fn enum_name(&self, value: i64) -> Option<&str> {
        self.enum_by_value
            .as_ref()
            .and_then(|m| m.get(&value).map(|s| s.as_str()))
    }

    pub fn enum_value(&self, name: &str) -> Option<i64> {
        self.enum_by_name.as_ref().and_then(|m| m.get(name).copied())
    }
}

/// Occurrence rule for one child of a grouped AVP or command.
/// `max_occurs == 0` means unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedRule {
    pub mandatory: bool,
    pub min_occurs: usize,
    pub max_occurs: usize,
}

#[derive(Debug)]
pub struct DiameterAvpSpec {
    pub vendor_id: u32,
    pub code: u32,
    /// Qualified name, `<VendorName>-<AttrName>`, bare for vendor 0.
    pub name: String,
    pub avp_type: DiameterAvpType,
    pub enum_by_name: Option<HashMap<String, i64>>,
    pub enum_by_value: Option<HashMap<i64, String>>,
    /// Child rules by qualified name, present for grouped AVPs.
    pub group: Option<HashMap<String, GroupedRule>>,
}

impl DiameterAvpSpec {
    pub fn enum_name(&self, value: i64) -> Option<&str> {
        self.enum_by_value
            .as_ref()
            .and_then(|m| m.get(&value).map(|s| s.as_str()))
    }

    pub fn enum_value(&self, name: &str) -> Option<i64> {
        self.enum_by_name.as_ref().and_then(|m| m.get(name).copied())
    }
}

#[derive(Debug)]
pub struct CommandSpec {
    pub name: String,
    pub code: u32,
    /// Permitted attributes in the request, by qualified name.
    pub request: HashMap<String, GroupedRule>,
    /// Permitted attributes in the response, by qualified name.
    pub response: HashMap<String, GroupedRule>,
}

#[derive(Debug)]
pub struct ApplicationSpec {
    pub name: String,
    pub code: u32,
    commands_by_code: HashMap<u32, Arc<CommandSpec>>,
    commands_by_name: HashMap<String, Arc<CommandSpec>>,
}

impl ApplicationSpec {
    pub fn command_by_code(&self, code: u32) -> Result<Arc<CommandSpec>> {
        self.commands_by_code
            .get(&code)
            .cloned()
            .ok_or_else(|| Error::DictionaryMiss(format!("command code {}", code)))
    }

    pub fn command_by_name(&self, name: &str) -> Result<Arc<CommandSpec>> {
        self.commands_by_name
            .get(name)
            .cloned()
            .ok_or_else(|| Error::DictionaryMiss(format!("command {}", name)))
    }
}

#[derive(Debug)]
pub struct Dictionary {
    vendors_by_id: HashMap<u32, Arc<Vendor>>,
    vendors_by_name: HashMap<String, Arc<Vendor>>,
    radius_by_code: HashMap<(u32, u8), Arc<RadiusAvpSpec>>,
    radius_by_name: HashMap<String, Arc<RadiusAvpSpec>>,
    diameter_by_code: HashMap<(u32, u32), Arc<DiameterAvpSpec>>,
    diameter_by_name: HashMap<String, Arc<DiameterAvpSpec>>,
    apps_by_code: HashMap<u32, Arc<ApplicationSpec>>,
    apps_by_name: HashMap<String, Arc<ApplicationSpec>>,
}

impl Dictionary {
    pub fn new() -> Dictionary {
        Dictionary {
            vendors_by_id: HashMap::new(),
            vendors_by_name: HashMap::new(),
            radius_by_code: HashMap::new(),
            radius_by_name: HashMap::new(),
            diameter_by_code: HashMap::new(),
            diameter_by_name: HashMap::new(),
            apps_by_code: HashMap::new(),
            apps_by_name: HashMap::new(),
        }
    }

    pub fn add_vendor(&mut self, id: u32, name: &str) {
        let vendor = Arc::new(Vendor {
            id,
            name: name.to_string(),
        });
        self.vendors_by_id.insert(id, Arc::clone(&vendor));
        self.vendors_by_name.insert(name.to_string(), vendor);
    }

    pub fn vendor_by_id(&self, id: u32) -> Result<Arc<Vendor>> {
        self.vendors_by_id
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::DictionaryMiss(format!("vendor id {}", id)))
    }

    pub fn vendor_by_name(&self, name: &str) -> Result<Arc<Vendor>> {
        self.vendors_by_name
            .get(name)
            .cloned()
            .ok_or_else(|| Error::DictionaryMiss(format!("vendor {}", name)))
    }

    /// Qualified name for an attribute of `vendor_id`, `<VendorName>-<name>`,
    /// bare when vendor_id is 0.
    pub fn qualify(&self, vendor_id: u32, name: &str) -> Result<String> {
        if vendor_id == 0 {
            return Ok(name.to_string());
        }
        let vendor = self.vendor_by_id(vendor_id).map_err(|_| {
            Error::DictionaryLoad(format!(
                "attribute {} references undeclared vendor {}",
                name, vendor_id
            ))
        })?;
        Ok(format!("{}-{}", vendor.name, name))
    }

    pub(crate) fn add_radius_spec(&mut self, spec: RadiusAvpSpec) -> Result<()> {
        if spec.concat && spec.avp_type != RadiusAvpType::Octets {
            return Err(Error::DictionaryLoad(format!(
                "attribute {}: concat requires octets",
                spec.name
            )));
        }
        let spec = Arc::new(spec);
        self.radius_by_code
            .insert((spec.vendor_id, spec.code), Arc::clone(&spec));
        self.radius_by_name.insert(spec.name.clone(), spec);
        Ok(())
    }

    pub(crate) fn add_diameter_spec(&mut self, spec: DiameterAvpSpec) -> Result<()> {
        if spec.group.is_some() && spec.avp_type != DiameterAvpType::Grouped {
            return Err(Error::DictionaryLoad(format!(
                "attribute {}: group rules on a non-grouped type",
                spec.name
            )));
        }
        let spec = Arc::new(spec);
        self.diameter_by_code
            .insert((spec.vendor_id, spec.code), Arc::clone(&spec));
        self.diameter_by_name.insert(spec.name.clone(), spec);
        Ok(())
    }

    /// Lookup by code never fails: unknown codes yield the UNKNOWN sentinel,
    /// typed as raw octets, so parsing can continue.
    pub fn radius_by_code(&self, vendor_id: u32, code: u8) -> Arc<RadiusAvpSpec> {
        match self.radius_by_code.get(&(vendor_id, code)) {
            Some(spec) => Arc::clone(spec),
            None => Arc::clone(&UNKNOWN_RADIUS_SPEC),
        }
    }

    pub fn radius_by_name(&self, name: &str) -> Result<Arc<RadiusAvpSpec>> {
        self.radius_by_name
            .get(name)
            .cloned()
            .ok_or_else(|| Error::DictionaryMiss(name.to_string()))
    }

    pub fn diameter_by_code(&self, vendor_id: u32, code: u32) -> Arc<DiameterAvpSpec> {
        match self.diameter_by_code.get(&(vendor_id, code)) {
            Some(spec) => Arc::clone(spec),
            None => Arc::clone(&UNKNOWN_DIAMETER_SPEC),
        }
    }

    pub fn diameter_by_name(&self, name: &str) -> Result<Arc<DiameterAvpSpec>> {
        self.diameter_by_name
            .get(name)
            .cloned()
            .ok_or_else(|| Error::DictionaryMiss(name.to_string()))
    }

    pub fn application_by_code(&self, code: u32) -> Result<Arc<ApplicationSpec>> {
        self.apps_by_code
            .get(&code)
            .cloned()
            .ok_or_else(|| Error::DictionaryMiss(format!("application id {}", code)))
    }

    pub fn application_by_name(&self, name: &str) -> Result<Arc<ApplicationSpec>> {
        self.apps_by_name
            .get(name)
            .cloned()
            .ok_or_else(|| Error::DictionaryMiss(format!("application {}", name)))
    }

    pub fn command(&self, app_id: u32, command_code: u32) -> Result<Arc<CommandSpec>> {
        self.application_by_code(app_id)?.command_by_code(command_code)
    }

    /// Loads a RADIUS dictionary document through the configuration-fetcher
    /// seam.
    pub fn load_radius_json_from(
        &mut self,
        source: &dyn crate::freeradius::DictionarySource,
        name: &str,
    ) -> Result<()> {
        let json = fetch_utf8(source, name)?;
        self.load_radius_json(&json)
    }

    /// Loads a Diameter dictionary document through the configuration-fetcher
    /// seam.
    pub fn load_diameter_json_from(
        &mut self,
        source: &dyn crate::freeradius::DictionarySource,
        name: &str,
    ) -> Result<()> {
        let json = fetch_utf8(source, name)?;
        self.load_diameter_json(&json)
    }

    /// Loads a RADIUS dictionary document and merges it into the store.
    pub fn load_radius_json(&mut self, json: &str) -> Result<()> {
        let file: RadiusDictFile = serde_json::from_str(json)?;
        for v in &file.vendors {
            self.add_vendor(v.vendor_id, &v.vendor_name);
        }
        for block in &file.avps {
            for attr in &block.attributes {
                let name = self.qualify(block.vendor_id, &attr.name)?;
                let (enum_by_name, enum_by_value) = normalize_enums(&attr.enum_values);
                self.add_radius_spec(RadiusAvpSpec {
                    vendor_id: block.vendor_id,
                    code: attr.code,
                    name,
                    avp_type: RadiusAvpType::parse(&attr.avp_type)?,
                    enum_by_name,
                    enum_by_value,
                    encrypted: attr.encrypted,
                    tagged: attr.tagged,
                    salted: attr.salted,
                    with_len: attr.with_len,
                    concat: attr.concat,
                })?;
            }
        }
        Ok(())
    }

    /// Loads a Diameter dictionary document and merges it into the store.
    pub fn load_diameter_json(&mut self, json: &str) -> Result<()> {
        let file: DiameterDictFile = serde_json::from_str(json)?;
        for v in &file.vendors {
            self.add_vendor(v.vendor_id, &v.vendor_name);
        }
        for block in &file.avps {
            for attr in &block.attributes {
                let name = self.qualify(block.vendor_id, &attr.name)?;
                let (enum_by_name, enum_by_value) = normalize_enums(&attr.enum_values);
                self.add_diameter_spec(DiameterAvpSpec {
                    vendor_id: block.vendor_id,
                    code: attr.code,
                    name,
                    avp_type: DiameterAvpType::parse(&attr.avp_type)?,
                    enum_by_name,
                    enum_by_value,
                    group: attr.group.as_ref().map(normalize_rules),
                })?;
            }
        }
        for app in &file.applications {
            let mut commands_by_code = HashMap::new();
            let mut commands_by_name = HashMap::new();
            for cmd in &app.commands {
                let command = Arc::new(CommandSpec {
                    name: cmd.name.clone(),
                    code: cmd.code,
                    request: normalize_rules(&cmd.request),
                    response: normalize_rules(&cmd.response),
                });
                commands_by_code.insert(cmd.code, Arc::clone(&command));
                commands_by_name.insert(cmd.name.clone(), command);
            }
            let app_spec = Arc::new(ApplicationSpec {
                name: app.name.clone(),
                code: app.code,
                commands_by_code,
                commands_by_name,
            });
            self.apps_by_code.insert(app.code, Arc::clone(&app_spec));
            self.apps_by_name.insert(app.name.clone(), app_spec);
        }
        Ok(())
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Dictionary::new()
    }
}

fn fetch_utf8(source: &dyn crate::freeradius::DictionarySource, name: &str) -> Result<String> {
    let bytes = source.get_bytes(name)?;
    String::from_utf8(bytes)
        .map_err(|_| Error::DictionaryLoad(format!("{}: not valid utf-8", name)))
}

fn normalize_enums(
    values: &Option<HashMap<String, i64>>,
) -> (Option<HashMap<String, i64>>, Option<HashMap<i64, String>>) {
    match values {
        Some(by_name) => {
            let by_value = by_name.iter().map(|(k, v)| (*v, k.clone())).collect();
            (Some(by_name.clone()), Some(by_value))
        }
        None => (None, None),
    }
}

fn normalize_rules(rules: &HashMap<String, RuleEntry>) -> HashMap<String, GroupedRule> {
    rules
        .iter()
        .map(|(name, r)| {
            (
                name.clone(),
                GroupedRule {
                    mandatory: r.mandatory,
                    min_occurs: r.min_occurs,
                    max_occurs: r.max_occurs,
                },
            )
        })
        .collect()
}

// Serde mirrors of the on-disk JSON schema.

#[derive(Debug, Deserialize)]
struct VendorEntry {
    #[serde(rename = "VendorId")]
    vendor_id: u32,
    #[serde(rename = "VendorName")]
    vendor_name: String,
}

#[derive(Debug, Deserialize)]
struct RadiusDictFile {
    #[serde(rename = "Version", default)]
    _version: u32,
    #[serde(rename = "Vendors", default)]
    vendors: Vec<VendorEntry>,
    #[serde(rename = "Avps", default)]
    avps: Vec<RadiusVendorBlock>,
}

#[derive(Debug, Deserialize)]
struct RadiusVendorBlock {
    #[serde(rename = "VendorId", default)]
    vendor_id: u32,
    #[serde(rename = "Attributes")]
    attributes: Vec<RadiusAttrEntry>,
}

#[derive(Debug, Deserialize)]
struct RadiusAttrEntry {
    #[serde(rename = "Code")]
    code: u8,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Type")]
    avp_type: String,
    #[serde(rename = "EnumValues")]
    enum_values: Option<HashMap<String, i64>>,
    #[serde(rename = "Encrypted", default)]
    encrypted: bool,
    #[serde(rename = "Tagged", default)]
    tagged: bool,
    #[serde(rename = "Salted", default)]
    salted: bool,
    #[serde(rename = "WithLen", default)]
    with_len: bool,
    #[serde(rename = "Concat", default)]
    concat: bool,
}

#[derive(Debug, Deserialize)]
struct DiameterDictFile {
    #[serde(rename = "Version", default)]
    _version: u32,
    #[serde(rename = "Vendors", default)]
    vendors: Vec<VendorEntry>,
    #[serde(rename = "Avps", default)]
    avps: Vec<DiameterVendorBlock>,
    #[serde(rename = "Applications", default)]
    applications: Vec<ApplicationEntry>,
}

#[derive(Debug, Deserialize)]
struct DiameterVendorBlock {
    #[serde(rename = "VendorId", default)]
    vendor_id: u32,
    #[serde(rename = "Attributes")]
    attributes: Vec<DiameterAttrEntry>,
}

#[derive(Debug, Deserialize)]
struct DiameterAttrEntry {
    #[serde(rename = "Code")]
    code: u32,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Type")]
    avp_type: String,
    #[serde(rename = "EnumValues")]
    enum_values: Option<HashMap<String, i64>>,
    #[serde(rename = "Group")]
    group: Option<HashMap<String, RuleEntry>>,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    #[serde(rename = "Mandatory", default)]
    mandatory: bool,
    #[serde(rename = "MinOccurs", default)]
    min_occurs: usize,
    #[serde(rename = "MaxOccurs", default)]
    max_occurs: usize,
}

#[derive(Debug, Deserialize)]
struct ApplicationEntry {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Code")]
    code: u32,
    #[serde(rename = "Commands", default)]
    commands: Vec<CommandEntry>,
}

#[derive(Debug, Deserialize)]
struct CommandEntry {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Code")]
    code: u32,
    #[serde(rename = "Request", default)]
    request: HashMap<String, RuleEntry>,
    #[serde(rename = "Response", default)]
    response: HashMap<String, RuleEntry>,
}

lazy_static! {
    /// Sentinel spec returned for unknown RADIUS codes.
    pub static ref UNKNOWN_RADIUS_SPEC: Arc<RadiusAvpSpec> = Arc::new(RadiusAvpSpec {
        vendor_id: 0,
        code: 0,
        name: "UNKNOWN".to_string(),
        avp_type: RadiusAvpType::None,
        enum_by_name: None,
        enum_by_value: None,
        encrypted: false,
        tagged: false,
        salted: false,
        with_len: false,
        concat: false,
    });

    /// Sentinel spec returned for unknown Diameter codes.
    pub static ref UNKNOWN_DIAMETER_SPEC: Arc<DiameterAvpSpec> = Arc::new(DiameterAvpSpec {
        vendor_id: 0,
        code: 0,
        name: "UNKNOWN".to_string(),
        avp_type: DiameterAvpType::None,
        enum_by_name: None,
        enum_by_value: None,
        group: None,
    });

    /// Dictionary built from the embedded base documents below.
    pub static ref DEFAULT_DICT: Arc<Dictionary> = {
        let mut dict = Dictionary::new();
        dict.load_radius_json(DEFAULT_RADIUS_DICT_JSON)
            .expect("embedded radius dictionary");
        dict.load_diameter_json(DEFAULT_DIAMETER_DICT_JSON)
            .expect("embedded diameter dictionary");
        Arc::new(dict)
    };
}

pub const DEFAULT_RADIUS_DICT_JSON: &str = r#"
{
    "Version": 1,
    "Vendors": [
        {"VendorId": 9, "VendorName": "Cisco"},
        {"VendorId": 10415, "VendorName": "TGPP"}
    ],
    "Avps": [
        {
            "VendorId": 0,
            "Attributes": [
                {"Code": 1, "Name": "User-Name", "Type": "String"},
                {"Code": 2, "Name": "User-Password", "Type": "String", "Encrypted": true},
                {"Code": 3, "Name": "CHAP-Password", "Type": "Octets"},
                {"Code": 4, "Name": "NAS-IP-Address", "Type": "Address"},
                {"Code": 5, "Name": "NAS-Port", "Type": "Integer"},
                {"Code": 6, "Name": "Service-Type", "Type": "Integer", "EnumValues": {
                    "Login-User": 1, "Framed-User": 2, "Callback-Login-User": 3,
                    "Callback-Framed-User": 4, "Outbound-User": 5, "Administrative-User": 6
                }},
                {"Code": 7, "Name": "Framed-Protocol", "Type": "Integer", "EnumValues": {"PPP": 1, "SLIP": 2}},
                {"Code": 8, "Name": "Framed-IP-Address", "Type": "Address"},
                {"Code": 18, "Name": "Reply-Message", "Type": "String"},
                {"Code": 24, "Name": "State", "Type": "Octets"},
                {"Code": 25, "Name": "Class", "Type": "Octets"},
                {"Code": 27, "Name": "Session-Timeout", "Type": "Integer"},
                {"Code": 30, "Name": "Called-Station-Id", "Type": "String"},
                {"Code": 31, "Name": "Calling-Station-Id", "Type": "String"},
                {"Code": 32, "Name": "NAS-Identifier", "Type": "String"},
                {"Code": 40, "Name": "Acct-Status-Type", "Type": "Integer", "EnumValues": {
                    "Start": 1, "Stop": 2, "Interim-Update": 3, "Accounting-On": 7, "Accounting-Off": 8
                }},
                {"Code": 41, "Name": "Acct-Delay-Time", "Type": "Integer"},
                {"Code": 42, "Name": "Acct-Input-Octets", "Type": "Integer"},
                {"Code": 43, "Name": "Acct-Output-Octets", "Type": "Integer"},
                {"Code": 44, "Name": "Acct-Session-Id", "Type": "String"},
                {"Code": 46, "Name": "Acct-Session-Time", "Type": "Integer"},
                {"Code": 55, "Name": "Event-Timestamp", "Type": "Time"},
                {"Code": 60, "Name": "CHAP-Challenge", "Type": "Octets"},
                {"Code": 61, "Name": "NAS-Port-Type", "Type": "Integer", "EnumValues": {
                    "Async": 0, "Sync": 1, "ISDN": 2, "Virtual": 5, "Ethernet": 15, "Wireless-802.11": 19
                }},
                {"Code": 64, "Name": "Tunnel-Type", "Type": "Integer", "Tagged": true, "EnumValues": {
                    "PPTP": 1, "L2F": 2, "L2TP": 3, "ESP": 9
                }},
                {"Code": 65, "Name": "Tunnel-Medium-Type", "Type": "Integer", "Tagged": true, "EnumValues": {
                    "IPv4": 1, "IPv6": 2
                }},
                {"Code": 66, "Name": "Tunnel-Client-Endpoint", "Type": "String", "Tagged": true},
                {"Code": 69, "Name": "Tunnel-Password", "Type": "String", "Salted": true, "WithLen": true, "Tagged": true},
                {"Code": 79, "Name": "EAP-Message", "Type": "Octets", "Concat": true},
                {"Code": 80, "Name": "Message-Authenticator", "Type": "Octets"},
                {"Code": 81, "Name": "Tunnel-Private-Group-Id", "Type": "String", "Tagged": true},
                {"Code": 85, "Name": "Acct-Interim-Interval", "Type": "Integer"},
                {"Code": 95, "Name": "NAS-IPv6-Address", "Type": "IPv6Address"},
                {"Code": 96, "Name": "Framed-Interface-Id", "Type": "InterfaceId"},
                {"Code": 97, "Name": "Framed-IPv6-Prefix", "Type": "IPv6Prefix"}
            ]
        },
        {
            "VendorId": 9,
            "Attributes": [
                {"Code": 1, "Name": "AVPair", "Type": "String"}
            ]
        },
        {
            "VendorId": 10415,
            "Attributes": [
                {"Code": 2, "Name": "Charging-Id", "Type": "Octets"}
            ]
        }
    ]
}
"#;

pub const DEFAULT_DIAMETER_DICT_JSON: &str = r#"
{
    "Version": 1,
    "Vendors": [
        {"VendorId": 10415, "VendorName": "TGPP"}
    ],
    "Avps": [
        {
            "VendorId": 0,
            "Attributes": [
                {"Code": 1, "Name": "User-Name", "Type": "UTF8String"},
                {"Code": 25, "Name": "Class", "Type": "OctetString"},
                {"Code": 30, "Name": "Called-Station-Id", "Type": "UTF8String"},
                {"Code": 33, "Name": "Proxy-State", "Type": "OctetString"},
                {"Code": 55, "Name": "Event-Timestamp", "Type": "Time"},
                {"Code": 257, "Name": "Host-IP-Address", "Type": "Address"},
                {"Code": 258, "Name": "Auth-Application-Id", "Type": "Unsigned32"},
                {"Code": 259, "Name": "Acct-Application-Id", "Type": "Unsigned32"},
                {"Code": 263, "Name": "Session-Id", "Type": "UTF8String"},
                {"Code": 264, "Name": "Origin-Host", "Type": "DiameterIdentity"},
                {"Code": 265, "Name": "Supported-Vendor-Id", "Type": "Unsigned32"},
                {"Code": 266, "Name": "Vendor-Id", "Type": "Unsigned32"},
                {"Code": 267, "Name": "Firmware-Revision", "Type": "Unsigned32"},
                {"Code": 268, "Name": "Result-Code", "Type": "Unsigned32"},
                {"Code": 269, "Name": "Product-Name", "Type": "UTF8String"},
                {"Code": 273, "Name": "Disconnect-Cause", "Type": "Enumerated", "EnumValues": {
                    "REBOOTING": 0, "BUSY": 1, "DO_NOT_WANT_TO_TALK_TO_YOU": 2
                }},
                {"Code": 278, "Name": "Origin-State-Id", "Type": "Unsigned32"},
                {"Code": 280, "Name": "Proxy-Host", "Type": "DiameterIdentity"},
                {"Code": 281, "Name": "Error-Message", "Type": "UTF8String"},
                {"Code": 282, "Name": "Route-Record", "Type": "DiameterIdentity"},
                {"Code": 283, "Name": "Destination-Realm", "Type": "DiameterIdentity"},
                {"Code": 284, "Name": "Proxy-Info", "Type": "Grouped", "Group": {
                    "Proxy-Host": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                    "Proxy-State": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1}
                }},
                {"Code": 292, "Name": "Redirect-Host", "Type": "DiameterURI"},
                {"Code": 293, "Name": "Destination-Host", "Type": "DiameterIdentity"},
                {"Code": 296, "Name": "Origin-Realm", "Type": "DiameterIdentity"},
                {"Code": 415, "Name": "CC-Request-Number", "Type": "Unsigned32"},
                {"Code": 416, "Name": "CC-Request-Type", "Type": "Enumerated", "EnumValues": {
                    "INITIAL_REQUEST": 1, "UPDATE_REQUEST": 2, "TERMINATION_REQUEST": 3
                }},
                {"Code": 443, "Name": "Subscription-Id", "Type": "Grouped", "Group": {
                    "Subscription-Id-Type": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                    "Subscription-Id-Data": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1}
                }},
                {"Code": 444, "Name": "Subscription-Id-Data", "Type": "UTF8String"},
                {"Code": 450, "Name": "Subscription-Id-Type", "Type": "Enumerated", "EnumValues": {
                    "END_USER_E164": 0, "END_USER_IMSI": 1, "END_USER_SIP_URI": 2, "END_USER_NAI": 3, "END_USER_PRIVATE": 4
                }}
            ]
        },
        {
            "VendorId": 10415,
            "Attributes": [
                {"Code": 2, "Name": "Charging-Id", "Type": "OctetString"},
                {"Code": 873, "Name": "Service-Information", "Type": "Grouped", "Group": {
                    "TGPP-PS-Information": {"MaxOccurs": 1}
                }},
                {"Code": 874, "Name": "PS-Information", "Type": "Grouped", "Group": {
                    "Called-Station-Id": {"MaxOccurs": 1},
                    "TGPP-Charging-Id": {"MaxOccurs": 1},
                    "TGPP-Node-Id": {"MaxOccurs": 1}
                }},
                {"Code": 2603, "Name": "Node-Id", "Type": "UTF8String"}
            ]
        }
    ],
    "Applications": [
        {
            "Name": "Base",
            "Code": 0,
            "Commands": [
                {
                    "Name": "Capabilities-Exchange",
                    "Code": 257,
                    "Request": {
                        "Origin-Host": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Origin-Realm": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Host-IP-Address": {"Mandatory": true, "MinOccurs": 1},
                        "Vendor-Id": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Product-Name": {"MinOccurs": 1, "MaxOccurs": 1},
                        "Origin-State-Id": {"MaxOccurs": 1},
                        "Supported-Vendor-Id": {},
                        "Auth-Application-Id": {},
                        "Acct-Application-Id": {},
                        "Firmware-Revision": {"MaxOccurs": 1}
                    },
                    "Response": {
                        "Result-Code": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Origin-Host": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Origin-Realm": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Host-IP-Address": {"Mandatory": true, "MinOccurs": 1},
                        "Vendor-Id": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Product-Name": {"MinOccurs": 1, "MaxOccurs": 1},
                        "Origin-State-Id": {"MaxOccurs": 1},
                        "Error-Message": {"MaxOccurs": 1},
                        "Supported-Vendor-Id": {},
                        "Auth-Application-Id": {},
                        "Acct-Application-Id": {},
                        "Firmware-Revision": {"MaxOccurs": 1}
                    }
                },
                {
                    "Name": "Device-Watchdog",
                    "Code": 280,
                    "Request": {
                        "Origin-Host": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Origin-Realm": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Origin-State-Id": {"MaxOccurs": 1}
                    },
                    "Response": {
                        "Result-Code": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Origin-Host": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Origin-Realm": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Error-Message": {"MaxOccurs": 1},
                        "Origin-State-Id": {"MaxOccurs": 1}
                    }
                },
                {
                    "Name": "Disconnect-Peer",
                    "Code": 282,
                    "Request": {
                        "Origin-Host": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Origin-Realm": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Disconnect-Cause": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1}
                    },
                    "Response": {
                        "Result-Code": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Origin-Host": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Origin-Realm": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Error-Message": {"MaxOccurs": 1}
                    }
                }
            ]
        },
        {
            "Name": "Credit-Control",
            "Code": 4,
            "Commands": [
                {
                    "Name": "Credit-Control",
                    "Code": 272,
                    "Request": {
                        "Session-Id": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Origin-Host": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Origin-Realm": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Destination-Realm": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Auth-Application-Id": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "CC-Request-Type": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "CC-Request-Number": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Destination-Host": {"MaxOccurs": 1},
                        "User-Name": {"MaxOccurs": 1},
                        "Event-Timestamp": {"MaxOccurs": 1},
                        "Subscription-Id": {},
                        "Called-Station-Id": {"MaxOccurs": 1},
                        "TGPP-Service-Information": {"MaxOccurs": 1},
                        "Route-Record": {},
                        "Proxy-Info": {}
                    },
                    "Response": {
                        "Session-Id": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Result-Code": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Origin-Host": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Origin-Realm": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Auth-Application-Id": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "CC-Request-Type": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "CC-Request-Number": {"Mandatory": true, "MinOccurs": 1, "MaxOccurs": 1},
                        "Event-Timestamp": {"MaxOccurs": 1},
                        "Error-Message": {"MaxOccurs": 1},
                        "Route-Record": {},
                        "Proxy-Info": {}
                    }
                }
            ]
        }
    ]
}
"#;
