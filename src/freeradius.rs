//! FreeRADIUS-style text dictionary loader.
//!
//! Parses the line-oriented `ATTRIBUTE` / `VALUE` / `VENDOR` /
//! `BEGIN-VENDOR` / `END-VENDOR` / `$INCLUDE` grammar and produces the same
//! in-memory representation as the JSON loader. File access goes through the
//! [`DictionarySource`] seam so callers control where dictionary bytes come
//! from; `$INCLUDE` paths resolve relative to the including file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::dictionary::{Dictionary, RadiusAvpSpec, RadiusAvpType};
use crate::error::{Error, Result};

/// Resolves dictionary names to their raw bytes.
pub trait DictionarySource {
    fn get_bytes(&self, name: &str) -> Result<Vec<u8>>;
}

/// Filesystem-backed source rooted at a base directory.
pub struct FileSource {
    base: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(base: P) -> FileSource {
        FileSource { base: base.into() }
    }
}

impl DictionarySource for FileSource {
    fn get_bytes(&self, name: &str) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.base.join(name))?)
    }
}

/// In-memory source, used by tests and embedded deployments.
pub struct MapSource {
    files: HashMap<String, Vec<u8>>,
}

impl MapSource {
    pub fn new() -> MapSource {
        MapSource {
            files: HashMap::new(),
        }
    }

    pub fn insert<N: Into<String>, B: Into<Vec<u8>>>(&mut self, name: N, bytes: B) {
        self.files.insert(name.into(), bytes.into());
    }
}

impl Default for MapSource {
    fn default() -> Self {
        MapSource::new()
    }
}

impl DictionarySource for MapSource {
    fn get_bytes(&self, name: &str) -> Result<Vec<u8>> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| Error::DictionaryLoad(format!("no such dictionary file {}", name)))
    }
}

/// Loads a FreeRADIUS-format dictionary tree rooted at `entry` into `dict`.
pub fn load(dict: &mut Dictionary, source: &dyn DictionarySource, entry: &str) -> Result<()> {
    let mut state = LoaderState {
        attrs: Vec::new(),
        index_by_bare_name: HashMap::new(),
        current_vendor: 0,
    };
    parse_file(dict, source, entry, &mut state)?;

    for attr in state.attrs {
        let name = dict.qualify(attr.vendor_id, &attr.bare_name)?;
        let (enum_by_name, enum_by_value) = if attr.enum_values.is_empty() {
            (None, None)
        } else {
            let by_value = attr
                .enum_values
                .iter()
                .map(|(k, v)| (*v, k.clone()))
                .collect();
            (Some(attr.enum_values), Some(by_value))
        };
        dict.add_radius_spec(RadiusAvpSpec {
            vendor_id: attr.vendor_id,
            code: attr.code,
            name,
            avp_type: attr.avp_type,
            enum_by_name,
            enum_by_value,
            encrypted: attr.encrypted,
            tagged: attr.tagged,
            salted: attr.salted,
            with_len: attr.with_len,
            concat: attr.concat,
        })?;
    }
    Ok(())
}

struct PendingAttr {
    vendor_id: u32,
    code: u8,
    bare_name: String,
    avp_type: RadiusAvpType,
    enum_values: HashMap<String, i64>,
    encrypted: bool,
    tagged: bool,
    salted: bool,
    with_len: bool,
    concat: bool,
}

struct LoaderState {
    attrs: Vec<PendingAttr>,
    index_by_bare_name: HashMap<String, usize>,
    current_vendor: u32,
}

fn parse_file(
    dict: &mut Dictionary,
    source: &dyn DictionarySource,
    name: &str,
    state: &mut LoaderState,
) -> Result<()> {
    let bytes = source.get_bytes(name)?;
    let text = String::from_utf8(bytes)
        .map_err(|_| Error::DictionaryLoad(format!("{}: not valid utf-8", name)))?;

    for (lineno, raw_line) in text.lines().enumerate() {
        let line = match raw_line.find('#') {
            Some(pos) => &raw_line[..pos],
            None => raw_line,
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        let fail = |msg: String| -> Error {
            Error::DictionaryLoad(format!("{}:{}: {}", name, lineno + 1, msg))
        };

        match tokens[0] {
            "ATTRIBUTE" => {
                if tokens.len() < 4 {
                    return Err(fail("ATTRIBUTE needs name, code and type".into()));
                }
                let code: u8 = tokens[2]
                    .parse()
                    .map_err(|_| fail(format!("bad attribute code {}", tokens[2])))?;
                let avp_type = parse_type(tokens[3]).map_err(|e| fail(e))?;
                let mut attr = PendingAttr {
                    vendor_id: state.current_vendor,
                    code,
                    bare_name: tokens[1].to_string(),
                    avp_type,
                    enum_values: HashMap::new(),
                    encrypted: false,
                    tagged: false,
                    salted: false,
                    with_len: false,
                    concat: false,
                };
                if let Some(flags) = tokens.get(4) {
                    for flag in flags.split(',') {
                        match flag {
                            "encrypt=1" => attr.encrypted = true,
                            // Tunnel-password style: salted with an internal
                            // length prefix.
                            "encrypt=2" => {
                                attr.salted = true;
                                attr.with_len = true;
                            }
                            // Ascend style; same keystream, loaded as plain
                            // hiding.
                            "encrypt=3" => attr.encrypted = true,
                            "has_tag" => attr.tagged = true,
                            "concat" => attr.concat = true,
                            other => {
                                return Err(fail(format!("unknown flag {}", other)));
                            }
                        }
                    }
                }
                state
                    .index_by_bare_name
                    .insert(attr.bare_name.clone(), state.attrs.len());
                state.attrs.push(attr);
            }
            "VALUE" => {
                if tokens.len() < 4 {
                    return Err(fail("VALUE needs attribute, name and number".into()));
                }
                let number: i64 = tokens[3]
                    .parse()
                    .map_err(|_| fail(format!("bad enum value {}", tokens[3])))?;
                let idx = *state
                    .index_by_bare_name
                    .get(tokens[1])
                    .ok_or_else(|| fail(format!("VALUE for undeclared attribute {}", tokens[1])))?;
                state.attrs[idx]
                    .enum_values
                    .insert(tokens[2].to_string(), number);
            }
            "VENDOR" => {
                if tokens.len() < 3 {
                    return Err(fail("VENDOR needs name and id".into()));
                }
                let id: u32 = tokens[2]
                    .parse()
                    .map_err(|_| fail(format!("bad vendor id {}", tokens[2])))?;
                dict.add_vendor(id, tokens[1]);
            }
            "BEGIN-VENDOR" => {
                if tokens.len() < 2 {
                    return Err(fail("BEGIN-VENDOR needs a name".into()));
                }
                let vendor = dict
                    .vendor_by_name(tokens[1])
                    .map_err(|_| fail(format!("undeclared vendor {}", tokens[1])))?;
                state.current_vendor = vendor.id;
            }
            "END-VENDOR" => {
                if tokens.len() < 2 {
                    return Err(fail("END-VENDOR needs a name".into()));
                }
                let vendor = dict
                    .vendor_by_name(tokens[1])
                    .map_err(|_| fail(format!("undeclared vendor {}", tokens[1])))?;
                if vendor.id != state.current_vendor {
                    return Err(fail(format!("END-VENDOR {} does not match", tokens[1])));
                }
                state.current_vendor = 0;
            }
            "$INCLUDE" => {
                if tokens.len() < 2 {
                    return Err(fail("$INCLUDE needs a path".into()));
                }
                let included = resolve_relative(name, tokens[1]);
                parse_file(dict, source, &included, state)?;
            }
            other => {
                return Err(fail(format!("unknown directive {}", other)));
            }
        }
    }
    Ok(())
}

fn parse_type(s: &str) -> std::result::Result<RadiusAvpType, String> {
    match s {
        "string" => Ok(RadiusAvpType::String),
        "octets" => Ok(RadiusAvpType::Octets),
        "integer" => Ok(RadiusAvpType::Integer),
        "integer64" => Ok(RadiusAvpType::Integer64),
        "ipaddr" => Ok(RadiusAvpType::Address),
        "ipv6addr" => Ok(RadiusAvpType::IPv6Address),
        "ipv6prefix" => Ok(RadiusAvpType::IPv6Prefix),
        "ifid" => Ok(RadiusAvpType::InterfaceId),
        "date" => Ok(RadiusAvpType::Time),
        other => Err(format!("unknown attribute type {}", other)),
    }
}

fn resolve_relative(including: &str, included: &str) -> String {
    match Path::new(including).parent() {
        Some(parent) if parent != Path::new("") => {
            parent.join(included).to_string_lossy().into_owned()
        }
        _ => included.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_with(files: &[(&str, &str)]) -> MapSource {
        let mut source = MapSource::new();
        for (name, content) in files {
            source.insert(*name, *content);
        }
        source
    }

    #[test]
    fn test_load_basic_attributes() {
        let source = source_with(&[(
            "dictionary",
            "\
# base attributes
ATTRIBUTE User-Name 1 string
ATTRIBUTE User-Password 2 string encrypt=1
ATTRIBUTE Tunnel-Password 69 string encrypt=2,has_tag
ATTRIBUTE EAP-Message 79 octets concat
ATTRIBUTE Service-Type 6 integer
VALUE Service-Type Login-User 1
VALUE Service-Type Framed-User 2
",
        )]);

        let mut dict = Dictionary::new();
        load(&mut dict, &source, "dictionary").unwrap();

        let spec = dict.radius_by_name("User-Password").unwrap();
        assert!(spec.encrypted);
        assert!(!spec.salted);

        let spec = dict.radius_by_name("Tunnel-Password").unwrap();
        assert!(spec.salted);
        assert!(spec.with_len);
        assert!(spec.tagged);
        assert!(!spec.encrypted);

        let spec = dict.radius_by_name("EAP-Message").unwrap();
        assert!(spec.concat);

        let spec = dict.radius_by_name("Service-Type").unwrap();
        assert_eq!(spec.enum_value("Framed-User"), Some(2));
        assert_eq!(spec.enum_name(1), Some("Login-User"));
    }

    #[test]
    fn test_vendor_blocks() {
        let source = source_with(&[(
            "dictionary",
            "\
VENDOR Cisco 9
BEGIN-VENDOR Cisco
ATTRIBUTE AVPair 1 string
END-VENDOR Cisco
ATTRIBUTE User-Name 1 string
",
        )]);

        let mut dict = Dictionary::new();
        load(&mut dict, &source, "dictionary").unwrap();

        let spec = dict.radius_by_name("Cisco-AVPair").unwrap();
        assert_eq!(spec.vendor_id, 9);
        assert_eq!(spec.code, 1);

        let spec = dict.radius_by_name("User-Name").unwrap();
        assert_eq!(spec.vendor_id, 0);
    }

    #[test]
    fn test_include_is_relative_to_including_file() {
        let source = source_with(&[
            ("dicts/dictionary", "$INCLUDE dictionary.cisco\n"),
            (
                "dicts/dictionary.cisco",
                "VENDOR Cisco 9\nBEGIN-VENDOR Cisco\nATTRIBUTE AVPair 1 string\nEND-VENDOR Cisco\n",
            ),
        ]);

        let mut dict = Dictionary::new();
        load(&mut dict, &source, "dicts/dictionary").unwrap();
        assert!(dict.radius_by_name("Cisco-AVPair").is_ok());
    }

    #[test]
    fn test_value_before_attribute_is_error() {
        let source = source_with(&[("dictionary", "VALUE Service-Type Login-User 1\n")]);
        let mut dict = Dictionary::new();
        let err = load(&mut dict, &source, "dictionary");
        assert!(matches!(err, Err(Error::DictionaryLoad(_))));
    }

    #[test]
    fn test_unknown_flag_is_error() {
        let source = source_with(&[("dictionary", "ATTRIBUTE X 10 string encrypt=9\n")]);
        let mut dict = Dictionary::new();
        let err = load(&mut dict, &source, "dictionary");
        assert!(matches!(err, Err(Error::DictionaryLoad(_))));
    }

    #[test]
    fn test_concat_on_non_octets_is_error() {
        let source = source_with(&[("dictionary", "ATTRIBUTE X 10 string concat\n")]);
        let mut dict = Dictionary::new();
        let err = load(&mut dict, &source, "dictionary");
        assert!(matches!(err, Err(Error::DictionaryLoad(_))));
    }

    #[test]
    fn test_missing_include_is_error() {
        let source = source_with(&[("dictionary", "$INCLUDE nowhere\n")]);
        let mut dict = Dictionary::new();
        let err = load(&mut dict, &source, "dictionary");
        assert!(matches!(err, Err(Error::DictionaryLoad(_))));
    }
}
