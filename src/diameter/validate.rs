//! Dictionary-driven validation of message content.
//!
//! A command schema (request or response side, chosen by the R flag) and
//! each grouped AVP's child rules define, per qualified attribute name, an
//! occurrence window `[min_occurs, max_occurs]` with `0` meaning unbounded
//! on the upper side. Attributes without a schema entry are not permitted.

use std::collections::HashMap;

use crate::diameter::{Avp, DiameterMessage};
use crate::dictionary::GroupedRule;
use crate::error::{Error, Result};

impl DiameterMessage {
    /// Verifies every AVP against the command schema for this message's
    /// direction, recursing into grouped AVPs.
    pub fn check_attributes(&self) -> Result<()> {
        let command = self.dict().command(self.application_id, self.command_code)?;
        let schema = if self.flags.request {
            &command.request
        } else {
            &command.response
        };
        check_avps(schema, self.avps())
    }
}

fn check_avps(schema: &HashMap<String, GroupedRule>, avps: &[Avp]) -> Result<()> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for avp in avps {
        *counts.entry(avp.name()).or_insert(0) += 1;
    }

    for (name, count) in &counts {
        let rule = schema.get(*name).ok_or_else(|| {
            Error::SchemaViolation(format!("{} is not permitted here", name))
        })?;
        if *count < rule.min_occurs || (rule.max_occurs != 0 && *count > rule.max_occurs) {
            let upper = if rule.max_occurs == 0 {
                "unbounded".to_string()
            } else {
                rule.max_occurs.to_string()
            };
            return Err(Error::SchemaViolation(format!(
                "{} occurs {} times, allowed {}..{}",
                name, count, rule.min_occurs, upper
            )));
        }
    }

    for (name, rule) in schema {
        if rule.min_occurs > 0 && !counts.contains_key(name.as_str()) {
            return Err(Error::SchemaViolation(format!(
                "{} occurs 0 times, allowed {}..{}",
                name,
                rule.min_occurs,
                if rule.max_occurs == 0 {
                    "unbounded".to_string()
                } else {
                    rule.max_occurs.to_string()
                }
            )));
        }
    }

    for avp in avps {
        if let Some(group_schema) = &avp.spec().group {
            check_avps(group_schema, avp.value().as_group())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diameter::{avp_flags, flags};
    use crate::dictionary::DEFAULT_DICT;
    use std::sync::Arc;

    fn cer() -> DiameterMessage {
        let mut message = DiameterMessage::new(
            257,
            0,
            flags::REQUEST,
            1,
            2,
            Arc::clone(&DEFAULT_DICT),
        );
        message.add("Origin-Host", "peer.example.com").unwrap();
        message.add("Origin-Realm", "example.com").unwrap();
        message.add("Host-IP-Address", "10.0.0.1").unwrap();
        message.add("Vendor-Id", 39216u32).unwrap();
        message.add("Product-Name", "aaa-codec").unwrap();
        message
    }

    #[test]
    fn test_valid_request_passes() {
        cer().check_attributes().unwrap();
    }

    #[test]
    fn test_unbounded_attribute() {
        let mut message = cer();
        message.add("Host-IP-Address", "10.0.0.2").unwrap();
        message.add("Auth-Application-Id", 4u32).unwrap();
        message.add("Auth-Application-Id", 16777238u32).unwrap();
        message.check_attributes().unwrap();
    }

    #[test]
    fn test_missing_mandatory_child_named() {
        let mut message = cer();
        message.delete_all("Vendor-Id");
        match message.check_attributes() {
            Err(Error::SchemaViolation(msg)) => assert!(msg.contains("Vendor-Id")),
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[test]
    fn test_over_max_occurs() {
        let mut message = cer();
        message.add("Vendor-Id", 1u32).unwrap();
        match message.check_attributes() {
            Err(Error::SchemaViolation(msg)) => assert!(msg.contains("Vendor-Id")),
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[test]
    fn test_forbidden_attribute() {
        let mut message = DiameterMessage::new(
            280,
            0,
            flags::REQUEST,
            1,
            2,
            Arc::clone(&DEFAULT_DICT),
        );
        message.add("Origin-Host", "peer.example.com").unwrap();
        message.add("Origin-Realm", "example.com").unwrap();
        message.add("CC-Request-Number", 1u32).unwrap();
        match message.check_attributes() {
            Err(Error::SchemaViolation(msg)) => assert!(msg.contains("CC-Request-Number")),
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[test]
    fn test_response_side_schema() {
        let request = DiameterMessage::new_request("Base", "Device-Watchdog", Arc::clone(&DEFAULT_DICT))
            .unwrap();
        let mut response = request.response();
        response.add("Origin-Host", "peer.example.com").unwrap();
        response.add("Origin-Realm", "example.com").unwrap();
        response.check_attributes().unwrap_err();

        response.add("Result-Code", 2001u32).unwrap();
        response.check_attributes().unwrap();
    }

    #[test]
    fn test_grouped_children_validated() {
        let mut message = DiameterMessage::new(
            272,
            4,
            flags::REQUEST,
            1,
            2,
            Arc::clone(&DEFAULT_DICT),
        );
        message.add("Session-Id", "ses;1").unwrap();
        message.add("Origin-Host", "peer.example.com").unwrap();
        message.add("Origin-Realm", "example.com").unwrap();
        message.add("Destination-Realm", "example.net").unwrap();
        message.add("Auth-Application-Id", 4u32).unwrap();
        message.add("CC-Request-Type", "INITIAL_REQUEST").unwrap();
        message.add("CC-Request-Number", 0u32).unwrap();

        // Subscription-Id missing its mandatory Subscription-Id-Data child.
        let children = vec![Avp::new(
            "Subscription-Id-Type",
            "END_USER_IMSI",
            avp_flags::M,
            &DEFAULT_DICT,
        )
        .unwrap()];
        message
            .add_avp(Avp::new("Subscription-Id", children, avp_flags::M, &DEFAULT_DICT).unwrap());

        match message.check_attributes() {
            Err(Error::SchemaViolation(msg)) => {
                assert!(msg.contains("Subscription-Id-Data"))
            }
            other => panic!("expected schema violation, got {:?}", other),
        }

        // Completing the group makes the message valid.
        message.delete_all("Subscription-Id");
        let children = vec![
            Avp::new("Subscription-Id-Type", "END_USER_IMSI", avp_flags::M, &DEFAULT_DICT)
                .unwrap(),
            Avp::new("Subscription-Id-Data", "214070123456789", avp_flags::M, &DEFAULT_DICT)
                .unwrap(),
        ];
        message
            .add_avp(Avp::new("Subscription-Id", children, avp_flags::M, &DEFAULT_DICT).unwrap());
        message.check_attributes().unwrap();
    }

    #[test]
    fn test_unknown_command_is_error() {
        let message = DiameterMessage::new(
            999,
            0,
            flags::REQUEST,
            1,
            2,
            Arc::clone(&DEFAULT_DICT),
        );
        assert!(matches!(
            message.check_attributes(),
            Err(Error::DictionaryMiss(_))
        ));
    }
}
