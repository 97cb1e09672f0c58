//! Human-readable rendering of packets and messages.

use std::fmt;

use crate::diameter::{Avp as DiameterAvp, DiameterMessage};
use crate::radius::{Avp as RadiusAvp, Packet, PacketCode};
use crate::value::Value;

fn get_bool_unicode(v: bool) -> &'static str {
    if v {
        "✓"
    } else {
        "✗"
    }
}

impl fmt::Display for DiameterMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let command = self
            .command_name()
            .unwrap_or_else(|| "Unknown".to_string());
        let application = self
            .application_name()
            .unwrap_or_else(|| "Unknown".to_string());
        let request_flag = if self.flags.request { "Request" } else { "Answer" };
        let proxyable_flag = if self.flags.proxyable { " Proxyable" } else { "" };
        let error_flag = if self.flags.error { " Error" } else { "" };
        let retransmit_flag = if self.flags.retransmit { " Retransmit" } else { "" };

        write!(
            f,
            "{}({}) {}({}) {}{}{}{} {}, {}\n",
            command,
            self.command_code,
            application,
            self.application_id,
            request_flag,
            proxyable_flag,
            error_flag,
            retransmit_flag,
            self.hop_by_hop_id,
            self.end_to_end_id
        )?;
        write!(
            f,
            "  {:<40} {:>8} {:>5}  {} {} {}  {:<16}  {}\n",
            "AVP", "Vendor", "Code", "V", "M", "P", "Type", "Value"
        )?;

        for avp in self.avps() {
            avp.fmt_row(f, 0)?;
        }
        Ok(())
    }
}

impl DiameterAvp {
    fn fmt_row(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let name = format!("{:indent$}{}", "", self.name(), indent = depth * 2);
        let vendor = match self.vendor_id() {
            0 => String::new(),
            v => v.to_string(),
        };
        let value = match self.value() {
            Value::Group(_) => String::new(),
            _ => self.string_value(),
        };
        write!(
            f,
            "  {:<40} {:>8} {:>5}  {} {} {}  {:<16}  {}\n",
            name,
            vendor,
            self.code(),
            get_bool_unicode(self.vendor_id() != 0),
            get_bool_unicode(self.is_mandatory()),
            get_bool_unicode(self.is_private()),
            format!("{:?}", self.spec().avp_type),
            value
        )?;
        for child in self.value().as_group() {
            child.fmt_row(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for DiameterAvp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_row(f, 0)
    }
}

impl fmt::Display for PacketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) id {}\n",
            self.code, self.code as u8, self.identifier
        )?;
        write!(
            f,
            "  {:<40} {:>8} {:>5} {:>4}  {:<12}  {}\n",
            "Attribute", "Vendor", "Code", "Tag", "Type", "Value"
        )?;
        for avp in self.avps() {
            write!(f, "{}", avp)?;
        }
        Ok(())
    }
}

impl fmt::Display for RadiusAvp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vendor = match self.vendor_id() {
            0 => String::new(),
            v => v.to_string(),
        };
        let tag = if self.spec().tagged {
            self.tag().to_string()
        } else {
            String::new()
        };
        write!(
            f,
            "  {:<40} {:>8} {:>5} {:>4}  {:<12}  {}\n",
            self.name(),
            vendor,
            self.code(),
            tag,
            format!("{:?}", self.spec().avp_type),
            self.string_value()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diameter::{avp_flags, flags};
    use crate::dictionary::DEFAULT_DICT;
    use std::sync::Arc;

    #[test]
    fn test_display_diameter_message() {
        let mut message = DiameterMessage::new(
            272,
            4,
            flags::REQUEST | flags::PROXYABLE,
            1123158610,
            3102381851,
            Arc::clone(&DEFAULT_DICT),
        );
        message.add("Session-Id", "ses;12345888").unwrap();
        let children = vec![DiameterAvp::new(
            "Subscription-Id-Type",
            "END_USER_E164",
            avp_flags::M,
            &DEFAULT_DICT,
        )
        .unwrap()];
        message
            .add_avp(DiameterAvp::new("Subscription-Id", children, avp_flags::M, &DEFAULT_DICT).unwrap());

        let rendered = message.to_string();
        assert!(rendered.starts_with("Credit-Control(272) Credit-Control(4) Request Proxyable"));
        assert!(rendered.contains("Session-Id"));
        assert!(rendered.contains("END_USER_E164"));
    }

    #[test]
    fn test_display_radius_packet() {
        let mut packet = Packet::new(PacketCode::AccessRequest, Arc::clone(&DEFAULT_DICT));
        packet.add("User-Name", "alice").unwrap();
        packet.add("Tunnel-Type", "L2TP:1").unwrap();

        let rendered = packet.to_string();
        assert!(rendered.starts_with("AccessRequest(1) id 0"));
        assert!(rendered.contains("alice"));
        assert!(rendered.contains("L2TP"));
    }
}
