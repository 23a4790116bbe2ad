//! The RFC 2307 NIS syntaxes: netgroup triple and boot parameter.

use super::{Input, Value};
use crate::error::{SyntaxError, SyntaxResult};

/// `( hostname, username, domainname )` with each component optional.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct NetgroupTriple {
    pub hostname: Option<String>,
    pub username: Option<String>,
    pub domainname: Option<String>,
}

fn triple_component(field: &str, label: &str) -> SyntaxResult<Option<String>> {
    let field = field.trim();
    if field.is_empty() || field == "-" {
        return Ok(None);
    }
    let valid = field
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_'));
    if valid {
        Ok(Some(field.to_owned()))
    } else {
        Err(SyntaxError::bad(
            "NIS Netgroup Triple",
            format!("bad {label} component '{field}'"),
        ))
    }
}

impl NetgroupTriple {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        const SYNTAX: &str = "NIS Netgroup Triple";
        let inner = text
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| SyntaxError::bad(SYNTAX, "expected parenthesized triple"))?;
        let fields: Vec<&str> = inner.split(',').collect();
        let [hostname, username, domainname] = fields.as_slice() else {
            return Err(SyntaxError::bad(SYNTAX, "expected three components"));
        };
        Ok(Self {
            hostname: triple_component(hostname, "hostname")?,
            username: triple_component(username, "username")?,
            domainname: triple_component(domainname, "domainname")?,
        })
    }
}

impl core::fmt::Display for NetgroupTriple {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let part = |component: &Option<String>| component.clone().unwrap_or_default();
        write!(
            f,
            "({},{},{})",
            part(&self.hostname),
            part(&self.username),
            part(&self.domainname)
        )
    }
}

/// `key=server:path`, naming a boot file on a server.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct BootParameter {
    pub key: String,
    pub server: String,
    pub path: String,
}

impl BootParameter {
    pub fn parse(text: &str) -> SyntaxResult<Self> {
        const SYNTAX: &str = "NIS Boot Parameter";
        let (key, rest) = text
            .split_once('=')
            .ok_or_else(|| SyntaxError::bad(SYNTAX, "missing '='"))?;
        let (server, path) = rest
            .split_once(':')
            .ok_or_else(|| SyntaxError::bad(SYNTAX, "missing ':'"))?;
        if key.is_empty() || server.is_empty() || path.is_empty() {
            return Err(SyntaxError::bad(SYNTAX, "empty component"));
        }
        Ok(Self {
            key: key.to_owned(),
            server: server.to_owned(),
            path: path.to_owned(),
        })
    }
}

impl core::fmt::Display for BootParameter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}={}:{}", self.key, self.server, self.path)
    }
}

pub(super) fn check_netgroup_triple(input: Input<'_>) -> SyntaxResult<Value> {
    NetgroupTriple::parse(input.text("NIS Netgroup Triple")?).map(Value::NetgroupTriple)
}

pub(super) fn check_boot_parameter(input: Input<'_>) -> SyntaxResult<Value> {
    BootParameter::parse(input.text("NIS Boot Parameter")?).map(Value::BootParameter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn netgroup_triples() {
        let value = NetgroupTriple::parse("(host1,user1,example.com)").unwrap();
        assert_eq!(value.hostname.as_deref(), Some("host1"));
        assert_eq!(value.to_string(), "(host1,user1,example.com)");

        let wildcards = NetgroupTriple::parse("(,-,)").unwrap();
        assert!(wildcards.hostname.is_none());
        assert!(wildcards.username.is_none());

        assert!(NetgroupTriple::parse("host,user,domain").is_err());
        assert!(NetgroupTriple::parse("(host,user)").is_err());
    }

    #[test]
    fn boot_parameters() {
        let value = BootParameter::parse("root=fileserver:/nfsroot/client").unwrap();
        assert_eq!(value.server, "fileserver");
        assert_eq!(value.to_string(), "root=fileserver:/nfsroot/client");
        assert!(BootParameter::parse("root=fileserver").is_err());
        assert!(BootParameter::parse("fileserver:/nfsroot").is_err());
    }
}
