//! IP prefix type (CIDR notation).

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

/// An IP network prefix, IPv4 or IPv6.
///
/// The prefix length is validated against the address family on
/// construction, so a stored prefix is always well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IpPrefix {
    addr: IpAddr,
    len: u8,
}

impl IpPrefix {
    /// Creates a prefix, rejecting a length longer than the address family
    /// allows (32 for IPv4, 128 for IPv6).
    pub fn new(addr: IpAddr, len: u8) -> Result<Self, ParseError> {
        let max = match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        if len > max {
            return Err(ParseError::InvalidIpPrefix(format!("{addr}/{len}")));
        }
        Ok(IpPrefix { addr, len })
    }

    /// Returns the network address.
    pub const fn addr(&self) -> IpAddr {
        self.addr
    }

    /// Returns the prefix length in bits.
    pub const fn len(&self) -> u8 {
        self.len
    }

    /// Returns true for a zero-length IPv4 prefix (the default value).
    pub fn is_default_route(&self) -> bool {
        self.len == 0
    }
}

impl Default for IpPrefix {
    fn default() -> Self {
        IpPrefix {
            addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            len: 0,
        }
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.len)
    }
}

impl FromStr for IpPrefix {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, len) = s
            .split_once('/')
            .ok_or_else(|| ParseError::InvalidIpPrefix(s.to_string()))?;
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| ParseError::InvalidIpPrefix(s.to_string()))?;
        let len: u8 = len
            .parse()
            .map_err(|_| ParseError::InvalidIpPrefix(s.to_string()))?;
        IpPrefix::new(addr, len)
    }
}

impl TryFrom<String> for IpPrefix {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<IpPrefix> for String {
    fn from(prefix: IpPrefix) -> String {
        prefix.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_v4() {
        let p: IpPrefix = "10.1.0.0/16".parse().unwrap();
        assert_eq!(p.addr(), "10.1.0.0".parse::<IpAddr>().unwrap());
        assert_eq!(p.len(), 16);
        assert_eq!(p.to_string(), "10.1.0.0/16");
    }

    #[test]
    fn test_parse_v6() {
        let p: IpPrefix = "fc00::/64".parse().unwrap();
        assert_eq!(p.len(), 64);
        assert_eq!(p.to_string(), "fc00::/64");
    }

    #[test]
    fn test_length_bounds() {
        assert!("10.0.0.0/33".parse::<IpPrefix>().is_err());
        assert!("fc00::/129".parse::<IpPrefix>().is_err());
        assert!("10.0.0.0/32".parse::<IpPrefix>().is_ok());
        assert!("fc00::/128".parse::<IpPrefix>().is_ok());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("10.0.0.0".parse::<IpPrefix>().is_err());
        assert!("banana/8".parse::<IpPrefix>().is_err());
        assert!("10.0.0.0/x".parse::<IpPrefix>().is_err());
    }

    #[test]
    fn test_default_is_zero_v4() {
        let p = IpPrefix::default();
        assert!(p.is_default_route());
        assert_eq!(p.to_string(), "0.0.0.0/0");
    }
}
