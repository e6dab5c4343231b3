//! IPv4 network blocks

use crate::error::{PlanError, Result};
use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Prefix length of every generated subnet block
pub const SUBNET_MASK: u8 = 24;

/// A CIDR address block such as `10.0.0.0/16`
///
/// The address is kept exactly as written; only its first two octets
/// take part in subnet generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NetworkBlock {
    net: Ipv4Net,
}

impl NetworkBlock {
    /// Parse a block in `A.B.C.D/mask` form
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PlanError::invalid("CIDR block is empty"));
        }

        let (address, _) = trimmed.split_once('/').ok_or_else(|| {
            PlanError::invalid(format!("'{}' is not a CIDR block (missing /mask)", trimmed))
        })?;

        if address.split('.').count() < 2 {
            return Err(PlanError::invalid(format!(
                "'{}' must have at least two dot-separated octets",
                trimmed
            )));
        }

        let net = Ipv4Net::from_str(trimmed).map_err(|e| {
            PlanError::invalid(format!("'{}' is not a valid IPv4 CIDR block: {}", trimmed, e))
        })?;

        Ok(Self { net })
    }

    /// The catch-all destination `0.0.0.0/0`
    pub fn any() -> Self {
        Self {
            net: Ipv4Net::default(),
        }
    }

    /// Build the `/24` block `{A}.{B}.{third_octet}.0/24` under this block's prefix
    pub fn subnet(&self, third_octet: u8) -> Self {
        let [a, b, _, _] = self.net.addr().octets();
        let addr = Ipv4Addr::new(a, b, third_octet, 0);
        // SUBNET_MASK is always a valid IPv4 prefix length
        let net = Ipv4Net::new(addr, SUBNET_MASK).unwrap_or_default();
        Self { net }
    }

    /// Subnet-block prefix, e.g. `10.0`
    pub fn prefix(&self) -> String {
        let [a, b, _, _] = self.net.addr().octets();
        format!("{}.{}", a, b)
    }

    pub fn mask(&self) -> u8 {
        self.net.prefix_len()
    }

    pub fn address(&self) -> Ipv4Addr {
        self.net.addr()
    }

    /// Third octet of the block address
    pub fn third_octet(&self) -> u8 {
        self.net.addr().octets()[2]
    }

    /// Whether `other` lies entirely inside this block
    pub fn contains(&self, other: &NetworkBlock) -> bool {
        self.net.contains(&other.net)
    }

    pub fn as_ipv4_net(&self) -> Ipv4Net {
        self.net
    }
}

impl fmt::Display for NetworkBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.net)
    }
}

impl FromStr for NetworkBlock {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NetworkBlock {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<NetworkBlock> for String {
    fn from(block: NetworkBlock) -> Self {
        block.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vpc_block() {
        let block = NetworkBlock::parse("10.0.0.0/16").unwrap();
        assert_eq!(block.prefix(), "10.0");
        assert_eq!(block.mask(), 16);
        assert_eq!(block.to_string(), "10.0.0.0/16");
    }

    #[test]
    fn test_parse_keeps_written_address() {
        let block = NetworkBlock::parse(" 172.31.4.0/16 ").unwrap();
        assert_eq!(block.prefix(), "172.31");
        assert_eq!(block.third_octet(), 4);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["not-a-cidr", "", "10/8", "10.0.0.0", "10.0.0.0/33", "300.0.0.0/16"] {
            let err = NetworkBlock::parse(input).unwrap_err();
            assert!(
                matches!(err, PlanError::InvalidConfiguration(_)),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_subnet_uses_first_two_octets() {
        let block = NetworkBlock::parse("10.20.0.0/16").unwrap();
        assert_eq!(block.subnet(5).to_string(), "10.20.5.0/24");
        assert!(block.contains(&block.subnet(5)));
    }

    #[test]
    fn test_any_block() {
        assert_eq!(NetworkBlock::any().to_string(), "0.0.0.0/0");
    }

    #[test]
    fn test_serde_as_string() {
        let block = NetworkBlock::parse("10.0.3.0/24").unwrap();
        let json = serde_json::to_string(&block).unwrap();
        assert_eq!(json, "\"10.0.3.0/24\"");

        let back: NetworkBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);

        assert!(serde_json::from_str::<NetworkBlock>("\"nope\"").is_err());
    }
}
