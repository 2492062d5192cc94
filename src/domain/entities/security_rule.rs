//! Security rule entities
//!
//! A security rule is a named group of ingress permissions attached to a VPC.

/// Name of the group that opens the mosh port.
pub const MOSH_GROUP_NAME: &str = "vaws-mosh";

/// UDP port used by mosh, a disconnect-resistant remote terminal.
pub const MOSH_PORT: u16 = 60001;

/// Transport protocol of an ingress permission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single ingress permission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngressPermission {
    pub protocol: Protocol,
    pub from_port: u16,
    pub to_port: u16,
    pub cidr: String,
}

/// Named set of ingress permissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityRule {
    pub name: String,
    pub description: String,
    pub ingress: Vec<IngressPermission>,
}

impl SecurityRule {
    /// The rule vaws attaches to every cluster: mosh over UDP from anywhere.
    pub fn mosh() -> Self {
        Self {
            name: MOSH_GROUP_NAME.to_string(),
            description: "Enable mosh connections over UDP".to_string(),
            ingress: vec![IngressPermission {
                protocol: Protocol::Udp,
                from_port: MOSH_PORT,
                to_port: MOSH_PORT,
                cidr: "0.0.0.0/0".to_string(),
            }],
        }
    }
}
