//! FIPA agent identifier.

use serde::{Deserialize, Serialize};

/// A FIPA agent identifier (`agent-identifier` in the basic ontology).
///
/// The name is globally unique; addresses are transport addresses in
/// preference order; resolvers are name-resolution services that can be
/// asked for further addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Aid {
    /// Globally unique agent name (e.g. `ams@platform:1099/JADE`).
    pub name: String,
    /// Transport addresses, most preferred first.
    #[serde(default)]
    pub addresses: Vec<String>,
    /// Naming resolvers for this agent.
    #[serde(default)]
    pub resolvers: Vec<Aid>,
}

impl Aid {
    /// Create an identifier with a name and no addresses or resolvers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            addresses: Vec::new(),
            resolvers: Vec::new(),
        }
    }

    /// Append a transport address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.addresses.push(address.into());
        self
    }

    /// Append a naming resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Self) -> Self {
        self.resolvers.push(resolver);
        self
    }

    /// The local part of the name, before the `@` separator.
    pub fn local_name(&self) -> &str {
        self.name.split('@').next().unwrap_or(&self.name)
    }
}

impl core::fmt::Display for Aid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name)
    }
}
