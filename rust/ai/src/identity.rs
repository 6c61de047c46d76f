use std::fmt;

/// Opaque identity handed to an agent at construction.
///
/// `account` stands in for whatever external credential backs the agent
/// (a wallet address, an API account). Wagering never reads it; it is only
/// carried so agents can report who they act for.
#[derive(Clone, PartialEq, Eq)]
pub struct AgentIdentity {
    name: String,
    account: Option<String>,
}

impl AgentIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            account: None,
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }
}

impl fmt::Debug for AgentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentIdentity")
            .field("name", &self.name)
            .field("account", &self.account.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl fmt::Display for AgentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_account() {
        let id = AgentIdentity::new("Player1").with_account("0xabc123");
        assert_eq!(id.account(), Some("0xabc123"));
        let dbg = format!("{:?}", id);
        assert!(!dbg.contains("0xabc123"));
        assert!(dbg.contains("<redacted>"));
        assert_eq!(id.to_string(), "Player1");
    }
}
