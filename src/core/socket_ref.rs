//! Flache Socket-Adressen im Format `block.socket`.

use super::error::{NetworkError, Result};

/// Trennzeichen zwischen Block- und Socket-Name.
pub const SOCKET_REF_SEPARATOR: char = '.';

/// Zerlegte Socket-Referenz
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SocketRef {
    /// Block-Name
    pub block: String,
    /// Socket-Name
    pub socket: String,
}

impl SocketRef {
    /// Erstellt eine Referenz aus Block- und Socket-Name.
    pub fn new(block: impl Into<String>, socket: impl Into<String>) -> Self {
        Self {
            block: block.into(),
            socket: socket.into(),
        }
    }

    /// Zerlegt `block.socket` am ersten '.'; beide Teile werden getrimmt.
    pub fn parse(flat_name: &str) -> Result<Self> {
        let (block, socket) = flat_name
            .split_once(SOCKET_REF_SEPARATOR)
            .ok_or_else(|| NetworkError::MalformedSocketRef(flat_name.to_string()))?;
        Ok(Self::new(block.trim(), socket.trim()))
    }

    /// Flacher Name `block.socket`.
    pub fn flat_name(&self) -> String {
        format!("{}{}{}", self.block, SOCKET_REF_SEPARATOR, self.socket)
    }

    /// True, wenn `flat_name` auf einen Socket des Blocks `block` zeigt.
    pub fn refers_to_block(flat_name: &str, block: &str) -> bool {
        flat_name
            .split_once(SOCKET_REF_SEPARATOR)
            .is_some_and(|(b, _)| b.trim() == block)
    }
}

impl std::fmt::Display for SocketRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.block, SOCKET_REF_SEPARATOR, self.socket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_on_first_dot() {
        let r = SocketRef::parse("Pump.out.1").expect("gueltig");
        assert_eq!(r.block, "Pump");
        assert_eq!(r.socket, "out.1");
        assert_eq!(r.flat_name(), "Pump.out.1");
    }

    #[test]
    fn parse_trims_whitespace() {
        let r = SocketRef::parse(" A . in ").expect("gueltig");
        assert_eq!(r, SocketRef::new("A", "in"));
    }

    #[test]
    fn missing_separator_is_an_error() {
        let err = SocketRef::parse("NoDot").expect_err("muss fehlschlagen");
        assert_eq!(err, NetworkError::MalformedSocketRef("NoDot".into()));
    }

    #[test]
    fn refers_to_block_matches_prefix_exactly() {
        assert!(SocketRef::refers_to_block("A.in", "A"));
        assert!(!SocketRef::refers_to_block("AB.in", "A"));
        assert!(!SocketRef::refers_to_block("A", "A"));
    }
}
