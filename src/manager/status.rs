//! Read-only status projection for page chrome.

use super::WalletManager;

const PREFIX_LEN: usize = 6;
const SUFFIX_LEN: usize = 4;

/// Snapshot consumed by connect/disconnect affordances. Derives from the
/// manager on every call; holds no state of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub address: Option<String>,
    /// `0x4f2a...4455` form for tight chrome.
    pub display_address: Option<String>,
}

impl WalletManager {
    pub fn status(&self) -> ConnectionStatus {
        let address = self.address();
        ConnectionStatus {
            connected: address.is_some(),
            display_address: address.as_deref().map(truncate_address),
            address,
        }
    }
}

/// Truncate an address for display; short addresses pass through whole.
pub fn truncate_address(address: &str) -> String {
    if address.len() <= PREFIX_LEN + SUFFIX_LEN + 1 {
        address.to_string()
    } else {
        format!(
            "{}...{}",
            &address[..PREFIX_LEN],
            &address[address.len() - SUFFIX_LEN..]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_address;

    #[test]
    fn truncates_long_addresses() {
        assert_eq!(truncate_address("0x4f2a9c001122334455"), "0x4f2a...4455");
    }

    #[test]
    fn short_addresses_pass_through() {
        assert_eq!(truncate_address("0x4f2a"), "0x4f2a");
    }

    #[test]
    fn boundary_length_passes_through() {
        // 11 chars: exactly prefix + suffix + 1, not worth eliding.
        assert_eq!(truncate_address("0x123456789"), "0x123456789");
    }
}
