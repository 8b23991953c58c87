//! Decisions and status texts around the host collaborators: wallet gate, score sharing and
//! minting. The actual I/O lives in the front end; nothing in here touches the engine.

use alloc::format;
use alloc::string::{String, ToString};
use thiserror::Error;

use crate::Phase;

/// Lowest score that may be minted.
pub const MINT_SCORE_THRESHOLD: u32 = 30;

pub const BASE_CHAIN_ID: u64 = 8453;
pub const BASE_CHAIN_ID_HEX: &str = "0x2105";
pub const BASE_CHAIN_NAME: &str = "Base";
pub const BASE_RPC_URL: &str = "https://mainnet.base.org";
pub const BASE_EXPLORER_URL: &str = "https://basescan.org";

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// First four bytes of `keccak256("mintScore(uint256)")`.
pub const MINT_SCORE_SELECTOR: [u8; 4] = [0xb4, 0x20, 0x93, 0x36];

pub const COMPOSE_URL: &str = "https://warpcast.com/~/compose";

/// Provider error codes, see EIP-1193 and JSON-RPC.
pub const USER_REJECTED_CODE: i64 = 4001;
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;
pub const INTERNAL_RPC_ERROR_CODE: i64 = -32603;

const UNKNOWN_MESSAGE_LIMIT: usize = 50;

/// Failures of the host collaborators, phrased for the player.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Transaction rejected by user")]
    RejectedByUser,
    #[error("No wallet detected. Please install MetaMask or use a Web3 browser.")]
    NoProvider,
    #[error("Contract not deployed. Set the contract address before minting.")]
    ContractNotDeployed,
    #[error("Score must be at least {MINT_SCORE_THRESHOLD} to mint")]
    ScoreTooLow,
    #[error("Contract error. Make sure the contract is deployed correctly.")]
    Contract,
    #[error("Failed to mint: {0}")]
    Unknown(String),
}

impl HostError {
    /// Maps a provider error code and message onto a category.
    pub fn classify(code: Option<i64>, message: &str) -> Self {
        if code == Some(USER_REJECTED_CODE) || message.contains("User rejected") {
            Self::RejectedByUser
        } else if message.contains("Score must be at least") {
            Self::ScoreTooLow
        } else if message.contains("No ethereum provider") {
            Self::NoProvider
        } else if code == Some(INTERNAL_RPC_ERROR_CODE) {
            Self::Contract
        } else if message.trim().is_empty() {
            Self::Unknown("Unknown error".to_string())
        } else {
            Self::Unknown(message.chars().take(UNKNOWN_MESSAGE_LIMIT).collect())
        }
    }
}

pub fn offer_mint(phase: Phase, score: u32) -> bool {
    phase.is_game_over() && score >= MINT_SCORE_THRESHOLD
}

/// Progress of a mint, shown under the game-over banner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MintStatus {
    #[default]
    Idle,
    CheckingNetwork,
    SwitchingNetwork,
    Preparing,
    AwaitingSignature,
    Confirming {
        tx_hash: String,
    },
    Minted {
        tx_hash: String,
    },
    Failed(HostError),
}

impl MintStatus {
    pub fn message(&self) -> String {
        use MintStatus::*;
        match self {
            Idle => String::new(),
            CheckingNetwork => "Checking network...".to_string(),
            SwitchingNetwork => "Switching to Base network...".to_string(),
            Preparing => "Preparing transaction...".to_string(),
            AwaitingSignature => "Waiting for confirmation...".to_string(),
            Confirming { .. } => "Confirming transaction...".to_string(),
            Minted { .. } => "NFT minted successfully!".to_string(),
            Failed(err) => err.to_string(),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_busy(&self) -> bool {
        use MintStatus::*;
        matches!(
            self,
            CheckingNetwork | SwitchingNetwork | Preparing | AwaitingSignature | Confirming { .. }
        )
    }

    pub fn tx_hash(&self) -> Option<&str> {
        match self {
            Self::Confirming { tx_hash } | Self::Minted { tx_hash } => Some(tx_hash),
            _ => None,
        }
    }

    /// How long a final status stays on screen before it is cleared.
    pub fn auto_clear_after_ms(&self) -> Option<u32> {
        match self {
            Self::Minted { .. } | Self::Failed(HostError::NoProvider) => Some(3_000),
            Self::Failed(_) => Some(5_000),
            _ => None,
        }
    }
}

pub fn explorer_tx_url(tx_hash: &str) -> String {
    format!("{BASE_EXPLORER_URL}/tx/{tx_hash}")
}

/// ABI calldata for `mintScore(uint256 score)`.
pub fn mint_calldata(score: u32) -> String {
    format!("0x{:08x}{:064x}", u32::from_be_bytes(MINT_SCORE_SELECTOR), score)
}

/// `0x` followed by 40 hex digits.
pub fn is_address(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Contract address to mint against, if one is configured.
pub fn mint_contract(configured: Option<&str>) -> Result<&str, HostError> {
    match configured {
        Some(address) if is_address(address) && !address.eq_ignore_ascii_case(ZERO_ADDRESS) => {
            Ok(address)
        }
        _ => Err(HostError::ContractNotDeployed),
    }
}

/// Reads the `status` field of a transaction receipt (`"0x1"` success, `"0x0"` reverted).
pub fn receipt_succeeded(status: &str) -> Option<bool> {
    match status {
        "0x1" | "0x01" => Some(true),
        "0x0" | "0x00" => Some(false),
        _ => None,
    }
}

pub fn share_text(score: u32) -> String {
    format!("Just scored {score} points in Snake Game! Can you beat my score?")
}

/// `0x1234...abcd`
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Wallet gate in front of the game.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Gate {
    /// Still looking for an already connected account.
    #[default]
    Loading,
    Locked,
    Connecting,
    /// `None` when playing without a wallet.
    Open { address: Option<String> },
}

impl Gate {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Open {
                address: Some(address),
            } => Some(address),
            _ => None,
        }
    }

    /// Result of the silent account check done at startup.
    pub fn loaded(&mut self, existing: Option<String>) {
        if !matches!(self, Self::Loading) {
            return;
        }
        *self = match existing {
            Some(address) => Self::Open {
                address: Some(address),
            },
            None => Self::Locked,
        };
    }

    /// Returns `false` when a connection cannot be started from the current state.
    pub fn begin_connect(&mut self) -> bool {
        if matches!(self, Self::Locked) {
            *self = Self::Connecting;
            true
        } else {
            false
        }
    }

    pub fn finish_connect(&mut self, result: Result<Option<String>, HostError>) {
        if !matches!(self, Self::Connecting) {
            return;
        }
        *self = match result {
            Ok(Some(address)) => Self::Open {
                address: Some(address),
            },
            // no injected wallet, let them play without one
            Err(HostError::NoProvider) => Self::Open { address: None },
            Ok(None) | Err(_) => Self::Locked,
        };
    }

    pub fn open_as_guest(&mut self) {
        *self = Self::Open { address: None };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_matches_provider_failures() {
        assert_eq!(HostError::classify(Some(4001), ""), HostError::RejectedByUser);
        assert_eq!(
            HostError::classify(None, "MetaMask Tx Signature: User rejected the request."),
            HostError::RejectedByUser
        );
        assert_eq!(
            HostError::classify(Some(3), "execution reverted: Score must be at least 30"),
            HostError::ScoreTooLow
        );
        assert_eq!(
            HostError::classify(None, "No ethereum provider found"),
            HostError::NoProvider
        );
        assert_eq!(HostError::classify(Some(-32603), "boom"), HostError::Contract);
        assert_eq!(
            HostError::classify(None, ""),
            HostError::Unknown("Unknown error".to_string())
        );
    }

    #[test]
    fn unknown_messages_are_truncated() {
        let long = "x".repeat(80);
        let HostError::Unknown(message) = HostError::classify(None, &long) else {
            panic!("expected unknown");
        };
        assert_eq!(message.len(), 50);
    }

    #[test]
    fn mint_is_offered_only_after_a_good_game() {
        assert!(offer_mint(Phase::GameOver, 30));
        assert!(offer_mint(Phase::GameOver, 120));
        assert!(!offer_mint(Phase::GameOver, 20));
        assert!(!offer_mint(Phase::Running, 50));
        assert!(!offer_mint(Phase::Idle, 50));
    }

    #[test]
    fn status_texts_and_timeouts() {
        assert_eq!(MintStatus::Idle.message(), "");
        assert!(MintStatus::AwaitingSignature.is_busy());
        assert!(!MintStatus::Failed(HostError::Contract).is_busy());

        let confirming = MintStatus::Confirming {
            tx_hash: "0xabc".to_string(),
        };
        assert_eq!(confirming.tx_hash(), Some("0xabc"));
        assert_eq!(confirming.auto_clear_after_ms(), None);

        let minted = MintStatus::Minted {
            tx_hash: "0xabc".to_string(),
        };
        assert_eq!(minted.auto_clear_after_ms(), Some(3_000));
        assert_eq!(
            MintStatus::Failed(HostError::NoProvider).auto_clear_after_ms(),
            Some(3_000)
        );
        assert_eq!(
            MintStatus::Failed(HostError::RejectedByUser).message(),
            "Transaction rejected by user"
        );
        assert_eq!(
            MintStatus::Failed(HostError::RejectedByUser).auto_clear_after_ms(),
            Some(5_000)
        );
        assert_eq!(
            HostError::ScoreTooLow.to_string(),
            "Score must be at least 30 to mint"
        );
    }

    #[test]
    fn calldata_encodes_selector_and_score() {
        let data = mint_calldata(40);
        assert_eq!(data.len(), 2 + 8 + 64);
        assert!(data.starts_with("0xb4209336"));
        assert!(data.ends_with("0028"));
        assert_eq!(&data[10..70], "0".repeat(60));
    }

    #[test]
    fn contract_address_must_be_configured() {
        assert_eq!(mint_contract(None), Err(HostError::ContractNotDeployed));
        assert_eq!(mint_contract(Some(ZERO_ADDRESS)), Err(HostError::ContractNotDeployed));
        assert_eq!(mint_contract(Some("0x1234")), Err(HostError::ContractNotDeployed));

        let address = "0xe1bf2Dd72A8A026bEb20d8bF75276DF260507eFc";
        assert_eq!(mint_contract(Some(address)), Ok(address));
    }

    #[test]
    fn receipt_status_parsing() {
        assert_eq!(receipt_succeeded("0x1"), Some(true));
        assert_eq!(receipt_succeeded("0x0"), Some(false));
        assert_eq!(receipt_succeeded("pending"), None);
    }

    #[test]
    fn share_and_display_helpers() {
        assert_eq!(
            share_text(70),
            "Just scored 70 points in Snake Game! Can you beat my score?"
        );
        assert_eq!(
            short_address("0xe1bf2Dd72A8A026bEb20d8bF75276DF260507eFc"),
            "0xe1bf...7eFc"
        );
        assert_eq!(short_address("0x12"), "0x12");
        assert_eq!(explorer_tx_url("0xff"), "https://basescan.org/tx/0xff");
    }

    #[test]
    fn gate_flow() {
        let mut gate = Gate::default();
        assert!(!gate.begin_connect());

        gate.loaded(None);
        assert_eq!(gate, Gate::Locked);
        assert!(gate.begin_connect());
        assert!(!gate.begin_connect());

        gate.finish_connect(Err(HostError::RejectedByUser));
        assert_eq!(gate, Gate::Locked);

        gate.begin_connect();
        gate.finish_connect(Ok(Some("0xabc".to_string())));
        assert!(gate.is_open());
        assert_eq!(gate.address(), Some("0xabc"));

        // late results are ignored once open
        gate.finish_connect(Ok(None));
        assert!(gate.is_open());
    }

    #[test]
    fn gate_opens_for_guests_without_provider() {
        let mut gate = Gate::Locked;
        gate.begin_connect();
        gate.finish_connect(Err(HostError::NoProvider));
        assert_eq!(gate, Gate::Open { address: None });
        assert_eq!(gate.address(), None);

        let mut gate = Gate::default();
        gate.loaded(Some("0xdef".to_string()));
        assert_eq!(gate.address(), Some("0xdef"));
    }
}
