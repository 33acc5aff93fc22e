//! Chain access types and error definitions.

use alloy::primitives::Address;
use alloy::sol;
use thiserror::Error;

sol! {
    /// Subset of the Safe account interface.
    #[sol(rpc)]
    interface ISafe {
        function getThreshold() external view returns (uint256);
        function getOwners() external view returns (address[] memory);
        function execTransaction(
            address to,
            uint256 value,
            bytes calldata data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 baseGas,
            uint256 gasPrice,
            address gasToken,
            address refundReceiver,
            bytes memory signatures
        ) external payable returns (bool success);
    }

    interface IMultiSend {
        function multiSend(bytes memory transactions) external payable;
    }
}

/// Threshold and owners of a Safe account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeState {
    pub threshold: u64,
    pub owners: Vec<Address>,
}

/// Errors that can occur during chain reads.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Unsupported chain ID: {0}")]
    UnsupportedChain(u64),

    #[error("Invalid RPC URL '{url}' for chain {chain_id}: {reason}")]
    InvalidRpcUrl {
        chain_id: u64,
        url: String,
        reason: String,
    },

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),
}

pub type ChainResult<T> = Result<T, ChainError>;
