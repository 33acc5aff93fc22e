//! EIP-712 typed-data templates for executors.
//!
//! Templates are returned for the caller's wallet to sign; nothing here signs.

use std::str::FromStr;

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol;
use alloy::sol_types::{eip712_domain, SolStruct};
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, ApiResult};
use crate::automation::types::{ConsoleExecutorConfig, KernelExecutorConfig};
use crate::deployer::types::TypedField;

sol! {
    struct ExecutionParams {
        uint8 operation;
        address to;
        address account;
        address executor;
        address gasToken;
        address refundReceiver;
        uint256 value;
        uint256 nonce;
        uint256 safeTxGas;
        uint256 baseGas;
        uint256 gasPrice;
        bytes data;
    }
}

pub const EXECUTOR_PLUGIN_DOMAIN_NAME: &str = "ExecutorPlugin";
pub const EXECUTOR_PLUGIN_DOMAIN_VERSION: &str = "1.0";

fn fields(layout: &[(&str, &str)]) -> Vec<TypedField> {
    layout
        .iter()
        .map(|(name, kind)| TypedField {
            name: (*name).to_string(),
            kind: (*kind).to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDomain {
    pub chain_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModifyExecutorTypes {
    #[serde(rename = "ModifyExecutor")]
    pub modify_executor: Vec<TypedField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyExecutorMessage {
    pub registry_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub ttl: String,
    pub enable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KernelExecutorRegistration712Message {
    pub types: ModifyExecutorTypes,
    pub domain: ChainDomain,
    pub message: ModifyExecutorMessage,
}

/// `ModifyExecutor` typed data enabling an executor on the kernel.
pub fn kernel_executor_registration(
    chain_id: u64,
    registry_id: &str,
    config: &KernelExecutorConfig,
) -> KernelExecutorRegistration712Message {
    KernelExecutorRegistration712Message {
        types: ModifyExecutorTypes {
            modify_executor: fields(&[
                ("registryId", "string"),
                ("type", "string"),
                ("ttl", "string"),
                ("enable", "bool"),
            ]),
        },
        domain: ChainDomain { chain_id },
        message: ModifyExecutorMessage {
            registry_id: registry_id.to_string(),
            kind: config.kind.clone(),
            ttl: config.execution_ttl.clone(),
            enable: true,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegisterExecutorTypes {
    #[serde(rename = "RegisterExecutor")]
    pub register_executor: Vec<TypedField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterExecutorMessage {
    #[serde(flatten)]
    pub config: ConsoleExecutorConfig,
    #[serde(rename = "feeInBPS")]
    pub fee_in_bps: u64,
    pub fee_token: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleExecutorRegistration712Message {
    pub types: RegisterExecutorTypes,
    pub domain: ChainDomain,
    pub message: RegisterExecutorMessage,
    pub primary_type: String,
}

/// `RegisterExecutor` typed data for listing an executor on the console.
pub fn console_executor_registration(
    chain_id: u64,
    config: &ConsoleExecutorConfig,
) -> ConsoleExecutorRegistration712Message {
    ConsoleExecutorRegistration712Message {
        types: RegisterExecutorTypes {
            register_executor: fields(&[
                ("timestamp", "uint256"),
                ("executor", "address"),
                ("inputTokens", "address[]"),
                ("hopAddresses", "address[]"),
                ("feeInBPS", "uint256"),
                ("feeToken", "address"),
                ("feeReceiver", "address"),
                ("limitPerExecution", "bool"),
                ("clientId", "string"),
            ]),
        },
        domain: ChainDomain { chain_id },
        message: RegisterExecutorMessage {
            config: config.clone(),
            fee_in_bps: 0,
            fee_token: Address::ZERO,
        },
        primary_type: "RegisterExecutor".to_string(),
    }
}

/// Inputs for [`executable_digest`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateExecutableTypedDataParams {
    pub chain_id: u64,
    pub plugin_address: Address,
    pub operation: u8,
    pub to: Address,
    pub account: Address,
    pub executor: Address,
    /// Decimal or 0x-hex amount.
    pub value: String,
    /// Decimal or 0x-hex nonce, as returned by `fetch_executor_nonce`.
    pub nonce: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExecutionParamsTypes {
    #[serde(rename = "ExecutionParams")]
    pub execution_params: Vec<TypedField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorPluginDomain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutableDigestMessage {
    pub operation: u8,
    pub to: Address,
    pub account: Address,
    pub executor: Address,
    pub value: String,
    pub nonce: String,
    pub data: Bytes,
    pub gas_token: Address,
    pub refund_receiver: Address,
    pub safe_tx_gas: String,
    pub base_gas: String,
    pub gas_price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutableDigest712Message {
    pub types: ExecutionParamsTypes,
    pub primary_type: String,
    pub domain: ExecutorPluginDomain,
    pub message: ExecutableDigestMessage,
}

impl ExecutableDigest712Message {
    /// The EIP-712 hash a wallet signs for this message.
    pub fn signing_hash(&self) -> ApiResult<B256> {
        let message = &self.message;
        let params = ExecutionParams {
            operation: message.operation,
            to: message.to,
            account: message.account,
            executor: message.executor,
            gasToken: message.gas_token,
            refundReceiver: message.refund_receiver,
            value: parse_uint("value", &message.value)?,
            nonce: parse_uint("nonce", &message.nonce)?,
            safeTxGas: parse_uint("safeTxGas", &message.safe_tx_gas)?,
            baseGas: parse_uint("baseGas", &message.base_gas)?,
            gasPrice: parse_uint("gasPrice", &message.gas_price)?,
            data: message.data.clone(),
        };
        let domain = eip712_domain! {
            name: EXECUTOR_PLUGIN_DOMAIN_NAME,
            version: EXECUTOR_PLUGIN_DOMAIN_VERSION,
            chain_id: self.domain.chain_id,
            verifying_contract: self.domain.verifying_contract,
        };
        Ok(params.eip712_signing_hash(&domain))
    }
}

fn parse_uint(field: &str, value: &str) -> ApiResult<U256> {
    U256::from_str(value)
        .map_err(|e| ApiError::Validation(format!("Invalid {}: {}", field, e)))
}

/// `ExecutionParams` typed data an executor signs to run a task.
pub fn executable_digest(params: &GenerateExecutableTypedDataParams) -> ExecutableDigest712Message {
    ExecutableDigest712Message {
        types: ExecutionParamsTypes {
            execution_params: fields(&[
                ("operation", "uint8"),
                ("to", "address"),
                ("account", "address"),
                ("executor", "address"),
                ("gasToken", "address"),
                ("refundReceiver", "address"),
                ("value", "uint256"),
                ("nonce", "uint256"),
                ("safeTxGas", "uint256"),
                ("baseGas", "uint256"),
                ("gasPrice", "uint256"),
                ("data", "bytes"),
            ]),
        },
        primary_type: "ExecutionParams".to_string(),
        domain: ExecutorPluginDomain {
            name: EXECUTOR_PLUGIN_DOMAIN_NAME.to_string(),
            version: EXECUTOR_PLUGIN_DOMAIN_VERSION.to_string(),
            chain_id: params.chain_id,
            verifying_contract: params.plugin_address,
        },
        message: ExecutableDigestMessage {
            operation: params.operation,
            to: params.to,
            account: params.account,
            executor: params.executor,
            value: params.value.clone(),
            nonce: params.nonce.clone(),
            data: params.data.clone(),
            gas_token: Address::ZERO,
            refund_receiver: Address::ZERO,
            safe_tx_gas: "0".to_string(),
            base_gas: "0".to_string(),
            gas_price: "0".to_string(),
        },
    }
}
