//! Calldata for executing transactions through a 1-of-N Safe.
//!
//! # Design Decisions
//! - One transaction is executed directly; several are packed into a
//!   `multiSend` delegate call
//! - The signature is the pre-validated form, valid when the submitting
//!   EOA is itself an owner and the threshold is 1

use std::str::FromStr;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::api::{ApiError, ApiResult, CalldataTransaction};
use crate::blockchain::{addresses, IMultiSend, ISafe};
use crate::core_actions::types::SafeTransaction;

const OPERATION_DELEGATE_CALL: u8 = 1;

/// `bytes12(0) ‖ owner ‖ bytes32(0) ‖ 0x01`
pub fn prevalidated_signature(owner: Address) -> Bytes {
    let mut signature = Vec::with_capacity(65);
    signature.extend_from_slice(&[0u8; 12]);
    signature.extend_from_slice(owner.as_slice());
    signature.extend_from_slice(&[0u8; 32]);
    signature.push(1);
    Bytes::from(signature)
}

/// Pack transactions in the MultiSend layout:
/// `operation (1) ‖ to (20) ‖ value (32) ‖ data length (32) ‖ data`.
pub fn encode_multisend(transactions: &[CalldataTransaction]) -> ApiResult<Bytes> {
    let mut packed = Vec::new();
    for tx in transactions {
        let value = parse_value(&tx.value)?;
        packed.push(tx.operation);
        packed.extend_from_slice(tx.to.as_slice());
        packed.extend_from_slice(&value.to_be_bytes::<32>());
        packed.extend_from_slice(&U256::from(tx.data.len()).to_be_bytes::<32>());
        packed.extend_from_slice(&tx.data);
    }
    Ok(Bytes::from(packed))
}

/// Build the `execTransaction` call on `console` that runs `transactions`,
/// signed by `eoa`.
pub fn encode_exec_transaction(
    eoa: Address,
    console: Address,
    transactions: &[CalldataTransaction],
) -> ApiResult<SafeTransaction> {
    let (to, value, data, operation) = match transactions {
        [] => {
            return Err(ApiError::Validation(
                "No transactions were passed".to_string(),
            ))
        }
        [single] => (
            single.to,
            parse_value(&single.value)?,
            single.data.clone(),
            single.operation,
        ),
        many => {
            let packed = encode_multisend(many)?;
            let call = IMultiSend::multiSendCall {
                transactions: packed,
            };
            (
                addresses::MULTISEND,
                U256::ZERO,
                Bytes::from(call.abi_encode()),
                OPERATION_DELEGATE_CALL,
            )
        }
    };

    let call = ISafe::execTransactionCall {
        to,
        value,
        data,
        operation,
        safeTxGas: U256::ZERO,
        baseGas: U256::ZERO,
        gasPrice: U256::ZERO,
        gasToken: Address::ZERO,
        refundReceiver: Address::ZERO,
        signatures: prevalidated_signature(eoa),
    };

    Ok(SafeTransaction {
        to: console,
        value: "0".to_string(),
        data: Bytes::from(call.abi_encode()),
    })
}

fn parse_value(value: &str) -> ApiResult<U256> {
    if value.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str(value)
        .map_err(|e| ApiError::Validation(format!("Invalid transaction value '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(to: u8, value: &str, data: &[u8]) -> CalldataTransaction {
        CalldataTransaction {
            to: Address::repeat_byte(to),
            data: Bytes::copy_from_slice(data),
            value: value.to_string(),
            operation: 0,
        }
    }

    #[test]
    fn test_prevalidated_signature_layout() {
        let owner = Address::repeat_byte(0x11);
        let sig = prevalidated_signature(owner);
        assert_eq!(sig.len(), 65);
        assert_eq!(&sig[..12], &[0u8; 12]);
        assert_eq!(&sig[12..32], owner.as_slice());
        assert_eq!(&sig[32..64], &[0u8; 32]);
        assert_eq!(sig[64], 1);
    }

    #[test]
    fn test_single_transaction_is_direct() {
        let eoa = Address::repeat_byte(0x11);
        let console = Address::repeat_byte(0x22);
        let safe_tx = encode_exec_transaction(eoa, console, &[tx(0x33, "5", &[0xde, 0xad])]).unwrap();

        assert_eq!(safe_tx.to, console);
        assert_eq!(safe_tx.value, "0");
        assert_eq!(&safe_tx.data[..4], &[0x6a, 0x76, 0x12, 0x02]);

        let decoded = ISafe::execTransactionCall::abi_decode(&safe_tx.data).unwrap();
        assert_eq!(decoded.to, Address::repeat_byte(0x33));
        assert_eq!(decoded.value, U256::from(5));
        assert_eq!(decoded.operation, 0);
        assert_eq!(decoded.data.as_ref(), &[0xde, 0xad]);
        assert_eq!(decoded.signatures.len(), 65);
        assert_eq!(decoded.gasToken, Address::ZERO);
    }

    #[test]
    fn test_many_transactions_use_multisend() {
        let eoa = Address::repeat_byte(0x11);
        let console = Address::repeat_byte(0x22);
        let txs = [tx(0x33, "0", &[0x01]), tx(0x44, "0x10", &[])];

        let safe_tx = encode_exec_transaction(eoa, console, &txs).unwrap();
        let decoded = ISafe::execTransactionCall::abi_decode(&safe_tx.data).unwrap();

        assert_eq!(decoded.to, addresses::MULTISEND);
        assert_eq!(decoded.operation, OPERATION_DELEGATE_CALL);
        assert_eq!(&decoded.data[..4], &[0x8d, 0x80, 0xff, 0x0a]);

        let inner = IMultiSend::multiSendCall::abi_decode(&decoded.data).unwrap();
        assert_eq!(inner.transactions, encode_multisend(&txs).unwrap());
    }

    #[test]
    fn test_batch_with_inner_delegate_call_targets_multisend() {
        let eoa = Address::repeat_byte(0x11);
        let console = Address::repeat_byte(0x22);
        let mut delegated = tx(0x44, "0", &[0x02]);
        delegated.operation = OPERATION_DELEGATE_CALL;
        let txs = [tx(0x33, "0", &[0x01]), delegated];

        let safe_tx = encode_exec_transaction(eoa, console, &txs).unwrap();
        let decoded = ISafe::execTransactionCall::abi_decode(&safe_tx.data).unwrap();
        assert_eq!(
            decoded.to,
            "0xA238CBeb142c10Ef7Ad8442C6D1f9E89e07e7761"
                .parse::<Address>()
                .unwrap()
        );

        let inner = IMultiSend::multiSendCall::abi_decode(&decoded.data).unwrap();
        let second = 1 + 20 + 32 + 32 + 1;
        assert_eq!(inner.transactions[0], 0);
        assert_eq!(inner.transactions[second], OPERATION_DELEGATE_CALL);
        assert_eq!(
            &inner.transactions[second + 1..second + 21],
            Address::repeat_byte(0x44).as_slice()
        );
    }

    #[test]
    fn test_multisend_packing() {
        let packed = encode_multisend(&[tx(0x33, "16", &[0xaa, 0xbb])]).unwrap();
        assert_eq!(packed.len(), 1 + 20 + 32 + 32 + 2);
        assert_eq!(packed[0], 0);
        assert_eq!(&packed[1..21], Address::repeat_byte(0x33).as_slice());
        assert_eq!(packed[52], 16);
        assert_eq!(packed[84], 2);
        assert_eq!(&packed[85..], &[0xaa, 0xbb]);
    }

    #[test]
    fn test_rejects_empty_and_bad_value() {
        let eoa = Address::repeat_byte(0x11);
        assert!(encode_exec_transaction(eoa, eoa, &[]).unwrap_err().is_validation());
        assert!(encode_exec_transaction(eoa, eoa, &[tx(1, "abc", &[])])
            .unwrap_err()
            .is_validation());
    }
}
