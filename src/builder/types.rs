//! Parameters for message-based calls to the parent context.

use std::collections::BTreeMap;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A call to queue in the parent's transaction builder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderTransaction {
    pub to_address: Address,
    pub call_data: String,
    /// Wei, as a decimal string.
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BuilderParams {
    pub transactions: Vec<BuilderTransaction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddToTxnBuilderParams<'a> {
    pub params: &'a BuilderParams,
    pub automation_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAutomationParams {
    pub token_limits: BTreeMap<String, String>,
    pub token_inputs: BTreeMap<String, String>,
    pub registry_id: String,
    pub fee_token: Address,
    pub fee_amount: String,
    pub metadata: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CancelAutomationParams {
    pub subaccount: Address,
}

/// An asset the parent knows about for the current account.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub address: Address,
    pub chain_id: u64,
    #[serde(default)]
    pub logo: String,
    pub decimals: u8,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub prices: BTreeMap<String, f64>,
    /// Presentation fields the kit does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The user's context inside the parent application.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserClientFactory {
    pub eoa: Address,
    pub account_address: Address,
    pub chain_id: u64,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_factory_keeps_unknown_asset_fields() {
        let factory: UserClientFactory = serde_json::from_value(json!({
            "eoa": "0xD870765964C1F2d5f45D9542881afA2AfDfbD01A",
            "accountAddress": "0x40A2aCCbd92BCA938b02010E17A5b8929b49130D",
            "chainId": 8453,
            "assets": [{
                "name": "USD Coin",
                "symbol": "USDC",
                "address": "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
                "chainId": 8453,
                "logo": "usdc.png",
                "decimals": 6,
                "value": "1000000",
                "prices": { "default": 1.0 },
                "verified": true
            }]
        }))
        .unwrap();

        let asset = &factory.assets[0];
        assert_eq!(asset.decimals, 6);
        assert_eq!(asset.prices["default"], 1.0);
        assert_eq!(asset.extra["verified"], json!(true));
    }

    #[test]
    fn test_add_to_builder_wire_form() {
        let params = BuilderParams {
            transactions: vec![BuilderTransaction {
                to_address: Address::repeat_byte(1),
                call_data: "0x".to_string(),
                value: "0".to_string(),
            }],
        };
        let value = serde_json::to_value(AddToTxnBuilderParams {
            params: &params,
            automation_name: "dca",
        })
        .unwrap();
        assert_eq!(value["automationName"], json!("dca"));
        assert_eq!(value["params"]["transactions"][0]["callData"], json!("0x"));
    }
}
