//! Request and response shapes for `/builder/generate`.

use alloy::primitives::{Address, Bytes};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Intent catalogue ids for BUILD requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ActionId {
    Send = 301,
    Swap = 309,
    Bridging = 326,
}

impl ActionId {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

impl Serialize for ActionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

pub const AUTOMATION_PAYLOAD_ID: &str = "AUTOMATION";
pub const INTENT_PAYLOAD_ID: &str = "INTENT";

/// Body of a generate-calldata request, tagged by `action` on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "UPPERCASE")]
pub enum GeneratePayload<P> {
    Subscribe { id: &'static str, params: P },
    Update { id: &'static str, params: P },
    Cancel { id: &'static str, params: P },
    Build { id: &'static str, params: BuildParams<P> },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildParams<P> {
    pub id: ActionId,
    pub chain_id: u64,
    pub console_address: Address,
    pub params: P,
}

impl<P> GeneratePayload<P> {
    pub fn subscribe(params: P) -> Self {
        Self::Subscribe {
            id: AUTOMATION_PAYLOAD_ID,
            params,
        }
    }

    pub fn update(params: P) -> Self {
        Self::Update {
            id: AUTOMATION_PAYLOAD_ID,
            params,
        }
    }

    pub fn cancel(params: P) -> Self {
        Self::Cancel {
            id: AUTOMATION_PAYLOAD_ID,
            params,
        }
    }

    pub fn build(action: ActionId, chain_id: u64, console_address: Address, params: P) -> Self {
        Self::Build {
            id: INTENT_PAYLOAD_ID,
            params: BuildParams {
                id: action,
                chain_id,
                console_address,
                params,
            },
        }
    }
}

/// One transaction produced by the builder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CalldataTransaction {
    pub to: Address,
    pub data: Bytes,
    /// Wei amount as a decimal string.
    pub value: String,
    /// 0 = call, 1 = delegate call.
    pub operation: u8,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CalldataData<M = Value> {
    pub transactions: Vec<CalldataTransaction>,
    pub metadata: Option<M>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateCalldataResponse<M = Value> {
    pub data: CalldataData<M>,
}
