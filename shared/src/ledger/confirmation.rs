use serde::{Deserialize, Serialize};

/// Ledger callback document
///
/// ```json
/// {
///   "blockchain": "cornerstone-chain",
///   "id": "did:axn:da-fc3f4d21-609e-4855-802a-f880e9a600ed",
///   "block_num": 3322,
///   "tx_id": "kandkalakna9ejdlalajahbabzgzfaftqub",
///   "time": 1584932344
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    #[serde(default)]
    pub blockchain: String,
    /// Correlation id of the submitted entry
    pub id: String,
    #[serde(default)]
    pub block_num: u64,
    #[serde(default)]
    pub tx_id: String,
    #[serde(default)]
    pub time: i64,
}

/// Finalized confirmation keyed by correlation id. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationEntry {
    pub correlation_id: String,
    /// Raw callback document as written by the out-of-band process
    pub entry: Vec<u8>,
    pub received_at: i64,
}

impl ConfirmationEntry {
    pub fn new(correlation_id: impl Into<String>, entry: Vec<u8>, received_at: i64) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            entry,
            received_at,
        }
    }

    pub fn from_block_info(info: &BlockInfo, received_at: i64) -> Result<Self, serde_json::Error> {
        Ok(Self::new(info.id.clone(), serde_json::to_vec(info)?, received_at))
    }

    /// Decode the callback document
    pub fn block_info(&self) -> Result<BlockInfo, serde_json::Error> {
        serde_json::from_slice(&self.entry)
    }
}
