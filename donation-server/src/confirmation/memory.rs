use async_trait::async_trait;
use dashmap::DashMap;
use shared::ConfirmationEntry;
use std::sync::Arc;

use super::{ChannelError, ConfirmationChannel, Lookup};

#[derive(Clone, Default)]
pub struct MemoryConfirmationChannel {
    entries: Arc<DashMap<String, ConfirmationEntry>>,
}

impl MemoryConfirmationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// First write wins; returns false if the id was already confirmed
    pub fn record(&self, entry: ConfirmationEntry) -> bool {
        match self.entries.entry(entry.correlation_id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }
}

#[async_trait]
impl ConfirmationChannel for MemoryConfirmationChannel {
    async fn lookup(&self, correlation_id: &str) -> Result<Lookup, ChannelError> {
        Ok(match self.entries.get(correlation_id) {
            Some(entry) => Lookup::Found(entry.clone()),
            None => Lookup::NotYetAvailable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_write_wins() {
        let channel = MemoryConfirmationChannel::new();
        assert_eq!(channel.lookup("c1").await.unwrap(), Lookup::NotYetAvailable);

        assert!(channel.record(ConfirmationEntry::new("c1", b"first".to_vec(), 1)));
        assert!(!channel.record(ConfirmationEntry::new("c1", b"second".to_vec(), 2)));

        match channel.lookup("c1").await.unwrap() {
            Lookup::Found(entry) => assert_eq!(entry.entry, b"first"),
            Lookup::NotYetAvailable => panic!("expected entry"),
        }
    }
}
