use std::collections::BTreeSet;

/// Unique ids of tracks with a server-confirmed crop that can be downloaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CropLedger {
    entries: BTreeSet<String>,
}

impl CropLedger {
    pub fn record(&mut self, unique_id: &str) {
        self.entries.insert(unique_id.to_owned());
    }

    pub fn discard(&mut self, unique_id: &str) -> bool {
        self.entries.remove(unique_id)
    }

    pub fn contains(&self, unique_id: &str) -> bool {
        self.entries.contains(unique_id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::CropLedger;

    #[test]
    fn recording_twice_keeps_one_entry() {
        let mut ledger = CropLedger::default();
        ledger.record("a");
        ledger.record("a");

        assert_eq!(ledger.len(), 1);
        assert!(ledger.discard("a"));
        assert!(!ledger.contains("a"));
        assert!(!ledger.discard("a"));
    }
}
