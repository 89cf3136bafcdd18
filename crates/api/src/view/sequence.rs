use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request tags.
///
/// Every request takes a fresh tag from [`next`](Self::next); a completion
/// is current only while its tag is still the latest one issued.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next tag. Tags start at 1 and strictly increase.
    pub fn next(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether no newer tag has been issued since `tag`.
    pub fn is_latest(&self, tag: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_strictly_increase() {
        let seq = RequestSequence::new();
        let a = seq.next();
        let b = seq.next();
        assert_eq!(a, 1);
        assert!(b > a);
    }

    #[test]
    fn only_newest_tag_is_latest() {
        let seq = RequestSequence::new();
        let first = seq.next();
        assert!(seq.is_latest(first));
        let second = seq.next();
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
    }
}
