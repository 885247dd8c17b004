use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one triggered request. Tokens are strictly increasing in issue order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Last-issued-wins ordering for overlapping asynchronous requests.
///
/// A completion may only be applied if its token is still the most recently
/// issued one; anything older has been superseded.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// The most recently issued token, if any.
    pub fn latest(&self) -> Option<RequestToken> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            n => Some(RequestToken(n)),
        }
    }

    pub fn is_latest(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}
