use std::collections::VecDeque;

use crate::sequence::RequestToken;

/// Default number of events kept before the oldest are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Operator-visible record of something that happened while serving a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub request: Option<RequestToken>,
    pub kind: &'static str,
    pub message: String,
}

/// Bounded in-memory event log, oldest first.
#[derive(Debug)]
pub struct EventBus {
    events: VecDeque<Event>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(DEFAULT_EVENT_CAPACITY)),
            capacity: capacity.max(1),
        }
    }

    pub fn emit(
        &mut self,
        request: Option<RequestToken>,
        kind: &'static str,
        message: impl Into<String>,
    ) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(Event {
            request,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

}
