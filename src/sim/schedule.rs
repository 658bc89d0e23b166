//! Deferred events and interval timers
//!
//! The simulation never calls back into the host. Anything that should
//! happen "later" is queued here with a due time and fired by the next
//! frame whose timestamp reaches it.

/// An effect queued for a later frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Put a bounced fruit back on its normal fall speed
    RestoreFall { fruit: u32 },
}

impl Deferred {
    /// Fruit this event belongs to
    pub fn fruit(&self) -> u32 {
        match *self {
            Deferred::RestoreFall { fruit } => fruit,
        }
    }
}

#[derive(Debug, Clone)]
struct Scheduled {
    due_ms: f64,
    /// Insertion order, breaks ties between equal due times
    seq: u64,
    event: Deferred,
}

/// Deferred events keyed by fruit id
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    entries: Vec<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event to fire at `due_ms`
    pub fn schedule(&mut self, due_ms: f64, event: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Scheduled { due_ms, seq, event });
    }

    /// Drop every pending event for a fruit. Returns how many were dropped.
    pub fn cancel_fruit(&mut self, fruit: u32) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.event.fruit() != fruit);
        before - self.entries.len()
    }

    /// Drop everything (reset / game over)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove and return all events due at `now_ms`, earliest first
    pub fn take_due(&mut self, now_ms: f64) -> Vec<Deferred> {
        let mut due: Vec<Scheduled> = Vec::new();
        self.entries.retain(|e| {
            if e.due_ms <= now_ms {
                due.push(e.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|e| e.event).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a fruit has anything pending
    pub fn has_pending(&self, fruit: u32) -> bool {
        self.entries.iter().any(|e| e.event.fruit() == fruit)
    }
}

/// Fixed-period timer driven by an external clock (the spawn tick when
/// there is no browser `setInterval`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalTimer {
    period_ms: f64,
    next_due: Option<f64>,
}

impl IntervalTimer {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            next_due: None,
        }
    }

    /// (Re)arm the timer; first fire is one period after `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.next_due = Some(now_ms + self.period_ms);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Fires at most once per call. A timer that fell several periods
    /// behind does not replay the missed ticks.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now_ms < due {
            return false;
        }
        let mut next = due + self.period_ms;
        if next <= now_ms {
            next = now_ms + self.period_ms;
        }
        self.next_due = Some(next);
        true
    }
}
