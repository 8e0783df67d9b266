use std::{
    sync::atomic::{AtomicI64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Hands out millisecond-timestamp ids that never repeat within a process.
///
/// Two requests landing in the same millisecond get `t` and `t + 1`.
#[derive(Debug, Default)]
pub struct ClipIds {
    last: AtomicI64,
}

impl ClipIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> i64 {
        self.next_at(now_ms())
    }

    fn next_at(&self, now: i64) -> i64 {
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

pub fn raw_file_name(id: i64) -> String {
    format!("{id}.mp4")
}

pub fn clip_file_name(id: i64) -> String {
    format!("clipped_{id}.mp4")
}
