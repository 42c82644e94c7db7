use chrono::Utc;

pub(crate) trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
pub(crate) struct FixedClock(pub(crate) i64);

#[cfg(test)]
impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}
