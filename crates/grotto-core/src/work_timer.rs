use std::convert::TryInto;
use std::time::{Duration, Instant};

/// Measures a batch of work items: the wall-clock time since the batch started and the summed time of each item.
pub struct WorkTimer {
    started: Instant,
    total_item_time: Duration,
    items_completed: u32,
}

impl WorkTimer {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            total_item_time: Duration::new(0, 0),
            items_completed: 0,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn total_item_time(&self) -> Duration {
        self.total_item_time
    }

    pub fn items_completed(&self) -> u32 {
        self.items_completed
    }

    pub fn complete_item(&mut self, d: Duration) {
        self.total_item_time += d;
        self.items_completed += 1;
    }

    /// Runs `f` as one work item.
    pub fn time_item<T>(&mut self, f: impl FnOnce() -> T) -> T {
        let item_start = Instant::now();
        let out = f();
        self.complete_item(item_start.elapsed());
        out
    }

    pub fn average_item_time_us(&self) -> u32 {
        let total_us: u32 = self
            .total_item_time
            .as_micros()
            .try_into()
            .unwrap_or(u32::MAX);

        total_us / self.items_completed.max(1)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn average_of_no_items_is_zero() {
        let timer = WorkTimer::start();
        assert_eq!(timer.items_completed(), 0);
        assert_eq!(timer.average_item_time_us(), 0);
    }

    #[test]
    fn items_accumulate() {
        let mut timer = WorkTimer::start();
        timer.complete_item(Duration::from_micros(100));
        timer.complete_item(Duration::from_micros(300));
        let answer = timer.time_item(|| 42);

        assert_eq!(answer, 42);
        assert_eq!(timer.items_completed(), 3);
        assert!(timer.total_item_time() >= Duration::from_micros(400));
        assert!(timer.average_item_time_us() >= 133);
        assert!(timer.elapsed() >= Duration::ZERO);
    }
}
