//! Game-time timers.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

/// Timers keyed on accumulated frame time rather than the wall clock.
///
/// Timers with equal deadlines fire in registration order.
#[derive(Debug)]
pub struct TimerQueue<T> {
	now: Duration,
	seq: u64,
	heap: BinaryHeap<Reverse<Entry<T>>>,
}

#[derive(Debug)]
struct Entry<T> {
	deadline: Duration,
	seq: u64,
	payload: T,
}

impl<T> PartialEq for Entry<T> {
	fn eq(&self, other: &Self) -> bool {
		self.deadline == other.deadline && self.seq == other.seq
	}
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl<T> Ord for Entry<T> {
	fn cmp(&self, other: &Self) -> Ordering {
		self.deadline.cmp(&other.deadline).then(self.seq.cmp(&other.seq))
	}
}

impl<T> TimerQueue<T> {
	pub fn new() -> Self {
		Self {
			now: Duration::ZERO,
			seq: 0,
			heap: BinaryHeap::new(),
		}
	}

	/// Game time accumulated so far.
	pub fn now(&self) -> Duration {
		self.now
	}

	/// Schedules `payload` to fire once `delay` more game time has passed.
	pub fn register(&mut self, delay: Duration, payload: T) {
		let entry = Entry {
			deadline: self.now.saturating_add(delay),
			seq: self.seq,
			payload,
		};
		self.seq += 1;
		self.heap.push(Reverse(entry));
	}

	/// Advances game time by `dt` and returns every payload now due.
	pub fn advance(&mut self, dt: Duration) -> Vec<T> {
		self.now = self.now.saturating_add(dt);
		let mut fired = Vec::new();
		while self.heap.peek().is_some_and(|Reverse(entry)| entry.deadline <= self.now) {
			if let Some(Reverse(entry)) = self.heap.pop() {
				fired.push(entry.payload);
			}
		}
		fired
	}

	/// Deadline of the earliest pending timer.
	pub fn next_deadline(&self) -> Option<Duration> {
		self.heap.peek().map(|Reverse(entry)| entry.deadline)
	}

	pub fn len(&self) -> usize {
		self.heap.len()
	}

	pub fn is_empty(&self) -> bool {
		self.heap.is_empty()
	}
}

impl<T> Default for TimerQueue<T> {
	fn default() -> Self {
		Self::new()
	}
}
