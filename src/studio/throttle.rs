//! Rate limiter for remote calls driven by continuous input.
//!
//! [`Throttle`] does not own a clock or timers. Callers pass the current
//! [`Instant`] in and arm a real timer for every [`Schedule::Arm`] they get
//! back, reporting its expiry through [`Throttle::on_timer`]. The work itself
//! reads the freshest input when the timer fires, so requests made inside an
//! open window collapse into that single trailing call.

use std::time::Duration;

use web_time::Instant;

/// Throttle tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
	/// Minimum spacing between two fired calls.
	pub interval: Duration,
	/// Fire immediately when no call happened within the last interval.
	pub leading: bool,
}

impl Default for ThrottleConfig {
	fn default() -> Self {
		Self {
			interval: Duration::from_millis(1000),
			leading: false,
		}
	}
}

/// What the caller must do after [`Throttle::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
	/// Run the work now (leading edge).
	Immediate,
	/// Arm a timer for `delay` and report it back with `token`.
	Arm { token: u64, delay: Duration },
	/// A trailing call is already armed and will pick up the latest input.
	Coalesced,
}

/// Leading/trailing throttle state machine.
#[derive(Debug, Clone)]
pub struct Throttle {
	config: ThrottleConfig,
	last_fire: Option<Instant>,
	/// Token of the armed trailing call.
	armed: Option<u64>,
	next_token: u64,
}

impl Throttle {
	/// Idle throttle.
	pub fn new(config: ThrottleConfig) -> Self {
		Self {
			config,
			last_fire: None,
			armed: None,
			next_token: 0,
		}
	}

	/// Requests a call.
	pub fn schedule(&mut self, now: Instant) -> Schedule {
		if self.armed.is_some() {
			return Schedule::Coalesced;
		}

		let window_open = self
			.last_fire
			.is_some_and(|at| now.saturating_duration_since(at) < self.config.interval);
		let deadline = if self.config.leading {
			if !window_open {
				self.last_fire = Some(now);
				return Schedule::Immediate;
			}
			self.last_fire.map_or(now, |at| at + self.config.interval)
		} else {
			now + self.config.interval
		};

		let token = self.next_token;
		self.next_token += 1;
		self.armed = Some(token);
		Schedule::Arm {
			token,
			delay: deadline.saturating_duration_since(now),
		}
	}

	/// Reports the expiry of the timer armed with `token`.
	///
	/// Returns `true` exactly once per armed window. Tokens of cancelled or
	/// already fired windows return `false`.
	pub fn on_timer(&mut self, token: u64, now: Instant) -> bool {
		match self.armed {
			Some(armed) if armed == token => {
				self.armed = None;
				self.last_fire = Some(now);
				true
			}
			_ => false,
		}
	}

	/// Drops the pending trailing call, if any.
	pub fn cancel(&mut self) {
		self.armed = None;
	}

	/// Records a call made outside the throttle so the next window is measured from it.
	pub fn note_fired(&mut self, now: Instant) {
		self.armed = None;
		self.last_fire = Some(now);
	}

	/// A trailing call is armed.
	pub fn is_pending(&self) -> bool {
		self.armed.is_some()
	}
}

impl Default for Throttle {
	fn default() -> Self {
		Self::new(ThrottleConfig::default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SECOND: Duration = Duration::from_millis(1000);

	fn trailing() -> Throttle {
		Throttle::new(ThrottleConfig {
			interval: SECOND,
			leading: false,
		})
	}

	fn armed_token(schedule: Schedule) -> u64 {
		match schedule {
			Schedule::Arm { token, .. } => token,
			other => panic!("expected an armed timer, got {other:?}"),
		}
	}

	#[test]
	fn burst_inside_window_fires_once() {
		let t0 = Instant::now();
		let mut throttle = trailing();

		let token = armed_token(throttle.schedule(t0));
		for ms in [10, 200, 900] {
			assert_eq!(throttle.schedule(t0 + Duration::from_millis(ms)), Schedule::Coalesced);
		}

		assert!(throttle.on_timer(token, t0 + SECOND));
		assert!(!throttle.on_timer(token, t0 + SECOND));
		assert!(!throttle.is_pending());
	}

	#[test]
	fn continuous_input_fires_every_interval() {
		let t0 = Instant::now();
		let mut throttle = trailing();
		let mut fired = 0;
		let mut armed: Option<(u64, Instant)> = None;

		for step in 0..50u64 {
			let now = t0 + Duration::from_millis(step * 100);
			if let Some((token, due)) = armed
				&& now >= due
			{
				assert!(throttle.on_timer(token, now));
				fired += 1;
				armed = None;
			}
			if let Schedule::Arm { token, delay } = throttle.schedule(now) {
				armed = Some((token, now + delay));
			}
		}

		assert!(fired >= 4, "fired {fired} times over five seconds");
	}

	#[test]
	fn cancelled_window_ignores_its_timer() {
		let t0 = Instant::now();
		let mut throttle = trailing();
		let stale = armed_token(throttle.schedule(t0));
		throttle.cancel();
		let fresh = armed_token(throttle.schedule(t0 + Duration::from_millis(50)));

		assert_ne!(stale, fresh);
		assert!(!throttle.on_timer(stale, t0 + SECOND));
		assert!(throttle.on_timer(fresh, t0 + Duration::from_millis(1050)));
	}

	#[test]
	fn leading_edge_then_trailing() {
		let t0 = Instant::now();
		let mut throttle = Throttle::new(ThrottleConfig {
			interval: SECOND,
			leading: true,
		});

		assert_eq!(throttle.schedule(t0), Schedule::Immediate);
		match throttle.schedule(t0 + Duration::from_millis(300)) {
			Schedule::Arm { delay, .. } => assert_eq!(delay, Duration::from_millis(700)),
			other => panic!("expected trailing timer, got {other:?}"),
		}
		assert_eq!(throttle.schedule(t0 + Duration::from_millis(400)), Schedule::Coalesced);
	}
}
