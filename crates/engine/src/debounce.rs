use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Leading-edge debouncer.
///
/// The first call in a burst arms a timer and pins its payload; calls
/// arriving while the timer is armed are dropped. When the timer fires,
/// the pinned payload is handed to the callback, and the next call starts
/// a fresh burst. The timer handle is owned here and aborted on
/// [`Debouncer::cancel`].
pub(crate) struct Debouncer<T> {
	interval: Duration,
	state: Arc<Mutex<DebounceState<T>>>,
}

struct DebounceState<T> {
	timer: Option<JoinHandle<()>>,
	pending: Option<T>,
}

impl<T: Send + 'static> Debouncer<T> {
	pub(crate) fn new(interval: Duration) -> Self {
		Self {
			interval,
			state: Arc::new(Mutex::new(DebounceState {
				timer: None,
				pending: None,
			})),
		}
	}

	/// Schedules `fire` to run with `payload` one interval after the first
	/// call of a burst.
	pub(crate) fn schedule<F, Fut>(&self, payload: T, fire: F)
	where
		F: FnOnce(T) -> Fut + Send + 'static,
		Fut: Future<Output = ()> + Send,
	{
		let mut state = self.state.lock();
		if state.timer.is_some() {
			// Armed: this burst already has a payload.
			return;
		}
		state.pending = Some(payload);

		let shared = Arc::clone(&self.state);
		let interval = self.interval;
		state.timer = Some(tokio::spawn(async move {
			tokio::time::sleep(interval).await;
			let payload = {
				let mut state = shared.lock();
				state.timer = None;
				state.pending.take()
			};
			if let Some(payload) = payload {
				fire(payload).await;
			}
		}));
	}

	/// Aborts any armed timer and drops the pending payload.
	pub(crate) fn cancel(&self) {
		let mut state = self.state.lock();
		if let Some(timer) = state.timer.take() {
			timer.abort();
		}
		state.pending = None;
	}
}

impl<T> Drop for Debouncer<T> {
	fn drop(&mut self) {
		let mut state = self.state.lock();
		if let Some(timer) = state.timer.take() {
			timer.abort();
		}
	}
}
