use crate::interrupt::CancelToken;
use cfrac_core::{CfracError, CfracResult, Context};
use std::{mem, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// The result of one request, tagged with the input that produced it.
#[derive(Debug)]
pub struct Outcome {
	generation: u64,
	pub input: String,
	pub result: Result<CfracResult, CfracError>,
}

struct Request {
	token: CancelToken,
	handle: JoinHandle<()>,
}

/// Runs at most one computation at a time on the blocking thread pool.
///
/// Submitting a new input cancels the running computation and waits up to
/// the grace period for it to stop. A computation that does not stop in time
/// is abandoned. Only the outcome of the most recent input is ever
/// returned from [`Session::next_result`].
pub struct Session {
	context: Arc<Context>,
	grace: Duration,
	generation: u64,
	current: Option<Request>,
	sender: mpsc::UnboundedSender<Outcome>,
	receiver: mpsc::UnboundedReceiver<Outcome>,
}

impl Session {
	pub fn new(context: Context, grace: Duration) -> Self {
		let (sender, receiver) = mpsc::unbounded_channel();
		Self {
			context: Arc::new(context),
			grace,
			generation: 0,
			current: None,
			sender,
			receiver,
		}
	}

	pub async fn submit(&mut self, input: String) {
		self.stop().await;
		self.generation += 1;
		let generation = self.generation;
		let token = CancelToken::default();
		let worker_token = token.clone();
		let context = Arc::clone(&self.context);
		let sender = self.sender.clone();
		tracing::debug!(generation, "starting computation");
		let handle = tokio::task::spawn_blocking(move || {
			let result = cfrac_core::evaluate_with_interrupt(&input, &context, &worker_token);
			if worker_token.is_cancelled() || result.as_ref().is_err_and(CfracError::is_interrupted) {
				tracing::debug!(generation, "computation was superseded");
				return;
			}
			// the receiver only goes away when the session is dropped
			mem::drop(sender.send(Outcome {
				generation,
				input,
				result,
			}));
		});
		self.current = Some(Request { token, handle });
	}

	/// Cancels the running computation, if any.
	pub async fn stop(&mut self) {
		let Some(Request { token, handle }) = self.current.take() else {
			return;
		};
		token.cancel();
		if tokio::time::timeout(self.grace, handle).await.is_err() {
			tracing::warn!(
				generation = self.generation,
				"computation did not stop within {:?}, abandoning it",
				self.grace
			);
		}
	}

	pub async fn next_result(&mut self) -> Option<Outcome> {
		loop {
			let outcome = self.receiver.recv().await?;
			if outcome.generation == self.generation {
				return Some(outcome);
			}
			tracing::debug!(generation = outcome.generation, "discarding stale result");
		}
	}

	/// Waits for the latest computation to finish and returns its outcome,
	/// unless it has already been returned by [`Session::next_result`].
	pub async fn finish(mut self) -> Option<Outcome> {
		if let Some(request) = self.current.take() {
			mem::drop(request.handle.await);
		}
		while let Ok(outcome) = self.receiver.try_recv() {
			if outcome.generation == self.generation {
				return Some(outcome);
			}
		}
		None
	}
}
