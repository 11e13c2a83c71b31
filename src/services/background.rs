use std::{
	any::Any,
	mem,
	panic::AssertUnwindSafe,
	sync::{Mutex, PoisonError},
};

use futures::{future::BoxFuture, FutureExt};
use tokio::task::JoinHandle;

use super::response::ServiceError;

pub type BackgroundTask = BoxFuture<'static, Result<(), ServiceError>>;

/// Runs work detached from the request that scheduled it.
///
/// Errors and panics raised by a task are logged at the task boundary and
/// never reach the caller.
pub trait TaskRunner: Send + Sync {
	fn run(
		&self,
		name: &'static str,
		task: BackgroundTask,
	);
}

#[derive(Default)]
pub struct TokioTaskRunner {
	handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TokioTaskRunner {
	pub fn new() -> Self {
		Self::default()
	}

	/// Waits until every task spawned so far, and any task those spawn, has finished.
	///
	/// Only tests call this, to observe the effects of background work. The
	/// server does not drain tasks on shutdown.
	pub async fn wait_idle(&self) {
		loop {
			let pending = mem::take(&mut *self.handles.lock().unwrap_or_else(PoisonError::into_inner));
			if pending.is_empty() {
				return;
			}
			for handle in pending {
				let _ = handle.await;
			}
		}
	}
}

impl TaskRunner for TokioTaskRunner {
	fn run(
		&self,
		name: &'static str,
		task: BackgroundTask,
	) {
		let handle = tokio::spawn(async move {
			match AssertUnwindSafe(task).catch_unwind().await {
				Ok(Ok(())) => tracing::debug!(task = name, "background task finished"),
				Ok(Err(err)) => tracing::error!(task = name, error = %err, "background task failed"),
				Err(panic) => tracing::error!(task = name, panic = panic_message(&panic), "background task panicked"),
			}
		});

		let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
		handles.retain(|handle| !handle.is_finished());
		handles.push(handle);
	}
}

fn panic_message(panic: &Box<dyn Any + Send>) -> &str {
	if let Some(message) = panic.downcast_ref::<&'static str>() {
		message
	} else if let Some(message) = panic.downcast_ref::<String>() {
		message
	} else {
		"unknown panic payload"
	}
}
