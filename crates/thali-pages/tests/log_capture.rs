//! Diagnostics emitted while discarding stale results and rendering failures

mod common;

use std::io;
use std::sync::{Arc, Mutex};

use common::settle;
use rstest::rstest;
use serial_test::serial;
use thali_pages::boundary::FallbackBoundary;
use thali_pages::component::View;
use thali_pages::error::RenderError;
use thali_pages::resource::{Resource, ResourceState};
use thali_pages::testing::PendingFetches;
use tracing::Level;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
	fn text(&self) -> String {
		String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
	}
}

impl io::Write for Captured {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().unwrap().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

fn capture(level: Level) -> (Captured, tracing::subscriber::DefaultGuard) {
	let captured = Captured::default();
	let writer = captured.clone();
	let subscriber = tracing_subscriber::fmt()
		.with_max_level(level)
		.with_ansi(false)
		.without_time()
		.with_writer(move || writer.clone())
		.finish();
	let guard = tracing::subscriber::set_default(subscriber);
	(captured, guard)
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_superseded_result_is_logged_and_dropped() {
	let (captured, _guard) = capture(Level::DEBUG);
	let local = tokio::task::LocalSet::new();
	local
		.run_until(async {
			// Arrange
			let fetches = PendingFetches::<u32, &'static str>::new();
			let resource = Resource::advisory(fetches.fetcher());
			resource.subscribe(1);
			settle().await;
			resource.subscribe(2);
			settle().await;

			// Act
			fetches.resolve(&1, Ok("first"));
			settle().await;

			// Assert
			assert!(resource.state_untracked().is_loading());
			assert!(captured.text().contains("discarding stale resource result"));
		})
		.await;
}

#[rstest]
#[serial]
fn test_render_failure_is_reported_as_warning() {
	let (captured, _guard) = capture(Level::WARN);
	let boundary = FallbackBoundary::new("menu");

	let view = boundary.render(&ResourceState::Ready(()), |_| {
		Err::<View, _>(RenderError::new("menu", "missing section"))
	});

	assert!(view.find_by_class("boundary-failure").is_some());
	let logs = captured.text();
	assert!(logs.contains("WARN"));
	assert!(logs.contains("content failed to render"));
	assert!(logs.contains("boundary=menu"));
}
