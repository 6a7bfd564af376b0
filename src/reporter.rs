// Copyright 2024 the es-shims transform authors. MIT license.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use once_cell::sync::Lazy;
use tokio::task::JoinHandle;

/// Where missing dependency warnings are written. The default sink
/// writes to stderr; tests inject a capturing sink.
pub trait WarningSink: Send + Sync {
  fn warn(&self, message: &str);
}

pub struct ConsoleSink;

impl WarningSink for ConsoleSink {
  fn warn(&self, message: &str) {
    eprintln!("{}", message);
  }
}

/// Formats the consolidated missing dependency warning, or `None` when
/// there is nothing to report.
pub fn format_missing_dependencies(
  missing: &BTreeSet<String>,
) -> Option<String> {
  if missing.is_empty() {
    return None;
  }

  let deps = missing.iter().cloned().collect::<Vec<_>>().join(" ");
  Some(format!(
    concat!(
      "\nSome polyfills have been added but are not present in your dependencies.\n",
      "Please run one of the following commands:\n",
      "\tnpm install --save {0}\n",
      "\tyarn add {0}\n",
    ),
    deps,
  ))
}

/// Accumulates missing dependency keys across a burst of per file
/// completions and emits exactly one consolidated warning once no new
/// keys have arrived for the quiescence delay (trailing edge debounce).
///
/// One window is shared process wide by default so that many providers
/// constructed in the same process still produce a single report.
pub struct DeferredReporter {
  quiescence_delay: Duration,
  state: Mutex<DeferredState>,
}

#[derive(Default)]
struct DeferredState {
  pending: BTreeSet<String>,
  scheduled_flush: Option<JoinHandle<()>>,
}

pub static DEFAULT_DEFERRED_REPORTER: Lazy<Arc<DeferredReporter>> =
  Lazy::new(|| Arc::new(DeferredReporter::new(Duration::from_secs(1))));

impl DeferredReporter {
  pub fn new(quiescence_delay: Duration) -> Self {
    Self {
      quiescence_delay,
      state: Mutex::new(DeferredState::default()),
    }
  }

  /// Merges keys into the pending set and pushes the scheduled flush
  /// back to a full quiescence delay from now. Must be called from
  /// within a tokio runtime.
  pub fn merge(
    self: &Arc<Self>,
    keys: impl IntoIterator<Item = String>,
    sink: Arc<dyn WarningSink>,
  ) {
    let mut state = self.state.lock().unwrap();
    state.pending.extend(keys);

    if let Some(scheduled_flush) = state.scheduled_flush.take() {
      scheduled_flush.abort();
    }
    // measure quiescence from the merge itself, not from when the
    // spawned task first runs
    let deadline = tokio::time::Instant::now() + self.quiescence_delay;
    let reporter = self.clone();
    state.scheduled_flush = Some(tokio::spawn(async move {
      tokio::time::sleep_until(deadline).await;
      reporter.flush(&sink);
    }));
  }

  fn flush(&self, sink: &Arc<dyn WarningSink>) {
    let pending = {
      let mut state = self.state.lock().unwrap();
      state.scheduled_flush = None;
      std::mem::take(&mut state.pending)
    };
    if let Some(message) = format_missing_dependencies(&pending) {
      sink.warn(&message);
    }
  }
}
