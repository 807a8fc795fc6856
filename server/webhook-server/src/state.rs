//! Shared application state.

use tokio::sync::Mutex;

use crate::pipeline::Pipeline;

pub struct AppState {
  pub pipeline: Pipeline,
  /// Held for a whole push so only one delivery touches the staging roots.
  pub gate: Mutex<()>,
}

impl AppState {
  pub fn new(pipeline: Pipeline) -> Self {
    Self {
      pipeline,
      gate: Mutex::new(()),
    }
  }
}
