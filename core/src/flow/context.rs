// core/src/flow/context.rs

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared, lockable context for one flow run.
///
/// IMPORTANT: the guards returned by [`read`](FlowContext::read) and
/// [`write`](FlowContext::write) are blocking and MUST NOT be held across
/// `.await` suspension points.
#[derive(Debug)]
pub struct FlowContext<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> FlowContext<T> {
  pub fn new(data: T) -> Self {
    FlowContext(Arc::new(RwLock::new(data)))
  }

  /// Acquires a read lock. Drop the guard before any `.await` point.
  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  /// Acquires a write lock. Drop the guard before any `.await` point.
  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  /// Consumes the context and returns the inner value, if this is the last
  /// handle to it.
  pub fn try_unwrap(self) -> Result<T, Self> {
    match Arc::try_unwrap(self.0) {
      Ok(lock) => Ok(lock.into_inner()),
      Err(arc) => Err(FlowContext(arc)),
    }
  }
}

impl<T: Send + Sync + 'static> Clone for FlowContext<T> {
  fn clone(&self) -> Self {
    FlowContext(Arc::clone(&self.0))
  }
}

impl<T: Send + Sync + 'static + Default> Default for FlowContext<T> {
  fn default() -> Self {
    Self::new(Default::default())
  }
}
