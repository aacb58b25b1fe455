//! Circular dependency detection infrastructure.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::DiError;

/// Ids currently under construction, outermost first.
///
/// An id is pushed when its construction starts and popped when its
/// [`StackGuard`] drops, whether construction succeeded, failed or
/// unwound. Asking to enter an id that is already on the stack is a cycle.
#[derive(Debug, Default)]
pub(crate) struct ResolutionStack {
    stack: Arc<Mutex<Vec<String>>>,
}

impl ResolutionStack {
    pub(crate) fn contains(&self, id: &str) -> bool {
        self.stack.lock().iter().any(|n| n == id)
    }

    /// Cycle error for re-entering `id`, carrying the full path.
    pub(crate) fn circular(&self, id: &str) -> DiError {
        let mut path = self.stack.lock().clone();
        path.push(id.to_string());
        DiError::Circular { id: id.to_string(), path }
    }

    /// Marks `id` in flight until the returned guard drops, failing if it
    /// already is.
    pub(crate) fn enter(&self, id: &str) -> Result<StackGuard, DiError> {
        let mut stack = self.stack.lock();
        // Circular detection BEFORE pushing the new name
        if stack.iter().any(|n| n == id) {
            let mut path = stack.clone();
            path.push(id.to_string());
            return Err(DiError::Circular { id: id.to_string(), path });
        }
        stack.push(id.to_string());
        Ok(StackGuard {
            stack: Arc::clone(&self.stack),
            name: id.to_string(),
        })
    }

    pub(crate) fn clear(&self) {
        self.stack.lock().clear();
    }
}

/// Keeps one id in flight; popped on drop, including during unwinding.
#[must_use = "the id leaves the stack as soon as the guard drops"]
#[derive(Debug)]
pub(crate) struct StackGuard {
    stack: Arc<Mutex<Vec<String>>>,
    name: String,
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        let mut stack = self.stack.lock();
        if let Some(pos) = stack.iter().rposition(|n| *n == self.name) {
            stack.remove(pos);
        }
    }
}
