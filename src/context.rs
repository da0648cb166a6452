//! Execution contexts.
//!
//! A [`Context`] is passed along a call chain and may bind the exporter that
//! events built within it are delivered to. Contexts without a binding fall
//! back to the process-wide default exporter (see [`crate::exporter::set_default`]).

use crate::exporter::Exporter;
use std::{cell::RefCell, future::Future, marker::PhantomData, rc::Rc, sync::Arc};

thread_local! {
    static CURRENT: RefCell<Option<Context>> = const { RefCell::new(None) };
}

tokio::task_local! {
    static TASK_CONTEXT: Context;
}

#[derive(Clone, Debug, Default)]
pub struct Context {
    exporter: Option<Arc<dyn Exporter>>,
}

impl Context {
    /// A context without an exporter binding.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_exporter(exporter: Arc<dyn Exporter>) -> Self {
        Self {
            exporter: Some(exporter),
        }
    }

    pub fn exporter(&self) -> Option<&Arc<dyn Exporter>> {
        self.exporter.as_ref()
    }

    /// The innermost context made current by [`Context::scope`] or
    /// [`Context::enter`], or the background context.
    pub fn current() -> Self {
        TASK_CONTEXT
            .try_with(Context::clone)
            .ok()
            .or_else(|| CURRENT.with(|c| c.borrow().clone()))
            .unwrap_or_default()
    }

    /// Make this the current context of the calling thread until the guard drops.
    pub fn enter(&self) -> ContextGuard {
        let previous = CURRENT.with(|c| c.borrow_mut().replace(self.clone()));
        ContextGuard {
            previous,
            _not_send: PhantomData,
        }
    }

    /// Run `fut` with this as the current context of the task.
    pub fn scope<F: Future>(self, fut: F) -> impl Future<Output = F::Output> {
        TASK_CONTEXT.scope(self, fut)
    }
}

/// Restores the previously entered context on drop.
#[derive(Debug)]
#[must_use = "the context is only current while the guard is held"]
pub struct ContextGuard {
    previous: Option<Context>,
    _not_send: PhantomData<Rc<()>>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|c| *c.borrow_mut() = previous);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::exporter::Capture;

    fn bound(ctx: &Context, exporter: &Arc<Capture>) -> bool {
        let exporter: Arc<dyn Exporter> = exporter.clone();
        ctx.exporter()
            .map(|e| Arc::ptr_eq(e, &exporter))
            .unwrap_or(false)
    }

    #[test]
    fn background_has_no_binding() {
        assert!(Context::background().exporter().is_none());
        assert!(Context::current().exporter().is_none());
    }

    #[test]
    fn enter_nests_and_restores() {
        let outer_cap = Arc::new(Capture::default());
        let inner_cap = Arc::new(Capture::default());
        let outer = Context::with_exporter(outer_cap.clone());
        let inner = Context::with_exporter(inner_cap.clone());

        {
            let _g = outer.enter();
            assert!(bound(&Context::current(), &outer_cap));
            {
                let _g = inner.enter();
                assert!(bound(&Context::current(), &inner_cap));
            }
            assert!(bound(&Context::current(), &outer_cap));
        }
        assert!(Context::current().exporter().is_none());
    }

    #[tokio::test]
    async fn task_scope_wins_over_thread() {
        let thread_cap = Arc::new(Capture::default());
        let task_cap = Arc::new(Capture::default());
        let _g = Context::with_exporter(thread_cap.clone()).enter();

        let in_scope = Context::with_exporter(task_cap.clone())
            .scope(async { Context::current() })
            .await;
        assert!(bound(&in_scope, &task_cap));
        assert!(bound(&Context::current(), &thread_cap));
    }
}
