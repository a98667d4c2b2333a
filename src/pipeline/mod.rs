//! Pipeline stages for OFD-to-JPEG conversion.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the rendering backend can be swapped without touching the rest.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ output_dir ──▶ workspace ──▶ render ──▶ collect ──▶ stage
//! (check)   (resolve)      (tmp dir)     (engine)   (sort)     (move)
//! ```
//!
//! 1. [`input`]      — confirm the source exists, is readable and looks like an OFD package
//! 2. [`output_dir`] — pick the destination directory (pure, no side effects)
//! 3. [`workspace`]  — create the private temp directory; removed on every exit path
//! 4. [`render`]     — the renderer seam; [`engine`] is the external-process backend
//! 5. [`collect`]    — find `N.jpg` files, verify they are JPEGs, order by `N`
//! 6. [`stage`]      — move pages to their final names, overwriting old output

pub mod collect;
pub mod engine;
pub mod input;
pub mod output_dir;
pub mod render;
pub mod stage;
pub mod workspace;

/// Run `f` under a subscriber that counts `WARN` events.
#[cfg(test)]
pub(crate) fn count_warnings<R>(f: impl FnOnce() -> R) -> (R, usize) {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&count)));
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, count.load(Ordering::SeqCst))
}
