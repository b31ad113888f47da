//! Task spawning under an optional injected tracing dispatcher.

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::Dispatch;
use tracing::instrument::WithSubscriber;

/// Spawns `fut` on the current runtime. When a dispatcher is given, every
/// event the task emits goes to it instead of the global subscriber.
pub fn spawn_logged<F>(dispatch: Option<&Dispatch>, fut: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    match dispatch {
        Some(d) => tokio::spawn(fut.with_subscriber(d.clone())),
        None => tokio::spawn(fut),
    }
}

/// Runs `f` with the given dispatcher as the default, if any.
pub fn in_scope<R>(dispatch: Option<&Dispatch>, f: impl FnOnce() -> R) -> R {
    match dispatch {
        Some(d) => tracing::dispatcher::with_default(d, f),
        None => f(),
    }
}
