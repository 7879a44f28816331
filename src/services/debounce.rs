//! Keystroke debouncing.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// Collapses bursts of input into single emissions.
///
/// A value is emitted once no newer value has arrived for `window`. Values
/// that are overtaken are dropped, never queued. A settled value equal to the
/// previous emission is not emitted again. `initial` is treated as if it had
/// just been typed.
pub async fn debounce<F>(
    mut input: mpsc::UnboundedReceiver<String>,
    window: Duration,
    initial: Option<String>,
    mut emit: F,
) where
    F: FnMut(String) + Send,
{
    let mut pending = initial;
    let mut last_emitted: Option<String> = None;

    loop {
        let Some(value) = pending.take() else {
            match input.recv().await {
                Some(next) => {
                    pending = Some(next);
                    continue;
                }
                None => break,
            }
        };

        tokio::select! {
            next = input.recv() => match next {
                Some(next) => pending = Some(next),
                None => break,
            },
            () = tokio::time::sleep(window) => {
                if last_emitted.as_deref() == Some(value.as_str()) {
                    trace!("Debounced value unchanged, not emitting");
                } else {
                    emit(value.clone());
                    last_emitted = Some(value);
                }
            }
        }
    }
}

/// Spawns [`debounce`] and returns the sender keystrokes go into.
pub fn spawn_debouncer<F>(
    window: Duration,
    initial: Option<String>,
    emit: F,
) -> (mpsc::UnboundedSender<String>, JoinHandle<()>)
where
    F: FnMut(String) + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(debounce(rx, window, initial, emit));
    (tx, handle)
}
