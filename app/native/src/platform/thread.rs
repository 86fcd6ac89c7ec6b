use std::thread::{self, JoinHandle};

/// Spawns a thread named `duoview-<name>`.
///
/// Spawn failures are logged and reported as `None`.
pub fn spawn_named_thread<F, T>(name: &str, task: F) -> Option<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let thread_name = format!("duoview-{name}");

    match thread::Builder::new().name(thread_name.clone()).spawn(task) {
        Ok(handle) => Some(handle),
        Err(err) => {
            tracing::error!(thread = %thread_name, error = %err, "failed to spawn thread");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_spawn_named_thread_returns_result() {
        let handle = spawn_named_thread("answer", || 42).unwrap();
        assert_eq!(handle.join().unwrap(), 42);
    }

    #[test]
    fn test_spawn_named_thread_uses_prefix() {
        let (tx, rx) = channel();

        let handle = spawn_named_thread("name-test", move || {
            let name = thread::current().name().unwrap_or("").to_string();
            tx.send(name).unwrap();
        })
        .unwrap();

        let thread_name = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(thread_name, "duoview-name-test");
        handle.join().unwrap();
    }

    #[test]
    fn test_spawn_named_thread_handles_empty_name() {
        let handle = spawn_named_thread("", || thread::current().name().map(str::to_string)).unwrap();
        assert_eq!(handle.join().unwrap().as_deref(), Some("duoview-"));
    }
}
