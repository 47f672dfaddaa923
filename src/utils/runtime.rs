use once_cell::sync::Lazy;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

/// Process-wide runtime that drives collector fan-out.
/// Built on first render so `config` and `modules` never start threads.
pub static GLOBAL_RUNTIME: Lazy<Arc<Runtime>> = Lazy::new(|| {
    Arc::new(
        Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("statusline-worker")
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime"),
    )
});

/// Drive a future to completion on the global runtime
pub fn block_on<F, T>(future: F) -> T
where
    F: Future<Output = T>,
{
    GLOBAL_RUNTIME.block_on(future)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_blocking_work_runs_off_thread() {
        let result = block_on(async {
            tokio::task::spawn_blocking(|| {
                std::thread::sleep(Duration::from_millis(1));
                42
            })
            .await
        });
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_runtime_singleton() {
        let runtime1 = GLOBAL_RUNTIME.clone();
        let runtime2 = GLOBAL_RUNTIME.clone();
        assert!(Arc::ptr_eq(&runtime1, &runtime2));
    }
}
