use once_cell::sync::Lazy;

pub const NET_THREAD_NAME: &str = "parley-net";

/// Network work runs here so the GLib main loop never blocks on a request.
pub static RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name(NET_THREAD_NAME)
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime")
});

pub fn spawn_async<F>(fut: F)
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    RUNTIME.spawn(fut);
}

/// Run `fut` on the network runtime and hand its result back on the GLib main loop.
/// If the receiving window is gone by then, the result is dropped.
#[cfg(feature = "gui")]
pub fn run_async_to_main<T, E, Fut>(fut: Fut) -> glib::Receiver<Result<T, E>>
where
    T: Send + 'static,
    E: Send + 'static,
    Fut: std::future::Future<Output = Result<T, E>> + Send + 'static,
{
    let (tx, rx) = glib::MainContext::channel(glib::Priority::default());
    spawn_async(async move {
        if tx.send(fut.await).is_err() {
            log::debug!("Main loop receiver dropped before the request finished");
        }
    });
    rx
}

/// Trim and default to plain http; the bundled backend serves without TLS.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_url_adds_scheme() {
        assert_eq!(normalize_url(" localhost:8000 "), "http://localhost:8000");
        assert_eq!(normalize_url("https://chat.example.com"), "https://chat.example.com");
        assert_eq!(normalize_url("http://10.0.0.2:8000/"), "http://10.0.0.2:8000/");
    }

    #[test]
    fn normalize_url_keeps_blank_blank() {
        assert_eq!(normalize_url("   "), "");
    }

    #[test]
    fn spawned_work_runs_on_named_network_threads() {
        let (tx, rx) = std::sync::mpsc::channel();
        spawn_async(async move {
            let _ = tx.send(std::thread::current().name().map(str::to_owned));
        });
        let name = rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some(NET_THREAD_NAME));
    }
}
