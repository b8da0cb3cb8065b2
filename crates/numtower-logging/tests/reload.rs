use std::sync::{Arc, Mutex};

use numtower_logging::{init_logging, set_runtime_log_hook, LoggingOptions, RuntimeLogRecord, LOG_ENV};

#[test]
fn default_level_can_be_raised_after_install() {
    std::env::remove_var("RUST_LOG");
    std::env::remove_var(LOG_ENV);

    let captured: Arc<Mutex<Vec<RuntimeLogRecord>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();
    set_runtime_log_hook(move |rec| sink.lock().unwrap().push(rec.clone()));

    let logging = init_logging(LoggingOptions {
        default_level: "error".to_string(),
        stderr: false,
    });
    tracing::info!("before reconfiguring");
    logging.set_default_level("info");
    tracing::info!("after reconfiguring");
    log::info!("bridged after reconfiguring");

    let messages: Vec<String> = captured
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.message.clone())
        .collect();
    assert!(!messages.iter().any(|m| m == "before reconfiguring"));
    assert!(messages.iter().any(|m| m == "after reconfiguring"));
    assert!(messages.iter().any(|m| m.contains("bridged after reconfiguring")));
}
