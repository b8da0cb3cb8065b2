use std::sync::{Arc, Mutex};

use numtower_logging::{init_logging, set_runtime_log_hook, LoggingOptions, RuntimeLogRecord};

#[test]
fn second_install_is_thread_scoped() {
    let captured: Arc<Mutex<Vec<RuntimeLogRecord>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();
    set_runtime_log_hook(move |rec| sink.lock().unwrap().push(rec.clone()));

    let quiet = LoggingOptions {
        default_level: "debug".to_string(),
        stderr: false,
    };
    let first = init_logging(quiet.clone());
    let second = init_logging(quiet);
    assert!(!first.is_scoped());
    assert!(second.is_scoped());

    tracing::debug!(op = "+", "no rule for operand kinds");
    drop(second);

    let records = captured.lock().unwrap();
    let record = records
        .iter()
        .find(|r| r.message == "no rule for operand kinds")
        .expect("event forwarded to the hook");
    let json = serde_json::to_value(record).unwrap();
    assert_eq!(json["fields"]["op"], "+");
    assert!(json["ts"].as_str().unwrap().ends_with('Z'));
}
