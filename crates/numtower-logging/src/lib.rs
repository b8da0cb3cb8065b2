use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::dispatcher::{self, DefaultGuard, Dispatch};
use tracing::Subscriber;
use tracing_log::LogTracer;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{reload, Layer, Registry};

/// Environment variable consulted after `RUST_LOG`.
pub const LOG_ENV: &str = "NUMTOWER_LOG";

#[derive(Debug, Clone, Serialize)]
pub struct RuntimeLogRecord {
    pub ts: String,
    pub level: String,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<JsonValue>,
}

type LogHook = Arc<dyn Fn(&RuntimeLogRecord) + Send + Sync>;

static LOG_HOOK: OnceCell<LogHook> = OnceCell::new();

/// Keeps a thread-scoped subscriber alive when a global one was already installed, and
/// holds the handle used to change the level afterwards.
pub struct LoggingGuard {
    guard: Option<DefaultGuard>,
    filter: reload::Handle<EnvFilter, Registry>,
}

impl LoggingGuard {
    /// True when `init_logging` had to fall back to a thread-scoped subscriber.
    pub fn is_scoped(&self) -> bool {
        self.guard.is_some()
    }

    /// Swap the level used when neither `RUST_LOG` nor `NUMTOWER_LOG` is set.
    pub fn set_default_level(&self, default_level: &str) {
        if let Err(err) = self.filter.reload(env_filter(default_level)) {
            tracing::warn!("could not update the log filter: {err}");
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Filter directive used when neither `RUST_LOG` nor `NUMTOWER_LOG` is set.
    pub default_level: String,
    /// Print events to stderr in compact form.
    pub stderr: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        LoggingOptions {
            default_level: "warn".to_string(),
            stderr: true,
        }
    }
}

/// Install a hook that receives every event as a [`RuntimeLogRecord`]. Only the first
/// hook registered in a process is kept.
pub fn set_runtime_log_hook<F>(hook: F)
where
    F: Fn(&RuntimeLogRecord) + Send + Sync + 'static,
{
    let _ = LOG_HOOK.set(Arc::new(hook));
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(LOG_ENV))
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

pub fn init_logging(opts: LoggingOptions) -> LoggingGuard {
    // Route `log` records (the linear algebra provider uses `log`) into tracing.
    let _ = LogTracer::init();

    let (filter_layer, filter) = reload::Layer::new(env_filter(&opts.default_level));
    let fmt_layer = opts.stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
    });
    let dispatch = Dispatch::new(
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(LogBridgeLayer)
            .with(fmt_layer),
    );

    let guard = match dispatcher::set_global_default(dispatch.clone()) {
        Ok(()) => None,
        Err(_) => Some(dispatcher::set_default(&dispatch)),
    };

    LoggingGuard { guard, filter }
}

struct LogBridgeLayer;

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

impl<S> Layer<S> for LogBridgeLayer
where
    S: Subscriber,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let Some(hook) = LOG_HOOK.get() else {
            return;
        };
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        let record = RuntimeLogRecord {
            ts: now_rfc3339(),
            level: event.metadata().level().to_string(),
            target: event.metadata().target().to_string(),
            message: visitor
                .message
                .unwrap_or_else(|| event.metadata().name().to_string()),
            fields: visitor.fields,
        };
        hook(&record);
    }
}

#[derive(Default)]
struct JsonVisitor {
    message: Option<String>,
    fields: Option<JsonValue>,
}

impl JsonVisitor {
    fn insert(&mut self, name: &str, entry: JsonValue) {
        let obj = self
            .fields
            .get_or_insert_with(|| JsonValue::Object(Default::default()));
        if let JsonValue::Object(map) = obj {
            map.insert(name.to_string(), entry);
        }
    }
}

impl tracing::field::Visit for JsonVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let text = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(text);
        } else {
            self.insert(field.name(), JsonValue::String(text));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field.name(), JsonValue::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.insert(field.name(), JsonValue::from(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.insert(field.name(), JsonValue::from(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.insert(field.name(), JsonValue::from(value));
    }
}
