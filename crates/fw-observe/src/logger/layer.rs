use std::{fmt, sync::Arc};

use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{layer::Context, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::logger::{
    error::{LoggerError, LoggerResult},
    log::Logger,
    object::LogLevel,
};

/// `tracing` layer that forwards every event to a [`Logger`].
///
/// Levels map as ERROR -> Error, WARN -> Warning, INFO -> Info and
/// DEBUG/TRACE -> Debug; the logger's own switches decide what is written.
/// Event fields other than `message` are appended as `key=value`.
#[derive(Debug, Clone)]
pub struct LoggerLayer {
    logger: Arc<Logger>,
}

impl LoggerLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = LogLevel::from(*event.metadata().level());
        if !self.logger.is_enabled(level) {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.logger.log(level, &visitor.finish());
    }
}

/// Installs a registry with [`LoggerLayer`] as the global default subscriber.
///
/// After this call all `tracing` macros (`info!`, `warn!`, ...) go through
/// `logger`. Fails with [`LoggerError::AlreadyInitialized`] if a global
/// subscriber is already set.
pub fn init_logger(logger: Arc<Logger>) -> LoggerResult<()> {
    tracing_subscriber::registry()
        .with(LoggerLayer::new(logger))
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        let mut out = self.message;
        for field in self.fields {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&field);
        }
        out
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}
