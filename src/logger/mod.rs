//! Logger hierarchy and level filter.
//!
//! A log call runs the whole pipeline synchronously: threshold check,
//! call-site capture, masking, rendering, templating, then one write per sink.

pub mod clock;
pub mod options;
pub mod settings;

pub use clock::{Clock, FixedClock, SystemClock};
pub use options::LoggerOptions;
pub use settings::LoggerSettings;

use crate::domain::{LogLevel, LogRecord, LogValue, Meta};
use crate::mask::MaskRules;
use crate::parser::{CallerLocation, StackCapture, capture_call_site};
use crate::render::{RenderOptions, format_arguments};
use crate::sink::{ConsoleSink, Sink};
use crate::template::{TemplateContext, resolve};
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

pub struct Logger {
    settings: Arc<LoggerSettings>,
    mask_rules: Arc<MaskRules>,
    render_options: RenderOptions,
    min_level: AtomicU32,
    sinks: Vec<Arc<dyn Sink>>,
    clock: Arc<dyn Clock>,
    stack_capture: Arc<dyn StackCapture>,
    hostname: Option<String>,
}

impl Logger {
    /// Root logger writing to stdout, stamped by the system clock.
    pub fn new(options: LoggerOptions) -> Self {
        Self::builder().options(options).build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    fn from_parts(
        settings: LoggerSettings,
        sinks: Vec<Arc<dyn Sink>>,
        clock: Arc<dyn Clock>,
        stack_capture: Arc<dyn StackCapture>,
        hostname: Option<String>,
    ) -> Self {
        let mask_rules = Arc::new(settings.mask_rules());
        let render_options = settings.render_options();
        let min_level = AtomicU32::new(settings.min_level);

        Self {
            settings: Arc::new(settings),
            mask_rules,
            render_options,
            min_level,
            sinks,
            clock,
            stack_capture,
            hostname,
        }
    }

    pub fn settings(&self) -> &LoggerSettings {
        &self.settings
    }

    pub fn min_level(&self) -> u32 {
        self.min_level.load(Ordering::Relaxed)
    }

    /// Takes effect on the next call. Sub-loggers keep their own threshold.
    pub fn set_min_level(&self, level: u32) {
        self.min_level.store(level, Ordering::Relaxed);
    }

    /// Adds a sink. Existing sub-loggers are not affected.
    pub fn attach_transport(&mut self, sink: Arc<dyn Sink>) {
        self.sinks.push(sink);
    }

    /// Creates a child whose name path is this logger's path plus
    /// `options.name`.
    ///
    /// The child starts from a copy of this logger's settings and current
    /// threshold; the name itself is never inherited.
    pub fn get_sub_logger(&self, options: LoggerOptions) -> Logger {
        let mut base = (*self.settings).clone();
        if let Some(name) = base.name.take() {
            base.parent_names.push(name);
        }
        base.min_level = self.min_level();

        Logger::from_parts(
            base.merged(&options),
            self.sinks.clone(),
            self.clock.clone(),
            self.stack_capture.clone(),
            self.hostname.clone(),
        )
    }

    /// Logs `args` at a numeric level.
    ///
    /// Returns `None` without doing any work when `level_id` is below the
    /// current threshold.
    #[track_caller]
    pub fn log(&self, level_id: u32, level_name: &str, args: Vec<LogValue>) -> Option<LogRecord> {
        let min_level = self.min_level();
        if level_id < min_level {
            trace!(level_id, min_level, "log call below threshold");
            return None;
        }

        let caller = Location::caller();
        let settings = &*self.settings;

        let path = (!settings.hide_log_position_for_production).then(|| {
            capture_call_site(
                self.stack_capture.as_ref(),
                caller,
                settings.call_site_skip_frames,
            )
        });

        let meta = Meta {
            runtime: "rust",
            hostname: self.hostname.clone(),
            date: self.clock.now(),
            log_level_id: level_id,
            log_level_name: level_name.to_string(),
            name: settings.name.clone(),
            parent_names: settings.parent_names.clone(),
            path,
        };

        let mut arguments = Vec::with_capacity(settings.prefix.len() + args.len());
        arguments.extend(settings.prefix.iter().cloned());
        arguments.extend(args);
        let masked = self.mask_rules.mask_all(&arguments);

        let name_path = meta.name_path(&settings.parent_names_separator);
        let ctx = TemplateContext {
            instant: Some(meta.date),
            time_zone: settings.pretty_log_time_zone,
            log_level_name: level_name,
            name_path: &name_path,
            name_delimiter: &settings.name_delimiter,
            call_site: meta.path.as_ref(),
            styles: settings
                .style_pretty_logs
                .then_some(&settings.pretty_log_styles),
        };
        let mut line = resolve(&settings.pretty_log_template, &ctx);
        line.push_str(&format_arguments(&masked, &self.render_options));

        let record = LogRecord::new(
            masked,
            meta,
            settings.arguments_array_name.clone(),
            settings.meta_property.clone(),
        );
        for sink in &self.sinks {
            sink.write(&line, &record);
        }
        Some(record)
    }

    #[track_caller]
    pub fn log_level(&self, level: LogLevel, args: Vec<LogValue>) -> Option<LogRecord> {
        self.log(level.id(), level.name(), args)
    }

    #[track_caller]
    pub fn silly(&self, args: Vec<LogValue>) -> Option<LogRecord> {
        self.log_level(LogLevel::Silly, args)
    }

    #[track_caller]
    pub fn trace(&self, args: Vec<LogValue>) -> Option<LogRecord> {
        self.log_level(LogLevel::Trace, args)
    }

    #[track_caller]
    pub fn debug(&self, args: Vec<LogValue>) -> Option<LogRecord> {
        self.log_level(LogLevel::Debug, args)
    }

    #[track_caller]
    pub fn info(&self, args: Vec<LogValue>) -> Option<LogRecord> {
        self.log_level(LogLevel::Info, args)
    }

    #[track_caller]
    pub fn warn(&self, args: Vec<LogValue>) -> Option<LogRecord> {
        self.log_level(LogLevel::Warn, args)
    }

    #[track_caller]
    pub fn error(&self, args: Vec<LogValue>) -> Option<LogRecord> {
        self.log_level(LogLevel::Error, args)
    }

    #[track_caller]
    pub fn fatal(&self, args: Vec<LogValue>) -> Option<LogRecord> {
        self.log_level(LogLevel::Fatal, args)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggerOptions::default())
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.settings.name)
            .field("parent_names", &self.settings.parent_names)
            .field("min_level", &self.min_level())
            .field("sinks", &self.sinks.len())
            .finish_non_exhaustive()
    }
}

/// Assembles a root logger with injected collaborators.
#[derive(Default)]
pub struct LoggerBuilder {
    options: LoggerOptions,
    sinks: Vec<Arc<dyn Sink>>,
    clock: Option<Arc<dyn Clock>>,
    stack_capture: Option<Arc<dyn StackCapture>>,
}

impl LoggerBuilder {
    pub fn options(mut self, options: LoggerOptions) -> Self {
        self.options = options;
        self
    }

    /// Adds a sink. Without any, the logger writes to [`ConsoleSink`].
    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn stack_capture(mut self, capture: Arc<dyn StackCapture>) -> Self {
        self.stack_capture = Some(capture);
        self
    }

    pub fn build(self) -> Logger {
        let sinks = if self.sinks.is_empty() {
            vec![Arc::new(ConsoleSink) as Arc<dyn Sink>]
        } else {
            self.sinks
        };
        let hostname = hostname::get()
            .ok()
            .and_then(|name| name.into_string().ok());

        Logger::from_parts(
            LoggerSettings::default().merged(&self.options),
            sinks,
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            self.stack_capture
                .unwrap_or_else(|| Arc::new(CallerLocation)),
            hostname,
        )
    }
}
