use chrono::{Local, TimeZone, Utc};
use rask_pretty_log::logger::FixedClock;
use rask_pretty_log::parser::StackCapture;
use rask_pretty_log::template::TimeZoneMode;
use rask_pretty_log::{LogValue, Logger, LoggerOptions, MemorySink, log_args};
use regex::Regex;
use std::panic::Location;
use std::sync::Arc;

fn instant() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 3).unwrap() + chrono::Duration::milliseconds(7)
}

fn build(options: LoggerOptions) -> (Logger, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let logger = Logger::builder()
        .options(LoggerOptions {
            style_pretty_logs: options.style_pretty_logs.or(Some(false)),
            ..options
        })
        .sink(sink.clone())
        .clock(Arc::new(FixedClock(instant())))
        .build();
    (logger, sink)
}

#[test]
fn test_level_name_in_output() {
    let (logger, sink) = build(LoggerOptions::default());
    logger.log(1234, "testLevel", log_args!["Test"]);
    assert!(sink.contains("testLevel"));
    assert!(sink.contains("Test"));
}

#[test]
fn test_default_template_layout() {
    let (logger, sink) = build(LoggerOptions::default());
    let line = line!() + 1;
    logger.log(1234, "testLevel", log_args!["Normal log"]);

    assert_eq!(
        sink.lines()[0],
        format!("2024.03.09 07:05:03:007\ttestLevel\t/tests/pretty_settings_test.rs:{line}\tNormal log")
    );
}

#[test]
fn test_name() {
    let (logger, sink) = build(LoggerOptions::named("logger"));
    let record = logger.log(1, "testLevel", log_args!["foo bar"]).unwrap();

    assert_eq!(record.meta().name.as_deref(), Some("logger"));
    assert!(sink.contains("\tlogger\tfoo bar"));
}

#[test]
fn test_name_with_sub_logger_inheritance() {
    let (logger1, sink) = build(LoggerOptions::named("logger1"));
    let logger2 = logger1.get_sub_logger(LoggerOptions::named("logger2"));
    let logger3 = logger2.get_sub_logger(LoggerOptions::named("logger3"));

    let log1 = logger1.log(1, "testLevel", log_args!["foo bar"]).unwrap();
    let log2 = logger2.log(1, "testLevel", log_args!["foo bar"]).unwrap();
    let log3 = logger3.log(1, "testLevel", log_args!["foo bar"]).unwrap();

    assert_eq!(log1.meta().name.as_deref(), Some("logger1"));
    assert_eq!(log2.meta().name.as_deref(), Some("logger2"));
    assert_eq!(log3.meta().name.as_deref(), Some("logger3"));
    assert_eq!(log3.meta().parent_names, vec!["logger1", "logger2"]);

    let lines = sink.lines();
    assert!(lines[0].contains("\tlogger1\t"));
    assert!(lines[1].contains("\tlogger1:logger2\t"));
    assert!(lines[2].contains("\tlogger1:logger2:logger3\t"));
}

#[test]
fn test_custom_parent_separator() {
    let (parent, sink) = build(LoggerOptions {
        name: Some("parent".to_string()),
        parent_names_separator: Some(" > ".to_string()),
        ..Default::default()
    });
    parent
        .get_sub_logger(LoggerOptions::named("child"))
        .info(log_args!["hi"]);
    assert!(sink.contains("parent > child"));
}

#[test]
fn test_arguments_array_name() {
    let (logger, sink) = build(LoggerOptions {
        arguments_array_name: Some("argumentsArray".to_string()),
        ..Default::default()
    });
    let record = logger
        .log(1234, "testLevel", log_args!["Test1", "Test2"])
        .unwrap();

    assert!(sink.contains("Test1 Test2"));
    assert_eq!(
        record.to_json()["argumentsArray"],
        serde_json::json!(["Test1", "Test2"])
    );
}

#[test]
fn test_meta_property() {
    let (logger, sink) = build(LoggerOptions {
        meta_property: Some("_test".to_string()),
        ..Default::default()
    });
    let record = logger.log(1234, "testLevel", log_args!["Test"]).unwrap();

    assert!(sink.contains("Test"));
    assert_eq!(record.meta_property(), "_test");
    assert_eq!(record.to_json()["_test"]["logLevelName"], "testLevel");
}

#[test]
fn test_hide_log_position_for_production() {
    let (normal, sink) = build(LoggerOptions {
        hide_log_position_for_production: Some(false),
        ..Default::default()
    });
    let (production, production_sink) = build(LoggerOptions {
        hide_log_position_for_production: Some(true),
        ..Default::default()
    });

    let line = line!() + 1;
    normal.log(1234, "testLevel", log_args!["Normal log"]);
    let record = production
        .log(1234, "testLevel", log_args!["Production log"])
        .unwrap();

    assert!(sink.contains(&format!(
        "testLevel\t/tests/pretty_settings_test.rs:{line}\tNormal log"
    )));
    assert!(production_sink.contains("testLevel\t\tProduction log"));
    assert!(record.meta().path.is_none());
}

#[test]
fn test_dont_mask() {
    let (logger, sink) = build(LoggerOptions {
        mask_values_of_keys: Some(Vec::new()),
        ..Default::default()
    });
    logger.log(1234, "testLevel", vec![LogValue::object([
        ("password", LogValue::from("pass123")),
        ("otherKey", LogValue::from("otherKey456")),
        ("nested", LogValue::object([("moviePassword", "swordfish")])),
    ])]);

    let output = sink.output();
    for needle in ["password:", "pass123", "otherKey:", "otherKey456", "moviePassword:", "swordfish"] {
        assert!(output.contains(needle), "missing {needle}");
    }
}

#[test]
fn test_mask_values_of_keys_not_set() {
    let (logger, sink) = build(LoggerOptions::default());
    logger.log(1234, "testLevel", vec![LogValue::object([("password", "pass123")])]);

    assert!(sink.contains("password:"));
    assert!(sink.contains("'[***]'"));
    assert!(!sink.contains("pass123"));
}

#[test]
fn test_mask_values_of_keys_and_placeholder() {
    let (logger, sink) = build(LoggerOptions {
        mask_values_of_keys: Some(vec!["otherKey".to_string()]),
        mask_placeholder: Some("[###]".to_string()),
        ..Default::default()
    });
    logger.log(1234, "testLevel", vec![LogValue::object([
        ("password", "pass123"),
        ("otherKey", "otherKey456"),
    ])]);

    assert!(sink.contains("pass123"));
    assert!(sink.contains("otherKey: '[###]'"));
    assert!(!sink.contains("otherKey456"));
}

#[test]
fn test_mask_case_insensitive() {
    let (logger, sink) = build(LoggerOptions {
        mask_values_of_keys: Some(vec!["otherkey".to_string()]),
        mask_values_of_keys_case_insensitive: Some(true),
        ..Default::default()
    });
    logger.log(1234, "testLevel", vec![LogValue::object([("otherKEY", "otherKey456")])]);

    assert!(sink.contains("otherKEY: '[***]'"));
}

#[test]
fn test_mask_values_regex() {
    let (logger, sink) = build(LoggerOptions {
        mask_values_regex: Some(vec![Regex::new("otherKey").unwrap()]),
        ..Default::default()
    });
    let payload = LogValue::object([("password", "pass123"), ("otherKey", "otherKey456")]);
    logger.log(1234, "testLevel", vec![payload.clone()]);

    assert!(sink.contains("password: '[***]'"));
    assert!(sink.contains("otherKey: '[***]456'"));
    assert_eq!(payload.get("otherKey").unwrap().as_str(), Some("otherKey456"));

    logger.log(4567, "testLevel", vec![LogValue::object([("object", true)])]);
    assert!(sink.contains("{\n  object: 'true'\n}"));

    logger.log(4567, "testLevel", log_args![0]);
    logger.log(4567, "testLevel", vec![LogValue::Undefined]);
    let lines = sink.lines();
    assert!(lines[2].ends_with("\t0"));
    assert!(lines[3].ends_with("\tundefined"));
}

#[test]
fn test_template_shortcuts() {
    let (logger, sink) = build(LoggerOptions {
        pretty_log_template: Some("**{{dd}}.{{mm}}.{{yyyy}} {{hh}}:{{MM}}** ".to_string()),
        ..Default::default()
    });
    logger.log(1234, "testLevel", log_args!["Test"]);
    assert_eq!(sink.lines()[0], "**09.03.2024 07:05** Test");

    let (logger, sink) = build(LoggerOptions {
        pretty_log_template: Some("**{{dateIsoStr}}** ".to_string()),
        ..Default::default()
    });
    logger.log(1234, "testLevel", log_args!["Test"]);
    assert_eq!(sink.lines()[0], "**2024-03-09 07:05:03** Test");

    let (logger, sink) = build(LoggerOptions {
        pretty_log_template: Some("**{{rawIsoStr}}** ".to_string()),
        pretty_log_time_zone: Some(TimeZoneMode::Utc),
        ..Default::default()
    });
    logger.log(1234, "testLevel", log_args!["Test"]);
    assert_eq!(sink.lines()[0], "**2024-03-09T07:05:03** Test");
}

#[test]
fn test_local_time_zone() {
    let (logger, sink) = build(LoggerOptions {
        pretty_log_template: Some("**{{yyyy}}-{{mm}}-{{dd}}T{{hh}}:{{MM}}:{{ss}}** ".to_string()),
        pretty_log_time_zone: Some(TimeZoneMode::Local),
        ..Default::default()
    });
    logger.log(1234, "testLevel", log_args!["Test"]);

    let expected = instant().with_timezone(&Local).format("**%Y-%m-%dT%H:%M:%S** Test");
    assert_eq!(sink.lines()[0], expected.to_string());
}

#[test]
fn test_change_min_level() {
    let (logger, sink) = build(LoggerOptions {
        min_level: Some(1),
        ..Default::default()
    });
    logger.log(1, "custom_level_one", log_args!["LOG1"]);
    logger.log(2, "custom_level_two", log_args!["LOG2"]);

    logger.set_min_level(2);
    assert!(logger.log(1, "custom_level_one", log_args!["LOG3"]).is_none());
    logger.log(2, "custom_level_two", log_args!["LOG4"]);

    assert!(sink.contains("LOG1"));
    assert!(sink.contains("LOG2"));
    assert!(!sink.contains("LOG3"));
    assert!(sink.contains("LOG4"));
}

#[test]
fn test_sub_logger_keeps_snapshot_of_parent() {
    let (parent, sink) = build(LoggerOptions {
        name: Some("parent".to_string()),
        prefix: log_args!["[p]"],
        ..Default::default()
    });
    let child = parent.get_sub_logger(LoggerOptions {
        name: Some("child".to_string()),
        prefix: log_args!["[c]"],
        ..Default::default()
    });

    parent.set_min_level(6);
    child.info(log_args!["message"]);

    assert!(sink.contains("parent:child\t[p] [c] message"));
}

#[test]
fn test_injected_stack_capture_and_skip() {
    let capture: Arc<dyn StackCapture> = Arc::new(|_: &'static Location<'static>| {
        "Error\n    at logger::emit (/srv/engine.rs:1:1)\n    at handler (/srv/api/routes.rs:55:7)"
            .to_string()
    });
    let sink = Arc::new(MemorySink::new());
    let logger = Logger::builder()
        .options(LoggerOptions {
            style_pretty_logs: Some(false),
            call_site_skip_frames: Some(1),
            pretty_log_template: Some("{{fileNameWithLine}} {{method}} ".to_string()),
            ..Default::default()
        })
        .sink(sink.clone())
        .stack_capture(capture)
        .build();

    let record = logger.info(log_args!["routed"]).unwrap();

    assert_eq!(sink.lines()[0], "routes.rs:55 handler routed");
    assert_eq!(record.meta().path.as_ref().map(|p| p.column), Some(7));
}

#[test]
fn test_styled_output_contains_escape_codes() {
    let (logger, sink) = build(LoggerOptions {
        style_pretty_logs: Some(true),
        ..Default::default()
    });
    logger.info(log_args!["styled"]);
    assert!(sink.contains("\u{1b}["));
    assert!(sink.contains("styled"));
}
