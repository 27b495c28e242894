use grouplog::{
    Attachment, Context, FileLogger, FileSink, GroupFilter, Level, LoggerOptions, Message,
    SinkError,
};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn logger_for(path: &Path, filter: &str) -> FileLogger {
    FileLogger::new(LoggerOptions {
        log_file: Some(path.to_path_buf()),
        group_filter: filter.to_string(),
        force_log_trace: false,
    })
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("log file should exist")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_passing_events_append_one_line_each_in_order() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("log.txt");
    let logger = logger_for(&path, "all");

    for i in 0..5 {
        assert!(logger.debug(format!("message {i}"), &Context::grouped("test")));
    }

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 5);
    for (i, line) in lines.iter().enumerate() {
        assert!(
            line.ends_with(&format!("message {i}")),
            "unexpected line: {line}"
        );
    }
}

#[test]
fn test_line_has_timestamp_and_pid_prefix() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("log.txt");
    let logger = logger_for(&path, "all");

    assert!(logger.info("hello", &Context::grouped("test")));

    let lines = read_lines(&path);
    let line_format = regex::Regex::new(r"^\[\d{2}-\d{2}-\d{4} \d{2}:\d{2}:\d{2}\]: \d+: hello$")
        .expect("valid line regex");
    assert!(
        line_format.is_match(&lines[0]),
        "unexpected line format: {}",
        lines[0]
    );
}

#[test]
fn test_filtered_out_events_attempt_no_write() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("log.txt");
    let logger = logger_for(&path, "A|B");

    assert!(!logger.debug("dropped", &Context::grouped("C")));
    assert!(!logger.debug("groupless", &Context::new()));

    // No write was attempted, so the file was never created.
    assert!(!path.exists());
}

#[test]
fn test_scenario_selected_groups() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("log.txt");
    let logger = logger_for(&path, "test|C");

    assert!(!logger.debug("a", &Context::grouped("A")));
    assert!(logger.debug("c", &Context::grouped("C")));
    assert!(logger.debug("t", &Context::grouped("test")));
    assert!(!logger.debug("dab", &Context::grouped("D|A|B")));

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("c"));
    assert!(lines[1].ends_with("t"));
}

#[test]
fn test_missing_parent_directory_is_silent_failure() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("missing").join("log.txt");
    let logger = logger_for(&path, "all");

    assert!(!logger.error("boom", &Context::grouped("x")));
    assert!(!path.exists());
}

#[test]
fn test_no_destination_logs_nothing() {
    let logger = FileLogger::new(LoggerOptions {
        log_file: None,
        group_filter: "all".to_string(),
        force_log_trace: false,
    });

    assert!(!logger.debug("nowhere to go", &Context::grouped("test")));
}

#[test]
fn test_set_group_filter_takes_effect_immediately() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("log.txt");
    let logger = logger_for(&path, "");

    assert!(!logger.debug("off", &Context::grouped("test")));

    logger.set_group_filter("test");
    assert!(logger.debug("on", &Context::grouped("test")));

    logger.set_group_filter("");
    assert!(!logger.debug("off again", &Context::grouped("test")));

    assert_eq!(read_lines(&path).len(), 1);
}

#[test]
fn test_set_group_filter_is_idempotent() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("log.txt");
    let logger = logger_for(&path, "");

    logger.set_group_filter("test|C");
    assert_eq!(logger.group_filter(), GroupFilter::parse("test|C"));
    assert!(logger.debug("once", &Context::grouped("test")));

    logger.set_group_filter("test|C");
    logger.set_group_filter("test|C");
    assert!(logger.debug("twice", &Context::grouped("test")));
    assert!(!logger.debug("dropped", &Context::grouped("D")));

    assert_eq!(read_lines(&path).len(), 2);
}

#[test]
fn test_trace_logged_for_error_with_per_event_flag() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("log.txt");
    let logger = logger_for(&path, "all");

    let context = Context::grouped("error")
        .with_attachment(Attachment::new("boom", "trace text"))
        .with_force_log_trace(true);
    assert!(logger.error("boom", &context));

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("boom"));
    assert_eq!(lines[1], "trace text");
}

#[test]
fn test_trace_skipped_without_any_force_flag() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("log.txt");
    let logger = logger_for(&path, "all");

    let context =
        Context::grouped("error").with_attachment(Attachment::new("boom", "trace text"));
    assert!(logger.error("boom", &context));

    assert_eq!(read_lines(&path).len(), 1);
}

#[test]
fn test_trace_requires_error_grade_level() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("log.txt");
    let logger = logger_for(&path, "all");

    let context = Context::grouped("g")
        .with_attachment(Attachment::new("odd", "trace text"))
        .with_force_log_trace(true);
    assert!(logger.debug("odd", &context));
    assert!(logger.warning("odd", &context));

    // Neither debug nor warning is trace-grade.
    assert_eq!(read_lines(&path).len(), 2);
}

#[test]
fn test_sink_level_force_log_trace_setting() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("log.txt");
    let logger = FileLogger::new(LoggerOptions {
        log_file: Some(path.clone()),
        group_filter: "all".to_string(),
        force_log_trace: true,
    });

    let context =
        Context::grouped("error").with_attachment(Attachment::new("boom", "trace text"));
    assert!(logger.critical("boom", &context));

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "trace text");
}

#[test]
fn test_extra_info_written_as_indented_line() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("log.txt");
    let logger = logger_for(&path, "all");

    let context = Context::grouped("req").with_extra_info("request 42; user u1");
    assert!(logger.info("handled", &context));

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "\trequest 42; user u1");
}

#[test]
fn test_extra_info_precedes_trace_line() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("log.txt");
    let logger = logger_for(&path, "all");

    let context = Context::grouped("error")
        .with_extra_info("request 42")
        .with_attachment(Attachment::new("boom", "trace text"))
        .with_force_log_trace(true);
    assert!(logger.emergency("boom", &context));

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("boom"));
    assert_eq!(lines[1], "\trequest 42");
    assert_eq!(lines[2], "trace text");
}

#[test]
fn test_structured_message_renders_as_multi_line_dump() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("log.txt");
    let logger = logger_for(&path, "all");

    assert!(logger.info(
        json!({"user": "u1", "attempts": 3}),
        &Context::grouped("auth")
    ));

    let content = fs::read_to_string(&path).expect("log file should exist");
    assert!(content.lines().count() > 1);
    assert!(content.contains("\"attempts\": 3"));
    assert!(content.contains("\"user\": \"u1\""));
}

#[test]
fn test_extra_filter_hook_suppresses_writes() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("log.txt");
    let mut logger = logger_for(&path, "all");
    logger.set_extra_filter(|level, _context| level >= Level::Warning);

    assert!(!logger.debug("too chatty", &Context::grouped("g")));
    assert!(logger.warning("kept", &Context::grouped("g")));

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("kept"));
}

#[test]
fn test_try_write_surfaces_open_failure() {
    let dir = tempdir().expect("temp dir");
    let sink = FileSink::new(dir.path().join("missing").join("log.txt"));
    let message = Message::from("x");

    let error = sink
        .try_write(Level::Info, &message, &Context::new())
        .expect_err("open should fail");
    assert!(matches!(error, SinkError::Open { .. }));

    let error = FileSink::disconnected()
        .try_write(Level::Info, &message, &Context::new())
        .expect_err("no destination configured");
    assert!(matches!(error, SinkError::NoDestination));
}

#[test]
fn test_logger_options_deserialize_with_defaults() {
    let options: LoggerOptions =
        serde_json::from_str(r#"{"group_filter": "A|B"}"#).expect("valid options document");
    assert_eq!(options.group_filter, "A|B");
    assert_eq!(options.log_file, None);
    assert!(!options.force_log_trace);
}
