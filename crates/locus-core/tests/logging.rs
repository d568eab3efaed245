use locus_core::logging;
use tempfile::TempDir;

#[test]
fn logs_go_to_file_and_init_is_once_per_process() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state").join("locus.log");

    logging::init_to_file(&path, Some("debug")).unwrap();
    tracing::info!(target: "locus_core", "hello from the log test");

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("hello from the log test"));
    assert!(!contents.contains('\u{1b}'), "log file must not contain ANSI escapes");

    assert!(matches!(
        logging::init_to_file(&path, None),
        Err(locus_core::Error::Other(_))
    ));
}
