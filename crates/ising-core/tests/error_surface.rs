use ising_core::errors::{ErrorInfo, IsingError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("path", "results/neal_output_1.txt")
        .with_context("reason", "example")
}

#[test]
fn model_error_surface() {
    let err = IsingError::Model(sample_info("M001", "self loop"));
    assert_eq!(err.info().code, "M001");
    assert!(err.info().context.contains_key("path"));
}

#[test]
fn embedding_error_surface() {
    let err = IsingError::Embedding(sample_info("E001", "no placement"));
    assert_eq!(err.info().code, "E001");
    assert!(err.to_string().starts_with("embedding error: no placement (code: E001)"));
}

#[test]
fn remote_error_surface_carries_hint() {
    let err = IsingError::Remote(
        sample_info("R001", "unauthorized").with_hint("set DWAVE_API_TOKEN"),
    );
    assert!(err.to_string().contains("hint: set DWAVE_API_TOKEN"));
}

#[test]
fn io_helper_records_path() {
    let err = IsingError::io("write", "disk full", std::path::Path::new("out/a.txt"));
    assert_eq!(err.info().context.get("path").map(String::as_str), Some("out/a.txt"));
}

#[test]
fn errors_roundtrip_through_json() {
    let err = IsingError::Config(sample_info("C001", "missing token"));
    let json = serde_json::to_string(&err).unwrap();
    assert!(json.contains("\"family\":\"Config\""));
    let back: IsingError = serde_json::from_str(&json).unwrap();
    assert_eq!(back, err);
}
