use convoy::error::ConvoyError;

#[test]
fn display_command_not_found() {
    let err = ConvoyError::CommandNotFound("docker".into());
    assert_eq!(err.to_string(), "command not found: docker");
}

#[test]
fn display_prerequisite_missing() {
    let err = ConvoyError::PrerequisiteMissing("eb is not installed".into());
    assert_eq!(err.to_string(), "prerequisite missing: eb is not installed");
}

#[test]
fn display_aws_api() {
    let err = ConvoyError::AwsApi("throttled".into());
    assert_eq!(err.to_string(), "AWS API error: throttled");
}

#[test]
fn display_slot_conflict() {
    let err = ConvoyError::SlotConflict(3);
    assert_eq!(
        err.to_string(),
        "expected at most one running environment, found 3"
    );
}

#[test]
fn display_unknown_slot() {
    let err = ConvoyError::UnknownSlot("myapp-prod".into());
    assert_eq!(
        err.to_string(),
        "environment 'myapp-prod' matches neither slot suffix"
    );
}

#[test]
fn display_environment_not_found() {
    let err = ConvoyError::EnvironmentNotFound("myapp-blue".into());
    assert_eq!(err.to_string(), "no environment named 'myapp-blue'");
}

#[test]
fn display_env_missing() {
    let err = ConvoyError::EnvMissing("AWS_PROFILE".into());
    assert_eq!(err.to_string(), "environment variable missing: AWS_PROFILE");
}

#[test]
fn display_file_not_found() {
    let err = ConvoyError::FileNotFound("projects.json".into());
    assert_eq!(err.to_string(), "file not found: projects.json");
}

#[test]
fn display_other() {
    let err = ConvoyError::Other("custom error".into());
    assert_eq!(err.to_string(), "custom error");
}

#[test]
fn from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err: ConvoyError = io_err.into();
    assert!(matches!(err, ConvoyError::Io(_)));
}

#[test]
fn from_json_error() {
    let json_err = serde_json::from_str::<Vec<u64>>("invalid").unwrap_err();
    let err: ConvoyError = json_err.into();
    assert!(matches!(err, ConvoyError::Json(_)));
}
