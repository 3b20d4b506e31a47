use arete_core::errors::*;

#[test]
fn fact_not_found_carries_id() {
    let err = AreteError::FactNotFound {
        id: "abc-123".into(),
    };
    assert!(err.to_string().contains("abc-123"));
}

#[test]
fn validation_error_converts_to_arete_error() {
    let err: AreteError = ValidationError::EmptyContent.into();
    assert!(matches!(err, AreteError::ValidationError(_)));
    assert!(!err.is_transient());
}

#[test]
fn network_errors_are_transient() {
    let err: AreteError = CloudError::NetworkError {
        reason: "connection reset".into(),
    }
    .into();
    assert!(matches!(err, AreteError::CloudSyncError(_)));
    assert!(err.is_transient());
    assert!(err.to_string().contains("connection reset"));
}

#[test]
fn auth_errors_are_not_transient() {
    let err: AreteError = CloudError::AuthFailed {
        reason: "expired token".into(),
    }
    .into();
    assert!(!err.is_transient());
}

#[test]
fn archive_errors_stay_distinct_from_storage_errors() {
    let err: AreteError = ArchiveError::WriteFailed {
        path: "/tmp/a.json".into(),
        reason: "disk full".into(),
    }
    .into();
    assert!(matches!(err, AreteError::ArchiveError(_)));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn serde_json_error_converts() {
    let raw = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let err: AreteError = raw.into();
    assert!(matches!(err, AreteError::SerializationError(_)));
}
