use axum::response::IntoResponse;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use axum_catalog_api::{
    error::AppError,
    models::Deal,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::{auth_service::validate_password, deal_service::resolve_duration},
};

fn deal(duration_secs: Option<i64>) -> Deal {
    Deal {
        id: Uuid::new_v4(),
        product_id: Uuid::new_v4(),
        discount_percent: 25.0,
        start_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        duration_secs,
        is_active: true,
    }
}

#[test]
fn end_time_is_start_plus_duration() {
    let d = deal(Some(24 * 3600));
    assert_eq!(
        d.end_time(),
        Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
    );
}

#[test]
fn open_ended_deal_has_no_end_time() {
    assert_eq!(deal(None).end_time(), None);
}

#[test]
fn deal_is_valid_inside_its_window() {
    let d = deal(Some(24 * 3600));
    let inside = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    assert!(d.is_valid(inside));
    // The window is inclusive at both ends.
    assert!(d.is_valid(d.start_time));
    assert!(d.is_valid(d.end_time().unwrap()));
}

#[test]
fn deal_is_invalid_after_expiry() {
    let d = deal(Some(24 * 3600));
    let after = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
    assert!(!d.is_valid(after));
}

#[test]
fn deal_is_invalid_before_start() {
    let d = deal(Some(24 * 3600));
    let before = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
    assert!(!d.is_valid(before));
}

#[test]
fn open_ended_deal_is_valid_long_after_start() {
    let d = deal(None);
    let far_future = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    assert!(d.is_valid(far_future));
}

#[test]
fn resolve_duration_converts_end_time() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    assert_eq!(resolve_duration(start, None, Some(end)).unwrap(), Some(86_400));
}

#[test]
fn resolve_duration_passes_through_seconds() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(resolve_duration(start, Some(3600), None).unwrap(), Some(3600));
}

#[test]
fn resolve_duration_defaults_to_open_ended() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(resolve_duration(start, None, None).unwrap(), None);
}

#[test]
fn resolve_duration_rejects_conflicting_inputs() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    assert!(resolve_duration(start, Some(3600), Some(end)).is_err());
}

#[test]
fn resolve_duration_rejects_backwards_window() {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert!(resolve_duration(start, None, Some(end)).is_err());
    assert!(resolve_duration(start, Some(0), None).is_err());
    assert!(resolve_duration(start, Some(-5), None).is_err());
}

#[test]
fn password_rules() {
    assert!(validate_password("short").is_err());
    assert!(validate_password("12345678").is_err());
    assert!(validate_password("correct-horse-1").is_ok());
}

#[test]
fn pagination_defaults_and_cap() {
    let p = Pagination {
        page: None,
        per_page: None,
    };
    assert_eq!(p.normalize(), (1, 10, 0));

    let p = Pagination {
        page: Some(3),
        per_page: Some(500),
    };
    assert_eq!(p.normalize(), (3, 100, 200));

    let p = Pagination {
        page: Some(0),
        per_page: Some(0),
    };
    assert_eq!(p.normalize(), (1, 1, 0));
}

#[test]
fn envelope_keys_are_alphabetical() {
    let body = ApiResponse::success("ok", serde_json::json!({"x": 1}), Some(Meta::empty()));
    let json = serde_json::to_string(&body).unwrap();
    let data = json.find("\"data\"").unwrap();
    let message = json.find("\"message\"").unwrap();
    let meta = json.find("\"meta\"").unwrap();
    assert!(data < message && message < meta);
}

#[test]
fn error_status_mapping() {
    assert_eq!(
        AppError::Conflict("Already liked".into())
            .into_response()
            .status(),
        400
    );
    assert_eq!(
        AppError::Unauthorized("Invalid email or password".into())
            .into_response()
            .status(),
        401
    );
    assert_eq!(AppError::Forbidden.into_response().status(), 403);
    assert_eq!(AppError::NotFound.into_response().status(), 404);
}
