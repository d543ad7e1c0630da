//! Tests for upload handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{CsvExport, IngestFileResponse, MockObservationIngest, MockUploadsQuery};
use crate::domain::{BoundingBox, Error};
use crate::inbound::http::test_utils::{login_cookie, session_app};

fn app_with(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    session_app().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .service(create_upload)
            .service(list_uploads)
            .service(download_upload)
            .service(files_covering),
    )
}

#[fixture]
fn metadata() -> FileMetadata {
    FileMetadata {
        id: FileId::new(77),
        user_id: UserId::new(5),
        uploaded_at: Utc
            .with_ymd_and_hms(2024, 4, 2, 15, 30, 0)
            .single()
            .expect("valid timestamp"),
        bounding_box: BoundingBox::new(-1.0, 2.0, -1.0, 2.0).expect("valid bbox"),
    }
}

#[rstest]
#[actix_web::test]
async fn upload_requires_session() {
    let mut ingest = MockObservationIngest::new();
    ingest.expect_ingest_file().never();
    let app =
        actix_test::init_service(app_with(HttpState::fixtures().with_ingest(Arc::new(ingest))))
            .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/uploads")
        .set_json(json!({ "elementId": 1, "rows": [] }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn upload_returns_created_metadata_and_count(metadata: FileMetadata) {
    let mut ingest = MockObservationIngest::new();
    let created = metadata.clone();
    ingest
        .expect_ingest_file()
        .withf(|request| {
            request.uploader_id == UserId::new(5)
                && request.element_id == ElementId::new(3)
                && request.points.len() == 2
                && request.points.first().and_then(|p| p.timestamp).is_none()
                && request.points.get(1).and_then(|p| p.timestamp).is_some()
        })
        .times(1)
        .return_once(move |_| {
            Ok(IngestFileResponse {
                file: created,
                count: 2,
            })
        });

    let app =
        actix_test::init_service(app_with(HttpState::fixtures().with_ingest(Arc::new(ingest))))
            .await;
    let cookie = login_cookie(&app, 5).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/uploads")
        .cookie(cookie)
        .set_json(json!({
            "elementId": 3,
            "rows": [
                { "latitude": -1.0, "longitude": 2.0, "value": 4.5 },
                { "latitude": 2.0, "longitude": -1.0, "value": 5.5,
                  "timestamp": "2024-04-01T00:00:00Z" }
            ]
        }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({
            "id": 77,
            "userId": 5,
            "uploadedAt": "2024-04-02T15:30:00Z",
            "latMin": -1.0,
            "latMax": 2.0,
            "longMin": -1.0,
            "longMax": 2.0,
            "count": 2
        })
    );
}

#[rstest]
#[actix_web::test]
async fn upload_coerces_numeric_strings(metadata: FileMetadata) {
    let mut ingest = MockObservationIngest::new();
    let created = metadata.clone();
    ingest
        .expect_ingest_file()
        .withf(|request| {
            let close = |a: f64, b: f64| (a - b).abs() < f64::EPSILON;
            request.points.len() == 2
                && request.points.first().is_some_and(|p| {
                    close(p.latitude, 1.0) && close(p.longitude, 1.5) && close(p.value, 10.0)
                })
                && request.points.get(1).is_some_and(|p| {
                    close(p.latitude, -0.5) && close(p.value, 7.25) && p.timestamp.is_some()
                })
        })
        .times(1)
        .return_once(move |_| {
            Ok(IngestFileResponse {
                file: created,
                count: 2,
            })
        });

    let app =
        actix_test::init_service(app_with(HttpState::fixtures().with_ingest(Arc::new(ingest))))
            .await;
    let cookie = login_cookie(&app, 5).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/uploads")
        .cookie(cookie)
        .set_json(json!({
            "elementId": 3,
            "rows": [
                { "latitude": "1", "longitude": "1.5", "value": "10" },
                { "latitude": -0.5, "longitude": " 2 ", "value": "7.25",
                  "timestamp": "2024-04-01T00:00:00Z" }
            ]
        }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[rstest]
#[case(
    json!({ "latitude": "1", "longitude": "east", "value": "10" }),
    "longitude",
    "invalid_number"
)]
#[case(json!({ "latitude": "1", "longitude": "2" }), "value", "missing_field")]
#[case(
    json!({ "latitude": 1, "longitude": 2, "value": 3, "timestamp": "noon" }),
    "timestamp",
    "invalid_timestamp"
)]
#[actix_web::test]
async fn upload_coercion_errors_name_row_and_field(
    #[case] bad_row: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut ingest = MockObservationIngest::new();
    ingest.expect_ingest_file().never();
    let app =
        actix_test::init_service(app_with(HttpState::fixtures().with_ingest(Arc::new(ingest))))
            .await;
    let cookie = login_cookie(&app, 5).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/uploads")
        .cookie(cookie)
        .set_json(json!({
            "elementId": 3,
            "rows": [{ "latitude": "1", "longitude": "1", "value": "1" }, bad_row]
        }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["row"], 1);
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn malformed_body_is_rejected() {
    let app = actix_test::init_service(app_with(HttpState::fixtures())).await;
    let cookie = login_cookie(&app, 5).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/uploads")
        .cookie(cookie)
        .set_json(json!({ "elementId": "three", "rows": [] }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn download_sets_csv_attachment_headers() {
    let mut uploads = MockUploadsQuery::new();
    uploads
        .expect_export_csv()
        .withf(|id| *id == FileId::new(12))
        .return_once(|file_id| {
            Ok(CsvExport {
                file_id,
                filename: "file_12.csv".to_owned(),
                content: "latitude,longitude,value,elementId,timestamp".to_owned(),
            })
        });
    let app =
        actix_test::init_service(app_with(HttpState::fixtures().with_uploads(Arc::new(uploads))))
            .await;
    let cookie = login_cookie(&app, 5).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/uploads/12/download")
        .cookie(cookie)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let header = |name| {
        res.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    assert_eq!(header(actix_web::http::header::CONTENT_TYPE).as_deref(), Some("text/csv"));
    assert_eq!(
        header(CONTENT_DISPOSITION).as_deref(),
        Some("attachment; filename=\"file_12.csv\"")
    );
    let body = actix_test::read_body(res).await;
    assert_eq!(body, "latitude,longitude,value,elementId,timestamp");
}

#[rstest]
#[actix_web::test]
async fn download_of_unknown_file_is_not_found() {
    let app = actix_test::init_service(app_with(HttpState::fixtures())).await;
    let cookie = login_cookie(&app, 5).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/uploads/404/download")
        .cookie(cookie)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn listing_is_scoped_to_the_session_user(metadata: FileMetadata) {
    let mut uploads = MockUploadsQuery::new();
    uploads
        .expect_list_uploads()
        .withf(|user| *user == UserId::new(5))
        .return_once(move |_| {
            Ok(vec![UploadSummary {
                file: metadata,
                preview: Vec::new(),
            }])
        });
    let app =
        actix_test::init_service(app_with(HttpState::fixtures().with_uploads(Arc::new(uploads))))
            .await;
    let cookie = login_cookie(&app, 5).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/uploads")
        .cookie(cookie)
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body[0]["id"], 77);
    assert_eq!(body[0]["preview"], json!([]));
}

#[rstest]
#[case("/api/v1/files/covering?latitude=1", "longitude")]
#[case("/api/v1/files/covering?latitude=x&longitude=1", "latitude")]
#[actix_web::test]
async fn covering_requires_both_coordinates(#[case] uri: &str, #[case] field: &str) {
    let mut uploads = MockUploadsQuery::new();
    uploads.expect_files_covering().never();
    let app =
        actix_test::init_service(app_with(HttpState::fixtures().with_uploads(Arc::new(uploads))))
            .await;
    let cookie = login_cookie(&app, 5).await;

    let req = actix_test::TestRequest::get()
        .uri(uri)
        .cookie(cookie)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn covering_passes_coordinates_through(metadata: FileMetadata) {
    let mut uploads = MockUploadsQuery::new();
    uploads
        .expect_files_covering()
        .withf(|lat, long| (lat - 0.5).abs() < f64::EPSILON && (long + 0.5).abs() < f64::EPSILON)
        .return_once(move |_, _| Ok(vec![metadata]));
    let app =
        actix_test::init_service(app_with(HttpState::fixtures().with_uploads(Arc::new(uploads))))
            .await;
    let cookie = login_cookie(&app, 5).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/files/covering?latitude=0.5&longitude=-0.5")
        .cookie(cookie)
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body[0]["id"], 77);
}

#[rstest]
#[actix_web::test]
async fn partial_ingest_failure_surfaces_file_id() {
    let mut ingest = MockObservationIngest::new();
    ingest.expect_ingest_file().return_once(|_| {
        Err(Error::service_unavailable("observation store offline")
            .with_details(json!({ "fileId": 41, "stage": "observations" })))
    });
    let app =
        actix_test::init_service(app_with(HttpState::fixtures().with_ingest(Arc::new(ingest))))
            .await;
    let cookie = login_cookie(&app, 5).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/uploads")
        .cookie(cookie)
        .set_json(json!({
            "elementId": 1,
            "rows": [{ "latitude": 0.0, "longitude": 0.0, "value": 1.0 }]
        }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"], json!({ "fileId": 41, "stage": "observations" }));
}
