//! End-to-end ingest → query → uploads flow over in-memory adapters.
//!
//! Exercises the real domain services and the HTTP query handler without a
//! database or Redis.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::{App, test as actix_test, web};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::Value;

use marine_backend::domain::ports::{
    ElementRepository, ElementRepositoryError, FileMetadataRepository,
    FileMetadataRepositoryError, IngestFileRequest, ObservationCache, ObservationCacheError,
    ObservationCacheKey, ObservationIngest, ObservationInput, ObservationQuery,
    ObservationRepository, ObservationRepositoryError, UploadsQuery,
};
use marine_backend::domain::{
    CSV_HEADER, CategoryId, Element, ElementCategory, ElementId, ErrorCode, FileId, FileMetadata,
    FileUploader, NewFileMetadata, ObservationFilter, ObservationIngestService, ObservationPoint,
    ObservationQueryService, QueryResultRow, UploaderSummary, UploadsService, UserId,
};
use marine_backend::inbound::http::observations::query_observations;
use marine_backend::inbound::http::state::HttpState;

#[derive(Default)]
struct InMemoryObservations {
    points: Mutex<Vec<ObservationPoint>>,
}

impl InMemoryObservations {
    fn snapshot(&self) -> Vec<ObservationPoint> {
        self.points.lock().expect("points lock").clone()
    }
}

fn newest_first(mut points: Vec<ObservationPoint>) -> Vec<ObservationPoint> {
    points.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    points
}

#[async_trait]
impl ObservationRepository for InMemoryObservations {
    async fn find_in_bounds(
        &self,
        filter: &ObservationFilter,
    ) -> Result<Vec<ObservationPoint>, ObservationRepositoryError> {
        let matching = self
            .snapshot()
            .into_iter()
            .filter(|point| filter.matches(point))
            .collect();
        Ok(newest_first(matching))
    }

    async fn find_by_file(
        &self,
        file_id: FileId,
        limit: Option<usize>,
    ) -> Result<Vec<ObservationPoint>, ObservationRepositoryError> {
        let matching = self
            .snapshot()
            .into_iter()
            .filter(|point| point.file_id == file_id)
            .collect();
        let mut points = newest_first(matching);
        if let Some(limit) = limit {
            points.truncate(limit);
        }
        Ok(points)
    }

    async fn create_many(
        &self,
        points: &[ObservationPoint],
    ) -> Result<usize, ObservationRepositoryError> {
        self.points
            .lock()
            .expect("points lock")
            .extend_from_slice(points);
        Ok(points.len())
    }
}

struct InMemoryFiles {
    files: Mutex<Vec<FileMetadata>>,
    users: HashMap<UserId, UploaderSummary>,
}

impl InMemoryFiles {
    fn with_users(users: impl IntoIterator<Item = UploaderSummary>) -> Self {
        Self {
            files: Mutex::new(Vec::new()),
            users: users.into_iter().map(|user| (user.id, user)).collect(),
        }
    }

    fn snapshot(&self) -> Vec<FileMetadata> {
        self.files.lock().expect("files lock").clone()
    }
}

#[async_trait]
impl FileMetadataRepository for InMemoryFiles {
    async fn create(
        &self,
        metadata: &NewFileMetadata,
    ) -> Result<FileMetadata, FileMetadataRepositoryError> {
        let mut files = self.files.lock().expect("files lock");
        let next_id = i64::try_from(files.len()).expect("file count fits i64") + 1;
        let record = FileMetadata {
            id: FileId::new(next_id),
            user_id: metadata.user_id,
            uploaded_at: metadata.uploaded_at,
            bounding_box: metadata.bounding_box,
        };
        files.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(
        &self,
        file_id: FileId,
    ) -> Result<Option<FileMetadata>, FileMetadataRepositoryError> {
        Ok(self.snapshot().into_iter().find(|file| file.id == file_id))
    }

    async fn find_uploaders(
        &self,
        file_ids: &[FileId],
    ) -> Result<Vec<FileUploader>, FileMetadataRepositoryError> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|file| file_ids.contains(&file.id))
            .filter_map(|file| {
                self.users.get(&file.user_id).map(|user| FileUploader {
                    file_id: file.id,
                    uploader: user.clone(),
                })
            })
            .collect())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<FileMetadata>, FileMetadataRepositoryError> {
        let mut files: Vec<_> = self
            .snapshot()
            .into_iter()
            .filter(|file| file.user_id == user_id)
            .collect();
        files.sort_by(|a, b| (b.uploaded_at, b.id).cmp(&(a.uploaded_at, a.id)));
        Ok(files)
    }

    async fn find_covering(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<FileMetadata>, FileMetadataRepositoryError> {
        let coordinate = marine_backend::domain::Coordinate::new(latitude, longitude);
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|file| file.bounding_box.contains(coordinate))
            .collect())
    }
}

struct InMemoryElements {
    elements: Vec<Element>,
}

#[async_trait]
impl ElementRepository for InMemoryElements {
    async fn list_elements(
        &self,
        category: Option<CategoryId>,
    ) -> Result<Vec<Element>, ElementRepositoryError> {
        Ok(self
            .elements
            .iter()
            .filter(|element| {
                category.is_none_or(|id| element.category.as_ref().is_some_and(|c| c.id == id))
            })
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: ElementId) -> Result<Option<Element>, ElementRepositoryError> {
        Ok(self.elements.iter().find(|element| element.id == id).cloned())
    }
}

#[derive(Default)]
struct CountingCache {
    entries: Mutex<HashMap<String, Vec<QueryResultRow>>>,
    hits: AtomicUsize,
}

#[async_trait]
impl ObservationCache for CountingCache {
    async fn get(
        &self,
        key: &ObservationCacheKey,
    ) -> Result<Option<Vec<QueryResultRow>>, ObservationCacheError> {
        let cached = self
            .entries
            .lock()
            .expect("cache lock")
            .get(key.as_str())
            .cloned();
        if cached.is_some() {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
        Ok(cached)
    }

    async fn put(
        &self,
        key: &ObservationCacheKey,
        rows: &[QueryResultRow],
        _ttl: Duration,
    ) -> Result<(), ObservationCacheError> {
        self.entries
            .lock()
            .expect("cache lock")
            .insert(key.as_str().to_owned(), rows.to_vec());
        Ok(())
    }
}

const UPLOADER: i64 = 5;
const SST: i64 = 1;
const TURBIDITY: i64 = 2;

struct Harness {
    cache: Arc<CountingCache>,
    query: Arc<dyn ObservationQuery>,
    ingest: Arc<dyn ObservationIngest>,
    uploads: Arc<dyn UploadsQuery>,
    elements: Arc<dyn ElementRepository>,
}

#[fixture]
fn harness() -> Harness {
    let observations = Arc::new(InMemoryObservations::default());
    let files = Arc::new(InMemoryFiles::with_users([UploaderSummary {
        id: UserId::new(UPLOADER),
        email: "buoy@example.org".to_owned(),
        full_name: Some("Buoy Team".to_owned()),
    }]));
    let elements = Arc::new(InMemoryElements {
        elements: vec![
            Element {
                id: ElementId::new(SST),
                name: "Sea Surface Temperature".to_owned(),
                category: Some(ElementCategory {
                    id: CategoryId::new(1),
                    name: "Physical".to_owned(),
                }),
            },
            Element {
                id: ElementId::new(TURBIDITY),
                name: "Turbidity".to_owned(),
                category: None,
            },
        ],
    });
    let cache = Arc::new(CountingCache::default());

    let query = ObservationQueryService::new(observations.clone(), files.clone(), cache.clone());
    let ingest = ObservationIngestService::new(
        observations.clone(),
        files.clone(),
        elements.clone(),
        Arc::new(DefaultClock),
    );
    let uploads = UploadsService::new(observations, files, elements.clone());

    Harness {
        cache,
        query: Arc::new(query),
        ingest: Arc::new(ingest),
        uploads: Arc::new(uploads),
        elements,
    }
}

fn input(latitude: f64, longitude: f64, value: f64, hour: u32) -> ObservationInput {
    ObservationInput {
        latitude,
        longitude,
        value,
        timestamp: Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).single(),
    }
}

fn request(element: i64, points: Vec<ObservationInput>) -> IngestFileRequest {
    IngestFileRequest {
        uploader_id: UserId::new(UPLOADER),
        element_id: ElementId::new(element),
        points,
    }
}

#[rstest]
#[tokio::test]
async fn ingested_points_are_queryable_with_their_uploader(harness: Harness) {
    let response = harness
        .ingest
        .ingest_file(request(
            SST,
            vec![
                input(42.0, -70.0, 14.5, 1),
                input(43.0, -69.0, 15.0, 2),
                input(10.0, 10.0, 27.0, 3),
            ],
        ))
        .await
        .expect("ingest succeeds");
    assert_eq!(response.count, 3);
    let bbox = response.file.bounding_box;
    assert_eq!(
        (bbox.lat_min(), bbox.lat_max(), bbox.long_min(), bbox.long_max()),
        (10.0, 43.0, -70.0, 10.0)
    );

    let filter = ObservationFilter {
        lat_min: Some(40.0),
        lat_max: Some(45.0),
        long_min: Some(-72.0),
        long_max: Some(-65.0),
        element_id: None,
    };
    let rows = harness
        .query
        .query_by_bounding_box(filter)
        .await
        .expect("query succeeds");

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.point.file_id == response.file.id));
    assert!(
        rows.iter()
            .all(|row| row.user.as_ref().map(|u| u.id) == Some(UserId::new(UPLOADER)))
    );
    assert_eq!(rows.first().map(|row| row.point.value), Some(15.0));
}

#[rstest]
#[tokio::test]
async fn repeated_query_is_served_from_cache_until_expiry(harness: Harness) {
    harness
        .ingest
        .ingest_file(request(SST, vec![input(1.0, 1.0, 5.0, 1)]))
        .await
        .expect("first ingest");

    let filter = ObservationFilter::default();
    let first = harness
        .query
        .query_by_bounding_box(filter)
        .await
        .expect("first query");
    assert_eq!(first.len(), 1);
    assert_eq!(harness.cache.hits.load(Ordering::SeqCst), 0);

    harness
        .ingest
        .ingest_file(request(SST, vec![input(2.0, 2.0, 6.0, 2)]))
        .await
        .expect("second ingest");

    let second = harness
        .query
        .query_by_bounding_box(filter)
        .await
        .expect("second query");
    assert_eq!(harness.cache.hits.load(Ordering::SeqCst), 1);
    assert_eq!(second, first, "ingest does not invalidate cached results");
}

#[rstest]
#[tokio::test]
async fn unknown_element_is_rejected_before_any_write(harness: Harness) {
    let err = harness
        .ingest
        .ingest_file(request(99, vec![input(1.0, 1.0, 1.0, 1)]))
        .await
        .expect_err("unknown element");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);

    let uploads = harness
        .uploads
        .list_uploads(UserId::new(UPLOADER))
        .await
        .expect("listing succeeds");
    assert!(uploads.is_empty());
}

#[rstest]
#[tokio::test]
async fn uploads_read_path_reflects_ingested_file(harness: Harness) {
    let created = harness
        .ingest
        .ingest_file(request(
            TURBIDITY,
            vec![input(-5.0, 20.0, 0.4, 4), input(-4.0, 21.0, 0.6, 5)],
        ))
        .await
        .expect("ingest succeeds");

    let uploads = harness
        .uploads
        .list_uploads(UserId::new(UPLOADER))
        .await
        .expect("listing succeeds");
    let summary = uploads.first().expect("one upload");
    assert_eq!(summary.file.id, created.file.id);
    assert_eq!(summary.preview.len(), 2);
    assert!(summary.preview.iter().all(|row| row.element_name == "Turbidity"));
    assert!(summary.preview.iter().all(|row| row.category_name == "Uncategorized"));

    let export = harness
        .uploads
        .export_csv(created.file.id)
        .await
        .expect("export succeeds");
    let mut lines = export.content.lines();
    assert_eq!(lines.next(), Some(CSV_HEADER));
    assert_eq!(lines.next(), Some("-4,21,0.6,2,2024-06-01T05:00:00.000Z"));
    assert_eq!(lines.next(), Some("-5,20,0.4,2,2024-06-01T04:00:00.000Z"));
    assert_eq!(lines.next(), None);

    let covering = harness
        .uploads
        .files_covering(-4.5, 20.5)
        .await
        .expect("covering succeeds");
    assert_eq!(covering.len(), 1);
    let outside = harness
        .uploads
        .files_covering(0.0, 0.0)
        .await
        .expect("covering succeeds");
    assert!(outside.is_empty());
}

#[rstest]
#[actix_web::test]
async fn http_query_returns_joined_rows(harness: Harness) {
    harness
        .ingest
        .ingest_file(request(SST, vec![input(42.0, -70.0, 14.5, 1)]))
        .await
        .expect("ingest succeeds");

    let state = HttpState::fixtures()
        .with_observations(harness.query.clone())
        .with_ingest(harness.ingest.clone())
        .with_uploads(harness.uploads.clone())
        .with_elements(harness.elements.clone());
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").service(query_observations)),
    )
    .await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/observations?latMin=40&latMax=45&elementId=1")
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    let row = body.get(0).expect("one row");
    assert_eq!(row["latitude"], 42.0);
    assert_eq!(row["user"]["email"], "buoy@example.org");
    assert_eq!(row["timestamp"], "2024-06-01T01:00:00Z");
    assert_eq!(row["elementName"], "Sea Surface Temperature");
}
