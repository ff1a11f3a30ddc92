// Integration tests for the Roomly matching service

use roomly_match::core::{SearchEngine, SearchMode};
use roomly_match::models::{
    Coordinates, CreateListingRequest, Gender, Listing, Occupancy, SeekerProfile,
};
use roomly_match::models::UpdateListingRequest;
use roomly_match::routes::listings::{
    create_listing_document, update_listing_document, ListingCreateError, ListingUpdateError,
};
use roomly_match::services::{
    GeocodeError, GeocoderClient, Identity, StoreClient, StoreCollections,
};

fn store_for(server: &mockito::ServerGuard) -> StoreClient {
    StoreClient::new(
        server.url(),
        "test_key".to_string(),
        "test_project".to_string(),
        "test_db".to_string(),
        StoreCollections {
            listings: "listings".to_string(),
            seekers: "seekers".to_string(),
            users: "users".to_string(),
        },
    )
}

fn geocoder_for(server: &mockito::ServerGuard) -> GeocoderClient {
    GeocoderClient::new(
        format!("{}/geocode/v1/json", server.url()),
        "test_key".to_string(),
        "in".to_string(),
        5,
    )
}

fn identity() -> Identity {
    Identity {
        user_id: "user_1".to_string(),
        name: "Asha".to_string(),
        email: Some("asha@example.com".to_string()),
        photo_url: None,
    }
}

fn create_request(lat: Option<f64>, lng: Option<f64>) -> CreateListingRequest {
    CreateListingRequest {
        title: "Sunny room in a 2BHK".to_string(),
        address: "Hinjewadi, Pune, Maharashtra".to_string(),
        rent: 12000,
        looking_for_gender: Gender::Female,
        occupancy: Occupancy::Shared,
        highlights: vec!["Market nearby".to_string()],
        amenities: vec!["Wifi".to_string()],
        description: String::new(),
        lat,
        lng,
    }
}

const ONE_RESULT: &str = r#"{
    "results": [
        {"formatted": "Hinjewadi, Pune, Maharashtra", "geometry": {"lat": 18.5912, "lng": 73.7389}}
    ]
}"#;

#[tokio::test]
async fn listing_with_coordinates_persists_without_geocoding() {
    let mut geo_server = mockito::Server::new_async().await;
    let geo_mock = geo_server
        .mock("GET", "/geocode/v1/json")
        .match_query(mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut store_server = mockito::Server::new_async().await;
    let store_mock = store_server
        .mock("POST", "/databases/test_db/collections/listings/documents")
        .with_status(201)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let store = store_for(&store_server);
    let geocoder = geocoder_for(&geo_server);

    let (id, listing) = create_listing_document(
        &store,
        &geocoder,
        &identity(),
        create_request(Some(18.5912), Some(73.7389)),
    )
    .await
    .unwrap();

    assert!(!id.is_empty());
    assert_eq!(listing.lat, Some(18.5912));
    assert_eq!(listing.owner_id, "user_1");
    geo_mock.assert_async().await;
    store_mock.assert_async().await;
}

#[tokio::test]
async fn listing_without_coordinates_resolves_exactly_once_then_persists() {
    let mut geo_server = mockito::Server::new_async().await;
    let geo_mock = geo_server
        .mock("GET", "/geocode/v1/json")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(ONE_RESULT)
        .expect(1)
        .create_async()
        .await;

    let mut store_server = mockito::Server::new_async().await;
    let store_mock = store_server
        .mock("POST", "/databases/test_db/collections/listings/documents")
        .with_status(201)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let store = store_for(&store_server);
    let geocoder = geocoder_for(&geo_server);

    let (_, listing) =
        create_listing_document(&store, &geocoder, &identity(), create_request(None, None))
            .await
            .unwrap();

    assert_eq!(listing.lat, Some(18.5912));
    assert_eq!(listing.lng, Some(73.7389));
    geo_mock.assert_async().await;
    store_mock.assert_async().await;
}

#[tokio::test]
async fn listing_is_not_persisted_when_address_does_not_resolve() {
    let mut geo_server = mockito::Server::new_async().await;
    let _geo = geo_server
        .mock("GET", "/geocode/v1/json")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let mut store_server = mockito::Server::new_async().await;
    let store_mock = store_server
        .mock("POST", "/databases/test_db/collections/listings/documents")
        .expect(0)
        .create_async()
        .await;

    let store = store_for(&store_server);
    let geocoder = geocoder_for(&geo_server);

    let result =
        create_listing_document(&store, &geocoder, &identity(), create_request(None, None)).await;

    assert!(matches!(
        result,
        Err(ListingCreateError::Geocode(GeocodeError::NotFound(_)))
    ));
    store_mock.assert_async().await;
}

fn stored_listing_body(owner_id: &str) -> String {
    format!(
        r#"{{"$id": "l1", "data": {{
            "id": "l1", "title": "Sunny room", "address": "Hinjewadi, Pune",
            "lat": 18.59, "lng": 73.73, "rent": 12000, "ownerId": "{}"
        }}}}"#,
        owner_id
    )
}

#[tokio::test]
async fn update_with_half_coordinate_pair_is_rejected_before_any_read_or_write() {
    let geo_server = mockito::Server::new_async().await;

    let mut store_server = mockito::Server::new_async().await;
    let get_mock = store_server
        .mock("GET", "/databases/test_db/collections/listings/documents/l1")
        .expect(0)
        .create_async()
        .await;
    let patch_mock = store_server
        .mock("PATCH", "/databases/test_db/collections/listings/documents/l1")
        .expect(0)
        .create_async()
        .await;

    let store = store_for(&store_server);
    let geocoder = geocoder_for(&geo_server);

    let update = UpdateListingRequest {
        lat: Some(18.60),
        ..Default::default()
    };
    let result = update_listing_document(&store, &geocoder, &identity(), "l1", update).await;

    assert!(matches!(result, Err(ListingUpdateError::HalfCoordinates)));
    get_mock.assert_async().await;
    patch_mock.assert_async().await;
}

#[tokio::test]
async fn non_owner_update_is_rejected_and_writes_nothing() {
    let geo_server = mockito::Server::new_async().await;

    let mut store_server = mockito::Server::new_async().await;
    let _get = store_server
        .mock("GET", "/databases/test_db/collections/listings/documents/l1")
        .with_status(200)
        .with_body(stored_listing_body("someone_else"))
        .create_async()
        .await;
    let patch_mock = store_server
        .mock("PATCH", "/databases/test_db/collections/listings/documents/l1")
        .expect(0)
        .create_async()
        .await;

    let store = store_for(&store_server);
    let geocoder = geocoder_for(&geo_server);

    let update = UpdateListingRequest {
        rent: Some(14000),
        ..Default::default()
    };
    let result = update_listing_document(&store, &geocoder, &identity(), "l1", update).await;

    assert!(matches!(result, Err(ListingUpdateError::NotOwner)));
    patch_mock.assert_async().await;
}

#[tokio::test]
async fn address_update_re_resolves_before_patching() {
    let mut geo_server = mockito::Server::new_async().await;
    let geo_mock = geo_server
        .mock("GET", "/geocode/v1/json")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(ONE_RESULT)
        .expect(1)
        .create_async()
        .await;

    let mut store_server = mockito::Server::new_async().await;
    let _get = store_server
        .mock("GET", "/databases/test_db/collections/listings/documents/l1")
        .with_status(200)
        .with_body(stored_listing_body("user_1"))
        .create_async()
        .await;
    let patch_mock = store_server
        .mock("PATCH", "/databases/test_db/collections/listings/documents/l1")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "data": {"address": "Hinjewadi, Pune, Maharashtra", "lat": 18.5912, "lng": 73.7389}
        })))
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let store = store_for(&store_server);
    let geocoder = geocoder_for(&geo_server);

    let update = UpdateListingRequest {
        address: Some("Hinjewadi, Pune, Maharashtra".to_string()),
        ..Default::default()
    };
    update_listing_document(&store, &geocoder, &identity(), "l1", update)
        .await
        .unwrap();

    geo_mock.assert_async().await;
    patch_mock.assert_async().await;
}

fn candidate_listing(id: &str, gender: Gender, lat: f64, lng: f64) -> Listing {
    Listing {
        id: id.to_string(),
        title: format!("Room {}", id),
        address: "Hinjewadi, Pune, Maharashtra".to_string(),
        lat: Some(lat),
        lng: Some(lng),
        rent: 12000,
        looking_for_gender: gender,
        occupancy: Occupancy::Shared,
        highlights: vec!["Market nearby".to_string()],
        amenities: vec![],
        description: String::new(),
        owner_id: "owner".to_string(),
        image_urls: vec![],
        created_at: None,
    }
}

#[test]
fn test_end_to_end_listing_search_pipeline() {
    let engine = SearchEngine::with_default_radius();
    let origin = Coordinates::new(18.5912, 73.7389);

    let listings = vec![
        candidate_listing("near_female", Gender::Female, 18.5950, 73.7400),
        candidate_listing("far_female", Gender::Female, 19.0760, 72.8777),
        candidate_listing("near_male", Gender::Male, 18.5950, 73.7400),
        candidate_listing("near_any", Gender::Any, 18.6000, 73.7500),
    ];

    let viewer = vec!["Market nearby".to_string()];
    let results = engine.search_listings(
        listings,
        Gender::Female,
        &SearchMode::Proximity(origin),
        &viewer,
        None,
    );

    // Gender first: the male listing and the Any-tagged listing are gone.
    // Distance second: the Mumbai listing is outside the 10km radius.
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].listing.id, "near_female");

    // Within-radius result carries a km annotation and a full-coverage score.
    let km = results[0].distance_km.unwrap();
    assert!(km < 10.0);
    assert_eq!(results[0].match_score, 100);
}

#[test]
fn test_end_to_end_seeker_search_by_city() {
    let engine = SearchEngine::with_default_radius();

    let seeker = |id: &str, gender: Gender, city: &str| SeekerProfile {
        id: id.to_string(),
        user_id: id.to_string(),
        location: format!("{}, Maharashtra", city),
        lat: None,
        lng: None,
        gender,
        budget: 10000,
        occupancy: Occupancy::Any,
        highlights: vec![],
        interested_in_pg: false,
        mobile_visible: true,
        bio: String::new(),
        name: format!("Seeker {}", id),
        email: None,
        profile_pic_url: None,
        city: city.to_string(),
        created_at: None,
    };

    let seekers = vec![
        seeker("1", Gender::Female, "Pune"),
        seeker("2", Gender::Female, "Mumbai"),
        seeker("3", Gender::Male, "Pune"),
    ];

    let results = engine.search_seekers(
        seekers,
        Gender::Female,
        &SearchMode::Text("pune".to_string()),
        &[],
        None,
    );

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].seeker.id, "1");
    assert!(results[0].distance_km.is_none());
    // No viewer tags: the score falls in the filler band.
    assert!((30..50).contains(&results[0].match_score));
}
