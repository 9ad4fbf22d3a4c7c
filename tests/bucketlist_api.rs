mod common;

use axum::http::{Method, StatusCode};
use common::{DEFAULT_BUCKETLIST, DEFAULT_ITEM, OTHER, OWNER, PASSWORD, basic, seeded_app};
use serde_json::json;

#[tokio::test]
async fn list_returns_own_bucketlists_with_items() {
    let app = seeded_app().await;
    let auth = app.token_auth(OWNER).await;

    let response = app
        .send(Method::GET, "/api/v1/bucketlists", Some(&auth), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let lists = response.body.as_array().unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0]["name"], DEFAULT_BUCKETLIST);
    assert_eq!(lists[0]["owner_id"], 1);
    assert_eq!(lists[0]["items"][0]["name"], DEFAULT_ITEM);
    assert_eq!(lists[0]["items"][0]["done"], false);
}

#[tokio::test]
async fn list_is_empty_for_user_without_bucketlists() {
    let app = seeded_app().await;
    let auth = app.token_auth(OTHER).await;

    let response = app
        .send(Method::GET, "/api/v1/bucketlists", Some(&auth), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn limit_is_clamped_to_one_hundred() {
    let app = seeded_app().await;
    for n in 0..105 {
        app.state
            .store
            .create_bucketlist(1, &format!("list {n}"))
            .await
            .unwrap();
    }
    let auth = app.token_auth(OWNER).await;

    let over = app
        .send(Method::GET, "/api/v1/bucketlists?limit=101", Some(&auth), None)
        .await;
    assert_eq!(over.status, StatusCode::OK);
    assert_eq!(over.body.as_array().unwrap().len(), 100);

    let one = app
        .send(Method::GET, "/api/v1/bucketlists?limit=1", Some(&auth), None)
        .await;
    assert_eq!(one.status, StatusCode::OK);
    assert_eq!(one.body.as_array().unwrap().len(), 1);

    let default = app
        .send(Method::GET, "/api/v1/bucketlists", Some(&auth), None)
        .await;
    assert_eq!(default.body.as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn page_walks_through_results() {
    let app = seeded_app().await;
    for name in ["second", "third"] {
        app.state.store.create_bucketlist(1, name).await.unwrap();
    }
    let auth = app.token_auth(OWNER).await;

    let page_two = app
        .send(
            Method::GET,
            "/api/v1/bucketlists?limit=2&page=2",
            Some(&auth),
            None,
        )
        .await;
    assert_eq!(page_two.status, StatusCode::OK);
    let lists = page_two.body.as_array().unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0]["name"], "third");
}

#[tokio::test]
async fn invalid_limit_is_bad_request() {
    let app = seeded_app().await;
    let auth = app.token_auth(OWNER).await;

    let response = app
        .send(Method::GET, "/api/v1/bucketlists?limit=many", Some(&auth), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["status"], 400);
}

#[tokio::test]
async fn query_matches_substring_ignoring_case() {
    let app = seeded_app().await;
    app.state
        .store
        .create_bucketlist(1, "Trip to Lagos")
        .await
        .unwrap();
    app.state.store.create_bucketlist(1, "Learn Rust").await.unwrap();
    let auth = app.token_auth(OWNER).await;

    let trip = app
        .send(Method::GET, "/api/v1/bucketlists?q=tRIP", Some(&auth), None)
        .await;
    let names: Vec<&str> = trip
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Trip to Lagos"]);

    let this = app
        .send(Method::GET, "/api/v1/bucketlists?q=This", Some(&auth), None)
        .await;
    assert_eq!(this.status, StatusCode::OK);
    assert_eq!(this.body.as_array().unwrap().len(), 1);
    assert_eq!(this.body[0]["name"], DEFAULT_BUCKETLIST);

    let nothing = app
        .send(Method::GET, "/api/v1/bucketlists?q=zzz", Some(&auth), None)
        .await;
    assert_eq!(nothing.body, json!([]));
}

#[tokio::test]
async fn query_folds_case_beyond_ascii() {
    let app = seeded_app().await;
    let paris = app
        .state
        .store
        .create_bucketlist(1, "Été à Paris")
        .await
        .unwrap();
    let auth = app.token_auth(OWNER).await;

    // "Été", "été" and "ÉTÉ", percent-encoded.
    for q in ["%C3%89t%C3%A9", "%C3%A9t%C3%A9", "%C3%89T%C3%89"] {
        let response = app
            .send(
                Method::GET,
                &format!("/api/v1/bucketlists?q={q}"),
                Some(&auth),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body.as_array().unwrap().len(), 1, "q={q}");
        assert_eq!(response.body[0]["name"], "Été à Paris");
    }

    app.state
        .store
        .rename_bucketlist(1, paris.bucketlist.id, "Hiver à Québec")
        .await
        .unwrap();
    let renamed = app
        .send(
            Method::GET,
            "/api/v1/bucketlists?q=QU%C3%89BEC",
            Some(&auth),
            None,
        )
        .await;
    assert_eq!(renamed.body.as_array().unwrap().len(), 1);
    assert_eq!(renamed.body[0]["name"], "Hiver à Québec");

    let stale = app
        .send(Method::GET, "/api/v1/bucketlists?q=%C3%A9t%C3%A9", Some(&auth), None)
        .await;
    assert_eq!(stale.body, json!([]));
}

#[tokio::test]
async fn query_does_not_leak_other_users_lists() {
    let app = seeded_app().await;
    let auth = app.token_auth(OTHER).await;

    let response = app
        .send(Method::GET, "/api/v1/bucketlists?q=default", Some(&auth), None)
        .await;
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn create_bucketlist_returns_it() {
    let app = seeded_app().await;
    let auth = app.token_auth(OWNER).await;

    let response = app
        .send(
            Method::POST,
            "/api/v1/bucketlists",
            Some(&auth),
            Some(json!({ "name": "I just created a bucketlist" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "I just created a bucketlist");
    assert_eq!(response.body["owner_id"], 1);
    assert_eq!(response.body["items"], json!([]));
}

#[tokio::test]
async fn create_bucketlist_without_name_is_bad_request() {
    let app = seeded_app().await;
    let auth = basic(OWNER, PASSWORD);

    let no_body = app
        .send(Method::POST, "/api/v1/bucketlists", Some(&auth), None)
        .await;
    assert_eq!(no_body.status, StatusCode::BAD_REQUEST);

    for body in [
        json!({}),
        json!({ "name": "" }),
        json!({ "name": "   " }),
        json!({ "name": null }),
    ] {
        let response = app
            .send(Method::POST, "/api/v1/bucketlists", Some(&auth), Some(body))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn bucketlist_round_trip() {
    let app = seeded_app().await;
    let auth = app.token_auth(OWNER).await;

    let created = app
        .send(
            Method::POST,
            "/api/v1/bucketlists",
            Some(&auth),
            Some(json!({ "name": "Trip" })),
        )
        .await;
    let id = created.body["id"].as_i64().unwrap();
    let uri = format!("/api/v1/bucketlists/{id}");

    let fetched = app.send(Method::GET, &uri, Some(&auth), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["name"], "Trip");
    assert_eq!(fetched.body["id"], id);

    let updated = app
        .send(
            Method::PUT,
            &uri,
            Some(&auth),
            Some(json!({ "name": "I just changed this bucketlist" })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["name"], "I just changed this bucketlist");
    assert_eq!(updated.body["created_at"], fetched.body["created_at"]);

    let refetched = app.send(Method::GET, &uri, Some(&auth), None).await;
    assert_eq!(refetched.body["name"], "I just changed this bucketlist");

    let deleted = app.send(Method::DELETE, &uri, Some(&auth), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert!(deleted.body["message"].is_string());

    let gone = app.send(Method::GET, &uri, Some(&auth), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let deleted_again = app.send(Method::DELETE, &uri, Some(&auth), None).await;
    assert_eq!(deleted_again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rename_to_blank_is_bad_request() {
    let app = seeded_app().await;
    let auth = app.token_auth(OWNER).await;

    let response = app
        .send(
            Method::PUT,
            "/api/v1/bucketlists/1",
            Some(&auth),
            Some(json!({ "name": " " })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let unchanged = app
        .send(Method::GET, "/api/v1/bucketlists/1", Some(&auth), None)
        .await;
    assert_eq!(unchanged.body["name"], DEFAULT_BUCKETLIST);
}

#[tokio::test]
async fn missing_bucketlist_is_not_found() {
    let app = seeded_app().await;
    let auth = app.token_auth(OWNER).await;

    let response = app
        .send(Method::GET, "/api/v1/bucketlists/42", Some(&auth), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["status"], 404);

    let bad_id = app
        .send(Method::GET, "/api/v1/bucketlists/abc", Some(&auth), None)
        .await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn other_users_bucketlist_looks_missing() {
    let app = seeded_app().await;
    let dave = basic(OTHER, PASSWORD);

    let get = app
        .send(Method::GET, "/api/v1/bucketlists/1", Some(&dave), None)
        .await;
    assert_eq!(get.status, StatusCode::NOT_FOUND);

    let missing = app
        .send(Method::GET, "/api/v1/bucketlists/42", Some(&dave), None)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(get.body["error"], "bucketlist 1 not found");
    assert_eq!(missing.body["error"], "bucketlist 42 not found");

    let put = app
        .send(
            Method::PUT,
            "/api/v1/bucketlists/1",
            Some(&dave),
            Some(json!({ "name": "I should not have access to this bucketlist" })),
        )
        .await;
    assert_eq!(put.status, StatusCode::NOT_FOUND);

    let delete = app
        .send(Method::DELETE, "/api/v1/bucketlists/1", Some(&dave), None)
        .await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);

    let owner_view = app
        .send(
            Method::GET,
            "/api/v1/bucketlists/1",
            Some(&basic(OWNER, PASSWORD)),
            None,
        )
        .await;
    assert_eq!(owner_view.status, StatusCode::OK);
    assert_eq!(owner_view.body["name"], DEFAULT_BUCKETLIST);
}

#[tokio::test]
async fn trip_is_private_to_its_owner() {
    let app = seeded_app().await;
    let lade = app.token_auth(OWNER).await;
    let dave = app.token_auth(OTHER).await;

    let trip = app
        .send(
            Method::POST,
            "/api/v1/bucketlists",
            Some(&lade),
            Some(json!({ "name": "Trip" })),
        )
        .await;
    let uri = format!("/api/v1/bucketlists/{}", trip.body["id"]);

    let as_dave = app.send(Method::GET, &uri, Some(&dave), None).await;
    assert_eq!(as_dave.status, StatusCode::NOT_FOUND);

    let as_lade = app.send(Method::GET, &uri, Some(&lade), None).await;
    assert_eq!(as_lade.status, StatusCode::OK);
    assert_eq!(as_lade.body["name"], "Trip");
}

#[tokio::test]
async fn deleting_bucketlist_removes_its_items() {
    let app = seeded_app().await;
    let auth = app.token_auth(OWNER).await;

    let response = app
        .send(Method::DELETE, "/api/v1/bucketlists/1", Some(&auth), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bucketitems")
        .fetch_one(&*app.state.store.db)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}
