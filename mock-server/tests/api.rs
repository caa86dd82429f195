use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, HistoryRecord};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

const BMI_BODY: &str = r#"{"username":"alice","age_years":30,"gender":true,"weight_kg":70,"height_cm":175}"#;

// --- health ---

#[tokio::test]
async fn health_is_ok() {
    let resp = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

// --- calculators ---

#[tokio::test]
async fn bmi_returns_value_and_category() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/calc/bmi",
            r#"{"username":null,"age_years":30,"gender":true,"weight_kg":70,"height_cm":175}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"bmi_value": 22.86, "bmi_category": "Normal"}));
}

#[tokio::test]
async fn calorie_uses_activity_label() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/calc/calorie",
            r#"{"username":null,"age_years":30,"gender":true,"weight_kg":70,"height_cm":175,"activity_factor":"Sedentary"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"daily_calories": 1978}));
}

#[tokio::test]
async fn body_fat_impossible_girth_returns_422_detail() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/calc/body-fat",
            r#"{"username":null,"age_years":30,"gender":true,"weight_kg":70,"height_cm":175,"neck_cm":40,"waist_cm":38,"hip_cm":90}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = body_json(resp).await;
    assert!(body["detail"].as_str().unwrap().contains("waist_cm - neck_cm"));
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let resp = app()
        .oneshot(json_request("POST", "/calc/bmr", r#"{"age_years":30}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- history ---

#[tokio::test]
async fn list_history_without_username_is_empty() {
    let resp = app().oneshot(get("/calc/history")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let records: Vec<HistoryRecord> = body_json(resp).await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn get_record_unknown_user() {
    let resp = app()
        .oneshot(get("/calc/history/1?username=nobody"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "User not found");
}

#[tokio::test]
async fn delete_without_username_is_rejected() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/calc/history/1")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- full lifecycle ---

#[tokio::test]
async fn history_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // calculate with a username, which stores a record
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/calc/bmi", BMI_BODY))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // list
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/calc/history?username=alice"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let records: Vec<HistoryRecord> = body_json(resp).await;
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.calc_type, "bmi");
    assert!(record.inputs.get("username").is_none());
    assert_eq!(record.inputs["height_cm"], 175.0);
    assert_eq!(record.result["bmi_category"], "Normal");
    let id = record.id;

    // get by someone else
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/calc/bmr", &BMI_BODY.replace("alice", "bob")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/calc/history/{id}?username=bob")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Record not found");

    // update result only
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PATCH",
            &format!("/calc/history/{id}"),
            r#"{"username":"alice","inputs":null,"result":{"bmi_value":23.0,"bmi_category":"Normal"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: HistoryRecord = body_json(resp).await;
    assert_eq!(updated.result["bmi_value"], 23.0);
    assert_eq!(updated.inputs["age_years"], 30); // unchanged

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/calc/history/{id}?username=alice"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["detail"], "Record deleted successfully");

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/calc/history/{id}?username=alice")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/calc/history?username=alice"))
        .await
        .unwrap();
    let records: Vec<HistoryRecord> = body_json(resp).await;
    assert!(records.is_empty());
}
