use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use rand::{rngs::OsRng, RngCore};
use serde_json::{json, Value};
use tempfile::tempdir;
use tower::ServiceExt;

use fleetdesk_server::{api::app_router, build_state, config::Config};

async fn build_test_router(tmp: &std::path::Path) -> axum::Router {
    std::env::set_var("FD_DB_PATH", tmp.join("test.db"));
    std::env::set_var("FD_UPLOADS_DIR", tmp.join("uploads"));
    // An explicit origin list exercises the non-wildcard CORS branch.
    std::env::set_var("FD_CORS_ALLOW_ORIGINS", "http://localhost:5173");
    // The storage layer must follow FD_DB_PATH, not this.
    std::env::set_var("DATABASE_URL", tmp.join("wrong.db"));

    let mut secret_bytes = [0u8; 32];
    OsRng.fill_bytes(&mut secret_bytes);
    std::env::set_var("FD_SECRET_KEY", BASE64.encode(secret_bytes));

    let config = Config::from_env();
    let state = build_state(&config).await.unwrap();
    assert!(tmp.join("test.db").exists());
    assert!(!tmp.join("wrong.db").exists());
    app_router(state, &config)
}

fn cleanup_env() {
    for key in [
        "FD_DB_PATH",
        "FD_UPLOADS_DIR",
        "FD_SECRET_KEY",
        "FD_CORS_ALLOW_ORIGINS",
        "DATABASE_URL",
    ] {
        std::env::remove_var(key);
    }
}

async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

const BOUNDARY: &str = "fleetdesk-test-boundary";

fn multipart_body(files: &[(&str, &str)]) -> Body {
    let mut body = String::new();
    for (filename, content) in files {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    Body::from(body)
}

async fn upload(
    app: &axum::Router,
    uri: &str,
    token: &str,
    files: &[(&str, &str)],
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(multipart_body(files))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &axum::Router, national_id: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "nationalId": national_id, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn full_fleet_flow() {
    let tmp = tempdir().unwrap();
    let app = build_test_router(tmp.path()).await;

    // Liveness endpoints are public.
    let (status, _) = send(&app, Method::GET, "/api/v1/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);

    // Wrong password and unknown national ID both get the same generic 401.
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "nationalId": "12345678A", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "nationalId": "00000000Z", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    // Seeded accounts can log in; lower-cased national IDs are accepted.
    let raul_login = login(&app, "12345678a", "taxi361").await;
    let raul_token = raul_login["accessToken"].as_str().unwrap().to_string();
    let raul_id = raul_login["driver"]["driverId"].as_str().unwrap().to_string();
    assert_eq!(raul_login["driver"]["role"], "driver");
    assert_eq!(raul_login["tokenType"], "Bearer");

    let ivan_login = login(&app, "87654321B", "taxi1061").await;
    let ivan_token = ivan_login["accessToken"].as_str().unwrap().to_string();

    let admin_login = login(&app, "99887766D", "admin2025").await;
    let admin_token = admin_login["accessToken"].as_str().unwrap().to_string();
    assert_eq!(admin_login["driver"]["role"], "admin");

    // Protected routes reject missing and malformed tokens.
    let (status, _) = send(&app, Method::GET, "/api/v1/journeys", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, Method::GET, "/api/v1/journeys", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The session endpoint reflects the token's identity.
    let (status, session) = send(
        &app,
        Method::GET,
        "/api/v1/auth/session",
        Some(&raul_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["driverId"], raul_id.as_str());
    assert_eq!(session["displayName"], "Raul Maraver");

    // An over-cap journal day is rejected and leaves no trace.
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/journeys",
        Some(&raul_token),
        Some(json!({
            "date": "2025-01-10",
            "shiftStart": "08:00:00",
            "shiftEnd": "18:00:00",
            "effectiveHours": 9
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("cap"));
    let (_, journeys) = send(&app, Method::GET, "/api/v1/journeys", Some(&raul_token), None).await;
    assert_eq!(journeys.as_array().unwrap().len(), 0);

    // A valid day is recorded with the driver's display fields joined in.
    let (status, journey) = send(
        &app,
        Method::POST,
        "/api/v1/journeys",
        Some(&raul_token),
        Some(json!({
            "date": "2025-01-10",
            "shiftStart": "08:00:00",
            "shiftEnd": "16:30:00",
            "breaks": [{ "start": "12:00:00", "end": "12:30:00" }],
            "effectiveHours": 7.5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(journey["driverName"], "Raul Maraver");
    assert_eq!(journey["license"], "361");

    // Settlements: a forged companyDue is discarded and recomputed.
    let (status, settlement) = send(
        &app,
        Method::POST,
        "/api/v1/settlements",
        Some(&raul_token),
        Some(json!({
            "date": "2025-01-10",
            "shiftLabel": "Mañana",
            "rides": 14,
            "kilometers": 180,
            "takings": 400,
            "fuel": 50,
            "companyDue": 9999
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settlement["companyDue"].as_f64().unwrap(), 350.0);
    assert_eq!(settlement["company"], "PROVETAXI");
    assert_eq!(settlement["license"], "361");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/settlements",
        Some(&raul_token),
        Some(json!({
            "date": "2025-01-11",
            "shiftLabel": "Tarde",
            "rides": 16,
            "kilometers": 200,
            "takings": 650
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // A missing shift label is a validation error.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/settlements",
        Some(&raul_token),
        Some(json!({ "date": "2025-01-12", "shiftLabel": " ", "takings": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Listings are scoped: drivers see their own rows, the admin sees all.
    let (_, own) = send(
        &app,
        Method::GET,
        "/api/v1/settlements",
        Some(&raul_token),
        None,
    )
    .await;
    assert_eq!(own.as_array().unwrap().len(), 2);
    let (_, other) = send(
        &app,
        Method::GET,
        "/api/v1/settlements",
        Some(&ivan_token),
        None,
    )
    .await;
    assert_eq!(other.as_array().unwrap().len(), 0);
    let (_, all) = send(
        &app,
        Method::GET,
        "/api/v1/settlements",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    // The roster is admin-only.
    let (status, _) = send(&app, Method::GET, "/api/v1/drivers", Some(&raul_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, roster) = send(&app, Method::GET, "/api/v1/drivers", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(roster.as_array().unwrap().len(), 4);

    // Statement ingestion is admin-only and validates the month.
    let upload_uri = format!("/api/v1/closures/{raul_id}/2025/1/statements");
    let (status, _) = upload(&app, &upload_uri, &raul_token, &[("x-banco.csv", "Total\n1\n")]).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let bad_month = format!("/api/v1/closures/{raul_id}/2025/13/statements");
    let (status, _) = upload(&app, &bad_month, &admin_token, &[("x-banco.csv", "Total\n1\n")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = upload(&app, &upload_uri, &admin_token, &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Classification is by filename keyword; unknown files are stored but
    // left unattributed.
    let bank_csv = "Fecha;Concepto;Total\n2025-01-10;Ingreso;500,00\n2025-01-11;Ingreso;300,00\n";
    let freenow_csv = "date,trips,amount\n2025-01-10,14,400.00\n2025-01-11,16,650.00\n";
    let other_csv = "col_a,col_b\nx,y\n";
    let (status, report) = upload(
        &app,
        &upload_uri,
        &admin_token,
        &[
            ("extracto-BANCO-enero.csv", bank_csv),
            ("freenow-enero.csv", freenow_csv),
            ("otros.csv", other_csv),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(report["attributed"]["bank"].is_string());
    assert!(report["attributed"]["freenow"].is_string());
    assert!(report["attributed"]["uber"].is_null());
    assert_eq!(report["unattributed"].as_array().unwrap().len(), 1);
    assert_eq!(report["unattributed"][0]["originalName"], "otros.csv");
    assert_eq!(report["failed"].as_array().unwrap().len(), 0);

    // Processing is admin-only; the bank's declared 800 misses the expected
    // 1000 by more than tolerance and is flagged.
    let process_uri = format!("/api/v1/closures/{raul_id}/2025/1/process");
    let (status, _) = send(&app, Method::POST, &process_uri, Some(&raul_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, closure) = send(&app, Method::POST, &process_uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let result = &closure["result"];
    assert_eq!(result["totals"]["companyDue"].as_f64().unwrap(), 1000.0);
    assert_eq!(result["totals"]["takings"].as_f64().unwrap(), 1050.0);
    assert_eq!(result["totals"]["daysRecorded"], 2);
    let flags = result["flags"].as_array().unwrap();
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0]["source"], "bank");
    assert_eq!(flags[0]["expected"].as_f64().unwrap(), 1000.0);
    assert_eq!(flags[0]["observed"].as_f64().unwrap(), 800.0);
    assert_eq!(flags[0]["delta"].as_f64().unwrap(), 200.0);
    let first_processed: DateTime<Utc> =
        result["processedAt"].as_str().unwrap().parse().unwrap();

    // Re-uploading the bank statement replaces only that slot; a declared
    // total within tolerance clears the flag on the next run.
    let corrected_csv = "Fecha;Total\n2025-01-31;995,00\n";
    let (status, report) = upload(
        &app,
        &upload_uri,
        &admin_token,
        &[("banco-corregido.csv", corrected_csv)],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(report["attributed"]["bank"]
        .as_str()
        .unwrap()
        .contains("banco-corregido"));

    let (status, closure) = send(&app, Method::POST, &process_uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(closure["statements"]["freenow"].is_string());
    let result = &closure["result"];
    assert_eq!(result["flags"].as_array().unwrap().len(), 0);
    assert_eq!(result["skipped"].as_array().unwrap().len(), 0);
    let second_processed: DateTime<Utc> =
        result["processedAt"].as_str().unwrap().parse().unwrap();
    assert!(second_processed > first_processed);

    // Closure reads: the driver sees their own, another driver does not.
    let closure_uri = format!("/api/v1/closures/{raul_id}/2025/1");
    let (status, own_closure) = send(&app, Method::GET, &closure_uri, Some(&raul_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(own_closure["driverId"], raul_id.as_str());
    let (status, _) = send(&app, Method::GET, &closure_uri, Some(&ivan_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Missing months are 404; history listings return what exists.
    let missing_uri = format!("/api/v1/closures/{raul_id}/2025/2");
    let (status, _) = send(&app, Method::GET, &missing_uri, Some(&raul_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let history_uri = format!("/api/v1/closures/{raul_id}");
    let (status, history) = send(&app, Method::GET, &history_uri, Some(&raul_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);

    // Processing an unknown driver is 404.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/closures/not-a-driver/2025/1/process",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Logout is a 204 acknowledgement.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/logout",
        Some(&raul_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    cleanup_env();
}
