//! Integration tests for the members roster and CSV export.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed data applied
//! - The admin server running (cargo run -p gogn-admin)
//! - `ADMIN_TEST_EMAIL` and `ADMIN_TEST_ACCESS_KEY` for an existing operator
//!
//! Run with: cargo test -p gogn-integration-tests -- --ignored

use reqwest::{Client, StatusCode};

/// Base URL for the admin panel (configurable via environment).
fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3301".to_string())
}

/// Create a client with a cookie store and log in.
async fn authenticated_client() -> Client {
    let client = Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client");

    let email = std::env::var("ADMIN_TEST_EMAIL").expect("ADMIN_TEST_EMAIL not set");
    let access_key = std::env::var("ADMIN_TEST_ACCESS_KEY").expect("ADMIN_TEST_ACCESS_KEY not set");

    let base_url = admin_base_url();
    let resp = client
        .post(format!("{base_url}/login"))
        .form(&[("email", email.as_str()), ("access_key", access_key.as_str())])
        .send()
        .await
        .expect("Failed to log in");

    assert!(
        resp.status().is_redirection(),
        "Login should redirect to /members, got: {}",
        resp.status()
    );

    client
}

/// Extract the member code cells from a rendered members page.
fn extract_member_codes(body: &str) -> Vec<String> {
    let marker = "<td class=\"mono\">";
    let mut codes = Vec::new();
    let mut rest = body;
    while let Some(start) = rest.find(marker) {
        rest = &rest[start + marker.len()..];
        if let Some(end) = rest.find("</td>") {
            codes.push(rest[..end].trim().to_string());
        }
    }
    codes
}

/// Extract the CSRF token from a rendered members page.
fn extract_csrf_token(body: &str) -> Option<String> {
    let marker = "name=\"csrf_token\" value=\"";
    let start = body.find(marker)? + marker.len();
    let end = body[start..].find('"')? + start;
    Some(body[start..end].to_string())
}

// ============================================================================
// Health & Auth Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_health_endpoints() {
    let client = Client::new();
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to get health");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to get readiness");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_members_requires_login() {
    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client");
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/members"))
        .send()
        .await
        .expect("Failed to get members page");

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/login");
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_login_rejects_bad_access_key() {
    let client = Client::new();
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/login"))
        .form(&[
            ("email", "nobody@example.com"),
            ("access_key", "not-a-real-key"),
        ])
        .send()
        .await
        .expect("Failed to post login");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Invalid email or access key"));
}

// ============================================================================
// Roster Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_members_list_renders_table() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/members"))
        .send()
        .await
        .expect("Failed to get members page");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");

    assert!(body.contains("data-table"));
    assert!(body.contains("Member Name"));
    assert!(body.contains("Member Code"));
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_members_list_filters_and_sort() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    // Search filter
    let resp = client
        .get(format!("{base_url}/members?q=ada"))
        .send()
        .await
        .expect("Failed to search members");
    assert_eq!(resp.status(), StatusCode::OK);

    // Unknown sort column is a no-op, not an error
    let resp = client
        .get(format!("{base_url}/members?sort=bogus&dir=desc"))
        .send()
        .await
        .expect("Failed to get members with bogus sort");
    assert_eq!(resp.status(), StatusCode::OK);

    // Combined filters
    let resp = client
        .get(format!("{base_url}/members?q=ada&plan=any&sort=name&dir=desc"))
        .send()
        .await
        .expect("Failed to get members with combined filters");
    assert_eq!(resp.status(), StatusCode::OK);

    // A page number past the end lands on the empty page, not an error
    let resp = client
        .get(format!("{base_url}/members?page=9223372036854775807"))
        .send()
        .await
        .expect("Failed to get members with huge page number");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_members_list_shows_member_codes() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    // Seeded members hold active memberships, so a code must appear
    // after the first render.
    let resp = client
        .get(format!("{base_url}/members"))
        .send()
        .await
        .expect("Failed to get members page");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("-001"), "expected an assigned member code");
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_member_codes_stable_across_renders() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    // The first render assigns codes; the second finds them already
    // stored and must show the same ones.
    let first = client
        .get(format!("{base_url}/members"))
        .send()
        .await
        .expect("Failed to get members page")
        .text()
        .await
        .expect("Failed to read response");
    let second = client
        .get(format!("{base_url}/members"))
        .send()
        .await
        .expect("Failed to get members page again")
        .text()
        .await
        .expect("Failed to read response");

    let first_codes = extract_member_codes(&first);
    let second_codes = extract_member_codes(&second);
    assert!(!first_codes.is_empty(), "expected member code cells");
    assert_eq!(first_codes, second_codes);
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_search_without_matches_shows_placeholder_row() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    let resp = client
        .get(format!(
            "{base_url}/members?q=zzz-no-such-member-anywhere"
        ))
        .send()
        .await
        .expect("Failed to search members");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("No members found"));
    assert!(body.contains("1 member, page 1 of 1"));
}

// ============================================================================
// Export Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_export_without_csrf_token_is_forbidden() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/members/export"))
        .form(&[("csrf_token", "")])
        .send()
        .await
        .expect("Failed to post export");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_export_returns_csv_attachment() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    // Render the page first to obtain the CSRF token
    let resp = client
        .get(format!("{base_url}/members"))
        .send()
        .await
        .expect("Failed to get members page");
    let body = resp.text().await.expect("Failed to read response");
    let token = extract_csrf_token(&body).expect("No CSRF token on members page");

    let resp = client
        .post(format!("{base_url}/members/export"))
        .form(&[("csrf_token", token.as_str())])
        .send()
        .await
        .expect("Failed to post export");

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/csv"));

    let disposition = resp
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("membership-users-"));

    let csv = resp.text().await.expect("Failed to read CSV");
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Member Name,Current Membership,Member Code,Status")
    );
    assert!(lines.next().is_some(), "CSV should contain data rows");
}
