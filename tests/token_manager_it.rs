// crates.io
use httpmock::prelude::*;
// self
use nuvem_fiscal::{Client, _preludet::*, auth::EXPIRY_MARGIN};

const TOKEN_FORM: &str = "grant_type=client_credentials&client_id=test-client-id&client_secret=test-client-secret&scope=empresa+nfce";

async fn mock_token<'a>(
	server: &'a MockServer,
	token: &str,
	expires_in: i64,
) -> httpmock::Mock<'a> {
	let body = format!(
		"{{\"access_token\":\"{token}\",\"token_type\":\"bearer\",\"expires_in\":{expires_in},\"scope\":\"empresa nfce\"}}"
	);

	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.header("content-type", "application/x-www-form-urlencoded")
				.body(TOKEN_FORM);
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

#[tokio::test]
async fn cached_token_is_reused_until_margin() {
	let server = MockServer::start_async().await;
	let mock = mock_token(&server, "cached-token", 3600).await;
	let client = build_test_client(&server.base_url());
	let before = OffsetDateTime::now_utc();
	let first = client.ensure_valid_token().await.expect("First exchange should succeed.");
	let second = client.ensure_valid_token().await.expect("Cached token should be served.");
	let after = OffsetDateTime::now_utc();

	assert_eq!(first.expose(), "cached-token");
	assert_eq!(second.expose(), "cached-token");

	mock.assert_calls_async(1).await;

	let cached = client.token_manager().cached_token().expect("Cache slot should be filled.");

	assert!(cached.expires_at >= before + Duration::seconds(3600) - EXPIRY_MARGIN);
	assert!(cached.expires_at <= after + Duration::seconds(3600) - EXPIRY_MARGIN);
}

#[tokio::test]
async fn token_inside_margin_is_refreshed() {
	let server = MockServer::start_async().await;
	let mut mock = mock_token(&server, "short-lived", 60).await;
	let client = build_test_client(&server.base_url());
	let first = client.ensure_valid_token().await.expect("First exchange should succeed.");

	assert_eq!(first.expose(), "short-lived");

	mock.assert_calls_async(1).await;
	mock.delete_async().await;
	mock = mock_token(&server, "renewed", 3600).await;

	let second = client.ensure_valid_token().await.expect("Stale token should be refreshed.");

	assert_eq!(second.expose(), "renewed");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn invalidate_forces_new_exchange() {
	let server = MockServer::start_async().await;
	let mock = mock_token(&server, "cached-token", 3600).await;
	let client = build_test_client(&server.base_url());

	client.ensure_valid_token().await.expect("First exchange should succeed.");
	client.token_manager().invalidate();
	client.ensure_valid_token().await.expect("Exchange after invalidation should succeed.");

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn auth_failure_uses_error_description() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_client\",\"error_description\":\"Bad credentials\"}");
		})
		.await;
	let client = build_test_client(&server.base_url());
	let err = client.ensure_valid_token().await.expect_err("Rejected credentials should fail.");

	assert_eq!(err.to_string(), "Authentication failed: Bad credentials");
	assert!(client.token_manager().cached_token().is_none());

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn auth_failure_falls_back_to_code_then_status_text() {
	let server = MockServer::start_async().await;
	let mut mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_scope\"}");
		})
		.await;
	let client = build_test_client(&server.base_url());
	let err = client.ensure_valid_token().await.expect_err("Invalid scope should fail.");

	assert_eq!(err.to_string(), "Authentication failed: invalid_scope");

	mock.delete_async().await;
	mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(503).header("content-type", "text/html").body("<html>down</html>");
		})
		.await;

	let err = client.ensure_valid_token().await.expect_err("Unavailable endpoint should fail.");

	assert!(matches!(err, Error::Authentication { ref reason, .. } if reason == "Service Unavailable"));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn unreachable_token_endpoint_is_an_authentication_error() {
	let client = Client::new(test_config("http://127.0.0.1:9", TEST_CLIENT_ID, TEST_CLIENT_SECRET))
		.expect("Client should build.");
	let err = client.ensure_valid_token().await.expect_err("Closed port should fail.");

	assert!(matches!(err, Error::Authentication { source: Some(_), .. }));
}

#[tokio::test]
async fn concurrent_refreshes_race_by_default() {
	let server = MockServer::start_async().await;
	let mock = mock_token(&server, "raced", 3600).await;
	let client = build_test_client(&server.base_url());
	let (first, second) = tokio::join!(client.ensure_valid_token(), client.ensure_valid_token());

	assert_eq!(first.expect("First caller should get a token.").expose(), "raced");
	assert_eq!(second.expect("Second caller should get a token.").expose(), "raced");

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn single_flight_shares_one_exchange() {
	let server = MockServer::start_async().await;
	let mock = mock_token(&server, "shared", 3600).await;
	let client = Client::new(
		test_config(&server.base_url(), TEST_CLIENT_ID, TEST_CLIENT_SECRET).with_single_flight(true),
	)
	.expect("Client should build.");
	let (first, second) = tokio::join!(client.ensure_valid_token(), client.ensure_valid_token());

	assert_eq!(first.expect("First caller should get a token.").expose(), "shared");
	assert_eq!(second.expect("Second caller should get a token.").expose(), "shared");

	mock.assert_calls_async(1).await;
}
