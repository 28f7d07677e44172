// crates.io
use httpmock::prelude::*;
// self
use nuvem_fiscal::{
	Client, RequestOptions, ResponseBody, ResponseShape, _preludet::*, error::DecodeError,
};

async fn mock_token<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
	let body = format!("{{\"access_token\":\"{token}\",\"token_type\":\"bearer\",\"expires_in\":3600}}");

	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

#[tokio::test]
async fn authenticated_get_returns_json() {
	let server = MockServer::start_async().await;
	let auth = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.body("grant_type=client_credentials&client_id=a&client_secret=b&scope=empresa+nfce");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"T1\",\"token_type\":\"bearer\",\"expires_in\":3600}");
		})
		.await;
	let api = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/foo")
				.header("authorization", "Bearer T1")
				.header("content-type", "application/json");
			then.status(200).header("content-type", "application/json").body("{\"ok\":true}");
		})
		.await;
	let client =
		Client::new(test_config(&server.base_url(), "a", "b")).expect("Client should build.");
	let body = client.send("/foo", RequestOptions::get()).await.expect("GET /foo should succeed.");

	assert_eq!(body, ResponseBody::Json(serde_json::json!({ "ok": true })));

	auth.assert_calls_async(1).await;
	api.assert_calls_async(1).await;
}

#[tokio::test]
async fn token_is_reused_across_calls() {
	let server = MockServer::start_async().await;
	let auth = mock_token(&server, "T1").await;
	let api = server
		.mock_async(|when, then| {
			when.method(GET).path("/empresas").query_param("$top", "2");
			then.status(200).header("content-type", "application/json").body("{\"data\":[]}");
		})
		.await;
	let client = build_test_client(&server.base_url());

	for _ in 0..3 {
		let page: JsonValue = client
			.send_json("/empresas", RequestOptions::get().with_query("$top", 2))
			.await
			.expect("Listing should succeed.");

		assert_eq!(page, serde_json::json!({ "data": [] }));
	}

	auth.assert_calls_async(1).await;
	api.assert_calls_async(3).await;
}

#[tokio::test]
async fn no_content_yields_empty_value_of_each_shape() {
	let server = MockServer::start_async().await;
	let _auth = mock_token(&server, "T1").await;
	let _api = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/empresas/12345678000190");
			then.status(204);
		})
		.await;
	let client = build_test_client(&server.base_url());

	for shape in [ResponseShape::Json, ResponseShape::Text, ResponseShape::Binary] {
		let body = client
			.send("/empresas/12345678000190", RequestOptions::delete().with_shape(shape))
			.await
			.expect("204 should succeed.");

		assert_eq!(body, ResponseBody::empty(shape));
	}
}

#[tokio::test]
async fn api_error_carries_message_detail() {
	let server = MockServer::start_async().await;
	let _auth = mock_token(&server, "T1").await;
	let _api = server
		.mock_async(|when, then| {
			when.method(POST).path("/nfce");
			then.status(422).header("content-type", "application/json").body("{\"message\":\"x\"}");
		})
		.await;
	let client = build_test_client(&server.base_url());
	let err = client
		.send("/nfce", RequestOptions::post().with_body("{}"))
		.await
		.expect_err("422 should fail.");

	assert_eq!(err.to_string(), "API Error 422: x");
	assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn api_error_without_json_uses_status_text() {
	let server = MockServer::start_async().await;
	let _auth = mock_token(&server, "T1").await;
	let _api = server
		.mock_async(|when, then| {
			when.method(GET).path("/nfce/abc");
			then.status(502).header("content-type", "text/html").body("<html>bad gateway</html>");
		})
		.await;
	let client = build_test_client(&server.base_url());
	let err =
		client.send("/nfce/abc", RequestOptions::get()).await.expect_err("502 should fail.");

	assert!(matches!(err, Error::Api { status: 502, ref detail } if detail == "Bad Gateway"));
}

#[tokio::test]
async fn slow_response_times_out() {
	let server = MockServer::start_async().await;
	let _auth = mock_token(&server, "T1").await;
	let _api = server
		.mock_async(|when, then| {
			when.method(GET).path("/slow");
			then.status(200)
				.header("content-type", "application/json")
				.body("{}")
				.delay(std::time::Duration::from_secs(3));
		})
		.await;
	let client = Client::new(
		test_config(&server.base_url(), TEST_CLIENT_ID, TEST_CLIENT_SECRET)
			.with_timeout(Duration::milliseconds(200)),
	)
	.expect("Client should build.");
	let err = client.send("/slow", RequestOptions::get()).await.expect_err("Call should time out.");

	assert!(err.is_timeout());
	assert_eq!(err.to_string(), "Request timed out after 200 ms.");
}

#[tokio::test]
async fn caller_headers_override_defaults() {
	let server = MockServer::start_async().await;
	let _auth = mock_token(&server, "T1").await;
	let api = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path("/raw")
				.header("authorization", "Bearer T1")
				.header("content-type", "application/xml")
				.body("<x/>");
			then.status(200).header("content-type", "text/plain").body("ok");
		})
		.await;
	let client = build_test_client(&server.base_url());
	let body = client
		.send(
			"/raw",
			RequestOptions::put()
				.with_header("Content-Type", "application/xml")
				.with_body("<x/>")
				.with_shape(ResponseShape::Text),
		)
		.await
		.expect("PUT /raw should succeed.");

	assert_eq!(body, ResponseBody::Text("ok".into()));

	api.assert_calls_async(1).await;
}

#[tokio::test]
async fn auth_failure_skips_resource_call() {
	let server = MockServer::start_async().await;
	let _auth = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(401).header("content-type", "application/json").body("{}");
		})
		.await;
	let api = server
		.mock_async(|when, then| {
			when.path("/foo");
			then.status(200);
		})
		.await;
	let client = build_test_client(&server.base_url());
	let err = client.send("/foo", RequestOptions::get()).await.expect_err("Auth should fail.");

	assert_eq!(err.to_string(), "Authentication failed: Unauthorized");

	api.assert_calls_async(0).await;
}

#[tokio::test]
async fn unreachable_api_after_token_is_a_network_error() {
	let server = MockServer::start_async().await;
	let auth = mock_token(&server, "T1").await;
	let client = Client::new(
		test_config(&server.base_url(), TEST_CLIENT_ID, TEST_CLIENT_SECRET).with_base_url(
			Url::parse("http://127.0.0.1:9").expect("Closed-port base URL should parse."),
		),
	)
	.expect("Client should build.");
	let err = client
		.send("/empresas", RequestOptions::get())
		.await
		.expect_err("Closed API port should fail.");

	assert!(matches!(err, Error::Network(_)));

	auth.assert_calls_async(1).await;
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
	let server = MockServer::start_async().await;
	let _auth = mock_token(&server, "T1").await;
	let _api = server
		.mock_async(|when, then| {
			when.method(GET).path("/nfce/abc");
			then.status(200).header("content-type", "application/json").body("not json");
		})
		.await;
	let client = build_test_client(&server.base_url());
	let err = client
		.send("/nfce/abc", RequestOptions::get())
		.await
		.expect_err("Non-JSON 200 body should fail to decode.");

	assert!(matches!(err, Error::Decode(DecodeError::Json { .. })));
}
