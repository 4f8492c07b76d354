mod common;

use autoform::adapters::form_client::HttpFormClient;
use autoform::adapters::submission_encoder::decode_pairs;
use autoform::config::{AnswerSettings, HttpSettings};
use autoform::domain::FormGateway;
use common::{form_page, StubFormServer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

fn schema() -> serde_json::Value {
    json!([
        null,
        [
            "Description",
            [
                [1, "Name", null, 0, [[111, null, 1]]],
                [2, "Age", null, 0, [[222, null, 1, null, [[1, 2, ["17"]]]]]]
            ],
            null, null, null, null, null, null,
            "Title",
            null,
            [null, null, null, null, null, null, null]
        ],
        "/forms",
        "Title"
    ])
}

#[tokio::test]
async fn test_fetch_fill_and_submit() {
    let server = StubFormServer::start(form_page(&schema(), "-9876"), 200).await;
    let client = HttpFormClient::new(&HttpSettings::default()).unwrap();
    let form_url = server.form_url();

    let raw = client.fetch(&form_url).await.unwrap();
    assert_eq!(raw.token, "-9876");
    assert_eq!(raw.schema, schema());

    let mut rng = StdRng::seed_from_u64(5);
    let submission =
        autoform::fill_form(&raw.schema, &raw.token, &AnswerSettings::default(), &mut rng).unwrap();

    let status = client
        .submit(&form_url, &raw.token, &submission.body)
        .await
        .unwrap();
    assert_eq!(status, 200);

    let requests = server.recorded().await;
    assert_eq!(requests.len(), 2);

    let get = &requests[0];
    assert_eq!(get.method, "GET");
    assert_eq!(get.path, "/forms/d/e/test-form/viewform");
    assert_eq!(get.header("accept-language"), Some("en-CA,en-US;q=0.7,en;q=0.3"));
    assert!(get.header("user-agent").unwrap().contains("Firefox"));

    let post = &requests[1];
    assert_eq!(post.method, "POST");
    assert_eq!(post.path, "/forms/d/e/test-form/formResponse");
    assert_eq!(
        post.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(
        post.header("referer"),
        Some(format!("{}?fbzx=-9876", form_url).as_str())
    );
    assert_eq!(post.header("sec-gpc"), Some("1"));
    assert_eq!(post.body, submission.body);

    let pairs = decode_pairs(&post.body);
    assert_eq!(pairs[0], ("entry.111".to_string(), "Sample short answer".to_string()));
    assert_eq!(pairs[1], ("entry.222".to_string(), "18".to_string()));
}

#[tokio::test]
async fn test_rejected_submission_reports_status() {
    let server = StubFormServer::start(form_page(&schema(), "1"), 400).await;
    let client = HttpFormClient::new(&HttpSettings::default()).unwrap();

    let status = client
        .submit(&server.form_url(), "1", "entry.111=x")
        .await
        .unwrap();
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_page_without_schema_fails_fetch() {
    let server = StubFormServer::start("<html><body>Sign in</body></html>".to_string(), 200).await;
    let client = HttpFormClient::new(&HttpSettings::default()).unwrap();

    let err = client.fetch(&server.form_url()).await.unwrap_err();
    assert!(err.to_string().contains("FB_PUBLIC_LOAD_DATA_"));
}
