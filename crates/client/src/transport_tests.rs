use super::*;

#[test]
fn success_covers_the_2xx_range() {
    for status in [200, 201, 204, 299] {
        let response = HttpResponse {
            status,
            body: String::new(),
        };
        assert!(response.is_success(), "{status} should be success");
    }
    for status in [199, 301, 404, 429, 500] {
        let response = HttpResponse {
            status,
            body: String::new(),
        };
        assert!(!response.is_success(), "{status} should not be success");
    }
}

#[test]
fn json_decodes_body() {
    let response = HttpResponse {
        status: 200,
        body: r#"{"url": "https://example.test/x"}"#.to_string(),
    };
    let value: serde_json::Value = response.json().unwrap();
    assert_eq!(value["url"], "https://example.test/x");
}

/// Env mutation, so default and override live in one test.
#[test]
fn timeout_env_override() {
    std::env::remove_var("AQUEDUCT_TIMEOUT_MS");
    assert_eq!(request_timeout(), Duration::from_secs(30));

    std::env::set_var("AQUEDUCT_TIMEOUT_MS", "2500");
    assert_eq!(request_timeout(), Duration::from_millis(2500));

    // unparseable values fall back to the default
    std::env::set_var("AQUEDUCT_TIMEOUT_MS", "soon");
    assert_eq!(request_timeout(), Duration::from_secs(30));

    std::env::remove_var("AQUEDUCT_TIMEOUT_MS");
}
