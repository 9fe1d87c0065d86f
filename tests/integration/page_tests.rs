//! Integration tests for page parsing and scope control
//!
//! These tests use wiremock to serve fixture pages, fetch them through the
//! transport adapter and check the assembled page end-to-end.

use webscope::config::ParserConfig;
use webscope::http::{build_http_client, fetch_response};
use webscope::parser::{Auditable, Page, Parser};
use webscope::scope::{Scope, ScopeDecision};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INDEX: &str = r#"<html>
<head>
    <meta http-equiv="Set-Cookie" content="http_equiv_cookie_name=http_equiv_cookie_val">
</head>
<body>
    <a href="/link?link_input=link_val">Link</a>

    <form method="post" action="/form" name="my_form">
        <input type="text" name="form_input_1" value="form_val_1">
        <input type="text" name="form_input_2" value="form_val_2">
        <input type="submit">
    </form>

    <form method="get" action="/form_2">
        <input type="text" name="form_2_input_1" value="form_2_val_1">
    </form>
</body>
</html>"#;

const WITH_BASE: &str = r#"<html>
<head><base href="/this_is_the_base/"></head>
<body><a href="link_with_base?link_input=link_val">Link</a></body>
</html>"#;

fn config() -> ParserConfig {
    ParserConfig::default()
        .with_cookie("name_from_cookiejar", "val_from_cookiejar")
        .unwrap()
}

/// Starts a mock server serving the fixture pages
async fn start_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .append_header("set-cookie", "cookie_input=cookie_val")
                .append_header("set-cookie", "cookie_input2=cookie_val2")
                .set_body_string(INDEX),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/with_base"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(WITH_BASE),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/binary"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/octet-stream")
                .set_body_bytes(vec![0u8, 159, 146, 150, b'<', b'a']),
        )
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_fetch_and_assemble_page() {
    let server = start_server().await;
    let base = server.uri();
    let url = format!("{}/?query_var_input=query_var_val", base);

    let config = config();
    let client = build_http_client("webscope-test/1.0").unwrap();
    let response = fetch_response(&client, &url, &config.cookies).await.unwrap();

    assert_eq!(response.url, url);
    assert_eq!(response.code, 200);

    let page = Page::from_response(&response, &config);

    assert_eq!(page.url(), url);
    assert_eq!(page.code(), 200);
    assert_eq!(page.method(), "get");
    assert_eq!(page.query_vars()["query_var_input"], "query_var_val");
    assert_eq!(page.body(), INDEX.as_bytes());

    // Extracted anchor plus the page's own query link
    assert_eq!(page.links().len(), 2);
    assert_eq!(
        page.links()[0].action(),
        format!("{}/link?link_input=link_val", base)
    );
    assert_eq!(page.links()[1].action(), url);
    assert_eq!(page.links()[1].auditable()["query_var_input"], "query_var_val");

    let form = &page.forms()[0];
    assert_eq!(form.action(), format!("{}/form", base));
    assert_eq!(form.url(), url);
    assert_eq!(form.method(), "post");
    assert_eq!(form.auditable().len(), 2);
    assert_eq!(form.raw.input.len(), 3);

    let form = &page.forms()[1];
    assert_eq!(form.action(), format!("{}/form_2", base));
    assert_eq!(form.auditable()["form_2_input_1"], "form_2_val_1");

    let names: Vec<&str> = page.cookies().iter().map(|c| c.name()).collect();
    assert_eq!(
        names,
        vec![
            "cookie_input",
            "cookie_input2",
            "http_equiv_cookie_name",
            "name_from_cookiejar"
        ]
    );
    assert!(page.cookies().iter().all(|c| c.method() == "cookie"));

    assert_eq!(page.cookiejar().len(), 4);
    assert_eq!(page.cookiejar()["name_from_cookiejar"], "val_from_cookiejar");

    assert_eq!(page.headers().len(), 8);

    let expected_paths: Vec<String> = ["link?link_input=link_val", "form", "form_2"]
        .iter()
        .map(|p| format!("{}/{}", base, p))
        .collect();
    assert_eq!(page.paths(), expected_paths.as_slice());
}

#[tokio::test]
async fn test_cookie_jar_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jar"))
        .and(header("cookie", "name_from_cookiejar=val_from_cookiejar"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;

    let config = config();
    let client = build_http_client("webscope-test/1.0").unwrap();
    let response = fetch_response(&client, &format!("{}/jar", server.uri()), &config.cookies)
        .await
        .unwrap();

    assert_eq!(response.code, 200);
}

#[tokio::test]
async fn test_page_with_base() {
    let server = start_server().await;
    let url = format!("{}/with_base", server.uri());
    let base = format!("{}/this_is_the_base/", server.uri());

    let config = config();
    let client = build_http_client("webscope-test/1.0").unwrap();
    let response = fetch_response(&client, &url, &config.cookies).await.unwrap();

    let parser = Parser::new(&response, &config);
    assert_eq!(parser.base().map(|b| b.to_string()), Some(base.clone()));
    assert_eq!(
        parser.to_absolute("relative/path").unwrap().to_string(),
        format!("{}relative/path", base)
    );

    let links = parser.links();
    assert_eq!(
        links[0].action(),
        format!("{}link_with_base?link_input=link_val", base)
    );
    assert_eq!(links[0].url(), url);

    let page = parser.run();
    assert_eq!(
        page.paths(),
        &[
            base.clone(),
            format!("{}link_with_base?link_input=link_val", base)
        ]
    );
}

#[tokio::test]
async fn test_binary_response_is_not_parsed() {
    let server = start_server().await;
    let url = format!("{}/binary", server.uri());

    let config = config();
    let client = build_http_client("webscope-test/1.0").unwrap();
    let response = fetch_response(&client, &url, &config.cookies).await.unwrap();

    let parser = Parser::new(&response, &config);
    assert!(!parser.is_text());

    let page = parser.run();
    assert!(page.links().is_empty());
    assert!(page.forms().is_empty());
    assert!(page.paths().is_empty());
    assert_eq!(page.cookies().len(), 1);
}

#[tokio::test]
async fn test_discovered_paths_through_scope() {
    let server = start_server().await;
    let url = format!("{}/?query_var_input=query_var_val", server.uri());

    let config = config().with_exclude("form_2").unwrap();
    let client = build_http_client("webscope-test/1.0").unwrap();
    let response = fetch_response(&client, &url, &config.cookies).await.unwrap();
    let page = Page::from_response(&response, &config);

    let scope = Scope::for_url(&config, page.url()).unwrap();
    let decisions: Vec<ScopeDecision> = page.paths().iter().map(|p| scope.decide(p)).collect();

    assert_eq!(
        decisions,
        vec![
            ScopeDecision::Follow,
            ScopeDecision::Follow,
            ScopeDecision::Excluded
        ]
    );
    assert_eq!(scope.decide("http://google.com/"), ScopeDecision::OutOfDomain);
}
