use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

/// Read the whole response body as text.
pub(crate) async fn body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).into_owned()
}

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&body_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&body_text(response).await)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// The trimmed text of the first element matching `selector`.
#[track_caller]
pub(crate) fn must_get_text(html: &Html, selector: &str) -> String {
    let parsed = Selector::parse(selector).expect("Invalid selector");

    html.select(&parsed)
        .next()
        .unwrap_or_else(|| panic!("No element found for {selector}"))
        .text()
        .collect::<String>()
        .trim()
        .to_owned()
}
