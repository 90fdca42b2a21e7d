use super::*;

#[test]
fn review_url_for_numeric_place() {
    let url = review_url("https://m.place.naver.com", "1688300738").unwrap();
    assert_eq!(
        url,
        "https://m.place.naver.com/restaurant/1688300738/review/visitor?reviewSort=recent"
    );
}

#[test]
fn review_url_strips_trailing_slash() {
    let url = review_url("http://127.0.0.1:8080/", "42").unwrap();
    assert_eq!(
        url,
        "http://127.0.0.1:8080/restaurant/42/review/visitor?reviewSort=recent"
    );
}

#[test]
fn review_url_rejects_empty_place_id() {
    let err = review_url("https://m.place.naver.com", "").unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidPlaceId { .. }),
        "expected InvalidPlaceId, got: {err:?}"
    );
}

#[test]
fn review_url_rejects_multi_segment_place_id() {
    for bad in ["12/34", "12?x=1", "12#frag", "12 34", "..", "%2F"] {
        let err = review_url("https://m.place.naver.com", bad).unwrap_err();
        assert!(
            matches!(err, ScraperError::InvalidPlaceId { ref place_id, .. } if place_id == bad),
            "expected InvalidPlaceId for {bad:?}, got: {err:?}"
        );
    }
}

#[test]
fn review_url_rejects_unparseable_base() {
    let err = review_url("not a url", "42").unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidUrl { .. }),
        "expected InvalidUrl, got: {err:?}"
    );
}

#[test]
fn client_review_url_uses_configured_base() {
    let client = ReviewPageClient::new("http://localhost:9/", 5, "revcount-test/0.1").unwrap();
    assert_eq!(client.base_url(), "http://localhost:9");
    assert_eq!(
        client.review_url("7").unwrap(),
        "http://localhost:9/restaurant/7/review/visitor?reviewSort=recent"
    );
}
