//! Route pattern extraction utilities.

use actix_web::HttpRequest;

/// Label used for requests that matched no registered resource
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Route template for a request, e.g. `/api/advisory/{country_code}`.
///
/// Requests that match no resource share a single label.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_unregistered_path_is_unmatched() {
        let req = TestRequest::get().uri("/nowhere").to_http_request();
        assert_eq!(extract_route_pattern(&req), UNMATCHED_ROUTE);
    }
}
