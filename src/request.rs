//! Framework request value: what a controller can see of the incoming HTTP request.

use axum::extract::Query;
use axum::http::{HeaderMap, Method, Uri};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone, Debug, Default)]
pub struct Request {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
    pub session: Option<Uuid>,
}

impl Request {
    /// Query parameters are decoded from `uri`; a malformed query string yields none.
    pub fn new(method: Method, uri: Uri) -> Self {
        let query = Query::<HashMap<String, String>>::try_from_uri(&uri)
            .map(|Query(q)| q)
            .unwrap_or_default();
        Request {
            method,
            uri,
            query,
            ..Request::default()
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_form(mut self, form: HashMap<String, String>) -> Self {
        self.form = form;
        self
    }

    pub fn with_session(mut self, session: Option<Uuid>) -> Self {
        self.session = session;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Form body value first, then query string.
    pub fn input(&self, key: &str) -> Option<&str> {
        self.form
            .get(key)
            .or_else(|| self.query.get(key))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parsed_from_uri() {
        let req = Request::new(Method::GET, "/users?page=2&q=a%20b".parse().unwrap());
        assert_eq!(req.input("page"), Some("2"));
        assert_eq!(req.input("q"), Some("a b"));
        assert_eq!(req.input("missing"), None);
    }

    #[test]
    fn test_form_wins_over_query() {
        let form = HashMap::from([("name".to_string(), "Mark".to_string())]);
        let req = Request::new(Method::POST, "/users/store?name=Bob".parse().unwrap()).with_form(form);
        assert_eq!(req.input("name"), Some("Mark"));
    }
}
