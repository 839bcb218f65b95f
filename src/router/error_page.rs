//! HTML error pages for dispatch failures.

use crate::response::Response;
use crate::view::{escape, Views};
use axum::http::StatusCode;
use serde_json::{Map, Value};

const TEMPLATE: &str = "errors/_template";

pub struct ErrorPage {
    pub status: StatusCode,
    pub title: String,
    pub message: String,
    /// Internal detail; shown only when `debug` is on.
    pub details: Option<String>,
    pub home_url: String,
    pub request_uri: String,
}

impl ErrorPage {
    fn accent(&self) -> &'static str {
        match self.status.as_u16() {
            400..=403 => "#fbbf24",
            404 => "#60a5fa",
            _ => "#f87171",
        }
    }

    fn visible_details(&self, debug: bool) -> Option<&str> {
        self.details.as_deref().filter(|d| debug && !d.is_empty())
    }

    /// Render `errors/<code>`, else `errors/_template`, else a plain-text fallback.
    pub async fn render(&self, views: &Views, debug: bool) -> Response {
        let data = self.template_data(debug);
        let code_view = format!("errors/{}", self.status.as_u16());
        for name in [code_view.as_str(), TEMPLATE] {
            match views.render(name, &data).await {
                Ok(body) => return Response::html(self.status, body),
                Err(crate::error::AppError::ViewNotFound(_)) => continue,
                Err(e) => {
                    tracing::warn!(view = %name, error = %e, "error page template failed");
                    break;
                }
            }
        }
        Response::html(self.status, self.fallback_body(debug))
    }

    fn template_data(&self, debug: bool) -> Map<String, Value> {
        let details = self
            .visible_details(debug)
            .map(|d| {
                format!(
                    "<details><summary>Technical details (debug)</summary><pre>{}</pre></details>",
                    escape(d)
                )
            })
            .unwrap_or_default();
        let mut data = Map::new();
        data.insert("code".into(), Value::from(self.status.as_u16()));
        data.insert("title".into(), Value::from(self.title.as_str()));
        data.insert("message".into(), Value::from(self.message.as_str()));
        data.insert("home_url".into(), Value::from(self.home_url.as_str()));
        data.insert("request_uri".into(), Value::from(self.request_uri.as_str()));
        data.insert("accent".into(), Value::from(self.accent()));
        data.insert(
            "time".into(),
            Value::from(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
        );
        data.insert("details".into(), Value::from(details));
        data
    }

    fn fallback_body(&self, debug: bool) -> String {
        let mut body = format!(
            "{} {} - {}",
            self.status.as_u16(),
            escape(&self.title),
            escape(&self.message)
        );
        if let Some(d) = self.visible_details(debug) {
            body.push_str(&format!("<pre>{}</pre>", escape(d)));
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> ErrorPage {
        ErrorPage {
            status: StatusCode::NOT_FOUND,
            title: "Not Found".into(),
            message: "The page you requested could not be found.".into(),
            details: Some("Missing controller: <Nope>Controller".into()),
            home_url: "/shop/".into(),
            request_uri: "/shop/nope".into(),
        }
    }

    #[tokio::test]
    async fn test_fallback_hides_details_without_debug() {
        let dir = tempfile::tempdir().unwrap();
        let views = Views::new(dir.path()).unwrap();
        let r = page().render(&views, false).await;
        assert_eq!(r.status, StatusCode::NOT_FOUND);
        assert_eq!(r.body, "404 Not Found - The page you requested could not be found.");
    }

    #[tokio::test]
    async fn test_fallback_shows_escaped_details_in_debug() {
        let dir = tempfile::tempdir().unwrap();
        let views = Views::new(dir.path()).unwrap();
        let r = page().render(&views, true).await;
        assert!(r.body.ends_with("<pre>Missing controller: &lt;Nope&gt;Controller</pre>"));
    }

    #[tokio::test]
    async fn test_code_view_preferred_over_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("errors")).unwrap();
        std::fs::write(dir.path().join("errors/_template.html"), "generic {{ code }}").unwrap();
        let views = Views::new(dir.path()).unwrap();
        assert_eq!(page().render(&views, false).await.body, "generic 404");

        std::fs::write(
            dir.path().join("errors/404.html"),
            "{{ title }} {{ home_url }}{{{ details }}}",
        )
        .unwrap();
        assert_eq!(page().render(&views, false).await.body, "Not Found /shop/");
        let debug_body = page().render(&views, true).await.body;
        assert!(debug_body.contains("<details><summary>Technical details (debug)</summary>"));
        assert!(debug_body.contains("&lt;Nope&gt;"));
    }
}
