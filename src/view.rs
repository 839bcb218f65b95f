//! View files with variable interpolation: `{{ name }}` is HTML-escaped, `{{{ name }}}` is inserted raw.
//! Dotted names (`{{ user.name }}`) walk nested objects. Unknown names render as empty strings.

use crate::error::AppError;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::path::PathBuf;

const PLACEHOLDER: &str = r"\{\{\{\s*([A-Za-z0-9_.]+)\s*\}\}\}|\{\{\s*([A-Za-z0-9_.]+)\s*\}\}";
const EXTENSION: &str = "html";

pub struct Views {
    dir: PathBuf,
    placeholder: Regex,
}

impl Views {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let placeholder = Regex::new(PLACEHOLDER).map_err(|e| AppError::Template(e.to_string()))?;
        Ok(Views {
            dir: dir.into(),
            placeholder,
        })
    }

    /// File backing view `name` (e.g. "home/index"). None when a segment has characters
    /// outside `[A-Za-z0-9_-]`.
    pub fn path_for(&self, name: &str) -> Option<PathBuf> {
        let mut path = self.dir.clone();
        for segment in name.split('/') {
            let legal = !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
            if !legal {
                return None;
            }
            path.push(segment);
        }
        path.set_extension(EXTENSION);
        Some(path)
    }

    /// Load view `name` and interpolate `data` into it.
    pub async fn render(&self, name: &str, data: &Map<String, Value>) -> Result<String, AppError> {
        let path = self
            .path_for(name)
            .ok_or_else(|| AppError::ViewNotFound(self.dir.join(format!("{}.{}", name, EXTENSION))))?;
        let template = match tokio::fs::read_to_string(&path).await {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::ViewNotFound(path))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(self.interpolate(&template, data))
    }

    pub fn interpolate(&self, template: &str, data: &Map<String, Value>) -> String {
        self.placeholder
            .replace_all(template, |caps: &Captures| {
                if let Some(raw) = caps.get(1) {
                    lookup(data, raw.as_str()).map(value_text).unwrap_or_default()
                } else if let Some(name) = caps.get(2) {
                    lookup(data, name.as_str())
                        .map(|v| escape(&value_text(v)))
                        .unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .into_owned()
    }
}

fn lookup<'a>(data: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    let mut parts = name.split('.');
    let mut current = data.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

fn value_text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// HTML-escape `& < > " '`.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_interpolate_escapes_by_default() {
        let views = Views::new("views").unwrap();
        let out = views.interpolate(
            "<h1>{{ title }}</h1>{{{ html }}}",
            &data(json!({"title": "<Home & co>", "html": "<b>x</b>"})),
        );
        assert_eq!(out, "<h1>&lt;Home &amp; co&gt;</h1><b>x</b>");
    }

    #[test]
    fn test_interpolate_values_and_missing_keys() {
        let views = Views::new("views").unwrap();
        let out = views.interpolate(
            "{{id}}|{{ active }}|{{ missing }}|{{ none }}|{{ user.name }}",
            &data(json!({"id": 7, "active": true, "none": null, "user": {"name": "Mark"}})),
        );
        assert_eq!(out, "7|true|||Mark");
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let views = Views::new("/srv/views").unwrap();
        assert_eq!(
            views.path_for("home/index"),
            Some(PathBuf::from("/srv/views/home/index.html"))
        );
        assert_eq!(views.path_for("../secret"), None);
        assert_eq!(views.path_for("home//index"), None);
        assert_eq!(views.path_for("home/index.php"), None);
    }

    #[tokio::test]
    async fn test_render_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("home")).unwrap();
        std::fs::write(dir.path().join("home/index.html"), "Hello {{ name }}").unwrap();
        let views = Views::new(dir.path()).unwrap();
        let out = views.render("home/index", &data(json!({"name": "Mark"}))).await.unwrap();
        assert_eq!(out, "Hello Mark");
    }

    #[tokio::test]
    async fn test_render_missing_view() {
        let dir = tempfile::tempdir().unwrap();
        let views = Views::new(dir.path()).unwrap();
        match views.render("home/nope", &Map::new()).await {
            Err(AppError::ViewNotFound(p)) => assert_eq!(p, dir.path().join("home/nope.html")),
            other => panic!("expected ViewNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">'y'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#039;y&#039;&lt;/a&gt;");
    }
}
