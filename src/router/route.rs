//! Request path → (controller, method, params).

use crate::case::controller_class;

pub const DEFAULT_CONTROLLER_KEY: &str = "home";
pub const DEFAULT_METHOD: &str = "index";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub controller_key: String,
    pub method: String,
    pub params: Vec<String>,
}

impl Route {
    /// Leading and trailing slashes are ignored; missing segments take the defaults.
    pub fn parse(path: &str) -> Self {
        let path = path.trim_matches('/');
        let segments: Vec<&str> = if path.is_empty() {
            Vec::new()
        } else {
            path.split('/').collect()
        };
        Route {
            controller_key: segments
                .first()
                .copied()
                .unwrap_or(DEFAULT_CONTROLLER_KEY)
                .to_string(),
            method: segments.get(1).copied().unwrap_or(DEFAULT_METHOD).to_string(),
            params: segments.iter().skip(2).map(|s| s.to_string()).collect(),
        }
    }

    pub fn controller_class(&self) -> String {
        controller_class(&self.controller_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn route(c: &str, m: &str, p: &[&str]) -> Route {
        Route {
            controller_key: c.to_string(),
            method: m.to_string(),
            params: p.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[rstest]
    #[case("", route("home", "index", &[]))]
    #[case("/", route("home", "index", &[]))]
    #[case("home/index", route("home", "index", &[]))]
    #[case("/users/", route("users", "index", &[]))]
    #[case("users/show/42", route("users", "show", &["42"]))]
    #[case("/users/edit/42/email/", route("users", "edit", &["42", "email"]))]
    #[case("home/bad method", route("home", "bad method", &[]))]
    #[case("users//5", route("users", "", &["5"]))]
    fn test_parse(#[case] path: &str, #[case] expected: Route) {
        assert_eq!(Route::parse(path), expected);
    }

    #[test]
    fn test_controller_class() {
        assert_eq!(Route::parse("").controller_class(), "HomeController");
        assert_eq!(Route::parse("user-profile/edit").controller_class(), "UserProfileController");
    }
}
