//! Case conversion for routing: URL controller keys to controller class names.

/// Suffix appended to every controller class name.
pub const CONTROLLER_SUFFIX: &str = "Controller";

/// Class used when the URL omits the controller or names it with illegal characters.
pub const DEFAULT_CONTROLLER: &str = "HomeController";

/// Uppercase the first character of each space-separated word, leaving the rest unchanged.
/// e.g. "user profile" -> "User Profile"
pub fn title_case_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = true;
    for c in s.chars() {
        if c == ' ' {
            capitalize_next = true;
            out.push(c);
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a URL segment to a controller class name.
/// e.g. "users" -> "UsersController", "user-profile" -> "UserProfileController".
/// Segments with characters outside `[A-Za-z0-9_-]` map to [`DEFAULT_CONTROLLER`].
pub fn controller_class(segment: &str) -> String {
    let segment = segment.trim();
    let legal = !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if !legal {
        return DEFAULT_CONTROLLER.to_string();
    }
    let spaced = segment.to_lowercase().replace(['-', '_'], " ");
    let mut name: String = title_case_words(&spaced).split(' ').collect();
    name.push_str(CONTROLLER_SUFFIX);
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("home", "HomeController")]
    #[case("users", "UsersController")]
    #[case("USERS", "UsersController")]
    #[case("user-profile", "UserProfileController")]
    #[case("user_profile", "UserProfileController")]
    #[case("API_keys", "ApiKeysController")]
    #[case("a--b", "ABController")]
    #[case("v2", "V2Controller")]
    #[case(" users ", "UsersController")]
    fn test_controller_class(#[case] segment: &str, #[case] expected: &str) {
        assert_eq!(controller_class(segment), expected);
    }

    #[rstest]
    #[case("user.profile")]
    #[case("users%20x")]
    #[case("")]
    #[case("../etc")]
    fn test_illegal_segments_fall_back(#[case] segment: &str) {
        assert_eq!(controller_class(segment), DEFAULT_CONTROLLER);
    }

    #[test]
    fn test_title_case_words() {
        assert_eq!(title_case_words("user profile page"), "User Profile Page");
        assert_eq!(title_case_words("x  y"), "X  Y");
    }
}
