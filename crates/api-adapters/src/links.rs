//! Hyperlinks between resources.
//!
//! Relations are rendered as paths such as `/api/movie/the-matrix-1999/`.
//! Inputs naming a related object accept either the bare slug or such a
//! link, absolute or relative.

pub fn user(username: &str) -> String {
    format!("/api/user/{username}/")
}

pub fn movie(slug: &str) -> String {
    format!("/api/movie/{slug}/")
}

pub fn review(slug: &str) -> String {
    format!("/api/review/{slug}/")
}

pub fn comment(slug: &str) -> String {
    format!("/api/comment/{slug}/")
}

pub fn like(slug: &str) -> String {
    format!("/api/like/{slug}/")
}

/// Extracts the slug from a link to a `kind` resource. Anything that is not
/// such a link is returned trimmed, to be looked up as a slug.
pub fn slug_from(kind: &str, value: &str) -> String {
    let value = value.trim();
    let path = match value.find("/api/") {
        Some(start) => &value[start..],
        None => return value.to_string(),
    };
    let path = path.split(['?', '#']).next().unwrap_or(path);
    match path.strip_prefix(&format!("/api/{kind}/")) {
        Some(rest) if !rest.trim_end_matches('/').contains('/') => {
            rest.trim_end_matches('/').to_string()
        }
        _ => value.to_string(),
    }
}
