use diesel::pg::PgConnection;
use diesel::QueryResult;
use inflections::Inflect;

use crate::modules::models::event::Event;

/// # turn an event name into a url slug
/// kebab-case, lowercased; a name without any usable characters falls
/// back to "event"
pub fn slugify(name: &str) -> String {
    let slug = name.to_kebab_case();

    if slug.is_empty() {
        return "event".to_string();
    }

    slug
}

/// # find a slug that no other event uses
/// starts from the plain slug of the name and counts upward:
/// `monaco`, `monaco-2`, `monaco-3`, ...
pub fn unique_slug(conn: &mut PgConnection, name: &str) -> QueryResult<String> {
    let base = slugify(name);

    if !Event::slug_exists(conn, &base)? {
        return Ok(base);
    }

    let mut counter = 2;
    loop {
        let candidate = format!("{}-{}", base, counter);
        if !Event::slug_exists(conn, &candidate)? {
            return Ok(candidate);
        }

        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_turn_into_kebab_case() {
        assert_eq!(slugify("TEST_New Event"), "test-new-event");
        assert_eq!(slugify("Monaco GP"), "monaco-gp");
        assert_eq!(slugify("qualifying"), "qualifying");
    }

    #[test]
    fn unusable_names_fall_back() {
        assert_eq!(slugify(""), "event");
    }
}
