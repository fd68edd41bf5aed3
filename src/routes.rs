/// The views reachable by path. Only the root shows the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Feed,
    NotFound(String),
}

impl Route {
    pub fn resolve(path: &str) -> Self {
        match path {
            "/" => Self::Feed,
            other => Self::NotFound(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_feed() {
        assert_eq!(Route::resolve("/"), Route::Feed);
    }

    #[test]
    fn test_everything_else_not_found() {
        assert_eq!(Route::resolve("/about"), Route::NotFound("/about".into()));
        assert_eq!(Route::resolve(""), Route::NotFound(String::new()));
        assert_eq!(Route::resolve("/?month=2024-07"), Route::NotFound("/?month=2024-07".into()));
    }
}
