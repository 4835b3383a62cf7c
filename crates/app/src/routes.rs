use chrono::Utc;
use tickboard_core::auth::Session;

/// Client-side routes. Thin glue between paths and screens; only the
/// dashboard is guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Register,
    Login,
    Main,
    NotFound,
}

pub fn resolve(path: &str) -> Route {
    match path {
        "" | "/" => Route::Landing,
        "/register" => Route::Register,
        "/login" => Route::Login,
        "/main" => Route::Main,
        _ => Route::NotFound,
    }
}

pub fn path(route: Route) -> &'static str {
    match route {
        Route::Landing => "/",
        Route::Register => "/register",
        Route::Login => "/login",
        Route::Main => "/main",
        Route::NotFound => "/not-found",
    }
}

/// The dashboard requires a live session; unauthenticated visits are
/// redirected to the login screen.
pub fn guard(route: Route, session: Option<&Session>) -> Route {
    match route {
        Route::Main => {
            let live = session.map(|s| !s.is_expired(Utc::now())).unwrap_or(false);
            if live {
                Route::Main
            } else {
                Route::Login
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in_secs: i64) -> Session {
        Session {
            email: "user@example.com".to_string(),
            local_id: "uid-1".to_string(),
            id_token: "token".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }

    #[test]
    fn resolves_known_paths() {
        assert_eq!(resolve("/"), Route::Landing);
        assert_eq!(resolve("/register"), Route::Register);
        assert_eq!(resolve("/login"), Route::Login);
        assert_eq!(resolve("/main"), Route::Main);
    }

    #[test]
    fn unknown_paths_hit_the_catch_all() {
        assert_eq!(resolve("/nope"), Route::NotFound);
        assert_eq!(resolve("/main/extra"), Route::NotFound);
    }

    #[test]
    fn guard_redirects_unauthenticated_dashboard_visits() {
        assert_eq!(guard(Route::Main, None), Route::Login);
        assert_eq!(guard(Route::Main, Some(&session(-10))), Route::Login);
        assert_eq!(guard(Route::Main, Some(&session(3600))), Route::Main);
    }

    #[test]
    fn guard_leaves_public_routes_alone() {
        assert_eq!(guard(Route::Landing, None), Route::Landing);
        assert_eq!(guard(Route::Login, None), Route::Login);
        assert_eq!(guard(Route::NotFound, None), Route::NotFound);
    }
}
