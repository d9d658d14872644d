//! User-visible application state and its text rendering.

use std::fmt;

use reelscout_core::{SearchRecord, User};
use reelscout_search::Movie;

/// Authentication state of the application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Session bootstrap has not finished yet.
    #[default]
    Initializing,
    /// A session exists for this user.
    Authenticated(User),
    /// Degraded mode: catalog search only.
    Unauthenticated,
}

impl SessionState {
    /// Whether a session is currently established.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    /// Signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Snapshot of everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    /// Authentication state
    pub session: SessionState,
    /// A catalog query is in flight
    pub is_loading: bool,
    /// Inline error replacing the result list
    pub error_message: Option<String>,
    /// Results of the most recent applied query
    pub movies: Vec<Movie>,
    /// Most searched terms, only populated while authenticated
    pub trending: Vec<SearchRecord>,
    /// Dismissable authentication advisory
    pub advisory: Option<String>,
}

impl ViewState {
    /// Whether the blocking loading indicator should be shown.
    pub fn is_initializing(&self) -> bool {
        self.session == SessionState::Initializing
    }

    /// Advisory to display; hidden once a session exists.
    pub fn visible_advisory(&self) -> Option<&str> {
        if self.session.is_authenticated() {
            None
        } else {
            self.advisory.as_deref()
        }
    }

    /// Trending records to display; hidden without a session.
    pub fn visible_trending(&self) -> &[SearchRecord] {
        if self.session.is_authenticated() {
            &self.trending
        } else {
            &[]
        }
    }
}

fn write_movie(f: &mut fmt::Formatter<'_>, movie: &Movie) -> fmt::Result {
    let title = if movie.title.is_empty() {
        "Untitled"
    } else {
        movie.title.as_str()
    };
    write!(f, "  - {title}")?;

    if let Some(year) = movie.release_year() {
        write!(f, " ({year})")?;
    }
    match movie.vote_average {
        Some(rating) if rating > 0.0 => write!(f, " ★ {rating:.1}")?,
        _ => write!(f, " ★ N/A")?,
    }
    if let Some(language) = &movie.original_language {
        write!(f, " · {language}")?;
    }
    writeln!(f)
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_initializing() {
            return writeln!(f, "Connecting...");
        }

        if let Some(advisory) = self.visible_advisory() {
            writeln!(f, "Authentication Error")?;
            writeln!(f, "  {advisory}")?;
            writeln!(
                f,
                "  The app will work without authentication, but trending movies won't be available."
            )?;
            writeln!(f)?;
        }

        let trending = self.visible_trending();
        if !trending.is_empty() {
            writeln!(f, "Trending Movies")?;
            for (rank, record) in trending.iter().enumerate() {
                write!(f, "  {}. {}", rank + 1, record.search_term)?;
                if let Some(poster) = &record.poster_url {
                    write!(f, " [{poster}]")?;
                }
                writeln!(f)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "All Movies")?;
        if self.is_loading {
            writeln!(f, "  Loading...")
        } else if let Some(error) = &self.error_message {
            writeln!(f, "  {error}")
        } else if self.movies.is_empty() {
            writeln!(f, "  No movies found")
        } else {
            self.movies.iter().try_for_each(|movie| write_movie(f, movie))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "user-1".to_string(),
            name: "Tester".to_string(),
            email: "tester@example.com".to_string(),
        }
    }

    fn record(term: &str, count: u32) -> SearchRecord {
        SearchRecord {
            id: term.to_string(),
            search_term: term.to_string(),
            count,
            movie_id: 1,
            poster_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_initializing_renders_loading_indicator() {
        let view = ViewState::default();

        assert!(view.is_initializing());
        assert_eq!(view.to_string(), "Connecting...\n");
    }

    #[test]
    fn test_advisory_hidden_when_authenticated() {
        let mut view = ViewState {
            session: SessionState::Unauthenticated,
            advisory: Some("Login failed: Not authorized".to_string()),
            trending: vec![record("batman", 3)],
            ..Default::default()
        };

        assert_eq!(view.visible_advisory(), Some("Login failed: Not authorized"));
        assert!(view.visible_trending().is_empty());
        assert!(view.to_string().contains("Authentication Error"));

        view.session = SessionState::Authenticated(user());
        assert_eq!(view.visible_advisory(), None);
        assert_eq!(view.visible_trending().len(), 1);
    }

    #[test]
    fn test_render_results_and_trending() {
        let view = ViewState {
            session: SessionState::Authenticated(user()),
            movies: vec![Movie {
                id: 949,
                title: "Heat".to_string(),
                poster_path: None,
                release_date: Some("1995-12-15".to_string()),
                vote_average: Some(7.9),
                original_language: Some("en".to_string()),
            }],
            trending: vec![record("heat", 2), record("alien", 1)],
            ..Default::default()
        };

        let rendered = view.to_string();

        assert!(rendered.contains("Trending Movies\n  1. heat\n  2. alien\n"));
        assert!(rendered.contains("  - Heat (1995) ★ 7.9 · en\n"));
    }

    #[test]
    fn test_render_error_instead_of_results() {
        let view = ViewState {
            session: SessionState::Unauthenticated,
            error_message: Some("Error fetching movies: HTTP error! status: 500".to_string()),
            ..Default::default()
        };

        assert!(view.to_string().ends_with("All Movies\n  Error fetching movies: HTTP error! status: 500\n"));
    }
}
