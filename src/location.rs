//! Address-bar state: locations, the listing/detail parameters they carry, and history.
//!
//! The location is the single source of truth for what the views show. Views
//! never mutate search or page state directly; they compute a new location with
//! [`commit_search`] or [`commit_page`] and hand it to [`Navigator::commit`],
//! which re-enters the read path.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Origin relative locations are resolved against.
pub const APP_ORIGIN: &str = "http://mealscout.local/";
/// Landing page.
pub const HOME_PATH: &str = "/";
/// Listing view path.
pub const LISTING_PATH: &str = "/menu";
/// Detail view path.
pub const DETAIL_PATH: &str = "/recipe";
/// Search term parameter on the listing view.
pub const SEARCH_PARAM: &str = "s";
/// 1-based page parameter on the listing view.
pub const PAGE_PARAM: &str = "page";
/// Recipe name parameter on the detail view.
pub const NAME_PARAM: &str = "name";

/// Path plus query string, resolved against [`APP_ORIGIN`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location(Url);

impl Location {
    /// Parses `/menu?s=..`, `menu?page=2`, or an absolute URL.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        let origin = Url::parse(APP_ORIGIN)?;
        origin.join(input.trim()).map(Self)
    }

    /// Bare listing location.
    pub fn listing() -> Self {
        Self::at(LISTING_PATH)
    }

    /// Landing page location.
    pub fn home() -> Self {
        Self::at(HOME_PATH)
    }

    fn at(path: &str) -> Self {
        let mut url = Url::parse(APP_ORIGIN).expect("app origin is a valid url");
        url.set_path(path);
        Self(url)
    }

    /// Path component.
    pub fn path(&self) -> &str {
        self.0.path()
    }

    /// Decoded value of the first `key` parameter.
    pub fn param(&self, key: &str) -> Option<String> {
        self.0
            .query_pairs()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.into_owned())
    }

    /// Applies `set`-style updates: `Some` replaces the first occurrence in place
    /// (dropping later duplicates) or appends when missing, `None` removes every
    /// occurrence. Unrelated parameters keep their order.
    pub fn with_params(&self, updates: &[(&str, Option<&str>)]) -> Self {
        let mut written: HashSet<&str> = HashSet::new();
        let mut pairs: Vec<(String, String)> = Vec::new();

        for (name, value) in self.0.query_pairs() {
            match updates.iter().find(|(key, _)| *key == name) {
                None => pairs.push((name.into_owned(), value.into_owned())),
                Some((key, Some(replacement))) => {
                    if written.insert(*key) {
                        pairs.push((key.to_string(), replacement.to_string()));
                    }
                }
                Some((_, None)) => {}
            }
        }
        for (key, value) in updates {
            if let Some(value) = value {
                if written.insert(*key) {
                    pairs.push((key.to_string(), value.to_string()));
                }
            }
        }

        let mut url = self.0.clone();
        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }
        Self(url)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.path())?;
        if let Some(query) = self.0.query() {
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

impl FromStr for Location {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Search and page derived from a listing location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    /// Search term; empty means the full catalogue.
    pub term: String,
    /// Requested 1-based page before clamping to the result count.
    pub page: usize,
}

impl ListingState {
    /// Reads `s` and `page` from `location`.
    pub fn from_location(location: &Location) -> Self {
        Self {
            term: location.param(SEARCH_PARAM).unwrap_or_default(),
            page: parse_page(location.param(PAGE_PARAM).as_deref()),
        }
    }
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            term: String::new(),
            page: 1,
        }
    }
}

/// Parses a `page` value the way the browser's `parseInt` reads a prefix.
///
/// Absent, non-numeric, zero and negative values all map to `1`; digits that
/// overflow saturate so the later clamp lands on the last page.
pub fn parse_page(raw: Option<&str>) -> usize {
    let Some(raw) = raw else {
        return 1;
    };
    let raw = raw.trim_start();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let digits_end = raw
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(raw.len());
    let digits = &raw[..digits_end];
    if digits.is_empty() {
        return 1;
    }
    digits.parse::<usize>().unwrap_or(usize::MAX).max(1)
}

/// Location after submitting `term`: `s` set (or removed when empty), `page` reset to 1.
pub fn commit_search(current: &Location, term: &str) -> Location {
    let search = (!term.is_empty()).then_some(term);
    current.with_params(&[(SEARCH_PARAM, search), (PAGE_PARAM, Some("1"))])
}

/// Location after a page click; `s` is left untouched and `page` is at least 1.
pub fn commit_page(current: &Location, page: usize) -> Location {
    let page = page.max(1).to_string();
    current.with_params(&[(PAGE_PARAM, Some(page.as_str()))])
}

/// Detail location for a recipe display name.
pub fn recipe_location(name: &str) -> Location {
    Location::at(DETAIL_PATH).with_params(&[(NAME_PARAM, Some(name))])
}

/// Parameters of a detail location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailState {
    /// Name to look up; `None` when missing or empty.
    pub name: Option<String>,
}

impl DetailState {
    /// Reads `name` from `location`.
    pub fn from_location(location: &Location) -> Self {
        Self {
            name: location.param(NAME_PARAM).filter(|name| !name.is_empty()),
        }
    }
}

/// View selected by a location's path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Landing page.
    Home,
    /// Recipe listing.
    Listing(ListingState),
    /// Single recipe.
    Detail(DetailState),
    /// Unknown path.
    NotFound(String),
}

impl Route {
    /// Dispatches on the path, tolerating one trailing slash.
    pub fn from_location(location: &Location) -> Self {
        let path = location.path();
        let trimmed = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        match trimmed {
            HOME_PATH => Self::Home,
            LISTING_PATH => Self::Listing(ListingState::from_location(location)),
            DETAIL_PATH => Self::Detail(DetailState::from_location(location)),
            other => Self::NotFound(other.to_string()),
        }
    }
}

/// Linear browser-style history.
#[derive(Debug, Clone)]
pub struct Navigator {
    entries: Vec<Location>,
    cursor: usize,
}

impl Navigator {
    /// Starts a history at `start`.
    pub fn new(start: Location) -> Self {
        Self {
            entries: vec![start],
            cursor: 0,
        }
    }

    /// Location currently shown.
    pub fn current(&self) -> &Location {
        &self.entries[self.cursor]
    }

    /// Route for the current location.
    pub fn route(&self) -> Route {
        Route::from_location(self.current())
    }

    /// Pushes `location`, dropping any forward entries.
    pub fn commit(&mut self, location: Location) -> &Location {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(location);
        self.cursor = self.entries.len() - 1;
        self.current()
    }

    /// Commits the search submit for `term` from the current location.
    pub fn submit_search(&mut self, term: &str) -> &Location {
        let next = commit_search(self.current(), term);
        self.commit(next)
    }

    /// Commits a page change from the current location.
    pub fn go_to_page(&mut self, page: usize) -> &Location {
        let next = commit_page(self.current(), page);
        self.commit(next)
    }

    /// Commits the detail location for `name`.
    pub fn open_recipe(&mut self, name: &str) -> &Location {
        self.commit(recipe_location(name))
    }

    /// Steps back, if possible.
    pub fn back(&mut self) -> Option<&Location> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    /// Steps forward, if possible.
    pub fn forward(&mut self) -> Option<&Location> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(input: &str) -> Location {
        Location::parse(input).expect("valid location")
    }

    #[test]
    fn absent_parameters_default() {
        let state = ListingState::from_location(&loc("/menu"));
        assert_eq!(state, ListingState::default());
    }

    #[test]
    fn reads_search_and_page() {
        let state = ListingState::from_location(&loc("/menu?s=beef+stew&page=4"));
        assert_eq!(state.term, "beef stew");
        assert_eq!(state.page, 4);
    }

    #[test]
    fn malformed_page_falls_back_to_one() {
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(None), 1);
    }

    #[test]
    fn page_reads_numeric_prefix() {
        assert_eq!(parse_page(Some("2abc")), 2);
        assert_eq!(parse_page(Some(" 7")), 7);
        assert_eq!(parse_page(Some("99999999999999999999999")), usize::MAX);
    }

    #[test]
    fn search_submit_resets_page() {
        let next = commit_search(&loc("/menu?page=3"), "chicken");
        let state = ListingState::from_location(&next);
        assert_eq!(state.term, "chicken");
        assert_eq!(state.page, 1);
        assert_eq!(next.to_string(), "/menu?page=1&s=chicken");
    }

    #[test]
    fn empty_search_removes_parameter() {
        let next = commit_search(&loc("/menu?s=chicken&page=2"), "");
        assert_eq!(next.param(SEARCH_PARAM), None);
        assert_eq!(next.to_string(), "/menu?page=1");
    }

    #[test]
    fn page_commit_keeps_search_term() {
        let next = commit_page(&loc("/menu?s=pie&page=1"), 2);
        assert_eq!(next.to_string(), "/menu?s=pie&page=2");
    }

    #[test]
    fn page_commit_never_writes_zero() {
        let next = commit_page(&loc("/menu?s=pie"), 0);
        assert_eq!(next.to_string(), "/menu?s=pie&page=1");
    }

    #[test]
    fn duplicate_parameters_collapse_on_set() {
        let next = commit_page(&loc("/menu?page=1&s=a&page=9"), 3);
        assert_eq!(next.to_string(), "/menu?page=3&s=a");
    }

    #[test]
    fn recipe_location_encodes_name() {
        let location = recipe_location("Fish & Chips");
        assert_eq!(location.to_string(), "/recipe?name=Fish+%26+Chips");
        assert_eq!(
            DetailState::from_location(&location).name.as_deref(),
            Some("Fish & Chips")
        );
    }

    #[test]
    fn routes_by_path() {
        assert_eq!(Route::from_location(&loc("/")), Route::Home);
        assert!(matches!(
            Route::from_location(&loc("/menu/?page=2")),
            Route::Listing(ListingState { page: 2, .. })
        ));
        assert_eq!(
            Route::from_location(&loc("/recipe")),
            Route::Detail(DetailState { name: None })
        );
        assert_eq!(
            Route::from_location(&loc("/nope")),
            Route::NotFound("/nope".into())
        );
    }

    #[test]
    fn history_back_and_forward_reproduce_state() {
        let mut nav = Navigator::new(Location::listing());
        nav.submit_search("chicken");
        nav.go_to_page(2);
        assert_eq!(nav.current().to_string(), "/menu?s=chicken&page=2");

        let back = nav.back().expect("back").clone();
        assert_eq!(ListingState::from_location(&back).page, 1);
        nav.back().expect("back to start");
        assert!(nav.back().is_none());

        let forward = nav.forward().expect("forward").clone();
        assert_eq!(forward.to_string(), "/menu?s=chicken&page=1");

        nav.open_recipe("Chicken Handi");
        assert!(nav.forward().is_none(), "commit drops forward entries");
        assert!(matches!(nav.route(), Route::Detail(_)));
    }
}
