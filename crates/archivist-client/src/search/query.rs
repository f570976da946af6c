//! Search mini-language
//!
//! `in:#channel` and `from:@user` narrow a search, `before:` / `after:` take
//! a `YYYY-MM-DD` date, everything else is free text.

use std::sync::LazyLock;

use archivist_protocol::{Channel, SearchForm, User};
use chrono::NaiveDate;
use regex::Regex;

pub const CHANNEL_PREFIX: &str = "in:#";
pub const USER_PREFIX: &str = "from:@";

static CHANNEL_FILTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"in:#(\S+)").unwrap());
static USER_FILTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"from:@(\S+)").unwrap());
static BEFORE_FILTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)before:(\S+)").unwrap());
static AFTER_FILTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)after:(\S+)").unwrap());

/// Channel and user lists that filter names are resolved against
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog<'a> {
    pub channels: &'a [Channel],
    pub users: &'a [User],
}

impl<'a> Catalog<'a> {
    pub fn new(channels: &'a [Channel], users: &'a [User]) -> Self {
        Self { channels, users }
    }
}

/// Parsed search request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub query_text: String,
    pub channel_id: Option<String>,
    pub user_id: Option<String>,
    pub before_date: Option<NaiveDate>,
    pub after_date: Option<NaiveDate>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.query_text.is_empty()
            && self.channel_id.is_none()
            && self.user_id.is_none()
            && self.before_date.is_none()
            && self.after_date.is_none()
    }

    pub fn to_form(&self) -> SearchForm {
        SearchForm {
            query: self.query_text.clone(),
            channel_id: self.channel_id.clone(),
            user_id: self.user_id.clone(),
            before: self.before_date,
            after: self.after_date,
        }
    }
}

/// Which user field a `from:@` fragment matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Name,
    RealName,
    DisplayName,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Suggestion {
    Channel {
        id: String,
        name: String,
    },
    User {
        id: String,
        name: String,
        /// Shown next to the handle
        display_name: Option<String>,
        matched: UserField,
    },
}

impl Suggestion {
    pub fn id(&self) -> &str {
        match self {
            Suggestion::Channel { id, .. } | Suggestion::User { id, .. } => id,
        }
    }

    /// The filter token this suggestion completes to
    pub fn token(&self) -> String {
        match self {
            Suggestion::Channel { name, .. } => format!("{}{}", CHANNEL_PREFIX, name),
            Suggestion::User { name, .. } => format!("{}{}", USER_PREFIX, name),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Suggestion::Channel { name, .. } => format!("#{}", name),
            Suggestion::User { name, .. } => format!("@{}", name),
        }
    }
}

/// The token under the caret: everything after the last whitespace
pub fn trailing_token(input: &str) -> &str {
    input
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
}

fn user_match(user: &User, term: &str) -> Option<UserField> {
    let contains = |field: &str| !field.is_empty() && field.to_lowercase().contains(term);
    if user.name.to_lowercase().contains(term) {
        Some(UserField::Name)
    } else if contains(&user.real_name) {
        Some(UserField::RealName)
    } else if contains(&user.display_name) {
        Some(UserField::DisplayName)
    } else {
        None
    }
}

/// Suggestions for the trailing token, in catalog order
pub fn suggest(input: &str, catalog: Catalog<'_>) -> Vec<Suggestion> {
    let token = trailing_token(input);

    if let Some(fragment) = token.strip_prefix(CHANNEL_PREFIX) {
        let term = fragment.to_lowercase();
        return catalog
            .channels
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&term))
            .map(|c| Suggestion::Channel {
                id: c.id.clone(),
                name: c.name.clone(),
            })
            .collect();
    }

    if let Some(fragment) = token.strip_prefix(USER_PREFIX) {
        let term = fragment.to_lowercase();
        return catalog
            .users
            .iter()
            .filter_map(|u| {
                let matched = user_match(u, &term)?;
                let display_name = [&u.display_name, &u.real_name]
                    .into_iter()
                    .find(|s| !s.is_empty())
                    .cloned();
                Some(Suggestion::User {
                    id: u.id.clone(),
                    name: u.name.clone(),
                    display_name,
                    matched,
                })
            })
            .collect();
    }

    Vec::new()
}

/// Replace the trailing token with the suggestion's filter token.
/// The result ends with a space so typing continues with a new token.
pub fn complete(input: &str, suggestion: &Suggestion) -> String {
    let keep = input.len() - trailing_token(input).len();
    format!("{}{} ", &input[..keep], suggestion.token())
}

/// Remove the first match of `re` from `text`, returning its capture
fn take_first(text: &mut String, re: &Regex) -> Option<String> {
    let caps = re.captures(text)?;
    let whole = caps.get(0)?.range();
    let value = caps.get(1)?.as_str().to_string();
    text.replace_range(whole, " ");
    Some(value)
}

/// Like [`take_first`] but only consumes a token whose value is a date
fn take_date(text: &mut String, re: &Regex) -> Option<NaiveDate> {
    let (range, date) = re.captures_iter(text).find_map(|caps| {
        let date = NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%Y-%m-%d").ok()?;
        Some((caps.get(0)?.range(), date))
    })?;
    text.replace_range(range, " ");
    Some(date)
}

/// Parse a submitted query.
///
/// Only the first `in:#` and the first `from:@` anywhere in the input are
/// used, unlike suggestions which look at the trailing token only. A filter
/// naming nothing in the catalog resolves to `None` but is still removed
/// from the free text.
pub fn parse(input: &str, catalog: Catalog<'_>) -> SearchFilters {
    let mut rest = input.to_string();

    let channel_name = take_first(&mut rest, &CHANNEL_FILTER);
    let user_name = take_first(&mut rest, &USER_FILTER);
    let before_date = take_date(&mut rest, &BEFORE_FILTER);
    let after_date = take_date(&mut rest, &AFTER_FILTER);

    let channel_id = channel_name.and_then(|name| {
        catalog
            .channels
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id.clone())
    });

    let user_id = user_name.and_then(|name| {
        catalog
            .users
            .iter()
            .find(|u| u.name == name || u.real_name == name || u.display_name == name)
            .map(|u| u.id.clone())
    });

    SearchFilters {
        query_text: rest.split_whitespace().collect::<Vec<_>>().join(" "),
        channel_id,
        user_id,
        before_date,
        after_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{channel, user};

    fn channels() -> Vec<Channel> {
        vec![
            channel("c1", "general"),
            channel("c2", "genomics"),
            channel("c3", "random"),
        ]
    }

    fn users() -> Vec<User> {
        let mut bob = user("u2", "bob");
        bob.real_name = "Robert Alison".to_string();
        bob.display_name = "Bobby".to_string();
        vec![user("u1", "alice"), bob]
    }

    #[test]
    fn test_parse_resolves_both_filters() {
        let (channels, users) = (channels(), users());
        let filters = parse(
            "in:#general from:@alice hello world",
            Catalog::new(&channels, &users),
        );
        assert_eq!(filters.query_text, "hello world");
        assert_eq!(filters.channel_id.as_deref(), Some("c1"));
        assert_eq!(filters.user_id.as_deref(), Some("u1"));
        assert_eq!(filters.before_date, None);
        assert_eq!(filters.after_date, None);
    }

    #[test]
    fn test_parse_strips_unresolved_filter() {
        let (channels, users) = (channels(), users());
        let filters = parse("in:#nosuch hello", Catalog::new(&channels, &users));
        assert_eq!(filters.query_text, "hello");
        assert_eq!(filters.channel_id, None);
    }

    #[test]
    fn test_parse_uses_first_occurrence_only() {
        let (channels, users) = (channels(), users());
        let filters = parse(
            "a in:#random b in:#general c",
            Catalog::new(&channels, &users),
        );
        assert_eq!(filters.channel_id.as_deref(), Some("c3"));
        assert_eq!(filters.query_text, "a b in:#general c");
    }

    #[test]
    fn test_parse_matches_filter_anywhere_in_input() {
        let (channels, users) = (channels(), users());
        let filters = parse("deploy from:@Bobby", Catalog::new(&channels, &users));
        assert_eq!(filters.user_id.as_deref(), Some("u2"));
        assert_eq!(filters.query_text, "deploy");

        let filters = parse("from:@Robert", Catalog::new(&channels, &users));
        assert_eq!(filters.user_id, None, "resolution is exact, not substring");
    }

    #[test]
    fn test_parse_is_case_sensitive_on_resolution() {
        let (channels, users) = (channels(), users());
        let filters = parse("in:#General", Catalog::new(&channels, &users));
        assert_eq!(filters.channel_id, None);
        assert_eq!(filters.query_text, "");
    }

    #[test]
    fn test_parse_collapses_whitespace() {
        let filters = parse("  hello   big\tworld  ", Catalog::default());
        assert_eq!(filters.query_text, "hello big world");
    }

    #[test]
    fn test_parse_dates() {
        let filters = parse(
            "release after:2024-01-01 notes before:2024-02-29",
            Catalog::default(),
        );
        assert_eq!(filters.query_text, "release notes");
        assert_eq!(filters.after_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filters.before_date, NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn test_invalid_date_stays_free_text() {
        let filters = parse("before:lunch before:2023-02-30", Catalog::default());
        assert_eq!(filters.before_date, None);
        assert_eq!(filters.query_text, "before:lunch before:2023-02-30");
    }

    #[test]
    fn test_empty_filters() {
        assert!(parse("   ", Catalog::default()).is_empty());
        assert!(!parse("in:#nosuch x", Catalog::default()).is_empty());
        assert!(parse("in:#nosuch", Catalog::default()).is_empty());
    }

    #[test]
    fn test_suggest_channels_in_catalog_order() {
        let (channels, users) = (channels(), users());
        let suggestions = suggest("in:#gen", Catalog::new(&channels, &users));
        let names: Vec<_> = suggestions.iter().map(|s| s.label()).collect();
        assert_eq!(names, vec!["#general", "#genomics"]);
    }

    #[test]
    fn test_suggest_is_case_insensitive() {
        let (channels, users) = (channels(), users());
        let suggestions = suggest("in:#GEN", Catalog::new(&channels, &users));
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn test_suggest_only_looks_at_trailing_token() {
        let (channels, users) = (channels(), users());
        assert!(suggest("in:#gen hello", Catalog::new(&channels, &users)).is_empty());
        assert!(suggest("in:#gen ", Catalog::new(&channels, &users)).is_empty());
        assert_eq!(
            suggest("hello in:#ran", Catalog::new(&channels, &users)).len(),
            1
        );
    }

    #[test]
    fn test_suggest_users_reports_first_matching_field() {
        let (channels, users) = (channels(), users());
        let suggestions = suggest("from:@ali", Catalog::new(&channels, &users));
        assert_eq!(suggestions.len(), 2);
        assert!(matches!(
            &suggestions[0],
            Suggestion::User { id, matched: UserField::Name, .. } if id == "u1"
        ));
        assert!(matches!(
            &suggestions[1],
            Suggestion::User { id, matched: UserField::RealName, display_name: Some(d), .. }
                if id == "u2" && d == "Bobby"
        ));

        let suggestions = suggest("from:@bobby", Catalog::new(&channels, &users));
        assert!(matches!(
            &suggestions[0],
            Suggestion::User { matched: UserField::DisplayName, .. }
        ));
    }

    #[test]
    fn test_suggest_empty_fragment_lists_everything() {
        let (channels, users) = (channels(), users());
        assert_eq!(suggest("in:#", Catalog::new(&channels, &users)).len(), 3);
        assert_eq!(suggest("from:@", Catalog::new(&channels, &users)).len(), 2);
    }

    #[test]
    fn test_complete_replaces_trailing_token() {
        let suggestion = Suggestion::Channel {
            id: "c1".to_string(),
            name: "general".to_string(),
        };
        assert_eq!(complete("hello in:#gen", &suggestion), "hello in:#general ");
        assert_eq!(complete("in:#g", &suggestion), "in:#general ");
    }
}
