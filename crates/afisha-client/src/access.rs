//! Admin allow-list.
//!
//! A comma-separated list of user ids and usernames. Membership only decides
//! whether the draft command is offered; it protects nothing.

/// The parsed admin allow-list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList {
    entries: Vec<String>,
}

impl AdminAllowList {
    /// Parses a comma-separated list, trimming entries and dropping blanks.
    pub fn parse(ids: &str) -> Self {
        Self {
            entries: ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Returns true if the user id or the username is listed.
    ///
    /// Matching is exact; a leading `@` on the username is ignored.
    pub fn allows(&self, identity: &Identity) -> bool {
        let by_id = identity
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .is_some_and(|id| self.contains(id));
        let by_name = identity
            .username
            .as_deref()
            .map(|name| name.trim().trim_start_matches('@'))
            .filter(|name| !name.is_empty())
            .is_some_and(|name| self.contains(name));
        by_id || by_name
    }

    fn contains(&self, value: &str) -> bool {
        self.entries.iter().any(|entry| entry == value)
    }
}

/// Who is running the client, as far as the allow-list is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Option<String>,
    pub username: Option<String>,
}

impl Identity {
    pub fn new(user_id: Option<String>, username: Option<String>) -> Self {
        Self { user_id, username }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_drops_blanks() {
        let list = AdminAllowList::parse(" 12345, alice ,,");
        assert_eq!(list.entries(), ["12345", "alice"]);
        assert!(AdminAllowList::parse("").is_empty());
        assert!(AdminAllowList::parse(" , ").is_empty());
    }

    #[test]
    fn matches_by_id_or_username() {
        let list = AdminAllowList::parse("12345,alice");
        assert!(list.allows(&Identity::new(Some("12345".into()), None)));
        assert!(list.allows(&Identity::new(None, Some("alice".into()))));
        assert!(list.allows(&Identity::new(None, Some("@alice".into()))));
        assert!(list.allows(&Identity::new(Some("1".into()), Some("alice".into()))));
    }

    #[test]
    fn rejects_unknown_and_anonymous() {
        let list = AdminAllowList::parse("12345,alice");
        assert!(!list.allows(&Identity::new(Some("123".into()), Some("bob".into()))));
        assert!(!list.allows(&Identity::default()));
        assert!(!list.allows(&Identity::new(Some(String::new()), Some(String::new()))));
        // exact match only
        assert!(!list.allows(&Identity::new(None, Some("Alice".into()))));
    }

    #[test]
    fn empty_list_allows_nobody() {
        let list = AdminAllowList::default();
        assert!(!list.allows(&Identity::new(Some("12345".into()), Some("alice".into()))));
    }
}
