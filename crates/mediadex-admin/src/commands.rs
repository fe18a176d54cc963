//! Admin command parsing and the privileged-identity allowlist.

use std::collections::HashSet;

/// Identity allowlist gating privileged commands.
#[derive(Debug, Clone, Default)]
pub struct AdminList {
    ids: HashSet<i64>,
}

impl AdminList {
    /// Build an allowlist from explicit ids.
    pub fn from_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Read the allowlist from `ADMIN_IDS` (comma-separated user ids).
    /// Unparseable entries are skipped; an unset variable yields an empty
    /// list, which rejects everyone.
    pub fn from_env() -> Self {
        let ids = std::env::var("ADMIN_IDS")
            .map(|raw| {
                raw.split(',')
                    .filter_map(|part| part.trim().parse::<i64>().ok())
                    .collect()
            })
            .unwrap_or_default();
        Self { ids }
    }

    /// Add one more admin (used by the local ops console for its operator).
    pub fn with_admin(mut self, id: i64) -> Self {
        self.ids.insert(id);
        self
    }

    /// Whether the user may run privileged commands.
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.ids.contains(&user_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Auto-delete sub-commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoDeleteCommand {
    On,
    Off,
    Status,
}

/// One parsed administrative command.
///
/// Commands map 1:1 onto the federated index operations; `Confirm` is the
/// literal `yes` that releases an armed destructive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Status,
    Duplicates,
    Search { query: String },
    Pattern { pattern: String },
    Cleanup,
    Confirm,
    AutoDelete(AutoDeleteCommand),
    Help,
}

impl AdminCommand {
    /// Parse a command line; `None` for anything unrecognized or empty.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (trimmed, ""),
        };

        match head.to_lowercase().as_str() {
            "status" if rest.is_empty() => Some(Self::Status),
            "dupes" | "duplicates" if rest.is_empty() => Some(Self::Duplicates),
            "search" if !rest.is_empty() => Some(Self::Search {
                query: rest.to_string(),
            }),
            "pattern" if !rest.is_empty() => Some(Self::Pattern {
                pattern: rest.to_string(),
            }),
            "cleanup" if rest.is_empty() => Some(Self::Cleanup),
            "yes" if rest.is_empty() => Some(Self::Confirm),
            "autodelete" => match rest.to_lowercase().as_str() {
                "on" => Some(Self::AutoDelete(AutoDeleteCommand::On)),
                "off" => Some(Self::AutoDelete(AutoDeleteCommand::Off)),
                "status" | "" => Some(Self::AutoDelete(AutoDeleteCommand::Status)),
                _ => None,
            },
            "help" if rest.is_empty() => Some(Self::Help),
            _ => None,
        }
    }
}

/// Help text listing every command.
pub const HELP_TEXT: &str = "\
Commands:
  status              per-shard file counts
  dupes               report files present in both shards
  search <query>      ranked search (deduplicated)
  pattern <regex>     case-insensitive file-name pattern match
  cleanup             remove secondary-shard duplicates (asks to confirm)
  autodelete [on|off|status]
  help                this text";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_commands() {
        assert_eq!(AdminCommand::parse("status"), Some(AdminCommand::Status));
        assert_eq!(AdminCommand::parse(" dupes "), Some(AdminCommand::Duplicates));
        assert_eq!(
            AdminCommand::parse("duplicates"),
            Some(AdminCommand::Duplicates)
        );
        assert_eq!(AdminCommand::parse("cleanup"), Some(AdminCommand::Cleanup));
        assert_eq!(AdminCommand::parse("help"), Some(AdminCommand::Help));
        assert_eq!(AdminCommand::parse("YES"), Some(AdminCommand::Confirm));
    }

    #[test]
    fn test_parse_search_keeps_query_verbatim() {
        assert_eq!(
            AdminCommand::parse("search The Matrix 1080p"),
            Some(AdminCommand::Search {
                query: "The Matrix 1080p".to_string()
            })
        );
        // A query is required.
        assert_eq!(AdminCommand::parse("search"), None);
        assert_eq!(AdminCommand::parse("search   "), None);
    }

    #[test]
    fn test_parse_pattern() {
        assert_eq!(
            AdminCommand::parse(r"pattern \.mkv$"),
            Some(AdminCommand::Pattern {
                pattern: r"\.mkv$".to_string()
            })
        );
        assert_eq!(AdminCommand::parse("pattern"), None);
    }

    #[test]
    fn test_parse_autodelete() {
        assert_eq!(
            AdminCommand::parse("autodelete on"),
            Some(AdminCommand::AutoDelete(AutoDeleteCommand::On))
        );
        assert_eq!(
            AdminCommand::parse("autodelete off"),
            Some(AdminCommand::AutoDelete(AutoDeleteCommand::Off))
        );
        assert_eq!(
            AdminCommand::parse("autodelete"),
            Some(AdminCommand::AutoDelete(AutoDeleteCommand::Status))
        );
        assert_eq!(AdminCommand::parse("autodelete maybe"), None);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(AdminCommand::parse(""), None);
        assert_eq!(AdminCommand::parse("purge everything"), None);
        assert_eq!(AdminCommand::parse("status now"), None);
    }

    #[test]
    fn test_admin_list_membership() {
        let admins = AdminList::from_ids([7, 8]);
        assert!(admins.is_admin(7));
        assert!(!admins.is_admin(9));
        assert_eq!(admins.len(), 2);
    }

    #[test]
    fn test_admin_list_with_admin() {
        let admins = AdminList::default().with_admin(1);
        assert!(admins.is_admin(1));
        assert!(!AdminList::default().is_admin(1));
    }
}
