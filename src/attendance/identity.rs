use once_cell::sync::Lazy;
use regex::Regex;

use super::AttendanceError;
use crate::config::MatchPolicy;
use crate::roster::RosterEntry;

static TOKEN_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\p{P}\p{S}]+").expect("token separator regex is valid"));

/// Maps a meeting display name to its roster entry.
///
/// With [`MatchPolicy::Substring`] an entry matches when the display name
/// contains its id or its name anywhere, which tolerates client decorations
/// like `"2301 강정민 (guest)"`. [`MatchPolicy::Token`] only accepts whole
/// tokens, so `"김민"` no longer matches `"김민수"`. The first match in roster
/// order wins.
pub fn resolve_identity<'a>(
    roster: &'a [RosterEntry],
    display_name: &str,
    policy: MatchPolicy,
) -> Result<&'a RosterEntry, AttendanceError> {
    let matched = match policy {
        MatchPolicy::Substring => roster.iter().find(|entry| {
            (!entry.id.is_empty() && display_name.contains(&entry.id))
                || (!entry.name.is_empty() && display_name.contains(&entry.name))
        }),
        MatchPolicy::Token => {
            let tokens: Vec<&str> = TOKEN_SEPARATOR
                .split(display_name)
                .filter(|token| !token.is_empty())
                .collect();
            roster.iter().find(|entry| {
                tokens
                    .iter()
                    .any(|token| *token == entry.id || *token == entry.name)
            })
        }
    };

    matched.ok_or_else(|| AttendanceError::UnknownParticipant(display_name.to_string()))
}
