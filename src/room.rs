//! Room identity resolution.
//!
//! A chat room is identified by a [`RoomId`], derived one of two ways:
//!
//! - **Explicit** — the current URL path ends in `/chat/<token>` (token
//!   charset `[A-Za-z0-9_-]`, optional trailing slash). The token is the
//!   room id, verbatim.
//! - **Implicit** — a direct conversation between two participants. The two
//!   participant ids are sorted lexicographically and joined with `_`, so
//!   both sides derive the identical id regardless of argument order.
//!
//! The explicit form always wins; if neither applies, no room can be
//! resolved and the manager stays idle.
//!
//! Resolution is a pure function of its inputs. Callers pass the current
//! path and participant identities in explicitly — this module never reads
//! ambient router or session state.

use std::fmt;

/// Canonical identifier for one chat room.
///
/// Wraps the string key the backend routes on: either an explicit room
/// token from a URL, or the sorted `a_b` pairing of two participant ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// Wrap an already-derived room identifier.
    ///
    /// Prefer [`resolve_room_id`] when deriving from routing inputs; this
    /// constructor exists for callers that obtain a room id out of band
    /// (e.g. a room code shared via invite link).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Resolve the active room id from the current path and participant pairing.
///
/// The explicit `/chat/<token>` path form short-circuits the implicit
/// derivation: if the path carries a room token, that token is returned even
/// when both participant ids are absent. Otherwise both `my_id` and
/// `partner_id` must be present and non-empty, and the implicit id is their
/// lexicographically sorted pair joined with `_`.
///
/// Returns `None` when no room can be resolved.
///
/// # Examples
///
/// ```
/// use chatroom_client::room::{resolve_room_id, RoomId};
///
/// // Explicit room token in the path wins.
/// let id = resolve_room_id("/chat/sala1208", None, None);
/// assert_eq!(id, Some(RoomId::from("sala1208")));
///
/// // Implicit pairing is symmetric.
/// let id = resolve_room_id("/chat", Some("zelda"), Some("alice"));
/// assert_eq!(id, Some(RoomId::from("alice_zelda")));
/// ```
pub fn resolve_room_id(path: &str, my_id: Option<&str>, partner_id: Option<&str>) -> Option<RoomId> {
    if let Some(token) = explicit_room_token(path) {
        return Some(RoomId(token.to_string()));
    }

    match (my_id, partner_id) {
        (Some(me), Some(partner)) if !me.is_empty() && !partner.is_empty() => {
            let (a, b) = if me <= partner {
                (me, partner)
            } else {
                (partner, me)
            };
            Some(RoomId(format!("{a}_{b}")))
        }
        _ => None,
    }
}

/// Extract an explicit room token from a path ending in `/chat/<token>`.
///
/// The token must be non-empty and drawn from `[A-Za-z0-9_-]`; one trailing
/// slash is tolerated. The `/chat/` segment may appear anywhere as long as
/// it is the second-to-last segment (`/app/chat/r1` matches, `/chatter/r1`
/// does not).
fn explicit_room_token(path: &str) -> Option<&str> {
    let path = path.strip_suffix('/').unwrap_or(path);
    let (prefix, token) = path.rsplit_once('/')?;
    if !(prefix == "/chat" || prefix.ends_with("/chat")) {
        return None;
    }
    if token.is_empty() || !token.bytes().all(is_token_byte) {
        return None;
    }
    Some(token)
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Build the transport endpoint for a room.
///
/// The address template is fixed apart from the identifier segment:
/// `<scheme>://<host>/ws/chat/<room>/`. The scheme mirrors the page's
/// transport security — a secure page gets `wss`, an insecure one `ws`.
pub fn room_endpoint(host: &str, secure: bool, room: &RoomId) -> String {
    let scheme = if secure { "wss" } else { "ws" };
    format!("{scheme}://{host}/ws/chat/{room}/")
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    #[test]
    fn explicit_token_wins_over_pairing() {
        let id = resolve_room_id("/chat/sala1208", Some("u1"), Some("u2"));
        assert_eq!(id, Some(RoomId::from("sala1208")));
    }

    #[test]
    fn explicit_token_resolves_without_participants() {
        let id = resolve_room_id("/chat/room-42_x", None, None);
        assert_eq!(id, Some(RoomId::from("room-42_x")));
    }

    #[test]
    fn explicit_token_tolerates_trailing_slash() {
        let id = resolve_room_id("/chat/sala1208/", None, None);
        assert_eq!(id, Some(RoomId::from("sala1208")));
    }

    #[test]
    fn explicit_token_matches_nested_path() {
        let id = resolve_room_id("/app/chat/r1", None, None);
        assert_eq!(id, Some(RoomId::from("r1")));
    }

    #[test]
    fn chat_segment_must_be_its_own_segment() {
        // "/livechat/r1" must not count as "/chat/r1".
        assert_eq!(resolve_room_id("/livechat/r1", None, None), None);
        assert_eq!(resolve_room_id("/chatter/r1", None, None), None);
    }

    #[test]
    fn invalid_token_characters_do_not_match() {
        assert_eq!(resolve_room_id("/chat/sala 1208", None, None), None);
        assert_eq!(resolve_room_id("/chat/sala!", None, None), None);
        // An invalid explicit token falls through to the implicit form.
        let id = resolve_room_id("/chat/sala!", Some("a"), Some("b"));
        assert_eq!(id, Some(RoomId::from("a_b")));
    }

    #[test]
    fn bare_chat_path_has_no_token() {
        assert_eq!(resolve_room_id("/chat", None, None), None);
        assert_eq!(resolve_room_id("/chat/", None, None), None);
    }

    #[test]
    fn implicit_pairing_is_symmetric() {
        let ab = resolve_room_id("/chat", Some("zelda"), Some("alice"));
        let ba = resolve_room_id("/chat", Some("alice"), Some("zelda"));
        assert_eq!(ab, ba);
        assert_eq!(ab, Some(RoomId::from("alice_zelda")));
    }

    #[test]
    fn missing_participant_yields_none() {
        assert_eq!(resolve_room_id("/chat", Some("a"), None), None);
        assert_eq!(resolve_room_id("/chat", None, Some("b")), None);
        assert_eq!(resolve_room_id("/chat", None, None), None);
    }

    #[test]
    fn empty_participant_yields_none() {
        assert_eq!(resolve_room_id("/chat", Some(""), Some("b")), None);
        assert_eq!(resolve_room_id("/chat", Some("a"), Some("")), None);
    }

    #[test]
    fn resolution_is_referentially_stable() {
        let first = resolve_room_id("/chat", Some("u1"), Some("u2"));
        let second = resolve_room_id("/chat", Some("u1"), Some("u2"));
        assert_eq!(first, second);
    }

    #[test]
    fn endpoint_mirrors_page_security() {
        let room = RoomId::from("alice_zelda");
        assert_eq!(
            room_endpoint("example.org", true, &room),
            "wss://example.org/ws/chat/alice_zelda/"
        );
        assert_eq!(
            room_endpoint("localhost:8000", false, &room),
            "ws://localhost:8000/ws/chat/alice_zelda/"
        );
    }
}
