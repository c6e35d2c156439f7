//! Inbound commands to the application service.
//!
//! One `Command` type covers both input channels: the BLE characteristic
//! carries string tokens, the speech recognizer carries numeric command
//! ids. Both resolve here, so the [`AppService`](super::service::AppService)
//! has a single dispatch surface and the token set stays a superset of
//! both domains.
//!
//! Discriminants start at 1 — the command queue in [`crate::events`] uses
//! 0 as its empty-slot sentinel.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    // ── Lighting ──────────────────────────────────────────
    White = 1,
    Red = 2,
    Orange = 3,
    Yellow = 4,
    Green = 5,
    Cyan = 6,
    Blue = 7,
    Purple = 8,
    Pink = 9,
    /// Arm the random-colour water animation.
    Water = 10,
    /// Lights out, effective immediately (not on the next tick).
    LightsOff = 11,

    // ── Audio ─────────────────────────────────────────────
    /// Bring up the Bluetooth audio link and try to re-pair.
    AudioOn = 12,

    // ── Motion ────────────────────────────────────────────
    Rotate = 13,
    Stop = 14,
}

/// The full text-command vocabulary, exactly as peers write it to the
/// BLE characteristic. Single source of truth for parsing; tokens are
/// matched verbatim (case-sensitive, no trimming beyond the printable
/// filter applied upstream).
pub const TOKEN_MAP: [(&str, Command); 14] = [
    ("white", Command::White),
    ("red", Command::Red),
    ("orange", Command::Orange),
    ("yellow", Command::Yellow),
    ("green", Command::Green),
    ("cyan", Command::Cyan),
    ("blue", Command::Blue),
    ("purple", Command::Purple),
    ("pink", Command::Pink),
    ("water", Command::Water),
    ("off", Command::LightsOff),
    ("BT", Command::AudioOn),
    ("rotate", Command::Rotate),
    ("stop", Command::Stop),
];

impl Command {
    /// Resolve a text token. Unknown tokens are `None` — callers drop
    /// them silently per the command-channel contract.
    pub fn parse(token: &str) -> Option<Self> {
        TOKEN_MAP
            .iter()
            .find(|(t, _)| *t == token)
            .map(|&(_, command)| command)
    }

    /// Resolve a recognizer command id (grammar ids, not phrase ids).
    pub fn from_voice_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(Self::White),
            1 => Some(Self::LightsOff),
            2 => Some(Self::Rotate),
            3 => Some(Self::Stop),
            _ => None,
        }
    }

    /// Reverse of the discriminant cast used by the command queue.
    pub fn from_u8(raw: u8) -> Option<Self> {
        TOKEN_MAP
            .iter()
            .find(|&&(_, command)| command as u8 == raw)
            .map(|&(_, command)| command)
    }

    /// The wire token for this command (for log lines).
    pub fn token(self) -> &'static str {
        TOKEN_MAP
            .iter()
            .find(|&&(_, command)| command == self)
            .map_or("?", |&(token, _)| token)
    }
}
