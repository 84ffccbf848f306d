//! Input events and the reaction-icon selection contract.
//!
//! The transport renders numbered lists and arms reaction icons; the core
//! only needs the inverse mapping (icon → selected index) to interpret a
//! confirm. One [`InputEvent`] describes one reaction toggle plus the set of
//! icons currently selected on the message.

use crate::config::GameConfig;
use crate::entity::ActorId;

/// A reaction icon the core understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReactionIcon {
    /// Numbered selection marker, 1-based (`1️⃣`..`🔟`).
    Number(u8),
    Confirm,
    Cancel,
    Move,
    Talk,
    Inspect,
    Interact,
    Ground,
    Pass,
    Info,
    Battle,
}

impl ReactionIcon {
    const NUMBERS: [&'static str; 10] = [
        "1\u{fe0f}\u{20e3}",
        "2\u{fe0f}\u{20e3}",
        "3\u{fe0f}\u{20e3}",
        "4\u{fe0f}\u{20e3}",
        "5\u{fe0f}\u{20e3}",
        "6\u{fe0f}\u{20e3}",
        "7\u{fe0f}\u{20e3}",
        "8\u{fe0f}\u{20e3}",
        "9\u{fe0f}\u{20e3}",
        "\u{1f51f}",
    ];

    /// The emoji the transport renders for this icon.
    pub fn emoji(&self) -> &'static str {
        match *self {
            Self::Number(n) => {
                Self::NUMBERS[(n.clamp(1, GameConfig::MAX_MENU_ENTRIES as u8) - 1) as usize]
            }
            Self::Confirm => "\u{2705}",
            Self::Cancel => "\u{1f6ab}",
            Self::Move => "\u{1f6b6}",
            Self::Talk => "\u{1f4ac}",
            Self::Inspect => "\u{1f50d}",
            Self::Interact => "\u{270b}",
            Self::Ground => "\u{1f392}",
            Self::Pass => "\u{23ed}\u{fe0f}",
            Self::Info => "\u{2139}\u{fe0f}",
            Self::Battle => "\u{2694}\u{fe0f}",
        }
    }

    /// Inverse of the numbered-list rendering: the 0-based index a numeric
    /// marker selects, `None` for control icons.
    pub fn index(&self) -> Option<usize> {
        match *self {
            Self::Number(n) if (1..=GameConfig::MAX_MENU_ENTRIES as u8).contains(&n) => {
                Some(n as usize - 1)
            }
            _ => None,
        }
    }

    /// Parses a transport emoji back into an icon.
    pub fn from_emoji(s: &str) -> Option<Self> {
        if let Some(pos) = Self::NUMBERS.iter().position(|e| *e == s) {
            return Some(Self::Number(pos as u8 + 1));
        }
        match s {
            "\u{2705}" => Some(Self::Confirm),
            "\u{1f6ab}" => Some(Self::Cancel),
            "\u{1f6b6}" => Some(Self::Move),
            "\u{1f4ac}" => Some(Self::Talk),
            "\u{1f50d}" => Some(Self::Inspect),
            "\u{270b}" => Some(Self::Interact),
            "\u{1f392}" => Some(Self::Ground),
            "\u{23ed}\u{fe0f}" => Some(Self::Pass),
            "\u{2139}\u{fe0f}" => Some(Self::Info),
            "\u{2694}\u{fe0f}" => Some(Self::Battle),
            _ => None,
        }
    }
}

/// One reaction toggle delivered by the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputEvent {
    /// Opaque id of the actor who toggled.
    pub actor: ActorId,
    /// The icon that was just toggled on.
    pub toggled: ReactionIcon,
    /// Every icon currently selected on the message, including `toggled`.
    pub selected: Vec<ReactionIcon>,
    /// Transport reference of the reacted-to message.
    pub message_ref: u64,
}

impl InputEvent {
    /// 0-based indices selected on a numbered menu of `len` entries,
    /// deduplicated and sorted. Out-of-range markers are ignored.
    pub fn selected_indices(&self, len: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .selected
            .iter()
            .filter_map(ReactionIcon::index)
            .filter(|i| *i < len)
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

/// Renders an ordered list of labels as numbered menu text plus the icons
/// the transport should arm: one numeric marker per entry, then confirm and
/// cancel.
///
/// Menus are capped at [`GameConfig::MAX_MENU_ENTRIES`] entries; content is
/// authored well under the cap.
pub fn render_numbered<S: AsRef<str>>(header: &str, labels: &[S]) -> (String, Vec<ReactionIcon>) {
    let shown = labels.len().min(GameConfig::MAX_MENU_ENTRIES);
    let mut text = String::from(header);
    let mut icons = Vec::with_capacity(shown + 2);
    for (i, label) in labels.iter().take(shown).enumerate() {
        let icon = ReactionIcon::Number(i as u8 + 1);
        text.push('\n');
        text.push_str(icon.emoji());
        text.push(' ');
        text.push_str(label.as_ref());
        icons.push(icon);
    }
    icons.push(ReactionIcon::Confirm);
    icons.push(ReactionIcon::Cancel);
    (text, icons)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_round_trips_through_emoji() {
        for icon in [
            ReactionIcon::Number(1),
            ReactionIcon::Number(10),
            ReactionIcon::Confirm,
            ReactionIcon::Cancel,
            ReactionIcon::Battle,
        ] {
            assert_eq!(ReactionIcon::from_emoji(icon.emoji()), Some(icon));
        }
    }

    #[test]
    fn numbered_render_arms_markers_and_controls() {
        let (text, icons) = render_numbered("Pick:", &["a", "b"]);
        assert!(text.contains("1\u{fe0f}\u{20e3} a"));
        assert!(text.contains("2\u{fe0f}\u{20e3} b"));
        assert_eq!(
            icons,
            vec![
                ReactionIcon::Number(1),
                ReactionIcon::Number(2),
                ReactionIcon::Confirm,
                ReactionIcon::Cancel,
            ]
        );
    }

    #[test]
    fn selected_indices_ignores_out_of_range_markers() {
        let event = InputEvent {
            actor: ActorId(1),
            toggled: ReactionIcon::Confirm,
            selected: vec![
                ReactionIcon::Number(2),
                ReactionIcon::Number(9),
                ReactionIcon::Confirm,
            ],
            message_ref: 0,
        };
        assert_eq!(event.selected_indices(3), vec![1]);
    }
}
