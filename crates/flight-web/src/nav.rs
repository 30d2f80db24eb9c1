use flight_core::{Section, Selection};

/// What a key press or link asks the page to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    GoTo(Section),
    Explore,
    LeaveExplore,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<NavAction> {
    match key {
        "1" => Some(NavAction::GoTo(Section::Projects)),
        "2" => Some(NavAction::GoTo(Section::About)),
        "3" => Some(NavAction::GoTo(Section::Contact)),
        "Enter" => Some(NavAction::Explore),
        "Escape" | "Backspace" => Some(NavAction::LeaveExplore),
        _ => None,
    }
}

/// Section named by a location hash such as `#about`.
#[inline]
pub fn section_from_hash(hash: &str) -> Option<Section> {
    let name = hash.trim_start_matches('#');
    if name.is_empty() {
        return None;
    }
    name.parse().ok()
}

/// Resolve an action against the current selection into `(next, staged)`.
///
/// Section jumps fly through the tunnel; opening or closing a detail view is a
/// direct move. `None` when the action would not change anything.
pub fn resolve(current: Selection, action: NavAction) -> Option<(Selection, bool)> {
    let (next, staged) = match action {
        NavAction::GoTo(section) => (Selection::new(section, false), true),
        NavAction::Explore => (Selection::new(current.section, true), false),
        NavAction::LeaveExplore => (Selection::new(current.section, false), false),
    };
    (next != current).then_some((next, staged))
}
