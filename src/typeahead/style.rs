//! Styles for the typeahead's terminal rendering.
//!
//! Every visual element has its own [`Style`]; defaults use adaptive colors so
//! the control reads well on light and dark terminals.
//!
//! ```rust
//! use bubbletea_typeahead::typeahead::TypeaheadStyles;
//! use lipgloss_extras::prelude::*;
//!
//! let mut styles = TypeaheadStyles::default();
//! styles.tag = Style::new().foreground(Color::from("212"));
//! ```

use lipgloss_extras::prelude::*;

/// Mark rendered after a tag; activating it removes the tag.
pub const REMOVE_MARK: &str = "×";

/// Indicator rendered for the dropdown toggle.
pub const TOGGLE_CLOSED: &str = "▾";

/// Indicator rendered for the dropdown toggle while open.
pub const TOGGLE_OPEN: &str = "▴";

/// Styles for each element of the control.
#[derive(Debug, Clone)]
pub struct TypeaheadStyles {
    /// A selected tag.
    pub tag: Style,
    /// The remove mark after a tag.
    pub tag_remove: Style,
    /// Typed text.
    pub input: Style,
    /// The character under the cursor.
    pub cursor: Style,
    /// Placeholder hint.
    pub placeholder: Style,
    /// Dropdown toggle indicator.
    pub toggle: Style,
    /// Dropdown container.
    pub menu: Style,
    /// An unfocused menu item.
    pub menu_item: Style,
    /// The focused menu item.
    pub menu_item_focused: Style,
    /// The disabled row shown when nothing matches.
    pub no_matches: Style,
    /// Everything while the control is disabled.
    pub disabled: Style,
}

impl Default for TypeaheadStyles {
    fn default() -> Self {
        let subdued = AdaptiveColor {
            Light: "#9B9B9B",
            Dark: "#5C5C5C",
        };
        Self {
            tag: Style::new()
                .foreground(Color::from("230"))
                .background(Color::from("62"))
                .padding(0, 1, 0, 1),
            tag_remove: Style::new().foreground(AdaptiveColor {
                Light: "#EE6FF8",
                Dark: "#EE6FF8",
            }),
            input: Style::new(),
            cursor: Style::new().reverse(true),
            placeholder: Style::new().foreground(subdued.clone()),
            toggle: Style::new().foreground(subdued.clone()),
            menu: Style::new().padding_left(1),
            menu_item: Style::new().foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            menu_item_focused: Style::new()
                .foreground(AdaptiveColor {
                    Light: "#EE6FF8",
                    Dark: "#EE6FF8",
                })
                .bold(true),
            no_matches: Style::new().foreground(AdaptiveColor {
                Light: "#909090",
                Dark: "#626262",
            }),
            disabled: Style::new().foreground(subdued),
        }
    }
}
