//! View rendering for the typeahead.

use super::model::Model;
use super::style::{REMOVE_MARK, TOGGLE_CLOSED, TOGGLE_OPEN};
use super::types::{Dropdown, Focus};
use unicode_width::UnicodeWidthStr;

impl Model {
    /// Renders the control: tags, the field and the toggle on one line, then
    /// the dropdown below it when open.
    pub fn view(&self) -> String {
        let mut line: Vec<String> = Vec::new();

        for tag in self.tags() {
            let mut rendered = self.styles.tag.render(&tag);
            if !self.disabled {
                rendered.push_str(&self.styles.tag_remove.render(REMOVE_MARK));
            }
            line.push(rendered);
        }

        let has_values = !self.selection.value().is_empty();
        if !self.disabled || !self.config.multi || !has_values {
            let mut field = self.field_view(has_values);
            field.push_str(&self.field_padding(has_values));
            line.push(field);
        }

        if !self.disabled {
            let toggle = match self.state.dropdown {
                Dropdown::Open => TOGGLE_OPEN,
                Dropdown::Closed => TOGGLE_CLOSED,
            };
            line.push(self.styles.toggle.render(toggle));
        }

        let mut out = line.join(" ");
        if let Some(menu) = self.menu_view() {
            out.push('\n');
            out.push_str(&menu);
        }
        out
    }

    fn field_view(&self, has_values: bool) -> String {
        if self.disabled {
            let text = self.field.text();
            return if text.is_empty() {
                String::new()
            } else {
                self.styles.disabled.render(&text)
            };
        }

        if self.field.is_empty() {
            let show_placeholder = !has_values && !self.config.placeholder.is_empty();
            if self.state.focus == Focus::Input {
                let first = if show_placeholder {
                    self.config.placeholder.chars().next().unwrap_or(' ')
                } else {
                    ' '
                };
                let mut v = self.styles.cursor.render(&first.to_string());
                if show_placeholder {
                    let rest: String = self.config.placeholder.chars().skip(1).collect();
                    if !rest.is_empty() {
                        v.push_str(&self.styles.placeholder.render(&rest));
                    }
                }
                return v;
            }
            return if show_placeholder {
                self.styles.placeholder.render(&self.config.placeholder)
            } else {
                String::new()
            };
        }

        if self.state.focus != Focus::Input {
            return self.styles.input.render(&self.field.text());
        }

        let (before, under, after) = self.field.split_at_cursor();
        let mut v = String::new();
        if !before.is_empty() {
            v.push_str(&self.styles.input.render(&before));
        }
        v.push_str(&self.styles.cursor.render(&under.unwrap_or(' ').to_string()));
        if !after.is_empty() {
            v.push_str(&self.styles.input.render(&after));
        }
        v
    }

    /// Fills the rest of the configured width so the toggle stays put.
    fn field_padding(&self, has_values: bool) -> String {
        if self.config.width == 0 {
            return String::new();
        }
        let used = if self.field.is_empty() {
            if !has_values && !self.config.placeholder.is_empty() {
                UnicodeWidthStr::width(self.config.placeholder.as_str())
            } else {
                usize::from(self.state.focus == Focus::Input && !self.disabled)
            }
        } else {
            let cursor_at_end = self.field.position() == self.field.text().chars().count();
            self.field.width()
                + usize::from(cursor_at_end && self.state.focus == Focus::Input && !self.disabled)
        };
        let padding = self.config.width.saturating_sub(used);
        if padding == 0 {
            return String::new();
        }
        self.styles.input.render(&" ".repeat(padding))
    }

    fn menu_view(&self) -> Option<String> {
        if self.state.dropdown != Dropdown::Open {
            return None;
        }
        let matches = self.pipeline.matches();
        if matches.is_empty() {
            if self.config.custom {
                return None;
            }
            let row = self.styles.no_matches.render(&self.config.settings.no_matches_text);
            return Some(self.styles.menu.render(&row));
        }

        let rows: Vec<String> = matches
            .iter()
            .enumerate()
            .map(|(i, candidate)| {
                let name = candidate.display_name(&self.fields);
                if self.state.focus == Focus::MenuItem(i) {
                    self.styles.menu_item_focused.render(&format!("› {}", name))
                } else {
                    self.styles.menu_item.render(&format!("  {}", name))
                }
            })
            .collect();
        Some(self.styles.menu.render(&rows.join("\n")))
    }
}
