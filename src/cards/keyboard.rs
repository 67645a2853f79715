//! Inline keyboards for the menu and card screens.

use tracing::debug;

use crate::cards::catalog::Catalog;

pub const PERSON_PREFIX: &str = "person:";
pub const BACK_ACTION: &str = "back";
pub const BACK_LABEL: &str = "Back";

/// A clickable button: visible label plus callback data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuAction {
    pub label: String,
    pub action_id: String,
}

/// Rows of buttons attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Keyboard {
    rows: Vec<Vec<MenuAction>>,
}

impl Keyboard {
    /// One button per row.
    pub fn single_column(actions: impl IntoIterator<Item = MenuAction>) -> Self {
        Self {
            rows: actions.into_iter().map(|a| vec![a]).collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<MenuAction>] {
        &self.rows
    }

    /// All buttons, row by row.
    pub fn actions(&self) -> impl Iterator<Item = &MenuAction> {
        self.rows.iter().flatten()
    }
}

/// Decoded callback data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    Person(&'a str),
    Back,
}

impl<'a> Action<'a> {
    /// Returns `None` for data this bot never produced.
    pub fn parse(data: &'a str) -> Option<Self> {
        if data == BACK_ACTION {
            return Some(Action::Back);
        }
        data.strip_prefix(PERSON_PREFIX).map(Action::Person)
    }
}

pub fn person_action_id(key: &str) -> String {
    format!("{PERSON_PREFIX}{key}")
}

/// Main menu: one row per person, in catalog order.
pub fn main_menu(catalog: &Catalog) -> Keyboard {
    let keyboard = Keyboard::single_column(catalog.iter().map(|person| MenuAction {
        label: person.name.clone(),
        action_id: person_action_id(&person.key),
    }));
    debug!("Built main menu with {} buttons", keyboard.actions().count());
    keyboard
}

/// The single "Back" button shown under a card.
pub fn back_menu() -> Keyboard {
    Keyboard::single_column([MenuAction {
        label: BACK_LABEL.to_string(),
        action_id: BACK_ACTION.to_string(),
    }])
}
