//! Inline edit buffer.

use crate::data::{Role, User};

/// Which field of the edit row has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditField {
    #[default]
    Name,
    Email,
    Role,
}

impl EditField {
    pub fn next(self) -> Self {
        match self {
            EditField::Name => EditField::Email,
            EditField::Email => EditField::Role,
            EditField::Role => EditField::Name,
        }
    }
}

/// Working copy of the editable fields of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct EditBuffer {
    /// Id of the record being edited.
    pub user_id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub focus: EditField,
}

impl EditBuffer {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            focus: EditField::Name,
        }
    }

    /// Copies the buffered fields onto `user`.
    pub fn apply_to(&self, user: &mut User) {
        user.name = self.name.clone();
        user.email = self.email.clone();
        user.role = self.role;
    }

    /// Appends to the focused text field. Role is cycled instead.
    pub fn append_input_char(&mut self, c: char) {
        match self.focus {
            EditField::Name => self.name.push(c),
            EditField::Email => self.email.push(c),
            EditField::Role => {}
        }
    }

    /// Removes the last character from the focused text field.
    ///
    /// Returns `true` if a character was removed.
    pub fn pop_input_char(&mut self) -> bool {
        match self.focus {
            EditField::Name => self.name.pop().is_some(),
            EditField::Email => self.email.pop().is_some(),
            EditField::Role => false,
        }
    }

    pub fn cycle_role(&mut self) {
        self.role = self.role.next();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }
}
