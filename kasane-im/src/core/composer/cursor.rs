//! Cursor motion and deletion.

use super::Composer;

impl Composer {
    /// Delete the character at `position` without moving through the normal
    /// cursor path; the cursor shifts left when it sat beyond the deletion.
    pub fn delete_at(&mut self, position: usize) {
        self.composition.delete_at(position);
        if self.position > position {
            self.position -= 1;
        }
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self) {
        self.position = self.composition.delete_at(self.position);
        self.update_input_mode();
    }

    /// Delete up to `length` characters starting at `position`.
    pub fn delete_range(&mut self, position: usize, length: usize) {
        for _ in 0..length {
            if position >= self.composition.length() {
                break;
            }
            self.delete_at(position);
        }
    }

    /// Empty the composition and restore the comeback mode.
    pub fn edit_erase(&mut self) {
        self.composition.erase();
        self.position = 0;
        self.set_input_mode(self.comeback_input_mode);
    }

    /// Delete the character left of the cursor.
    pub fn backspace(&mut self) {
        if self.position == 0 {
            return;
        }
        // Backspace is the special case for mode updates: the new mode is
        // based on both the new current character and the character about to
        // be deleted, so move first, update, then delete.
        self.position -= 1;
        self.update_input_mode();
        self.position = self.composition.delete_at(self.position);
    }

    pub fn move_cursor_left(&mut self) {
        if self.position > 0 {
            self.position -= 1;
        }
        self.update_input_mode();
    }

    pub fn move_cursor_right(&mut self) {
        if self.position < self.composition.length() {
            self.position += 1;
        }
        self.update_input_mode();
    }

    /// Jumping to the edges always restores the default input mode, unlike
    /// single steps.
    pub fn move_cursor_to_beginning(&mut self) {
        self.position = 0;
        self.set_input_mode(self.comeback_input_mode);
    }

    pub fn move_cursor_to_end(&mut self) {
        self.position = self.composition.length();
        self.set_input_mode(self.comeback_input_mode);
    }

    /// Out-of-range positions are a caller bug: flagged in debug builds,
    /// clamped silently in release.
    pub fn move_cursor_to(&mut self, new_position: usize) {
        debug_assert!(
            new_position <= self.composition.length(),
            "cursor position out of range"
        );
        self.position = new_position.min(self.composition.length());
        self.update_input_mode();
    }
}
