//! Session-layer request flags consulted by the composer.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Adopt the surrounding characters' view as the input mode when the
    /// cursor moves next to them.
    pub update_input_mode_from_surrounding_text: bool,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            update_input_mode_from_surrounding_text: true,
        }
    }
}
