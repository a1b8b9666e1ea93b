//! Keyboard shortcut registry.

use crate::input::KeyInput;
use crate::interaction::Command;
use crate::tools::ToolKind;

/// A keyboard shortcut definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shortcut {
    /// Key name as reported by the host; letters match case-insensitively.
    pub key: &'static str,
    /// Ctrl, or Cmd on macOS.
    pub command_key: bool,
    pub shift: bool,
    pub description: &'static str,
    pub action: Command,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        command_key: bool,
        shift: bool,
        description: &'static str,
        action: Command,
    ) -> Self {
        Self {
            key,
            command_key,
            shift,
            description,
            action,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command_key {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    pub fn matches(&self, input: &KeyInput) -> bool {
        self.key.eq_ignore_ascii_case(&input.key)
            && self.command_key == input.modifiers.command()
            && self.shift == input.modifiers.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    const SHORTCUTS: &'static [Shortcut] = &[
        Shortcut::new("Z", true, false, "Undo", Command::Undo),
        Shortcut::new("E", true, false, "Export to PNG", Command::Download),
        Shortcut::new("Delete", false, false, "Delete selected strokes", Command::DeleteSelected),
        Shortcut::new("Backspace", false, false, "Delete selected strokes", Command::DeleteSelected),
        Shortcut::new("D", false, false, "Draw tool", Command::SetTool(ToolKind::Draw)),
        Shortcut::new("P", false, false, "Draw tool", Command::SetTool(ToolKind::Draw)),
        Shortcut::new("V", false, false, "Select tool", Command::SetTool(ToolKind::Select)),
        Shortcut::new("S", false, false, "Select tool", Command::SetTool(ToolKind::Select)),
        Shortcut::new("Escape", false, false, "Cancel current action", Command::Cancel),
    ];

    /// Get all registered shortcuts.
    pub fn all() -> &'static [Shortcut] {
        Self::SHORTCUTS
    }

    /// Resolve a key press to its command.
    pub fn lookup(input: &KeyInput) -> Option<Command> {
        Self::SHORTCUTS
            .iter()
            .find(|shortcut| shortcut.matches(input))
            .map(|shortcut| shortcut.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    #[test]
    fn test_undo_combo() {
        assert_eq!(
            ShortcutRegistry::lookup(&KeyInput::new("z", Modifiers::ctrl())),
            Some(Command::Undo)
        );
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(
            ShortcutRegistry::lookup(&KeyInput::new("Z", meta)),
            Some(Command::Undo)
        );
        // Plain "z" is not bound.
        assert_eq!(ShortcutRegistry::lookup(&KeyInput::new("z", Modifiers::NONE)), None);
    }

    #[test]
    fn test_delete_keys() {
        for key in ["Delete", "Backspace"] {
            assert_eq!(
                ShortcutRegistry::lookup(&KeyInput::new(key, Modifiers::NONE)),
                Some(Command::DeleteSelected)
            );
        }
    }

    #[test]
    fn test_tool_keys() {
        assert_eq!(
            ShortcutRegistry::lookup(&KeyInput::new("v", Modifiers::NONE)),
            Some(Command::SetTool(ToolKind::Select))
        );
        assert_eq!(
            ShortcutRegistry::lookup(&KeyInput::new("d", Modifiers::NONE)),
            Some(Command::SetTool(ToolKind::Draw))
        );
        assert_eq!(ShortcutRegistry::lookup(&KeyInput::new("v", Modifiers::shift())), None);
    }

    #[test]
    fn test_format() {
        let undo = ShortcutRegistry::all()
            .iter()
            .find(|s| s.action == Command::Undo)
            .unwrap();
        assert_eq!(undo.format(), "Ctrl+Z");
    }
}
