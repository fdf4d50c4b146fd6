//! # Status Lookup Panel
//!
//! Holds the identifier being typed and the state of the lookup for it.
//! After a successful signup the panel is fed the created entry directly
//! with [`PanelEvent::Confirmed`]; otherwise a registrant types their
//! identifier and issues [`PanelEvent::Search`].

use crate::entry::WaitlistEntry;
use crate::identity::UniqueId;
use crate::request::RequestState;

pub const ID_HEADING: &str = "Your OPTI-AVIS ID";
pub const SAVE_REMINDER: &str = "Save this ID to access your notifications and updates later.";
pub const CONFIRMED_HEADING: &str = "Registration Confirmed";
pub const CONFIRMED_BODY: &str = "You'll be among the first to know when we launch.";
pub const NEXT_STEPS: [&str; 3] = [
    "We'll review your application",
    "You'll receive updates about your position on the waitlist",
    "We'll notify you when early access becomes available",
];
pub const SEARCH_PROMPT: &str = "Check Application Status: enter your OPTI-AVIS ID";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    Input(String),
    Search,
    Resolved(Result<WaitlistEntry, String>),
    /// A signup just succeeded with this entry.
    Confirmed(WaitlistEntry),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    /// Call the gateway's lookup operation and report back with
    /// [`PanelEvent::Resolved`].
    Lookup(UniqueId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusPanel {
    pub input: String,
    pub lookup: RequestState<WaitlistEntry>,
}

impl StatusPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a `Search` would currently be acted on.
    pub fn can_search(&self) -> bool {
        !self.input.trim().is_empty() && !self.lookup.is_in_flight()
    }

    pub fn entry(&self) -> Option<&WaitlistEntry> {
        self.lookup.succeeded()
    }

    pub fn apply(&mut self, event: PanelEvent) -> Option<PanelCommand> {
        let (next, command) = transition(std::mem::take(self), event);
        *self = next;
        command
    }

    /// Plain-text rendering of the panel.
    pub fn render(&self) -> String {
        match &self.lookup {
            RequestState::Succeeded(entry) => render_entry(entry),
            RequestState::Failed(message) => format!("Error: {message}\n"),
            RequestState::InFlight => "Searching...\n".to_string(),
            RequestState::Idle => format!("{SEARCH_PROMPT}\n"),
        }
    }
}

fn render_entry(entry: &WaitlistEntry) -> String {
    let mut out = String::new();
    out.push_str(&format!("{ID_HEADING}\n  {}\n{SAVE_REMINDER}\n\n", entry.unique_id));
    out.push_str(&format!("{CONFIRMED_HEADING}\n  {CONFIRMED_BODY}\n\n"));
    out.push_str("Next Steps\n");
    for step in NEXT_STEPS {
        out.push_str(&format!("  - {step}\n"));
    }
    out
}

/// Compute the panel that follows `panel` under `event`.
///
/// Events that do not apply (a blank or duplicate search, a stray result)
/// are ignored and return the panel unchanged.
pub fn transition(panel: StatusPanel, event: PanelEvent) -> (StatusPanel, Option<PanelCommand>) {
    match event {
        PanelEvent::Input(input) => (StatusPanel { input, ..panel }, None),
        PanelEvent::Search => {
            if panel.lookup.is_in_flight() {
                return (panel, None);
            }
            match UniqueId::new(panel.input.as_str()) {
                Ok(id) => (
                    StatusPanel {
                        lookup: RequestState::InFlight,
                        ..panel
                    },
                    Some(PanelCommand::Lookup(id)),
                ),
                Err(_) => (panel, None),
            }
        }
        PanelEvent::Resolved(result) => {
            if !panel.lookup.is_in_flight() {
                return (panel, None);
            }
            let input = if result.is_ok() {
                String::new()
            } else {
                panel.input
            };
            let lookup = RequestState::settle(result);
            (StatusPanel { input, lookup }, None)
        }
        PanelEvent::Confirmed(entry) => (
            StatusPanel {
                input: String::new(),
                lookup: RequestState::Succeeded(entry),
            },
            None,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::fixtures::fields;
    use crate::entry::NewWaitlistEntry;
    use chrono::Utc;
    use uuid::Uuid;

    fn stored() -> WaitlistEntry {
        NewWaitlistEntry::generate(fields()).into_entry(Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn blank_search_is_ignored() {
        let mut panel = StatusPanel::new();
        panel.apply(PanelEvent::Input("   ".into()));
        assert!(!panel.can_search());
        assert_eq!(panel.apply(PanelEvent::Search), None);
        assert_eq!(panel.lookup, RequestState::Idle);
    }

    #[test]
    fn search_trims_and_emits_lookup() {
        let mut panel = StatusPanel::new();
        panel.apply(PanelEvent::Input("  abc123  ".into()));
        let command = panel.apply(PanelEvent::Search);
        assert_eq!(
            command,
            Some(PanelCommand::Lookup(UniqueId::new("abc123").unwrap()))
        );
        assert!(panel.lookup.is_in_flight());
        assert_eq!(panel.apply(PanelEvent::Search), None);
    }

    #[test]
    fn found_entry_renders_confirmation() {
        let entry = stored();
        let mut panel = StatusPanel::new();
        panel.apply(PanelEvent::Input(entry.unique_id.to_string()));
        panel.apply(PanelEvent::Search);
        panel.apply(PanelEvent::Resolved(Ok(entry.clone())));

        assert_eq!(panel.entry(), Some(&entry));
        assert!(panel.input.is_empty());
        let text = panel.render();
        assert!(text.contains(ID_HEADING));
        assert!(text.contains(entry.unique_id.as_str()));
        assert!(text.contains(CONFIRMED_HEADING));
        for step in NEXT_STEPS {
            assert!(text.contains(step));
        }
    }

    #[test]
    fn failure_renders_message_and_keeps_input() {
        let mut panel = StatusPanel::new();
        panel.apply(PanelEvent::Input("nope".into()));
        panel.apply(PanelEvent::Search);
        panel.apply(PanelEvent::Resolved(Err("User not found".into())));
        assert_eq!(panel.input, "nope");
        assert_eq!(panel.render(), "Error: User not found\n");
        assert!(panel.can_search());
    }

    #[test]
    fn stray_result_is_ignored() {
        let panel = StatusPanel::new();
        let (after, command) = transition(panel.clone(), PanelEvent::Resolved(Ok(stored())));
        assert_eq!(after, panel);
        assert_eq!(command, None);
    }

    #[test]
    fn confirmed_shows_entry_without_lookup() {
        let entry = stored();
        let mut panel = StatusPanel::new();
        panel.apply(PanelEvent::Confirmed(entry.clone()));
        assert_eq!(panel.entry(), Some(&entry));
    }

    #[test]
    fn idle_renders_prompt() {
        assert!(StatusPanel::new().render().contains("OPTI-AVIS ID"));
    }
}
