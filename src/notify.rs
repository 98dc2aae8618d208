//! Notification and modal presenter.
//!
//! Transient surfaces (the notification bar, the export progress modal, the
//! theme comparison modal) are shown and hidden with two classes: `hidden`
//! takes the element out of layout and `show` drives its CSS transition. The
//! classes change a short delay apart so the transition has a frame to start
//! from:
//!
//! ```text
//!           open()                 tick ≥ +show_delay
//! Hidden ──────────▶ Opening ─────────────────────────▶ Open
//!   ▲      -hidden                   +show                │
//!   │                                                     │ close()
//!   │   tick ≥ +hide_delay                                │ -show
//!   └──────────────────────── Closing ◀───────────────────┘
//!          +hidden
//! ```
//!
//! Time is passed in, never read, so every transition is driven by
//! [`Surface::tick`] and tests control the clock.

use crate::app::{Patch, Target};
use crate::config::NotificationsConfig;
use crate::hooks;
use std::time::{Duration, Instant};

/// Notification severity, shown as an icon and a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl Severity {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✅",
            Self::Error => "❌",
            Self::Info => "ℹ️",
            Self::Warning => "⚠️",
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Hidden,
    Opening { until: Instant },
    Open,
    Closing { until: Instant },
}

/// A show/hide surface addressed by element id.
#[derive(Debug, Clone)]
pub struct Surface {
    id: &'static str,
    phase: Phase,
    show_delay: Duration,
    hide_delay: Duration,
}

impl Surface {
    pub fn new(id: &'static str, config: &NotificationsConfig) -> Self {
        Self {
            id,
            phase: Phase::Hidden,
            show_delay: config.show_delay(),
            hide_delay: config.hide_delay(),
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Opening or open.
    pub fn is_visible(&self) -> bool {
        matches!(self.phase, Phase::Opening { .. } | Phase::Open)
    }

    fn toggle(&self, class: &'static str, on: bool) -> Patch {
        Patch::ToggleClass {
            target: Target::Id(self.id),
            class,
            on,
        }
    }

    /// Start showing. A surface that is closing is reopened.
    pub fn open(&mut self, now: Instant) -> Vec<Patch> {
        match self.phase {
            Phase::Opening { .. } | Phase::Open => Vec::new(),
            Phase::Hidden | Phase::Closing { .. } => self.restart(now),
        }
    }

    /// Run the opening transition again from the start, whatever the phase.
    /// Used when the surface's classes were reset underneath it.
    pub fn restart(&mut self, now: Instant) -> Vec<Patch> {
        self.phase = Phase::Opening {
            until: now + self.show_delay,
        };
        vec![self.toggle(hooks::HIDDEN, false)]
    }

    /// Start hiding. No effect on a surface that is already hidden or closing.
    pub fn close(&mut self, now: Instant) -> Vec<Patch> {
        match self.phase {
            Phase::Hidden | Phase::Closing { .. } => Vec::new(),
            Phase::Opening { .. } | Phase::Open => {
                self.phase = Phase::Closing {
                    until: now + self.hide_delay,
                };
                vec![self.toggle(hooks::SHOW, false)]
            }
        }
    }

    /// Complete any transition whose delay has elapsed.
    pub fn tick(&mut self, now: Instant) -> Vec<Patch> {
        match self.phase {
            Phase::Opening { until } if now >= until => {
                self.phase = Phase::Open;
                vec![self.toggle(hooks::SHOW, true)]
            }
            Phase::Closing { until } if now >= until => {
                self.phase = Phase::Hidden;
                vec![self.toggle(hooks::HIDDEN, true)]
            }
            _ => Vec::new(),
        }
    }
}

/// The notification currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub expires: Instant,
}

/// At most one notification at a time; a new one replaces the old.
#[derive(Debug, Clone)]
pub struct Notifier {
    surface: Surface,
    current: Option<Notification>,
    duration: Duration,
}

impl Notifier {
    pub fn new(config: &NotificationsConfig) -> Self {
        Self {
            surface: Surface::new(hooks::NOTIFICATION, config),
            current: None,
            duration: config.duration(),
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Show `message`, replacing whatever is showing. The auto-dismiss
    /// deadline restarts from `now`.
    pub fn show(&mut self, message: impl Into<String>, severity: Severity, now: Instant) -> Vec<Patch> {
        let message = message.into();
        tracing::debug!(severity = severity.class(), %message, "notification");

        let mut patches = vec![
            Patch::SetText {
                target: Target::Class(hooks::NOTIFICATION_ICON),
                text: severity.icon().to_string(),
            },
            Patch::SetText {
                target: Target::Class(hooks::NOTIFICATION_MESSAGE),
                text: message.clone(),
            },
            // Resets `show` and `hidden` too, so the transition always reruns.
            Patch::SetClassName {
                target: Target::Id(hooks::NOTIFICATION),
                class: format!("{} {}", hooks::NOTIFICATION, severity.class()),
            },
        ];
        patches.extend(self.surface.restart(now));

        self.current = Some(Notification {
            message,
            severity,
            expires: now + self.duration,
        });
        patches
    }

    /// Hide the current notification early.
    pub fn dismiss(&mut self, now: Instant) -> Vec<Patch> {
        self.current = None;
        self.surface.close(now)
    }

    pub fn tick(&mut self, now: Instant) -> Vec<Patch> {
        let mut patches = Vec::new();
        if self.current.as_ref().is_some_and(|n| now >= n.expires) {
            patches.extend(self.dismiss(now));
        }
        patches.extend(self.surface.tick(now));
        patches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn config() -> NotificationsConfig {
        NotificationsConfig::default()
    }

    fn toggles(patches: &[Patch]) -> Vec<(&'static str, bool)> {
        patches
            .iter()
            .filter_map(|p| match p {
                Patch::ToggleClass { class, on, .. } => Some((*class, *on)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn severity_icons() {
        assert_eq!(Severity::Success.icon(), "✅");
        assert_eq!(Severity::Error.icon(), "❌");
        assert_eq!(Severity::Info.icon(), "ℹ️");
        assert_eq!(Severity::Warning.icon(), "⚠️");
    }

    #[test]
    fn surface_open_then_show_after_delay() {
        let t0 = Instant::now();
        let mut modal = Surface::new(hooks::PDF_MODAL, &config());

        assert_eq!(toggles(&modal.open(t0)), vec![(hooks::HIDDEN, false)]);
        assert!(modal.is_visible());
        assert!(modal.tick(t0 + ms(5)).is_empty());
        assert_eq!(toggles(&modal.tick(t0 + ms(10))), vec![(hooks::SHOW, true)]);
        assert_eq!(modal.phase(), Phase::Open);
    }

    #[test]
    fn surface_close_then_hidden_after_delay() {
        let t0 = Instant::now();
        let mut modal = Surface::new(hooks::COMPARE_MODAL, &config());
        modal.open(t0);
        modal.tick(t0 + ms(10));

        assert_eq!(toggles(&modal.close(t0 + ms(100))), vec![(hooks::SHOW, false)]);
        assert!(!modal.is_visible());
        assert!(modal.tick(t0 + ms(399)).is_empty());
        assert_eq!(toggles(&modal.tick(t0 + ms(400))), vec![(hooks::HIDDEN, true)]);
        assert_eq!(modal.phase(), Phase::Hidden);
    }

    #[test]
    fn surface_open_is_idempotent() {
        let t0 = Instant::now();
        let mut modal = Surface::new(hooks::PDF_MODAL, &config());
        modal.open(t0);
        assert!(modal.open(t0 + ms(1)).is_empty());
        assert!(modal.close(t0 + ms(2)).len() == 1);
        assert!(modal.close(t0 + ms(3)).is_empty());
    }

    #[test]
    fn reopening_cancels_pending_hide() {
        let t0 = Instant::now();
        let mut modal = Surface::new(hooks::PDF_MODAL, &config());
        modal.open(t0);
        modal.tick(t0 + ms(10));
        modal.close(t0 + ms(20));
        modal.open(t0 + ms(30));
        // The old hide deadline passes without hiding the surface.
        let patches = modal.tick(t0 + ms(400));
        assert_eq!(toggles(&patches), vec![(hooks::SHOW, true)]);
        assert_eq!(modal.phase(), Phase::Open);
    }

    #[test]
    fn notification_sets_icon_message_and_class() {
        let t0 = Instant::now();
        let mut notifier = Notifier::new(&config());
        let patches = notifier.show("Preview hidden", Severity::Info, t0);

        assert!(patches.contains(&Patch::SetText {
            target: Target::Class(hooks::NOTIFICATION_ICON),
            text: "ℹ️".to_string(),
        }));
        assert!(patches.contains(&Patch::SetText {
            target: Target::Class(hooks::NOTIFICATION_MESSAGE),
            text: "Preview hidden".to_string(),
        }));
        assert!(patches.contains(&Patch::SetClassName {
            target: Target::Id(hooks::NOTIFICATION),
            class: "notification info".to_string(),
        }));
        assert_eq!(notifier.current().unwrap().message, "Preview hidden");
    }

    #[test]
    fn notification_auto_dismisses_after_duration() {
        let t0 = Instant::now();
        let mut notifier = Notifier::new(&config());
        notifier.show("Saved", Severity::Success, t0);
        notifier.tick(t0 + ms(10));

        assert!(notifier.tick(t0 + ms(3999)).is_empty());
        assert!(notifier.current().is_some());

        let patches = notifier.tick(t0 + ms(4000));
        assert_eq!(toggles(&patches), vec![(hooks::SHOW, false)]);
        assert!(notifier.current().is_none());

        notifier.tick(t0 + ms(4300));
        assert_eq!(notifier.surface().phase(), Phase::Hidden);
    }

    #[test]
    fn replacement_resets_deadline() {
        let t0 = Instant::now();
        let mut notifier = Notifier::new(&config());
        notifier.show("first", Severity::Info, t0);
        notifier.show("second", Severity::Warning, t0 + ms(3000));

        // The first notification's deadline no longer applies.
        notifier.tick(t0 + ms(4000));
        let current = notifier.current().unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.severity, Severity::Warning);
        assert!(notifier.surface().is_visible());

        notifier.tick(t0 + ms(7000));
        assert!(notifier.current().is_none());
    }

    #[test]
    fn manual_dismiss_hides_early() {
        let t0 = Instant::now();
        let mut notifier = Notifier::new(&config());
        notifier.show("hello", Severity::Info, t0);
        notifier.tick(t0 + ms(10));

        let patches = notifier.dismiss(t0 + ms(500));
        assert_eq!(toggles(&patches), vec![(hooks::SHOW, false)]);
        assert!(notifier.current().is_none());
        // Nothing left to expire later.
        notifier.tick(t0 + ms(800));
        assert!(notifier.tick(t0 + ms(5000)).is_empty());
    }
}
