//! # Alerts
//!
//! Transient messages shown above the sale screen.
//!
//! | Kind    | Icon | Lifetime              |
//! |---------|------|-----------------------|
//! | error   | ✗    | `alert_secs` (5s)     |
//! | success | ✓    | `alert_secs` (5s)     |
//! | warning | ⚠    | until dismissed       |
//! | info    | ℹ    | until dismissed       |

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Success,
    Warning,
    Info,
}

impl AlertKind {
    pub fn icon(&self) -> &'static str {
        match self {
            AlertKind::Error => "✗",
            AlertKind::Success => "✓",
            AlertKind::Warning => "⚠",
            AlertKind::Info => "ℹ",
        }
    }

    /// Error and success alerts expire; the rest are sticky.
    pub fn auto_dismisses(&self) -> bool {
        matches!(self, AlertKind::Error | AlertKind::Success)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: u64,
    pub kind: AlertKind,
    pub message: String,
    pub shown_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Alert {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Alert stack, oldest first.
#[derive(Debug, Clone)]
pub struct Alerts {
    lifetime: Duration,
    next_id: u64,
    announced_up_to: u64,
    items: Vec<Alert>,
}

impl Alerts {
    pub fn new(lifetime_secs: u64) -> Self {
        Alerts {
            lifetime: Duration::seconds(
                i64::try_from(lifetime_secs)
                    .unwrap_or(i64::MAX)
                    .min(i64::MAX / 1_000),
            ),
            next_id: 1,
            announced_up_to: 0,
            items: Vec::new(),
        }
    }

    /// Shows an alert at `now` and returns its id.
    pub fn push_at(&mut self, kind: AlertKind, message: impl Into<String>, now: DateTime<Utc>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.items.push(Alert {
            id,
            kind,
            message: message.into(),
            shown_at: now,
            expires_at: if kind.auto_dismisses() {
                now.checked_add_signed(self.lifetime)
            } else {
                None
            },
        });
        id
    }

    pub fn push(&mut self, kind: AlertKind, message: impl Into<String>) -> u64 {
        self.push_at(kind, message, Utc::now())
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(AlertKind::Error, message)
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(AlertKind::Success, message)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.push(AlertKind::Warning, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(AlertKind::Info, message)
    }

    /// Closes an alert by hand. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|a| a.id != id);
        self.items.len() != before
    }

    /// Drops expired alerts and returns the ones still visible.
    pub fn active_at(&mut self, now: DateTime<Utc>) -> &[Alert] {
        self.items.retain(|a| !a.is_expired(now));
        &self.items
    }

    /// Visible alerts pushed since the previous call.
    pub fn take_new_at(&mut self, now: DateTime<Utc>) -> Vec<Alert> {
        let since = self.announced_up_to;
        self.announced_up_to = self.next_id - 1;
        self.active_at(now)
            .iter()
            .filter(|a| a.id > since)
            .cloned()
            .collect()
    }

    pub fn take_new(&mut self) -> Vec<Alert> {
        self.take_new_at(Utc::now())
    }

    pub fn active(&mut self) -> &[Alert] {
        self.active_at(Utc::now())
    }

    pub fn render(alerts: &[Alert]) -> String {
        alerts
            .iter()
            .map(|a| format!("{} {}", a.kind.icon(), a.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
