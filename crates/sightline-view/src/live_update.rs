//! Debounced refresh coordination between the push notification stream
//! and pull re-queries.
//!
//! Each subscription is a tiny state machine (`Idle -> Pending -> Idle`)
//! driven by explicit clock readings, so the whole hub is deterministic
//! and testable without timers. The embedding driver sleeps until
//! [`LiveUpdateHub::next_due`], calls [`LiveUpdateHub::poll_due`], runs
//! the query for each emitted ticket, and checks
//! [`LiveUpdateHub::accept`] again once the response arrives. A late
//! response for a torn-down or navigated-away view must not touch state.

use sightline_core::query::ChangeSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshState {
    Idle,
    Pending { due_at_ms: i64 },
}

#[derive(Debug, Clone)]
struct Subscription {
    id: SubscriptionId,
    view_key: String,
    debounce_ms: u64,
    state: RefreshState,
    coalesced: u64,
    delivered: u64,
    dropped_hidden: u64,
}

/// Permission to run one re-query for one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    pub subscription: SubscriptionId,
    pub view_key: String,
}

/// Observed behavior of one subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionStats {
    /// Signals absorbed into an already-pending window.
    pub coalesced: u64,
    /// Tickets emitted.
    pub delivered: u64,
    /// Timer firings dropped because the view was not visible.
    pub dropped_hidden: u64,
}

#[derive(Debug, Clone, Default)]
pub struct LiveUpdateHub {
    subscriptions: Vec<Subscription>,
    visible: Option<String>,
    next_id: u64,
}

impl LiveUpdateHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, view_key: &str, debounce_ms: u64) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscriptions.push(Subscription {
            id,
            view_key: view_key.to_owned(),
            debounce_ms: debounce_ms.max(1),
            state: RefreshState::Idle,
            coalesced: 0,
            delivered: 0,
            dropped_hidden: 0,
        });
        id
    }

    /// Teardown: drops the subscription and with it any pending timer.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.retain(|sub| sub.id != id);
    }

    /// Record the navigation location the user is looking at now.
    pub fn navigate_to(&mut self, view_key: &str) {
        self.visible = Some(view_key.to_owned());
    }

    #[must_use]
    pub fn visible_view(&self) -> Option<&str> {
        self.visible.as_deref()
    }

    /// Feed one change signal to every subscription. The signal's
    /// session hint is deliberately ignored: a refresh always
    /// re-queries, it never trusts the push payload.
    pub fn on_signal(&mut self, _signal: &ChangeSignal, now_ms: i64) {
        for sub in &mut self.subscriptions {
            match sub.state {
                RefreshState::Idle => {
                    sub.state = RefreshState::Pending {
                        due_at_ms: now_ms.saturating_add(sub.debounce_ms as i64),
                    };
                }
                RefreshState::Pending { .. } => {
                    // Coalesce: no new timer, no queued extra refresh.
                    sub.coalesced += 1;
                }
            }
        }
    }

    /// Earliest pending deadline, for the driver's sleep.
    #[must_use]
    pub fn next_due(&self) -> Option<i64> {
        self.subscriptions
            .iter()
            .filter_map(|sub| match sub.state {
                RefreshState::Pending { due_at_ms } => Some(due_at_ms),
                RefreshState::Idle => None,
            })
            .min()
    }

    /// Fire every timer that is due. Visibility is checked here, at fire
    /// time; a window scheduled for a view the user has since left is
    /// dropped silently.
    pub fn poll_due(&mut self, now_ms: i64) -> Vec<RefreshTicket> {
        let mut tickets = Vec::new();
        for sub in &mut self.subscriptions {
            let RefreshState::Pending { due_at_ms } = sub.state else {
                continue;
            };
            if due_at_ms > now_ms {
                continue;
            }
            sub.state = RefreshState::Idle;
            if self.visible.as_deref() == Some(sub.view_key.as_str()) {
                sub.delivered += 1;
                tickets.push(RefreshTicket {
                    subscription: sub.id,
                    view_key: sub.view_key.clone(),
                });
            } else {
                sub.dropped_hidden += 1;
            }
        }
        tickets
    }

    /// Stale-response guard: may a completed query for this ticket still
    /// apply its result?
    #[must_use]
    pub fn accept(&self, ticket: &RefreshTicket) -> bool {
        self.subscriptions
            .iter()
            .any(|sub| sub.id == ticket.subscription)
            && self.visible.as_deref() == Some(ticket.view_key.as_str())
    }

    #[must_use]
    pub fn stats(&self, id: SubscriptionId) -> Option<SubscriptionStats> {
        self.subscriptions
            .iter()
            .find(|sub| sub.id == id)
            .map(|sub| SubscriptionStats {
                coalesced: sub.coalesced,
                delivered: sub.delivered,
                dropped_hidden: sub.dropped_hidden,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::LiveUpdateHub;
    use sightline_core::query::ChangeSignal;

    const LIST: &str = "events";
    const STATS: &str = "dashboard";

    #[test]
    fn burst_within_one_window_fires_once() {
        let mut hub = LiveUpdateHub::new();
        let id = hub.subscribe(LIST, 250);
        hub.navigate_to(LIST);

        for offset in [0, 10, 50, 100, 200] {
            hub.on_signal(&ChangeSignal::new(), offset);
        }
        assert!(hub.poll_due(249).is_empty());
        let tickets = hub.poll_due(250);
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].view_key, LIST);
        // The window is closed; nothing left to fire.
        assert!(hub.poll_due(10_000).is_empty());

        let stats = hub.stats(id).unwrap_or_default();
        assert_eq!(stats.delivered, 1);
        assert_eq!(stats.coalesced, 4);
    }

    #[test]
    fn coalesced_signals_do_not_extend_the_deadline() {
        let mut hub = LiveUpdateHub::new();
        let _ = hub.subscribe(LIST, 250);
        hub.navigate_to(LIST);
        hub.on_signal(&ChangeSignal::new(), 0);
        hub.on_signal(&ChangeSignal::new(), 240);
        assert_eq!(hub.next_due(), Some(250));
        assert_eq!(hub.poll_due(250).len(), 1);
    }

    #[test]
    fn a_new_window_opens_after_the_previous_fires() {
        let mut hub = LiveUpdateHub::new();
        let _ = hub.subscribe(LIST, 250);
        hub.navigate_to(LIST);
        hub.on_signal(&ChangeSignal::new(), 0);
        assert_eq!(hub.poll_due(250).len(), 1);
        hub.on_signal(&ChangeSignal::new(), 300);
        assert_eq!(hub.next_due(), Some(550));
        assert_eq!(hub.poll_due(550).len(), 1);
    }

    #[test]
    fn signals_after_teardown_produce_no_refresh() {
        let mut hub = LiveUpdateHub::new();
        let id = hub.subscribe(LIST, 250);
        hub.navigate_to(LIST);
        hub.unsubscribe(id);
        hub.on_signal(&ChangeSignal::new(), 0);
        assert!(hub.poll_due(10_000).is_empty());
        assert_eq!(hub.stats(id), None);
    }

    #[test]
    fn hidden_views_drop_their_refresh_silently() {
        let mut hub = LiveUpdateHub::new();
        let id = hub.subscribe(LIST, 250);
        hub.navigate_to(STATS);
        hub.on_signal(&ChangeSignal::new(), 0);
        assert!(hub.poll_due(250).is_empty());
        let stats = hub.stats(id).unwrap_or_default();
        assert_eq!(stats.dropped_hidden, 1);
        assert_eq!(stats.delivered, 0);
    }

    #[test]
    fn visibility_is_checked_at_fire_time_not_schedule_time() {
        let mut hub = LiveUpdateHub::new();
        let _ = hub.subscribe(LIST, 250);
        hub.navigate_to(STATS);
        hub.on_signal(&ChangeSignal::new(), 0);
        // The user navigates to the list before the timer fires.
        hub.navigate_to(LIST);
        assert_eq!(hub.poll_due(250).len(), 1);
    }

    #[test]
    fn per_view_windows_fire_independently() {
        let mut hub = LiveUpdateHub::new();
        let _ = hub.subscribe(LIST, 250);
        let _ = hub.subscribe(STATS, 1_000);
        hub.navigate_to(LIST);
        hub.on_signal(&ChangeSignal::new(), 0);
        assert_eq!(hub.next_due(), Some(250));
        let tickets = hub.poll_due(300);
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].view_key, LIST);
        // The stats window is still pending but hidden when it fires.
        assert!(hub.poll_due(1_000).is_empty());
    }

    #[test]
    fn stale_responses_are_rejected() {
        let mut hub = LiveUpdateHub::new();
        let id = hub.subscribe(LIST, 250);
        hub.navigate_to(LIST);
        hub.on_signal(&ChangeSignal::new(), 0);
        let tickets = hub.poll_due(250);
        assert_eq!(tickets.len(), 1);
        assert!(hub.accept(&tickets[0]));

        hub.navigate_to(STATS);
        assert!(!hub.accept(&tickets[0]));

        hub.navigate_to(LIST);
        hub.unsubscribe(id);
        assert!(!hub.accept(&tickets[0]));
    }
}
