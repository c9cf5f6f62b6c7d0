//! The conversation state machine. Each inbound (sender, text) pair resolves
//! to exactly one reply string; every error taxonomy entry collapses to
//! message content here, never to a transport-level failure.

use std::sync::Arc;

use crate::admin::{parse_admin_command, AdminCommand};
use crate::clock::Clock;
use crate::domain::roster::{Role, Roster};
use crate::gateway::TimesheetGateway;
use crate::intent::{Intent, IntentMatcher};
use crate::parse::parse_shift_message;
use crate::pending::{PendingAction, PendingKind, PendingStore};
use crate::replies;

const RECENT_ENTRY_LIMIT: usize = 5;

pub struct ConversationController<G> {
    roster: Roster,
    matcher: IntentMatcher,
    pending: Arc<dyn PendingStore>,
    gateway: Arc<G>,
    clock: Arc<dyn Clock>,
}

impl<G> ConversationController<G>
where
    G: TimesheetGateway,
{
    pub fn new(
        roster: Roster,
        pending: Arc<dyn PendingStore>,
        gateway: Arc<G>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { roster, matcher: IntentMatcher::with_default_rules(), pending, gateway, clock }
    }

    pub async fn handle_message(&self, sender_id: &str, body: &str) -> String {
        let Some(role) = self.roster.role_of(sender_id) else {
            return replies::denied();
        };

        let message = body.trim().to_lowercase();

        match self.matcher.classify(&message) {
            Intent::Admin if role == Role::Admin => self.handle_admin(&message).await,
            Intent::Affirmative => self.confirm_pending(sender_id).await,
            Intent::Negative => self.cancel_pending(sender_id),
            Intent::TimeEntry => self.handle_time_entry(sender_id, &message),
            Intent::Help => replies::help_text(role == Role::Admin),
            Intent::Admin | Intent::Unknown => replies::usage_hint(),
        }
    }

    fn handle_time_entry(&self, sender_id: &str, message: &str) -> String {
        let record = match parse_shift_message(message, self.clock.today()) {
            Ok(record) => record,
            Err(_) => return replies::format_help(),
        };

        let prompt = replies::confirmation_prompt(&record);
        // Silently replaces any earlier unconfirmed request from this sender.
        self.pending.put(PendingAction {
            sender_id: sender_id.to_owned(),
            kind: PendingKind::TimeEntry,
            record,
        });
        prompt
    }

    async fn confirm_pending(&self, sender_id: &str) -> String {
        let Some(action) = self.pending.take(sender_id) else {
            return replies::nothing_pending();
        };

        // The action stays cleared whether or not the write lands; a failed
        // write asks the user to resend rather than retrying forever.
        match self.gateway.append_entry(&action.record).await {
            Ok(()) => replies::saved_summary(&action.record),
            Err(_) => replies::save_failed(),
        }
    }

    fn cancel_pending(&self, sender_id: &str) -> String {
        match self.pending.take(sender_id) {
            Some(_) => replies::cancelled(),
            None => replies::nothing_pending(),
        }
    }

    async fn handle_admin(&self, message: &str) -> String {
        match parse_admin_command(message) {
            AdminCommand::Help => replies::admin_help(),
            AdminCommand::Status => {
                let connected = self.gateway.probe().await.is_ok();
                replies::admin_status(
                    self.roster.entries(),
                    self.pending.pending_count(),
                    connected,
                )
            }
            AdminCommand::Stats => match self.gateway.stats().await {
                Ok(stats) => replies::admin_stats(&stats),
                Err(_) => replies::admin_unavailable(),
            },
            AdminCommand::Test => replies::admin_test(self.gateway.probe().await.is_ok()),
            AdminCommand::Clear => replies::admin_clear(self.pending.clear_all()),
            AdminCommand::Last => match self.gateway.recent_entries(RECENT_ENTRY_LIMIT).await {
                Ok(entries) => replies::admin_last(&entries),
                Err(_) => replies::admin_unavailable(),
            },
            AdminCommand::Unknown(command) => replies::admin_unknown(&command),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::clock::FixedClock;
    use crate::domain::roster::Roster;
    use crate::domain::shift::{ShiftCategory, ShiftRecord};
    use crate::gateway::{GatewayError, SheetStats, StoredEntry, TimesheetGateway};
    use crate::pending::{InMemoryPendingStore, PendingStore};

    use super::ConversationController;

    const USER: &str = "+447700900001";
    const ADMIN: &str = "+447700900002";
    const STRANGER: &str = "+15550000000";

    #[derive(Default)]
    struct RecordingGateway {
        appended: Mutex<Vec<ShiftRecord>>,
        fail_writes: AtomicBool,
        unreachable: AtomicBool,
    }

    #[async_trait]
    impl TimesheetGateway for RecordingGateway {
        async fn append_entry(&self, record: &ShiftRecord) -> Result<(), GatewayError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(GatewayError::Request("injected write failure".to_owned()));
            }
            self.appended.lock().expect("lock").push(record.clone());
            Ok(())
        }

        async fn stats(&self) -> Result<SheetStats, GatewayError> {
            Ok(SheetStats { data_rows: 4, last_entry_date: Some("2025-06-02".to_owned()) })
        }

        async fn recent_entries(&self, limit: usize) -> Result<Vec<StoredEntry>, GatewayError> {
            Ok(vec![
                StoredEntry {
                    date: "2025-06-02".to_owned(),
                    start_time: "07:30".to_owned(),
                    end_time: "16:00".to_owned(),
                };
                limit.min(1)
            ])
        }

        async fn probe(&self) -> Result<(), GatewayError> {
            if self.unreachable.load(Ordering::SeqCst) {
                return Err(GatewayError::Request("injected outage".to_owned()));
            }
            Ok(())
        }
    }

    struct Harness {
        controller: ConversationController<RecordingGateway>,
        gateway: Arc<RecordingGateway>,
        pending: Arc<InMemoryPendingStore>,
    }

    fn harness() -> Harness {
        let gateway = Arc::new(RecordingGateway::default());
        let pending = Arc::new(InMemoryPendingStore::new());
        let clock = FixedClock(NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date"));
        let controller = ConversationController::new(
            Roster::new(USER, ADMIN),
            pending.clone() as Arc<dyn PendingStore>,
            gateway.clone(),
            Arc::new(clock),
        );
        Harness { controller, gateway, pending }
    }

    #[tokio::test]
    async fn unauthorized_sender_gets_denial_and_no_state_change() {
        let h = harness();

        let reply = h.controller.handle_message(STRANGER, "worked 7:30 till 16:00").await;

        assert!(reply.contains("not registered"));
        assert_eq!(h.pending.pending_count(), 0);
        assert!(h.gateway.appended.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn time_request_parks_a_pending_action_and_prompts() {
        let h = harness();

        let reply = h.controller.handle_message(USER, "worked 7:30 till 17:00").await;

        assert!(reply.contains("Please confirm"));
        assert!(reply.contains("Total pay: £381.67"));
        assert_eq!(h.pending.pending_count(), 1);
        assert!(h.gateway.appended.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn yes_commits_the_pending_entry_and_clears_it() {
        let h = harness();
        h.controller.handle_message(USER, "worked 7:30 till 16:00").await;

        let reply = h.controller.handle_message(USER, "yes").await;

        assert!(reply.contains("Saved!"));
        assert_eq!(h.pending.pending_count(), 0);
        let appended = h.gateway.appended.lock().expect("lock");
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].total_hours, Decimal::new(85, 1));
    }

    #[tokio::test]
    async fn resending_before_confirming_overwrites_and_commits_only_the_latest() {
        let h = harness();
        h.controller.handle_message(USER, "worked 7:30 till 16:00").await;
        h.controller.handle_message(USER, "worked 7:30 till 17:00").await;

        assert_eq!(h.pending.pending_count(), 1);
        h.controller.handle_message(USER, "yes").await;

        let appended = h.gateway.appended.lock().expect("lock");
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].overtime_hours, Decimal::ONE);
    }

    #[tokio::test]
    async fn confirming_with_nothing_pending_mutates_nothing() {
        let h = harness();

        let reply = h.controller.handle_message(USER, "yes").await;

        assert!(reply.contains("Nothing is waiting"));
        assert!(h.gateway.appended.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn no_cancels_the_pending_action() {
        let h = harness();
        h.controller.handle_message(USER, "worked normal day").await;

        let reply = h.controller.handle_message(USER, "no").await;

        assert!(reply.contains("Cancelled"));
        assert_eq!(h.pending.pending_count(), 0);
        assert!(h.gateway.appended.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn failed_write_still_clears_the_pending_action() {
        let h = harness();
        h.controller.handle_message(USER, "worked normal day").await;
        h.gateway.fail_writes.store(true, std::sync::atomic::Ordering::SeqCst);

        let reply = h.controller.handle_message(USER, "yes").await;

        assert!(reply.contains("could not be saved"));
        assert_eq!(h.pending.pending_count(), 0);

        // A follow-up YES reports nothing pending rather than retrying.
        let reply = h.controller.handle_message(USER, "yes").await;
        assert!(reply.contains("Nothing is waiting"));
    }

    #[tokio::test]
    async fn unparseable_time_message_gets_format_help_without_pending_state() {
        let h = harness();

        let reply = h.controller.handle_message(USER, "worked 25:00 till 16:00").await;

        assert!(reply.contains("Time format help"));
        assert_eq!(h.pending.pending_count(), 0);
    }

    #[tokio::test]
    async fn weekend_confirmation_reports_flat_pay() {
        let h = harness();

        h.controller.handle_message(USER, "worked 8:00 till 13:00 saturday").await;
        let reply = h.controller.handle_message(USER, "yes").await;

        assert!(reply.contains("Weekend shift"));
        let appended = h.gateway.appended.lock().expect("lock");
        assert_eq!(appended[0].category, ShiftCategory::Weekend);
        assert_eq!(appended[0].total_pay, Decimal::new(32_011, 2));
    }

    #[tokio::test]
    async fn help_reply_differs_for_admin() {
        let h = harness();

        let user_help = h.controller.handle_message(USER, "help").await;
        let admin_help = h.controller.handle_message(ADMIN, "status").await;

        assert!(!user_help.contains("admin help"));
        assert!(admin_help.contains("admin help"));
    }

    #[tokio::test]
    async fn admin_prefix_is_usage_hint_for_the_standard_user() {
        let h = harness();

        let reply = h.controller.handle_message(USER, "admin clear").await;

        assert!(reply.contains("Send your hours"));
    }

    #[tokio::test]
    async fn admin_status_reports_roster_pending_and_connectivity() {
        let h = harness();
        h.controller.handle_message(USER, "worked normal day").await;

        let reply = h.controller.handle_message(ADMIN, "admin status").await;

        assert!(reply.contains(USER));
        assert!(reply.contains(ADMIN));
        assert!(reply.contains("Pending confirmations: 1"));
        assert!(reply.contains("connection: ok"));
    }

    #[tokio::test]
    async fn admin_status_flags_an_unreachable_store() {
        let h = harness();
        h.gateway.unreachable.store(true, std::sync::atomic::Ordering::SeqCst);

        let reply = h.controller.handle_message(ADMIN, "admin status").await;

        assert!(reply.contains("unreachable"));
    }

    #[tokio::test]
    async fn admin_clear_wipes_every_senders_pending_action() {
        let h = harness();
        h.controller.handle_message(USER, "worked normal day").await;
        h.controller.handle_message(ADMIN, "worked normal day").await;

        let reply = h.controller.handle_message(ADMIN, "admin clear").await;

        assert!(reply.contains("Cleared 2"));
        assert_eq!(h.pending.pending_count(), 0);
        assert!(h.gateway.appended.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn admin_stats_and_last_render_store_readbacks() {
        let h = harness();

        let stats = h.controller.handle_message(ADMIN, "admin stats").await;
        let last = h.controller.handle_message(ADMIN, "admin last").await;

        assert!(stats.contains("4 data row(s)"));
        assert!(stats.contains("2025-06-02"));
        assert!(last.contains("07:30-16:00"));
    }

    #[tokio::test]
    async fn unknown_admin_subcommand_is_reported() {
        let h = harness();

        let reply = h.controller.handle_message(ADMIN, "admin reboot").await;

        assert!(reply.contains("Unknown admin command"));
    }

    #[tokio::test]
    async fn unrelated_text_gets_the_usage_hint() {
        let h = harness();

        let reply = h.controller.handle_message(USER, "hello").await;

        assert!(reply.contains("Send your hours"));
    }
}
