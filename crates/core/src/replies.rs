//! Every user-visible message in one place. The channel protocol has no
//! error status, only message content, so each outcome (including every
//! failure) renders to one of these strings.

use rust_decimal::Decimal;

use crate::domain::roster::RosterEntry;
use crate::domain::shift::{ShiftCategory, ShiftRecord};
use crate::gateway::{SheetStats, StoredEntry};

pub fn denied() -> String {
    "Sorry, this number is not registered with this timesheet service.".to_owned()
}

pub fn usage_hint() -> String {
    "⏰ Send your hours: 'worked 7:30 till 17:00'\n\
     📱 Or try: 'worked normal day'\n\
     ❓ Send 'help' for more commands"
        .to_owned()
}

pub fn format_help() -> String {
    "⏰ Time format help:\n\n\
     ✅ 'worked 7:30 till 16:00' (normal day)\n\
     ✅ 'worked 7:30 till 17:00' (1hr overtime)\n\
     ✅ 'worked 8:00 till 13:00 Saturday'\n\
     ✅ 'worked normal day'\n\n\
     📝 Use 24-hour format (17:00 not 5pm)"
        .to_owned()
}

pub fn help_text(is_admin: bool) -> String {
    let mut text = "👋 Timesheet bot commands:\n\n\
         ⏰ 'worked 7:30 till 16:00' - report a day\n\
         📅 'worked normal day' - the standard 07:30-16:00 day\n\
         🗓️ 'worked 8:00 till 13:00 saturday' - weekend shift\n\
         ✅ Reply YES/NO to a confirmation prompt\n\
         ❓ 'help' - this message"
        .to_owned();
    if is_admin {
        text.push_str("\n🛠️ 'admin help' - maintenance commands");
    }
    text
}

pub fn nothing_pending() -> String {
    "ℹ️ Nothing is waiting for confirmation. Send your hours first.".to_owned()
}

pub fn cancelled() -> String {
    "❌ Cancelled. Nothing was saved.".to_owned()
}

pub fn save_failed() -> String {
    "⚠️ Your entry could not be saved to the timesheet. \
     Please send it again later, or contact the office if this keeps happening."
        .to_owned()
}

/// Generic fallback when processing itself fails; the channel must always
/// receive a well-formed message.
pub fn apology() -> String {
    "😕 Something went wrong handling that message. Please try again.".to_owned()
}

pub fn confirmation_prompt(record: &ShiftRecord) -> String {
    let mut text = format!(
        "📋 Please confirm:\n\n📅 Date: {}\n",
        record.date.format("%d %B %Y")
    );

    match record.category {
        ShiftCategory::Weekend => {
            text.push_str(&format!(
                "🗓️ Weekend shift: {start}-{end}\n\
                 ⏱️ Hours: {hours} (flat rate)\n\
                 💷 Pay: £{pay}\n",
                start = record.start_time.format("%H:%M"),
                end = record.end_time.format("%H:%M"),
                hours = format_hours(record.paid_hours),
                pay = format_money(record.total_pay),
            ));
        }
        ShiftCategory::Weekday | ShiftCategory::WeekdayStandard => {
            text.push_str(&format!(
                "⏰ Shift: {start}-{end}\n⏱️ Total hours: {total}\n",
                start = record.start_time.format("%H:%M"),
                end = record.end_time.format("%H:%M"),
                total = format_hours(record.total_hours),
            ));
            if record.has_lunch_deduction() {
                text.push_str(&format!(
                    "🥪 Paid hours: {} (1hr lunch deducted)\n",
                    format_hours(record.paid_hours)
                ));
            } else {
                text.push_str(&format!(
                    "⏱️ Paid hours: {}\n",
                    format_hours(record.paid_hours)
                ));
            }
            text.push_str(&format!("💷 Day rate: £{}\n", format_money(crate::pay::daily_rate())));
            if record.overtime_hours > Decimal::ZERO {
                text.push_str(&format!(
                    "⏫ Overtime: {hours}hr = £{pay}\n",
                    hours = format_hours(record.overtime_hours),
                    pay = format_money(record.overtime_pay()),
                ));
            }
            text.push_str(&format!("💰 Total pay: £{}\n", format_money(record.total_pay)));
        }
    }

    text.push_str("\nReply YES to save or NO to cancel");
    text
}

pub fn saved_summary(record: &ShiftRecord) -> String {
    let date = record.date.format("%d %B %Y");
    match record.category {
        ShiftCategory::Weekend => format!(
            "✅ Saved! Weekend shift on {date}: {hours} hours, £{pay} flat.",
            hours = format_hours(record.paid_hours),
            pay = format_money(record.total_pay),
        ),
        ShiftCategory::WeekdayStandard => format!(
            "✅ Saved! Normal day on {date}: {hours} paid hours, £{pay}.",
            hours = format_hours(record.paid_hours),
            pay = format_money(record.total_pay),
        ),
        ShiftCategory::Weekday => format!(
            "✅ Saved! {date}: {hours} paid hours, £{pay}.",
            hours = format_hours(record.paid_hours),
            pay = format_money(record.total_pay),
        ),
    }
}

pub fn admin_help() -> String {
    "🛠️ Admin commands:\n\n\
     • admin status - identities, pending count, connectivity\n\
     • admin stats - stored row count and last entry date\n\
     • admin test - probe the timesheet connection\n\
     • admin clear - drop ALL pending confirmations\n\
     • admin last - show the 5 most recent rows"
        .to_owned()
}

pub fn admin_status(entries: &[RosterEntry], pending_count: usize, connected: bool) -> String {
    let mut text = "🛠️ Status:\n".to_owned();
    for entry in entries {
        text.push_str(&format!("👤 {} ({})\n", entry.identity, entry.role.label()));
    }
    text.push_str(&format!("⏳ Pending confirmations: {pending_count}\n"));
    text.push_str(if connected {
        "🔌 Timesheet connection: ok"
    } else {
        "🔌 Timesheet connection: unreachable"
    });
    text
}

pub fn admin_stats(stats: &SheetStats) -> String {
    format!(
        "📊 Timesheet: {} data row(s). Last entry: {}.",
        stats.data_rows,
        stats.last_entry_date.as_deref().unwrap_or("none")
    )
}

pub fn admin_test(reachable: bool) -> String {
    if reachable {
        "🔍 Connectivity test completed: store responded.".to_owned()
    } else {
        "🔍 Connectivity test completed: store did not respond.".to_owned()
    }
}

pub fn admin_clear(dropped: usize) -> String {
    format!("🧹 Cleared {dropped} pending confirmation(s).")
}

pub fn admin_last(entries: &[StoredEntry]) -> String {
    if entries.is_empty() {
        return "📄 No rows stored yet.".to_owned();
    }
    let mut text = "📄 Most recent rows:\n".to_owned();
    for entry in entries {
        text.push_str(&format!(
            "• {} {}-{}\n",
            entry.date, entry.start_time, entry.end_time
        ));
    }
    text.trim_end().to_owned()
}

pub fn admin_unavailable() -> String {
    "⚠️ Could not reach the timesheet store. Try 'admin test' to probe the connection.".to_owned()
}

pub fn admin_unknown(command: &str) -> String {
    format!("❓ Unknown admin command `{command}`. Send 'admin help' for the list.")
}

fn format_hours(hours: Decimal) -> String {
    format!("{hours:.1}")
}

fn format_money(amount: Decimal) -> String {
    format!("{amount:.2}")
}
