//! Reminder mail rendering.

use jam3ya_shared::OutgoingMessage;

use crate::ledger::Member;

/// Renders the plain-text reminder for a member who has not paid for `year`.
#[must_use]
pub fn render_reminder(
    member: &Member,
    year: i32,
    fund_name: &str,
    base_url: &str,
) -> OutgoingMessage {
    let link = format!("{}/jam3ya", base_url.trim_end_matches('/'));
    let subject = format!("{fund_name} (تذكير)");
    let body = format!(
        "مرحباً {name}،\n\n\
         هذا تذكير ودي بالمساهمة السنوية عن سنة {year}، حيث يظهر لدينا أنك لم تسدد حتى الآن.\n\
         نرجو المبادرة بالسداد جزاكم الله خيراً.\n\n\
         لمزيد من التفاصيل، يمكنكم زيارة صفحة الجمعية:\n{link}\n\n\
         مع التحيات،\nإدارة {fund_name}\n",
        name = member.name.trim(),
    );
    OutgoingMessage::new(subject, body)
}
