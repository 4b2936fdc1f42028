//! The accountability-buddy check-in email.
//!
//! Sent to a bet's buddy after the owner checks in. The progress bar shows
//! the weeks completed before the current one.

use crate::mailer::OutgoingEmail;

/// Name used when the owner has no display name.
pub const DEFAULT_OWNER_NAME: &str = "Your friend";

/// Relationship used when the bet has none recorded.
pub const DEFAULT_RELATIONSHIP: &str = "friend";

/// Link target when `APP_URL` is not configured.
pub const DEFAULT_APP_URL: &str = "https://betonyou.app";

/// What the buddy is told about.
#[derive(Debug, Clone, Copy)]
pub struct BuddyCheckin<'a> {
    pub owner_name: Option<&'a str>,
    pub relationship: Option<&'a str>,
    pub habit: &'a str,
    pub current_week: i32,
    pub duration_weeks: i32,
}

/// Percentage of weeks completed before `current_week`, rounded.
pub fn progress_percent(current_week: i32, duration_weeks: i32) -> i64 {
    if duration_weeks <= 0 {
        return 0;
    }
    let completed = f64::from((current_week - 1).max(0));
    (completed / f64::from(duration_weeks) * 100.0).round() as i64
}

pub fn subject(owner_name: &str) -> String {
    format!("{owner_name} just checked in on their habit!")
}

/// Render the check-in email addressed to `to`.
pub fn render(checkin: &BuddyCheckin<'_>, from: &str, to: &str, app_url: &str) -> OutgoingEmail {
    let name = checkin
        .owner_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_OWNER_NAME);
    let relationship = checkin.relationship.unwrap_or(DEFAULT_RELATIONSHIP);

    OutgoingEmail {
        from: from.to_string(),
        to: to.to_string(),
        subject: subject(name),
        html: render_html(
            &escape(name),
            &escape(relationship),
            &escape(checkin.habit),
            checkin.current_week,
            checkin.duration_weeks,
            &escape(app_url),
        ),
    }
}

fn render_html(
    name: &str,
    relationship: &str,
    habit: &str,
    week: i32,
    weeks: i32,
    app_url: &str,
) -> String {
    let percent = progress_percent(week, weeks);
    let completed = (week - 1).max(0);
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Check-in Update</title>
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif; background-color: #f5f5f4; margin: 0; padding: 20px;">
  <div style="max-width: 560px; margin: 0 auto; background-color: white; border-radius: 16px; overflow: hidden;">
    <div style="background: linear-gradient(135deg, #f59e0b, #f97316); padding: 32px; text-align: center;">
      <div style="font-size: 48px; margin-bottom: 8px;">🎯</div>
      <h1 style="color: white; margin: 0; font-size: 24px;">Check-in Update!</h1>
    </div>
    <div style="padding: 32px;">
      <p style="color: #374151; font-size: 16px; line-height: 1.6; margin: 0 0 16px 0;">
        Hey there! Great news from your {relationship}:
      </p>
      <div style="background-color: #fef3c7; border-radius: 12px; padding: 20px; margin: 24px 0;">
        <p style="color: #92400e; font-size: 18px; font-weight: 600; margin: 0 0 8px 0;">{name} just checked in!</p>
        <p style="color: #78350f; font-size: 14px; margin: 0 0 12px 0;"><strong>Habit:</strong> {habit}</p>
        <p style="color: #78350f; font-size: 14px; margin: 0;"><strong>Progress:</strong> Week {week} of {weeks}</p>
      </div>
      <p style="color: #6b7280; font-size: 14px; line-height: 1.6; margin: 0 0 24px 0;">
        Your accountability matters! A quick message of encouragement can make all the difference in helping {name} reach their goal.
      </p>
      <div style="background-color: #e5e7eb; border-radius: 9999px; height: 8px; overflow: hidden; margin-bottom: 8px;">
        <div style="background: linear-gradient(90deg, #f59e0b, #f97316); height: 100%; width: {percent}%; border-radius: 9999px;"></div>
      </div>
      <p style="color: #9ca3af; font-size: 12px; text-align: center; margin: 0 0 24px 0;">{completed} of {weeks} weeks completed</p>
      <div style="text-align: center;">
        <a href="{app_url}" style="display: inline-block; background: linear-gradient(135deg, #f59e0b, #f97316); color: white; text-decoration: none; padding: 12px 32px; border-radius: 8px; font-weight: 600; font-size: 14px;">View on Bet On Yourself</a>
      </div>
    </div>
    <div style="background-color: #f9fafb; padding: 20px 32px; text-align: center; border-top: 1px solid #e5e7eb;">
      <p style="color: #9ca3af; font-size: 12px; margin: 0;">
        You're receiving this because {name} added you as their accountability buddy on Bet On Yourself.
      </p>
    </div>
  </div>
</body>
</html>
"##
    )
}

/// Escape text for inclusion in HTML element content or attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
