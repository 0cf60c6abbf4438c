//! Claim notification message

/// Rendered message, ready for a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl ClaimMessage {
    pub fn render(to: &str, item_title: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: subject(item_title),
            html: html_body(item_title),
        }
    }
}

pub fn subject(item_title: &str) -> String {
    format!("Item Claim Notification: \"{}\"", item_title)
}

pub fn html_body(item_title: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Item Claim Notification</h2>
  <p>Hello,</p>
  <p>Someone has successfully verified the product code for your found item: <strong>"{title}"</strong>.</p>
  <p>They may contact you soon to arrange collection of the item.</p>

  <div style="background-color: #fff3cd; border-left: 4px solid #ffc107; padding: 12px; margin: 16px 0;">
    <h3 style="margin-top: 0; color: #856404;">SECURITY REMINDER</h3>
    <p>When returning found items:</p>
    <ul style="padding-left: 20px;">
      <li>Ask questions that only the true owner would know about the item</li>
      <li>Consider meeting in a public place for safety</li>
      <li>Only return the item if you're confident about the person's authenticity</li>
    </ul>
  </div>

  <p>Thank you for using Back2u!</p>
  <p>Best regards,<br>Back2u Team</p>
</div>
"#,
        title = escape_html(item_title)
    )
}

/// Item titles are user input
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
