use crate::config::MailConfig;
use crate::domain::model::{Notice, NoticeKind, Submission};
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use chrono::{DateTime, Utc};

const STYLE: &str = r#"
      body { font-family: Arial, sans-serif; line-height: 1.6; background-color: #0d1117; color: #c9d1d9; margin: 0; padding: 0; }
      .container { max-width: 600px; margin: 0 auto; padding: 20px; }
      .header { background-color: #161b22; border: 1px solid #30363d; border-radius: 10px; padding: 20px; margin-bottom: 20px; text-align: center; }
      .content { background-color: #161b22; border: 1px solid #30363d; border-radius: 10px; padding: 20px; }
      .message-box, .note { background-color: #0d1117; border: 1px solid #30363d; border-radius: 8px; padding: 15px; margin-top: 15px; }
      .note { color: #8b949e; font-size: 14px; }
      h1, h2 { color: #58a6ff; margin: 0; }
      .label { color: #8b949e; font-size: 14px; margin-bottom: 5px; }
      .value { color: #c9d1d9; margin-bottom: 15px; }
      .footer { text-align: center; margin-top: 20px; color: #8b949e; font-size: 12px; }
      .stars { color: #fff; font-size: 20px; letter-spacing: 3px; }
"#;

/// 轉義 HTML 特殊字元，使用者輸入一律先經過這裡
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 轉義後把換行轉成 `<br>`
pub fn render_message(message: &str) -> String {
    escape_html(&message.replace("\r\n", "\n")).replace('\n', "<br>")
}

/// 主旨是純文字標頭，只去掉換行
fn subject_text(value: &str) -> String {
    value
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect()
}

fn page(title: &str, heading: &str, content: &str, footer: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
  </head>
  <body>
    <div class="container">
      <div class="header">
        <div class="stars">✧ · . · ✧</div>
        <h1>{heading}</h1>
        <div class="stars">✧ · . · ✧</div>
      </div>
      <div class="content">
{content}
      </div>
      <div class="footer">
        {footer}
        <div class="stars">· · ✧ · ·</div>
      </div>
    </div>
  </body>
</html>
"#,
        title = title,
        style = STYLE,
        heading = heading,
        content = content,
        footer = footer,
    )
}

/// 組合兩封通知信
#[derive(Debug, Clone)]
pub struct NoticeComposer {
    owner_email: String,
    owner_name: Option<String>,
}

impl NoticeComposer {
    pub fn new(owner_email: impl Into<String>) -> Self {
        Self {
            owner_email: owner_email.into(),
            owner_name: None,
        }
    }

    /// 收件確認信以這個名字署名
    pub fn with_owner_name(mut self, owner_name: impl Into<String>) -> Self {
        self.owner_name = Some(owner_name.into());
        self
    }

    /// 寄件顯示名稱只用在 `from`，不會拿來署名
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        let owner_email = validate_required_field("mail.owner_email", &config.owner_email)?;
        let composer = Self::new(owner_email.clone());
        Ok(match config.owner_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => composer.with_owner_name(name),
            _ => composer,
        })
    }

    pub fn owner_email(&self) -> &str {
        &self.owner_email
    }

    /// 寄給網站擁有者的新訊息通知
    pub fn owner_notice(&self, submission: &Submission, received_at: DateTime<Utc>) -> Notice {
        let content = format!(
            r#"        <div>
          <div class="label">From:</div>
          <div class="value">{name} ({email})</div>
        </div>
        <div>
          <div class="label">Received:</div>
          <div class="value">{received}</div>
        </div>
        <div>
          <div class="label">Message:</div>
          <div class="message-box">{message}</div>
        </div>"#,
            name = escape_html(&submission.name),
            email = escape_html(&submission.email),
            received = received_at.format("%Y-%m-%d %H:%M UTC"),
            message = render_message(&submission.message),
        );

        Notice {
            kind: NoticeKind::OwnerNotification,
            recipient: self.owner_email.clone(),
            subject: format!("✧ New Portfolio Message from {} ✧", subject_text(&submission.name)),
            html_body: page(
                "New Portfolio Contact Message",
                "New Contact Message",
                &content,
                "<p>This message was sent from your portfolio contact form</p>",
            ),
        }
    }

    /// 寄給送出者的收件確認
    pub fn acknowledgment(&self, submission: &Submission) -> Notice {
        let content = format!(
            r#"        <div class="message">
          <p>Hi {name},</p>
          <p>Thank you for reaching out! Your message has arrived and I will get back to you as soon as possible.</p>
          <p>I appreciate your interest and look forward to our conversation.</p>
        </div>
        <div class="note">
          <strong>Note:</strong> If this email landed in your spam folder, please mark it as "not spam" so my reply reaches your inbox.
        </div>"#,
            name = escape_html(&submission.name),
        );

        Notice {
            kind: NoticeKind::SubmitterAcknowledgment,
            recipient: submission.email.trim().to_string(),
            subject: match &self.owner_name {
                Some(owner) => format!(
                    "✧ Thank You for Your Message - {} Portfolio ✧",
                    subject_text(owner)
                ),
                None => "✧ Thank You for Your Message ✧".to_string(),
            },
            html_body: match &self.owner_name {
                Some(owner) => {
                    let owner = escape_html(owner);
                    page(
                        &format!("Message Received - {}", owner),
                        "Message Received!",
                        &content,
                        &format!("<p>Best regards,<br>{}</p>", owner),
                    )
                }
                None => page(
                    "Message Received",
                    "Message Received!",
                    &content,
                    "<p>Best regards</p>",
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, DEFAULT_SENDER_NAME};
    use chrono::TimeZone;

    fn ada() -> Submission {
        Submission {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Hi\nthere".to_string(),
        }
    }

    fn composer() -> NoticeComposer {
        NoticeComposer::new("owner@example.com").with_owner_name("Grace Hopper")
    }

    #[test]
    fn test_owner_notice_contains_sender_and_message() {
        let received = Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap();
        let notice = composer().owner_notice(&ada(), received);

        assert_eq!(notice.kind, NoticeKind::OwnerNotification);
        assert_eq!(notice.recipient, "owner@example.com");
        assert_eq!(notice.subject, "✧ New Portfolio Message from Ada ✧");
        assert!(notice.html_body.contains("Ada (ada@example.com)"));
        assert!(notice.html_body.contains("Hi<br>there"));
        assert!(notice.html_body.contains("2026-10-16 08:30 UTC"));
    }

    #[test]
    fn test_acknowledgment_goes_to_submitter() {
        let notice = composer().acknowledgment(&ada());

        assert_eq!(notice.kind, NoticeKind::SubmitterAcknowledgment);
        assert_eq!(notice.recipient, "ada@example.com");
        assert_eq!(
            notice.subject,
            "✧ Thank You for Your Message - Grace Hopper Portfolio ✧"
        );
        assert!(notice.html_body.contains("Hi Ada,"));
        assert!(notice.html_body.contains("Best regards,<br>Grace Hopper"));
    }

    #[test]
    fn test_default_mail_config_does_not_sign_with_sender_name() {
        let config = AppConfig::from_toml_str(
            r#"
[mail]
api_token = "secret"
owner_email = "owner@example.com"
sender_email = "contact@example.com"
"#,
        )
        .unwrap();
        assert_eq!(config.mail.sender_name, DEFAULT_SENDER_NAME);

        let notice = NoticeComposer::from_config(&config.mail)
            .unwrap()
            .acknowledgment(&ada());

        assert_eq!(notice.subject, "✧ Thank You for Your Message ✧");
        assert!(!notice.subject.contains("Portfolio Portfolio"));
        assert!(notice.html_body.contains("<p>Best regards</p>"));
        assert!(!notice.html_body.contains(DEFAULT_SENDER_NAME));
    }

    #[test]
    fn test_owner_name_from_config_signs_acknowledgment() {
        let mut config = AppConfig::from_toml_str(
            r#"
[mail]
api_token = "secret"
owner_email = "owner@example.com"
sender_email = "contact@example.com"
owner_name = "Grace Hopper"
"#,
        )
        .unwrap();

        let notice = NoticeComposer::from_config(&config.mail)
            .unwrap()
            .acknowledgment(&ada());
        assert_eq!(
            notice.subject,
            "✧ Thank You for Your Message - Grace Hopper Portfolio ✧"
        );

        config.mail.owner_email = None;
        assert!(NoticeComposer::from_config(&config.mail).is_err());
    }

    #[test]
    fn test_user_input_is_escaped() {
        let submission = Submission {
            name: "<script>alert(1)</script>".to_string(),
            email: "x@example.com".to_string(),
            message: "a & b\r\n<b>bold</b>".to_string(),
        };
        let notice = composer().owner_notice(&submission, Utc::now());

        assert!(!notice.html_body.contains("<script>"));
        assert!(notice.html_body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(notice.html_body.contains("a &amp; b<br>&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn test_subject_strips_line_breaks() {
        let submission = Submission {
            name: "Ada\r\nBcc: x@example.com".to_string(),
            ..ada()
        };
        let notice = composer().owner_notice(&submission, Utc::now());
        assert!(!notice.subject.contains('\n'));
        assert!(!notice.subject.contains('\r'));
    }
}
