use reqwest::Client;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("email send failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("email API error: {0}")]
    Api(String),
}

#[derive(Clone)]
pub struct EmailClient {
    client: Client,
    api_key: String,
    from_email: String,
    from_name: String,
}

#[derive(Debug, Serialize)]
struct ResendRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    html: String,
}

impl EmailClient {
    pub fn new(api_key: &str, from_email: &str, from_name: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            from_email: from_email.to_string(),
            from_name: from_name.to_string(),
        }
    }

    pub async fn send_email(&self, to: &str, subject: &str, html: &str) -> Result<(), EmailError> {
        let request = ResendRequest {
            from: format!("{} <{}>", self.from_name, self.from_email),
            to: vec![to.to_string()],
            subject: subject.to_string(),
            html: html.to_string(),
        };

        let response = self
            .client
            .post("https://api.resend.com/emails")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Api(body));
        }

        tracing::debug!(to = %to, subject = %subject, "email sent");
        Ok(())
    }

    /// One template covers both registration and password-reset codes.
    pub async fn send_otp_email(&self, to: &str, code: &str) -> Result<(), EmailError> {
        self.send_email(to, "Your Noice Verification Code", &otp_email_html(to, code))
            .await
    }
}

fn otp_email_html(email: &str, code: &str) -> String {
    format!(
        r#"<div style="max-width:600px; margin:40px auto; background:#ffffff; border-radius:12px; overflow:hidden; border:1px solid #e2e8f0; font-family:Segoe UI, Roboto, sans-serif; color:#0f172a;">
        <div style="background:#0f172a; color:#ffffff; padding:32px 24px; text-align:center;">
            <h1 style="margin:0; font-size:24px;">NOICE</h1>
        </div>
        <div style="padding:32px 24px; text-align:center;">
            <h2 style="font-size:20px; color:#1e293b; margin-bottom:16px;">Verify Your Email Address</h2>
            <p style="font-size:16px; color:#475569; line-height:1.6; margin-bottom:32px;">
                Use the following One-Time Password (OTP) to complete your login or registration process.
            </p>
            <div style="display:inline-block; background:#f1f5f9; padding:20px 32px; border-radius:8px; font-size:28px; font-weight:bold; letter-spacing:6px; color:#1d4ed8; font-family:'Courier New', monospace; margin-bottom:16px;">{code}</div>
            <div style="font-size:14px; color:#64748b; margin-bottom:32px;">This code is valid for the next 5 minutes.</div>
            <div style="background:#fff0f1; color:#b91c1c; padding:16px; border-left:4px solid #dc2626; font-size:14px; line-height:1.6; text-align:left; border-radius:4px;">
                <strong>Security Tip:</strong> Do not share this OTP with anyone. Noice will never ask for your OTP via call, email, or message. If you did not request this, you can safely ignore this message.
            </div>
        </div>
        <div style="background:#f8fafc; padding:24px; font-size:13px; text-align:center; color:#64748b; border-top:1px solid #e2e8f0;">
            This email was sent to {email} by Noice Authentication System.
        </div>
    </div>"#
    )
}
