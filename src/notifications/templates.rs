//! Bodies for contact, confirmation and test emails.
//!
//! Anything a visitor typed is escaped before it lands in HTML.

use chrono::{DateTime, Utc};
use html_escape::encode_quoted_attribute as escape_html;

pub const CONFIRMATION_SUBJECT: &str = "Thank you for contacting FarmLink!";
pub const TEST_SUBJECT: &str = "Test Email from FarmLink";
pub const TEST_BODY: &str = "This is a test email from FarmLink server.";

const CONTACT_STYLE: &str = "\
body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
.container { max-width: 600px; margin: 0 auto; padding: 20px; }
.header { background-color: #4CAF50; color: white; padding: 15px; text-align: center; }
.content { padding: 20px; background-color: #f9f9f9; }
.field { margin-bottom: 15px; }
.label { font-weight: bold; color: #4CAF50; }";

const CONFIRMATION_STYLE: &str = "\
body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
.container { max-width: 600px; margin: 0 auto; padding: 20px; }
.header { text-align: center; padding: 20px; background-color: #4CAF50; color: white; border-radius: 10px; }
.content { padding: 30px; background-color: #f9f9f9; border-radius: 0 0 10px 10px; }
.highlight { background-color: #e8f5e9; padding: 15px; border-radius: 5px; margin: 20px 0; border-left: 4px solid #4CAF50; }
.contact-info { background-color: white; padding: 15px; border-radius: 5px; margin: 20px 0; }";

pub fn contact_subject(subject: &str) -> String {
    format!("FarmLink Contact: {}", subject)
}

pub fn contact_html(name: &str, email: &str, subject: &str, message: &str) -> String {
    format!(
        r#"<html>
<head><style>{style}</style></head>
<body>
  <div class="container">
    <div class="header"><h2>New Contact Form Submission</h2></div>
    <div class="content">
      <div class="field"><span class="label">Name:</span> {name}</div>
      <div class="field"><span class="label">Email:</span> {email}</div>
      <div class="field"><span class="label">Subject:</span> {subject}</div>
      <div class="field"><span class="label">Message:</span><br><p>{message}</p></div>
    </div>
  </div>
</body>
</html>"#,
        style = CONTACT_STYLE,
        name = escape_html(name),
        email = escape_html(email),
        subject = escape_html(subject),
        message = escape_html(message),
    )
}

pub fn contact_text(
    name: &str,
    email: &str,
    subject: &str,
    message: &str,
    received_at: DateTime<Utc>,
) -> String {
    format!(
        "New Contact Form Submission\n\n\
         Name: {}\nEmail: {}\nSubject: {}\n\n\
         Message:\n{}\n\n\
         Time received: {}\n",
        name,
        email,
        subject,
        message,
        received_at.format("%Y-%m-%d %H:%M:%S")
    )
}

pub fn confirmation_html(name: &str) -> String {
    format!(
        r#"<html>
<head><style>{style}</style></head>
<body>
  <div class="container">
    <div class="header">
      <h1>🌾 FarmLink</h1>
      <h2>Direct Farmer to Buyer Marketplace</h2>
    </div>
    <div class="content">
      <h3>Hi {name},</h3>
      <p>Thank you for contacting <strong>FarmLink</strong>! We have received your message and our team will get back to you within <strong>24 hours</strong>.</p>
      <div class="highlight">
        <h4>📋 What happens next?</h4>
        <p>1. Our support team reviews your message</p>
        <p>2. We'll respond to your inquiry</p>
        <p>3. If needed, we'll schedule a call to better understand your needs</p>
      </div>
      <div class="contact-info">
        <h4>📞 Need immediate assistance?</h4>
        <p><strong>Phone:</strong> +91 9840994649</p>
        <p><strong>Email:</strong> support@farmlink.com</p>
        <p><strong>Location:</strong> Tirunelvelli, Agriculture City</p>
      </div>
      <p>In the meantime, you can:</p>
      <ul>
        <li>📊 Browse our fresh produce listings</li>
        <li>👥 Connect with farmers directly</li>
        <li>🚚 Explore logistics options</li>
      </ul>
      <p>Best regards,<br><strong>The FarmLink Team</strong></p>
      <hr>
      <p style="color: #666; font-size: 0.9em;">This is an automated message. Please do not reply to this email.</p>
    </div>
  </div>
</body>
</html>"#,
        style = CONFIRMATION_STYLE,
        name = escape_html(name),
    )
}

pub fn confirmation_text(name: &str) -> String {
    format!(
        "Thank you for contacting FarmLink!\n\n\
         Hi {},\n\n\
         Thank you for contacting FarmLink! We have received your message and our team will get back to you within 24 hours.\n\n\
         What happens next?\n\
         1. Our support team reviews your message\n\
         2. We'll respond to your inquiry\n\
         3. If needed, we'll schedule a call to better understand your needs\n\n\
         Need immediate assistance?\n\
         Phone: +91 9840994649\n\
         Email: support@farmlink.com\n\
         Location: Tirunelvelli, Agriculture City\n\n\
         Best regards,\n\
         The FarmLink Team\n\n\
         This is an automated message. Please do not reply to this email.\n",
        name
    )
}
