//! Transactional email over AWS SES. All sends are best-effort: callers log
//! failures and carry on.

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use rust_decimal::Decimal;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

async fn send(
    ses: &SesClient,
    from: &str,
    to: &str,
    subject: &str,
    body_text: String,
) -> Result<(), BoxError> {
    let subject = Content::builder().data(subject).build()?;

    let body = Body::builder()
        .text(Content::builder().data(body_text).build()?)
        .build();

    let message = Message::builder().subject(subject).body(body).build();

    ses.send_email()
        .from_email_address(from)
        .destination(Destination::builder().to_addresses(to).build())
        .content(EmailContent::builder().simple(message).build())
        .send()
        .await?;

    Ok(())
}

pub async fn send_welcome(
    ses: &SesClient,
    from: &str,
    to: &str,
    company_name: &str,
) -> Result<(), BoxError> {
    let body = format!(
        "Welcome to FreightExpo, {company_name}!\n\n\
         Your account is ready. Browse upcoming events, book booths and\n\
         tickets, and manage your membership from your dashboard."
    );
    send(ses, from, to, "Welcome to FreightExpo", body).await?;
    tracing::info!(to = to, "Welcome email sent");
    Ok(())
}

pub async fn send_order_confirmation(
    ses: &SesClient,
    from: &str,
    to: &str,
    order_id: i64,
    invoice_number: &str,
    total: Decimal,
) -> Result<(), BoxError> {
    let body = format!(
        "Your order #{order_id} has been confirmed.\n\n\
         Invoice: {invoice_number}\n\
         Total: ${total}\n\n\
         Thank you for your business."
    );
    send(ses, from, to, "FreightExpo order confirmation", body).await?;
    tracing::info!(to = to, order_id, "Order confirmation sent");
    Ok(())
}

pub async fn send_inquiry_ack(
    ses: &SesClient,
    from: &str,
    to: &str,
    name: &str,
    subject_line: &str,
) -> Result<(), BoxError> {
    let body = format!(
        "Hi {name},\n\n\
         We received your inquiry (\"{subject_line}\") and will get back to\n\
         you within two business days.\n\n\
         The FreightExpo team"
    );
    send(ses, from, to, "We received your inquiry", body).await?;
    tracing::info!(to = to, "Inquiry acknowledgement sent");
    Ok(())
}
