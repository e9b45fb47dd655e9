//! Transactional email via AWS SESv2

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

async fn send_simple(
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

/// COD verification code (15-minute validity)
pub async fn send_cod_verification_code(
    ses: &SesClient,
    from: &str,
    to: &str,
    code: &str,
) -> Result<(), BoxError> {
    let body = format!(
        "Your cash-on-delivery verification code is: {code}\n\
         Valid for 15 minutes.\n\n\
         Enter this code to confirm your order."
    );
    send_simple(ses, from, to, "Confirm your cash-on-delivery order", body).await?;
    tracing::info!(to = to, "COD verification code sent");
    Ok(())
}

/// Password reset code
pub async fn send_password_reset_code(
    ses: &SesClient,
    from: &str,
    to: &str,
    code: &str,
) -> Result<(), BoxError> {
    let body = format!(
        "Your password reset code is: {code}\n\
         Valid for 15 minutes.\n\n\
         If you did not request this, you can ignore this email."
    );
    send_simple(ses, from, to, "Reset your password", body).await?;
    tracing::info!(to = to, "Password reset code sent");
    Ok(())
}

/// Order confirmation after payment or COD verification
pub async fn send_order_confirmation(
    ses: &SesClient,
    from: &str,
    to: &str,
    order_id: &str,
    total: f64,
) -> Result<(), BoxError> {
    let body = format!(
        "Thank you for your order!\n\n\
         Order: {order_id}\n\
         Total: {total:.2}\n\n\
         We will let you know when it ships."
    );
    send_simple(ses, from, to, "Your order is confirmed", body).await?;
    tracing::info!(to = to, order_id = order_id, "Order confirmation sent");
    Ok(())
}

/// Staff notice: a customer asked to cancel an item
pub async fn send_cancel_request_notice(
    ses: &SesClient,
    from: &str,
    to: &str,
    order_id: &str,
    item_name: &str,
    reason: &str,
) -> Result<(), BoxError> {
    let body = format!(
        "A customer requested cancellation.\n\n\
         Order: {order_id}\n\
         Item: {item_name}\n\
         Reason: {reason}\n\n\
         Review it in the admin panel."
    );
    send_simple(ses, from, to, "Cancellation request pending review", body).await?;
    tracing::info!(order_id = order_id, "Cancel request notice sent");
    Ok(())
}
