//! # Email Templates
//!
//! HTML bodies and subject lines for the three transactional messages.
//! Copy is in French, matching the storefront's audience.

use galerie_core::{ArtistNotification, ContactMessage, CustomerConfirmation};

/// Which message is being sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    CustomerConfirmation,
    ArtistNotification,
    ContactForm,
}

/// Subject line for a message
pub fn subject(kind: EmailKind, title_or_subject: &str) -> String {
    match kind {
        EmailKind::CustomerConfirmation => {
            format!("Merci pour votre achat - {}", title_or_subject)
        }
        EmailKind::ArtistNotification => format!("🎨 Nouvelle vente : {}", title_or_subject),
        EmailKind::ContactForm => format!("📧 Contact site : {}", title_or_subject),
    }
}

/// Minimal HTML-escaping for user-supplied text interpolated into templates
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// One label/value row in a details table
fn detail_row(label: &str, value: &str) -> String {
    format!(
        r#"<tr><td style="padding:6px 12px;color:#666;font-weight:600;">{}</td><td style="padding:6px 12px;color:#333;">{}</td></tr>"#,
        label,
        escape(value)
    )
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
</head>
<body style="margin:0;padding:0;background-color:#f5f5f5;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Arial,sans-serif;">
  <div style="max-width:600px;margin:0 auto;background-color:#ffffff;">
    <div style="background:linear-gradient(135deg,#667eea 0%,#764ba2 100%);padding:40px 20px;text-align:center;color:#ffffff;">
      <h1 style="margin:0;font-size:28px;font-weight:600;">{title}</h1>
    </div>
    <div style="padding:40px 30px;">
{body}
    </div>
    <div style="padding:20px 30px;color:#999;font-size:12px;text-align:center;">
      Atelier MNGH
    </div>
  </div>
</body>
</html>"#
    )
}

/// Purchase recap for the buyer
pub fn customer_confirmation_html(data: &CustomerConfirmation) -> String {
    let mut rows = String::new();
    rows.push_str(&detail_row("Œuvre", &data.artwork_title));
    rows.push_str(&detail_row("Prix", &data.artwork_price.display()));
    if let Some(dims) = &data.artwork_dimensions {
        rows.push_str(&detail_row("Dimensions", dims));
    }
    if let Some(technique) = &data.artwork_technique {
        rows.push_str(&detail_row("Technique", technique));
    }

    let image = data
        .artwork_image_url
        .as_ref()
        .map(|url| {
            format!(
                r#"<img src="{}" alt="{}" style="width:100%;max-width:400px;height:auto;border-radius:8px;margin:20px auto;display:block;">"#,
                escape(url),
                escape(&data.artwork_title)
            )
        })
        .unwrap_or_default();

    let shipping = data
        .shipping_address
        .as_ref()
        .and_then(|a| a.display())
        .map(|addr| {
            let name = data
                .shipping_name
                .as_deref()
                .unwrap_or(&data.customer_name);
            format!(
                r#"<p style="color:#666;">Livraison : {} — {}</p>"#,
                escape(name),
                escape(&addr)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"      <p>Bonjour {name},</p>
      <p>Merci pour votre achat ! Votre paiement a bien été confirmé.</p>
{image}
      <div style="background-color:#f9f9f9;border-left:4px solid #667eea;padding:20px;margin:20px 0;border-radius:4px;">
        <table style="width:100%;border-collapse:collapse;">{rows}</table>
      </div>
{shipping}
      <p>L'artiste vous contactera prochainement pour organiser la livraison de votre œuvre.</p>
      <p style="color:#999;font-size:12px;">Référence : {session}</p>"#,
        name = escape(&data.customer_name),
        session = escape(&data.session_id),
    );

    layout("Merci pour votre achat", &body)
}

/// Sale alert for the artist
pub fn artist_notification_html(data: &ArtistNotification) -> String {
    let mut rows = String::new();
    rows.push_str(&detail_row("Œuvre", &data.artwork_title));
    rows.push_str(&detail_row("Prix", &data.artwork_price.display()));
    rows.push_str(&detail_row("Client", &data.customer_name));
    rows.push_str(&detail_row("Email", &data.customer_email));
    if let Some(phone) = &data.customer_phone {
        rows.push_str(&detail_row("Téléphone", phone));
    }
    if let Some(addr) = data.shipping_address.as_ref().and_then(|a| a.display()) {
        rows.push_str(&detail_row("Adresse de livraison", &addr));
    }

    let body = format!(
        r#"      <p>Bonne nouvelle : une œuvre vient d'être vendue !</p>
      <div style="background-color:#f9f9f9;border-left:4px solid #667eea;padding:20px;margin:20px 0;border-radius:4px;">
        <table style="width:100%;border-collapse:collapse;">{rows}</table>
      </div>
      <p>L'œuvre a été automatiquement marquée comme vendue sur le site
      (<code>/oeuvres/{slug}</code>).</p>
      <p>Répondez directement à cet email pour contacter l'acheteur.</p>
      <p style="color:#999;font-size:12px;">Référence : {session}</p>"#,
        slug = escape(&data.artwork_slug),
        session = escape(&data.session_id),
    );

    layout("Nouvelle vente", &body)
}

/// Contact-form relay for the artist
pub fn contact_form_html(data: &ContactMessage) -> String {
    let mut rows = String::new();
    rows.push_str(&detail_row("Nom", &data.name));
    rows.push_str(&detail_row("Email", &data.email));
    rows.push_str(&detail_row("Sujet", &data.subject));

    let body = format!(
        r#"      <p>Nouveau message reçu via le formulaire de contact du site.</p>
      <div style="background-color:#f9f9f9;border-left:4px solid #667eea;padding:20px;margin:20px 0;border-radius:4px;">
        <table style="width:100%;border-collapse:collapse;">{rows}</table>
      </div>
      <p style="white-space:pre-wrap;background-color:#f9f9f9;padding:20px;border-radius:4px;">{message}</p>
      <p>Répondez directement à cet email pour répondre à l'expéditeur.</p>"#,
        message = escape(&data.message),
    );

    layout("Message de contact", &body)
}
