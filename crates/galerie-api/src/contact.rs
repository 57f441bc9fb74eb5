//! # Contact Form Validation
//!
//! Field validation for the contact endpoint. Inputs are trimmed, bounded,
//! and the email address gets a shape check before the message is relayed.

use galerie_core::ContactMessage;

const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 254;
const MAX_SUBJECT_LEN: usize = 200;
const MAX_MESSAGE_LEN: usize = 5_000;
const MIN_MESSAGE_LEN: usize = 10;

/// Raw contact form submission
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// Validate a submission and normalize it into a relayable message
pub fn validate(form: &ContactForm) -> Result<ContactMessage, String> {
    let name = form.name.trim();
    let email = form.email.trim();
    let subject = form.subject.trim();
    let message = form.message.trim();

    if name.is_empty() {
        return Err("Le nom est requis".to_string());
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err("Le nom est trop long".to_string());
    }

    if email.is_empty() {
        return Err("L'adresse email est requise".to_string());
    }
    if email.len() > MAX_EMAIL_LEN || !is_plausible_email(email) {
        return Err("L'adresse email est invalide".to_string());
    }

    if subject.is_empty() {
        return Err("Le sujet est requis".to_string());
    }
    if subject.chars().count() > MAX_SUBJECT_LEN {
        return Err("Le sujet est trop long".to_string());
    }

    if message.chars().count() < MIN_MESSAGE_LEN {
        return Err("Le message doit contenir au moins 10 caractères".to_string());
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err("Le message est trop long".to_string());
    }

    Ok(ContactMessage {
        name: name.to_string(),
        email: email.to_string(),
        subject: subject.to_string(),
        message: message.to_string(),
    })
}

/// Shape check only: one `@`, non-empty local part, a dot in the domain.
/// Deliverability is the mail provider's problem.
fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || email.contains(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Jean Dupont".into(),
            email: "jean@example.com".into(),
            subject: "Question sur une œuvre".into(),
            message: "Bonjour, la toile est-elle encadrée ?".into(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        let msg = validate(&form()).unwrap();
        assert_eq!(msg.name, "Jean Dupont");
        assert_eq!(msg.email, "jean@example.com");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let mut f = form();
        f.name = "  Jean Dupont  ".into();
        f.email = " jean@example.com ".into();

        let msg = validate(&f).unwrap();
        assert_eq!(msg.name, "Jean Dupont");
        assert_eq!(msg.email, "jean@example.com");
    }

    #[test]
    fn test_missing_name_rejected() {
        let mut f = form();
        f.name = "   ".into();
        assert!(validate(&f).is_err());
    }

    #[test]
    fn test_bad_email_shapes_rejected() {
        for bad in ["jean", "jean@", "@example.com", "jean@example", "a b@c.fr"] {
            let mut f = form();
            f.email = bad.into();
            assert!(validate(&f).is_err(), "accepted: {}", bad);
        }
    }

    #[test]
    fn test_short_message_rejected() {
        let mut f = form();
        f.message = "Bonjour".into();
        assert!(validate(&f).is_err());
    }

    #[test]
    fn test_overlong_message_rejected() {
        let mut f = form();
        f.message = "a".repeat(MAX_MESSAGE_LEN + 1);
        assert!(validate(&f).is_err());
    }
}
