use postbox_common::ContactMessage;

/// One formatted operator notification for a submitted contact message.
///
/// Built once per submission; transports render it onto their own wire
/// format without reformatting. Formatting is cheap and never suspends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Name of the visitor who submitted the message
    pub sender_name: String,
    /// Address the operator can reply to
    pub sender_email: String,
    /// The submitted message body, verbatim
    pub content: String,
    /// Subject line for the operator's inbox
    pub subject: String,
    /// Plain-text body combining the visitor details and message
    pub body: String,
}

impl Notification {
    /// Format the notification for one message.
    #[must_use]
    pub fn for_message(message: &ContactMessage) -> Self {
        let subject = format!("Portfolio contact from {}", message.name);
        let body = format!(
            "Name: {}\nEmail: {}\n\n{}\n",
            message.name, message.sender_email, message.content
        );

        Self {
            sender_name: message.name.clone(),
            sender_email: message.sender_email.clone(),
            content: message.content.clone(),
            subject,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_subject_names_the_visitor() {
        let notification =
            Notification::for_message(&ContactMessage::new("Ana", "ana@x.com", "Hello"));
        assert_eq!(notification.subject, "Portfolio contact from Ana");
    }

    #[test]
    fn test_body_carries_reply_details_and_content() {
        let notification =
            Notification::for_message(&ContactMessage::new("Ana", "ana@x.com", "Hello"));
        assert_eq!(notification.body, "Name: Ana\nEmail: ana@x.com\n\nHello\n");
        assert_eq!(notification.content, "Hello");
        assert_eq!(notification.sender_email, "ana@x.com");
    }
}
