//! Notices shown after a redirect.
//!
//! Form handlers redirect with `?success=<code>` or `?error=<code>`; the
//! next page maps the code to a fixed message. Unknown codes show nothing.

use serde::Deserialize;

/// Query parameters carrying a notice code.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// A notice ready for a template.
#[derive(Debug, Clone, Default)]
pub struct Notice {
    pub success: Option<String>,
    pub error: Option<String>,
}

impl NoticeQuery {
    /// Resolve the codes to their messages.
    #[must_use]
    pub fn notice(&self) -> Notice {
        Notice {
            success: self
                .success
                .as_deref()
                .and_then(success_message)
                .map(String::from),
            error: self
                .error
                .as_deref()
                .and_then(error_message)
                .map(String::from),
        }
    }
}

impl Notice {
    /// A notice with only an error message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: None,
            error: Some(message.into()),
        }
    }
}

fn success_message(code: &str) -> Option<&'static str> {
    Some(match code {
        "login" => "Login successful!",
        "registered" => "Registration successful! Please login.",
        "logged_out" => "Logged out successfully.",
        "product_added" => "Product added successfully!",
        "payment" => "Payment successful!",
        "message_sent" => "Message sent!",
        "complaint" => "Complaint submitted!",
        _ => return None,
    })
}

fn error_message(code: &str) -> Option<&'static str> {
    Some(match code {
        "invalid" => "Please fill in every field correctly.",
        "upload" => "Images must be PNG, JPEG, GIF or WebP files.",
        "server" => "Something went wrong. Please try again.",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_resolve() {
        let query = NoticeQuery {
            success: Some("payment".into()),
            error: Some("invalid".into()),
        };
        let notice = query.notice();
        assert_eq!(notice.success.as_deref(), Some("Payment successful!"));
        assert_eq!(
            notice.error.as_deref(),
            Some("Please fill in every field correctly.")
        );
    }

    #[test]
    fn test_unknown_codes_are_dropped() {
        let query = NoticeQuery {
            success: Some("<script>".into()),
            error: None,
        };
        let notice = query.notice();
        assert!(notice.success.is_none());
        assert!(notice.error.is_none());
    }
}
