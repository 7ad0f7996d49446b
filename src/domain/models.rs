/// A user as shown in the directory.
///
/// Values are immutable once built; a new fetch replaces the whole list.
/// Optional contact fields that the server omitted stay `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl User {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            username: None,
            email: None,
            phone: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Best available way to reach the user: email, then phone.
    pub fn display_contact(&self) -> &str {
        self.email
            .as_deref()
            .or(self.phone.as_deref())
            .unwrap_or("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_has_no_contact_fields() {
        let user = User::new(7, "Ada");
        assert_eq!(user.id, 7);
        assert_eq!(user.name, "Ada");
        assert!(user.username.is_none());
        assert!(user.email.is_none());
        assert!(user.phone.is_none());
    }

    #[test]
    fn test_display_contact_prefers_email() {
        let user = User::new(1, "Ada").with_email("ada@x.com").with_phone("555-0100");
        assert_eq!(user.display_contact(), "ada@x.com");

        let user = User::new(2, "Grace").with_phone("555-0101");
        assert_eq!(user.display_contact(), "555-0101");

        assert_eq!(User::new(3, "Linus").display_contact(), "-");
    }
}
