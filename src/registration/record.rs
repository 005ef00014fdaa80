use serde::{Deserialize, Serialize};

/// A participant registration as delivered by the host application's
/// record-creation hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub first_name: String,
    #[serde(default)]
    pub nick_name: Option<String>,
    pub email: String,
    pub race_number: u32,
    /// Intended payment in whole currency units.
    pub intended_payment: u32,
    /// Free text from the form; carried along, never validated.
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl Registration {
    pub fn new(
        first_name: impl Into<String>,
        email: impl Into<String>,
        race_number: u32,
        intended_payment: u32,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            nick_name: None,
            email: email.into(),
            race_number,
            intended_payment,
            payment_method: None,
        }
    }

    pub fn nick_name(mut self, nick_name: impl Into<String>) -> Self {
        self.nick_name = Some(nick_name.into());
        self
    }

    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    /// Nickname if given, otherwise first name.
    pub fn display_name(&self) -> &str {
        match self.nick_name.as_deref().map(str::trim) {
            Some(nick) if !nick.is_empty() => nick,
            _ => self.first_name.trim(),
        }
    }

    /// Unstructured message identifying the registration: `name race email`.
    pub fn remittance_text(&self) -> String {
        format!("{} {} {}", self.display_name(), self.race_number, self.email.trim())
    }
}
