use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A customer contact (email address or phone number) that masks itself in
/// `Debug` and `Display` output.
///
/// Meant for log fields: `tracing::info!(recipient = %Masked(contact), ..)`.
/// Serialization still writes the real value.
#[derive(Clone, Deserialize)]
pub struct Masked<T>(pub T);

impl<T: AsRef<str>> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", mask_contact(self.0.as_ref()))
    }
}

impl<T: AsRef<str>> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", mask_contact(self.0.as_ref()))
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Email keeps the first character of the local part and the domain;
/// anything else keeps only its last two characters.
pub fn mask_contact(raw: &str) -> String {
    if let Some((local, domain)) = raw.split_once('@') {
        let mut chars = local.chars();
        return match chars.next() {
            Some(first) => format!("{}{}@{}", first, "*".repeat(chars.count()), domain),
            None => format!("@{}", domain),
        };
    }

    let count = raw.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = raw.chars().skip(count - 2).collect();
    format!("{}{}", "*".repeat(count - 2), tail)
}
