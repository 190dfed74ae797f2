use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new_random() -> Self {
                Self(random_id())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(AffiliateId);
string_id!(LinkId);
string_id!(ProductId);
string_id!(
    /// Ordered lexicographically; the attribution tie-break relies on `Ord`.
    ClickId
);
string_id!(OrderId);
string_id!(ConversionId);
string_id!(WithdrawalId);
string_id!(EntryId);

/// Opaque visitor identity (hashed IP+UA or cookie id); the producer decides.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisitorFingerprint(pub String);

impl VisitorFingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VisitorFingerprint {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

fn random_id() -> String {
    #[cfg(feature = "uuid")]
    {
        uuid::Uuid::new_v4().to_string()
    }
    // Non-uuid builds fall back to a short random token.
    #[cfg(not(feature = "uuid"))]
    {
        format!("id_{}", nanoid::nanoid!())
    }
}
