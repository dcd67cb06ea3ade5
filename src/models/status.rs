//! String-backed enums stored in the text columns of the record tables.

use serde::{Deserialize, Serialize};

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }
    };
}

string_enum!(
    /// Kind of actor behind an account
    UserType {
        Military => "military",
        Charity => "charity",
    }
);

string_enum!(
    Category {
        Medical => "medical",
        Transport => "transport",
        Surveillance => "surveillance",
        Communication => "communication",
        Food => "food",
        Clothing => "clothing",
    }
);

string_enum!(
    Priority {
        Critical => "critical",
        NonCritical => "non-critical",
    }
);

string_enum!(
    /// pending -> in-progress -> completed, or cancelled from any open state
    RequestStatus {
        Pending => "pending",
        InProgress => "in-progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
);

string_enum!(
    OfferStatus {
        Available => "available",
        Exhausted => "exhausted",
        Cancelled => "cancelled",
    }
);

string_enum!(
    HelpOfferStatus {
        Pending => "pending",
        Accepted => "accepted",
    }
);

string_enum!(
    HelpRequestStatus {
        Pending => "pending",
        Confirmed => "confirmed",
    }
);

impl RequestStatus {
    fn rank(self) -> u8 {
        match self {
            RequestStatus::Pending => 0,
            RequestStatus::InProgress => 1,
            RequestStatus::Completed => 2,
            RequestStatus::Cancelled => 3,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }

    /// Open requests count as "active" on the dashboard
    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }

    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }

    /// Listing order used for an author's own requests
    pub fn sort_key(self) -> u8 {
        self.rank()
    }
}

impl OfferStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OfferStatus::Available)
    }

    pub fn can_transition_to(self, next: OfferStatus) -> bool {
        self == OfferStatus::Available && next != OfferStatus::Available
    }
}

impl HelpOfferStatus {
    pub fn can_transition_to(self, next: HelpOfferStatus) -> bool {
        self == HelpOfferStatus::Pending && next == HelpOfferStatus::Accepted
    }
}

impl HelpRequestStatus {
    pub fn can_transition_to(self, next: HelpRequestStatus) -> bool {
        self == HelpRequestStatus::Pending && next == HelpRequestStatus::Confirmed
    }
}
