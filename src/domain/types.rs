//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and numeric constraints are enforced at the
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use validator::{ValidateEmail, ValidateUrl};

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value required to be non-negative was negative.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// URL validation failed.
    #[error("{0} must be a valid URL")]
    InvalidUrl(&'static str),
    /// E-mail validation failed.
    #[error("{0} must be a valid email address")]
    InvalidEmail(&'static str),
    /// Colour was not a `#RRGGBB` hex value.
    #[error("{0} must be a hex colour like #1a2b3c")]
    InvalidColor(&'static str),
    /// A value did not match any variant of a closed enumeration.
    #[error("unknown {field}: {value}")]
    UnknownVariant { field: &'static str, value: String },
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Generates the string accessors and conversions shared by all string newtypes.
macro_rules! string_newtype_common {
    ($name:ident) => {
        impl $name {
            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }
        }

        string_newtype_common!($name);
    };
}

macro_rules! url_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed URL and validates its format.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = trim_and_require_non_empty(value, $field)?;
                if !trimmed.as_str().validate_url() {
                    return Err(TypeConstraintError::InvalidUrl($field));
                }
                Ok(Self(trimmed))
            }
        }

        string_newtype_common!($name);
    };
}

macro_rules! non_negative_i32_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Constructs a value that must be zero or greater.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value >= 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NegativeNumber($field))
                }
            }

            /// Returns the raw `i32` value.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

/// Closed enumerations persisted as their snake_case string form.
///
/// Every variant is spelled out once so that adding a variant forces the
/// `match` arms in `as_str` and the parser to be updated together.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:expr, {
            $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            /// String representation used in persistence.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                match value.trim() {
                    $($value => Ok(Self::$variant),)+
                    other => Err(TypeConstraintError::UnknownVariant {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::try_from(value.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

id_newtype!(
    CategoryId,
    "Unique identifier for a category.",
    "category_id"
);
id_newtype!(
    TrainingId,
    "Unique identifier for a training.",
    "training_id"
);
id_newtype!(
    RegistrationId,
    "Unique identifier for a registration.",
    "registration_id"
);
id_newtype!(
    ResourceId,
    "Unique identifier for a resource.",
    "resource_id"
);
id_newtype!(
    TrainingUpdateId,
    "Unique identifier for an activity feed entry.",
    "training_update_id"
);
id_newtype!(
    PageVersionId,
    "Unique identifier for a page version snapshot.",
    "page_version_id"
);

non_empty_string_newtype!(
    CategoryName,
    "Category name enforcing non-empty values.",
    "category name"
);
non_empty_string_newtype!(
    TrainingName,
    "Training name enforcing non-empty values.",
    "training name"
);
non_empty_string_newtype!(
    TrainingDescription,
    "Training description enforcing non-empty values.",
    "description"
);
non_empty_string_newtype!(
    ParticipantName,
    "Participant name enforcing non-empty values.",
    "participant name"
);
non_empty_string_newtype!(
    ResourceTitle,
    "Resource title enforcing non-empty values.",
    "resource title"
);
non_empty_string_newtype!(
    PageSlug,
    "Slug of a CMS page enforcing non-empty values.",
    "page slug"
);

url_string_newtype!(ExternalLink, "External registration or resource link.", "external link");
url_string_newtype!(FileUrl, "URL of a stored image or attachment.", "file url");

non_negative_i32_newtype!(
    SlotCount,
    "Number of training seats; zero or greater.",
    "slots"
);

/// Participant e-mail address, trimmed and validated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ParticipantEmail(String);

impl ParticipantEmail {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "participant email")?;
        if !trimmed.as_str().validate_email() {
            return Err(TypeConstraintError::InvalidEmail("participant email"));
        }
        Ok(Self(trimmed))
    }
}

string_newtype_common!(ParticipantEmail);

/// Category colour in `#rrggbb` form, stored lower-case.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CategoryColor(String);

impl CategoryColor {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "category color")?;
        let hex = trimmed
            .strip_prefix('#')
            .ok_or(TypeConstraintError::InvalidColor("category color"))?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeConstraintError::InvalidColor("category color"));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }
}

string_newtype_common!(CategoryColor);

string_enum!(
    /// Lifecycle state of a registration.
    EnrollmentStatus, "enrollment status", {
        Registered => "registered",
        PendingApproval => "pending_approval",
        HrApproval => "hr_approval",
        Confirmed => "confirmed",
        Cancelled => "cancelled",
        OnHold => "on_hold",
        Waitlisted => "waitlisted",
    }
);

impl EnrollmentStatus {
    /// Human-readable label used by views and exports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Registered => "Registered",
            Self::PendingApproval => "Pending Approval",
            Self::HrApproval => "HR Approval",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
            Self::OnHold => "On Hold",
            Self::Waitlisted => "Waitlisted",
        }
    }
}

string_enum!(
    /// Whether a participant showed up to the session.
    AttendanceStatus, "attendance status", {
        Pending => "pending",
        Attended => "attended",
        NoShow => "no_show",
    }
);

impl AttendanceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Attended => "Attended",
            Self::NoShow => "No Show",
        }
    }
}

string_enum!(
    /// Scheduling state of a training. Admins may set any value.
    TrainingStatus, "training status", {
        Scheduled => "Scheduled",
        Rescheduled => "Rescheduled",
        Cancelled => "Cancelled",
        InProgress => "In Progress",
        OnHold => "On Hold",
        Completed => "Completed",
    }
);

impl TrainingStatus {
    pub const fn label(self) -> &'static str {
        self.as_str()
    }
}

string_enum!(
    /// How participants sign up for a training.
    RegistrationMethod, "registration method", {
        Internal => "internal",
        External => "external",
    }
);

impl RegistrationMethod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Internal => "Internal",
            Self::External => "External link",
        }
    }
}

string_enum!(
    /// Kind of change recorded in the activity feed.
    TrainingUpdateKind, "training update kind", {
        Created => "created",
        Updated => "updated",
        Deleted => "deleted",
        StatusChanged => "status_changed",
        Rescheduled => "rescheduled",
    }
);

string_enum!(
    /// Type of a reference resource.
    ResourceKind, "resource type", {
        Document => "document",
        Video => "video",
        Link => "link",
        Other => "other",
    }
);

impl ResourceKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Document => "Document",
            Self::Video => "Video",
            Self::Link => "Link",
            Self::Other => "Other",
        }
    }
}
