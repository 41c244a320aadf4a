//! Text-backed status and classification enums.
//!
//! Each enum is stored as a lowercase TEXT column guarded by a CHECK
//! constraint, so the string values below must match the migrations.

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $val)] $variant ),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the stored column value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $val),+
                }
            }

            /// Parse a stored or user-supplied value.
            pub fn parse(value: &str) -> Result<Self, $crate::error::CoreError> {
                match value {
                    $($val => Ok($name::$variant),)+
                    other => Err($crate::error::CoreError::Validation(format!(
                        concat!("Invalid ", stringify!($name), " '{}'. Must be one of: {}"),
                        other,
                        [$($val),+].join(", ")
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::error::CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }
    };
}

pub(crate) use define_text_enum;

define_text_enum! {
    /// Where an issue sits in the punch list workflow.
    IssueStatus {
        Open = "open",
        Assigned = "assigned",
        InProgress = "in_progress",
        ReadyForReinspect = "ready_for_reinspect",
        Closed = "closed",
    }
}

define_text_enum! {
    /// Issue urgency.
    IssuePriority {
        Low = "low",
        Medium = "medium",
        High = "high",
    }
}

define_text_enum! {
    /// Whether a photo documents the defect or the fix.
    PhotoType {
        Before = "before",
        After = "after",
    }
}

define_text_enum! {
    /// Project lifecycle status.
    ProjectStatus {
        Active = "active",
        Delivered = "delivered",
        Archived = "archived",
    }
}

impl Default for IssuePriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl IssuePriority {
    /// Uppercased label used as a report bucket name.
    pub fn bucket_label(self) -> String {
        self.as_str().to_uppercase()
    }
}

impl Default for PhotoType {
    fn default() -> Self {
        Self::Before
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Active
    }
}
