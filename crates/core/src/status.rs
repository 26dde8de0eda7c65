//! Status enums stored as lowercase TEXT columns.
//!
//! Each enum round-trips through its database string via `as_str` and
//! `TryFrom<String>`, and serializes with the same lowercase names.
//! [`ProjectStatus`] additionally owns the project lifecycle transition table.

use crate::error::CoreError;

macro_rules! define_text_status {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the database string for this status.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        concat!("Unknown ", stringify!($name), " '{}'"),
                        other
                    ))),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

define_text_status! {
    /// Project lifecycle status.
    ProjectStatus {
        Generating = "generating",
        Ready = "ready",
        Deployed = "deployed",
        Failed = "failed",
        Deleted = "deleted",
    }
}

define_text_status! {
    /// Outcome of a single deployment attempt recorded in `deployment_logs`.
    DeploymentStatus {
        Pending = "pending",
        Success = "success",
        Failed = "failed",
    }
}

define_text_status! {
    /// Subscription tier on a user profile.
    SubscriptionTier {
        Free = "free",
        Pro = "pro",
        Enterprise = "enterprise",
    }
}

/// Events that move a project through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Generated code was persisted.
    GenerationSucceeded,
    /// Persisting the generation result failed.
    GenerationFailed,
    /// A deployment completed and produced a public URL.
    Deployed,
    /// The owner removed the project.
    Deleted,
}

impl ProjectStatus {
    /// Apply a lifecycle event, returning the next status.
    ///
    /// | From         | Event                 | To          |
    /// |--------------|-----------------------|-------------|
    /// | `generating` | `GenerationSucceeded` | `ready`     |
    /// | `generating` | `GenerationFailed`    | `failed`    |
    /// | `ready`      | `Deployed`            | `deployed`  |
    /// | `deployed`   | `Deployed`            | `deployed`  |
    /// | any          | `Deleted`             | `deleted`   |
    ///
    /// Every other pair is rejected with [`CoreError::InvalidState`].
    pub fn apply(self, event: LifecycleEvent) -> Result<ProjectStatus, CoreError> {
        use LifecycleEvent as E;
        use ProjectStatus as S;

        match (self, event) {
            (S::Generating, E::GenerationSucceeded) => Ok(S::Ready),
            (S::Generating, E::GenerationFailed) => Ok(S::Failed),
            (S::Ready | S::Deployed, E::Deployed) => Ok(S::Deployed),
            (_, E::Deleted) => Ok(S::Deleted),
            (from, E::Deployed) => Err(CoreError::InvalidState(format!(
                "Project is not ready to deploy (status: {from})"
            ))),
            (from, event) => Err(CoreError::InvalidState(format!(
                "Cannot apply {event:?} to a project in status {from}"
            ))),
        }
    }

    /// Whether the project may be handed to a deployer.
    pub fn is_deployable(self) -> bool {
        self.apply(LifecycleEvent::Deployed).is_ok()
    }

    /// Whether the project is hidden from the owner's listings.
    pub fn is_deleted(self) -> bool {
        self == ProjectStatus::Deleted
    }
}
