//! Port error enums with the shared store-failure variants.
//!
//! Every repository can fail to reach its store or fail while running a
//! statement. `define_port_error!` adds `Connection` and `Query` variants to
//! an enum declared `for "<subject>"`, generates a snake_case constructor per
//! variant and an `into_domain_error` fallback mapping.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            #[must_use]
            pub const fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident for $subject:literal {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            /// The store could not be reached.
            #[error("{} connection failed: {message}", $subject)]
            Connection {
                /// Driver detail.
                message: String,
            },
            /// A statement failed while executing.
            #[error("{} query failed: {message}", $subject)]
            Query {
                /// Driver detail.
                message: String,
            },
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( {
                    $(
                        #[doc = concat!("`", stringify!($field), "` of the failing row.")]
                        $field : $ty
                    ),*
                } )?,
            )*
        }

        impl $name {
            define_port_error!(@ctor Connection { message: String });
            define_port_error!(@ctor Query { message: String });
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// Map store failures onto domain errors.
            ///
            /// `Connection` becomes `service_unavailable` and `Query` becomes
            /// `internal_error`. Callers match the variants that carry a
            /// business outcome first; any left over are reported as internal.
            pub(crate) fn into_domain_error(self) -> $crate::domain::Error {
                match self {
                    Self::Connection { message } => $crate::domain::Error::service_unavailable(
                        format!("{} unavailable: {message}", $subject),
                    ),
                    Self::Query { message } => {
                        $crate::domain::Error::internal(format!("{} error: {message}", $subject))
                    }
                    $(
                        Self::$variant { .. } => $crate::domain::Error::internal(self.to_string()),
                    )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;
