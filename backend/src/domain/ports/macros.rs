//! Helper macro for declaring port error enums.
//!
//! Each variant gets a snake_case constructor whose fields accept anything
//! `Into` the declared type, so adapters can write
//! `ReviewRepositoryError::query(err.to_string())`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum StorePortError {
            Unavailable => "store unavailable",
            Query { message: String } => "query failed: {message}",
            Conflict { field: String, attempts: u32 } => "conflict on {field} after {attempts}",
        }
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(StorePortError::unavailable(), StorePortError::Unavailable);
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = StorePortError::query("timeout");
        assert_eq!(err.to_string(), "query failed: timeout");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = StorePortError::conflict("email", 2_u32);
        assert_eq!(err.to_string(), "conflict on email after 2");
    }
}
