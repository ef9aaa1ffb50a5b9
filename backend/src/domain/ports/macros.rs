//! Helper macro generating port error enums with `thiserror` messages and
//! snake_case constructors.

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
        pub enum StoreCheckError {
            Unreachable { message: String } => "unreachable: {message}",
            Lagging { attempts: u32 } => "lagging after {attempts} attempts",
            Timeout => "check timed out",
        }
    }

    #[test]
    fn string_fields_accept_borrowed_input() {
        let err = StoreCheckError::unreachable("redis:6379");
        assert_eq!(err.to_string(), "unreachable: redis:6379");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        let err = StoreCheckError::lagging(3_u32);
        assert_eq!(err, StoreCheckError::Lagging { attempts: 3 });
    }

    #[test]
    fn unit_variants_get_snake_case_constructors() {
        assert_eq!(StoreCheckError::timeout(), StoreCheckError::Timeout);
        assert_eq!(StoreCheckError::timeout().to_string(), "check timed out");
    }
}
