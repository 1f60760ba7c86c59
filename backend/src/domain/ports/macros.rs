//! Helper macro generating port error enums with `impl Into` constructors.
//!
//! Every variant carries named fields; each gets a snake-case constructor that
//! accepts `impl Into<_>` for each field, in declaration order.

macro_rules! define_port_error {
    (@ctor $name:ident $variant:ident ($($params:tt)*) ($($inits:tt)*)) => {
        ::paste::paste! {
            #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
            #[must_use]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor $name:ident $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor
            $name
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
                $variant:ident { $($field:ident : $ty:ty),+ $(,)? } => $message:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),+ },
            )+
        }

        impl $name {
            $(
                define_port_error!(@ctor $name $variant () () $($field : $ty,)+);
            )+
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor generation for single- and multi-field variants.
    define_port_error! {
        /// Faults raised by a sample store.
        pub enum SampleStoreError {
            /// Connection refused.
            Refused { message: String } => "refused: {message}",
            /// Store saturated.
            Busy { attempts: u32 } => "busy after {attempts} attempts",
            /// Statement rejected with a SQLSTATE-like code.
            Rejected { message: String, code: u16 } => "rejected: {message} ({code})",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SampleStoreError::refused("no route to host");
        assert_eq!(err.to_string(), "refused: no route to host");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = SampleStoreError::busy(3_u32);
        assert_eq!(err.to_string(), "busy after 3 attempts");
    }

    #[test]
    fn constructors_take_fields_in_declaration_order() {
        let err = SampleStoreError::rejected("constraint", 23_u16);
        assert_eq!(
            err,
            SampleStoreError::Rejected {
                message: "constraint".to_owned(),
                code: 23
            }
        );
        assert_eq!(err.to_string(), "rejected: constraint (23)");
    }
}
