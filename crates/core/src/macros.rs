//! Helpers for closed string-coded enums.

/// Implements `as_str`, `Display` and `FromStr` for a fieldless enum whose
/// variants map one-to-one onto stored string codes.
macro_rules! string_enum {
    ($name:ident { $($variant:ident => $code:literal),+ $(,)? }) => {
        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the stored string code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::FinanceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok(Self::$variant),)+
                    _ => Err($crate::FinanceError::Validation(format!(
                        concat!("Unknown ", stringify!($name), ": {}"),
                        s
                    ))),
                }
            }
        }
    };
}

pub(crate) use string_enum;
