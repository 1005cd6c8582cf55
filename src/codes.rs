//! Enumerations backed by the platform's numeric codes.

/// Declare an enum whose variants map to fixed platform codes.
///
/// Generates `code()`, `label()`, `from_code()`, `ALL`, `Display` (the
/// label) and `FromStr` (label, case-insensitive with `-` or space for `_`,
/// or the numeric code).
macro_rules! platform_codes {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant, )+];

            /// Numeric code sent to the platform.
            pub fn code(self) -> u32 {
                match self {
                    $( $name::$variant => $code, )+
                }
            }

            /// Stable lowercase name.
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }

            pub fn from_code(code: u32) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let key = s.trim().to_lowercase().replace(['-', ' '], "_");

                let found = match key.parse::<u32>() {
                    Ok(code) => Self::from_code(code),
                    Err(_) => Self::ALL.iter().copied().find(|v| v.label() == key),
                };

                found.ok_or_else(|| format!("Unknown {}: {}", stringify!($name), s))
            }
        }
    };
}

pub(crate) use platform_codes;
