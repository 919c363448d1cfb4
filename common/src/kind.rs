//! Macros for defining kind enums.

/// Macro for defining a kind enum, whose variants are represented by fixed
/// human-readable labels.
///
/// Parsing the enum from a string matches labels exactly and
/// case-sensitively.
///
/// # Example
///
/// ```rust,ignore
/// # use common::define_kind;
/// # use std::str::FromStr as _;
/// define_kind! {
///     #[doc = "Shape kind."]
///     enum Kind {
///         #[doc = "A cube"]
///         Cube = "Cube",
///
///         #[doc = "A flat square"]
///         FlatSquare = "Flat Square",
///     }
/// }
///
/// assert_eq!(Kind::from_str("Flat Square"), Ok(Kind::FlatSquare));
/// assert!(Kind::from_str("flat square").is_err());
/// assert_eq!(Kind::labels(), "Cube, Flat Square");
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident = $label:literal
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            PartialEq,
        )]
        #[doc = $doc]
        pub enum $name {
            $(
                #[doc = $variant_doc]
                #[strum(serialize = $label)]
                $variant,
            )*
        }

        impl $name {
            /// All the variants in their declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Returns the label of this variant.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(
                        Self::$variant => $label,
                    )*
                }
            }

            /// Returns all the labels joined with a comma.
            #[must_use]
            pub fn labels() -> ::std::string::String {
                [$($label),*].join(", ")
            }
        }
    };
}
