//! Enumerated property values.

/// An enum whose members are stored in a bean as their symbol text.
///
/// Usually generated by [`bean_enum!`](crate::bean_enum); the first listed
/// member is the default.
pub trait BeanEnum: Sized + Copy + 'static {
    /// All members, in declaration order.
    fn variants() -> &'static [Self];

    /// The stored symbol for this member.
    fn symbol(&self) -> &'static str;

    /// Matches `text` case-insensitively against the symbol set.
    ///
    /// Text that is a non-negative integer selects the member at that ordinal.
    fn parse_symbol(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(found) = Self::variants()
            .iter()
            .find(|v| v.symbol().eq_ignore_ascii_case(text))
        {
            return Some(*found);
        }
        text.parse::<usize>()
            .ok()
            .and_then(|ordinal| Self::variants().get(ordinal).copied())
    }
}

/// Declares an enum usable as a bean property.
///
/// ```
/// rustbean::bean_enum! {
///     pub enum Status { Active, Suspended, Closed }
/// }
///
/// let mut bean = rustbean::Bean::new();
/// bean.put("status", Status::Suspended).unwrap();
/// bean.put("legacy_status", "closed").unwrap();
/// assert_eq!(bean.get::<Status>("status"), Status::Suspended);
/// assert_eq!(bean.get::<Status>("legacy_status"), Status::Closed);
/// assert_eq!(bean.get::<Status>("missing"), Status::Active);
/// ```
#[macro_export]
macro_rules! bean_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(#[$first_meta:meta])* $first:ident
            $(, $(#[$rest_meta:meta])* $rest:ident)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(#[$first_meta])* $first,
            $($(#[$rest_meta])* $rest,)*
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self::$first
            }
        }

        impl $crate::core::BeanEnum for $name {
            fn variants() -> &'static [Self] {
                &[Self::$first, $(Self::$rest),*]
            }

            fn symbol(&self) -> &'static str {
                match self {
                    Self::$first => stringify!($first),
                    $(Self::$rest => stringify!($rest),)*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::BeanEnum::symbol(self))
            }
        }

        impl $crate::core::FromValue for $name {
            fn from_value(value: &$crate::core::Value) -> $crate::core::ConvertResult<Self> {
                $crate::core::convert::enum_from_value(value)
            }
        }

        impl $crate::core::IntoValue for $name {
            fn into_value(self) -> ::std::option::Option<$crate::core::Value> {
                ::std::option::Option::Some($crate::core::Value::Text(
                    $crate::core::BeanEnum::symbol(&self).to_string(),
                ))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{BeanEnum, FromValue, IntoValue, Value};

    crate::bean_enum! {
        enum Color { Red, Green, Blue }
    }

    #[test]
    fn test_symbols_case_insensitive() {
        assert_eq!(Color::parse_symbol("green"), Some(Color::Green));
        assert_eq!(Color::parse_symbol("BLUE"), Some(Color::Blue));
        assert_eq!(Color::parse_symbol(" Red "), Some(Color::Red));
        assert_eq!(Color::parse_symbol("purple"), None);
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(Color::parse_symbol("2"), Some(Color::Blue));
        assert_eq!(Color::parse_symbol("3"), None);
        assert_eq!(Color::from_value(&Value::Integer(1)), Ok(Color::Green));
        assert!(Color::from_value(&Value::Float(1.5)).is_err());
    }

    #[test]
    fn test_stored_as_symbol() {
        assert_eq!(Color::Blue.into_value(), Some(Value::Text("Blue".into())));
        assert_eq!(Color::default(), Color::Red);
        assert_eq!(Color::Green.to_string(), "Green");
    }
}
