//! Macros for declaring cyclic phase enums.

/// Declare a fieldless enum and implement [`State`](crate::core::State) for it.
///
/// Variants cycle in declaration order: `next()` on the last variant wraps to
/// the first. The macro derives `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
/// `Debug` and the serde traits, and adds an `ALL` constant listing every
/// variant in cycle order.
///
/// # Example
///
/// ```
/// use phaselight::core::State;
/// use phaselight::state_enum;
///
/// state_enum! {
///     pub enum Signal {
///         Red,
///         Green,
///         Amber,
///     }
/// }
///
/// assert_eq!(Signal::Red.next(), Signal::Green);
/// assert_eq!(Signal::Amber.next(), Signal::Red);
/// assert_eq!(Signal::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),+
        }

        impl $name {
            /// Every variant, in cycle order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }

            fn index(&self) -> usize {
                *self as usize
            }

            fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }

            fn next(&self) -> Self {
                Self::ALL[(*self as usize + 1) % Self::ALL.len()]
            }
        }
    };
}
