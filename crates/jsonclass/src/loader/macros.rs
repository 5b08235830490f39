//! Declarative derive macros for [`FromNode`](super::FromNode).
//!
//! Rust's reflection-free type system has no metaprogramming-free way to
//! derive a per-type projection the way a comptime language can; the two
//! practical stand-ins are a proc-macro derive or a declarative macro driven
//! by a schema-shaped invocation. This crate takes the declarative-macro
//! route to avoid pulling in a `syn`/`proc-macro2` dependency the rest of the
//! stack has no other use for.
//!
//! [`json_struct!`](crate::json_struct) declares a plain Rust struct
//! alongside a [`FromNode`](super::FromNode) impl that resolves each field by
//! name against the source object's class (or by position, if the source is
//! an array/multi, a positional/tuple-style payload). [`json_enum!`](crate::json_enum)
//! declares a fieldless enum matched against a precomputed name-to-variant
//! table.
//!
//! A field's schema default is any trailing `= expr`. A field with no default
//! is resolved, when absent from the source, by asking its own [`FromNode`]
//! impl what it makes of [`Node::Null`](crate::Node::Null): `Option<T>`
//! treats `Null` as `None` (so an absent optional field is simply absent,
//! with no `= None` needed), while every other type rejects `Null` with a
//! type mismatch, which is reported to the caller as the field's
//! [`MissingField`](crate::LoaderError::MissingField).

/// Declares a struct and its [`FromNode`](crate::loader::FromNode) impl.
///
/// ```
/// use jsonclass::json_struct;
///
/// json_struct! {
///     #[derive(Debug, PartialEq)]
///     pub struct Address {
///         pub street: String,
///         pub city: String,
///         pub country: String = String::from("US"),
///     }
/// }
/// ```
#[macro_export]
macro_rules! json_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $field_vis:vis $field:ident : $ty:ty $(= $default:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($field_vis $field : $ty),*
        }

        impl<'src> $crate::loader::FromNode<'src> for $name {
            fn from_node(
                node: &$crate::Node<'src>,
                doc: &$crate::Document<'src>,
            ) -> ::core::result::Result<Self, $crate::LoaderError> {
                let fields = $crate::loader::struct_fields(node, doc)?;
                #[allow(unused_mut, unused_assignments)]
                let mut __position = 0usize;
                $(
                    let $field: $ty = match $crate::loader::field_value(
                        &fields,
                        ::core::stringify!($field),
                        __position,
                    ) {
                        ::core::option::Option::Some(v) => {
                            __position += 1;
                            $crate::loader::FromNode::from_node(v, doc)?
                        }
                        ::core::option::Option::None => {
                            __position += 1;
                            match $crate::__json_field_default!($($default)?) {
                                ::core::option::Option::Some(d) => d,
                                ::core::option::Option::None => {
                                    match $crate::loader::FromNode::from_node(
                                        &$crate::Node::Null,
                                        doc,
                                    ) {
                                        ::core::result::Result::Ok(v) => v,
                                        ::core::result::Result::Err(_) => {
                                            return ::core::result::Result::Err(
                                                $crate::loader::missing_field_error(
                                                    &fields,
                                                    ::core::stringify!($field),
                                                    __position - 1,
                                                ),
                                            );
                                        }
                                    }
                                }
                            }
                        }
                    };
                )*
                ::core::result::Result::Ok(Self { $($field),* })
            }
        }
    };
}

/// Declares a fieldless enum and its [`FromNode`](crate::loader::FromNode)
/// impl, matching the source string against a static name table.
///
/// ```
/// use jsonclass::json_enum;
///
/// json_enum! {
///     #[derive(Debug, PartialEq)]
///     pub enum Status {
///         Active => "active",
///         Inactive => "inactive",
///     }
/// }
/// ```
#[macro_export]
macro_rules! json_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $text:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $($variant),*
        }

        impl<'src> $crate::loader::FromNode<'src> for $name {
            fn from_node(
                node: &$crate::Node<'src>,
                _doc: &$crate::Document<'src>,
            ) -> ::core::result::Result<Self, $crate::LoaderError> {
                let text = $crate::loader::decode_enum_text(node)?;
                match text.as_str() {
                    $($text => ::core::result::Result::Ok(Self::$variant),)*
                    other => ::core::result::Result::Err(
                        $crate::LoaderError::UnknownEnumValue(other.into()),
                    ),
                }
            }
        }
    };
}

/// Expands the optional `= $default` capture from [`json_struct!`] into an
/// `Option<T>` at the call site: no tokens means "no default" (`None`), one
/// expression means that expression wrapped in `Some`.
#[macro_export]
#[doc(hidden)]
macro_rules! __json_field_default {
    () => {
        ::core::option::Option::None
    };
    ($default:expr) => {
        ::core::option::Option::Some($default)
    };
}
