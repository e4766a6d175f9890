//! Loosely-typed widget parameters.
//!
//! Widgets accept style and behaviour parameters from user code before any
//! of them have been checked, so they travel as [`Value`]s until a validator
//! turns them into a typed value (a [`Color`](crate::validation::Color), an
//! [`Alignment`](crate::validation::Alignment), ...).

use std::fmt;
use std::sync::Arc;

/// What sort of callable a [`Callback`] wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallableKind {
    /// A plain user function or closure.
    Function,
    /// A function provided by the toolkit itself.
    Builtin,
    /// A method bound to a receiver.
    BoundMethod,
    /// A callable with some leading arguments already applied.
    Partial,
}

type CallbackFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// Shareable user callback.
#[derive(Clone)]
pub struct Callback {
    kind: CallableKind,
    func: Arc<CallbackFn>,
}

impl Callback {
    /// Wrap a closure as a plain function.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::with_kind(CallableKind::Function, func)
    }

    /// Wrap a closure, tagging it with an explicit kind.
    pub fn with_kind<F>(kind: CallableKind, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            kind,
            func: Arc::new(func),
        }
    }

    /// Bind leading arguments, producing a partial application.
    #[must_use]
    pub fn partial(&self, bound: Vec<Value>) -> Self {
        let inner = Arc::clone(&self.func);
        Self::with_kind(CallableKind::Partial, move |args| {
            let mut all = bound.clone();
            all.extend_from_slice(args);
            inner(&all)
        })
    }

    /// Kind of callable.
    #[must_use]
    pub const fn kind(&self) -> CallableKind {
        self.kind
    }

    /// Invoke the callback.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// A widget parameter whose type has not been checked yet.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    None,
    /// Boolean. Not accepted where an integer is required.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Real number.
    Float(f64),
    /// Text.
    Str(String),
    /// Ordered sequence (tuple or list).
    List(Vec<Value>),
    /// Something that can be called.
    Callable(Callback),
}

impl Value {
    /// Elements if this is a sequence.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Integer payload, if any.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric payload widened to `f64`, if any.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether this is an integer or a real number.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }
}

/// Returns `true` if `value` can be invoked.
///
/// Functions, builtins, bound methods and partial applications all count.
#[must_use]
pub fn is_invocable(value: &Value) -> bool {
    matches!(value, Value::Callable(_))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Str(v) => write!(f, "\"{v}\""),
            Self::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            },
            Self::Callable(cb) => write!(f, "<{:?}>", cb.kind()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl From<Callback> for Value {
    fn from(v: Callback) -> Self {
        Self::Callable(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::None, Into::into)
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Self::List(vec![a.into(), b.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> From<(A, B, C)> for Value {
    fn from((a, b, c): (A, B, C)) -> Self {
        Self::List(vec![a.into(), b.into(), c.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>, D: Into<Value>> From<(A, B, C, D)>
    for Value
{
    fn from((a, b, c, d): (A, B, C, D)) -> Self {
        Self::List(vec![a.into(), b.into(), c.into(), d.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(args: &[Value]) -> Value {
        let sum: i64 = args.iter().filter_map(Value::as_int).sum();
        Value::Int(sum)
    }

    #[test]
    fn test_callables_are_invocable() {
        let func = Callback::new(add);
        let builtin = Callback::with_kind(CallableKind::Builtin, add);
        let method = Callback::with_kind(CallableKind::BoundMethod, add);
        let partial = func.partial(vec![Value::Int(1)]);

        for cb in [func, builtin, method, partial] {
            assert!(is_invocable(&Value::from(cb)));
        }
    }

    #[test]
    fn test_plain_values_are_not_invocable() {
        let values = [
            Value::None,
            Value::Bool(true),
            Value::Int(3),
            Value::Float(1.5),
            Value::from("menu"),
            Value::from((1, 2)),
        ];
        for value in &values {
            assert!(!is_invocable(value), "{value} should not be invocable");
        }
    }

    #[test]
    fn test_partial_prepends_bound_arguments() {
        let concat = Callback::new(|args| {
            Value::Str(args.iter().map(ToString::to_string).collect::<Vec<_>>().join(","))
        });
        let partial = concat.partial(vec![Value::Int(1), Value::Int(2)]);

        assert_eq!(partial.kind(), CallableKind::Partial);
        let out = partial.call(&[Value::Int(3)]);
        assert!(matches!(out, Value::Str(ref s) if s == "1,2,3"));
    }

    #[test]
    fn test_display_matches_tuple_notation() {
        let value = Value::from((1, "a", 2.5));
        assert_eq!(value.to_string(), "(1, \"a\", 2.5)");
    }

    #[test]
    fn test_option_conversion() {
        assert!(matches!(Value::from(None::<i32>), Value::None));
        assert!(matches!(Value::from(Some(4)), Value::Int(4)));
    }
}
