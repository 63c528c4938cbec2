//! Cache key derivation
//!
//! [`CacheKey`] turns a call's arguments into a hashable key. Statically typed
//! arguments (scalars, strings, tuples, vectors) key themselves. Dynamically
//! typed calls go through [`CallArgs`], which carries positional and named
//! arguments and builds a structural [`ArgsKey`].
//!
//! Named arguments are sorted by name before the key is built, so
//! `f(x=1, y=2)` and `f(y=2, x=1)` share one cache entry. Keys are structural
//! trees, never text renderings: `1` and `"1"` are different keys, and so are
//! `1` and `1.0`.

use std::hash::Hash;

use crate::error::KeyDerivationError;

/// Capability to derive a cache key from a call's arguments
///
/// Two argument values that compare equal must produce equal keys. Values
/// without deterministic equality (NaN, opaque handles) must fail instead of
/// producing a key that could collide or never match.
pub trait CacheKey {
    /// Key stored in the cache
    type Key: Hash + Eq + Clone;

    /// Derive the key for these arguments
    fn cache_key(&self) -> Result<Self::Key, KeyDerivationError>;
}

macro_rules! self_keyed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CacheKey for $ty {
                type Key = $ty;

                #[inline]
                fn cache_key(&self) -> Result<Self::Key, KeyDerivationError> {
                    Ok(self.clone())
                }
            }
        )*
    };
}

self_keyed!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    String,
);

impl CacheKey for &str {
    type Key = String;

    fn cache_key(&self) -> Result<Self::Key, KeyDerivationError> {
        Ok((*self).to_owned())
    }
}

impl CacheKey for f32 {
    type Key = u32;

    fn cache_key(&self) -> Result<Self::Key, KeyDerivationError> {
        if self.is_nan() {
            return Err(KeyDerivationError::NotComparable("f32 NaN".into()));
        }
        // -0.0 == 0.0
        Ok(if *self == 0.0 { 0 } else { self.to_bits() })
    }
}

impl CacheKey for f64 {
    type Key = u64;

    fn cache_key(&self) -> Result<Self::Key, KeyDerivationError> {
        float_bits(*self)
    }
}

impl<T: CacheKey> CacheKey for Option<T> {
    type Key = Option<T::Key>;

    fn cache_key(&self) -> Result<Self::Key, KeyDerivationError> {
        self.as_ref().map(CacheKey::cache_key).transpose()
    }
}

impl<T: CacheKey> CacheKey for Vec<T> {
    type Key = Vec<T::Key>;

    fn cache_key(&self) -> Result<Self::Key, KeyDerivationError> {
        self.iter().map(CacheKey::cache_key).collect()
    }
}

impl<T: CacheKey + ?Sized> CacheKey for Box<T> {
    type Key = T::Key;

    fn cache_key(&self) -> Result<Self::Key, KeyDerivationError> {
        (**self).cache_key()
    }
}

// A tuple is a positional argument list; elements contribute in call order.
macro_rules! tuple_keyed {
    ($($name:ident $var:ident),+) => {
        impl<$($name: CacheKey),+> CacheKey for ($($name,)+) {
            type Key = ($($name::Key,)+);

            fn cache_key(&self) -> Result<Self::Key, KeyDerivationError> {
                let ($($var,)+) = self;
                Ok(($($var.cache_key()?,)+))
            }
        }
    };
}

tuple_keyed!(A a);
tuple_keyed!(A a, B b);
tuple_keyed!(A a, B b, C c);
tuple_keyed!(A a, B b, C c, D d);
tuple_keyed!(A a, B b, C c, D d, E e);
tuple_keyed!(A a, B b, C c, D d, E e, F f);
tuple_keyed!(A a, B b, C c, D d, E e, F f, G g);
tuple_keyed!(A a, B b, C c, D d, E e, F f, G g, H h);

fn float_bits(value: f64) -> Result<u64, KeyDerivationError> {
    if value.is_nan() {
        return Err(KeyDerivationError::NotComparable("f64 NaN".into()));
    }
    Ok(if value == 0.0 { 0 } else { value.to_bits() })
}

/// Dynamically typed argument value
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Absent value
    None,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Ordered sequence
    List(Vec<ArgValue>),
    /// Name/value associations; order is not significant
    Map(Vec<(String, ArgValue)>),
    /// Value with no structural representation, identified by its type name
    Opaque(String),
}

/// One component of a structural key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    /// Absent value
    None,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Float bit pattern, with -0.0 folded into 0.0
    Float(u64),
    /// UTF-8 string
    Str(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Ordered sequence
    List(Vec<KeyPart>),
    /// Name/value associations sorted by name
    Map(Vec<(String, KeyPart)>),
}

impl CacheKey for ArgValue {
    type Key = KeyPart;

    fn cache_key(&self) -> Result<Self::Key, KeyDerivationError> {
        Ok(match self {
            ArgValue::None => KeyPart::None,
            ArgValue::Bool(b) => KeyPart::Bool(*b),
            ArgValue::Int(i) => KeyPart::Int(*i),
            ArgValue::Float(f) => KeyPart::Float(float_bits(*f)?),
            ArgValue::Str(s) => KeyPart::Str(s.clone()),
            ArgValue::Bytes(b) => KeyPart::Bytes(b.clone()),
            ArgValue::List(items) => KeyPart::List(
                items
                    .iter()
                    .map(CacheKey::cache_key)
                    .collect::<Result<_, _>>()?,
            ),
            ArgValue::Map(pairs) => {
                KeyPart::Map(normalize_named(pairs, KeyDerivationError::DuplicateMapKey)?)
            }
            ArgValue::Opaque(type_name) => {
                return Err(KeyDerivationError::Unhashable(type_name.clone()))
            }
        })
    }
}

/// Sort name/value pairs by name and key each value
///
/// `duplicate` builds the error for a name that occurs twice.
fn normalize_named(
    pairs: &[(String, ArgValue)],
    duplicate: fn(String) -> KeyDerivationError,
) -> Result<Vec<(String, KeyPart)>, KeyDerivationError> {
    let mut keyed = pairs
        .iter()
        .map(|(name, value)| value.cache_key().map(|key| (name.clone(), key)))
        .collect::<Result<Vec<_>, _>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    if let Some(pair) = keyed.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(duplicate(pair[0].0.clone()));
    }
    Ok(keyed)
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

macro_rules! int_arg {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ArgValue {
                fn from(value: $ty) -> Self {
                    ArgValue::Int(i64::from(value))
                }
            }
        )*
    };
}

int_arg!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for ArgValue {
    fn from(value: f32) -> Self {
        ArgValue::Float(f64::from(value))
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Float(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Str(value.to_owned())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Str(value)
    }
}

impl From<&[u8]> for ArgValue {
    fn from(value: &[u8]) -> Self {
        ArgValue::Bytes(value.to_vec())
    }
}

impl From<Vec<ArgValue>> for ArgValue {
    fn from(value: Vec<ArgValue>) -> Self {
        ArgValue::List(value)
    }
}

/// `None` becomes [`ArgValue::None`] and `Some(v)` becomes `v` itself, so
/// `Some(3)` and `3` produce the same key.
impl<T: Into<ArgValue>> From<Option<T>> for ArgValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ArgValue::None, Into::into)
    }
}

/// Arguments of one dynamically typed call
///
/// Positional arguments are keyed in call order; named arguments are keyed
/// sorted by name. Optional values are flattened on the way in (see the
/// `From<Option<T>>` impl of [`ArgValue`]): `arg(Some(3))` and `arg(3)` hit
/// the same cache entry, and `arg(None::<i32>)` is keyed as [`ArgValue::None`].
///
/// ```
/// use lrumemo::{ArgValue, CallArgs};
///
/// let args = CallArgs::new().arg(1).arg("two").named("scale", 0.5);
/// assert_eq!(args.positional()[1], ArgValue::Str("two".into()));
/// assert_eq!(args.get_named("scale"), Some(&ArgValue::Float(0.5)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<ArgValue>,
    named: Vec<(String, ArgValue)>,
}

impl CallArgs {
    /// Empty argument list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<ArgValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Add a named argument
    pub fn named(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }

    /// Positional arguments in call order
    pub fn positional(&self) -> &[ArgValue] {
        &self.positional
    }

    /// Named arguments in the order they were supplied
    pub fn named_args(&self) -> &[(String, ArgValue)] {
        &self.named
    }

    /// Positional argument at `index`
    pub fn get(&self, index: usize) -> Option<&ArgValue> {
        self.positional.get(index)
    }

    /// First named argument called `name`
    pub fn get_named(&self, name: &str) -> Option<&ArgValue> {
        self.named
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }
}

/// Structural key of a [`CallArgs`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgsKey {
    positional: Vec<KeyPart>,
    named: Vec<(String, KeyPart)>,
}

impl CacheKey for CallArgs {
    type Key = ArgsKey;

    fn cache_key(&self) -> Result<Self::Key, KeyDerivationError> {
        Ok(ArgsKey {
            positional: self
                .positional
                .iter()
                .map(CacheKey::cache_key)
                .collect::<Result<_, _>>()?,
            named: normalize_named(&self.named, KeyDerivationError::DuplicateNamedArgument)?,
        })
    }
}
