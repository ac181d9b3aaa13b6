//! Type converters turning a single token into a typed value.
//!
//! An [`ArgType`] pairs a reader function with the knowledge of whether the
//! option consumes a token at all. Boolean switches are the only built-in
//! converter that does not: they are fed an empty token when they appear.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use regex::Regex;

type Reader<T> = Rc<dyn Fn(&str) -> Result<T, String>>;

/// Converts a raw command-line token into a value of type `T`.
///
/// # Examples
///
/// ```
/// use argv_core::ArgType;
///
/// assert_eq!(ArgType::integer().read("42"), Ok(42));
/// assert!(ArgType::integer().read("forty-two").is_err());
///
/// assert!(!ArgType::boolean().needs_argument());
/// assert_eq!(ArgType::boolean().read(""), Ok(true));
///
/// let port = ArgType::new(|token: &str| {
///     token.parse::<u16>().map_err(|e| format!("not a port: {e}"))
/// });
/// assert_eq!(port.read("8080"), Ok(8080));
/// ```
pub struct ArgType<T> {
    reader: Reader<T>,
    needs_argument: bool,
    value_name: Option<String>,
}

impl<T> Clone for ArgType<T> {
    fn clone(&self) -> Self {
        Self {
            reader: Rc::clone(&self.reader),
            needs_argument: self.needs_argument,
            value_name: self.value_name.clone(),
        }
    }
}

impl<T> fmt::Debug for ArgType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgType")
            .field("needs_argument", &self.needs_argument)
            .field("value_name", &self.value_name)
            .finish_non_exhaustive()
    }
}

impl<T> ArgType<T> {
    /// Creates a converter from a pure reader function.
    ///
    /// The converter needs an argument; the error string becomes the
    /// reason of an [`InvalidValue`](crate::ArgvError::InvalidValue).
    pub fn new<F>(reader: F) -> Self
    where
        F: Fn(&str) -> Result<T, String> + 'static,
    {
        Self {
            reader: Rc::new(reader),
            needs_argument: true,
            value_name: None,
        }
    }

    /// Converts one token.
    pub fn read(&self, token: &str) -> Result<T, String> {
        (self.reader)(token)
    }

    /// Returns `false` only for switches that do not consume a token.
    pub fn needs_argument(&self) -> bool {
        self.needs_argument
    }

    /// Placeholder shown in usage output, if one was set.
    pub fn value_name(&self) -> Option<&str> {
        self.value_name.as_deref()
    }

    /// Sets the placeholder shown in usage output (e.g. `<file>`).
    pub fn with_value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = Some(name.into());
        self
    }

    /// Transforms converted values, keeping `needs_argument` and the
    /// placeholder.
    ///
    /// # Examples
    ///
    /// ```
    /// use argv_core::ArgType;
    ///
    /// let flag = ArgType::boolean().map(|on| if on { "on" } else { "off" });
    /// assert!(!flag.needs_argument());
    /// assert_eq!(flag.read(""), Ok("on"));
    /// ```
    pub fn map<U, F>(self, f: F) -> ArgType<U>
    where
        T: 'static,
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        let reader = self.reader;
        ArgType {
            reader: Rc::new(move |token: &str| reader(token).map(&f)),
            needs_argument: self.needs_argument,
            value_name: self.value_name,
        }
    }
}

impl<T: FromStr + 'static> ArgType<T>
where
    T::Err: fmt::Display,
{
    /// Creates a converter for any [`FromStr`] type.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::net::Ipv4Addr;
    /// use argv_core::ArgType;
    ///
    /// let addr = ArgType::<Ipv4Addr>::parsed();
    /// assert_eq!(addr.read("127.0.0.1"), Ok(Ipv4Addr::LOCALHOST));
    /// ```
    pub fn parsed() -> Self {
        Self::new(|token| token.parse::<T>().map_err(|e| e.to_string()))
    }
}

impl ArgType<bool> {
    /// Switch converter: consumes no token.
    ///
    /// An empty token (the switch was given) reads as `true`. An attached
    /// value such as `--verbose=false` reads as `true` only when it equals
    /// `true` ignoring case.
    pub fn boolean() -> Self {
        Self {
            reader: Rc::new(|token: &str| {
                Ok(token.is_empty() || token.eq_ignore_ascii_case("true"))
            }),
            needs_argument: false,
            value_name: None,
        }
    }
}

impl ArgType<String> {
    /// Identity converter.
    pub fn string() -> Self {
        Self::new(|token| Ok(token.to_string()))
    }

    /// String converter that rejects tokens not matching `pattern`.
    ///
    /// # Examples
    ///
    /// ```
    /// use argv_core::ArgType;
    /// use regex::Regex;
    ///
    /// let tag = ArgType::matching(Regex::new(r"^v\d+$").unwrap());
    /// assert_eq!(tag.read("v12"), Ok("v12".to_string()));
    /// assert!(tag.read("latest").is_err());
    /// ```
    pub fn matching(pattern: Regex) -> Self {
        Self::new(move |token| {
            if pattern.is_match(token) {
                Ok(token.to_string())
            } else {
                Err(format!("does not match pattern {}", pattern.as_str()))
            }
        })
    }
}

impl ArgType<i64> {
    /// Base-10 integer converter.
    pub fn integer() -> Self {
        Self::parsed()
    }
}
