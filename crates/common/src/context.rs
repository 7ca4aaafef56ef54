/// Error types that can be built from a plain message string.
///
/// Implement this for a crate's error type and invoke [`impl_context!`] in
/// its error module to get `.with_context()` on foreign `Result`s.
pub trait FromMessage: Sized {
    fn from_message(message: String) -> Self;
}

/// Generate a crate-local `Context` trait that turns any displayable error
/// into the crate's `Error`, prefixed with a lazily built description.
///
/// Invoke inside a module that defines `Error: FromMessage` and
/// `type Result<T> = std::result::Result<T, Error>`.
///
/// ```ignore
/// reelbridge_common::impl_context!();
///
/// toml::from_str(raw).with_context(|| format!("parsing {}", path.display()))?;
/// ```
#[macro_export]
macro_rules! impl_context {
    () => {
        pub trait Context<T> {
            fn with_context<C, F>(self, f: F) -> Result<T>
            where
                C: ::std::fmt::Display,
                F: FnOnce() -> C;
        }

        impl<T, E: ::std::fmt::Display> Context<T> for ::std::result::Result<T, E> {
            fn with_context<C, F>(self, f: F) -> Result<T>
            where
                C: ::std::fmt::Display,
                F: FnOnce() -> C,
            {
                self.map_err(|source| {
                    <Error as $crate::FromMessage>::from_message(format!("{}: {source}", f()))
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::FromMessage;

    #[derive(Debug, PartialEq)]
    struct Error(String);

    impl FromMessage for Error {
        fn from_message(message: String) -> Self {
            Self(message)
        }
    }

    type Result<T> = std::result::Result<T, Error>;

    crate::impl_context!();

    #[test]
    fn prefixes_source_message() {
        let parsed: Result<u16> = "x".parse::<u16>().with_context(|| "reading port");
        assert_eq!(
            parsed,
            Err(Error("reading port: invalid digit found in string".into()))
        );
    }

    #[test]
    fn ok_passes_through() {
        let parsed: Result<u16> = "8080".parse::<u16>().with_context(|| "reading port");
        assert_eq!(parsed, Ok(8080));
    }
}
