use super::Error;

/// Error when a field's type has no column mapping in the target dialect.
///
/// This also covers storage constraints the dialect cannot honor, such as a
/// VARCHAR longer than the dialect maximum or a decimal precision out of
/// range.
#[derive(Debug)]
pub(super) struct UnsupportedType {
    ty: Box<str>,
    reason: Option<Box<str>>,
}

impl std::error::Error for UnsupportedType {}

impl core::fmt::Display for UnsupportedType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unsupported type `{}`", self.ty)?;
        if let Some(ref reason) = self.reason {
            write!(f, ": {}", reason)?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates an unsupported type error naming the offending type.
    pub fn unsupported_type(ty: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedType(UnsupportedType {
            ty: ty.into().into(),
            reason: None,
        }))
    }

    /// Creates an unsupported type error with an explanation.
    pub fn unsupported_type_because(ty: impl Into<String>, reason: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedType(UnsupportedType {
            ty: ty.into().into(),
            reason: Some(reason.into().into()),
        }))
    }

    /// Returns `true` if this error is an unsupported type error.
    pub fn is_unsupported_type(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::UnsupportedType(_)))
    }
}
