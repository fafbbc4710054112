use thiserror::Error;

/// Failure to read through a [`Cursor`](crate::Cursor).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// The cursor does not point at an entry
    #[error("invalid cursor dereference at bucket {bucket}, slot {slot}")]
    InvalidDereference {
        /// Bucket the cursor was in
        bucket: usize,
        /// Slot the cursor was at
        slot: usize,
    },
}

/// Dotted-quad address that could not be parsed.
///
/// Fields are numbered from 1.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    /// A field does not start with a decimal digit
    #[error("digit expected at begin of field {field}")]
    DigitExpected {
        /// Offending field
        field: usize,
    },
    /// A field is above 255
    #[error("field {field} exceeds max 255")]
    FieldTooLarge {
        /// Offending field
        field: usize,
    },
    /// One of the first three fields is not followed by '.'
    #[error("'.' expected at end of field {field}")]
    DotExpected {
        /// Offending field
        field: usize,
    },
    /// Something other than whitespace follows the fourth field
    #[error("unexpected input after field 4")]
    TrailingInput,
}

/// Route table failures.
#[derive(Error, Debug)]
pub enum RouteError {
    /// Reading or writing a route file failed
    #[error("route table I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// A textual address did not parse
    #[error("malformed address: {0}")]
    Address(#[from] AddressError),
    /// Destination is zero or not in class A, B or C
    #[error("bad destination number {0:08X}")]
    BadDestination(u32),
    /// Route is zero
    #[error("bad route number {0:08X}")]
    BadRoute(u32),
}

/// Failures of the interactive command harnesses.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Reading commands or writing output failed
    #[error("driver I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The command source ran dry
    #[error("end of input")]
    EndOfInput,
    /// An argument did not parse as the type the command needs
    #[error("{expected} expected, found '{token}'")]
    Malformed {
        /// What the command wanted
        expected: &'static str,
        /// What it got
        token: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = CursorError::InvalidDereference { bucket: 3, slot: 1 };
        assert_eq!(err.to_string(), "invalid cursor dereference at bucket 3, slot 1");
        assert_eq!(AddressError::FieldTooLarge { field: 3 }.to_string(), "field 3 exceeds max 255");
        assert_eq!(RouteError::BadDestination(0x0a).to_string(), "bad destination number 0000000A");
        let err = DriverError::Malformed { expected: "integer", token: "x1".to_owned() };
        assert_eq!(err.to_string(), "integer expected, found 'x1'");
    }

    #[test]
    fn test_from_conversions() {
        let err: RouteError = AddressError::TrailingInput.into();
        assert!(matches!(err, RouteError::Address(AddressError::TrailingInput)));

        let err: RouteError = std::io::Error::other("disk gone").into();
        assert!(matches!(err, RouteError::Io(_)));
    }
}
