//! Two-valued flags persisted as `SMALLINT` columns.
//!
//! Legacy rows encode booleans as `1` (true) and `2` (false) so that `0`
//! can be told apart from an explicit "false". Anything else found in the
//! database is decoded with a caller-supplied default.

/// Database representation of an encoded flag.
pub type FlagValue = i16;

/// Encoded value meaning `true`.
pub const BOOL_TRUE: FlagValue = 1;

/// Encoded value meaning `false`.
pub const BOOL_FALSE: FlagValue = 2;

/// A boolean stored as one of two sentinel integers.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeBool {
    True = BOOL_TRUE,
    False = BOOL_FALSE,
}

impl FakeBool {
    /// Encode a logical boolean.
    pub fn from_bool(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }

    /// Strict decode. Returns `None` for anything but the two sentinels.
    pub fn try_from_db(raw: FlagValue) -> Option<Self> {
        match raw {
            BOOL_TRUE => Some(Self::True),
            BOOL_FALSE => Some(Self::False),
            _ => None,
        }
    }

    /// Lenient decode used when reading rows: unexpected values map to
    /// `default` and are logged.
    pub fn decode(raw: FlagValue, default: bool) -> bool {
        match Self::try_from_db(raw) {
            Some(flag) => flag.as_bool(),
            None => {
                tracing::warn!(raw, default, "Unexpected encoded flag value, using default");
                default
            }
        }
    }

    pub fn as_bool(self) -> bool {
        self == Self::True
    }

    /// The integer written to the database.
    pub fn to_db(self) -> FlagValue {
        self as FlagValue
    }
}

impl From<bool> for FakeBool {
    fn from(value: bool) -> Self {
        Self::from_bool(value)
    }
}

impl From<FakeBool> for bool {
    fn from(value: FakeBool) -> Self {
        value.as_bool()
    }
}

/// Shorthand for `FakeBool::from_bool(value).to_db()`.
pub fn encode(value: bool) -> FlagValue {
    FakeBool::from_bool(value).to_db()
}
