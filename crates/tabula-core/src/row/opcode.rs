use std::fmt;

///
/// WriteKind
///
/// Mutation intent of a row operation. Each intent maps to exactly one wire
/// opcode byte; `*Ignore` variants ask the server to ignore the matching
/// conflict instead of failing the row.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum WriteKind {
    Insert = 1,
    Update = 2,
    Delete = 3,
    Upsert = 5,
    InsertIgnore = 10,
    UpdateIgnore = 11,
    DeleteIgnore = 12,
    UpsertIgnore = 13,
}

impl WriteKind {
    pub const ALL: [Self; 8] = [
        Self::Insert,
        Self::InsertIgnore,
        Self::Update,
        Self::UpdateIgnore,
        Self::Delete,
        Self::DeleteIgnore,
        Self::Upsert,
        Self::UpsertIgnore,
    ];

    /// Wire opcode byte.
    #[must_use]
    pub const fn opcode(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_opcode(opcode: u8) -> Option<Self> {
        let kind = match opcode {
            1 => Self::Insert,
            2 => Self::Update,
            3 => Self::Delete,
            5 => Self::Upsert,
            10 => Self::InsertIgnore,
            11 => Self::UpdateIgnore,
            12 => Self::DeleteIgnore,
            13 => Self::UpsertIgnore,
            _ => return None,
        };

        Some(kind)
    }

    #[must_use]
    pub const fn is_ignore(self) -> bool {
        matches!(
            self,
            Self::InsertIgnore | Self::UpdateIgnore | Self::DeleteIgnore | Self::UpsertIgnore
        )
    }

    /// The same intent with conflict-ignoring removed.
    #[must_use]
    pub const fn without_ignore(self) -> Self {
        match self {
            Self::InsertIgnore => Self::Insert,
            Self::UpdateIgnore => Self::Update,
            Self::DeleteIgnore => Self::Delete,
            Self::UpsertIgnore => Self::Upsert,
            other => other,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::InsertIgnore => "INSERT_IGNORE",
            Self::Update => "UPDATE",
            Self::UpdateIgnore => "UPDATE_IGNORE",
            Self::Delete => "DELETE",
            Self::DeleteIgnore => "DELETE_IGNORE",
            Self::Upsert => "UPSERT",
            Self::UpsertIgnore => "UPSERT_IGNORE",
        }
    }
}

impl fmt::Display for WriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// TESTS
///
