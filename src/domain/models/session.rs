use std::fmt;

/// Handle for one streaming generation session. Ids increase monotonically per
/// client so stale callbacks from a cancelled session can never match the
/// active one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.0);
    }
}
