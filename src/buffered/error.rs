use crate::buffered::grant::ObjectKind;

/// Errors reported when widening a thread's access to a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantError {
    /// The platform refused access to a kernel object.
    ObjectDenied(ObjectKind),
    /// The platform refused access to a memory region.
    MemoryDenied,
    /// No room left to record another grant.
    Exhausted,
}

impl core::fmt::Display for GrantError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GrantError::ObjectDenied(kind) => write!(f, "access to {kind} denied"),
            GrantError::MemoryDenied => write!(f, "access to fifo memory denied"),
            GrantError::Exhausted => write!(f, "grant table capacity exceeded"),
        }
    }
}
