//! Typed ID definitions for the complaint domain.

pub use super::id::Id;

/// Marker type for Complaint rows.
pub struct Complaint;

/// Marker type for Profile rows (one per student or admin account).
pub struct Profile;

/// Typed ID for Complaint rows.
pub type ComplaintId = Id<Complaint>;

/// Typed ID for Profile rows. Matches the auth provider's user id.
pub type ProfileId = Id<Profile>;
