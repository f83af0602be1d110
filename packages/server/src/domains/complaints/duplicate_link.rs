//! Duplicate-link invariant.
//!
//! A complaint is either an `Original` or a `Duplicate` of some original.
//! Links are one level deep: nothing may point at a duplicate, nothing may
//! point at itself, and a duplicate is never re-linked. The only transition
//! is `Original -> Duplicate`.
//!
//! The check is a pure function over the two complaints' current states so
//! it can be exercised without a store.

use thiserror::Error;

use crate::common::ComplaintId;
use crate::domains::complaints::models::Complaint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateState {
    Original,
    /// `of` is `None` only for rows written before the link constraint existed.
    Duplicate { of: Option<ComplaintId> },
}

impl DuplicateState {
    pub fn of_complaint(complaint: &Complaint) -> Self {
        Self::from_columns(complaint.is_duplicate, complaint.duplicate_of)
    }

    pub fn from_columns(is_duplicate: bool, duplicate_of: Option<ComplaintId>) -> Self {
        if is_duplicate || duplicate_of.is_some() {
            Self::Duplicate { of: duplicate_of }
        } else {
            Self::Original
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// One side of a proposed link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkCandidate {
    pub id: ComplaintId,
    pub state: DuplicateState,
}

impl LinkCandidate {
    pub fn new(id: ComplaintId, state: DuplicateState) -> Self {
        Self { id, state }
    }
}

impl From<&Complaint> for LinkCandidate {
    fn from(complaint: &Complaint) -> Self {
        Self::new(complaint.id, DuplicateState::of_complaint(complaint))
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkViolation {
    #[error("A complaint cannot be marked as duplicate of itself")]
    SelfReference,

    #[error("Cannot mark as duplicate of another duplicate complaint. Please select the original complaint.")]
    OriginalIsDuplicate,

    #[error("This complaint is already marked as a duplicate")]
    AlreadyDuplicate,
}

/// Only originals may be linked to.
pub fn check_original(original: &LinkCandidate) -> Result<(), LinkViolation> {
    if original.state.is_duplicate() {
        return Err(LinkViolation::OriginalIsDuplicate);
    }
    Ok(())
}

/// Decide whether `duplicate` may be linked to `original`.
///
/// Checked in order: self-reference, original already a duplicate,
/// duplicate already linked.
pub fn check_duplicate_link(
    duplicate: &LinkCandidate,
    original: &LinkCandidate,
) -> Result<(), LinkViolation> {
    if duplicate.id == original.id {
        return Err(LinkViolation::SelfReference);
    }
    check_original(original)?;
    if duplicate.state.is_duplicate() {
        return Err(LinkViolation::AlreadyDuplicate);
    }
    Ok(())
}

/// State of `duplicate` after a successful link to `original`.
pub fn link(
    duplicate: &LinkCandidate,
    original: &LinkCandidate,
) -> Result<DuplicateState, LinkViolation> {
    check_duplicate_link(duplicate, original)?;
    Ok(DuplicateState::Duplicate {
        of: Some(original.id),
    })
}
