//! Domain model for groups and memberships.
//!
//! Groups own their memberships; the membership row carries the pending or
//! active state of a user and whether they administer the group.

mod error;
mod group;
mod ids;
mod membership;
mod view;

pub use error::{GroupDomainError, ParseJoinActionError};
pub use group::{Group, PersistedGroupData, SlackIntegration};
pub use ids::{GroupId, GroupName, MembershipId};
pub use membership::{
    JoinAction, MemberStatusUpdate, Membership, MembershipState, PersistedMembershipData,
};
pub use view::{GroupMembershipView, MemberView};
