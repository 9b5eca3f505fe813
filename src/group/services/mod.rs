//! Group services: the authorization guard and the membership engine.

pub mod authorization;
mod membership;

pub use authorization::{AccessError, is_admin, is_member, require_admin, require_member};
pub use membership::{
    JoinResolution, MemberRemoval, MembershipError, MembershipResult, MembershipService,
    dissolve_if_empty,
};
