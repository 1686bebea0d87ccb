pub mod invited_members;
pub mod inviter_counters;

pub mod prelude {
    pub use super::invited_members::Entity as InvitedMembers;
    pub use super::inviter_counters::Entity as InviterCounters;
}
