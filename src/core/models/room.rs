use super::user::User;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Member,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Admin => "ADMIN",
            Role::Member => "MEMBER",
        };
        write!(f, "{}", s)
    }
}

/// Membership is PENDING from the moment a user joins via invite code until
/// the room admin confirms it. Only CONFIRMED members can touch the fund.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemberStatus {
    Pending,
    Confirmed,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomMember {
    pub user: User,
    pub role: Role,
    pub status: MemberStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub members: Vec<RoomMember>,
    pub invite_code: String,
}

impl RoomMember {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == MemberStatus::Confirmed
    }
}

impl Room {
    pub fn member(&self, user_id: &str) -> Option<&RoomMember> {
        self.members.iter().find(|m| m.user.id == user_id)
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.member(user_id).is_some_and(RoomMember::is_admin)
    }

    pub fn is_confirmed_member(&self, user_id: &str) -> bool {
        self.member(user_id).is_some_and(RoomMember::is_confirmed)
    }
}
