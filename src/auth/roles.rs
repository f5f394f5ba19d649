//! Staff role hierarchy.
//!
//! Declaration order is the hierarchy: `User < Support < Manager < Admin`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Support,
    Manager,
    Admin,
}

impl Role {
    /// True when this role is at or above `required` in the hierarchy
    pub fn satisfies(self, required: Role) -> bool {
        self >= required
    }
}
