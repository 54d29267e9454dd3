// Role based access control shared by role gated contracts.
//
// A role is a u32 derived from its name. Every role has an admin role whose
// holders may grant and revoke it; DEFAULT_ADMIN_ROLE is its own admin.

use lazy_static::lazy_static;
use thiserror::Error;

use crate::{
    contract::{ContractEvent, Selector},
    crypto::{AccountId, Hash},
    serializer::{Reader, ReaderError, Serializer, Writer},
};

pub type RoleType = u32;

pub const DEFAULT_ADMIN_ROLE: RoleType = 0;

/// Derive a role id from its name, the same way message selectors are derived
pub fn role_id(name: &str) -> RoleType {
    u32::from_le_bytes(Selector::from_label(name).to_bytes())
}

lazy_static! {
    pub static ref TIMELOCK_ADMIN_ROLE: RoleType = role_id("TIMELOCK_ADMIN_ROLE");
    pub static ref PROPOSER_ROLE: RoleType = role_id("PROPOSER_ROLE");
    pub static ref EXECUTOR_ROLE: RoleType = role_id("EXECUTOR_ROLE");
}

/// Storage key prefixes for access control data
pub mod prefixes {
    pub const MEMBERS: &[u8] = b"ac:mem:";
    pub const ADMIN_ROLES: &[u8] = b"ac:adm:";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessControlError {
    #[error("Caller is not allowed to act for this account")]
    InvalidCaller,
    #[error("Caller is missing the required role")]
    MissingRole,
    #[error("Account already has the role")]
    RoleRedundant,
}

impl Serializer for AccessControlError {
    fn write(&self, writer: &mut Writer) {
        writer.write_u8(match self {
            Self::InvalidCaller => 0,
            Self::MissingRole => 1,
            Self::RoleRedundant => 2,
        });
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(match reader.read_u8()? {
            0 => Self::InvalidCaller,
            1 => Self::MissingRole,
            2 => Self::RoleRedundant,
            _ => return Err(ReaderError::InvalidValue),
        })
    }

    fn size(&self) -> usize {
        1
    }
}

fn role_topic(role: RoleType) -> Hash {
    let mut bytes = [0u8; 32];
    bytes[..4].copy_from_slice(&role.to_le_bytes());
    Hash::new(bytes)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAdminChanged {
    pub role: RoleType,
    pub previous_admin_role: RoleType,
    pub new_admin_role: RoleType,
}

impl Serializer for RoleAdminChanged {
    fn write(&self, writer: &mut Writer) {
        writer.write_u32(self.role);
        writer.write_u32(self.previous_admin_role);
        writer.write_u32(self.new_admin_role);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            role: reader.read_u32()?,
            previous_admin_role: reader.read_u32()?,
            new_admin_role: reader.read_u32()?,
        })
    }
}

impl ContractEvent for RoleAdminChanged {
    fn name(&self) -> &'static str {
        "RoleAdminChanged"
    }

    fn topics(&self) -> Vec<Hash> {
        vec![role_topic(self.role)]
    }
}

/// `grantor` is None when the role is granted by the constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGranted {
    pub role: RoleType,
    pub grantee: AccountId,
    pub grantor: Option<AccountId>,
}

impl Serializer for RoleGranted {
    fn write(&self, writer: &mut Writer) {
        writer.write_u32(self.role);
        self.grantee.write(writer);
        self.grantor.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            role: reader.read_u32()?,
            grantee: AccountId::read(reader)?,
            grantor: Option::read(reader)?,
        })
    }
}

impl ContractEvent for RoleGranted {
    fn name(&self) -> &'static str {
        "RoleGranted"
    }

    fn topics(&self) -> Vec<Hash> {
        vec![role_topic(self.role), Hash::new(self.grantee.to_bytes())]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRevoked {
    pub role: RoleType,
    pub account: AccountId,
    pub admin: AccountId,
}

impl Serializer for RoleRevoked {
    fn write(&self, writer: &mut Writer) {
        writer.write_u32(self.role);
        self.account.write(writer);
        self.admin.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            role: reader.read_u32()?,
            account: AccountId::read(reader)?,
            admin: AccountId::read(reader)?,
        })
    }
}

impl ContractEvent for RoleRevoked {
    fn name(&self) -> &'static str {
        "RoleRevoked"
    }

    fn topics(&self) -> Vec<Hash> {
        vec![role_topic(self.role), Hash::new(self.account.to_bytes())]
    }
}
