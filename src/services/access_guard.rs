// services/access_guard.rs
//
// Ownership check consulted before every show, edit, update and delete.

use mongodb::bson::oid::ObjectId;

use crate::models::identity::Role;
use crate::models::record::ResourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Show,
    Edit,
    Update,
    Delete,
}

/// What a non-owner gets back. Differs per resource and operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    NotFound,
    Redirect(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    DenyNotFound,
    DenyRedirect(&'static str),
}

#[derive(Debug)]
pub struct AccessPolicy {
    /// Roles that skip the ownership check.
    pub bypass: &'static [Role],
    pub show: Denial,
    pub edit: Denial,
    pub update: Denial,
    pub delete: Denial,
}

pub const BUY_POLICY: AccessPolicy = AccessPolicy {
    bypass: &[Role::Admin],
    show: Denial::NotFound,
    edit: Denial::NotFound,
    update: Denial::Redirect("/bought"),
    delete: Denial::Redirect("/bought"),
};

pub const SELL_POLICY: AccessPolicy = AccessPolicy {
    bypass: &[Role::Admin, Role::Worker],
    show: Denial::NotFound,
    edit: Denial::NotFound,
    update: Denial::Redirect("/sells"),
    delete: Denial::Redirect("/sells"),
};

pub const BITTAA_POLICY: AccessPolicy = AccessPolicy {
    bypass: &[Role::Admin],
    show: Denial::NotFound,
    edit: Denial::Redirect("/bought"),
    update: Denial::Redirect("/bittaa"),
    delete: Denial::Redirect("/bought"),
};

pub const PROFILE_POLICY: AccessPolicy = AccessPolicy {
    bypass: &[Role::Admin],
    show: Denial::NotFound,
    edit: Denial::Redirect("/home"),
    update: Denial::Redirect("/home"),
    delete: Denial::Redirect("/home"),
};

impl AccessPolicy {
    pub fn for_kind(kind: ResourceKind) -> &'static AccessPolicy {
        match kind {
            ResourceKind::Buy => &BUY_POLICY,
            ResourceKind::Sell => &SELL_POLICY,
            ResourceKind::Bittaa => &BITTAA_POLICY,
            ResourceKind::Profile => &PROFILE_POLICY,
        }
    }

    fn denial(&self, operation: Operation) -> Denial {
        match operation {
            Operation::Show => self.show,
            Operation::Edit => self.edit,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }

    pub fn decide(&self, actor_id: ObjectId, actor_role: Role, owner_id: ObjectId, operation: Operation) -> Access {
        if self.bypass.contains(&actor_role) || actor_id == owner_id {
            return Access::Allow;
        }
        match self.denial(operation) {
            Denial::NotFound => Access::DenyNotFound,
            Denial::Redirect(target) => Access::DenyRedirect(target),
        }
    }
}
