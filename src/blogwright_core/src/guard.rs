//! Ownership guard deciding who may mutate a resource.
//!
//! Posts belong to their author. Patterns and sections are not owned by
//! anyone and are moderated by admins. The guard is a pure predicate:
//! callers turn a `false` into an authorization failure.

use crate::domain::{
    pattern::{Pattern, Section},
    post::Post,
    user::{Identity, Role, UserId},
};

/// Who controls mutations of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Owner(UserId),
    AdminModerated,
}

/// Resources subject to the ownership guard.
pub trait Guarded {
    fn ownership(&self) -> Ownership;
}

impl Guarded for Post {
    fn ownership(&self) -> Ownership {
        Ownership::Owner(self.author_id)
    }
}

impl Guarded for Pattern {
    fn ownership(&self) -> Ownership {
        Ownership::AdminModerated
    }
}

impl Guarded for Section {
    fn ownership(&self) -> Ownership {
        Ownership::AdminModerated
    }
}

/// Kinds of resources that can be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Post,
    Pattern,
    Section,
}

pub fn can_modify<R: Guarded + ?Sized>(actor: &Identity, resource: &R) -> bool {
    match resource.ownership() {
        Ownership::Owner(owner) => actor.id == owner,
        Ownership::AdminModerated => is_admin(actor.role),
    }
}

pub fn can_create(actor: &Identity, kind: ResourceKind) -> bool {
    match kind {
        ResourceKind::Post => true,
        ResourceKind::Pattern | ResourceKind::Section => is_admin(actor.role),
    }
}

fn is_admin(role: Role) -> bool {
    match role {
        Role::Admin => true,
        Role::User => false,
    }
}
