//! Authorization decision table.
//!
//! Every handler asks one question: may this actor perform this action on
//! this kind of entity, given who owns it? The answer depends only on the
//! actor's identity, admin flag and ownership; there is no field-level rule.

use uuid::Uuid;

use crate::error::{DomainError, Result};

/// An authenticated user as established by the token collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

/// Whoever is making the current request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Actor {
    #[default]
    Anonymous,
    User(Identity),
}

impl Actor {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Actor::User(identity) => Some(identity),
            Actor::Anonymous => None,
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.identity().map(|i| i.user_id)
    }

    pub fn is_admin(&self) -> bool {
        self.identity().is_some_and(|i| i.is_admin)
    }

    /// The identity, or the "not authenticated" error for anonymous actors.
    pub fn require(&self) -> Result<&Identity> {
        self.identity().ok_or_else(not_authenticated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Movie,
    Review,
    Comment,
    Like,
}

impl EntityKind {
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Movie => "Movie",
            EntityKind::Review => "Review",
            EntityKind::Comment => "Comment",
            EntityKind::Like => "Like",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

impl Action {
    /// Read-only actions are open to everyone.
    pub fn is_safe(self) -> bool {
        matches!(self, Action::List | Action::Retrieve)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Denied because nobody is logged in.
    Unauthenticated,
    /// Denied for the logged-in user.
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Anyone,
    Authenticated,
    AdminOnly,
    AdminOrOwner,
}

fn rule_for(kind: EntityKind, action: Action) -> Rule {
    if action.is_safe() {
        return Rule::Anyone;
    }
    match (kind, action) {
        // registration
        (EntityKind::User, Action::Create) => Rule::Anyone,
        (EntityKind::User, _) => Rule::AdminOrOwner,
        (EntityKind::Movie, _) => Rule::AdminOnly,
        (EntityKind::Review | EntityKind::Comment | EntityKind::Like, Action::Create) => {
            Rule::Authenticated
        }
        (EntityKind::Review | EntityKind::Comment | EntityKind::Like, _) => Rule::AdminOrOwner,
    }
}

/// Decides whether `actor` may perform `action` on an entity of `kind`.
///
/// `owner` is the author of a Review/Comment/Like, or the target user itself
/// for the User kind. It is ignored for collection actions.
pub fn decide(actor: &Actor, kind: EntityKind, action: Action, owner: Option<Uuid>) -> Decision {
    let rule = rule_for(kind, action);
    if rule == Rule::Anyone {
        return Decision::Allow;
    }
    let Some(identity) = actor.identity() else {
        return Decision::Unauthenticated;
    };
    let allowed = match rule {
        Rule::Anyone | Rule::Authenticated => true,
        Rule::AdminOnly => identity.is_admin,
        Rule::AdminOrOwner => identity.is_admin || owner == Some(identity.user_id),
    };
    if allowed {
        Decision::Allow
    } else {
        Decision::Forbidden
    }
}

/// [`decide`], with denials turned into the matching [`DomainError`].
pub fn authorize(actor: &Actor, kind: EntityKind, action: Action, owner: Option<Uuid>) -> Result<()> {
    match decide(actor, kind, action, owner) {
        Decision::Allow => Ok(()),
        Decision::Unauthenticated => Err(not_authenticated()),
        Decision::Forbidden => Err(DomainError::Forbidden(
            "You do not have permission to perform this action.".into(),
        )),
    }
}

fn not_authenticated() -> DomainError {
    DomainError::Unauthenticated("Authentication credentials were not provided.".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRITES: [Action; 3] = [Action::Create, Action::Update, Action::Delete];
    const ALL_KINDS: [EntityKind; 5] = [
        EntityKind::User,
        EntityKind::Movie,
        EntityKind::Review,
        EntityKind::Comment,
        EntityKind::Like,
    ];

    fn user(is_admin: bool) -> (Actor, Uuid) {
        let id = Uuid::new_v4();
        let actor = Actor::User(Identity { user_id: id, username: "someone".into(), is_admin });
        (actor, id)
    }

    #[test]
    fn reads_are_open_to_everyone() {
        let (member, _) = user(false);
        for kind in ALL_KINDS {
            for action in [Action::List, Action::Retrieve] {
                assert_eq!(decide(&Actor::Anonymous, kind, action, None), Decision::Allow);
                assert_eq!(decide(&member, kind, action, Some(Uuid::new_v4())), Decision::Allow);
            }
        }
    }

    #[test]
    fn registration_is_open() {
        assert_eq!(decide(&Actor::Anonymous, EntityKind::User, Action::Create, None), Decision::Allow);
    }

    #[test]
    fn users_manage_only_themselves() {
        let (me, my_id) = user(false);
        let other = Uuid::new_v4();
        for action in [Action::Update, Action::Delete] {
            assert_eq!(decide(&me, EntityKind::User, action, Some(my_id)), Decision::Allow);
            assert_eq!(decide(&me, EntityKind::User, action, Some(other)), Decision::Forbidden);
            assert_eq!(
                decide(&Actor::Anonymous, EntityKind::User, action, Some(other)),
                Decision::Unauthenticated
            );
        }
        let (admin, _) = user(true);
        assert_eq!(decide(&admin, EntityKind::User, Action::Delete, Some(other)), Decision::Allow);
    }

    #[test]
    fn movie_writes_need_an_admin() {
        let (member, _) = user(false);
        let (admin, _) = user(true);
        for action in WRITES {
            assert_eq!(decide(&member, EntityKind::Movie, action, None), Decision::Forbidden);
            assert_eq!(decide(&admin, EntityKind::Movie, action, None), Decision::Allow);
            assert_eq!(
                decide(&Actor::Anonymous, EntityKind::Movie, action, None),
                Decision::Unauthenticated
            );
        }
    }

    #[test]
    fn owned_content_is_writable_by_owner_or_admin() {
        let (owner, owner_id) = user(false);
        let (stranger, _) = user(false);
        let (admin, _) = user(true);
        for kind in [EntityKind::Review, EntityKind::Comment, EntityKind::Like] {
            assert_eq!(decide(&stranger, kind, Action::Create, None), Decision::Allow);
            assert_eq!(decide(&Actor::Anonymous, kind, Action::Create, None), Decision::Unauthenticated);
            for action in [Action::Update, Action::Delete] {
                assert_eq!(decide(&owner, kind, action, Some(owner_id)), Decision::Allow);
                assert_eq!(decide(&admin, kind, action, Some(owner_id)), Decision::Allow);
                assert_eq!(decide(&stranger, kind, action, Some(owner_id)), Decision::Forbidden);
            }
        }
    }

    #[test]
    fn authorize_maps_denials_to_errors() {
        let (stranger, _) = user(false);
        let err = authorize(&stranger, EntityKind::Review, Action::Delete, Some(Uuid::new_v4()))
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        let err = authorize(&Actor::Anonymous, EntityKind::Like, Action::Create, None).unwrap_err();
        assert!(matches!(err, DomainError::Unauthenticated(_)));
    }
}
