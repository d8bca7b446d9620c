//! Ownership guard for mutations of owned resources.
//!
//! Owner references and session identities can arrive in different shapes
//! (a typed id, a raw UUID, a string in some other casing or format). Both
//! sides are normalised to [`AccountId`] before comparing, and anything that
//! does not normalise is treated as a mismatch.

use uuid::Uuid;

use super::AuthError;
use crate::models::account::{AccountId, PublicAccount};
use crate::models::video::Video;

/// Something that can be read as an account identity.
pub trait IdentityRef {
    /// The canonical id, or `None` if the value does not name an account.
    fn canonical(&self) -> Option<AccountId>;
}

impl IdentityRef for AccountId {
    fn canonical(&self) -> Option<AccountId> {
        Some(*self)
    }
}

impl IdentityRef for Uuid {
    fn canonical(&self) -> Option<AccountId> {
        Some(AccountId::new(*self))
    }
}

impl IdentityRef for str {
    fn canonical(&self) -> Option<AccountId> {
        self.parse().ok()
    }
}

impl IdentityRef for String {
    fn canonical(&self) -> Option<AccountId> {
        self.as_str().canonical()
    }
}

impl IdentityRef for PublicAccount {
    fn canonical(&self) -> Option<AccountId> {
        Some(self.id)
    }
}

impl<T: IdentityRef + ?Sized> IdentityRef for &T {
    fn canonical(&self) -> Option<AccountId> {
        (**self).canonical()
    }
}

/// A resource with a recorded owner.
pub trait Owned {
    type Owner: IdentityRef + ?Sized;

    fn owner(&self) -> &Self::Owner;
}

impl Owned for Video {
    type Owner = AccountId;

    fn owner(&self) -> &AccountId {
        &self.owner_id
    }
}

/// Allow the mutation only if `identity` owns `resource`. No I/O.
pub fn assert_owner<R, I>(resource: &R, identity: &I) -> Result<(), AuthError>
where
    R: Owned + ?Sized,
    I: IdentityRef + ?Sized,
{
    match (resource.owner().canonical(), identity.canonical()) {
        (Some(owner), Some(caller)) if owner == caller => Ok(()),
        _ => Err(AuthError::Forbidden("not resource owner".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    /// Resource whose owner is stored as free-form text.
    struct Note {
        owner: String,
    }

    impl Owned for Note {
        type Owner = str;

        fn owner(&self) -> &str {
            &self.owner
        }
    }

    #[test]
    fn same_identity_in_different_shapes_matches() {
        let id: AccountId = ID.parse().unwrap();
        for owner in [
            ID.to_string(),
            ID.to_uppercase(),
            ID.replace('-', ""),
            format!("{{{ID}}}"),
        ] {
            let note = Note { owner };
            assert!(assert_owner(&note, &id).is_ok());
            assert!(assert_owner(&note, ID).is_ok());
            assert!(assert_owner(&note, id.as_uuid()).is_ok());
        }
    }

    #[test]
    fn different_identity_is_forbidden() {
        let note = Note { owner: ID.to_string() };
        let other: AccountId = "00000000-0000-4000-8000-000000000001".parse().unwrap();
        assert!(matches!(
            assert_owner(&note, &other),
            Err(AuthError::Forbidden(_))
        ));
    }

    #[test]
    fn unparseable_owner_is_forbidden() {
        let note = Note { owner: "someone".into() };
        let id: AccountId = ID.parse().unwrap();
        assert!(assert_owner(&note, &id).is_err());
    }

    #[test]
    fn video_owner_is_checked() {
        let owner: AccountId = ID.parse().unwrap();
        let video = Video {
            id: Uuid::nil(),
            owner_id: owner,
            title: "t".into(),
            description: "d".into(),
            video_file: "f".into(),
            thumbnail: "t".into(),
            duration_secs: 1.0,
            views: 0,
            is_published: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        assert!(assert_owner(&video, &owner).is_ok());
        assert!(assert_owner(&video, "00000000-0000-4000-8000-000000000001").is_err());
    }
}
