//! The visibility predicate shared by every post-reading path.

use flock_entity::post::Visibility;

/// Whether a viewer may see a post given ownership and follow state.
pub fn can_view(visibility: Visibility, is_owner: bool, is_following: bool) -> bool {
    match visibility {
        Visibility::Public => true,
        Visibility::Private => is_owner,
        Visibility::Followers => is_owner || is_following,
    }
}
