//! Affine transform helpers.

use crate::{foundation::core::Affine, scene::model::Transform};

/// Build an affine map from a model transform. `None` is the identity.
#[inline]
pub fn from_model(t: Option<&Transform>) -> Affine {
    t.map_or(Affine::IDENTITY, |t| Affine::new(t.coeffs()))
}

/// Compose so that `child` applies first, then `ambient`.
#[inline]
pub fn compose(child: Affine, ambient: Affine) -> Affine {
    ambient * child
}

/// Compose an optional model transform under an ambient transform.
#[inline]
pub fn compose_model(child: Option<&Transform>, ambient: Affine) -> Affine {
    compose(from_model(child), ambient)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
