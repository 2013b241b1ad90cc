// Copyright @yucwang 2023

use crate::core::interaction::SurfaceInteraction;
use crate::core::scene::TraceContext;
use crate::math::ray::Ray3f;
use crate::math::spectrum::LightIntensity;

/// Surface response: the radiance leaving the hit point back along
/// `incoming`. Implementations add the object's emission and recurse through
/// `ctx` with `its.next_depth()`.
pub trait Material: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn shade(&self, incoming: &Ray3f, its: &SurfaceInteraction, ctx: &mut TraceContext) -> LightIntensity;
}
