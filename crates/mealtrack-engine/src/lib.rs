//! MEALTRACK Engine — effective meal-status resolution, the
//! permission/cutoff gate, and override authorization predicates.
//!
//! Generic over the `mealtrack-core` repository traits so the engine
//! has no dependency on the database crate.

pub mod authz;
pub mod gate;
pub mod overrides;
pub mod status;

pub use authz::{can_create_override, can_modify_override};
pub use gate::{GateService, PermissionSource, TogglePermission, ToggleRequest};
pub use status::{EffectiveMealStatus, ResolutionInputs, StatusService, resolve_status};
