//! Domain model (portal kinds, visit records, lifecycle states, events, errors).

pub mod portal;
pub mod visit;
pub mod dismissal;
pub mod state;
pub mod events;
pub mod errors;

pub use self::portal::PortalKind;
pub use self::visit::LastVisited;
pub use self::dismissal::{DAY_MS, DEFAULT_COOLDOWN_MS, DismissalMarker};
pub use self::state::{BannerState, RegistrationState, UiElement, WorkerId, WorkerState};
pub use self::events::{Lane, PlatformEvent};
pub use self::errors::{PortalError, Result};
