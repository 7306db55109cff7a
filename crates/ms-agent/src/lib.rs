//! `ms-agent`: Structure-of-Arrays agent storage for the `rust_microsim`
//! framework.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`spec`]      | `AgentSpec`, `Sensor`, `Emitter`, `Capabilities`            |
//! | [`store`]     | `AgentStore` (SoA arrays), `AgentRngs` (per-agent RNG)      |
//! | [`builder`]   | `AgentStoreBuilder` (validated construction)                |
//! | [`loader`]    | `load_population_csv` / `load_population_reader`            |
//! | [`error`]     | `AgentError`, `AgentResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Sensor` and `Emitter`. |

pub mod builder;
pub mod error;
pub mod loader;
pub mod spec;
pub mod store;


pub use builder::AgentStoreBuilder;
pub use error::{AgentError, AgentResult};
pub use loader::{load_population_csv, load_population_reader};
pub use spec::{AgentSpec, Capabilities, Emitter, Sensor};
pub use store::{AgentRngs, AgentStore};
