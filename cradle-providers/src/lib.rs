//! LLM provider resolution for Cradle.
//!
//! This crate decides which backend an agent talks to and whether that
//! backend is usable right now. It provides:
//! - A fixed registry of hosted and local provider descriptors
//! - Adapters that resolve config files to runtime configuration
//! - A factory that maps config references to a completion/embedding pair
//! - Availability checks over each local server's discovery endpoint
//! - Persisted preferences for the default provider
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  ProviderManager                     │
//! │   list / select / set-default / estimate-cost       │
//! └─────────────────────────────────────────────────────┘
//!          │                    │                │
//!          ▼                    ▼                ▼
//! ┌──────────────────┐ ┌─────────────────┐ ┌──────────────┐
//! │AvailabilityChecker│ │ PreferenceStore │ │CostEstimator │
//! └──────────────────┘ └─────────────────┘ └──────────────┘
//!          │
//!          ▼
//! ┌─────────────────────────────────────────────────────┐
//! │   ProviderFactory ──▶ Adapter (hosted | local)       │
//! └─────────────────────────────────────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                  ProviderRegistry                    │
//! └─────────────────────────────────────────────────────┘
//! ```

mod error;
mod types;

pub mod adapter;
pub mod availability;
pub mod config_file;
pub mod configurator;
pub mod console;
pub mod cost;
pub mod credentials;
pub mod discovery;
pub mod factory;
pub mod manager;
pub mod preferences;
pub mod registry;

pub use adapter::{Adapter, AdapterContext, ClientHandle};
pub use availability::AvailabilityChecker;
pub use config_file::{ConfigRef, ConfigStore, ProviderConfigFile};
pub use configurator::EndpointConfigurator;
pub use console::Console;
pub use cost::CostEstimate;
pub use credentials::{ApiKey, EnvSource, ProcessEnv};
pub use discovery::{Discovery, ProbeResult, Prober};
pub use error::{Error, Result};
pub use factory::{ProviderFactory, ResolvedProviders};
pub use manager::{ProviderManager, ProviderStatus};
pub use preferences::{LoadOrigin, PreferenceStore, Preferences};
pub use registry::{ProviderDescriptor, ProviderRegistry};
pub use types::{
    AdapterKind, CheckOutcome, EmbeddingSupport, ProviderKind, RuntimeConfig, CLAUDE_API_BASE,
    OPENAI_API_BASE,
};
