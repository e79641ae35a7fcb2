pub mod mode;
pub mod settings;

pub use mode::{DnsMode, ObservedMode, SystemDnsState};
pub use settings::{FileSettings, MemorySettings, PermissionGate, StaticGate, SystemDnsSettings};
