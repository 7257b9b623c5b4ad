pub mod lifecycle;
pub mod policy;
pub mod sweep;

pub use lifecycle::MatchLifecycleService;
pub use sweep::AutoCancelService;
