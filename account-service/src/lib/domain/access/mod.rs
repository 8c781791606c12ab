pub mod guard;

pub use guard::RoleGuard;
