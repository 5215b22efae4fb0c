//! Database Models

// Serde helpers
pub mod serde_helpers;

// Auth
pub mod profile;
pub mod user;

// Campus Domain
pub mod attendance;
pub mod complaint;
pub mod department;
pub mod mess_menu;

// Re-exports
pub use attendance::{AttendanceCreate, AttendanceRecord, AttendanceStatus};
pub use complaint::{Complaint, ComplaintCreate, ComplaintStatus};
pub use department::{Department, DepartmentCreate, DepartmentUpdate};
pub use mess_menu::{MealType, MessMenu, MessMenuCreate, MessMenuUpdate};
pub use profile::{Profile, ProfileCreate, ProfileId, ProfileUpdate};
pub use user::{User, UserCreate, UserId};
