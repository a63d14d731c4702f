pub mod inventory_repository;
pub mod owner_repository;
pub mod reminder_repository;
pub mod user_repository;
pub mod vehicle_repository;

pub use inventory_repository::InventoryRepository;
pub use owner_repository::{OwnerRepository, OwnerUniqueField};
pub use reminder_repository::{NotificationTarget, ReminderRepository};
pub use user_repository::UserRepository;
pub use vehicle_repository::VehicleRepository;
