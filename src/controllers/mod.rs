pub mod admin_controller;
pub mod inventory_controller;
pub mod owner_controller;
pub mod reminder_controller;
pub mod vehicle_controller;
