//! Use-case services built on the mediator ports.

pub mod equipment_service;
pub mod rotator_command_service;

pub use equipment_service::EquipmentService;
pub use rotator_command_service::RotatorCommandService;
