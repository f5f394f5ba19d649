pub mod warehouse;
pub mod warehouse_occupant;
