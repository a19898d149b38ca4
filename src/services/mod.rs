pub mod audit;
pub mod locations;
pub mod warehouse_validator;
pub mod warehouses;
