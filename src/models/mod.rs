// Model module exports

pub mod appointment;
pub mod directory;
pub mod view_context;
