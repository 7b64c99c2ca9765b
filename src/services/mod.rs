// Service module exports

pub mod layout;
pub mod notification;
pub mod schedule;
pub mod settings;
