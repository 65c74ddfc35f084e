pub mod hasher;
pub mod history_model;
pub mod processor;
pub mod record;
