// src/core/mod.rs

pub mod binder;
pub mod context;
pub mod gate;
pub mod invoker;
pub mod mapper;
pub mod paths;
pub mod pipeline;
pub mod projection;
