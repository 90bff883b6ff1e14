//! Ports (interfaces) implemented by the infrastructure and presentation layers

pub mod conversation_logger;
pub mod export_sink;
pub mod llm_gateway;
pub mod progress;
pub mod tool_registry;
