pub mod azure_open_ai_service;
pub mod open_ai_service;
