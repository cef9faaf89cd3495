pub mod env_config_dto;
pub mod topology_dto;
