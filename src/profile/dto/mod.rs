pub mod change_password_dto;
pub mod update_name_dto;
