/// Input for persisting a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}
