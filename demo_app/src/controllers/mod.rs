pub mod home;
pub mod users;

pub use home::HomeController;
pub use users::UsersController;
