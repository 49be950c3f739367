mod health_check;
mod jobs;
mod users;

pub use health_check::health_check;
pub use jobs::{create_job, delete_job, get_job, get_jobs, update_job};
pub use users::{
    create_user, delete_user, get_user, get_user_info, get_users, login, update_user,
};
