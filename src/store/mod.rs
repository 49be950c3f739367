/// Store adapters
///
/// The only persistence-facing code in the application. Each submodule is a
/// set of free functions over the connection pool; ownership-scoped job
/// queries bind the record id and the owner id in a single statement.

pub mod jobs;
pub mod users;
